//! Application of resolved values onto the live style surface.
//!
//! [`StyleApplier`] owns the applied-style bookkeeping: the body classes
//! and scoped custom properties it set on the previous pass. Each new pass
//! computes the full target state, removes exactly what it previously
//! applied and is no longer wanted, then applies the whole target. The
//! remove-then-add ordering is mandatory: a setting removed from the schema
//! must leave no orphaned class or property, and stale conflicting values
//! must never coexist with new ones.

use styletune_schema::{Section, SettingKind, SettingValue, KEY_SEPARATOR};

use crate::host::{HostSurface, Scope};
use crate::store::SettingsStore;

/// Applies resolved settings as body classes and custom properties,
/// tracking what it applied so the next pass can reconcile.
#[derive(Debug, Default)]
pub struct StyleApplier {
    classes: Vec<String>,
    properties: Vec<(Scope, String)>,
}

impl StyleApplier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recomputes the target style state from the store's sections and
    /// values, reconciles the host against the previous pass, and records
    /// the new state. Applying the same resolution twice is a no-op.
    pub fn apply(&mut self, store: &SettingsStore, host: &dyn HostSurface) {
        let mut classes: Vec<String> = Vec::new();
        let mut properties: Vec<(Scope, String, String)> = Vec::new();

        for section in store.sections() {
            for setting in &section.settings {
                collect_targets(section, setting, store, &mut classes, &mut properties);
            }
        }

        // Remove first: everything from the previous pass that the new
        // target no longer contains.
        for class in &self.classes {
            if !classes.iter().any(|c| c == class) {
                host.remove_body_class(class);
            }
        }
        for (scope, name) in &self.properties {
            if !properties.iter().any(|(s, n, _)| s == scope && n == name) {
                host.remove_property(*scope, name);
            }
        }

        for class in &classes {
            host.add_body_class(class);
        }
        for (scope, name, value) in &properties {
            host.set_property(*scope, name, value);
        }

        log::debug!(
            "applied {} class(es), {} propert(ies)",
            classes.len(),
            properties.len()
        );

        self.classes = classes;
        self.properties = properties
            .into_iter()
            .map(|(scope, name, _)| (scope, name))
            .collect();
    }

    /// Removes everything currently tracked and clears the bookkeeping.
    pub fn teardown(&mut self, host: &dyn HostSurface) {
        for class in self.classes.drain(..) {
            host.remove_body_class(&class);
        }
        for (scope, name) in self.properties.drain(..) {
            host.remove_property(scope, &name);
        }
    }

    /// The classes applied by the last pass.
    pub fn applied_classes(&self) -> &[String] {
        &self.classes
    }
}

fn collect_targets(
    section: &Section,
    setting: &styletune_schema::Setting,
    store: &SettingsStore,
    classes: &mut Vec<String>,
    properties: &mut Vec<(Scope, String, String)>,
) {
    let property_name = format!("--{}", setting.id);

    match &setting.kind {
        SettingKind::Heading { .. } | SettingKind::InfoText { .. } => {}

        SettingKind::ClassToggle { default, .. } => {
            let on = store
                .get(&section.id, &setting.id)
                .and_then(SettingValue::as_bool)
                .unwrap_or(*default);
            if on {
                classes.push(setting.id.clone());
            }
        }

        SettingKind::ClassSelect {
            options, default, ..
        } => {
            let selected = store
                .get(&section.id, &setting.id)
                .and_then(SettingValue::as_text)
                .or(default.as_deref());
            // A stored value naming no option contributes nothing.
            if let Some(value) = selected {
                if options.iter().any(|o| o.value == value) {
                    classes.push(value.to_string());
                }
            }
        }

        SettingKind::VariableText { default, quotes } => {
            let text = store
                .get(&section.id, &setting.id)
                .and_then(SettingValue::as_text)
                .unwrap_or(default.as_str());
            let value = if *quotes {
                format!("\"{text}\"")
            } else {
                text.to_string()
            };
            properties.push((Scope::Default, property_name, value));
        }

        SettingKind::VariableNumber { default, format }
        | SettingKind::VariableNumberSlider {
            default, format, ..
        } => {
            let number = store
                .get(&section.id, &setting.id)
                .and_then(SettingValue::as_number)
                .unwrap_or(*default);
            let value = match format {
                Some(suffix) => format!("{number}{suffix}"),
                None => number.to_string(),
            };
            properties.push((Scope::Default, property_name, value));
        }

        SettingKind::VariableSelect { default, .. }
        | SettingKind::VariableColor { default, .. } => {
            let value = store
                .get(&section.id, &setting.id)
                .and_then(SettingValue::as_text)
                .unwrap_or(default.as_str());
            properties.push((Scope::Default, property_name, value.to_string()));
        }

        SettingKind::VariableThemedColor {
            default_light,
            default_dark,
            ..
        } => {
            let light = store
                .get(
                    &section.id,
                    &format!("{}{KEY_SEPARATOR}light", setting.id),
                )
                .and_then(SettingValue::as_text)
                .unwrap_or(default_light.as_str());
            let dark = store
                .get(&section.id, &format!("{}{KEY_SEPARATOR}dark", setting.id))
                .and_then(SettingValue::as_text)
                .unwrap_or(default_dark.as_str());
            properties.push((Scope::Light, property_name.clone(), light.to_string()));
            properties.push((Scope::Dark, property_name, dark.to_string()));
        }
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use styletune_schema::{ColorFormat, Section, Setting, SettingOption};

    use super::*;
    use crate::host::MemoryHost;
    use crate::persist::MemoryPersistence;

    fn setting(id: &str, kind: SettingKind) -> Setting {
        Setting {
            id: id.to_string(),
            title: id.to_string(),
            description: None,
            kind,
        }
    }

    fn store_with(sections: Vec<Section>) -> SettingsStore {
        let mut store = SettingsStore::new(Box::new(Rc::new(MemoryPersistence::new())));
        store.merge(sections, false);
        store
    }

    fn demo(settings: Vec<Setting>) -> Section {
        Section {
            id: "demo".to_string(),
            name: "Demo".to_string(),
            settings,
        }
    }

    #[test]
    fn test_toggle_class_follows_value() {
        let mut store = store_with(vec![demo(vec![setting(
            "accent",
            SettingKind::ClassToggle {
                default: false,
                add_command: false,
            },
        )])]);
        let host = MemoryHost::new();
        let mut applier = StyleApplier::new();

        applier.apply(&store, &host);
        assert!(host.classes().is_empty());

        store.set("demo", "accent", SettingValue::Bool(true));
        applier.apply(&store, &host);
        assert_eq!(host.classes(), vec!["accent"]);
        assert_eq!(host.property_count(), 0);
    }

    #[test]
    fn test_apply_is_idempotent() {
        let store = store_with(vec![demo(vec![
            setting(
                "accent",
                SettingKind::ClassToggle {
                    default: true,
                    add_command: false,
                },
            ),
            setting(
                "size",
                SettingKind::VariableNumber {
                    default: 16.0,
                    format: Some("px".to_string()),
                },
            ),
        ])]);
        let host = MemoryHost::new();
        let mut applier = StyleApplier::new();

        applier.apply(&store, &host);
        let classes = host.classes();
        let properties = host.properties(Scope::Default);

        applier.apply(&store, &host);
        assert_eq!(host.classes(), classes);
        assert_eq!(host.properties(Scope::Default), properties);
        assert_eq!(host.property(Scope::Default, "--size").as_deref(), Some("16px"));
    }

    #[test]
    fn test_class_select_applies_selected_option_only() {
        let options = vec![
            SettingOption::new("One", "one"),
            SettingOption::new("Two", "two"),
        ];
        let mut store = store_with(vec![demo(vec![setting(
            "variant",
            SettingKind::ClassSelect {
                options,
                allow_empty: false,
                default: Some("one".to_string()),
            },
        )])]);
        let host = MemoryHost::new();
        let mut applier = StyleApplier::new();

        applier.apply(&store, &host);
        assert_eq!(host.classes(), vec!["one"]);

        store.set("demo", "variant", SettingValue::from("two"));
        applier.apply(&store, &host);
        assert_eq!(host.classes(), vec!["two"]);

        // A stored value naming no option applies nothing.
        store.set("demo", "variant", SettingValue::from("missing"));
        applier.apply(&store, &host);
        assert!(host.classes().is_empty());
    }

    #[test]
    fn test_removed_section_leaves_no_orphans() {
        let mut store = store_with(vec![demo(vec![
            setting(
                "accent",
                SettingKind::ClassToggle {
                    default: true,
                    add_command: false,
                },
            ),
            setting(
                "bg",
                SettingKind::VariableColor {
                    default: "#abc".to_string(),
                    format: ColorFormat::Hex,
                },
            ),
        ])]);
        let host = MemoryHost::new();
        let mut applier = StyleApplier::new();

        applier.apply(&store, &host);
        assert_eq!(host.classes(), vec!["accent"]);
        assert_eq!(host.property_count(), 1);

        store.merge(vec![], false);
        applier.apply(&store, &host);
        assert!(host.classes().is_empty());
        assert_eq!(host.property_count(), 0);
    }

    #[test]
    fn test_themed_color_scopes() {
        let store = store_with(vec![demo(vec![setting(
            "bg",
            SettingKind::VariableThemedColor {
                default_light: "#fff".to_string(),
                default_dark: "#000".to_string(),
                format: ColorFormat::Hex,
            },
        )])]);
        let host = MemoryHost::new();
        let mut applier = StyleApplier::new();

        applier.apply(&store, &host);
        assert_eq!(host.property(Scope::Light, "--bg").as_deref(), Some("#fff"));
        assert_eq!(host.property(Scope::Dark, "--bg").as_deref(), Some("#000"));
        assert_eq!(host.property(Scope::Default, "--bg"), None);
    }

    #[test]
    fn test_quoted_text_variable() {
        let store = store_with(vec![demo(vec![setting(
            "font",
            SettingKind::VariableText {
                default: "Inter".to_string(),
                quotes: true,
            },
        )])]);
        let host = MemoryHost::new();
        let mut applier = StyleApplier::new();

        applier.apply(&store, &host);
        assert_eq!(
            host.property(Scope::Default, "--font").as_deref(),
            Some("\"Inter\"")
        );
    }

    #[test]
    fn test_teardown_clears_everything() {
        let store = store_with(vec![demo(vec![
            setting(
                "accent",
                SettingKind::ClassToggle {
                    default: true,
                    add_command: false,
                },
            ),
            setting(
                "bg",
                SettingKind::VariableThemedColor {
                    default_light: "#fff".to_string(),
                    default_dark: "#000".to_string(),
                    format: ColorFormat::Hex,
                },
            ),
        ])]);
        let host = MemoryHost::new();
        let mut applier = StyleApplier::new();

        applier.apply(&store, &host);
        applier.teardown(&host);

        assert!(host.classes().is_empty());
        assert_eq!(host.property_count(), 0);
        assert!(applier.applied_classes().is_empty());
    }
}
