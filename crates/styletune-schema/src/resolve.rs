//! Resolution of parsed block structures into typed sections.
//!
//! [`resolve_section`] walks one generic YAML structure and resolves each
//! settings entry into a [`SettingKind`] variant, validating required
//! fields and filling defaults per variant. A structure missing `name`,
//! `id`, or a non-empty `settings` sequence is not a settings block at all
//! and resolves to `None`; any validation failure inside a recognized
//! block is fatal for that whole section.

use serde_yaml::{Mapping, Value};

use crate::error::ResolveError;
use crate::model::{ColorFormat, Section, Setting, SettingKind, SettingOption};

/// Resolves one parsed block into a typed [`Section`].
///
/// Returns `Ok(None)` when the structure lacks `name`, `id`, or a
/// non-empty `settings` sequence (the block is not a settings schema; the
/// caller treats this as a silent skip, not an error).
pub fn resolve_section(doc: &Value) -> Result<Option<Section>, ResolveError> {
    let map = match doc.as_mapping() {
        Some(map) => map,
        None => return Ok(None),
    };

    let id = match non_empty_str(map, "id") {
        Some(id) => id,
        None => return Ok(None),
    };
    let name = match non_empty_str(map, "name") {
        Some(name) => name,
        None => return Ok(None),
    };
    let entries = match map.get("settings").and_then(Value::as_sequence) {
        Some(seq) if !seq.is_empty() => seq,
        _ => return Ok(None),
    };

    let mut settings = Vec::with_capacity(entries.len());
    for entry in entries {
        // Null entries are trailing-comma artifacts of hand-written
        // block text; drop them silently.
        if entry.is_null() {
            continue;
        }
        let setting = resolve_setting(entry)?;
        if settings.iter().any(|s: &Setting| s.id == setting.id) {
            return Err(ResolveError::DuplicateSetting { id: setting.id });
        }
        settings.push(setting);
    }

    Ok(Some(Section {
        id: id.to_string(),
        name: name.to_string(),
        settings,
    }))
}

fn resolve_setting(entry: &Value) -> Result<Setting, ResolveError> {
    let map = entry.as_mapping().ok_or(ResolveError::NotAMapping)?;

    let id = require_str(map, "id", "(unknown)")?.to_string();
    let title = require_str(map, "title", &id)?.to_string();
    let description = opt_str(map, "description", &id)?.map(str::to_string);
    let type_tag = require_str(map, "type", &id)?;

    let kind = match type_tag {
        "heading" => SettingKind::Heading {
            level: opt_u8(map, "level", &id)?.unwrap_or(1),
            collapsed: opt_bool(map, "collapsed", &id)?.unwrap_or(false),
        },
        "info-text" => SettingKind::InfoText {
            markdown: opt_bool(map, "markdown", &id)?.unwrap_or(false),
        },
        "class-toggle" => SettingKind::ClassToggle {
            default: opt_bool(map, "default", &id)?.unwrap_or(false),
            add_command: opt_bool(map, "addCommand", &id)?.unwrap_or(false),
        },
        "class-select" => {
            let options = require_options(map, &id)?;
            let allow_empty = opt_bool(map, "allowEmpty", &id)?.unwrap_or(false);
            let default = match opt_str(map, "default", &id)? {
                Some(value) => {
                    if !options.iter().any(|o| o.value == value) {
                        return Err(ResolveError::UnknownDefault {
                            setting: id,
                            value: value.to_string(),
                        });
                    }
                    Some(value.to_string())
                }
                // Without an explicit default the first option applies,
                // unless an empty selection is allowed.
                None if allow_empty => None,
                None => Some(options[0].value.clone()),
            };
            SettingKind::ClassSelect {
                options,
                allow_empty,
                default,
            }
        }
        "variable-text" => SettingKind::VariableText {
            default: require_str(map, "default", &id)?.to_string(),
            quotes: opt_bool(map, "quotes", &id)?.unwrap_or(false),
        },
        "variable-number" => SettingKind::VariableNumber {
            default: require_f64(map, "default", &id)?,
            format: opt_str(map, "format", &id)?.map(str::to_string),
        },
        "variable-number-slider" => SettingKind::VariableNumberSlider {
            default: require_f64(map, "default", &id)?,
            min: require_f64(map, "min", &id)?,
            max: require_f64(map, "max", &id)?,
            step: require_f64(map, "step", &id)?,
            format: opt_str(map, "format", &id)?.map(str::to_string),
        },
        "variable-select" => {
            let options = require_options(map, &id)?;
            let default = require_str(map, "default", &id)?.to_string();
            if !options.iter().any(|o| o.value == default) {
                return Err(ResolveError::UnknownDefault {
                    setting: id,
                    value: default,
                });
            }
            SettingKind::VariableSelect { options, default }
        }
        "variable-color" => SettingKind::VariableColor {
            default: require_str(map, "default", &id)?.to_string(),
            format: color_format(map, &id)?,
        },
        "variable-themed-color" => SettingKind::VariableThemedColor {
            default_light: require_str(map, "default-light", &id)?.to_string(),
            default_dark: require_str(map, "default-dark", &id)?.to_string(),
            format: color_format(map, &id)?,
        },
        other => {
            return Err(ResolveError::UnknownType {
                setting: id,
                value: other.to_string(),
            })
        }
    };

    Ok(Setting {
        id,
        title,
        description,
        kind,
    })
}

fn non_empty_str<'a>(map: &'a Mapping, field: &str) -> Option<&'a str> {
    map.get(field)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn require_str<'a>(
    map: &'a Mapping,
    field: &'static str,
    setting: &str,
) -> Result<&'a str, ResolveError> {
    match map.get(field) {
        None | Some(Value::Null) => Err(ResolveError::MissingField {
            setting: setting.to_string(),
            field,
        }),
        Some(value) => value.as_str().ok_or(ResolveError::InvalidField {
            setting: setting.to_string(),
            field,
            expected: "a string",
        }),
    }
}

fn opt_str<'a>(
    map: &'a Mapping,
    field: &'static str,
    setting: &str,
) -> Result<Option<&'a str>, ResolveError> {
    match map.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value
            .as_str()
            .map(Some)
            .ok_or(ResolveError::InvalidField {
                setting: setting.to_string(),
                field,
                expected: "a string",
            }),
    }
}

fn opt_bool(map: &Mapping, field: &'static str, setting: &str) -> Result<Option<bool>, ResolveError> {
    match map.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value
            .as_bool()
            .map(Some)
            .ok_or(ResolveError::InvalidField {
                setting: setting.to_string(),
                field,
                expected: "a boolean",
            }),
    }
}

fn opt_u8(map: &Mapping, field: &'static str, setting: &str) -> Result<Option<u8>, ResolveError> {
    match map.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value
            .as_u64()
            .filter(|n| *n <= u8::MAX as u64)
            .map(|n| Some(n as u8))
            .ok_or(ResolveError::InvalidField {
                setting: setting.to_string(),
                field,
                expected: "a small integer",
            }),
    }
}

fn require_f64(map: &Mapping, field: &'static str, setting: &str) -> Result<f64, ResolveError> {
    match map.get(field) {
        None | Some(Value::Null) => Err(ResolveError::MissingField {
            setting: setting.to_string(),
            field,
        }),
        Some(value) => value.as_f64().ok_or(ResolveError::InvalidField {
            setting: setting.to_string(),
            field,
            expected: "a number",
        }),
    }
}

/// Parses an `options` sequence. Each option is either a plain string
/// (label = value) or a mapping with scalar `label` and `value`.
fn require_options(map: &Mapping, setting: &str) -> Result<Vec<SettingOption>, ResolveError> {
    let entries = match map.get("options").and_then(Value::as_sequence) {
        Some(seq) if !seq.is_empty() => seq,
        _ => {
            return Err(ResolveError::EmptyOptions {
                setting: setting.to_string(),
            })
        }
    };

    let mut options = Vec::with_capacity(entries.len());
    for entry in entries {
        match entry {
            Value::String(value) => options.push(SettingOption::new(value.clone(), value.clone())),
            Value::Mapping(option) => {
                let label = require_str(option, "label", setting)?;
                let value = require_str(option, "value", setting)?;
                options.push(SettingOption::new(label, value));
            }
            _ => {
                return Err(ResolveError::InvalidField {
                    setting: setting.to_string(),
                    field: "options",
                    expected: "strings or label/value mappings",
                })
            }
        }
    }
    Ok(options)
}

fn color_format(map: &Mapping, setting: &str) -> Result<ColorFormat, ResolveError> {
    match opt_str(map, "format", setting)? {
        None => Ok(ColorFormat::Hex),
        Some("hex") => Ok(ColorFormat::Hex),
        Some("rgb") => Ok(ColorFormat::Rgb),
        Some("hsl") => Ok(ColorFormat::Hsl),
        Some(_) => Err(ResolveError::InvalidField {
            setting: setting.to_string(),
            field: "format",
            expected: "one of hex, rgb, hsl",
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(yaml: &str) -> Result<Option<Section>, ResolveError> {
        let doc: Value = serde_yaml::from_str(yaml).unwrap();
        resolve_section(&doc)
    }

    #[test]
    fn test_resolves_class_toggle_with_defaults() {
        let section = resolve(
            "name: Demo\nid: demo\nsettings:\n  - id: accent\n    title: Accent color\n    type: class-toggle",
        )
        .unwrap()
        .unwrap();

        assert_eq!(section.id, "demo");
        assert_eq!(section.name, "Demo");
        assert_eq!(section.settings.len(), 1);
        assert_eq!(
            section.settings[0].kind,
            SettingKind::ClassToggle {
                default: false,
                add_command: false,
            }
        );
    }

    #[test]
    fn test_non_settings_block_resolves_to_none() {
        assert_eq!(resolve("just: some\nyaml: here"), Ok(None));
        assert_eq!(resolve("name: X\nid: x\nsettings: []"), Ok(None));
        assert_eq!(resolve("name: X\nsettings:\n  - id: a"), Ok(None));
        assert_eq!(resolve("id: x\nsettings:\n  - id: a"), Ok(None));
    }

    #[test]
    fn test_null_entries_are_dropped() {
        let section = resolve(
            "name: Demo\nid: demo\nsettings:\n  - id: a\n    title: A\n    type: class-toggle\n  -\n  - id: b\n    title: B\n    type: class-toggle",
        )
        .unwrap()
        .unwrap();
        assert_eq!(section.settings.len(), 2);
    }

    #[test]
    fn test_unknown_type_is_fatal_for_section() {
        let err = resolve(
            "name: Demo\nid: demo\nsettings:\n  - id: a\n    title: A\n    type: bogus",
        )
        .unwrap_err();
        assert_eq!(
            err,
            ResolveError::UnknownType {
                setting: "a".to_string(),
                value: "bogus".to_string(),
            }
        );
    }

    #[test]
    fn test_missing_required_field_names_the_setting() {
        let err = resolve("name: Demo\nid: demo\nsettings:\n  - id: a\n    type: class-toggle")
            .unwrap_err();
        assert_eq!(
            err,
            ResolveError::MissingField {
                setting: "a".to_string(),
                field: "title",
            }
        );
    }

    #[test]
    fn test_duplicate_setting_ids_are_an_error() {
        let err = resolve(
            "name: Demo\nid: demo\nsettings:\n  - id: a\n    title: A\n    type: class-toggle\n  - id: a\n    title: B\n    type: class-toggle",
        )
        .unwrap_err();
        assert_eq!(err, ResolveError::DuplicateSetting { id: "a".to_string() });
    }

    #[test]
    fn test_class_select_defaults_to_first_option() {
        let section = resolve(
            "name: D\nid: d\nsettings:\n  - id: s\n    title: S\n    type: class-select\n    options:\n      - one\n      - label: Two\n        value: two",
        )
        .unwrap()
        .unwrap();
        assert_eq!(
            section.settings[0].kind,
            SettingKind::ClassSelect {
                options: vec![
                    SettingOption::new("one", "one"),
                    SettingOption::new("Two", "two"),
                ],
                allow_empty: false,
                default: Some("one".to_string()),
            }
        );
    }

    #[test]
    fn test_class_select_allow_empty_has_no_default() {
        let section = resolve(
            "name: D\nid: d\nsettings:\n  - id: s\n    title: S\n    type: class-select\n    allowEmpty: true\n    options:\n      - one",
        )
        .unwrap()
        .unwrap();
        match &section.settings[0].kind {
            SettingKind::ClassSelect { default, .. } => assert_eq!(default, &None),
            other => panic!("expected class-select, got {other:?}"),
        }
    }

    #[test]
    fn test_select_default_must_name_an_option() {
        let err = resolve(
            "name: D\nid: d\nsettings:\n  - id: s\n    title: S\n    type: variable-select\n    default: three\n    options:\n      - one\n      - two",
        )
        .unwrap_err();
        assert_eq!(
            err,
            ResolveError::UnknownDefault {
                setting: "s".to_string(),
                value: "three".to_string(),
            }
        );
    }

    #[test]
    fn test_select_requires_options() {
        let err = resolve(
            "name: D\nid: d\nsettings:\n  - id: s\n    title: S\n    type: class-select\n    options: []",
        )
        .unwrap_err();
        assert_eq!(err, ResolveError::EmptyOptions { setting: "s".to_string() });
    }

    #[test]
    fn test_slider_requires_all_bounds() {
        let err = resolve(
            "name: D\nid: d\nsettings:\n  - id: s\n    title: S\n    type: variable-number-slider\n    default: 4\n    min: 0\n    max: 10",
        )
        .unwrap_err();
        assert_eq!(
            err,
            ResolveError::MissingField {
                setting: "s".to_string(),
                field: "step",
            }
        );
    }

    #[test]
    fn test_themed_color_requires_both_halves() {
        let err = resolve(
            "name: D\nid: d\nsettings:\n  - id: bg\n    title: BG\n    type: variable-themed-color\n    default-light: '#fff'",
        )
        .unwrap_err();
        assert_eq!(
            err,
            ResolveError::MissingField {
                setting: "bg".to_string(),
                field: "default-dark",
            }
        );
    }

    #[test]
    fn test_color_format_validation() {
        let section = resolve(
            "name: D\nid: d\nsettings:\n  - id: c\n    title: C\n    type: variable-color\n    default: '#abc'\n    format: rgb",
        )
        .unwrap()
        .unwrap();
        assert_eq!(
            section.settings[0].kind,
            SettingKind::VariableColor {
                default: "#abc".to_string(),
                format: ColorFormat::Rgb,
            }
        );

        let err = resolve(
            "name: D\nid: d\nsettings:\n  - id: c\n    title: C\n    type: variable-color\n    default: '#abc'\n    format: cmyk",
        )
        .unwrap_err();
        assert!(matches!(err, ResolveError::InvalidField { field: "format", .. }));
    }

    #[test]
    fn test_wrongly_typed_field_is_an_error() {
        let err = resolve(
            "name: D\nid: d\nsettings:\n  - id: t\n    title: T\n    type: variable-number\n    default: not-a-number",
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ResolveError::InvalidField {
                field: "default",
                ..
            }
        ));
    }
}
