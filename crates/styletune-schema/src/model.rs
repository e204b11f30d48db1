//! The typed settings model.
//!
//! A resolved schema block becomes a [`Section`] holding an ordered list of
//! [`Setting`]s. Each setting is polymorphic over a closed set of kinds,
//! modeled as the [`SettingKind`] tagged union: resolution is one exhaustive
//! dispatch over the `type` tag, and an unknown tag is an explicit error,
//! never a silent no-op.
//!
//! Settings split into two families:
//!
//! - **class producers** (`class-toggle`, `class-select`) toggle body
//!   classes on the host document;
//! - **value producers** (`variable-*`) set CSS custom properties, with
//!   `variable-themed-color` contributing separate light and dark scoped
//!   values.
//!
//! `heading` and `info-text` are presentational only and carry no value.

use serde::{Deserialize, Serialize};

/// Separator joining section and setting ids into a global value key, and
/// suffixing the light/dark halves of a themed color.
pub const KEY_SEPARATOR: &str = "@@";

/// The global value-store key for a setting: `<section>@@<setting>`.
pub fn global_key(section_id: &str, setting_id: &str) -> String {
    format!("{section_id}{KEY_SEPARATOR}{setting_id}")
}

/// One configurable value carried by the store, persisted storage, and the
/// schema defaults. The semantic type depends on the owning setting's kind:
/// booleans for toggles, numbers for sliders, text for everything else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl SettingValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            SettingValue::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            SettingValue::Number(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            SettingValue::Text(value) => Some(value),
            _ => None,
        }
    }
}

impl From<bool> for SettingValue {
    fn from(value: bool) -> Self {
        SettingValue::Bool(value)
    }
}

impl From<f64> for SettingValue {
    fn from(value: f64) -> Self {
        SettingValue::Number(value)
    }
}

impl From<&str> for SettingValue {
    fn from(value: &str) -> Self {
        SettingValue::Text(value.to_string())
    }
}

impl From<String> for SettingValue {
    fn from(value: String) -> Self {
        SettingValue::Text(value)
    }
}

/// One choice of a select-type setting: the applied value plus its display
/// label. In schema text an option may be a plain string, in which case the
/// label and value coincide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingOption {
    pub label: String,
    pub value: String,
}

impl SettingOption {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        SettingOption {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Declared format tag of a color setting. Validated at resolution; values
/// are applied verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorFormat {
    #[default]
    Hex,
    Rgb,
    Hsl,
}

/// The closed set of setting variants, tagged by the schema's `type` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SettingKind {
    /// A presentational section heading.
    Heading { level: u8, collapsed: bool },
    /// A presentational text blurb, optionally rendered as markdown.
    InfoText { markdown: bool },
    /// A boolean toggling one body class named after the setting id.
    ClassToggle {
        default: bool,
        /// Marks the toggle eligible for host command registration.
        add_command: bool,
    },
    /// A single choice applying exactly one of several classes.
    ClassSelect {
        options: Vec<SettingOption>,
        allow_empty: bool,
        /// Selected option value. `None` only when `allow_empty` is set.
        default: Option<String>,
    },
    /// A free-text custom property.
    VariableText {
        default: String,
        /// Wrap the applied value in double quotes.
        quotes: bool,
    },
    /// A numeric custom property.
    VariableNumber {
        default: f64,
        /// Suffix appended to the applied number, e.g. `px`.
        format: Option<String>,
    },
    /// A bounded numeric custom property.
    VariableNumberSlider {
        default: f64,
        min: f64,
        max: f64,
        step: f64,
        format: Option<String>,
    },
    /// A single choice among custom-property values.
    VariableSelect {
        options: Vec<SettingOption>,
        default: String,
    },
    /// A color custom property.
    VariableColor {
        default: String,
        format: ColorFormat,
    },
    /// A color custom property with separate light and dark values.
    VariableThemedColor {
        default_light: String,
        default_dark: String,
        format: ColorFormat,
    },
}

impl SettingKind {
    /// The schema `type` tag this variant was resolved from.
    pub fn tag(&self) -> &'static str {
        match self {
            SettingKind::Heading { .. } => "heading",
            SettingKind::InfoText { .. } => "info-text",
            SettingKind::ClassToggle { .. } => "class-toggle",
            SettingKind::ClassSelect { .. } => "class-select",
            SettingKind::VariableText { .. } => "variable-text",
            SettingKind::VariableNumber { .. } => "variable-number",
            SettingKind::VariableNumberSlider { .. } => "variable-number-slider",
            SettingKind::VariableSelect { .. } => "variable-select",
            SettingKind::VariableColor { .. } => "variable-color",
            SettingKind::VariableThemedColor { .. } => "variable-themed-color",
        }
    }
}

/// One configurable item within a section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Setting {
    /// Unique within the owning section.
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub kind: SettingKind,
}

impl Setting {
    /// The setting-scoped value keys this setting contributes to the value
    /// store. Presentational kinds contribute none; a themed color
    /// contributes a light and a dark key; everything else its own id.
    pub fn value_keys(&self) -> Vec<String> {
        match &self.kind {
            SettingKind::Heading { .. } | SettingKind::InfoText { .. } => Vec::new(),
            SettingKind::VariableThemedColor { .. } => vec![
                format!("{}{KEY_SEPARATOR}light", self.id),
                format!("{}{KEY_SEPARATOR}dark", self.id),
            ],
            _ => vec![self.id.clone()],
        }
    }

    /// The default value for one of this setting's value keys, or `None`
    /// when the setting carries no default (presentational kinds, or an
    /// empty-allowed class select without one).
    pub fn default_for_key(&self, key: &str) -> Option<SettingValue> {
        match &self.kind {
            SettingKind::Heading { .. } | SettingKind::InfoText { .. } => None,
            SettingKind::ClassToggle { default, .. } => Some(SettingValue::Bool(*default)),
            SettingKind::ClassSelect { default, .. } => {
                default.as_deref().map(SettingValue::from)
            }
            SettingKind::VariableText { default, .. } => Some(SettingValue::from(default.as_str())),
            SettingKind::VariableNumber { default, .. }
            | SettingKind::VariableNumberSlider { default, .. } => {
                Some(SettingValue::Number(*default))
            }
            SettingKind::VariableSelect { default, .. }
            | SettingKind::VariableColor { default, .. } => {
                Some(SettingValue::from(default.as_str()))
            }
            SettingKind::VariableThemedColor {
                default_light,
                default_dark,
                ..
            } => {
                if key.ends_with("light") {
                    Some(SettingValue::from(default_light.as_str()))
                } else {
                    Some(SettingValue::from(default_dark.as_str()))
                }
            }
        }
    }

    /// Whether this setting is a class toggle flagged for host command
    /// registration.
    pub fn is_command_eligible(&self) -> bool {
        matches!(
            self.kind,
            SettingKind::ClassToggle {
                add_command: true,
                ..
            }
        )
    }
}

/// The resolved, typed representation of one schema block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Unique slug, stable across reparses.
    pub id: String,
    /// Display title.
    pub name: String,
    pub settings: Vec<Setting>,
}

impl Section {
    pub fn setting(&self, setting_id: &str) -> Option<&Setting> {
        self.settings.iter().find(|s| s.id == setting_id)
    }
}

/// One failed schema block: the source name it was extracted under plus the
/// failure message. Recorded alongside surviving sections, never aborting
/// them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorRecord {
    pub name: String,
    pub error: String,
}
