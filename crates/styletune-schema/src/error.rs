//! Error types for schema parsing and resolution.

use thiserror::Error;

/// Structural parse failure of an extracted schema block.
///
/// Carries the source name (the stylesheet's `name:` directive) so the
/// failure can be attributed when several stylesheets contribute blocks.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SchemaError {
    /// The block's text is not valid structural markup.
    #[error("failed to parse settings from '{name}': {message}")]
    Syntax {
        /// Source name the block was extracted under.
        name: String,
        /// Message from the underlying YAML parser.
        message: String,
    },
}

/// Semantic validation failure while resolving a parsed block into a
/// typed [`Section`](crate::Section).
///
/// A resolution error is fatal for the whole section: a partially-typed
/// section is unsafe to present, so the caller records the error and
/// drops the block. Sibling blocks are unaffected.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResolveError {
    /// A settings entry is not a mapping.
    #[error("setting entry is not a mapping")]
    NotAMapping,

    /// A required field is absent.
    #[error("setting '{setting}' is missing required field '{field}'")]
    MissingField {
        setting: String,
        field: &'static str,
    },

    /// A field is present but has the wrong shape.
    #[error("setting '{setting}' field '{field}' must be {expected}")]
    InvalidField {
        setting: String,
        field: &'static str,
        expected: &'static str,
    },

    /// The `type` tag names no known setting variant.
    #[error("setting '{setting}' has unknown type '{value}'")]
    UnknownType { setting: String, value: String },

    /// Two settings in one section share an id.
    #[error("duplicate setting id '{id}'")]
    DuplicateSetting { id: String },

    /// A select variant declared no options.
    #[error("setting '{setting}' requires a non-empty 'options' list")]
    EmptyOptions { setting: String },

    /// A select default names no declared option.
    #[error("setting '{setting}' default '{value}' matches no option")]
    UnknownDefault { setting: String, value: String },
}
