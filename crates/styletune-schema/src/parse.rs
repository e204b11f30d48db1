//! Structural parsing of normalized block text.
//!
//! No grammar of its own: the block body is YAML and parsing is delegated
//! wholly to `serde_yaml`. A failure is wrapped with the source name so it
//! can be attributed among several contributing stylesheets.

use serde_yaml::Value;

use crate::error::SchemaError;

/// Parses one normalized block body into a generic YAML structure.
pub fn parse_document(text: &str, source: &str) -> Result<Value, SchemaError> {
    serde_yaml::from_str(text).map_err(|err| SchemaError::Syntax {
        name: source.to_string(),
        message: err.to_string(),
    })
}
