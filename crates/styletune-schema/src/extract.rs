//! Schema block extraction from raw stylesheet text.
//!
//! A theme stylesheet announces itself with a `name:` directive and embeds
//! its settings schema inside one or more `/* @settings ... */` comment
//! fences. Everything else in the sheet is opaque CSS as far as this crate
//! is concerned.
//!
//! # Example
//!
//! ```rust
//! use styletune_schema::extract_blocks;
//!
//! let css = r#"
//! /* @settings
//! name: Demo Theme
//! id: demo
//! settings:
//!   - id: accent
//!     title: Accent
//!     type: class-toggle
//! */
//! body { color: red; }
//! "#;
//!
//! let blocks = extract_blocks(css);
//! assert_eq!(blocks.len(), 1);
//! assert_eq!(blocks[0].source, "Demo Theme");
//! ```

use once_cell::sync::Lazy;
use regex::Regex;

/// Matches the stylesheet's logical name: the first `name:` line anywhere
/// in the sheet text. In practice this is the `name:` field of the first
/// schema block itself.
static NAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^name:\s*(.+)$").expect("valid name pattern"));

/// Matches one fenced schema region. An unterminated fence simply fails to
/// match; whatever it swallowed surfaces later through the structural
/// parser of a block that did match, if at all.
static BLOCK_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)/\*\s*@settings[\r\n]+(.+?)\*/").expect("valid block pattern"));

/// One raw schema region extracted from a stylesheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaBlock {
    /// The sheet's logical name, shared by every block in the sheet.
    pub source: String,
    /// The fenced region's inner text, untrimmed of internal structure.
    pub body: String,
}

/// Extracts every schema block from one stylesheet's text.
///
/// Returns an empty vec when the sheet has no `name:` directive, even if a
/// fence is present. This is the common case of a non-theme stylesheet and
/// is never an error.
pub fn extract_blocks(css: &str) -> Vec<SchemaBlock> {
    let text = css.trim();
    if text.is_empty() {
        return Vec::new();
    }

    let name = match NAME_PATTERN.captures(text) {
        Some(captures) => captures[1].trim().to_string(),
        None => return Vec::new(),
    };

    let blocks: Vec<SchemaBlock> = BLOCK_PATTERN
        .captures_iter(text)
        .map(|captures| SchemaBlock {
            source: name.clone(),
            body: captures[1].trim().to_string(),
        })
        .collect();

    if !blocks.is_empty() {
        log::debug!("extracted {} schema block(s) from '{}'", blocks.len(), name);
    }

    blocks
}
