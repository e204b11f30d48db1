//! Extraction and typed resolution of settings schemas embedded in CSS.
//!
//! Theme stylesheets can embed a declarative settings schema inside a
//! `/* @settings ... */` comment fence. This crate locates those blocks in
//! raw stylesheet text, normalizes their indentation, parses them as YAML,
//! and resolves the result into a closed set of typed setting variants with
//! validated defaults.
//!
//! The crate is the parsing half of the styletune system; the `styletune`
//! crate adds the live half (value store, style application, session).
//!
//! # Pipeline
//!
//! ```text
//! stylesheet text -> extract -> normalize indentation -> parse -> resolve
//! ```
//!
//! [`parse_stylesheets`] runs the whole pipeline over many sheets and
//! collects surviving [`Section`]s next to per-block [`ErrorRecord`]s; one
//! malformed block never prevents another valid section from loading.
//!
//! # Example
//!
//! ```rust
//! use styletune_schema::parse_stylesheets;
//!
//! let css = r#"
//! /* @settings
//! name: Demo
//! id: demo
//! settings:
//!   - id: accent
//!     title: Accent color
//!     type: class-toggle
//!     default: false
//! */
//! "#;
//!
//! let outcome = parse_stylesheets([css]);
//! assert!(outcome.errors.is_empty());
//! assert_eq!(outcome.sections[0].id, "demo");
//! ```

pub mod error;
pub mod extract;
pub mod indent;
pub mod model;
pub mod parse;
pub mod pipeline;
pub mod resolve;

pub use error::{ResolveError, SchemaError};
pub use extract::{extract_blocks, SchemaBlock};
pub use indent::{detect_indent, normalize_indentation, DetectedIndent, IndentKind};
pub use model::{
    global_key, ColorFormat, ErrorRecord, Section, Setting, SettingKind, SettingOption,
    SettingValue, KEY_SEPARATOR,
};
pub use parse::parse_document;
pub use pipeline::{parse_stylesheets, ParseOutcome};
pub use resolve::resolve_section;
