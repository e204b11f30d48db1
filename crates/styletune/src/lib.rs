//! Live theme settings for CSS-embedded schemas.
//!
//! `styletune` is the live half of the styletune system: it takes the
//! typed sections produced by [`styletune-schema`](styletune_schema) and
//! keeps a host document in sync with them — a value store with merge and
//! persistence semantics, a style applier translating values into body
//! classes and scoped custom properties, toggle-command registration, and
//! a debounced session driving the whole pipeline on style changes.
//!
//! # Architecture
//!
//! ```text
//! host stylesheets
//!       |
//!       v                    styletune-schema
//! [Session] --(debounced)--> parse_stylesheets
//!       |                          |
//!       v                          v
//! [SettingsStore] <--merge-- sections + errors
//!       |
//!       v
//! [StyleApplier] --> body classes + custom properties (default/light/dark)
//! ```
//!
//! The host document and command palette sit behind the [`HostSurface`]
//! and [`CommandHost`] traits; [`MemoryHost`] and [`MemoryCommandHost`]
//! are headless reference implementations. Persistence sits behind
//! [`SettingsPersistence`], with JSON-file and in-memory implementations.
//!
//! # Example
//!
//! ```rust
//! use std::rc::Rc;
//! use std::time::Instant;
//! use styletune::{
//!     MemoryCommandHost, MemoryHost, MemoryPersistence, Session, SettingValue,
//! };
//!
//! let host = Rc::new(MemoryHost::new());
//! host.push_stylesheet(r#"
//! /* @settings
//! name: Demo
//! id: demo
//! settings:
//!   - id: accent
//!     title: Accent color
//!     type: class-toggle
//! */
//! "#);
//!
//! let mut session = Session::new(
//!     Box::new(Rc::clone(&host)),
//!     Box::new(Rc::new(MemoryCommandHost::new())),
//!     Box::new(Rc::new(MemoryPersistence::new())),
//! );
//! session.start(Instant::now());
//! session.refresh_now();
//!
//! session.set_value("demo", "accent", SettingValue::Bool(true));
//! assert!(host.has_class("accent"));
//! ```

pub mod apply;
pub mod commands;
pub mod debounce;
pub mod host;
pub mod persist;
pub mod session;
pub mod store;

pub use apply::StyleApplier;
pub use commands::{command_id, CommandBinding, CommandHost, CommandRegistry, MemoryCommandHost};
pub use debounce::Debouncer;
pub use host::{HostSurface, MemoryHost, Scope};
pub use persist::{
    JsonFilePersistence, MemoryPersistence, PersistedSection, PersistedSettings,
    SettingsPersistence,
};
pub use session::{Session, SettingsConsumer, CHANGE_ORIGIN, DEBOUNCE_DELAY};
pub use store::SettingsStore;

// Re-export the schema crate's public surface so embedders need only one
// dependency.
pub use styletune_schema as schema;
pub use styletune_schema::{
    global_key, parse_stylesheets, ColorFormat, ErrorRecord, ParseOutcome, ResolveError,
    SchemaError, Section, Setting, SettingKind, SettingOption, SettingValue, KEY_SEPARATOR,
};
