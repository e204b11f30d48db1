//! Persistence of user-chosen setting values.
//!
//! The persisted document maps section id to that section's display name
//! and per-setting values. It is merged, not replaced wholesale, across
//! reparses: a section that momentarily fails to parse keeps its saved
//! values until a clean pass confirms its removal.
//!
//! Persistence is fire-and-forget from the store's point of view: a failed
//! save is logged, never propagated, and never blocks further `set` calls.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use styletune_schema::SettingValue;

/// One section's persisted state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersistedSection {
    /// Remembered display name, used when the section is not currently
    /// loaded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Setting-scoped key (themed colors suffix `@@light` / `@@dark`) to
    /// stored value.
    #[serde(default)]
    pub values: BTreeMap<String, SettingValue>,
}

/// The whole persisted document, keyed by section id.
pub type PersistedSettings = BTreeMap<String, PersistedSection>;

/// External storage for the persisted document.
pub trait SettingsPersistence {
    /// Loads the prior state. Missing or unreadable state yields `None`;
    /// the caller starts from an empty document.
    fn load(&self) -> Option<PersistedSettings>;
    /// Saves the document. Failures are the implementation's to log; they
    /// must not propagate.
    fn save(&self, document: &PersistedSettings);
}

impl<T: SettingsPersistence + ?Sized> SettingsPersistence for Rc<T> {
    fn load(&self) -> Option<PersistedSettings> {
        (**self).load()
    }

    fn save(&self, document: &PersistedSettings) {
        (**self).save(document)
    }
}

/// Pretty-printed JSON at a filesystem path.
#[derive(Debug, Clone)]
pub struct JsonFilePersistence {
    path: PathBuf,
}

impl JsonFilePersistence {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFilePersistence { path: path.into() }
    }
}

impl SettingsPersistence for JsonFilePersistence {
    fn load(&self) -> Option<PersistedSettings> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(_) => return None,
        };
        if text.trim().is_empty() {
            return None;
        }
        match serde_json::from_str(&text) {
            Ok(document) => Some(document),
            Err(err) => {
                log::warn!(
                    "ignoring unreadable settings file {}: {err}",
                    self.path.display()
                );
                None
            }
        }
    }

    fn save(&self, document: &PersistedSettings) {
        let json = match serde_json::to_string_pretty(document) {
            Ok(json) => json,
            Err(err) => {
                log::warn!("failed to serialize settings: {err}");
                return;
            }
        };
        if let Err(err) = fs::write(&self.path, json) {
            log::warn!(
                "failed to save settings to {}: {err}",
                self.path.display()
            );
        }
    }
}

/// In-memory persistence for tests and embedders without a filesystem.
#[derive(Debug, Default)]
pub struct MemoryPersistence {
    document: RefCell<Option<PersistedSettings>>,
    saves: Cell<usize>,
}

impl MemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(document: PersistedSettings) -> Self {
        MemoryPersistence {
            document: RefCell::new(Some(document)),
            saves: Cell::new(0),
        }
    }

    /// The last saved document, if any.
    pub fn document(&self) -> Option<PersistedSettings> {
        self.document.borrow().clone()
    }

    /// How many times `save` has been called.
    pub fn save_count(&self) -> usize {
        self.saves.get()
    }
}

impl SettingsPersistence for MemoryPersistence {
    fn load(&self) -> Option<PersistedSettings> {
        self.document.borrow().clone()
    }

    fn save(&self, document: &PersistedSettings) {
        *self.document.borrow_mut() = Some(document.clone());
        self.saves.set(self.saves.get() + 1);
    }
}
