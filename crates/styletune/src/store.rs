//! The mutable settings-value model.
//!
//! [`SettingsStore`] holds the currently loaded sections, the flat map of
//! effective values keyed `<section>@@<setting>`, remembered section
//! display names, and the persistence hand-off. It knows nothing about the
//! document: applying styles is the caller's job.
//!
//! # Merge semantics
//!
//! [`SettingsStore::merge`] replaces the section list wholesale. Values are
//! reconciled conservatively:
//!
//! - a setting newly discovered with no stored value gets its default;
//! - a stored value whose section is still loaded but whose setting is
//!   gone is pruned;
//! - values of an entirely absent section are pruned only when the parse
//!   pass had no errors — a transient parse failure must not destroy a
//!   user's saved values.

use std::collections::{BTreeMap, BTreeSet};

use styletune_schema::{Section, SettingValue, KEY_SEPARATOR};

use crate::persist::{PersistedSection, PersistedSettings, SettingsPersistence};

/// The live value store plus persistence hand-off.
pub struct SettingsStore {
    sections: Vec<Section>,
    /// Effective values keyed `<section>@@<setting>` (themed colors add a
    /// further `@@light` / `@@dark` suffix).
    values: BTreeMap<String, SettingValue>,
    /// Remembered display names by section id, kept for sections that are
    /// not currently loaded.
    names: BTreeMap<String, String>,
    persistence: Box<dyn SettingsPersistence>,
}

impl SettingsStore {
    pub fn new(persistence: Box<dyn SettingsPersistence>) -> Self {
        SettingsStore {
            sections: Vec::new(),
            values: BTreeMap::new(),
            names: BTreeMap::new(),
            persistence,
        }
    }

    /// Populates values and remembered names from persisted storage.
    /// Missing or empty prior state yields an empty map.
    pub fn load(&mut self) {
        let document = self.persistence.load().unwrap_or_default();
        self.values.clear();
        self.names.clear();
        for (section_id, section) in document {
            if let Some(name) = section.name {
                self.names.insert(section_id.clone(), name);
            }
            for (key, value) in section.values {
                self.values
                    .insert(format!("{section_id}{KEY_SEPARATOR}{key}"), value);
            }
        }
        log::debug!("loaded {} stored value(s)", self.values.len());
    }

    /// The currently loaded sections.
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn section(&self, section_id: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == section_id)
    }

    /// Replaces the section list and reconciles the value map against it.
    ///
    /// `parse_had_errors` guards pruning of absent sections: when true,
    /// values (and remembered names) of sections missing from `sections`
    /// are kept, since the absence may be a transient parse failure.
    pub fn merge(&mut self, sections: Vec<Section>, parse_had_errors: bool) {
        self.sections = sections;

        // Every value key the new sections account for, with defaults for
        // keys that have no stored value yet.
        let mut known = BTreeSet::new();
        let mut inserted = 0usize;
        for section in &self.sections {
            for setting in &section.settings {
                for key in setting.value_keys() {
                    let global = format!("{}{KEY_SEPARATOR}{key}", section.id);
                    if !self.values.contains_key(&global) {
                        if let Some(default) = setting.default_for_key(&key) {
                            self.values.insert(global.clone(), default);
                            inserted += 1;
                        }
                    }
                    known.insert(global);
                }
            }
        }

        let live_ids: BTreeSet<&str> = self.sections.iter().map(|s| s.id.as_str()).collect();

        let stale: Vec<String> = self
            .values
            .keys()
            .filter(|key| {
                if known.contains(*key) {
                    return false;
                }
                let section_id = key.split(KEY_SEPARATOR).next().unwrap_or_default();
                // A key of a loaded section that no setting accounts for
                // is always stale; an absent section's keys are stale only
                // once a clean pass confirms the removal.
                live_ids.contains(section_id) || !parse_had_errors
            })
            .map(String::clone)
            .collect();
        for key in &stale {
            self.values.remove(key);
        }

        if !parse_had_errors {
            self.names
                .retain(|section_id, _| live_ids.contains(section_id.as_str()));
        }
        for section in &self.sections {
            self.names.insert(section.id.clone(), section.name.clone());
        }

        log::debug!(
            "merged {} section(s): {inserted} default(s) inserted, {} value(s) pruned",
            self.sections.len(),
            stale.len()
        );

        if !stale.is_empty() {
            self.persist();
        }
    }

    /// The effective value for a setting, if any.
    pub fn get(&self, section_id: &str, setting_id: &str) -> Option<&SettingValue> {
        self.values
            .get(&styletune_schema::global_key(section_id, setting_id))
    }

    /// The effective value for a prejoined global key.
    pub fn get_key(&self, key: &str) -> Option<&SettingValue> {
        self.values.get(key)
    }

    /// Updates one value and hands off persistence. Last write wins;
    /// applying styles is the caller's responsibility.
    pub fn set(&mut self, section_id: &str, setting_id: &str, value: SettingValue) {
        self.values
            .insert(styletune_schema::global_key(section_id, setting_id), value);
        self.persist();
    }

    /// Restores one setting to its default (or removes its value when the
    /// setting declares none), then persists.
    pub fn reset(&mut self, section_id: &str, setting_id: &str) {
        let default = self
            .section(section_id)
            .and_then(|section| {
                section.settings.iter().find(|setting| {
                    setting
                        .value_keys()
                        .iter()
                        .any(|key| key.as_str() == setting_id)
                })
            })
            .and_then(|setting| setting.default_for_key(setting_id));

        let key = styletune_schema::global_key(section_id, setting_id);
        match default {
            Some(value) => {
                self.values.insert(key, value);
            }
            None => {
                self.values.remove(&key);
            }
        }
        self.persist();
    }

    /// Restores every setting of a section to its defaults, then persists.
    pub fn reset_section(&mut self, section_id: &str) {
        let keys: Vec<String> = match self.section(section_id) {
            Some(section) => section
                .settings
                .iter()
                .flat_map(|setting| setting.value_keys())
                .collect(),
            None => return,
        };
        for key in keys {
            self.reset(section_id, &key);
        }
    }

    /// The persisted document for the current state: every stored value
    /// grouped by section id, with the remembered display name attached.
    /// Sections absent from the current parse keep their entries.
    pub fn snapshot(&self) -> PersistedSettings {
        let mut document = PersistedSettings::new();
        for (key, value) in &self.values {
            let (section_id, setting_key) = match key.split_once(KEY_SEPARATOR) {
                Some(parts) => parts,
                None => continue,
            };
            let entry = document
                .entry(section_id.to_string())
                .or_insert_with(|| PersistedSection {
                    name: self.names.get(section_id).cloned(),
                    values: BTreeMap::new(),
                });
            entry
                .values
                .insert(setting_key.to_string(), value.clone());
        }
        document
    }

    /// Fire-and-forget save of the current snapshot.
    pub fn persist(&self) {
        self.persistence.save(&self.snapshot());
    }
}
