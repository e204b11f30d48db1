//! The owning session: debounced pipeline runs over a host document.
//!
//! A [`Session`] ties the whole system together. Style-change notifications
//! from the host arm a trailing-edge debouncer; when it fires, the session
//! reparses every stylesheet, merges the outcome into the store, reconciles
//! the applied style state, re-syncs toggle commands, and pushes the new
//! sections and errors to every registered UI consumer.
//!
//! All state lives on the session object, never in ambient globals, so
//! multiple sessions (e.g. in tests) do not interfere. Teardown cancels any
//! pending run and clears every applied class, property, and command; there
//! is no partial-teardown state.

use std::time::{Duration, Instant};

use styletune_schema::{parse_stylesheets, ErrorRecord, Section, SettingValue};

use crate::apply::StyleApplier;
use crate::commands::{CommandHost, CommandRegistry};
use crate::debounce::Debouncer;
use crate::host::HostSurface;
use crate::persist::SettingsPersistence;
use crate::store::SettingsStore;

/// Origin tag the session stamps on its own style mutations. Change
/// notifications carrying it are ignored, so self-caused echoes never
/// re-trigger the pipeline.
pub const CHANGE_ORIGIN: &str = "styletune";

/// Default trailing-edge debounce window for style-change bursts.
pub const DEBOUNCE_DELAY: Duration = Duration::from_millis(100);

/// A UI consumer re-deriving its controls from each pipeline run. No
/// incremental diffing is expected of it.
pub trait SettingsConsumer {
    fn set_settings(&self, sections: &[Section], errors: &[ErrorRecord]);
    fn rerender(&self);
}

/// One plugin session: store, applier, debouncer, command registry, and
/// the host collaborators, all owned.
pub struct Session {
    store: SettingsStore,
    applier: StyleApplier,
    debouncer: Debouncer,
    commands: CommandRegistry,
    host: Box<dyn HostSurface>,
    command_host: Box<dyn CommandHost>,
    consumers: Vec<Box<dyn SettingsConsumer>>,
    errors: Vec<ErrorRecord>,
}

impl Session {
    pub fn new(
        host: Box<dyn HostSurface>,
        command_host: Box<dyn CommandHost>,
        persistence: Box<dyn SettingsPersistence>,
    ) -> Self {
        Session {
            store: SettingsStore::new(persistence),
            applier: StyleApplier::new(),
            debouncer: Debouncer::new(DEBOUNCE_DELAY),
            commands: CommandRegistry::new(),
            host,
            command_host,
            consumers: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn with_debounce(mut self, delay: Duration) -> Self {
        self.debouncer = Debouncer::new(delay);
        self
    }

    pub fn add_consumer(&mut self, consumer: Box<dyn SettingsConsumer>) {
        self.consumers.push(consumer);
    }

    /// Loads persisted values and arms the debouncer for the initial
    /// parse.
    pub fn start(&mut self, now: Instant) {
        self.store.load();
        self.debouncer.trigger(now);
    }

    /// A style-change notification from the host. Notifications carrying
    /// the session's own [`CHANGE_ORIGIN`] are ignored; any other
    /// arms/resets the debounce timer.
    pub fn notify_style_change(&mut self, origin: Option<&str>, now: Instant) {
        if origin == Some(CHANGE_ORIGIN) {
            return;
        }
        self.debouncer.trigger(now);
    }

    /// Runs the pipeline when the debounce window has elapsed. Returns
    /// whether a run happened. Only one run is ever in flight; a trigger
    /// during the window resets the timer rather than queuing a second
    /// run.
    pub fn poll(&mut self, now: Instant) -> bool {
        if !self.debouncer.fire_if_due(now) {
            return false;
        }
        self.run_pipeline();
        true
    }

    /// Cancels any pending timer and runs the pipeline immediately.
    pub fn refresh_now(&mut self) {
        self.debouncer.cancel();
        self.run_pipeline();
    }

    fn run_pipeline(&mut self) {
        let sheets = self.host.stylesheets();
        let outcome = parse_stylesheets(sheets.iter().map(String::as_str));

        self.errors = outcome.errors;
        let had_errors = !self.errors.is_empty();
        self.store.merge(outcome.sections, had_errors);
        self.applier.apply(&self.store, &*self.host);
        self.commands.sync(self.store.sections(), &*self.command_host);

        for consumer in &self.consumers {
            consumer.set_settings(self.store.sections(), &self.errors);
        }
    }

    /// The error records of the last pipeline run.
    pub fn errors(&self) -> &[ErrorRecord] {
        &self.errors
    }

    pub fn sections(&self) -> &[Section] {
        self.store.sections()
    }

    pub fn get_value(&self, section_id: &str, setting_id: &str) -> Option<&SettingValue> {
        self.store.get(section_id, setting_id)
    }

    /// Sets one value, reapplies styles immediately, and asks consumers to
    /// rerender. No reparse happens: the schema is unchanged.
    pub fn set_value(&mut self, section_id: &str, setting_id: &str, value: SettingValue) {
        self.store.set(section_id, setting_id, value);
        self.applier.apply(&self.store, &*self.host);
        for consumer in &self.consumers {
            consumer.rerender();
        }
    }

    /// Invokes a registered toggle command: negates the stored boolean,
    /// reapplies, rerenders. Returns false for an unknown command id.
    pub fn run_command(&mut self, command_id: &str) -> bool {
        let (section_id, setting_id) = match self.commands.find(command_id) {
            Some(binding) => (binding.section_id.clone(), binding.setting_id.clone()),
            None => return false,
        };
        let current = self
            .store
            .get(&section_id, &setting_id)
            .and_then(SettingValue::as_bool)
            .unwrap_or(false);
        self.set_value(&section_id, &setting_id, SettingValue::Bool(!current));
        true
    }

    /// Ends the session: cancels any pending run, unregisters every
    /// command, removes every applied class and property, and empties the
    /// consumers' settings.
    pub fn teardown(&mut self) {
        self.debouncer.cancel();
        self.commands.clear(&*self.command_host);
        self.applier.teardown(&*self.host);
        self.errors.clear();
        for consumer in &self.consumers {
            consumer.set_settings(&[], &[]);
        }
    }
}
