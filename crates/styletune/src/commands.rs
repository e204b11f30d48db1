//! Host command registration for command-eligible class toggles.
//!
//! A class toggle flagged `addCommand` exposes a stable command id,
//! `styletune-class-toggle-<section>-<setting>`, so the host can offer the
//! toggle in its command palette. The host's command-removal capability is
//! undocumented in some runtimes, so the registry tracks its own bindings
//! and unregisters them one by one on every re-sync.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use styletune_schema::Section;

/// The command-palette capabilities styletune consumes.
pub trait CommandHost {
    fn register_command(&self, id: &str, name: &str);
    fn unregister_command(&self, id: &str);
}

impl<T: CommandHost + ?Sized> CommandHost for Rc<T> {
    fn register_command(&self, id: &str, name: &str) {
        (**self).register_command(id, name)
    }

    fn unregister_command(&self, id: &str) {
        (**self).unregister_command(id)
    }
}

/// The stable command id for one class toggle.
pub fn command_id(section_id: &str, setting_id: &str) -> String {
    format!("styletune-class-toggle-{section_id}-{setting_id}")
}

/// One registered command and the setting it toggles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandBinding {
    pub command_id: String,
    pub section_id: String,
    pub setting_id: String,
}

/// Tracks the currently registered toggle commands.
#[derive(Debug, Default)]
pub struct CommandRegistry {
    bindings: Vec<CommandBinding>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-syncs registrations after a pipeline run: every previously
    /// registered command is unregistered, then every command-eligible
    /// class toggle in the new sections is registered.
    pub fn sync(&mut self, sections: &[Section], host: &dyn CommandHost) {
        self.clear(host);

        for section in sections {
            for setting in &section.settings {
                if !setting.is_command_eligible() {
                    continue;
                }
                let binding = CommandBinding {
                    command_id: command_id(&section.id, &setting.id),
                    section_id: section.id.clone(),
                    setting_id: setting.id.clone(),
                };
                host.register_command(&binding.command_id, &format!("Toggle {}", setting.title));
                self.bindings.push(binding);
            }
        }
    }

    /// Unregisters everything currently tracked.
    pub fn clear(&mut self, host: &dyn CommandHost) {
        for binding in self.bindings.drain(..) {
            host.unregister_command(&binding.command_id);
        }
    }

    pub fn find(&self, command_id: &str) -> Option<&CommandBinding> {
        self.bindings.iter().find(|b| b.command_id == command_id)
    }

    pub fn bindings(&self) -> &[CommandBinding] {
        &self.bindings
    }
}

/// In-memory [`CommandHost`] recording registrations, for tests and
/// headless embedders.
#[derive(Debug, Default)]
pub struct MemoryCommandHost {
    registered: RefCell<BTreeMap<String, String>>,
}

impl MemoryCommandHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn registered_ids(&self) -> Vec<String> {
        self.registered.borrow().keys().cloned().collect()
    }

    pub fn name_of(&self, id: &str) -> Option<String> {
        self.registered.borrow().get(id).cloned()
    }
}

impl CommandHost for MemoryCommandHost {
    fn register_command(&self, id: &str, name: &str) {
        self.registered
            .borrow_mut()
            .insert(id.to_string(), name.to_string());
    }

    fn unregister_command(&self, id: &str) {
        self.registered.borrow_mut().remove(id);
    }
}
