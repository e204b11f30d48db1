//! The host document surface.
//!
//! Everything styletune does to the live document goes through
//! [`HostSurface`]: reading stylesheet texts, toggling body classes, and
//! setting scoped custom properties. Embedders implement the trait over
//! their real document; [`MemoryHost`] is the reference implementation used
//! by tests and headless embedders.
//!
//! All methods take `&self`: the system runs on a single cooperative
//! execution context, so implementations use interior mutability rather
//! than forcing exclusive borrows through the whole session.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

/// Which root style scope a custom property applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Scope {
    /// The plain document root.
    Default,
    /// The light-theme scoped root.
    Light,
    /// The dark-theme scoped root.
    Dark,
}

/// The document-side capabilities styletune consumes.
///
/// Class and property mutation is total: adding a class twice or removing
/// an absent property is a no-op, never an error.
pub trait HostSurface {
    /// The current stylesheet texts, in document order.
    fn stylesheets(&self) -> Vec<String>;
    fn add_body_class(&self, class: &str);
    fn remove_body_class(&self, class: &str);
    fn set_property(&self, scope: Scope, name: &str, value: &str);
    fn remove_property(&self, scope: Scope, name: &str);
}

impl<T: HostSurface + ?Sized> HostSurface for Rc<T> {
    fn stylesheets(&self) -> Vec<String> {
        (**self).stylesheets()
    }

    fn add_body_class(&self, class: &str) {
        (**self).add_body_class(class)
    }

    fn remove_body_class(&self, class: &str) {
        (**self).remove_body_class(class)
    }

    fn set_property(&self, scope: Scope, name: &str, value: &str) {
        (**self).set_property(scope, name, value)
    }

    fn remove_property(&self, scope: Scope, name: &str) {
        (**self).remove_property(scope, name)
    }
}

/// In-memory [`HostSurface`] recording applied classes and properties.
#[derive(Debug, Default)]
pub struct MemoryHost {
    sheets: RefCell<Vec<String>>,
    classes: RefCell<Vec<String>>,
    properties: RefCell<BTreeMap<(Scope, String), String>>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the held stylesheet texts.
    pub fn set_stylesheets(&self, sheets: Vec<String>) {
        *self.sheets.borrow_mut() = sheets;
    }

    pub fn push_stylesheet(&self, sheet: impl Into<String>) {
        self.sheets.borrow_mut().push(sheet.into());
    }

    /// The currently applied body classes, in application order.
    pub fn classes(&self) -> Vec<String> {
        self.classes.borrow().clone()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.borrow().iter().any(|c| c == class)
    }

    /// The value of one applied property, if set.
    pub fn property(&self, scope: Scope, name: &str) -> Option<String> {
        self.properties
            .borrow()
            .get(&(scope, name.to_string()))
            .cloned()
    }

    /// All applied properties for one scope.
    pub fn properties(&self, scope: Scope) -> BTreeMap<String, String> {
        self.properties
            .borrow()
            .iter()
            .filter(|((s, _), _)| *s == scope)
            .map(|((_, name), value)| (name.clone(), value.clone()))
            .collect()
    }

    pub fn property_count(&self) -> usize {
        self.properties.borrow().len()
    }
}

impl HostSurface for MemoryHost {
    fn stylesheets(&self) -> Vec<String> {
        self.sheets.borrow().clone()
    }

    fn add_body_class(&self, class: &str) {
        let mut classes = self.classes.borrow_mut();
        if !classes.iter().any(|c| c == class) {
            classes.push(class.to_string());
        }
    }

    fn remove_body_class(&self, class: &str) {
        self.classes.borrow_mut().retain(|c| c != class);
    }

    fn set_property(&self, scope: Scope, name: &str, value: &str) {
        self.properties
            .borrow_mut()
            .insert((scope, name.to_string()), value.to_string());
    }

    fn remove_property(&self, scope: Scope, name: &str) {
        self.properties
            .borrow_mut()
            .remove(&(scope, name.to_string()));
    }
}
