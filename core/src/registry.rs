//! Custom element registry.
//!
//! A [`Registry`] maps element names to [`Definition`]s. It is an explicit,
//! caller-owned handle that the resolver is built with, so independent render
//! sessions can use isolated registries. For callers that prefer a process-wide
//! table, each thread also owns a default registry reachable through
//! [`Registry::global`] and the free functions in this module.

use core::fmt;
use std::{cell::RefCell, collections::HashMap, rc::Rc};

use crate::{OutputSlot, Props, RenderError};

/// A custom element definition.
///
/// The definition is called once per occurrence with that occurrence's output
/// slot and props. It must eventually call [`OutputSlot::inject`] exactly once.
/// Returning an error fails the enclosing render generation.
#[derive(Clone)]
pub struct Definition(Rc<dyn Fn(OutputSlot, Props) -> anyhow::Result<()>>);

impl Definition {
    /// Wraps a definition function.
    pub fn new<F>(definition: F) -> Self
    where
        F: Fn(OutputSlot, Props) -> anyhow::Result<()> + 'static,
    {
        Self(Rc::new(definition))
    }

    pub(crate) fn call(&self, slot: OutputSlot, props: Props) -> anyhow::Result<()> {
        (self.0)(slot, props)
    }
}

impl fmt::Debug for Definition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Definition(Fn(OutputSlot, Props))")
    }
}

/// A shared table of custom element definitions.
///
/// Cloning the handle shares the underlying table.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    definitions: Rc<RefCell<HashMap<String, Definition>>>,
}

thread_local! {
    static GLOBAL: Registry = Registry::new();
}

impl Registry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns this thread's default registry.
    #[must_use]
    pub fn global() -> Self {
        GLOBAL.with(Clone::clone)
    }

    /// Registers `definition` under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::DuplicateRegistration`] if `name` is already taken;
    /// the existing definition is kept.
    pub fn register(
        &self,
        name: impl Into<String>,
        definition: impl Into<Definition>,
    ) -> Result<(), RenderError> {
        let name = name.into();
        let mut definitions = self.definitions.borrow_mut();
        if definitions.contains_key(&name) {
            return Err(RenderError::DuplicateRegistration { name });
        }
        tracing::debug!(element = %name, "registered custom element");
        definitions.insert(name, definition.into());
        Ok(())
    }

    /// Looks up the definition registered under `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Definition> {
        self.definitions.borrow().get(name).cloned()
    }

    /// Returns `true` if `name` is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.definitions.borrow().contains_key(name)
    }

    /// Removes one definition, returning whether it was present.
    pub fn unregister(&self, name: &str) -> bool {
        self.definitions.borrow_mut().remove(name).is_some()
    }

    /// Removes every definition.
    pub fn clear(&self) {
        self.definitions.borrow_mut().clear();
    }

    /// Number of registered definitions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.definitions.borrow().len()
    }

    /// Returns `true` if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.definitions.borrow().is_empty()
    }

    /// Registered names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.definitions.borrow().keys().cloned().collect();
        names.sort_unstable();
        names
    }
}

impl<F> From<F> for Definition
where
    F: Fn(OutputSlot, Props) -> anyhow::Result<()> + 'static,
{
    fn from(value: F) -> Self {
        Self::new(value)
    }
}

/// Registers a custom element in this thread's default registry.
///
/// # Errors
///
/// Returns [`RenderError::DuplicateRegistration`] if `name` is already taken.
pub fn register_custom_element<F>(name: impl Into<String>, definition: F) -> Result<(), RenderError>
where
    F: Fn(OutputSlot, Props) -> anyhow::Result<()> + 'static,
{
    Registry::global().register(name, definition)
}

/// Clears this thread's default registry.
pub fn unregister_all_custom_elements() {
    Registry::global().clear();
}
