//! Custom element instantiation.
//!
//! Every occurrence of a custom element in a tree gets its own [`Instance`]:
//! private [`Props`] derived from the occurrence's attributes and a private
//! [`OutputSlot`] that the definition fills with its rendered content. Instances
//! are never shared between positions, even for the same element name.

use core::fmt;
use std::{cell::Cell, rc::Rc};

use async_channel::{Receiver, Sender};
use indexmap::IndexMap;

use crate::{AttrValue, Definition, Element, RenderError, Source, VTree};

/// Reactive view over an occurrence's attributes.
#[derive(Debug, Clone, Default)]
pub struct Props {
    sources: IndexMap<String, Source<String>>,
}

impl Props {
    /// Builds props from an element's attributes.
    ///
    /// Static values become replayable constant sources, dynamic values are
    /// passed through unchanged.
    #[must_use]
    pub fn from_element(element: &Element) -> Self {
        let sources = element
            .attributes()
            .iter()
            .map(|(name, value)| {
                let source = match value {
                    AttrValue::Static(value) => Source::constant(value.clone()),
                    AttrValue::Dynamic(source) => source.clone(),
                };
                (name.clone(), source)
            })
            .collect();
        Self { sources }
    }

    /// Returns the source bound to `name`.
    ///
    /// An attribute that is not present yields a source that never emits.
    #[must_use]
    pub fn get(&self, name: &str) -> Source<String> {
        self.sources.get(name).cloned().unwrap_or_else(Source::never)
    }

    /// Returns `true` if the occurrence carries `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.sources.contains_key(name)
    }

    /// Attribute names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sources.keys().map(String::as_str)
    }

    /// Number of props.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Returns `true` if the occurrence has no attributes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

/// The single-assignment output of one custom element instance.
///
/// The definition must call [`OutputSlot::inject`] exactly once, either while it
/// runs or later from any code that kept a clone of the slot. Until then the
/// instance is pending and every ancestor waits for it.
#[derive(Clone)]
pub struct OutputSlot {
    element: Rc<str>,
    injected: Rc<Cell<bool>>,
    sender: Sender<Source<VTree>>,
}

impl fmt::Debug for OutputSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutputSlot")
            .field("element", &self.element)
            .field("injected", &self.injected.get())
            .finish_non_exhaustive()
    }
}

impl OutputSlot {
    fn new(element: &str) -> (Self, Receiver<Source<VTree>>) {
        let (sender, receiver) = async_channel::unbounded();
        let slot = Self {
            element: Rc::from(element),
            injected: Rc::new(Cell::new(false)),
            sender,
        };
        (slot, receiver)
    }

    /// The name of the custom element this slot belongs to.
    #[must_use]
    pub fn element(&self) -> &str {
        &self.element
    }

    /// Returns `true` once the slot has been filled.
    #[must_use]
    pub fn is_injected(&self) -> bool {
        self.injected.get()
    }

    /// Supplies this instance's rendered content.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::DuplicateInjection`] if the slot was already filled.
    /// The resolver observes the second injection as well and fails the subtree.
    pub fn inject(&self, content: Source<VTree>) -> Result<(), RenderError> {
        let duplicate = self.injected.replace(true);
        if self.sender.try_send(content).is_err() {
            tracing::trace!(element = %self.element, "instance released before injection");
        }
        if duplicate {
            tracing::warn!(element = %self.element, "custom element injected its output twice");
            return Err(RenderError::DuplicateInjection {
                element: self.element.to_string(),
            });
        }
        Ok(())
    }
}

impl Drop for OutputSlot {
    fn drop(&mut self) {
        // The last handle going away without an injection closes the channel,
        // so the instance completes without content.
        if Rc::strong_count(&self.injected) == 1 && !self.injected.get() {
            tracing::warn!(
                element = %self.element,
                "custom element dropped its output slot without injecting"
            );
        }
    }
}

/// A live custom element occurrence.
#[derive(Debug)]
pub struct Instance {
    element: String,
    injections: Receiver<Source<VTree>>,
}

impl Instance {
    /// Instantiates `element` by running `definition` once.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Definition`] if the definition fails.
    pub fn spawn(element: &Element, definition: &Definition) -> Result<Self, RenderError> {
        let name = element.tag();
        tracing::debug!(element = %name, props = element.attributes().len(), "instantiating custom element");

        let props = Props::from_element(element);
        let (slot, injections) = OutputSlot::new(name);
        definition.call(slot, props).map_err(|error| {
            tracing::error!(element = %name, %error, "custom element definition failed");
            RenderError::definition(name, error)
        })?;

        Ok(Self {
            element: name.to_owned(),
            injections,
        })
    }

    /// The custom element name.
    #[must_use]
    pub fn element(&self) -> &str {
        &self.element
    }

    /// The stream of injected outputs. The first item is the instance's content;
    /// any further item is a duplicate injection.
    #[must_use]
    pub fn into_injections(self) -> Receiver<Source<VTree>> {
        self.injections
    }
}
