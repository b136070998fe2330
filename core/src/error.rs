use std::error::Error as StdError;

use thiserror::Error;

/// Errors raised while registering custom elements or resolving a tree.
///
/// Resolution errors are local to a subtree in cause but global in effect: the
/// fan-in combinators have no partial-failure mode, so one failing custom element
/// fails the whole render generation.
#[derive(Debug, Error)]
pub enum RenderError {
    /// A custom element with this name is already registered.
    #[error("custom element `{name}` is already registered")]
    DuplicateRegistration {
        /// The name that was registered twice.
        name: String,
    },
    /// A custom element instance injected its output more than once.
    #[error("custom element `{element}` injected its output more than once")]
    DuplicateInjection {
        /// The element whose output slot was filled twice.
        element: String,
    },
    /// A custom element definition failed while being instantiated.
    #[error("custom element `{element}` failed to instantiate: {source}")]
    Definition {
        /// The element whose definition failed.
        element: String,
        /// The error returned by the definition.
        #[source]
        source: Box<dyn StdError + Send + Sync + 'static>,
    },
    /// Custom element expansion nested deeper than the configured limit.
    #[error("custom element `{element}` exceeded the maximum expansion depth of {depth}")]
    DepthExceeded {
        /// The element that would have been expanded past the limit.
        element: String,
        /// The configured limit.
        depth: usize,
    },
}

impl RenderError {
    pub(crate) fn definition(element: impl Into<String>, error: anyhow::Error) -> Self {
        Self::Definition {
            element: element.into(),
            source: error.into(),
        }
    }

    /// Returns the custom element name this error is attributed to.
    #[must_use]
    pub fn element(&self) -> &str {
        match self {
            Self::DuplicateRegistration { name } => name,
            Self::DuplicateInjection { element }
            | Self::Definition { element, .. }
            | Self::DepthExceeded { element, .. } => element,
        }
    }
}
