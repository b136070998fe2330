//! # Resolution
//!
//! The resolver turns a reactive tree that may contain custom elements into a
//! reactive tree that contains none. It applies a single recursive procedure to
//! the root and to every injected subtree:
//!
//! 1. A text node resolves to itself.
//! 2. An element whose tag is not registered keeps its tag and attributes; its
//!    dynamic attributes and children are resolved and recombined with
//!    [`CombineLatest`]. Nothing is emitted until every participant has emitted,
//!    and the element is re-emitted whenever any participant changes.
//! 3. An element whose tag is registered is instantiated. Its injected content is
//!    resolved again from step 1, because it may contain further custom elements.
//!    The occurrence's attributes are consumed as props and not rendered.
//!
//! Every source is followed through [`Switch`]: when a source emits a new tree,
//! everything built for the previous tree, custom element instances included, is
//! dropped before the new tree is resolved.
//!
//! ```text
//!   Source<VTree> ──Switch──▶ node ──┬─ text ──────────────▶ once
//!                                    ├─ plain element ─────▶ CombineLatest(attrs, children)
//!                                    └─ custom element ────▶ Instance ──Switch──▶ (recurse)
//! ```

use futures::{
    StreamExt, future,
    stream::{self, LocalBoxStream},
};

use crate::{
    AttrValue, Attributes, Definition, Element, Instance, Registry, RenderError, Source, VTree,
    combine::{CombineLatest, Fallible, Switch},
};

/// A reactive, fully resolved tree.
pub type ResolvedStream = LocalBoxStream<'static, Result<VTree, RenderError>>;

/// Resolver settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ResolveConfig {
    /// Maximum number of nested custom element expansions, unlimited if `None`.
    pub max_depth: Option<usize>,
}

impl ResolveConfig {
    /// Creates the default configuration.
    #[must_use]
    pub const fn new() -> Self {
        Self { max_depth: None }
    }

    /// Limits how deeply custom elements may expand into each other.
    #[must_use]
    pub const fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }
}

/// Expands custom elements in reactive trees.
#[derive(Debug, Clone, Default)]
pub struct Resolver {
    registry: Registry,
    config: ResolveConfig,
}

/// One input of a plain element's fan-in.
#[derive(Debug, Clone)]
enum Part {
    Attribute(String),
    Child(VTree),
}

impl Resolver {
    /// Creates a resolver backed by `registry`.
    #[must_use]
    pub fn new(registry: Registry) -> Self {
        Self {
            registry,
            config: ResolveConfig::default(),
        }
    }

    /// Replaces the configuration.
    #[must_use]
    pub const fn with_config(mut self, config: ResolveConfig) -> Self {
        self.config = config;
        self
    }

    /// The registry consulted during instantiation.
    #[must_use]
    pub const fn registry(&self) -> &Registry {
        &self.registry
    }

    /// The current configuration.
    #[must_use]
    pub const fn config(&self) -> ResolveConfig {
        self.config
    }

    /// Resolves a reactive tree.
    ///
    /// The returned stream emits one fully resolved tree per resolved state and
    /// ends after the first error.
    #[must_use]
    pub fn resolve(&self, root: &Source<VTree>) -> ResolvedStream {
        stop_after_error(self.resolve_source(root, 0))
    }

    fn resolve_source(&self, source: &Source<VTree>, depth: usize) -> ResolvedStream {
        let resolver = self.clone();
        let generations = source.subscribe().map(move |tree| {
            let resolver = resolver.clone();
            deferred(move || {
                tracing::debug!(depth, "resolving new tree generation");
                resolver.resolve_node(tree, depth)
            })
        });
        Switch::new(generations).boxed_local()
    }

    fn resolve_node(&self, tree: VTree, depth: usize) -> ResolvedStream {
        match tree {
            VTree::Text(_) => stream::once(future::ready(Ok(tree))).boxed_local(),
            VTree::Element(element) => match self.registry.get(element.tag()) {
                Some(definition) => self.expand(&element, &definition, depth),
                None => {
                    tracing::trace!(tag = element.tag(), "passing element through");
                    self.resolve_element(element, depth)
                }
            },
        }
    }

    fn expand(&self, element: &Element, definition: &Definition, depth: usize) -> ResolvedStream {
        if let Some(max_depth) = self.config.max_depth {
            if depth >= max_depth {
                return fail(RenderError::DepthExceeded {
                    element: element.tag().to_owned(),
                    depth: max_depth,
                });
            }
        }

        let instance = match Instance::spawn(element, definition) {
            Ok(instance) => instance,
            Err(error) => return fail(error),
        };
        let name = instance.element().to_owned();
        let resolver = self.clone();
        let outputs = instance
            .into_injections()
            .enumerate()
            .map(move |(index, content)| {
                if index == 0 {
                    let resolver = resolver.clone();
                    deferred(move || resolver.resolve_source(&content, depth + 1))
                } else {
                    fail(RenderError::DuplicateInjection {
                        element: name.clone(),
                    })
                }
            });
        Switch::new(outputs).boxed_local()
    }

    fn resolve_element(&self, element: Element, depth: usize) -> ResolvedStream {
        let (tag, attributes, children) = element.into_parts();

        let mut parts: Vec<Fallible<Part>> = Vec::new();
        for value in attributes.values() {
            if let AttrValue::Dynamic(source) = value {
                parts.push(
                    source
                        .subscribe()
                        .map(|value| Ok(Part::Attribute(value)))
                        .boxed_local(),
                );
            }
        }
        for child in children {
            parts.push(
                self.resolve_node(child, depth)
                    .map(|child| child.map(Part::Child))
                    .boxed_local(),
            );
        }

        CombineLatest::new(parts)
            .map(move |parts| {
                parts.map(|parts| VTree::Element(rebuild(&tag, &attributes, parts)))
            })
            .boxed_local()
    }
}

/// Rebuilds a plain element from the latest values of its fan-in, which lists
/// dynamic attributes first and children after, both in declaration order.
fn rebuild(tag: &str, attributes: &Attributes, parts: Vec<Part>) -> Element {
    let mut parts = parts.into_iter().peekable();
    let mut resolved = Attributes::with_capacity(attributes.len());
    for (name, value) in attributes {
        let value = match value {
            AttrValue::Static(value) => AttrValue::Static(value.clone()),
            AttrValue::Dynamic(_) => match parts.next_if(|part| matches!(part, Part::Attribute(_))) {
                Some(Part::Attribute(value)) => AttrValue::Static(value),
                _ => continue,
            },
        };
        resolved.insert(name.clone(), value);
    }

    let children = parts
        .filter_map(|part| match part {
            Part::Child(child) => Some(child),
            Part::Attribute(_) => None,
        })
        .collect();
    Element::from_parts(tag.to_owned(), resolved, children)
}

/// Builds the stream on its first poll. [`Switch`] drops the previous inner
/// stream before polling the next one, so a generation's instances and
/// subscriptions are released before its successor creates any.
fn deferred(build: impl FnOnce() -> ResolvedStream + 'static) -> ResolvedStream {
    stream::once(future::lazy(move |_| build()))
        .flatten()
        .boxed_local()
}

fn fail(error: RenderError) -> ResolvedStream {
    stream::once(future::ready(Err(error))).boxed_local()
}

/// Forwards items up to and including the first error.
fn stop_after_error(stream: ResolvedStream) -> ResolvedStream {
    stream
        .scan(false, |failed, item| {
            if *failed {
                return future::ready(None);
            }
            *failed = item.is_err();
            future::ready(Some(item))
        })
        .boxed_local()
}
