//! Core of the cascade renderer.
//!
//! This crate holds everything between a reactive virtual tree and a reactive,
//! custom-element-free virtual tree:
//!
//! - [`VTree`], [`Element`] and [`AttrValue`] describe nodes; [`h`] builds them
//!   from hyperscript selectors.
//! - [`Source`] and [`Replay`] are the reactive values everything is made of.
//! - [`Registry`] maps custom element names to [`Definition`]s.
//! - [`Instance`], [`Props`] and [`OutputSlot`] are the per-occurrence state of
//!   an expanded custom element.
//! - [`Resolver`] recursively expands custom elements and recombines the
//!   resulting streams with the combinators in [`combine`].
//!
//! Everything is single-threaded: handles are `Rc`-based and streams are
//! `LocalBoxStream`s driven by whatever executor polls the output.

pub mod combine;
mod error;
mod hyperscript;
mod instance;
mod registry;
pub mod resolve;
mod source;
mod vtree;

pub use error::RenderError;
pub use hyperscript::h;
pub use instance::{Instance, OutputSlot, Props};
pub use registry::{
    Definition, Registry, register_custom_element, unregister_all_custom_elements,
};
pub use resolve::{ResolveConfig, ResolvedStream, Resolver};
pub use source::{Replay, Source};
pub use vtree::{AttrValue, Attributes, Element, VTree};
