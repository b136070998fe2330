#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! HTML backend for the cascade renderer.
//!
//! The backend has two halves. [`HtmlSerializer`] is a pure function from a
//! fully resolved [`VTree`](cascade_core::VTree) to markup. [`HtmlRenderer`] wires
//! a [`Resolver`](cascade_core::Resolver) in front of it, turning a reactive tree
//! into a reactive string: one complete document fragment per resolved state.
//!
//! [`render_as_html`] is the shortcut that renders against the calling thread's
//! default registry.

mod renderer;
mod serializer;

pub use renderer::{HtmlRenderer, HtmlStream, render_as_html};
pub use serializer::{HtmlConfig, HtmlSerializer, to_html};
