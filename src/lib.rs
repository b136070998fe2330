#![doc = include_str!("../README.md")]
#![allow(clippy::multiple_crate_versions)]
#![allow(clippy::future_not_send)]

pub mod log;

pub mod prelude {
    //! A collection of commonly used types for easy importing.
    //!
    //! ```rust
    //! use cascade::prelude::*;
    //!
    //! let tree: VTree = h("p.greeting").with_child("hello").into();
    //! assert_eq!(to_html(&tree), r#"<p class="greeting">hello</p>"#);
    //! ```
    pub use super::{
        AttrValue, Definition, Element, HtmlRenderer, OutputSlot, Props, Registry, RenderError,
        Replay, Source, VTree, h, register_custom_element, render_as_html, to_html,
        unregister_all_custom_elements,
    };
}

#[doc(inline)]
pub use cascade_core::{
    AttrValue, Attributes, Definition, Element, Instance, OutputSlot, Props, Registry,
    RenderError, Replay, ResolveConfig, ResolvedStream, Resolver, Source, VTree, combine, h,
    register_custom_element, unregister_all_custom_elements,
};
#[doc(inline)]
pub use cascade_html::{HtmlConfig, HtmlRenderer, HtmlSerializer, HtmlStream, render_as_html, to_html};

pub use futures;
pub use tracing;
