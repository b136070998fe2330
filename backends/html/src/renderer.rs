use cascade_core::{Registry, RenderError, ResolveConfig, Resolver, Source, VTree};
use futures::{StreamExt, stream::LocalBoxStream};

use crate::{HtmlConfig, HtmlSerializer};

/// A reactive HTML string: one item per resolved tree state, or an error that
/// ends the stream.
pub type HtmlStream = LocalBoxStream<'static, Result<String, RenderError>>;

/// Renders reactive trees into reactive HTML.
#[derive(Debug, Clone, Default)]
pub struct HtmlRenderer {
    resolver: Resolver,
    serializer: HtmlSerializer,
}

impl HtmlRenderer {
    /// Creates a renderer that expands custom elements from `registry`.
    #[must_use]
    pub fn new(registry: Registry) -> Self {
        Self {
            resolver: Resolver::new(registry),
            serializer: HtmlSerializer::default(),
        }
    }

    /// Replaces the resolver configuration.
    #[must_use]
    pub fn with_resolve_config(mut self, config: ResolveConfig) -> Self {
        self.resolver = self.resolver.with_config(config);
        self
    }

    /// Replaces the serializer configuration.
    #[must_use]
    pub const fn with_html_config(mut self, config: HtmlConfig) -> Self {
        self.serializer = HtmlSerializer::new(config);
        self
    }

    /// The resolver in front of the serializer.
    #[must_use]
    pub const fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    /// Renders `root`, emitting a complete serialization for every resolved state.
    ///
    /// A failing custom element yields one error item and ends the stream; no
    /// HTML is produced for that generation.
    #[must_use]
    pub fn render(&self, root: &Source<VTree>) -> HtmlStream {
        let serializer = self.serializer;
        self.resolver
            .resolve(root)
            .map(move |tree| {
                tree.map(|tree| serializer.serialize(&tree))
                    .inspect_err(|error| tracing::error!(%error, "render failed"))
            })
            .boxed_local()
    }
}

/// Renders `root` against the calling thread's default registry.
///
/// Custom elements registered through
/// [`register_custom_element`](cascade_core::register_custom_element) are
/// expanded; every other tag is written as-is.
#[must_use]
pub fn render_as_html(root: &Source<VTree>) -> HtmlStream {
    HtmlRenderer::new(Registry::global()).render(root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cascade_core::{Definition, OutputSlot, Props, Replay, h};
    use futures::{FutureExt, executor::block_on_stream};

    fn renderer_with(name: &str, definition: Definition) -> HtmlRenderer {
        let registry = Registry::new();
        registry.register(name, definition).unwrap();
        HtmlRenderer::new(registry)
    }

    #[test]
    fn renders_props_through_a_definition() {
        let renderer = renderer_with(
            "myelement",
            Definition::new(|slot: OutputSlot, props: Props| {
                slot.inject(
                    props
                        .get("foobar")
                        .map(|foobar| h("h3.myelementclass").with_child(foobar.to_uppercase()).into()),
                )?;
                Ok(())
            }),
        );
        let root = Source::constant(
            h("div.test-element")
                .with_child(h("myelement").with_attribute("foobar", "yes"))
                .into(),
        );
        let html: Vec<_> = block_on_stream(renderer.render(&root))
            .map(Result::unwrap)
            .collect();
        assert_eq!(
            html,
            [r#"<div class="test-element"><h3 class="myelementclass">YES</h3></div>"#]
        );
    }

    #[test]
    fn dynamic_props_re_render() {
        let renderer = renderer_with(
            "x-counter",
            Definition::new(|slot: OutputSlot, props: Props| {
                slot.inject(props.get("count").map(|count| h("span").with_child(count).into()))?;
                Ok(())
            }),
        );
        let count = Replay::with_value("1".to_string());
        let root = Source::constant(
            h("div")
                .with_child(h("x-counter").with_dynamic_attribute("count", count.source()))
                .into(),
        );
        let mut html = renderer.render(&root);
        assert_eq!(
            html.next().now_or_never().flatten().transpose().unwrap(),
            Some("<div><span>1</span></div>".to_string())
        );

        count.set("2".to_string());
        assert_eq!(
            html.next().now_or_never().flatten().transpose().unwrap(),
            Some("<div><span>2</span></div>".to_string())
        );
    }

    #[test]
    fn errors_replace_html() {
        let renderer = renderer_with(
            "x-broken",
            Definition::new(|_slot: OutputSlot, _props| Err(anyhow::anyhow!("offline"))),
        );
        let root = Source::constant(h("div").with_child(h("x-broken")).into());
        let items: Vec<_> = block_on_stream(renderer.render(&root)).collect();
        assert_eq!(items.len(), 1);
        assert!(items[0].is_err());
    }

    #[test]
    fn html_config_is_applied() {
        let renderer = HtmlRenderer::default().with_html_config(HtmlConfig::new().raw_text());
        let root = Source::constant(h("div").with_child("<br>").into());
        let html: Vec<_> = block_on_stream(renderer.render(&root))
            .map(Result::unwrap)
            .collect();
        assert_eq!(html, ["<div><br></div>"]);
    }
}
