use cascade_core::{AttrValue, Element, VTree};

/// Escaping policy of the serializer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HtmlConfig {
    /// Escape `&`, `<` and `>` in text nodes.
    pub escape_text: bool,
    /// Escape `&`, `"`, `<` and `>` in attribute values.
    pub escape_attributes: bool,
}

impl Default for HtmlConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl HtmlConfig {
    /// Escapes both text and attribute values.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            escape_text: true,
            escape_attributes: true,
        }
    }

    /// Writes text nodes verbatim. Only use this for trusted content.
    #[must_use]
    pub const fn raw_text(mut self) -> Self {
        self.escape_text = false;
        self
    }

    /// Writes attribute values verbatim. Only use this for trusted content.
    #[must_use]
    pub const fn raw_attributes(mut self) -> Self {
        self.escape_attributes = false;
        self
    }
}

/// Flattens resolved trees into HTML.
///
/// Every element is written with an explicit closing tag, attributes appear in
/// declaration order and no whitespace is added between nodes. Dynamic
/// attributes are skipped: a resolved tree never carries them.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlSerializer {
    config: HtmlConfig,
}

impl HtmlSerializer {
    /// Creates a serializer with the given escaping policy.
    #[must_use]
    pub const fn new(config: HtmlConfig) -> Self {
        Self { config }
    }

    /// The escaping policy.
    #[must_use]
    pub const fn config(&self) -> HtmlConfig {
        self.config
    }

    /// Serializes `tree` into a new string.
    #[must_use]
    pub fn serialize(&self, tree: &VTree) -> String {
        let mut output = String::new();
        self.write_node(&mut output, tree);
        output
    }

    /// Appends the serialization of `tree` to `output`.
    pub fn write_node(&self, output: &mut String, tree: &VTree) {
        match tree {
            VTree::Text(text) => push_escaped(output, text, self.config.escape_text, false),
            VTree::Element(element) => self.write_element(output, element),
        }
    }

    fn write_element(&self, output: &mut String, element: &Element) {
        output.push('<');
        output.push_str(element.tag());
        for (name, value) in element.attributes() {
            let AttrValue::Static(value) = value else {
                tracing::trace!(attribute = %name, "skipping unresolved dynamic attribute");
                continue;
            };
            output.push(' ');
            output.push_str(name);
            output.push_str("=\"");
            push_escaped(output, value, self.config.escape_attributes, true);
            output.push('"');
        }
        output.push('>');

        for child in element.children() {
            self.write_node(output, child);
        }

        output.push_str("</");
        output.push_str(element.tag());
        output.push('>');
    }
}

/// Serializes `tree` with the default escaping policy.
#[must_use]
pub fn to_html(tree: &VTree) -> String {
    HtmlSerializer::default().serialize(tree)
}

fn push_escaped(output: &mut String, value: &str, escape: bool, quotes: bool) {
    if !escape {
        output.push_str(value);
        return;
    }
    for c in value.chars() {
        match c {
            '&' => output.push_str("&amp;"),
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            '"' if quotes => output.push_str("&quot;"),
            c => output.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cascade_core::{Source, h};

    #[test]
    fn element_with_text() {
        let tree = h("div.test-element").with_child("Foobar").into();
        assert_eq!(to_html(&tree), r#"<div class="test-element">Foobar</div>"#);
    }

    #[test]
    fn empty_elements_get_explicit_closing_tags() {
        let tree = h("div").with_children([h("br"), h("h3.myelementclass")]).into();
        assert_eq!(
            to_html(&tree),
            r#"<div><br></br><h3 class="myelementclass"></h3></div>"#
        );
    }

    #[test]
    fn attributes_follow_declaration_order() {
        let tree = h("a")
            .with_attribute("href", "/docs")
            .with_attribute("title", "Docs")
            .with_attribute("class", "nav")
            .into();
        assert_eq!(
            to_html(&tree),
            r#"<a href="/docs" title="Docs" class="nav"></a>"#
        );
    }

    #[test]
    fn text_is_escaped() {
        let tree = h("p").with_child("a < b && c > d").into();
        assert_eq!(to_html(&tree), "<p>a &lt; b &amp;&amp; c &gt; d</p>");
    }

    #[test]
    fn attribute_quotes_are_escaped() {
        let tree = h("p").with_attribute("title", r#"say "hi""#).into();
        assert_eq!(to_html(&tree), r#"<p title="say &quot;hi&quot;"></p>"#);
    }

    #[test]
    fn raw_text_is_written_verbatim() {
        let serializer = HtmlSerializer::new(HtmlConfig::new().raw_text());
        let tree = h("div").with_child("<b>bold</b>").into();
        assert_eq!(serializer.serialize(&tree), "<div><b>bold</b></div>");
    }

    #[test]
    fn unresolved_dynamic_attributes_are_skipped() {
        let tree = h("p")
            .with_dynamic_attribute("title", Source::constant("x".to_string()))
            .with_attribute("lang", "en")
            .into();
        assert_eq!(to_html(&tree), r#"<p lang="en"></p>"#);
    }

    #[test]
    fn siblings_are_not_separated() {
        let tree = h("ul")
            .with_children([h("li").with_child("a"), h("li").with_child("b")])
            .into();
        assert_eq!(to_html(&tree), "<ul><li>a</li><li>b</li></ul>");
    }
}
