//! Hyperscript-style construction of element literals.

use crate::Element;

/// Creates an element from a selector such as `h3.title.large#main`.
///
/// The tag defaults to `div` when the selector starts with `.` or `#`. Classes
/// are merged into a single `class` attribute; `id` and `class` appear in the
/// order they are first mentioned.
///
/// ```
/// use cascade_core::{VTree, h};
///
/// let tree: VTree = h("div.test-element").with_child("Foobar").into();
/// assert_eq!(tree.tag(), Some("div"));
/// ```
#[must_use]
pub fn h(selector: &str) -> Element {
    let mut tag = String::new();
    let mut id: Option<String> = None;
    let mut classes: Vec<String> = Vec::new();
    let mut order: Vec<&'static str> = Vec::new();

    let mut rest = selector;
    let mut target = Target::Tag;
    while !rest.is_empty() {
        let end = rest
            .char_indices()
            .skip(1)
            .find(|&(_, c)| c == '.' || c == '#')
            .map_or(rest.len(), |(index, _)| index);
        let (token, tail) = rest.split_at(end);
        let name = if let Some(name) = token.strip_prefix('.') {
            target = Target::Class;
            name
        } else if let Some(name) = token.strip_prefix('#') {
            target = Target::Id;
            name
        } else {
            token
        };

        match target {
            Target::Tag => tag.push_str(name),
            Target::Class if !name.is_empty() => {
                mark(&mut order, "class");
                classes.push(name.to_owned());
            }
            Target::Id if !name.is_empty() => {
                mark(&mut order, "id");
                id = Some(name.to_owned());
            }
            Target::Class | Target::Id => {}
        }
        rest = tail;
    }

    if tag.is_empty() {
        tag.push_str("div");
    }

    let mut element = Element::new(tag);
    for name in order {
        match name {
            "class" => element = element.with_attribute("class", classes.join(" ")),
            _ => {
                if let Some(id) = id.take() {
                    element = element.with_attribute("id", id);
                }
            }
        }
    }
    element
}

#[derive(Debug, Clone, Copy)]
enum Target {
    Tag,
    Class,
    Id,
}

fn mark(order: &mut Vec<&'static str>, name: &'static str) {
    if !order.contains(&name) {
        order.push(name);
    }
}
