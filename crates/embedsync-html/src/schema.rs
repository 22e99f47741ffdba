//! Element and attribute whitelist applied to parsed embed markup.

use std::collections::{HashMap, HashSet, VecDeque};
use std::rc::Rc;

use embedsync_core::{EmbedOptions, SchemaConfig};
use markup5ever_rcdom::{Handle, NodeData};

/// Attributes allowed on every whitelisted element.
const GLOBAL_ATTRIBUTES: &[&str] = &["id", "class", "style", "title", "lang", "dir", "role"];

/// Attribute prefixes allowed on every whitelisted element.
const GLOBAL_PREFIXES: &[&str] = &["data-", "aria-"];

/// Elements removed together with their content when not whitelisted.
const STRIPPED_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// A whitelist of recognized embed markup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    elements: HashMap<String, HashSet<String>>,
}

impl Schema {
    /// Create an empty schema that allows nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in whitelist for media embeds.
    pub fn media() -> Self {
        Self::new()
            .element("div", &[])
            .element("span", &[])
            .element("p", &[])
            .element(
                "iframe",
                &[
                    "src",
                    "width",
                    "height",
                    "name",
                    "allow",
                    "allowfullscreen",
                    "frameborder",
                    "loading",
                    "referrerpolicy",
                    "sandbox",
                    "scrolling",
                ],
            )
            .element(
                "video",
                &[
                    "src", "width", "height", "poster", "controls", "autoplay", "loop", "muted",
                    "preload", "playsinline",
                ],
            )
            .element(
                "audio",
                &["src", "controls", "autoplay", "loop", "muted", "preload"],
            )
            .element("source", &["src", "type", "media"])
            .element("track", &["src", "kind", "srclang", "label", "default"])
            .element("object", &["data", "type", "width", "height"])
            .element("embed", &["src", "type", "width", "height"])
            .element("param", &["name", "value"])
            .element("img", &["src", "alt", "width", "height"])
    }

    /// Build the schema the options ask for, or `None` when filtering is off.
    pub fn from_options(options: &EmbedOptions) -> Option<Self> {
        if !options.filter_html {
            return None;
        }
        Some(options.schema.as_ref().map_or_else(Self::media, Self::from_config))
    }

    /// Build a schema from configuration.
    pub fn from_config(config: &SchemaConfig) -> Self {
        config
            .elements
            .iter()
            .fold(Self::new(), |schema, (tag, attrs)| {
                let attrs: Vec<&str> = attrs.iter().map(String::as_str).collect();
                schema.element(tag, &attrs)
            })
    }

    /// Allow an element with the given element-specific attributes.
    pub fn element(mut self, tag: &str, attributes: &[&str]) -> Self {
        let entry = self.elements.entry(tag.to_ascii_lowercase()).or_default();
        entry.extend(attributes.iter().map(|a| a.to_ascii_lowercase()));
        self
    }

    /// Check if an element is whitelisted.
    pub fn allows_element(&self, tag: &str) -> bool {
        self.elements.contains_key(tag)
    }

    /// Check if an attribute is allowed on a whitelisted element.
    pub fn allows_attribute(&self, tag: &str, attribute: &str) -> bool {
        let Some(allowed) = self.elements.get(tag) else {
            return false;
        };
        allowed.contains(attribute)
            || GLOBAL_ATTRIBUTES.contains(&attribute)
            || GLOBAL_PREFIXES.iter().any(|p| attribute.starts_with(p))
    }

    /// Filter the subtree below `root` in place.
    ///
    /// Disallowed elements are unwrapped so their content survives, except for
    /// script-like elements which are removed along with their content.
    /// Comments are dropped and disallowed attributes removed.
    pub(crate) fn filter_children(&self, root: &Handle) {
        let mut pending = vec![root.clone()];

        while let Some(parent) = pending.pop() {
            let mut queue: VecDeque<Handle> = std::mem::take(&mut *parent.children.borrow_mut()).into();
            let mut kept = Vec::with_capacity(queue.len());

            while let Some(child) = queue.pop_front() {
                match &child.data {
                    NodeData::Element { name, attrs, .. } => {
                        let tag = name.local.as_ref();
                        if self.allows_element(tag) {
                            attrs
                                .borrow_mut()
                                .retain(|a| self.allows_attribute(tag, a.name.local.as_ref()));
                            pending.push(child.clone());
                            kept.push(child);
                        } else if !STRIPPED_ELEMENTS.contains(&tag) {
                            // Promoted children are filtered as children of `parent`
                            for grandchild in child.children.take().into_iter().rev() {
                                queue.push_front(grandchild);
                            }
                        }
                    }
                    NodeData::Comment { .. } | NodeData::ProcessingInstruction { .. } => {}
                    _ => kept.push(child),
                }
            }

            for child in &kept {
                child.parent.set(Some(Rc::downgrade(&parent)));
            }
            *parent.children.borrow_mut() = kept;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Fragment;

    fn filter(html: &str, schema: &Schema) -> String {
        let fragment = Fragment::parse(html).unwrap();
        schema.filter_children(fragment.root());
        fragment.to_html().unwrap()
    }

    #[test]
    fn test_media_schema_keeps_iframe() {
        let html = r#"<div class="x" data-tracking="t"><iframe src="a" width="1" height="1"></iframe></div>"#;
        assert_eq!(filter(html, &Schema::media()), html);
    }

    #[test]
    fn test_drops_disallowed_attributes() {
        let html = r#"<iframe src="a" onload="evil()"></iframe>"#;
        assert_eq!(
            filter(html, &Schema::media()),
            r#"<iframe src="a"></iframe>"#
        );
    }

    #[test]
    fn test_unwraps_unknown_elements() {
        let html = r#"<section><iframe src="a"></iframe></section>"#;
        assert_eq!(
            filter(html, &Schema::media()),
            r#"<iframe src="a"></iframe>"#
        );
    }

    #[test]
    fn test_strips_scripts_and_comments() {
        let html = r#"<div><!-- c --><script>alert(1)</script><iframe src="a"></iframe></div>"#;
        assert_eq!(
            filter(html, &Schema::media()),
            r#"<div><iframe src="a"></iframe></div>"#
        );
    }

    #[test]
    fn test_unwraps_nested_unknown_elements_in_order() {
        let html = r#"<section><article><iframe src="a"></iframe></article><p>x</p></section><!-- c -->"#;
        assert_eq!(
            filter(html, &Schema::media()),
            r#"<iframe src="a"></iframe><p>x</p>"#
        );
    }

    #[test]
    fn test_from_options() {
        let mut options = EmbedOptions::default();
        assert_eq!(Schema::from_options(&options), Some(Schema::media()));

        options.schema = Some(SchemaConfig {
            elements: [("iframe".to_string(), vec!["src".to_string()])]
                .into_iter()
                .collect(),
        });
        let schema = Schema::from_options(&options).unwrap();
        assert!(schema.allows_attribute("iframe", "src"));
        assert!(!schema.allows_attribute("iframe", "width"));
        assert!(!schema.allows_element("div"));

        options.filter_html = false;
        assert_eq!(Schema::from_options(&options), None);
    }
}
