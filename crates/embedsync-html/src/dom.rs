//! Detached fragment trees using html5ever.

use html5ever::serialize::{SerializeOpts, TraversalScope, serialize};
use html5ever::tendril::TendrilSink;
use html5ever::{Attribute, LocalName, Namespace, QualName, parse_document};
use markup5ever_rcdom::{Handle, NodeData, RcDom, SerializableHandle};
use std::rc::Rc;
use tracing::debug;

/// A parsed HTML fragment. Fragment content lives under `body`.
pub(crate) struct Fragment {
    body: Handle,
    _dom: RcDom,
}

impl Fragment {
    /// Parse a fragment into a detached tree.
    ///
    /// The input is parsed as body content so that leading `<script>`,
    /// `<style>` or `<meta>` elements stay inside the fragment instead of
    /// being hoisted into a synthetic `<head>`.
    pub(crate) fn parse(input: &str) -> Option<Self> {
        let source = format!("<body>{input}");
        let dom = match parse_document(RcDom::default(), Default::default())
            .from_utf8()
            .read_from(&mut source.as_bytes())
        {
            Ok(dom) => dom,
            Err(e) => {
                debug!(error = %e, "embed fragment could not be read");
                return None;
            }
        };

        let body = find_first(&dom.document, |handle| is_element(handle, "body"))?;
        Some(Self { body, _dom: dom })
    }

    /// The element holding the fragment's top-level nodes.
    pub(crate) fn root(&self) -> &Handle {
        &self.body
    }

    /// First element with the given tag name, in document order.
    pub(crate) fn first_element(&self, tag: &str) -> Option<Handle> {
        find_first(&self.body, |handle| is_element(handle, tag))
    }

    /// Top-level element children of the fragment.
    pub(crate) fn top_level_elements(&self) -> Vec<Handle> {
        self.body
            .children
            .borrow()
            .iter()
            .filter(|child| matches!(child.data, NodeData::Element { .. }))
            .cloned()
            .collect()
    }

    /// Serialize the fragment's content back to HTML.
    pub(crate) fn to_html(&self) -> Option<String> {
        serialize_handle(&self.body, TraversalScope::ChildrenOnly(None))
    }
}

/// Serialize a node including its own tag.
pub(crate) fn outer_html(handle: &Handle) -> Option<String> {
    serialize_handle(handle, TraversalScope::IncludeNode)
}

fn serialize_handle(handle: &Handle, traversal_scope: TraversalScope) -> Option<String> {
    let mut out = Vec::new();
    let serializable: SerializableHandle = handle.clone().into();
    let opts = SerializeOpts {
        traversal_scope,
        ..Default::default()
    };
    if let Err(e) = serialize(&mut out, &serializable, opts) {
        debug!(error = %e, "embed fragment could not be serialized");
        return None;
    }
    String::from_utf8(out).ok()
}

/// Depth-first search for the first node matching `predicate`, excluding `handle` itself.
pub(crate) fn find_first(handle: &Handle, predicate: impl Fn(&Handle) -> bool) -> Option<Handle> {
    let mut stack = children_reversed(handle);
    while let Some(node) = stack.pop() {
        if predicate(&node) {
            return Some(node);
        }
        stack.extend(children_reversed(&node));
    }
    None
}

/// Path of nodes from (excluding) `root` down to (excluding) `target`, outermost first.
///
/// Returns `None` when `target` is not below `root`.
pub(crate) fn ancestors_of(root: &Handle, target: &Handle) -> Option<Vec<Handle>> {
    let mut path = Vec::new();
    let mut current = parent_of(target)?;
    while !Rc::ptr_eq(&current, root) {
        let next = parent_of(&current)?;
        path.push(current);
        current = next;
    }
    path.reverse();
    Some(path)
}

/// Visit every node below `handle` in document order until `visit` returns false.
pub(crate) fn walk(handle: &Handle, visit: &mut impl FnMut(&Handle) -> bool) -> bool {
    let mut stack = children_reversed(handle);
    while let Some(node) = stack.pop() {
        if !visit(&node) {
            return false;
        }
        stack.extend(children_reversed(&node));
    }
    true
}

fn children_reversed(handle: &Handle) -> Vec<Handle> {
    handle.children.borrow().iter().rev().cloned().collect()
}

/// The parent of a node, if it is still attached.
fn parent_of(handle: &Handle) -> Option<Handle> {
    let weak = handle.parent.take()?;
    let parent = weak.upgrade();
    handle.parent.set(Some(weak));
    parent
}

/// Local tag name of an element node.
pub(crate) fn tag_name(handle: &Handle) -> Option<String> {
    match &handle.data {
        NodeData::Element { name, .. } => Some(name.local.as_ref().to_string()),
        _ => None,
    }
}

pub(crate) fn is_element(handle: &Handle, tag: &str) -> bool {
    matches!(&handle.data, NodeData::Element { name, .. } if name.local.as_ref() == tag)
}

/// Get an attribute value by name.
pub(crate) fn get_attr(handle: &Handle, name: &str) -> Option<String> {
    match &handle.data {
        NodeData::Element { attrs, .. } => attrs
            .borrow()
            .iter()
            .find(|a| a.name.local.as_ref() == name)
            .map(|a| a.value.to_string()),
        _ => None,
    }
}

pub(crate) fn has_attr(handle: &Handle, name: &str) -> bool {
    match &handle.data {
        NodeData::Element { attrs, .. } => attrs.borrow().iter().any(|a| a.name.local.as_ref() == name),
        _ => false,
    }
}

/// Set an attribute, returning whether the element changed.
pub(crate) fn set_attr(handle: &Handle, name: &str, value: &str) -> bool {
    let NodeData::Element { attrs, .. } = &handle.data else {
        return false;
    };
    let mut attrs = attrs.borrow_mut();
    match attrs.iter_mut().find(|a| a.name.local.as_ref() == name) {
        Some(attr) if &*attr.value == value => false,
        Some(attr) => {
            attr.value = value.into();
            true
        }
        None => {
            attrs.push(Attribute {
                name: QualName::new(None, Namespace::from(""), LocalName::from(name)),
                value: value.into(),
            });
            true
        }
    }
}

/// All attributes of an element as name/value pairs, in source order.
pub(crate) fn attributes(handle: &Handle) -> Vec<(String, String)> {
    match &handle.data {
        NodeData::Element { attrs, .. } => attrs
            .borrow()
            .iter()
            .map(|a| (a.name.local.as_ref().to_string(), a.value.to_string()))
            .collect(),
        _ => Vec::new(),
    }
}

/// Look up a declaration in an inline `style` attribute value.
pub(crate) fn style_property(style: &str, property: &str) -> Option<String> {
    style.split(';').find_map(|declaration| {
        let (name, value) = declaration.split_once(':')?;
        (name.trim().eq_ignore_ascii_case(property)).then(|| value.trim().to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keeps_leading_script_in_fragment() {
        let fragment = Fragment::parse("<script>x()</script><div>a</div>").unwrap();
        let html = fragment.to_html().unwrap();
        assert_eq!(html, "<script>x()</script><div>a</div>");
    }

    #[test]
    fn test_set_attr_reports_change() {
        let fragment = Fragment::parse(r#"<iframe src="a"></iframe>"#).unwrap();
        let iframe = fragment.first_element("iframe").unwrap();

        assert!(!set_attr(&iframe, "src", "a"));
        assert!(set_attr(&iframe, "src", "b"));
        assert!(set_attr(&iframe, "width", "10"));
        assert_eq!(
            fragment.to_html().unwrap(),
            r#"<iframe src="b" width="10"></iframe>"#
        );
    }

    #[test]
    fn test_ancestors_outermost_first() {
        let fragment =
            Fragment::parse(r#"<div id="a"><div id="b"><iframe></iframe></div></div>"#).unwrap();
        let iframe = fragment.first_element("iframe").unwrap();
        let path = ancestors_of(fragment.root(), &iframe).unwrap();

        let ids: Vec<_> = path.iter().filter_map(|h| get_attr(h, "id")).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_ancestors_of_detached_target() {
        let fragment = Fragment::parse(r#"<div><iframe></iframe></div>"#).unwrap();
        let other = Fragment::parse(r#"<iframe></iframe>"#).unwrap();
        let iframe = other.first_element("iframe").unwrap();
        assert!(ancestors_of(fragment.root(), &iframe).is_none());
    }

    #[test]
    fn test_walk_document_order_and_stop() {
        let fragment = Fragment::parse(r#"<div id="a"><p id="b"></p></div><span id="c"></span>"#).unwrap();
        let mut seen = Vec::new();
        let finished = walk(fragment.root(), &mut |h: &Handle| {
            if let Some(id) = get_attr(h, "id") {
                seen.push(id);
            }
            seen.len() < 2
        });
        assert!(!finished);
        assert_eq!(seen, vec!["a", "b"]);
    }

    #[test]
    fn test_style_property() {
        let style = "max-width: 640px; MAX-HEIGHT:360px";
        assert_eq!(style_property(style, "max-width").as_deref(), Some("640px"));
        assert_eq!(style_property(style, "max-height").as_deref(), Some("360px"));
        assert_eq!(style_property(style, "width"), None);
    }
}
