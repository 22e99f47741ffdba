//! In-place patching of existing embed markup.
//!
//! Only the attributes derived from the record are touched. Everything else
//! in the fragment, including wrapper elements injected by embed providers
//! with their classes, styles and accessibility attributes, is preserved.

use embedsync_core::{DEFAULT_TRACKING_ATTRIBUTE, EmbedOptions, MediaData};
use markup5ever_rcdom::Handle;
use tracing::debug;

use crate::Schema;
use crate::dom::{self, Fragment};

/// Patch `html` with the values from `data`.
///
/// With `is_new_embed` the source is re-targeted as well as the dimensions;
/// otherwise only dimensions are updated. The first `<iframe>` in document
/// order is the patch target. When there is none, or nothing changes, the
/// input is returned unchanged.
pub fn update_html(
    html: &str,
    data: &MediaData,
    is_new_embed: bool,
    schema: Option<&Schema>,
) -> String {
    patch(html, data, is_new_embed, schema, DEFAULT_TRACKING_ATTRIBUTE)
}

/// Patch embed markup with custom options.
pub fn update_html_with_options(
    html: &str,
    data: &MediaData,
    is_new_embed: bool,
    schema: Option<&Schema>,
    options: &EmbedOptions,
) -> String {
    patch(html, data, is_new_embed, schema, &options.tracking_attribute)
}

fn patch(
    html: &str,
    data: &MediaData,
    is_new_embed: bool,
    schema: Option<&Schema>,
    tracking_attribute: &str,
) -> String {
    let Some(fragment) = Fragment::parse(html) else {
        return html.to_string();
    };
    if let Some(schema) = schema {
        schema.filter_children(fragment.root());
    }

    let Some(iframe) = fragment.first_element("iframe") else {
        debug!("no iframe to patch, keeping embed markup");
        return html.to_string();
    };

    let changed = match find_container(&fragment, &iframe, tracking_attribute) {
        Some(container) if is_new_embed => retarget_wrapper(&container, &iframe, data, tracking_attribute),
        Some(_) => false,
        None => patch_iframe(&iframe, data, is_new_embed),
    };

    if !changed && schema.is_none() {
        return html.to_string();
    }
    fragment.to_html().unwrap_or_else(|| html.to_string())
}

/// The provider wrapper around `iframe`, if any.
///
/// An ancestor carrying the tracking attribute wins; otherwise the outermost
/// ancestor `<div>` is taken.
fn find_container(fragment: &Fragment, iframe: &Handle, tracking_attribute: &str) -> Option<Handle> {
    let ancestors = dom::ancestors_of(fragment.root(), iframe)?;
    ancestors
        .iter()
        .find(|h| dom::has_attr(h, tracking_attribute))
        .or_else(|| ancestors.iter().find(|h| dom::is_element(h, "div")))
        .cloned()
}

/// Point a wrapped iframe and its container's tracking attribute at the new source.
fn retarget_wrapper(container: &Handle, iframe: &Handle, data: &MediaData, tracking_attribute: &str) -> bool {
    if data.source.is_empty() {
        return false;
    }
    let src = dom::set_attr(iframe, "src", &data.source);
    let tracked = dom::set_attr(container, tracking_attribute, &data.source);
    src || tracked
}

fn patch_iframe(iframe: &Handle, data: &MediaData, is_new_embed: bool) -> bool {
    let mut changed = false;
    if is_new_embed && !data.source.is_empty() {
        changed |= dom::set_attr(iframe, "src", &data.source);
    }
    for (name, value) in [("width", &data.width), ("height", &data.height)] {
        if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
            changed |= dom::set_attr(iframe, name, value);
        }
    }
    changed
}
