//! Recover media fields from embed markup.

use embedsync_core::{DEFAULT_TRACKING_ATTRIBUTE, EmbedOptions, MediaData};
use markup5ever_rcdom::Handle;

use crate::Schema;
use crate::dom::{self, Fragment};

/// Elements whose attributes describe the embedded media itself.
const MEDIA_ELEMENTS: &[&str] = &["iframe", "object", "embed", "video", "audio"];

/// Parse an embed fragment into a partial media record.
///
/// Input without a recognizable media element yields an empty record.
pub fn html_to_data(html: &str, schema: Option<&Schema>) -> MediaData {
    extract(html, schema, DEFAULT_TRACKING_ATTRIBUTE)
}

/// Parse an embed fragment with custom options.
pub fn html_to_data_with_options(
    html: &str,
    schema: Option<&Schema>,
    options: &EmbedOptions,
) -> MediaData {
    extract(html, schema, &options.tracking_attribute)
}

fn extract(html: &str, schema: Option<&Schema>, tracking_attribute: &str) -> MediaData {
    if html.trim().is_empty() {
        return MediaData::default();
    }
    let Some(fragment) = Fragment::parse(html) else {
        return MediaData::default();
    };
    if let Some(schema) = schema {
        schema.filter_children(fragment.root());
    }

    let mut data = MediaData::default();
    let mut seen_media = false;

    dom::walk(fragment.root(), &mut |handle: &Handle| {
        let Some(tag) = dom::tag_name(handle) else {
            return true;
        };

        if let Some(iri) = dom::get_attr(handle, tracking_attribute) {
            data = wrapper_data(handle, iri);
            return false;
        }

        match tag.as_str() {
            "param" if data.source.is_empty() => {
                let name = dom::get_attr(handle, "name").unwrap_or_default();
                if name.eq_ignore_ascii_case("movie") || name.eq_ignore_ascii_case("src") {
                    data.source = dom::get_attr(handle, "value").unwrap_or_default();
                }
            }
            "source" => {
                let src = dom::get_attr(handle, "src").unwrap_or_default();
                if data.source.is_empty() {
                    data.source = src;
                } else if data.altsource.is_empty() {
                    data.altsource = src;
                }
            }
            "img" if data.poster.is_empty() => {
                data.poster = dom::get_attr(handle, "src").unwrap_or_default();
            }
            tag if MEDIA_ELEMENTS.contains(&tag) => {
                fill_from_media_element(&mut data, handle, tag, !seen_media);
                seen_media = true;
            }
            _ => {}
        }
        true
    });

    data
}

/// Fill fields not already set from a media element's attributes.
fn fill_from_media_element(data: &mut MediaData, handle: &Handle, tag: &str, first: bool) {
    let source_attr = if tag == "object" { "data" } else { "src" };
    for (name, value) in dom::attributes(handle) {
        match name.as_str() {
            n if n == source_attr && data.source.is_empty() => data.source = value,
            "poster" if data.poster.is_empty() => data.poster = value,
            "width" if data.width.is_none() => data.width = Some(value),
            "height" if data.height.is_none() => data.height = Some(value),
            "allowfullscreen" if first => data.allowfullscreen = true,
            _ => {}
        }
    }
}

/// Fields of a provider wrapper element carrying a tracking attribute.
fn wrapper_data(handle: &Handle, iri: String) -> MediaData {
    let style = dom::get_attr(handle, "style").unwrap_or_default();
    let from_style = |property: &str| {
        dom::style_property(&style, property)
            .map(|v| v.trim_end_matches("px").to_string())
            .filter(|v| !v.is_empty())
    };
    let iframe = dom::find_first(handle, |h| dom::is_element(h, "iframe"));
    let from_iframe = |attr: &str| iframe.as_ref().and_then(|i| dom::get_attr(i, attr));

    MediaData {
        source: iri,
        width: from_style("max-width").or_else(|| from_iframe("width")),
        height: from_style("max-height").or_else(|| from_iframe("height")),
        allowfullscreen: iframe
            .as_ref()
            .is_some_and(|i| dom::has_attr(i, "allowfullscreen")),
        ..MediaData::default()
    }
}
