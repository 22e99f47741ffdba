//! Decoration of markup handed back by the hosted video console.

use embedsync_core::{DEFAULT_TRACKING_ATTRIBUTE, EmbedOptions};
use markup5ever_rcdom::Handle;

use crate::dom::{self, Fragment};

/// Marker attribute identifying a console-provided wrapper.
pub const PROVIDER_MARKER: &str = "data-s9-embed";

/// Classes added to a console-provided wrapper.
const WRAPPER_CLASSES: &[&str] = &["s9-embed-container", "mce-preview-object"];

/// Aspect ratio used when the console does not report a resolution.
pub const DEFAULT_RESOLUTION: (u32, u32) = (16, 9);

/// Prepare console embed markup for insertion.
///
/// A wrapper `<div>` is marked as a non-editable provider embed that tracks
/// its iframe's URL and keeps the media's aspect ratio. A bare iframe wider
/// than `max_width` is scaled down proportionally. Markup without an iframe
/// is returned unchanged.
pub fn decorate_provider_embed(html: &str, resolution: Option<(u32, u32)>, max_width: u32) -> String {
    decorate(html, resolution, max_width, DEFAULT_TRACKING_ATTRIBUTE)
}

/// Decorate console embed markup with custom options.
pub fn decorate_provider_embed_with_options(
    html: &str,
    resolution: Option<(u32, u32)>,
    max_width: u32,
    options: &EmbedOptions,
) -> String {
    decorate(html, resolution, max_width, &options.tracking_attribute)
}

fn decorate(html: &str, resolution: Option<(u32, u32)>, max_width: u32, tracking_attribute: &str) -> String {
    let Some(fragment) = Fragment::parse(html) else {
        return html.to_string();
    };
    let Some(iframe) = fragment.first_element("iframe") else {
        return html.to_string();
    };

    let decorated = match fragment.first_element("div") {
        Some(wrapper) => {
            decorate_wrapper(&wrapper, &iframe, resolution.unwrap_or(DEFAULT_RESOLUTION), tracking_attribute);
            dom::outer_html(&wrapper)
        }
        None => {
            fit_iframe(&iframe, max_width);
            dom::outer_html(&iframe)
        }
    };
    decorated.unwrap_or_else(|| html.to_string())
}

/// Check if a fragment's root element is an embed the dialog should edit.
pub fn is_media_fragment(html: &str) -> bool {
    is_media_root(html, DEFAULT_TRACKING_ATTRIBUTE)
}

/// Check for an editable embed, recognizing the configured tracking attribute.
pub fn is_media_fragment_with_options(html: &str, options: &EmbedOptions) -> bool {
    is_media_root(html, &options.tracking_attribute)
}

fn is_media_root(html: &str, tracking_attribute: &str) -> bool {
    let Some(fragment) = Fragment::parse(html) else {
        return false;
    };
    let roots = fragment.top_level_elements();
    let [root] = roots.as_slice() else {
        return false;
    };
    dom::has_attr(root, PROVIDER_MARKER)
        || dom::has_attr(root, tracking_attribute)
        || dom::is_element(root, "iframe")
        || dom::get_attr(root, "data-mce-object").as_deref() == Some("iframe")
}

fn decorate_wrapper(wrapper: &Handle, iframe: &Handle, (width, height): (u32, u32), tracking_attribute: &str) {
    if let Some(src) = dom::get_attr(iframe, "src") {
        dom::set_attr(wrapper, tracking_attribute, &src);
    }
    dom::set_attr(wrapper, PROVIDER_MARKER, "");
    dom::set_attr(wrapper, "contenteditable", "false");

    let aspect_ratio = format!("{} / {}", width.max(1), height.max(1));
    let style = set_style_properties(
        &dom::get_attr(wrapper, "style").unwrap_or_default(),
        &[
            ("padding-bottom", "0"),
            ("max-width", "100%"),
            ("border", "0"),
            ("aspect-ratio", &aspect_ratio),
        ],
    );
    dom::set_attr(wrapper, "style", &style);

    let mut classes: Vec<String> = dom::get_attr(wrapper, "class")
        .unwrap_or_default()
        .split_whitespace()
        .map(str::to_string)
        .collect();
    for class in WRAPPER_CLASSES {
        if !classes.iter().any(|c| c == class) {
            classes.push(class.to_string());
        }
    }
    dom::set_attr(wrapper, "class", &classes.join(" "));
}

fn fit_iframe(iframe: &Handle, max_width: u32) {
    let dimension = |name: &str| dom::get_attr(iframe, name).and_then(|v| v.trim().parse::<u32>().ok());
    let (Some(width), Some(height)) = (dimension("width"), dimension("height")) else {
        return;
    };
    if width <= max_width || width == 0 {
        return;
    }
    let scaled = (u64::from(max_width) * u64::from(height) / u64::from(width)).to_string();
    dom::set_attr(iframe, "height", &scaled);
    dom::set_attr(iframe, "width", &max_width.to_string());
}

/// Set declarations in an inline style, replacing existing ones in place.
fn set_style_properties(style: &str, properties: &[(&str, &str)]) -> String {
    let mut declarations: Vec<(String, String)> = style
        .split(';')
        .filter_map(|d| d.split_once(':'))
        .map(|(name, value)| (name.trim().to_string(), value.trim().to_string()))
        .filter(|(name, _)| !name.is_empty())
        .collect();

    for (name, value) in properties {
        match declarations.iter_mut().find(|(n, _)| n.eq_ignore_ascii_case(name)) {
            Some(existing) => existing.1 = value.to_string(),
            None => declarations.push((name.to_string(), value.to_string())),
        }
    }

    declarations
        .iter()
        .map(|(name, value)| format!("{name}: {value};"))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decorate_wrapper() {
        let html = r#"<div style="position: relative; padding-bottom: 56.25%"><iframe src="https://p.test/e/1"></iframe></div><script src="x.js"></script>"#;
        let out = decorate_provider_embed(html, Some((4, 3)), 480);

        assert!(out.starts_with("<div "));
        assert!(out.ends_with("</div>"));
        assert!(!out.contains("script"));
        assert!(out.contains(r#"data-ephox-embed-iri="https://p.test/e/1""#));
        assert!(out.contains(r#"data-s9-embed="""#));
        assert!(out.contains(r#"contenteditable="false""#));
        assert!(out.contains(
            r#"style="position: relative; padding-bottom: 0; max-width: 100%; border: 0; aspect-ratio: 4 / 3;""#
        ));
        assert!(out.contains(r#"class="s9-embed-container mce-preview-object""#));
    }

    #[test]
    fn test_decorate_wrapper_default_resolution() {
        let out = decorate_provider_embed(r#"<div class="s9-embed-container"><iframe src="a"></iframe></div>"#, None, 480);
        assert!(out.contains("aspect-ratio: 16 / 9;"));
        assert!(out.contains(r#"class="s9-embed-container mce-preview-object""#));
    }

    #[test]
    fn test_fit_wide_iframe() {
        let out = decorate_provider_embed(r#"<iframe src="a" width="960" height="540"></iframe>"#, None, 480);
        assert_eq!(out, r#"<iframe src="a" width="480" height="270"></iframe>"#);
    }

    #[test]
    fn test_narrow_iframe_untouched() {
        let out = decorate_provider_embed(r#"<iframe src="a" width="320" height="180"></iframe>"#, None, 480);
        assert_eq!(out, r#"<iframe src="a" width="320" height="180"></iframe>"#);
    }

    #[test]
    fn test_decorate_without_iframe() {
        assert_eq!(decorate_provider_embed("<p>hi</p>", None, 480), "<p>hi</p>");
    }

    #[test]
    fn test_custom_tracking_attribute() {
        let options = EmbedOptions {
            tracking_attribute: "data-embed-url".to_string(),
            ..EmbedOptions::default()
        };
        let wrapped = r#"<div data-embed-url="https://p.test/e/2"><iframe src="x"></iframe></div>"#;
        assert!(is_media_fragment_with_options(wrapped, &options));
        assert!(!is_media_fragment(wrapped));

        let out = decorate_provider_embed_with_options(
            r#"<div><iframe src="https://p.test/e/3"></iframe></div>"#,
            None,
            480,
            &options,
        );
        assert!(out.contains(r#"data-embed-url="https://p.test/e/3""#));
        assert!(!out.contains("data-ephox-embed-iri"));
    }

    #[test]
    fn test_is_media_fragment() {
        assert!(is_media_fragment(r#"<div data-s9-embed=""><iframe src="a"></iframe></div>"#));
        assert!(is_media_fragment(r#"<div data-ephox-embed-iri="a"></div>"#));
        assert!(is_media_fragment(r#"<iframe src="a"></iframe>"#));
        assert!(!is_media_fragment("<p>text</p>"));
        assert!(!is_media_fragment(""));
        assert!(!is_media_fragment(r#"<iframe src="a"></iframe><iframe src="b"></iframe>"#));
    }
}
