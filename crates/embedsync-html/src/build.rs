//! Canonical embed markup for records without prior markup.

use embedsync_core::{EmbedOptions, MediaData, UrlConverter, UrlPurpose};
use tracing::debug;

use crate::{escape_attr, html_to_data_with_options, mime, update_html_with_options};

/// Build embed markup from a media record.
///
/// Returns an empty string when no source can be found, either directly or
/// by parsing `embed`. When the record carries embed markup it is patched in
/// place rather than rebuilt.
pub fn data_to_html(data: &MediaData, urls: &dyn UrlConverter) -> String {
    data_to_html_with_options(data, urls, &EmbedOptions::default())
}

/// Build embed markup with custom options.
pub fn data_to_html_with_options(
    data: &MediaData,
    urls: &dyn UrlConverter,
    options: &EmbedOptions,
) -> String {
    let mut data = data.clone();

    if data.source.is_empty() {
        let embed = data.embed.as_deref().unwrap_or_default();
        let parsed = html_to_data_with_options(embed, None, options);
        data.extend(parsed);
        if data.source.is_empty() {
            debug!("no media source to build an embed from");
            return String::new();
        }
    }

    data.source = urls.convert(&data.source, UrlPurpose::Source);
    if data.source.is_empty() {
        debug!("media source converted to an empty URL");
        return String::new();
    }
    data.altsource = urls.convert(&data.altsource, UrlPurpose::Source);
    data.sourcemime = mime::guess(&data.source).to_string();
    data.altsourcemime = mime::guess(&data.altsource).to_string();
    data.poster = urls.convert(&data.poster, UrlPurpose::Poster);

    if let Some(embed) = data.embed_html() {
        return update_html_with_options(embed, &data, true, None, options);
    }

    let width = non_empty(data.width.as_deref()).unwrap_or(options.default_width.as_str());
    let height = non_empty(data.height.as_deref()).unwrap_or(options.default_height.as_str());
    iframe_html(&data.source, width, height, data.allowfullscreen)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn iframe_html(source: &str, width: &str, height: &str, allow_fullscreen: bool) -> String {
    let mut html = String::from("<iframe src=\"");
    html.push_str(&escape_attr(source));
    html.push_str("\" width=\"");
    html.push_str(&escape_attr(width));
    html.push_str("\" height=\"");
    html.push_str(&escape_attr(height));
    html.push('"');
    if allow_fullscreen {
        html.push_str(" allowFullscreen=\"1\"");
    }
    html.push_str("></iframe>");
    html
}
