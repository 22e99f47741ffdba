//! HTML side of embedsync.
//!
//! Converts between embed fragments and [`MediaData`] records:
//! - [`html_to_data`] recovers fields from hand-authored or provider markup
//! - [`data_to_html`] builds canonical `<iframe>` markup for new embeds
//! - [`update_html`] patches existing markup in place
//!
//! Fragments are parsed into detached html5ever trees, so malformed input
//! never fails; it degrades to an empty record or a pass-through.

mod build;
mod dom;
pub mod mime;
mod provider;
mod read;
mod schema;
mod update;

pub use build::{data_to_html, data_to_html_with_options};
pub use provider::{
    DEFAULT_RESOLUTION, PROVIDER_MARKER, decorate_provider_embed, decorate_provider_embed_with_options,
    is_media_fragment, is_media_fragment_with_options,
};
pub use read::{html_to_data, html_to_data_with_options};
pub use schema::Schema;
pub use update::{update_html, update_html_with_options};

#[doc(no_inline)]
pub use embedsync_core::MediaData;

/// Escape attribute values.
pub(crate) fn escape_attr(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}
