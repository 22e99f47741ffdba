//! embedsync - media embed synchronization engine
//!
//! Keeps a flat media record and an HTML embed fragment in sync:
//! - Parse hand-authored or provider markup into a record
//! - Build canonical `<iframe>` markup for new embeds
//! - Patch existing markup in place, preserving provider wrappers
//! - Reconcile UI-shaped dialog data with lookup metadata
//! - Resolve records into insertable markup through a cache
//!
//! # Quick Start
//!
//! ```rust
//! use embedsync::prelude::*;
//!
//! let data = MediaData::from_source("https://x.test/v.mp4");
//! let html = embedsync::html::data_to_html(&data, &PassthroughUrls);
//! assert!(html.contains(r#"width="300" height="150""#));
//!
//! let parsed = embedsync::html::html_to_data(&html, None);
//! assert_eq!(parsed.source, data.source);
//! ```
//!
//! # Architecture
//!
//! The pure transforms live in `embedsync-html` and `embedsync-dialog` and
//! never fail; malformed markup degrades to an empty record or is passed
//! through. Only resolution is asynchronous and fallible: [`EmbedService`]
//! consults an [`EmbedCache`] and an optional [`EmbedProvider`], and
//! [`EmbedSession`] drives a dialog from open to submit.

mod service;
mod session;

// Re-export core types
pub use embedsync_core::*;

pub use service::{EmbedCache, EmbedProvider, EmbedService, MemoryCache};
pub use session::EmbedSession;

/// HTML fragment transforms.
pub mod html {
    pub use embedsync_html::mime;
    pub use embedsync_html::{
        DEFAULT_RESOLUTION, PROVIDER_MARKER, Schema, data_to_html, data_to_html_with_options,
        decorate_provider_embed, decorate_provider_embed_with_options, html_to_data,
        html_to_data_with_options, is_media_fragment, is_media_fragment_with_options, update_html,
        update_html_with_options,
    };
}

/// Dialog data reconciliation.
pub mod dialog {
    pub use embedsync_dialog::{ACTIVE_FIELD_ORDER, Candidate, OTHER_FIELD_ORDER, unwrap, wrap};
}

/// Prelude for common imports.
pub mod prelude {
    pub use crate::{
        DialogField, EmbedOptions, EmbedResult, EmbedService, EmbedSession, FieldValue,
        MediaData, MediaDialogData, PassthroughUrls, ResolveError,
    };
}
