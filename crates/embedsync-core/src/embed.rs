//! Resolution outcome types.

use serde::{Deserialize, Serialize};

/// The outcome of resolving a media record into insertable markup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedResult {
    /// The URL the markup was resolved for.
    pub url: String,
    /// Markup to insert. Empty when there was nothing to embed.
    pub html: String,
}

impl EmbedResult {
    pub fn new(url: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            html: html.into(),
        }
    }

    /// Check if the result carries a usable URL.
    pub fn has_url(&self) -> bool {
        !self.url.trim().is_empty()
    }
}

/// A provider response, as stored in the embed cache.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
}

impl EmbedResponse {
    pub fn html(html: impl Into<String>) -> Self {
        Self {
            html: Some(html.into()),
        }
    }

    /// The markup, treating an empty string as absent.
    pub fn markup(&self) -> Option<&str> {
        self.html.as_deref().filter(|h| !h.is_empty())
    }
}
