//! The flat, canonical media record.

use serde::{Deserialize, Serialize};

/// Canonical structured representation of an embed's attributes.
///
/// `source`, `altsource` and `poster` use the empty string for "absent", the
/// same way the HTML parser reports them. `width`, `height` and `embed` are
/// optional because their absence changes what the builder emits.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaData {
    /// Primary media URL.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub source: String,
    /// Alternate media URL.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub altsource: String,
    /// Poster image URL.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub poster: String,
    /// Raw embed markup. When present it is the single source of truth for rendering.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embed: Option<String>,
    /// Width as text, e.g. `"640"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<String>,
    /// Height as text, e.g. `"360"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<String>,
    /// Guessed MIME type of `source`. Derived, never user-editable.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub sourcemime: String,
    /// Guessed MIME type of `altsource`. Derived, never user-editable.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub altsourcemime: String,
    /// Render the `allowFullscreen` attribute.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub allowfullscreen: bool,
}

impl MediaData {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a record for a media URL.
    pub fn from_source(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            ..Self::default()
        }
    }

    /// Set the embed markup.
    pub fn with_embed(mut self, embed: impl Into<String>) -> Self {
        self.embed = Some(embed.into());
        self
    }

    /// Set both dimensions.
    pub fn with_dimensions(mut self, width: impl Into<String>, height: impl Into<String>) -> Self {
        self.width = Some(width.into());
        self.height = Some(height.into());
        self
    }

    /// Set the poster URL.
    pub fn with_poster(mut self, poster: impl Into<String>) -> Self {
        self.poster = poster.into();
        self
    }

    /// Set the alternate source URL.
    pub fn with_altsource(mut self, altsource: impl Into<String>) -> Self {
        self.altsource = altsource.into();
        self
    }

    /// Set the fullscreen flag.
    pub fn with_allowfullscreen(mut self, allow: bool) -> Self {
        self.allowfullscreen = allow;
        self
    }

    /// Embed markup, treating an empty string as absent.
    pub fn embed_html(&self) -> Option<&str> {
        self.embed.as_deref().filter(|e| !e.is_empty())
    }

    /// Overlay every non-empty field of `other` onto this record.
    ///
    /// Empty strings and `None` in `other` never clear a value here, and the
    /// fullscreen flag can only be switched on.
    pub fn extend(&mut self, other: MediaData) {
        fn overlay(target: &mut String, value: String) {
            if !value.is_empty() {
                *target = value;
            }
        }

        overlay(&mut self.source, other.source);
        overlay(&mut self.altsource, other.altsource);
        overlay(&mut self.poster, other.poster);
        overlay(&mut self.sourcemime, other.sourcemime);
        overlay(&mut self.altsourcemime, other.altsourcemime);
        if other.embed.is_some() {
            self.embed = other.embed;
        }
        if other.width.is_some() {
            self.width = other.width;
        }
        if other.height.is_some() {
            self.height = other.height;
        }
        self.allowfullscreen |= other.allowfullscreen;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extend_keeps_existing_on_empty() {
        let mut data = MediaData::from_source("https://a.test/v.mp4").with_poster("p.png");
        data.extend(MediaData {
            width: Some("640".into()),
            ..MediaData::default()
        });

        assert_eq!(data.source, "https://a.test/v.mp4");
        assert_eq!(data.poster, "p.png");
        assert_eq!(data.width.as_deref(), Some("640"));
        assert_eq!(data.height, None);
    }

    #[test]
    fn test_extend_overwrites_non_empty() {
        let mut data = MediaData::from_source("a").with_dimensions("1", "2");
        data.extend(MediaData::from_source("b").with_dimensions("3", "4"));

        assert_eq!(data.source, "b");
        assert_eq!(data.width.as_deref(), Some("3"));
        assert_eq!(data.height.as_deref(), Some("4"));
    }

    #[test]
    fn test_embed_html_treats_empty_as_absent() {
        assert_eq!(MediaData::new().with_embed("").embed_html(), None);
        assert_eq!(
            MediaData::new().with_embed("<iframe></iframe>").embed_html(),
            Some("<iframe></iframe>")
        );
    }

    #[test]
    fn test_serialize_skips_empty_fields() {
        let json = serde_json::to_string(&MediaData::from_source("x")).unwrap();
        assert_eq!(json, r#"{"source":"x"}"#);

        let back: MediaData = serde_json::from_str(&json).unwrap();
        assert_eq!(back, MediaData::from_source("x"));
    }
}
