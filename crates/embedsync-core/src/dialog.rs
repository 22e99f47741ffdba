//! The nested, UI-shaped view of a media record.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Side information a URL lookup attached to a field (resolved values keyed by
/// field name, dimensions, mime types, ...).
pub type Metadata = BTreeMap<String, String>;

/// A URL-bearing dialog field.
///
/// Hosts hand over either a bare string or a `{ value, meta }` box; the two
/// shapes are kept apart so reconciliation never has to inspect types at
/// runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// A bare string value.
    Flat(String),
    /// A boxed value, optionally carrying lookup metadata.
    WithMeta {
        value: String,
        #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
        meta: Metadata,
    },
}

impl FieldValue {
    /// Box a value without metadata.
    pub fn boxed(value: impl Into<String>) -> Self {
        FieldValue::WithMeta {
            value: value.into(),
            meta: Metadata::new(),
        }
    }

    /// Box a value together with lookup metadata.
    pub fn with_meta(value: impl Into<String>, meta: Metadata) -> Self {
        FieldValue::WithMeta {
            value: value.into(),
            meta,
        }
    }

    /// The raw value, whichever shape holds it.
    pub fn value(&self) -> &str {
        match self {
            FieldValue::Flat(value) => value,
            FieldValue::WithMeta { value, .. } => value,
        }
    }

    /// Attached metadata, if this is a boxed value.
    pub fn meta(&self) -> Option<&Metadata> {
        match self {
            FieldValue::Flat(_) => None,
            FieldValue::WithMeta { meta, .. } => Some(meta),
        }
    }
}

/// Width and height as entered in the size input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dimensions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<String>,
}

impl Dimensions {
    /// Check if neither dimension is set.
    pub fn is_empty(&self) -> bool {
        self.width.is_none() && self.height.is_none()
    }
}

/// UI-shaped record: a derived view of [`MediaData`](crate::MediaData) plus
/// transient lookup metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaDialogData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<FieldValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub altsource: Option<FieldValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster: Option<FieldValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embed: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<Dimensions>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub allowfullscreen: bool,
}

impl MediaDialogData {
    /// Look up a URL-bearing field by name.
    pub fn url_field(&self, field: UrlField) -> Option<&FieldValue> {
        match field {
            UrlField::Source => self.source.as_ref(),
            UrlField::AltSource => self.altsource.as_ref(),
            UrlField::Poster => self.poster.as_ref(),
        }
    }

    /// Mutable access to a URL-bearing field slot.
    pub fn url_field_mut(&mut self, field: UrlField) -> &mut Option<FieldValue> {
        match field {
            UrlField::Source => &mut self.source,
            UrlField::AltSource => &mut self.altsource,
            UrlField::Poster => &mut self.poster,
        }
    }
}

/// The URL-bearing fields of a dialog record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UrlField {
    Source,
    AltSource,
    Poster,
}

impl UrlField {
    pub const ALL: [UrlField; 3] = [UrlField::Source, UrlField::AltSource, UrlField::Poster];

    /// The field name as it appears in records and metadata keys.
    pub fn name(self) -> &'static str {
        match self {
            UrlField::Source => "source",
            UrlField::AltSource => "altsource",
            UrlField::Poster => "poster",
        }
    }
}

/// A dialog field that can be edited, used as the "active field" hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DialogField {
    Source,
    AltSource,
    Poster,
    Dimensions,
    Embed,
}

impl DialogField {
    /// The URL field this edit targets, if any.
    pub fn url_field(self) -> Option<UrlField> {
        match self {
            DialogField::Source => Some(UrlField::Source),
            DialogField::AltSource => Some(UrlField::AltSource),
            DialogField::Poster => Some(UrlField::Poster),
            DialogField::Dimensions | DialogField::Embed => None,
        }
    }

    /// The field name as reported by the dialog host.
    pub fn name(self) -> &'static str {
        match self {
            DialogField::Source => "source",
            DialogField::AltSource => "altsource",
            DialogField::Poster => "poster",
            DialogField::Dimensions => "dimensions",
            DialogField::Embed => "embed",
        }
    }

    /// Parse a host field name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "source" => Some(DialogField::Source),
            "altsource" => Some(DialogField::AltSource),
            "poster" => Some(DialogField::Poster),
            "dimensions" => Some(DialogField::Dimensions),
            "embed" => Some(DialogField::Embed),
            _ => None,
        }
    }
}

impl From<UrlField> for DialogField {
    fn from(field: UrlField) -> Self {
        match field {
            UrlField::Source => DialogField::Source,
            UrlField::AltSource => DialogField::AltSource,
            UrlField::Poster => DialogField::Poster,
        }
    }
}
