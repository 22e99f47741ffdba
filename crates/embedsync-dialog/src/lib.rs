//! Reconciliation between the UI-shaped [`MediaDialogData`] and the flat
//! [`MediaData`] record.
//!
//! [`wrap`] is a plain structural transform. [`unwrap`] resolves each field
//! from several possibly conflicting sources, evaluated first-match-wins:
//!
//! | Field role    | 1st               | 2nd               | 3rd         |
//! |---------------|-------------------|-------------------|-------------|
//! | active field  | own boxed value   | lookup metadata   | flat value  |
//! | other fields  | lookup metadata   | own boxed value   | flat value  |
//!
//! Lookup metadata for a field is the active field's metadata entry named
//! after that field, then the `value` entry of the field's own metadata.
//! Only non-empty candidates match. Dimensions take the active field's
//! `width`/`height` metadata over the entered size.
//!
//! The asymmetry keeps the field being typed into from being overridden by a
//! stale lookup while other fields pick up fresh lookup results immediately.

use embedsync_core::{
    DialogField, Dimensions, FieldValue, MediaData, MediaDialogData, Metadata, UrlField,
};
use tracing::trace;

/// Where a field value may come from during [`unwrap`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Candidate {
    /// The non-empty `value` of a boxed field.
    BoxedValue,
    /// Metadata attached by the most recent URL lookup.
    LookupMetadata,
    /// A bare string field.
    FlatValue,
}

/// Candidate order for the field the user is editing.
pub const ACTIVE_FIELD_ORDER: [Candidate; 3] = [
    Candidate::BoxedValue,
    Candidate::LookupMetadata,
    Candidate::FlatValue,
];

/// Candidate order for every other field.
pub const OTHER_FIELD_ORDER: [Candidate; 3] = [
    Candidate::LookupMetadata,
    Candidate::BoxedValue,
    Candidate::FlatValue,
];

/// Convert a flat record into its UI shape.
pub fn wrap(data: &MediaData) -> MediaDialogData {
    let dimensions = Dimensions {
        width: data.width.clone(),
        height: data.height.clone(),
    };

    MediaDialogData {
        source: Some(FieldValue::boxed(data.source.as_str())),
        altsource: Some(FieldValue::boxed(data.altsource.as_str())),
        poster: Some(FieldValue::boxed(data.poster.as_str())),
        embed: data.embed.clone(),
        dimensions: (!dimensions.is_empty()).then_some(dimensions),
        allowfullscreen: data.allowfullscreen,
    }
}

/// Flatten a UI-shaped record, resolving conflicts in favour of `active`.
pub fn unwrap(dialog: &MediaDialogData, active: Option<DialogField>) -> MediaData {
    let active_meta = active
        .and_then(DialogField::url_field)
        .and_then(|field| dialog.url_field(field))
        .and_then(FieldValue::meta);

    let resolve = |field: UrlField| {
        let is_active = active.and_then(DialogField::url_field) == Some(field);
        resolve_url_field(dialog.url_field(field), field, is_active, active_meta)
    };

    let (width, height) = resolve_dimensions(dialog.dimensions.as_ref(), active_meta);

    MediaData {
        source: resolve(UrlField::Source),
        altsource: resolve(UrlField::AltSource),
        poster: resolve(UrlField::Poster),
        embed: meta_entry(active_meta, "embed")
            .or(dialog.embed.as_deref())
            .filter(|e| !e.is_empty())
            .map(str::to_string),
        width,
        height,
        allowfullscreen: dialog.allowfullscreen,
        ..MediaData::default()
    }
}

fn resolve_url_field(
    value: Option<&FieldValue>,
    field: UrlField,
    is_active: bool,
    active_meta: Option<&Metadata>,
) -> String {
    let order: &[Candidate] = if is_active {
        &ACTIVE_FIELD_ORDER
    } else {
        &OTHER_FIELD_ORDER
    };

    order
        .iter()
        .find_map(|&source| {
            let found = candidate(source, value, field, active_meta)?;
            trace!(field = field.name(), ?source, "resolved dialog field");
            Some(found.to_string())
        })
        .unwrap_or_default()
}

fn candidate<'a>(
    source: Candidate,
    value: Option<&'a FieldValue>,
    field: UrlField,
    active_meta: Option<&'a Metadata>,
) -> Option<&'a str> {
    let found = match (source, value) {
        (Candidate::BoxedValue, Some(FieldValue::WithMeta { value, .. })) => Some(value.as_str()),
        (Candidate::FlatValue, Some(FieldValue::Flat(value))) => Some(value.as_str()),
        (Candidate::LookupMetadata, _) => meta_entry(active_meta, field.name())
            .or_else(|| meta_entry(value.and_then(FieldValue::meta), "value")),
        _ => None,
    };
    found.filter(|v| !v.is_empty())
}

fn resolve_dimensions(
    dimensions: Option<&Dimensions>,
    active_meta: Option<&Metadata>,
) -> (Option<String>, Option<String>) {
    let Some(dimensions) = dimensions else {
        return (None, None);
    };
    let pick = |name: &str, entered: &Option<String>| {
        meta_entry(active_meta, name)
            .map(str::to_string)
            .or_else(|| entered.clone())
    };
    (
        pick("width", &dimensions.width),
        pick("height", &dimensions.height),
    )
}

fn meta_entry<'a>(meta: Option<&'a Metadata>, key: &str) -> Option<&'a str> {
    meta.and_then(|m| m.get(key))
        .map(String::as_str)
        .filter(|v| !v.is_empty())
}
