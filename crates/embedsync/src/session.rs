//! Dialog session controller.
//!
//! Owns the record being edited between opening the media dialog and
//! submitting it, and turns each field edit into the dialog data to show
//! next.

use std::sync::Arc;

use embedsync_core::{DialogField, MediaData, MediaDialogData, ResolveError, SelectionSnapshot};
use embedsync_dialog::{unwrap, wrap};
use embedsync_html::{
    Schema, html_to_data_with_options, is_media_fragment_with_options, update_html_with_options,
};
use tracing::debug;

use crate::EmbedService;

/// One open media dialog.
pub struct EmbedSession {
    service: Arc<EmbedService>,
    schema: Option<Schema>,
    current: MediaData,
}

impl EmbedSession {
    /// Open a session on the fragment under edit.
    ///
    /// A snapshot that is not a media embed starts an empty insert.
    pub fn open<S>(snapshot: &S, service: Arc<EmbedService>) -> Self
    where
        S: SelectionSnapshot + ?Sized,
    {
        let schema = Schema::from_options(service.options());
        let current = match snapshot.snapshot() {
            Some(snippet) if is_media_fragment_with_options(&snippet, service.options()) => {
                let mut data = html_to_data_with_options(&snippet, schema.as_ref(), service.options());
                data.embed = Some(snippet);
                data
            }
            _ => MediaData::default(),
        };

        Self {
            service,
            schema,
            current,
        }
    }

    /// The record as of the last change.
    pub fn current(&self) -> &MediaData {
        &self.current
    }

    /// Dialog data to show when the dialog opens.
    pub fn initial_data(&self) -> MediaDialogData {
        self.present(&self.current)
    }

    /// Apply an edit to `field` and return the dialog data to show.
    pub async fn change(
        &mut self,
        field: DialogField,
        dialog: &MediaDialogData,
    ) -> Result<MediaDialogData, ResolveError> {
        let updated = match field {
            DialogField::Source => self.change_source(dialog).await?,
            DialogField::Embed => {
                let embed = unwrap(dialog, None).embed.unwrap_or_default();
                let mut data = self.parse(&embed);
                data.embed = Some(embed).filter(|e| !e.is_empty());
                self.present(&data)
            }
            DialogField::AltSource | DialogField::Poster | DialogField::Dimensions => {
                let mut data = unwrap(dialog, Some(field));
                let embed = self.service.build_html(&data);
                data.embed = Some(embed).filter(|e| !e.is_empty());
                self.present(&data)
            }
        };

        self.current = unwrap(&updated, None);
        Ok(updated)
    }

    /// Produce the markup to insert for the submitted dialog data.
    ///
    /// The patched embed is reused as-is when the source has not changed or
    /// was already resolved.
    pub async fn submit(&self, dialog: &MediaDialogData) -> Result<String, ResolveError> {
        let mut data = unwrap(dialog, None);
        let embed = update_html_with_options(
            data.embed.as_deref().unwrap_or_default(),
            &data,
            false,
            self.schema.as_ref(),
            self.service.options(),
        );
        data.embed = Some(embed).filter(|e| !e.is_empty());

        if let Some(embed) = data.embed_html()
            && (data.source == self.current.source || self.service.is_cached(&data.source))
        {
            debug!(source = %data.source, "reusing embed markup");
            return Ok(embed.to_string());
        }

        Ok(self.service.resolve(&data).await?.html)
    }

    async fn change_source(&self, dialog: &MediaDialogData) -> Result<MediaDialogData, ResolveError> {
        let mut data = unwrap(dialog, Some(DialogField::Source));
        if data.source == self.current.source {
            return Ok(dialog.clone());
        }

        if let Some(embed) = data.embed_html() {
            let retargeted = update_html_with_options(
                embed,
                &data,
                true,
                self.schema.as_ref(),
                self.service.options(),
            );
            data.embed = Some(retargeted);
        }

        let result = self.service.resolve(&data).await?;
        if !result.has_url() {
            return Ok(dialog.clone());
        }

        let mut resolved = self.parse(&result.html);
        resolved.source = result.url;
        resolved.embed = Some(result.html).filter(|e| !e.is_empty());
        Ok(self.present(&resolved))
    }

    fn parse(&self, html: &str) -> MediaData {
        html_to_data_with_options(html, self.schema.as_ref(), self.service.options())
    }

    fn present(&self, data: &MediaData) -> MediaDialogData {
        let mut dialog = wrap(data);
        if !self.service.options().dimensions {
            dialog.dimensions = None;
        }
        dialog
    }
}
