//! End-to-end dialog flows: open, edit, submit.
//!
//! Providers are in-memory fakes; nothing here touches the network.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use embedsync::prelude::*;
use embedsync::{Dimensions, EmbedProvider, EmbedResponse};

const WRAPPED: &str = r#"<div class="custom-embed" data-ephox-embed-iri="https://p.test/a"><iframe src="https://p.test/a" width="1" height="1"></iframe></div>"#;
const BARE: &str = r#"<iframe src="https://x.test/e" width="1" height="1"></iframe>"#;

/// Provider that answers every URL the same way and counts lookups.
struct FakeProvider {
    calls: AtomicUsize,
    response: Result<EmbedResponse, ResolveError>,
}

impl FakeProvider {
    fn answering(html: &str) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            response: Ok(EmbedResponse::html(html)),
        })
    }

    fn failing(reason: &str) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            response: Err(ResolveError::Unavailable(reason.to_string())),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EmbedProvider for FakeProvider {
    async fn fetch(&self, _url: &str) -> Result<EmbedResponse, ResolveError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.response.clone()
    }
}

fn with_source(mut dialog: MediaDialogData, source: FieldValue) -> MediaDialogData {
    dialog.source = Some(source);
    dialog
}

mod source_change {
    use super::*;

    #[tokio::test]
    async fn test_retargets_provider_wrapper() {
        let mut session = EmbedSession::open(WRAPPED, Arc::new(EmbedService::new()));
        let dialog = with_source(session.initial_data(), FieldValue::boxed("https://p.test/b"));

        let updated = session.change(DialogField::Source, &dialog).await.unwrap();
        let embed = updated.embed.unwrap();

        assert!(embed.contains(r#"class="custom-embed""#));
        assert!(embed.contains(r#"data-ephox-embed-iri="https://p.test/b""#));
        assert!(embed.contains(r#"src="https://p.test/b""#));
        assert_eq!(session.current().source, "https://p.test/b");
    }

    #[tokio::test]
    async fn test_uses_provider_markup() {
        let provider = FakeProvider::answering(
            r#"<div data-ephox-embed-iri="https://p.test/b"><iframe src="https://p.test/player/b" width="480" height="270"></iframe></div>"#,
        );
        let service = Arc::new(EmbedService::new().with_provider(provider.clone()));
        let mut session = EmbedSession::open("", service.clone());
        let dialog = with_source(MediaDialogData::default(), FieldValue::boxed("https://p.test/b"));

        let updated = session.change(DialogField::Source, &dialog).await.unwrap();

        assert_eq!(updated.source, Some(FieldValue::boxed("https://p.test/b")));
        assert_eq!(
            updated.dimensions,
            Some(Dimensions {
                width: Some("480".into()),
                height: Some("270".into()),
            })
        );
        assert_eq!(provider.calls(), 1);
        assert!(service.is_cached("https://p.test/b"));
    }

    #[tokio::test]
    async fn test_lookup_metadata_supplies_source() {
        let mut session = EmbedSession::open("", Arc::new(EmbedService::new()));
        let meta = BTreeMap::from([("value".to_string(), "https://x.test/v.mp4".to_string())]);
        let dialog = with_source(MediaDialogData::default(), FieldValue::with_meta("", meta));

        let updated = session.change(DialogField::Source, &dialog).await.unwrap();
        assert_eq!(updated.source, Some(FieldValue::boxed("https://x.test/v.mp4")));
        assert!(updated.embed.unwrap().contains(r#"src="https://x.test/v.mp4""#));
    }

    #[tokio::test]
    async fn test_failed_resolution_is_reported_and_not_cached() {
        let service = Arc::new(EmbedService::new().with_provider(FakeProvider::failing("offline")));
        let mut session = EmbedSession::open(BARE, service.clone());
        let dialog = with_source(session.initial_data(), FieldValue::boxed("https://x.test/other"));

        let err = session.change(DialogField::Source, &dialog).await.unwrap_err();

        assert_eq!(err.notification(), "Media embed handler error: offline");
        assert!(!service.is_cached("https://x.test/other"));
        assert_eq!(session.current().source, "https://x.test/e");
    }
}

mod submit {
    use super::*;

    #[tokio::test]
    async fn test_unchanged_source_reuses_patched_embed() {
        let provider = FakeProvider::failing("must not be called");
        let service = Arc::new(EmbedService::new().with_provider(provider.clone()));
        let session = EmbedSession::open(BARE, service);

        let mut dialog = session.initial_data();
        dialog.dimensions = Some(Dimensions {
            width: Some("640".into()),
            height: Some("360".into()),
        });

        let html = session.submit(&dialog).await.unwrap();
        assert_eq!(
            html,
            r#"<iframe src="https://x.test/e" width="640" height="360"></iframe>"#
        );
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_new_source_resolves() {
        let provider = FakeProvider::answering("<div>remote</div>");
        let service = Arc::new(EmbedService::new().with_provider(provider.clone()));
        let session = EmbedSession::open(BARE, service);
        let dialog = with_source(session.initial_data(), FieldValue::boxed("https://x.test/new"));

        let html = session.submit(&dialog).await.unwrap();
        assert_eq!(html, "<div>remote</div>");
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn test_cached_source_skips_resolution() {
        let provider = FakeProvider::answering("<div>remote</div>");
        let service = Arc::new(EmbedService::new().with_provider(provider.clone()));

        service
            .resolve(&MediaData::from_source("https://x.test/new"))
            .await
            .unwrap();
        assert!(service.is_cached("https://x.test/new"));

        let session = EmbedSession::open(BARE, service);
        let dialog = with_source(session.initial_data(), FieldValue::boxed("https://x.test/new"));
        let html = session.submit(&dialog).await.unwrap();

        assert_eq!(html, BARE);
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn test_new_insert_builds_iframe() {
        let session = EmbedSession::open("", Arc::new(EmbedService::new()));
        let dialog = with_source(MediaDialogData::default(), FieldValue::boxed("https://x.test/v.mp4"));

        let html = session.submit(&dialog).await.unwrap();
        assert_eq!(
            html,
            r#"<iframe src="https://x.test/v.mp4" width="300" height="150"></iframe>"#
        );
    }

    #[tokio::test]
    async fn test_failure_propagates() {
        let service = Arc::new(EmbedService::new().with_provider(FakeProvider::failing("offline")));
        let session = EmbedSession::open("", service.clone());
        let dialog = with_source(MediaDialogData::default(), FieldValue::boxed("https://x.test/v"));

        assert!(session.submit(&dialog).await.is_err());
        assert!(!service.is_cached("https://x.test/v"));
    }
}

mod cache {
    use super::*;

    #[tokio::test]
    async fn test_resolve_is_idempotent() {
        let service = EmbedService::new();
        let data = MediaData::from_source("https://x.test/v.mp4");

        let first = service.resolve(&data).await.unwrap();
        let cached = service.cache().get(&data.source);
        let second = service.resolve(&data).await.unwrap();

        assert!(service.is_cached(&data.source));
        assert_eq!(service.cache().get(&data.source), cached);
        assert_eq!(second, first);
    }
}
