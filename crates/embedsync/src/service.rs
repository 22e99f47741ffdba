//! Resolution of media records into insertable markup.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use embedsync_core::{
    EmbedOptions, EmbedResponse, EmbedResult, MediaData, PassthroughUrls, ResolveError,
    UrlConverter,
};
use embedsync_html::data_to_html_with_options;
use parking_lot::RwLock;
use tracing::{debug, trace, warn};

/// URL-keyed store of previously resolved embed responses.
///
/// Presence of a key means the URL was already resolved.
pub trait EmbedCache: Send + Sync {
    fn get(&self, url: &str) -> Option<EmbedResponse>;
    fn set(&self, url: &str, response: EmbedResponse);
    fn has(&self, url: &str) -> bool;
}

/// In-memory cache that keeps entries for its whole lifetime.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, EmbedResponse>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl EmbedCache for MemoryCache {
    fn get(&self, url: &str) -> Option<EmbedResponse> {
        self.entries.read().get(url).cloned()
    }

    fn set(&self, url: &str, response: EmbedResponse) {
        self.entries.write().insert(url.to_string(), response);
    }

    fn has(&self, url: &str) -> bool {
        self.entries.read().contains_key(url)
    }
}

/// Asynchronous lookup of embed markup for a URL.
#[async_trait]
pub trait EmbedProvider: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<EmbedResponse, ResolveError>;
}

/// Turns records into `{url, html}` results, consulting the cache first.
///
/// Without a provider the markup comes from the builder/patcher pipeline and
/// no network is involved.
pub struct EmbedService {
    cache: Arc<dyn EmbedCache>,
    provider: Option<Arc<dyn EmbedProvider>>,
    urls: Arc<dyn UrlConverter>,
    options: EmbedOptions,
}

impl EmbedService {
    /// Create a service with a fresh memory cache and no provider.
    pub fn new() -> Self {
        Self {
            cache: Arc::new(MemoryCache::new()),
            provider: None,
            urls: Arc::new(PassthroughUrls),
            options: EmbedOptions::default(),
        }
    }

    pub fn with_cache(mut self, cache: Arc<dyn EmbedCache>) -> Self {
        self.cache = cache;
        self
    }

    pub fn with_provider(mut self, provider: Arc<dyn EmbedProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn with_urls(mut self, urls: Arc<dyn UrlConverter>) -> Self {
        self.urls = urls;
        self
    }

    pub fn with_options(mut self, options: EmbedOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &EmbedOptions {
        &self.options
    }

    pub fn cache(&self) -> &Arc<dyn EmbedCache> {
        &self.cache
    }

    /// Build or patch markup for `data` without resolving.
    pub fn build_html(&self, data: &MediaData) -> String {
        data_to_html_with_options(data, self.urls.as_ref(), &self.options)
    }

    /// Check if `url` has already been resolved.
    pub fn is_cached(&self, url: &str) -> bool {
        self.cache.has(url)
    }

    /// Resolve a record into insertable markup.
    ///
    /// A failed lookup never populates the cache.
    pub async fn resolve(&self, data: &MediaData) -> Result<EmbedResult, ResolveError> {
        let url = data.source.as_str();
        if url.is_empty() {
            return Ok(EmbedResult::new("", self.build_html(data)));
        }

        if let Some(cached) = self.cache.get(url)
            && let Some(html) = cached.markup()
        {
            trace!(url, "embed cache hit");
            return Ok(EmbedResult::new(url, html));
        }

        let Some(provider) = &self.provider else {
            let html = self.build_html(data);
            if !html.is_empty() && !self.cache.has(url) {
                self.cache.set(url, EmbedResponse::html(html.as_str()));
            }
            return Ok(EmbedResult::new(url, html));
        };

        match provider.fetch(url).await {
            Ok(response) => match response.markup() {
                Some(html) => {
                    self.cache.set(url, response.clone());
                    Ok(EmbedResult::new(url, html))
                }
                None => {
                    debug!(url, "provider returned no markup, building locally");
                    Ok(EmbedResult::new(url, self.build_html(data)))
                }
            },
            Err(err) => {
                warn!(url, error = %err, "embed resolution failed");
                Err(err)
            }
        }
    }
}

impl Default for EmbedService {
    fn default() -> Self {
        Self::new()
    }
}
