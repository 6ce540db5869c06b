//! Poster URL resolution, load probing, and the per-session cache.
//!
//! Every poster goes through the backend proxy so the client never talks to
//! third-party image hosts directly. The proxy is contracted to answer 200 in
//! all cases; the parameterless URL serves a static placeholder. The probe
//! chain guarantees the terminal URL is one known to render.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::debug;

use crate::models::TitleSummary;

const PROXY_PATH: &str = "/titles/posters/";

/// Builds proxy URLs for a given API base.
#[derive(Debug, Clone)]
pub struct PosterUrls {
    base: String,
}

impl PosterUrls {
    pub fn new(api_base: &str) -> Self {
        Self {
            base: format!("{}{}", api_base.trim_end_matches('/'), PROXY_PATH),
        }
    }

    /// Proxy URL carrying the raw image URL and/or the IMDb page hint as
    /// query parameters. With neither input, this is the fallback URL.
    pub fn proxy_url(&self, raw_image: &str, imdb_hint: &str) -> String {
        let mut params = Vec::new();
        if !raw_image.is_empty() {
            params.push(format!("url={}", urlencoding::encode(raw_image)));
        }
        if !imdb_hint.is_empty() {
            params.push(format!("imdb={}", urlencoding::encode(imdb_hint)));
        }
        if params.is_empty() {
            return self.fallback_url();
        }
        format!("{}?{}", self.base, params.join("&"))
    }

    /// Parameterless proxy URL, contracted to serve a placeholder image.
    pub fn fallback_url(&self) -> String {
        self.base.clone()
    }

    /// A fallback is the proxy path with no query string. Fallbacks are
    /// never cached.
    pub fn is_fallback(&self, url: &str) -> bool {
        url.contains(PROXY_PATH) && !url.contains('?')
    }
}

/// Session-scoped map from title id to the last URL confirmed to load.
/// Owned by the composition root and shared by handle; entries are only ever
/// written after a successful probe.
#[derive(Debug)]
pub struct PosterCache {
    urls: PosterUrls,
    entries: Mutex<HashMap<u64, String>>,
}

impl PosterCache {
    pub fn new(urls: PosterUrls) -> Self {
        Self {
            urls,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Stores `url` under `id` unless it is empty or a fallback URL.
    /// Returns whether it stored.
    pub fn remember(&self, id: u64, url: &str) -> bool {
        if id == 0 || url.is_empty() || self.urls.is_fallback(url) {
            return false;
        }
        self.entries
            .lock()
            .expect("poster cache poisoned")
            .insert(id, url.to_string());
        true
    }

    pub fn cached(&self, id: u64) -> Option<String> {
        self.entries
            .lock()
            .expect("poster cache poisoned")
            .get(&id)
            .cloned()
    }
}

/// Answers "does this URL render as an image?". Trait seam so tests can
/// script probe outcomes.
#[async_trait]
pub trait ImageProbe: Send + Sync {
    async fn loads(&self, url: &str) -> bool;
}

/// HTTP probe: success means 2xx with an `image/*` content type. Any
/// transport failure is a recoverable "does not load", never an error.
pub struct HttpImageProbe {
    client: Client,
}

impl HttpImageProbe {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ImageProbe for HttpImageProbe {
    async fn loads(&self, url: &str) -> bool {
        let res = match self.client.get(url).send().await {
            Ok(res) => res,
            Err(err) => {
                debug!("poster probe failed for {url}: {err}");
                return false;
            }
        };
        if !res.status().is_success() {
            return false;
        }
        res.headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.starts_with("image/"))
            .unwrap_or(false)
    }
}

/// Runs the probe chain for one title: proxy URL, then the hint-only retry,
/// then the static placeholder. Chains for different titles are independent.
pub struct PosterResolver {
    urls: PosterUrls,
    probe: Arc<dyn ImageProbe>,
    cache: Arc<PosterCache>,
}

impl PosterResolver {
    pub fn new(urls: PosterUrls, probe: Arc<dyn ImageProbe>, cache: Arc<PosterCache>) -> Self {
        Self { urls, probe, cache }
    }

    /// Resolves a URL that is known to render. Non-fallback results are
    /// remembered so the detail modal reuses them instead of re-probing.
    pub async fn resolve(&self, item: &TitleSummary) -> String {
        if let Some(hit) = self.cache.cached(item.id) {
            return hit;
        }

        let image = item.image_url.as_deref().unwrap_or("");
        let hint = item.imdb_url.as_deref().unwrap_or("");

        let primary = self.urls.proxy_url(image, hint);
        if !self.urls.is_fallback(&primary) && self.probe.loads(&primary).await {
            self.cache.remember(item.id, &primary);
            return primary;
        }

        // Drop the raw image URL and let the backend resolve via the hint.
        if !image.is_empty() && !hint.is_empty() {
            let retry = self.urls.proxy_url("", hint);
            if self.probe.loads(&retry).await {
                self.cache.remember(item.id, &retry);
                return retry;
            }
        }

        debug!(id = item.id, "poster probe chain exhausted, using placeholder");
        self.urls.fallback_url()
    }
}
