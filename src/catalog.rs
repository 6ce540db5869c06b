use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::env;
use std::time::Duration;

use crate::models::{GenrePage, TitleDetail, TitlePage, TitleRef};

pub const DEFAULT_API_BASE: &str = "http://localhost:8000/api/v1";

/// Sort expression used by every ranked title list.
const TOP_RATED_SORT: &str = "-imdb_score,-votes";

/// Title-list genre filter. The API accepts either form.
#[derive(Debug, Clone)]
pub enum GenreFilter {
    Name(String),
    Id(u64),
}

/// Read side of the catalog REST API. Sections and resolvers depend on this
/// trait so tests can substitute an in-memory fake.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// Titles sorted by `-imdb_score,-votes`.
    async fn top_rated(&self, page_size: usize, page: usize) -> Result<TitlePage>;

    /// Titles restricted to one genre, same sort order.
    async fn titles_in_genre(
        &self,
        genre: &GenreFilter,
        page_size: usize,
        page: usize,
    ) -> Result<TitlePage>;

    /// Full detail payload for one title.
    async fn title_detail<'a>(&self, title: TitleRef<'a>) -> Result<TitleDetail>;

    /// One page of the genre collection; `cursor` is the absolute `next` URL
    /// from a previous page, or `None` for the first page.
    async fn genre_page(&self, cursor: Option<&str>) -> Result<GenrePage>;
}

#[derive(Debug, Clone)]
pub struct CatalogClient {
    client: Client,
    base: String,
}

impl CatalogClient {
    pub fn new(api_base: &str) -> Result<Self> {
        let user_agent = format!("cinegrid/{}", env!("CARGO_PKG_VERSION"));
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(30))
            .user_agent(user_agent)
            .build()
            .context("Failed to build catalog HTTP client")?;
        Ok(Self {
            client,
            base: api_base.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_env() -> Result<Self> {
        let base = env::var("CATALOG_API_BASE").unwrap_or_else(|_| DEFAULT_API_BASE.to_string());
        Self::new(&base)
    }

    /// Shared reqwest client, reused by the poster probe.
    pub fn http_client(&self) -> Client {
        self.client.clone()
    }

    /// Detail URL resolution. A summary's literal `url` wins; otherwise the
    /// id is used. A summary with neither is a caller bug and fails before
    /// any I/O happens.
    fn detail_url(&self, title: TitleRef<'_>) -> Result<String> {
        let mut url = match title {
            TitleRef::ById(id) => format!("{}/titles/{}/", self.base, id),
            TitleRef::BySummary(summary) => match summary.url.as_deref() {
                Some(u) if u.starts_with("http") => u.to_string(),
                _ if summary.id > 0 => format!("{}/titles/{}/", self.base, summary.id),
                _ => return Err(anyhow!("no id or URL resolvable for detail fetch")),
            },
        };
        if !url.contains('?') {
            url.push_str("?format=json");
        }
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let res = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .with_context(|| format!("request to {url} failed"))?;
        let status = res.status();
        let body = res.text().await.context("reading response body failed")?;
        if !status.is_success() {
            let snippet: String = body.chars().take(200).collect();
            return Err(anyhow!(
                "HTTP {} {} \u{2013} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("?"),
                snippet
            ));
        }
        serde_json::from_str(&body).with_context(|| format!("JSON parse failed for {url}"))
    }
}

#[async_trait]
impl CatalogApi for CatalogClient {
    async fn top_rated(&self, page_size: usize, page: usize) -> Result<TitlePage> {
        let url = format!(
            "{}/titles/?sort_by={}&page_size={}&page={}",
            self.base,
            urlencoding::encode(TOP_RATED_SORT),
            page_size,
            page
        );
        self.get_json(&url).await
    }

    async fn titles_in_genre(
        &self,
        genre: &GenreFilter,
        page_size: usize,
        page: usize,
    ) -> Result<TitlePage> {
        let filter = match genre {
            GenreFilter::Name(name) => format!("genre={}", urlencoding::encode(name)),
            GenreFilter::Id(id) => format!("genre_id={id}"),
        };
        let url = format!(
            "{}/titles/?sort_by={}&page_size={}&page={}&{}",
            self.base,
            urlencoding::encode(TOP_RATED_SORT),
            page_size,
            page,
            filter
        );
        self.get_json(&url).await
    }

    async fn title_detail<'a>(&self, title: TitleRef<'a>) -> Result<TitleDetail> {
        let url = self.detail_url(title)?;
        self.get_json(&url).await
    }

    async fn genre_page(&self, cursor: Option<&str>) -> Result<GenrePage> {
        let url = match cursor {
            Some(next) => next.to_string(),
            None => format!("{}/genres/", self.base),
        };
        self.get_json(&url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TitleSummary;

    fn client() -> CatalogClient {
        CatalogClient::new("http://api.test/api/v1/").unwrap()
    }

    #[test]
    fn detail_url_prefers_summary_url_and_appends_format() {
        let c = client();
        let summary = TitleSummary {
            id: 7,
            url: Some("http://api.test/api/v1/titles/7/".into()),
            ..Default::default()
        };
        assert_eq!(
            c.detail_url(TitleRef::BySummary(&summary)).unwrap(),
            "http://api.test/api/v1/titles/7/?format=json"
        );
    }

    #[test]
    fn detail_url_keeps_existing_query() {
        let c = client();
        let summary = TitleSummary {
            id: 7,
            url: Some("http://api.test/api/v1/titles/7/?format=json".into()),
            ..Default::default()
        };
        let url = c.detail_url(TitleRef::BySummary(&summary)).unwrap();
        assert_eq!(url.matches('?').count(), 1);
    }

    #[test]
    fn detail_url_falls_back_to_id() {
        let c = client();
        let summary = TitleSummary {
            id: 42,
            ..Default::default()
        };
        assert_eq!(
            c.detail_url(TitleRef::BySummary(&summary)).unwrap(),
            "http://api.test/api/v1/titles/42/?format=json"
        );
        assert_eq!(
            c.detail_url(TitleRef::ById(42)).unwrap(),
            "http://api.test/api/v1/titles/42/?format=json"
        );
    }

    #[test]
    fn detail_url_rejects_unresolvable_summary() {
        let c = client();
        let summary = TitleSummary::default(); // id 0, no url
        assert!(c.detail_url(TitleRef::BySummary(&summary)).is_err());
    }
}
