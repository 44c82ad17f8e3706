//! OpenAlex adapter for references and citations.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

use crate::bibliography::domain::Doi;
use crate::discovery::{
    domain::{Reference, ReferenceOrigin},
    ports::{CitationError, CitationGraph, CitationLinks, CitationResult},
};

const DEFAULT_API_BASE: &str = "https://api.openalex.org";
const PAGE_SIZE: &str = "200";
/// Pages fetched per filter before the listing is truncated.
const MAX_PAGES: usize = 10;
const SELECTED_FIELDS: &str = "id,doi,display_name,publication_year";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct WorkId {
    id: String,
}

#[derive(Debug, Deserialize)]
struct Page {
    meta: PageMeta,
    #[serde(default)]
    results: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct PageMeta {
    #[serde(default)]
    next_cursor: Option<String>,
}

/// OpenAlex REST client.
#[derive(Debug, Clone)]
pub struct OpenAlexClient {
    http: Client,
    api_base: String,
    mailto: Option<String>,
}

impl OpenAlexClient {
    /// Creates a client; `mailto` opts into the polite request pool.
    ///
    /// # Errors
    ///
    /// Returns the builder error when the HTTP client cannot be built.
    pub fn new(mailto: Option<String>) -> Result<Self, reqwest::Error> {
        let http = Client::builder()
            .user_agent(concat!("bibwarden/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            api_base: DEFAULT_API_BASE.to_owned(),
            mailto,
        })
    }

    /// Points the client at another API root.
    #[must_use]
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_owned();
        self
    }

    fn get(&self, path: &str) -> RequestBuilder {
        let builder = self.http.get(format!("{}/{path}", self.api_base));
        match &self.mailto {
            Some(address) => builder.query(&[("mailto", address.as_str())]),
            None => builder,
        }
    }

    async fn work_id(&self, doi: &Doi) -> CitationResult<String> {
        let response = self
            .get(&format!("works/doi:{}", doi.as_str()))
            .query(&[("select", "id")])
            .send()
            .await
            .map_err(CitationError::transport)?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(CitationError::NotFound(doi.clone()));
        }
        if !status.is_success() {
            return Err(CitationError::Unavailable {
                status: status.as_u16(),
            });
        }
        let work: WorkId = response.json().await.map_err(CitationError::transport)?;
        Ok(work
            .id
            .rsplit('/')
            .next()
            .unwrap_or(work.id.as_str())
            .to_owned())
    }

    async fn list(&self, filter: &str, origin: ReferenceOrigin) -> CitationResult<Vec<Reference>> {
        let mut entries = Vec::new();
        let mut cursor = "*".to_owned();
        for _ in 0..MAX_PAGES {
            let response = self
                .get("works")
                .query(&[
                    ("filter", filter),
                    ("select", SELECTED_FIELDS),
                    ("per-page", PAGE_SIZE),
                    ("cursor", cursor.as_str()),
                ])
                .send()
                .await
                .map_err(CitationError::transport)?;
            let status = response.status();
            if !status.is_success() {
                return Err(CitationError::Unavailable {
                    status: status.as_u16(),
                });
            }
            let page: Page = response.json().await.map_err(CitationError::transport)?;
            let fetched = page.results.len();
            entries.extend(
                page.results
                    .into_iter()
                    .map(|raw| Reference::from_raw(origin, raw)),
            );
            match page.meta.next_cursor {
                Some(next) if fetched > 0 => cursor = next,
                _ => return Ok(entries),
            }
        }
        warn!(filter, pages = MAX_PAGES, "openalex listing truncated");
        Ok(entries)
    }
}

#[async_trait]
impl CitationGraph for OpenAlexClient {
    fn name(&self) -> &'static str {
        "openalex"
    }

    async fn links(&self, doi: &Doi) -> CitationResult<CitationLinks> {
        let id = self.work_id(doi).await?;
        let references = self
            .list(&format!("cited_by:{id}"), ReferenceOrigin::GraphReference)
            .await?;
        let citations = self
            .list(&format!("cites:{id}"), ReferenceOrigin::GraphCitation)
            .await?;
        debug!(
            doi = %doi,
            work = %id,
            references = references.len(),
            citations = citations.len(),
            "openalex links"
        );
        Ok(CitationLinks {
            references,
            citations,
        })
    }
}
