//! Crossref adapter: registry metadata plus declared references.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::bibliography::{codec, domain::Doi};
use crate::discovery::{
    domain::{DoiBatch, Reference, ReferenceOrigin},
    ports::{
        CitationError, CitationGraph, CitationLinks, CitationResult, MetadataRegistry,
        RegistryEntry, RegistryError, RegistryResult, Resolution,
    },
};

const DEFAULT_API_BASE: &str = "https://api.crossref.org";
const BIBTEX_TRANSFORM: &str = "transform/application/x-bibtex";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct WorkEnvelope {
    message: Work,
}

#[derive(Debug, Default, Deserialize)]
struct Work {
    #[serde(default)]
    reference: Vec<Value>,
    #[serde(default, rename = "abstract")]
    abstract_markup: Option<String>,
    #[serde(default)]
    license: Vec<License>,
    #[serde(default)]
    link: Vec<Link>,
}

#[derive(Debug, Deserialize)]
struct License {
    #[serde(rename = "URL")]
    url: String,
}

#[derive(Debug, Deserialize)]
struct Link {
    #[serde(rename = "URL")]
    url: String,
}

impl Work {
    fn open_access_url(&self) -> Option<String> {
        let openly_licensed = self
            .license
            .iter()
            .any(|license| license.url.contains("creativecommons.org"));
        if !openly_licensed {
            return None;
        }
        self.link.first().map(|link| link.url.clone())
    }
}

/// Crossref REST client.
#[derive(Debug, Clone)]
pub struct CrossrefClient {
    http: Client,
    api_base: String,
    mailto: Option<String>,
}

impl CrossrefClient {
    /// Creates a client; `mailto` opts into the polite request pool.
    ///
    /// # Errors
    ///
    /// Returns the builder error when the HTTP client cannot be built.
    pub fn new(mailto: Option<String>) -> Result<Self, reqwest::Error> {
        let user_agent = match &mailto {
            Some(address) => format!(
                "bibwarden/{} (mailto:{address})",
                env!("CARGO_PKG_VERSION")
            ),
            None => format!("bibwarden/{}", env!("CARGO_PKG_VERSION")),
        };
        let http = Client::builder()
            .user_agent(user_agent)
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
        let builder = self.http.get(format!("{}/works/{path}", self.api_base));
        match &self.mailto {
            Some(address) => builder.query(&[("mailto", address.as_str())]),
            None => builder,
        }
    }

    /// Sends a request; `Ok(None)` means the work does not exist.
    async fn fetch(builder: RequestBuilder) -> Result<Option<Response>, FetchError> {
        let response = builder.send().await.map_err(FetchError::Transport)?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }
        Ok(Some(response))
    }

    async fn work(&self, doi: &Doi) -> Result<Option<Work>, FetchError> {
        let Some(response) = Self::fetch(self.get(doi.as_str())).await? else {
            return Ok(None);
        };
        let envelope: WorkEnvelope = response.json().await.map_err(FetchError::Transport)?;
        Ok(Some(envelope.message))
    }

    /// Resolves one identifier.
    ///
    /// Error statuses and undecodable replies skip the identifier. Only
    /// transport failures on the record lookup abort the batch.
    async fn resolve_one(&self, doi: &Doi) -> RegistryResult<Option<RegistryEntry>> {
        let path = format!("{}/{BIBTEX_TRANSFORM}", doi.as_str());
        let response = match Self::fetch(self.get(&path)).await {
            Ok(Some(response)) => response,
            Ok(None) => {
                info!(doi = %doi, "registry has no record");
                return Ok(None);
            }
            Err(FetchError::Status(status)) => {
                warn!(doi = %doi, status, "registry refused record, skipping");
                return Ok(None);
            }
            Err(FetchError::Transport(err)) => return Err(RegistryError::transport(err)),
        };
        let text = response.text().await.map_err(RegistryError::transport)?;
        let record = match codec::parse(&text) {
            Ok(records) => records.into_iter().next(),
            Err(err) => {
                warn!(doi = %doi, error = %err, "registry record does not parse, skipping");
                return Ok(None);
            }
        };
        let Some(record) = record else {
            info!(doi = %doi, "registry returned no entry");
            return Ok(None);
        };
        let work = self.details(doi).await;
        Ok(Some(RegistryEntry {
            record,
            abstract_text: work.abstract_markup.as_deref().map(strip_markup),
            open_access_url: work.open_access_url(),
        }))
    }

    /// Work metadata for the abstract and open-access link, empty on failure.
    async fn details(&self, doi: &Doi) -> Work {
        match self.work(doi).await {
            Ok(work) => work.unwrap_or_default(),
            Err(err) => {
                warn!(doi = %doi, error = %err, "work metadata unavailable");
                Work::default()
            }
        }
    }
}

#[derive(Debug, Error)]
enum FetchError {
    #[error("status {0}")]
    Status(u16),
    #[error(transparent)]
    Transport(reqwest::Error),
}

impl FetchError {
    fn into_citation(self) -> CitationError {
        match self {
            Self::Status(status) => CitationError::Unavailable { status },
            Self::Transport(err) => CitationError::transport(err),
        }
    }
}

/// Reduces JATS markup to plain text with single spaces.
fn strip_markup(markup: &str) -> String {
    let mut text = String::with_capacity(markup.len());
    let mut in_tag = false;
    for ch in markup.chars() {
        match ch {
            '<' => {
                in_tag = true;
                text.push(' ');
            }
            '>' if in_tag => in_tag = false,
            _ if !in_tag => text.push(ch),
            _ => {}
        }
    }
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[async_trait]
impl MetadataRegistry for CrossrefClient {
    async fn resolve_batch(&self, batch: &DoiBatch) -> RegistryResult<Vec<Resolution>> {
        let mut resolutions = Vec::with_capacity(batch.len());
        for doi in batch {
            let entry = self.resolve_one(doi).await?;
            resolutions.push(Resolution {
                doi: doi.clone(),
                entry,
            });
        }
        Ok(resolutions)
    }
}

#[async_trait]
impl CitationGraph for CrossrefClient {
    fn name(&self) -> &'static str {
        "crossref"
    }

    async fn links(&self, doi: &Doi) -> CitationResult<CitationLinks> {
        let work = self
            .work(doi)
            .await
            .map_err(FetchError::into_citation)?
            .ok_or_else(|| CitationError::NotFound(doi.clone()))?;
        debug!(doi = %doi, count = work.reference.len(), "crossref references");
        Ok(CitationLinks {
            references: work
                .reference
                .into_iter()
                .map(|raw| Reference::from_raw(ReferenceOrigin::RegistryReference, raw))
                .collect(),
            citations: Vec::new(),
        })
    }
}
