//! GitHub REST adapter for review requests and merge requests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::publish::{
    domain::{BranchName, MergeMethod, MergeRequestNumber},
    ports::MergeRequests,
};
use crate::review::{
    domain::{
        Comment, IssueEdit, IssueNumber, IssueState, NewReviewRequest, RepositoryFullName,
        ReviewLabel, ReviewRequest,
    },
    ports::{IssueTracker, QuotaStatus, TrackerError, TrackerResult},
};

const DEFAULT_API_BASE: &str = "https://api.github.com";
const USER_AGENT: &str = concat!("bibwarden/", env!("CARGO_PKG_VERSION"));
const PAGE_SIZE: usize = 100;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct ApiUser {
    login: String,
}

#[derive(Debug, Deserialize)]
struct ApiLabel {
    name: String,
}

#[derive(Debug, Deserialize)]
struct ApiIssue {
    number: u64,
    title: String,
    #[serde(default)]
    labels: Vec<ApiLabel>,
    state: IssueState,
    #[serde(default)]
    pull_request: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct ApiComment {
    user: ApiUser,
    #[serde(default)]
    body: Option<String>,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct ApiNumber {
    number: u64,
}

#[derive(Debug, Deserialize)]
struct ApiRateLimit {
    resources: ApiRateResources,
}

#[derive(Debug, Deserialize)]
struct ApiRateResources {
    core: ApiRateWindow,
}

#[derive(Debug, Deserialize)]
struct ApiRateWindow {
    remaining: u32,
    reset: i64,
}

#[derive(Debug, Serialize)]
struct IssuePatch<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    labels: Option<&'a [String]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    state: Option<&'static str>,
}

#[derive(Debug, Serialize)]
struct CommentPayload<'a> {
    body: &'a str,
}

#[derive(Debug, Serialize)]
struct PullPayload<'a> {
    title: &'a str,
    head: &'a str,
    base: &'a str,
}

#[derive(Debug, Serialize)]
struct MergePayload {
    merge_method: &'static str,
}

/// GitHub client scoped to one repository.
#[derive(Debug, Clone)]
pub struct GitHubTracker {
    http: Client,
    api_base: String,
    repository: RepositoryFullName,
    token: String,
}

impl GitHubTracker {
    /// Creates a client authenticating with `token`.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Transport`] when the HTTP client cannot be
    /// built.
    pub fn new(repository: RepositoryFullName, token: impl Into<String>) -> TrackerResult<Self> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(TrackerError::transport)?;
        Ok(Self {
            http,
            api_base: DEFAULT_API_BASE.to_owned(),
            repository,
            token: token.into(),
        })
    }

    /// Points the client at another API root, such as GitHub Enterprise.
    #[must_use]
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_owned();
        self
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}/repos/{}{path}", self.api_base, self.repository);
        self.http
            .request(method, url)
            .bearer_auth(&self.token)
            .header("Accept", "application/vnd.github+json")
    }

    async fn send(builder: RequestBuilder) -> TrackerResult<Response> {
        let response = builder.send().await.map_err(TrackerError::transport)?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let quota_exhausted = response
            .headers()
            .get("x-ratelimit-remaining")
            .is_some_and(|value| value.as_bytes() == b"0");
        if (status == StatusCode::FORBIDDEN || status == StatusCode::TOO_MANY_REQUESTS)
            && quota_exhausted
        {
            return Err(TrackerError::RateLimited);
        }
        if status == StatusCode::NOT_FOUND {
            return Err(TrackerError::NotFound);
        }
        if status.is_server_error() {
            return Err(TrackerError::Transient {
                status: status.as_u16(),
            });
        }
        let message = response.text().await.unwrap_or_default();
        Err(TrackerError::Rejected {
            status: status.as_u16(),
            message,
        })
    }

    async fn send_json<T: DeserializeOwned>(builder: RequestBuilder) -> TrackerResult<T> {
        Self::send(builder)
            .await?
            .json()
            .await
            .map_err(TrackerError::transport)
    }

    async fn get_all<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> TrackerResult<Vec<T>> {
        let mut items = Vec::new();
        let page_size = PAGE_SIZE.to_string();
        for page in 1_u32.. {
            let page_number = page.to_string();
            let builder = self
                .request(Method::GET, path)
                .query(query)
                .query(&[("per_page", page_size.as_str()), ("page", page_number.as_str())]);
            let batch: Vec<T> = Self::send_json(builder).await?;
            let fetched = batch.len();
            items.extend(batch);
            if fetched < PAGE_SIZE {
                break;
            }
        }
        Ok(items)
    }
}

#[async_trait]
impl IssueTracker for GitHubTracker {
    async fn create_issue(&self, request: &NewReviewRequest) -> TrackerResult<IssueNumber> {
        debug!(title = request.title(), "opening review request");
        let created: ApiNumber =
            Self::send_json(self.request(Method::POST, "/issues").json(request)).await?;
        IssueNumber::new(created.number).map_err(TrackerError::transport)
    }

    async fn list_issues(&self, label: ReviewLabel) -> TrackerResult<Vec<ReviewRequest>> {
        let issues: Vec<ApiIssue> = self
            .get_all(
                "/issues",
                &[
                    ("labels", label.as_str()),
                    ("state", "open"),
                    ("sort", "created"),
                    ("direction", "asc"),
                ],
            )
            .await?;
        issues
            .into_iter()
            .filter(|issue| issue.pull_request.is_none())
            .map(|issue| {
                Ok(ReviewRequest {
                    number: IssueNumber::new(issue.number).map_err(TrackerError::transport)?,
                    title: issue.title,
                    labels: issue.labels.into_iter().map(|label| label.name).collect(),
                    state: issue.state,
                })
            })
            .collect()
    }

    async fn comments(&self, issue: IssueNumber) -> TrackerResult<Vec<Comment>> {
        let comments: Vec<ApiComment> = self
            .get_all(&format!("/issues/{issue}/comments"), &[])
            .await?;
        Ok(comments
            .into_iter()
            .map(|comment| {
                Comment::new(
                    comment.user.login,
                    comment.body.unwrap_or_default(),
                    comment.created_at,
                )
            })
            .collect())
    }

    async fn add_comment(&self, issue: IssueNumber, body: &str) -> TrackerResult<()> {
        let builder = self
            .request(Method::POST, &format!("/issues/{issue}/comments"))
            .json(&CommentPayload { body });
        Self::send(builder).await.map(drop)
    }

    async fn edit(&self, issue: IssueNumber, edit: &IssueEdit) -> TrackerResult<()> {
        let patch = IssuePatch {
            labels: edit.labels.as_deref(),
            state: edit.state.map(IssueState::as_str),
        };
        let builder = self
            .request(Method::PATCH, &format!("/issues/{issue}"))
            .json(&patch);
        Self::send(builder).await.map(drop)
    }

    async fn quota(&self) -> TrackerResult<QuotaStatus> {
        let url = format!("{}/rate_limit", self.api_base);
        let builder = self
            .http
            .get(url)
            .bearer_auth(&self.token)
            .header("Accept", "application/vnd.github+json");
        let limits: ApiRateLimit = Self::send_json(builder).await?;
        let window = limits.resources.core;
        let reset_at = DateTime::from_timestamp(window.reset, 0).ok_or_else(|| {
            TrackerError::transport(std::io::Error::other(format!(
                "rate limit reset {} out of range",
                window.reset
            )))
        })?;
        Ok(QuotaStatus {
            remaining: window.remaining,
            reset_at,
        })
    }
}

#[async_trait]
impl MergeRequests for GitHubTracker {
    async fn create(
        &self,
        head: &BranchName,
        base: &BranchName,
        title: &str,
    ) -> TrackerResult<MergeRequestNumber> {
        let payload = PullPayload {
            title,
            head: head.as_str(),
            base: base.as_str(),
        };
        let created: ApiNumber =
            Self::send_json(self.request(Method::POST, "/pulls").json(&payload)).await?;
        MergeRequestNumber::new(created.number).map_err(TrackerError::transport)
    }

    async fn merge(&self, number: MergeRequestNumber, method: MergeMethod) -> TrackerResult<()> {
        let builder = self
            .request(Method::PUT, &format!("/pulls/{number}/merge"))
            .json(&MergePayload {
                merge_method: method.as_str(),
            });
        Self::send(builder).await.map(drop)
    }
}
