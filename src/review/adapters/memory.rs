//! In-memory issue tracker for tests and dry runs.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::publish::{
    domain::{BranchName, MergeMethod, MergeRequestNumber},
    ports::MergeRequests,
};
use crate::review::{
    domain::{
        Comment, IssueEdit, IssueNumber, IssueState, NewReviewRequest, ReviewLabel, ReviewRequest,
    },
    ports::{IssueTracker, QuotaStatus, TrackerError, TrackerResult},
};

/// Issue held by [`InMemoryIssueTracker`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredIssue {
    /// Issue title, labels and state.
    pub request: ReviewRequest,
    /// Issue body.
    pub body: String,
    /// Thread in posting order.
    pub comments: Vec<Comment>,
}

/// Merge request held by [`InMemoryIssueTracker`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredMergeRequest {
    /// Request number.
    pub number: MergeRequestNumber,
    /// Source branch.
    pub head: BranchName,
    /// Target branch.
    pub base: BranchName,
    /// Request title.
    pub title: String,
    /// Merge method once merged.
    pub merged_with: Option<MergeMethod>,
}

#[derive(Debug)]
struct TrackerState {
    next_number: u64,
    issues: BTreeMap<IssueNumber, StoredIssue>,
    merge_requests: Vec<StoredMergeRequest>,
    quota: QuotaStatus,
    bot_login: String,
}

impl Default for TrackerState {
    fn default() -> Self {
        Self {
            next_number: 1,
            issues: BTreeMap::new(),
            merge_requests: Vec::new(),
            quota: QuotaStatus {
                remaining: u32::MAX,
                reset_at: DateTime::<Utc>::UNIX_EPOCH,
            },
            bot_login: "bibwarden".to_owned(),
        }
    }
}

impl TrackerState {
    fn allocate(&mut self) -> u64 {
        let number = self.next_number;
        self.next_number += 1;
        number
    }

    fn issue_mut(&mut self, issue: IssueNumber) -> TrackerResult<&mut StoredIssue> {
        self.issues.get_mut(&issue).ok_or(TrackerError::NotFound)
    }
}

/// Thread-safe in-memory issue tracker and merge request host.
///
/// Issues and merge requests share one number sequence.
#[derive(Debug, Clone, Default)]
pub struct InMemoryIssueTracker {
    state: Arc<RwLock<TrackerState>>,
}

impl InMemoryIssueTracker {
    /// Creates an empty tracker with unlimited quota.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> TrackerResult<RwLockReadGuard<'_, TrackerState>> {
        self.state
            .read()
            .map_err(|err| TrackerError::transport(std::io::Error::other(err.to_string())))
    }

    fn write(&self) -> TrackerResult<RwLockWriteGuard<'_, TrackerState>> {
        self.state
            .write()
            .map_err(|err| TrackerError::transport(std::io::Error::other(err.to_string())))
    }

    /// Opens an issue directly, as if a person had filed it.
    ///
    /// # Errors
    ///
    /// Returns a transport error when lock acquisition fails.
    pub fn seed_issue(&self, title: &str, labels: &[ReviewLabel]) -> TrackerResult<IssueNumber> {
        let mut state = self.write()?;
        let number = IssueNumber::new(state.allocate()).map_err(TrackerError::transport)?;
        state.issues.insert(
            number,
            StoredIssue {
                request: ReviewRequest {
                    number,
                    title: title.to_owned(),
                    labels: labels.iter().map(|label| label.as_str().to_owned()).collect(),
                    state: IssueState::Open,
                },
                body: String::new(),
                comments: Vec::new(),
            },
        );
        Ok(number)
    }

    /// Appends a comment written by `author` at `created_at`.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::NotFound`] for unknown issues.
    pub fn post_as(
        &self,
        issue: IssueNumber,
        author: &str,
        body: &str,
        created_at: DateTime<Utc>,
    ) -> TrackerResult<()> {
        let mut state = self.write()?;
        state
            .issue_mut(issue)?
            .comments
            .push(Comment::new(author, body, created_at));
        Ok(())
    }

    /// Overrides the quota reported by [`IssueTracker::quota`].
    ///
    /// # Errors
    ///
    /// Returns a transport error when lock acquisition fails.
    pub fn set_quota(&self, quota: QuotaStatus) -> TrackerResult<()> {
        self.write()?.quota = quota;
        Ok(())
    }

    /// Returns a copy of one issue.
    ///
    /// # Errors
    ///
    /// Returns a transport error when lock acquisition fails.
    pub fn issue(&self, issue: IssueNumber) -> TrackerResult<Option<StoredIssue>> {
        Ok(self.read()?.issues.get(&issue).cloned())
    }

    /// Returns copies of all issues in number order.
    ///
    /// # Errors
    ///
    /// Returns a transport error when lock acquisition fails.
    pub fn issues(&self) -> TrackerResult<Vec<StoredIssue>> {
        Ok(self.read()?.issues.values().cloned().collect())
    }

    /// Returns copies of all merge requests in creation order.
    ///
    /// # Errors
    ///
    /// Returns a transport error when lock acquisition fails.
    pub fn merge_requests(&self) -> TrackerResult<Vec<StoredMergeRequest>> {
        Ok(self.read()?.merge_requests.clone())
    }
}

#[async_trait]
impl IssueTracker for InMemoryIssueTracker {
    async fn create_issue(&self, request: &NewReviewRequest) -> TrackerResult<IssueNumber> {
        let mut state = self.write()?;
        let number = IssueNumber::new(state.allocate()).map_err(TrackerError::transport)?;
        state.issues.insert(
            number,
            StoredIssue {
                request: ReviewRequest {
                    number,
                    title: request.title().to_owned(),
                    labels: request.labels().to_vec(),
                    state: IssueState::Open,
                },
                body: request.body().to_owned(),
                comments: Vec::new(),
            },
        );
        Ok(number)
    }

    async fn list_issues(&self, label: ReviewLabel) -> TrackerResult<Vec<ReviewRequest>> {
        let state = self.read()?;
        Ok(state
            .issues
            .values()
            .map(|issue| &issue.request)
            .filter(|request| request.state == IssueState::Open && request.has_label(label))
            .cloned()
            .collect())
    }

    async fn comments(&self, issue: IssueNumber) -> TrackerResult<Vec<Comment>> {
        let state = self.read()?;
        state
            .issues
            .get(&issue)
            .map(|stored| stored.comments.clone())
            .ok_or(TrackerError::NotFound)
    }

    async fn add_comment(&self, issue: IssueNumber, body: &str) -> TrackerResult<()> {
        let mut state = self.write()?;
        let author = state.bot_login.clone();
        state
            .issue_mut(issue)?
            .comments
            .push(Comment::new(author, body, Utc::now()));
        Ok(())
    }

    async fn edit(&self, issue: IssueNumber, edit: &IssueEdit) -> TrackerResult<()> {
        let mut state = self.write()?;
        let stored = state.issue_mut(issue)?;
        if let Some(labels) = &edit.labels {
            stored.request.labels.clone_from(labels);
        }
        if let Some(issue_state) = edit.state {
            stored.request.state = issue_state;
        }
        Ok(())
    }

    async fn quota(&self) -> TrackerResult<QuotaStatus> {
        Ok(self.read()?.quota)
    }
}

#[async_trait]
impl MergeRequests for InMemoryIssueTracker {
    async fn create(
        &self,
        head: &BranchName,
        base: &BranchName,
        title: &str,
    ) -> TrackerResult<MergeRequestNumber> {
        let mut state = self.write()?;
        let number = MergeRequestNumber::new(state.allocate()).map_err(TrackerError::transport)?;
        state.merge_requests.push(StoredMergeRequest {
            number,
            head: head.clone(),
            base: base.clone(),
            title: title.to_owned(),
            merged_with: None,
        });
        Ok(number)
    }

    async fn merge(&self, number: MergeRequestNumber, method: MergeMethod) -> TrackerResult<()> {
        let mut state = self.write()?;
        let request = state
            .merge_requests
            .iter_mut()
            .find(|request| request.number == number)
            .ok_or(TrackerError::NotFound)?;
        if request.merged_with.is_some() {
            return Err(TrackerError::Rejected {
                status: 405,
                message: format!("merge request {number} is already merged"),
            });
        }
        request.merged_with = Some(method);
        Ok(())
    }
}
