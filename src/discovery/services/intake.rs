//! Intake Process.

use std::sync::Arc;
use thiserror::Error;
use tracing::info;

use super::report::review_request_body;
use crate::bibliography::domain::{BibliographyError, CitationKey, Doi, WorkingSet};
use crate::discovery::{
    domain::DoiBatch,
    ports::{MetadataRegistry, RegistryEntry, RegistryError},
};
use crate::review::{
    domain::{IssueNumber, NewReviewRequest, ReviewDomainError},
    ports::{IssueTracker, TrackerError},
    services::RateLimitGate,
};

/// Errors returned while admitting identifiers.
#[derive(Debug, Clone, Error)]
pub enum IntakeError {
    /// An identity invariant would be broken.
    #[error(transparent)]
    Bibliography(#[from] BibliographyError),

    /// The registry failed.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// The review request could not be built.
    #[error(transparent)]
    Review(#[from] ReviewDomainError),

    /// The issue tracker failed.
    #[error(transparent)]
    Tracker(#[from] TrackerError),

    /// The review request body could not be rendered.
    #[error("failed to render review request for {doi}: {reason}")]
    Template {
        /// Identifier being admitted.
        doi: Doi,
        /// Renderer message.
        reason: String,
    },
}

/// Result type for intake operations.
pub type IntakeResult<T> = Result<T, IntakeError>;

/// Record admitted to `in-review`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Admitted {
    /// Canonical identifier.
    pub doi: Doi,
    /// Assigned display key.
    pub key: CitationKey,
    /// Opened review request.
    pub issue: IssueNumber,
}

impl Admitted {
    /// Returns the commit title line for this admission.
    #[must_use]
    pub fn commit_line(&self) -> String {
        format!("in-review: Add {} #{}", self.key, self.issue)
    }
}

/// What happened to each identifier of an intake run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IntakeReport {
    /// Newly admitted records.
    pub admitted: Vec<Admitted>,
    /// Identifiers already present, skipped.
    pub already_known: Vec<Doi>,
    /// Identifiers the registry had no record for.
    pub not_found: Vec<Doi>,
}

impl IntakeReport {
    /// Appends another report.
    pub fn absorb(&mut self, other: Self) {
        self.admitted.extend(other.admitted);
        self.already_known.extend(other.already_known);
        self.not_found.extend(other.not_found);
    }

    /// Returns whether identifiers were requested and none was resolvable.
    #[must_use]
    pub const fn nothing_resolvable(&self) -> bool {
        self.admitted.is_empty() && self.already_known.is_empty() && !self.not_found.is_empty()
    }
}

/// Turns bare identifiers into `in-review` records with review requests.
#[derive(Clone)]
pub struct IntakeService<R, T>
where
    R: MetadataRegistry,
    T: IssueTracker,
{
    registry: Arc<R>,
    tracker: Arc<T>,
    gate: RateLimitGate,
}

impl<R, T> IntakeService<R, T>
where
    R: MetadataRegistry,
    T: IssueTracker,
{
    /// Creates an intake service.
    #[must_use]
    pub const fn new(registry: Arc<R>, tracker: Arc<T>, gate: RateLimitGate) -> Self {
        Self {
            registry,
            tracker,
            gate,
        }
    }

    /// Admits every unknown identifier of `batch`, in order.
    ///
    /// Review requests are opened as records are admitted; the caller
    /// persists and publishes the working set once the batch is done.
    ///
    /// # Errors
    ///
    /// Returns registry and tracker failures, and identity errors such as
    /// [`BibliographyError::KeySpaceExhausted`]. Records admitted before the
    /// failure stay in the working set.
    pub async fn intake_batch(
        &self,
        working_set: &mut WorkingSet,
        batch: &DoiBatch,
    ) -> IntakeResult<IntakeReport> {
        let mut report = IntakeReport::default();
        let fresh = batch.filtered(|doi| {
            let known = working_set.is_known(doi);
            if known {
                info!(doi = %doi, "already known, skipping");
                report.already_known.push(doi.clone());
            }
            !known
        });
        if fresh.is_empty() {
            return Ok(report);
        }

        let resolutions = self.registry.resolve_batch(&fresh).await?;
        for resolution in resolutions {
            let Some(entry) = resolution.entry else {
                info!(doi = %resolution.doi, "registry has no record, skipping");
                report.not_found.push(resolution.doi);
                continue;
            };
            match self.admit(working_set, &resolution.doi, entry).await? {
                Some(admitted) => report.admitted.push(admitted),
                None => report.already_known.push(resolution.doi),
            }
        }
        info!(
            admitted = report.admitted.len(),
            already_known = report.already_known.len(),
            not_found = report.not_found.len(),
            "intake batch done"
        );
        Ok(report)
    }

    async fn admit(
        &self,
        working_set: &mut WorkingSet,
        requested: &Doi,
        entry: RegistryEntry,
    ) -> IntakeResult<Option<Admitted>> {
        let mut record = entry.record.clone();
        if record.doi().is_none() {
            record.set_field("doi", requested.as_str());
        }
        let doi = record.require_doi()?;
        if working_set.is_known(requested) || working_set.is_known(&doi) {
            info!(doi = %doi, requested = %requested, "resolved to a known record, skipping");
            return Ok(None);
        }

        let key = working_set.assign_key(&record.derive_key())?;
        let record = record.rekeyed(key.clone());
        let body = review_request_body(&record, &doi, &entry).map_err(|err| {
            IntakeError::Template {
                doi: doi.clone(),
                reason: err.to_string(),
            }
        })?;
        working_set.admit(record)?;

        let request = NewReviewRequest::in_review(key.as_str(), body)?;
        self.gate.wait_for_quota(&*self.tracker).await?;
        let issue = self
            .gate
            .retry_once("create review request", || self.tracker.create_issue(&request))
            .await?;
        info!(doi = %doi, key = %key, issue = issue.value(), "opened review request");
        Ok(Some(Admitted { doi, key, issue }))
    }
}
