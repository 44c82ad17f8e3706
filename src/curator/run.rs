//! Orchestration of the curator commands.

use tracing::{info, warn};

use super::{Adapters, CuratorError, CuratorResult, Stack};
use crate::bibliography::{
    domain::{CollectionName, Doi, WorkingSet},
    services::SnapshotService,
};
use crate::discovery::{
    domain::{BatchSize, DoiBatch, PendingEntry, PendingLedger},
    ports::LedgerStore,
    services::{
        Admitted, ExpansionService, IntakeReport, IntakeService,
        report::{
            expansion_failed_comment, unresolvable_references_comment,
            unresolved_identifiers_comment,
        },
    },
};
use crate::publish::{
    domain::{BranchLayout, ChangeSet},
    services::PublishCycle,
};
use crate::review::{
    domain::{IssueEdit, IssueNumber, ReviewLabel, ReviewRequest, without_label},
    ports::IssueTracker,
    services::{Decision, RateLimitGate, ReviewTransitionService},
};

/// Ledger origin of identifiers given on the command line.
pub const INTAKE_ORIGIN: &str = "intake";

/// Values a curator needs besides its adapters.
#[derive(Debug, Clone)]
pub struct CuratorSettings {
    /// Login whose comments decide reviews.
    pub maintainer: String,
    /// Branches the publish cycle works on.
    pub layout: BranchLayout,
    /// Identifiers per registry request.
    pub batch_size: BatchSize,
}

/// Result of crawling one `check-references` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceCheck {
    /// Review request crawled.
    pub issue: IssueNumber,
    /// Record key.
    pub key: String,
    /// What happened.
    pub outcome: CheckOutcome,
}

/// Outcome of one reference crawl.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    /// References were collected and unknown ones taken in.
    Expanded {
        /// Intake results over all batches.
        report: IntakeReport,
        /// References already in the store.
        known: usize,
        /// References without identifier.
        unresolvable: usize,
    },
    /// The authoritative service failed; the label stays for the next run.
    Failed {
        /// Failure message posted on the request.
        reason: String,
    },
}

/// Runs the pipeline commands over one adapter stack.
///
/// Each command loads the record store once, applies all of its changes
/// to that snapshot and publishes them before returning.
pub struct Curator<S: Stack> {
    snapshots: SnapshotService<S::Store>,
    adapters: Adapters<S>,
    gate: RateLimitGate,
    intake: IntakeService<S::Registry, S::Tracker>,
    expansion: ExpansionService<S::Primary, S::Secondary>,
    review: ReviewTransitionService<S::Tracker>,
    publish: PublishCycle<S::Vcs, S::Merges>,
    batch_size: BatchSize,
}

impl<S: Stack> Curator<S> {
    /// Wires the services over `adapters`.
    #[must_use]
    pub fn new(adapters: Adapters<S>, settings: CuratorSettings, gate: RateLimitGate) -> Self {
        let CuratorSettings {
            maintainer,
            layout,
            batch_size,
        } = settings;
        Self {
            snapshots: SnapshotService::new(adapters.store.clone()),
            gate: gate.clone(),
            intake: IntakeService::new(
                adapters.registry.clone(),
                adapters.tracker.clone(),
                gate.clone(),
            ),
            expansion: ExpansionService::new(
                adapters.primary.clone(),
                adapters.secondary.clone(),
                batch_size,
            ),
            review: ReviewTransitionService::new(adapters.tracker.clone(), gate.clone(), maintainer),
            publish: PublishCycle::new(adapters.vcs.clone(), adapters.merges.clone(), gate, layout),
            adapters,
            batch_size,
        }
    }

    /// Takes explicit identifiers in, one published commit per batch.
    ///
    /// # Errors
    ///
    /// Returns [`CuratorError::NoRegistryData`] when the registry knew none
    /// of the identifiers and none was already present, after recording
    /// them in the ledger. Other failures abort the run.
    pub async fn intake(&self, identifiers: &[Doi]) -> CuratorResult<IntakeReport> {
        self.publish.ensure_clean()?;
        let mut working_set = self.snapshots.load().await?;
        let mut ledger = self.adapters.ledger.load().await?;

        let mut unique: Vec<Doi> = Vec::with_capacity(identifiers.len());
        for doi in identifiers {
            if !unique.contains(doi) {
                unique.push(doi.clone());
            }
        }

        let mut report = IntakeReport::default();
        for batch in DoiBatch::chunk(&unique, self.batch_size) {
            let part = self.intake.intake_batch(&mut working_set, &batch).await?;
            let added = ledger.record(
                part.not_found
                    .iter()
                    .cloned()
                    .map(|doi| PendingEntry::unresolved(INTAKE_ORIGIN, doi)),
            );
            let mut lines: Vec<String> = part.admitted.iter().map(Admitted::commit_line).collect();
            if added > 0 {
                lines.push(format!("unresolved: Record {added} identifiers"));
            }
            self.persist(&mut working_set, (added > 0).then_some(&ledger), lines)
                .await?;
            report.absorb(part);
        }

        info!(
            requested = unique.len(),
            admitted = report.admitted.len(),
            already_known = report.already_known.len(),
            not_found = report.not_found.len(),
            "intake finished"
        );
        if report.nothing_resolvable() {
            return Err(CuratorError::NoRegistryData {
                identifiers: report.not_found,
            });
        }
        Ok(report)
    }

    /// Applies maintainer decisions and publishes them as one commit.
    ///
    /// Labels change only after the commit was merged.
    ///
    /// # Errors
    ///
    /// Returns the first failure; decisions are re-read next run.
    pub async fn apply_transitions(&self) -> CuratorResult<Vec<Decision>> {
        self.publish.ensure_clean()?;
        let mut working_set = self.snapshots.load().await?;
        let decisions = self.review.collect_decisions().await?;
        if decisions.is_empty() {
            info!("no review decisions pending");
            return Ok(decisions);
        }
        self.review.apply(&mut working_set, &decisions)?;
        let lines = decisions.iter().map(Decision::commit_line).collect();
        self.persist(&mut working_set, None, lines).await?;
        self.review.publish_labels(&decisions).await?;
        Ok(decisions)
    }

    /// Crawls every request labeled `check-references`.
    ///
    /// # Errors
    ///
    /// Returns tracker, store and publish failures, and lookup errors when
    /// a request title does not name exactly one `in-scope` record.
    pub async fn check_references(&self) -> CuratorResult<Vec<ReferenceCheck>> {
        self.publish.ensure_clean()?;
        let mut working_set = self.snapshots.load().await?;
        let mut ledger = self.adapters.ledger.load().await?;
        self.gate.wait_for_quota(&*self.adapters.tracker).await?;
        let requests = self
            .adapters
            .tracker
            .list_issues(ReviewLabel::CheckReferences)
            .await?;
        let mut checks = Vec::with_capacity(requests.len());
        for request in &requests {
            checks.push(
                self.check_request(&mut working_set, &mut ledger, request)
                    .await?,
            );
        }
        Ok(checks)
    }

    async fn check_request(
        &self,
        working_set: &mut WorkingSet,
        ledger: &mut PendingLedger,
        request: &ReviewRequest,
    ) -> CuratorResult<ReferenceCheck> {
        let key = request.title.as_str();
        let doi = working_set
            .find_unique(CollectionName::InScope, key)?
            .require_doi()?;
        let expansion = match self.expansion.expand(&doi, working_set).await {
            Ok(expansion) => expansion,
            Err(err) => {
                warn!(issue = request.number.value(), key, doi = %doi, error = %err, "reference expansion failed");
                self.comment(request.number, &expansion_failed_comment(&err))
                    .await?;
                return Ok(ReferenceCheck {
                    issue: request.number,
                    key: key.to_owned(),
                    outcome: CheckOutcome::Failed {
                        reason: err.to_string(),
                    },
                });
            }
        };

        let mut ledger_changed = false;
        if !expansion.unresolvable.is_empty() {
            self.comment(
                request.number,
                &unresolvable_references_comment(&expansion.unresolvable),
            )
            .await?;
            let entries = expansion
                .unresolvable
                .iter()
                .map(|reference| PendingEntry::unresolvable(key, reference));
            ledger_changed = ledger.record(entries) > 0;
        }

        let mut report = IntakeReport::default();
        for batch in &expansion.batches {
            let part = self.intake.intake_batch(working_set, batch).await?;
            let entries = part
                .not_found
                .iter()
                .cloned()
                .map(|missing| PendingEntry::unresolved(key, missing));
            ledger_changed |= ledger.record(entries) > 0;
            let lines = part.admitted.iter().map(Admitted::commit_line).collect();
            self.persist(working_set, ledger_changed.then_some(&*ledger), lines)
                .await?;
            ledger_changed = false;
            report.absorb(part);
        }
        if ledger_changed {
            let line = format!("unresolved: Record references of {key}");
            self.persist(working_set, Some(ledger), vec![line]).await?;
        }

        if !report.not_found.is_empty() {
            self.comment(
                request.number,
                &unresolved_identifiers_comment(&report.not_found),
            )
            .await?;
        }
        self.gate.wait_for_quota(&*self.adapters.tracker).await?;
        let labels = without_label(&request.labels, ReviewLabel::CheckReferences);
        self.adapters
            .tracker
            .edit(request.number, &IssueEdit::labels(labels))
            .await?;
        info!(
            issue = request.number.value(),
            key,
            admitted = report.admitted.len(),
            known = expansion.known.len(),
            unresolvable = expansion.unresolvable.len(),
            "checked references"
        );
        Ok(ReferenceCheck {
            issue: request.number,
            key: key.to_owned(),
            outcome: CheckOutcome::Expanded {
                report,
                known: expansion.known.len(),
                unresolvable: expansion.unresolvable.len(),
            },
        })
    }

    /// Lists ledger entries nobody has handled yet.
    ///
    /// # Errors
    ///
    /// Returns ledger read failures.
    pub async fn pending(&self) -> CuratorResult<Vec<PendingEntry>> {
        Ok(self.adapters.ledger.load().await?.unhandled)
    }

    /// Marks entries matching `selector` as handled and publishes the
    /// ledger.
    ///
    /// Nothing is committed when no entry matches.
    ///
    /// # Errors
    ///
    /// Returns ledger and publish failures.
    pub async fn handle_pending(&self, selector: &str) -> CuratorResult<Vec<PendingEntry>> {
        self.publish.ensure_clean()?;
        let mut ledger = self.adapters.ledger.load().await?;
        let moved = ledger.handle(selector);
        if moved.is_empty() {
            info!(selector, "no pending entry matches");
            return Ok(moved);
        }
        self.adapters.ledger.save(&ledger).await?;
        let change = ChangeSet::new(vec![self.adapters.ledger.location()])
            .with_line(format!("unresolved: Handle {selector}"));
        self.publish.publish(&change).await?;
        info!(selector, handled = moved.len(), "handled pending entries");
        Ok(moved)
    }

    async fn comment(&self, issue: IssueNumber, body: &str) -> CuratorResult<()> {
        self.gate.wait_for_quota(&*self.adapters.tracker).await?;
        self.adapters.tracker.add_comment(issue, body).await?;
        Ok(())
    }

    async fn persist(
        &self,
        working_set: &mut WorkingSet,
        ledger: Option<&PendingLedger>,
        lines: Vec<String>,
    ) -> CuratorResult<()> {
        let mut files = self.snapshots.flush(working_set).await?;
        if let Some(ledger) = ledger {
            self.adapters.ledger.save(ledger).await?;
            files.push(self.adapters.ledger.location());
        }
        let mut change = ChangeSet::new(files);
        for line in lines {
            change.push_line(line);
        }
        self.publish.publish(&change).await?;
        Ok(())
    }
}
