//! Side file of identifiers and references awaiting manual handling.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::Reference;
use crate::bibliography::domain::Doi;

/// Why an entry could not be classified automatically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PendingKind {
    /// The reference entry carried no identifier.
    UnresolvableReference,
    /// The registry had no record for the identifier.
    UnresolvedIdentifier,
}

impl PendingKind {
    /// Returns the serialized name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::UnresolvableReference => "unresolvable-reference",
            Self::UnresolvedIdentifier => "unresolved-identifier",
        }
    }
}

/// One entry of the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingEntry {
    /// Key of the record whose crawl found the entry, or `intake` for
    /// identifiers given directly.
    pub origin: String,
    /// Classification problem.
    pub kind: PendingKind,
    /// Canonical identifier, when one exists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<Doi>,
    /// Entry as received from the service, for unresolvable references.
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub reference: Value,
}

impl PendingEntry {
    /// Creates an entry for a reference without identifier.
    #[must_use]
    pub fn unresolvable(origin: impl Into<String>, reference: &Reference) -> Self {
        Self {
            origin: origin.into(),
            kind: PendingKind::UnresolvableReference,
            identifier: None,
            reference: reference.raw().clone(),
        }
    }

    /// Creates an entry for an identifier the registry did not know.
    #[must_use]
    pub fn unresolved(origin: impl Into<String>, identifier: Doi) -> Self {
        Self {
            origin: origin.into(),
            kind: PendingKind::UnresolvedIdentifier,
            identifier: Some(identifier),
            reference: Value::Null,
        }
    }

    /// Returns whether `selector` names this entry.
    ///
    /// Selectors match the identifier (normalized) or the origin key.
    #[must_use]
    pub fn matches(&self, selector: &str) -> bool {
        let by_identifier = Doi::parse(selector)
            .ok()
            .zip(self.identifier.as_ref())
            .is_some_and(|(wanted, held)| &wanted == held);
        by_identifier || self.origin == selector.trim()
    }
}

/// Entries split into open and resolved lists.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PendingLedger {
    /// Entries still waiting for a person.
    #[serde(default)]
    pub unhandled: Vec<PendingEntry>,
    /// Entries a person has dealt with.
    #[serde(default)]
    pub handled: Vec<PendingEntry>,
}

impl PendingLedger {
    /// Records entries as unhandled, skipping ones already present in
    /// either list. Returns how many were added.
    pub fn record(&mut self, entries: impl IntoIterator<Item = PendingEntry>) -> usize {
        let mut added = 0;
        for entry in entries {
            if self.unhandled.contains(&entry) || self.handled.contains(&entry) {
                continue;
            }
            self.unhandled.push(entry);
            added += 1;
        }
        added
    }

    /// Moves every unhandled entry matching `selector` to handled and
    /// returns the moved entries.
    pub fn handle(&mut self, selector: &str) -> Vec<PendingEntry> {
        let (moved, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.unhandled)
            .into_iter()
            .partition(|entry| entry.matches(selector));
        self.unhandled = kept;
        self.handled.extend(moved.iter().cloned());
        moved
    }
}
