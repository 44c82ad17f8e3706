//! Reference entries pulled from citation-graph services.
//!
//! Services disagree on the identifier field name (`DOI` or `doi`) and on
//! whether it carries a resolver prefix. [`Reference::from_raw`] folds both
//! into one canonical [`Doi`] as soon as an entry arrives.

use crate::bibliography::domain::Doi;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;

/// Identifier field names checked, in order.
const IDENTIFIER_FIELDS: [&str; 2] = ["DOI", "doi"];

/// Where a reference entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReferenceOrigin {
    /// Outbound reference declared in the bibliographic registry.
    RegistryReference,
    /// Outbound reference known to the citation graph.
    GraphReference,
    /// Inbound citation known to the citation graph.
    GraphCitation,
}

impl ReferenceOrigin {
    /// Returns the canonical origin name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RegistryReference => "registry-reference",
            Self::GraphReference => "graph-reference",
            Self::GraphCitation => "graph-citation",
        }
    }
}

impl fmt::Display for ReferenceOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One reference or citation entry, normalized on ingestion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reference {
    origin: ReferenceOrigin,
    doi: Option<Doi>,
    raw: Value,
}

impl Reference {
    /// Normalizes a raw service entry.
    ///
    /// Blank or non-string identifier fields count as absent.
    #[must_use]
    pub fn from_raw(origin: ReferenceOrigin, raw: Value) -> Self {
        let doi = IDENTIFIER_FIELDS
            .iter()
            .filter_map(|field| raw.get(field).and_then(Value::as_str))
            .find_map(|value| Doi::parse(value).ok());
        Self { origin, doi, raw }
    }

    /// Returns the service the entry came from.
    #[must_use]
    pub const fn origin(&self) -> ReferenceOrigin {
        self.origin
    }

    /// Returns the canonical identifier, if the entry had one.
    #[must_use]
    pub const fn doi(&self) -> Option<&Doi> {
        self.doi.as_ref()
    }

    /// Returns the entry as received.
    #[must_use]
    pub const fn raw(&self) -> &Value {
        &self.raw
    }
}

/// References split by whether they carry an identifier.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReferenceSplit {
    /// Distinct identifiers in first-seen order.
    pub identifiers: Vec<Doi>,
    /// Entries without any identifier.
    pub unresolvable: Vec<Reference>,
}

/// Separates identified entries from unresolvable ones and deduplicates the
/// identifiers.
#[must_use]
pub fn partition(references: Vec<Reference>) -> ReferenceSplit {
    let mut seen = HashSet::new();
    let mut split = ReferenceSplit::default();
    for reference in references {
        match reference.doi {
            Some(doi) => {
                if seen.insert(doi.clone()) {
                    split.identifiers.push(doi);
                }
            }
            None => split.unresolvable.push(reference),
        }
    }
    split
}
