//! Unit tests for discovery and intake.

mod domain_tests;

use crate::bibliography::domain::{CitationKey, Doi, Record};
use crate::discovery::ports::RegistryEntry;

/// Parses a test identifier.
pub(super) fn doi(raw: &str) -> Doi {
    Doi::parse(raw).unwrap_or_else(|err| panic!("test identifier {raw} invalid: {err}"))
}

/// Builds a registry entry as Crossref would return it.
pub(super) fn registry_entry(registry_key: &str, author: &str, year: &str, id: &str) -> RegistryEntry {
    let record = Record::new(
        "article",
        CitationKey::new(registry_key)
            .unwrap_or_else(|err| panic!("test key {registry_key} invalid: {err}")),
    )
    .with_field("author", author)
    .with_field("title", format!("On {registry_key}"))
    .with_field("year", year)
    .with_field("doi", id);
    RegistryEntry::new(record)
}
