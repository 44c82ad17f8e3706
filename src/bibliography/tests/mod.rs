//! Unit tests for the record store and identity resolution.

mod codec_tests;

use crate::bibliography::domain::{CitationKey, Record};

/// Builds an article record with an identifier.
pub(super) fn article(key: &str, doi: &str) -> Record {
    Record::new(
        "article",
        CitationKey::new(key).unwrap_or_else(|err| panic!("test key {key} invalid: {err}")),
    )
    .with_field("title", format!("Title of {key}"))
    .with_field("doi", doi)
}
