//! Tests for reference normalization, batching and the pending ledger.

use super::doi;
use crate::discovery::domain::{
    BatchSize, DiscoveryDomainError, DoiBatch, MAX_BATCH, PendingEntry, PendingKind,
    PendingLedger, Reference, ReferenceOrigin, partition,
};
use eyre::{Result, ensure};
use rstest::rstest;
use serde_json::json;

#[rstest]
#[case(json!({"key": "ref1", "DOI": "10.1/ABC"}), Some("10.1/abc"))]
#[case(json!({"id": "W1", "doi": "https://doi.org/10.1/abc"}), Some("10.1/abc"))]
#[case(json!({"DOI": "  "}), None)]
#[case(json!({"doi": null, "display_name": "Untitled"}), None)]
#[case(json!({"unstructured": "A. Author, Some talk, 2019"}), None)]
fn from_raw_reads_either_identifier_field(
    #[case] raw: serde_json::Value,
    #[case] expected: Option<&str>,
) {
    let reference = Reference::from_raw(ReferenceOrigin::GraphReference, raw);
    assert_eq!(reference.doi().map(crate::bibliography::domain::Doi::as_str), expected);
}

#[rstest]
fn partition_dedups_identifiers_across_casing_and_fields() -> Result<()> {
    let references = vec![
        Reference::from_raw(ReferenceOrigin::RegistryReference, json!({"DOI": "10.1/ABC"})),
        Reference::from_raw(ReferenceOrigin::GraphReference, json!({"doi": "https://doi.org/10.1/abc"})),
        Reference::from_raw(ReferenceOrigin::GraphCitation, json!({"doi": "10.2/xyz"})),
        Reference::from_raw(ReferenceOrigin::RegistryReference, json!({"unstructured": "n/a"})),
    ];

    let split = partition(references);

    ensure!(split.identifiers == vec![doi("10.1/abc"), doi("10.2/xyz")]);
    ensure!(split.unresolvable.len() == 1);
    Ok(())
}

#[rstest]
fn chunk_respects_the_batch_bound() {
    let identifiers: Vec<_> = (0..120).map(|n| doi(&format!("10.9/{n}"))).collect();

    let batches = DoiBatch::chunk(&identifiers, BatchSize::default());

    let sizes: Vec<usize> = batches.iter().map(DoiBatch::len).collect();
    assert_eq!(sizes, vec![50, 50, 20]);
    assert!(batches.iter().all(|batch| batch.len() <= MAX_BATCH));
}

#[rstest]
#[case(0)]
#[case(51)]
fn batch_size_outside_bounds_is_rejected(#[case] size: usize) {
    assert_eq!(
        BatchSize::new(size),
        Err(DiscoveryDomainError::InvalidBatchSize {
            size,
            max: MAX_BATCH
        })
    );
}

#[rstest]
fn oversized_batch_is_rejected() {
    let identifiers: Vec<_> = (0..51).map(|n| doi(&format!("10.9/{n}"))).collect();
    assert_eq!(
        DoiBatch::new(identifiers),
        Err(DiscoveryDomainError::BatchTooLarge { len: 51, max: 50 })
    );
}

#[rstest]
fn ledger_records_each_entry_once() {
    let mut ledger = PendingLedger::default();
    let entry = PendingEntry::unresolved("Smith2020", doi("10.1/gone"));

    let first = ledger.record([entry.clone()]);
    let second = ledger.record([entry]);

    assert_eq!((first, second), (1, 0));
    assert_eq!(ledger.unhandled.len(), 1);
}

#[rstest]
#[case("10.1/GONE")]
#[case("https://doi.org/10.1/gone")]
fn ledger_handles_entries_by_identifier(#[case] selector: &str) {
    let mut ledger = PendingLedger::default();
    ledger.record([
        PendingEntry::unresolved("Smith2020", doi("10.1/gone")),
        PendingEntry::unresolved("Smith2020", doi("10.1/other")),
    ]);

    let moved = ledger.handle(selector);

    assert_eq!(moved.len(), 1);
    assert_eq!(ledger.unhandled.len(), 1);
    assert_eq!(ledger.handled, moved);
}

#[rstest]
fn ledger_handles_entries_by_origin_key() {
    let mut ledger = PendingLedger::default();
    let reference = Reference::from_raw(
        ReferenceOrigin::RegistryReference,
        json!({"unstructured": "Private communication"}),
    );
    ledger.record([PendingEntry::unresolvable("Doe2021", &reference)]);

    let moved = ledger.handle("Doe2021");

    assert_eq!(moved.len(), 1);
    assert_eq!(
        moved.first().map(|entry| entry.kind),
        Some(PendingKind::UnresolvableReference)
    );
    assert!(ledger.unhandled.is_empty());
}

#[rstest]
fn ledger_serializes_with_handled_and_unhandled_lists() -> Result<()> {
    let mut ledger = PendingLedger::default();
    ledger.record([PendingEntry::unresolved("intake", doi("10.1/gone"))]);

    let value = serde_json::to_value(&ledger)?;

    ensure!(
        value
            == json!({
                "unhandled": [{
                    "origin": "intake",
                    "kind": "unresolved-identifier",
                    "identifier": "10.1/gone"
                }],
                "handled": []
            })
    );
    Ok(())
}
