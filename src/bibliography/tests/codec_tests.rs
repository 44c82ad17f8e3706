//! Tests for the BibTeX codec.

use crate::bibliography::codec::{CodecError, parse, serialize};
use eyre::{Result, ensure};
use rstest::rstest;

const CROSSREF_SAMPLE: &str = " @article{Smith_2020, title={Fault {Injection} on {ARM}}, volume={12}, \
url={http://dx.doi.org/10.1/ABC}, DOI={10.1/ABC}, journal={Journal of Attacks}, \
author={Smith, John and Doe, Jane}, year={2020}, month=jan }";

#[rstest]
fn parses_registry_output() -> Result<()> {
    let records = parse(CROSSREF_SAMPLE)?;
    let [record] = records.as_slice() else {
        eyre::bail!("expected exactly one record, got {}", records.len());
    };

    ensure!(record.entry_type() == "article");
    ensure!(record.key().as_str() == "Smith_2020");
    ensure!(record.title() == Some("Fault {Injection} on {ARM}"));
    ensure!(record.field("doi") == Some("10.1/ABC"));
    ensure!(record.field("month") == Some("jan"));
    ensure!(record.doi().map(|doi| doi.as_str().to_owned()) == Some("10.1/abc".to_owned()));
    Ok(())
}

#[rstest]
fn parses_quoted_concatenated_and_parenthesized_entries() -> Result<()> {
    let text = r#"
@comment{ignored {nested} block}
@inproceedings(Key2021,
  title = "A {"}quoted{"} title" # " continued",
  year = 2021,
)
@string{venue = "Conf"}
@misc{Key2022}
"#;
    let records = parse(text)?;
    ensure!(records.len() == 2, "expected two records, got {}", records.len());
    let first = records.first().ok_or_else(|| eyre::eyre!("missing first record"))?;
    ensure!(first.title() == Some("A {\"}quoted{\"} title continued"));
    ensure!(first.year() == Some("2021".to_owned()));
    let second = records.get(1).ok_or_else(|| eyre::eyre!("missing second record"))?;
    ensure!(second.key().as_str() == "Key2022");
    ensure!(second.fields().is_empty());
    Ok(())
}

#[rstest]
fn serialized_records_parse_back_identically() -> Result<()> {
    let records = parse(CROSSREF_SAMPLE)?;
    let text = serialize(&records);

    ensure!(text.starts_with("@article{Smith_2020,\n title = {Fault {Injection} on {ARM}},\n"));
    ensure!(text.ends_with("\n}\n"));
    ensure!(parse(&text)? == records);
    Ok(())
}

#[rstest]
fn stray_closing_brace_in_quoted_value_survives_rewrite() -> Result<()> {
    let records = parse(r#"@article{Smith2020, title = "a } b", year = 2020}"#)?;
    let text = serialize(&records);

    ensure!(text.contains(r#" title = "a } b","#), "unexpected output: {text}");
    ensure!(text.contains(" year = {2020}"));
    ensure!(parse(&text)? == records);
    Ok(())
}

#[rstest]
fn unbalanced_programmatic_value_still_parses() -> Result<()> {
    let record = crate::bibliography::domain::Record::new(
        "article",
        crate::bibliography::domain::CitationKey::new("Smith2020")?,
    )
    .with_field("abstract", r#"x } said "hi" { y"#);
    let text = serialize(std::slice::from_ref(&record));

    let reparsed = parse(&text)?;
    let [only] = reparsed.as_slice() else {
        eyre::bail!("expected one record, got {}", reparsed.len());
    };
    ensure!(only.field("abstract") == Some(r#"x } said {"}hi{"} { y}"#));
    Ok(())
}

#[rstest]
fn empty_input_has_no_records() -> Result<()> {
    ensure!(parse("")?.is_empty());
    ensure!(serialize(&[]).is_empty());
    Ok(())
}

#[rstest]
#[case("@article{Key, title = {unterminated", 1)]
#[case("\n\n@article{Key, title = {x}", 3)]
fn unterminated_entry_reports_entry_line(#[case] text: &str, #[case] line: usize) {
    assert_eq!(parse(text), Err(CodecError::UnexpectedEnd { line }));
}

#[rstest]
fn invalid_key_is_rejected() {
    assert!(matches!(
        parse("@article{bad key, title = {x}}"),
        Err(CodecError::InvalidKey { .. })
    ));
}
