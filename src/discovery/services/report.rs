//! Text posted to the issue tracker.

use minijinja::{Environment, context};

use crate::bibliography::{codec, domain::Doi, domain::Record};
use crate::discovery::{domain::Reference, ports::RegistryEntry};

const SCHOLAR_SEARCH: &str = "https://scholar.google.de/scholar?hl=en&q=";
const DOI_RESOLVER: &str = "https://doi.org/";

const REVIEW_REQUEST_TEMPLATE: &str = "WDYT? Is this publication in scope?
```
{{ bibtex }}```
URL: {{ url }}
Google Scholar: {{ scholar }}
{%- if open_access %}
Open access: {{ open_access }}
{%- endif %}
{%- if summary %}

Abstract: {{ summary }}
{%- endif %}
";

/// Renders the body of a new review request.
///
/// # Errors
///
/// Returns the template error when rendering fails.
pub fn review_request_body(
    record: &Record,
    doi: &Doi,
    entry: &RegistryEntry,
) -> Result<String, minijinja::Error> {
    let url = record
        .url()
        .map_or_else(|| format!("{DOI_RESOLVER}{doi}"), str::to_owned);
    Environment::new().render_str(
        REVIEW_REQUEST_TEMPLATE,
        context! {
            bibtex => codec::serialize_record(record),
            url => url,
            scholar => format!("{SCHOLAR_SEARCH}{doi}"),
            open_access => entry.open_access_url.as_deref(),
            summary => entry.abstract_text.as_deref(),
        },
    )
}

/// Comment listing references that carry no identifier.
#[must_use]
pub fn unresolvable_references_comment(references: &[Reference]) -> String {
    let raw: Vec<_> = references.iter().map(Reference::raw).collect();
    let listing = serde_json::to_string_pretty(&raw).unwrap_or_else(|_| "[]".to_owned());
    format!("I did not find DOIs for the following references:\n```\n{listing}\n```")
}

/// Comment listing identifiers the registry could not resolve.
#[must_use]
pub fn unresolved_identifiers_comment(identifiers: &[Doi]) -> String {
    let listing: Vec<String> = identifiers
        .iter()
        .map(|doi| format!("- {doi}"))
        .collect();
    format!(
        "I failed to append the following references to the review pipeline:\n{}",
        listing.join("\n")
    )
}

/// Comment explaining why references were not crawled.
#[must_use]
pub fn expansion_failed_comment(reason: &impl std::fmt::Display) -> String {
    format!("I could not retrieve the references of this publication: {reason}")
}
