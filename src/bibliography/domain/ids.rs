//! Identifier value objects for bibliographic records.

use super::BibliographyError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Resolver prefixes stripped before an identifier is compared.
const DOI_PREFIXES: [&str; 5] = [
    "https://doi.org/",
    "http://doi.org/",
    "https://dx.doi.org/",
    "http://dx.doi.org/",
    "doi:",
];

/// Characters BibTeX does not accept inside an entry key.
const FORBIDDEN_KEY_CHARS: [char; 11] = ['{', '}', '(', ')', ',', '"', '#', '%', '\'', '=', '\\'];

/// Canonical Digital Object Identifier.
///
/// Identifiers are compared case-insensitively, so the canonical form is the
/// lower-cased value with any resolver prefix removed.
///
/// # Examples
///
///     use bibwarden::bibliography::domain::Doi;
///
///     let doi = Doi::parse("https://doi.org/10.1/ABC").expect("valid");
///     assert_eq!(doi.as_str(), "10.1/abc");
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Doi(String);

impl Doi {
    /// Parses and normalizes a raw identifier.
    ///
    /// # Errors
    ///
    /// Returns [`BibliographyError::EmptyDoi`] when nothing remains after
    /// trimming and prefix removal.
    pub fn parse(raw: &str) -> Result<Self, BibliographyError> {
        let lowered = raw.trim().to_lowercase();
        let stripped = DOI_PREFIXES
            .iter()
            .find_map(|prefix| lowered.strip_prefix(prefix))
            .unwrap_or(&lowered)
            .trim();
        if stripped.is_empty() {
            return Err(BibliographyError::EmptyDoi);
        }
        Ok(Self(stripped.to_owned()))
    }

    /// Returns the canonical identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Doi {
    type Error = BibliographyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Doi> for String {
    fn from(value: Doi) -> Self {
        value.0
    }
}

impl AsRef<str> for Doi {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Doi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Display key of a record, unique across all collections.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CitationKey(String);

impl CitationKey {
    /// Creates a validated citation key.
    ///
    /// # Errors
    ///
    /// Returns [`BibliographyError::InvalidCitationKey`] when the key is
    /// empty, contains whitespace, or contains a BibTeX delimiter.
    pub fn new(value: impl Into<String>) -> Result<Self, BibliographyError> {
        let raw = value.into();
        let normalized = raw.trim();
        let is_valid = !normalized.is_empty()
            && !normalized
                .chars()
                .any(|ch| ch.is_whitespace() || FORBIDDEN_KEY_CHARS.contains(&ch));
        if !is_valid {
            return Err(BibliographyError::InvalidCitationKey(raw));
        }
        Ok(Self(normalized.to_owned()))
    }

    /// Returns this key with a single-letter suffix appended.
    #[must_use]
    pub fn with_suffix(&self, suffix: char) -> Self {
        let mut value = self.0.clone();
        value.push(suffix);
        Self(value)
    }

    /// Returns the key as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for CitationKey {
    type Error = BibliographyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CitationKey> for String {
    fn from(value: CitationKey) -> Self {
        value.0
    }
}

impl AsRef<str> for CitationKey {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for CitationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
