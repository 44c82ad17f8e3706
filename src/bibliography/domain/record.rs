//! Bibliographic record aggregate.

use super::{BibliographyError, CitationKey, Doi};
use serde::{Deserialize, Serialize};

/// Fallback stem used when neither author nor registry key yields a key.
const ANONYMOUS_STEM: &str = "anon";

/// A single `name = value` pair of a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// Lower-cased field name.
    pub name: String,
    /// Field value without surrounding delimiters.
    pub value: String,
}

/// A bibliographic entry.
///
/// Fields keep their insertion order so that a parse/serialize cycle leaves
/// untouched records byte-stable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    entry_type: String,
    key: CitationKey,
    fields: Vec<Field>,
}

impl Record {
    /// Creates an empty record of the given entry type.
    #[must_use]
    pub fn new(entry_type: impl Into<String>, key: CitationKey) -> Self {
        Self {
            entry_type: entry_type.into().trim().to_ascii_lowercase(),
            key,
            fields: Vec::new(),
        }
    }

    /// Adds or replaces a field, builder style.
    #[must_use]
    pub fn with_field(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_field(name, value);
        self
    }

    /// Adds or replaces a field in place.
    pub fn set_field(&mut self, name: &str, value: impl Into<String>) {
        let normalized = name.trim().to_ascii_lowercase();
        let field_value = value.into();
        if let Some(existing) = self.fields.iter_mut().find(|f| f.name == normalized) {
            existing.value = field_value;
        } else {
            self.fields.push(Field {
                name: normalized,
                value: field_value,
            });
        }
    }

    /// Returns the entry type, for example `article`.
    #[must_use]
    pub fn entry_type(&self) -> &str {
        &self.entry_type
    }

    /// Returns the display key.
    #[must_use]
    pub const fn key(&self) -> &CitationKey {
        &self.key
    }

    /// Returns all fields in insertion order.
    #[must_use]
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Returns a field value by case-insensitive name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.name.eq_ignore_ascii_case(name))
            .map(|f| f.value.as_str())
    }

    /// Returns the canonical identifier, if the record carries a usable one.
    #[must_use]
    pub fn doi(&self) -> Option<Doi> {
        self.field("doi").and_then(|raw| Doi::parse(raw).ok())
    }

    /// Returns the canonical identifier or an error naming the record.
    ///
    /// # Errors
    ///
    /// Returns [`BibliographyError::MissingDoi`] when the record has none.
    pub fn require_doi(&self) -> Result<Doi, BibliographyError> {
        self.doi()
            .ok_or_else(|| BibliographyError::MissingDoi(self.key.clone()))
    }

    /// Returns the title field.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.field("title")
    }

    /// Returns the url field.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        self.field("url")
    }

    /// Returns the four-digit publication year, if present.
    #[must_use]
    pub fn year(&self) -> Option<String> {
        let digits: String = self
            .field("year")?
            .chars()
            .filter(char::is_ascii_digit)
            .take(4)
            .collect();
        (digits.len() == 4).then_some(digits)
    }

    /// Returns a copy of this record under a different key.
    #[must_use]
    pub fn rekeyed(&self, key: CitationKey) -> Self {
        Self {
            entry_type: self.entry_type.clone(),
            key,
            fields: self.fields.clone(),
        }
    }

    /// Derives the base display key: first author's family name plus year.
    ///
    /// Falls back to the record's current key and then to `anon`, keeping
    /// only ASCII alphanumerics in every case.
    #[must_use]
    pub fn derive_key(&self) -> CitationKey {
        let stem = self
            .field("author")
            .map(first_family_name)
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| ascii_alphanumeric(self.key.as_str()));
        let stem = if stem.is_empty() {
            ANONYMOUS_STEM.to_owned()
        } else {
            stem
        };
        let derived = format!("{stem}{}", self.year().unwrap_or_default());
        CitationKey::new(derived).unwrap_or_else(|_| self.key.clone())
    }
}

fn first_family_name(authors: &str) -> String {
    let first = authors.split(" and ").next().unwrap_or_default().trim();
    let family = match first.split_once(',') {
        Some((family, _given)) => family,
        None => first.split_whitespace().last().unwrap_or_default(),
    };
    ascii_alphanumeric(family)
}

fn ascii_alphanumeric(value: &str) -> String {
    value.chars().filter(char::is_ascii_alphanumeric).collect()
}
