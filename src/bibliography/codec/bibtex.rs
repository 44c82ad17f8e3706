//! Minimal BibTeX reader and writer.
//!
//! Supports `@type{key, name = {value}, name = "value", name = 2020}` entries
//! with nested braces and `#` concatenation. `@comment`, `@preamble` and
//! `@string` blocks are skipped; string macros are not expanded.

use crate::bibliography::domain::{CitationKey, Record};
use thiserror::Error;

/// Block types that carry no record.
const NON_RECORD_BLOCKS: [&str; 3] = ["comment", "preamble", "string"];

/// Errors raised while reading BibTeX text.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CodecError {
    /// The input ended inside an entry.
    #[error("unexpected end of input inside entry starting on line {line}")]
    UnexpectedEnd {
        /// Line of the entry's `@`.
        line: usize,
    },

    /// A character did not fit the entry grammar.
    #[error("unexpected '{found}' on line {line}")]
    UnexpectedChar {
        /// Offending character.
        found: char,
        /// Line of the character.
        line: usize,
    },

    /// The entry key is not a valid citation key.
    #[error("invalid entry key '{key}' on line {line}")]
    InvalidKey {
        /// Raw key text.
        key: String,
        /// Line of the entry's `@`.
        line: usize,
    },
}

/// Parses every record in `text`, in order.
///
/// # Errors
///
/// Returns [`CodecError`] when an entry is malformed.
pub fn parse(text: &str) -> Result<Vec<Record>, CodecError> {
    let mut cursor = Cursor::new(text);
    let mut records = Vec::new();
    while cursor.skip_to('@') {
        if let Some(record) = cursor.entry()? {
            records.push(record);
        }
    }
    Ok(records)
}

/// Serializes records in order, one blank line between entries.
#[must_use]
pub fn serialize(records: &[Record]) -> String {
    records
        .iter()
        .map(serialize_record)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Serializes a single record.
#[must_use]
pub fn serialize_record(record: &Record) -> String {
    let mut out = format!("@{}{{{}", record.entry_type(), record.key());
    let body = record
        .fields()
        .iter()
        .map(|field| format!(" {} = {}", field.name, delimit(&field.value)))
        .collect::<Vec<_>>()
        .join(",\n");
    if !body.is_empty() {
        out.push_str(",\n");
        out.push_str(&body);
    }
    out.push_str("\n}\n");
    out
}

/// Wraps a value in braces, or in quotes when its braces do not balance.
///
/// Quotes at brace depth zero are written as `{"}` inside a quoted value and
/// opening braces left unclosed are closed before the final quote.
fn delimit(value: &str) -> String {
    if braces_balance(value) {
        return format!("{{{value}}}");
    }
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    let mut depth = 0_usize;
    for ch in value.chars() {
        match ch {
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            _ => {}
        }
        if ch == '"' && depth == 0 {
            out.push_str("{\"}");
        } else {
            out.push(ch);
        }
    }
    out.extend(std::iter::repeat_n('}', depth));
    out.push('"');
    out
}

fn braces_balance(value: &str) -> bool {
    let mut depth = 0_usize;
    for ch in value.chars() {
        match ch {
            '{' => depth += 1,
            '}' => match depth.checked_sub(1) {
                Some(next) => depth = next,
                None => return false,
            },
            _ => {}
        }
    }
    depth == 0
}

struct Cursor {
    chars: Vec<char>,
    position: usize,
}

impl Cursor {
    fn new(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
            position: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.position).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += 1;
        Some(ch)
    }

    fn line(&self) -> usize {
        self.chars
            .iter()
            .take(self.position)
            .filter(|ch| **ch == '\n')
            .count()
            + 1
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.position += 1;
        }
    }

    /// Advances past the next `target`; returns `false` at end of input.
    fn skip_to(&mut self, target: char) -> bool {
        while let Some(ch) = self.bump() {
            if ch == target {
                return true;
            }
        }
        false
    }

    fn take_while(&mut self, predicate: impl Fn(char) -> bool) -> String {
        let mut taken = String::new();
        while let Some(ch) = self.peek().filter(|ch| predicate(*ch)) {
            taken.push(ch);
            self.position += 1;
        }
        taken
    }

    fn expect_any(&mut self, line: usize) -> Result<char, CodecError> {
        self.bump().ok_or(CodecError::UnexpectedEnd { line })
    }

    /// Parses one block after its `@`; `None` for non-record blocks.
    fn entry(&mut self) -> Result<Option<Record>, CodecError> {
        let line = self.line();
        let entry_type = self.take_while(|ch| ch.is_ascii_alphanumeric() || ch == '_');
        self.skip_whitespace();
        let closer = match self.expect_any(line)? {
            '{' => '}',
            '(' => ')',
            found => {
                return Err(CodecError::UnexpectedChar {
                    found,
                    line: self.line(),
                });
            }
        };

        if NON_RECORD_BLOCKS.contains(&entry_type.to_ascii_lowercase().as_str()) {
            self.skip_balanced(closer, line)?;
            return Ok(None);
        }

        let raw_key = self.take_while(|ch| ch != ',' && ch != closer);
        let key = CitationKey::new(raw_key.trim()).map_err(|_| CodecError::InvalidKey {
            key: raw_key.trim().to_owned(),
            line,
        })?;
        let mut record = Record::new(entry_type, key);

        loop {
            match self.expect_any(line)? {
                ch if ch == closer => return Ok(Some(record)),
                ',' => {}
                found => {
                    return Err(CodecError::UnexpectedChar {
                        found,
                        line: self.line(),
                    });
                }
            }
            self.skip_whitespace();
            if self.peek() == Some(closer) {
                self.position += 1;
                return Ok(Some(record));
            }
            let name = self.take_while(|ch| ch != '=' && ch != closer && ch != ',');
            let separator = self.expect_any(line)?;
            if separator != '=' {
                return Err(CodecError::UnexpectedChar {
                    found: separator,
                    line: self.line(),
                });
            }
            let value = self.value(closer, line)?;
            record.set_field(name.trim(), value);
            self.skip_whitespace();
        }
    }

    /// Parses a field value, joining `#`-concatenated parts.
    fn value(&mut self, closer: char, line: usize) -> Result<String, CodecError> {
        let mut value = String::new();
        loop {
            self.skip_whitespace();
            match self.peek() {
                Some('{') => {
                    self.position += 1;
                    value.push_str(&self.braced(line)?);
                }
                Some('"') => {
                    self.position += 1;
                    value.push_str(&self.quoted(line)?);
                }
                Some(_) => {
                    let bare =
                        self.take_while(|ch| ch != ',' && ch != closer && ch != '#' && !ch.is_whitespace());
                    value.push_str(&bare);
                }
                None => return Err(CodecError::UnexpectedEnd { line }),
            }
            self.skip_whitespace();
            if self.peek() == Some('#') {
                self.position += 1;
            } else {
                return Ok(value);
            }
        }
    }

    /// Reads up to the `}` matching an already consumed `{`.
    fn braced(&mut self, line: usize) -> Result<String, CodecError> {
        let mut depth = 0_usize;
        let mut text = String::new();
        loop {
            match self.expect_any(line)? {
                '{' => {
                    depth += 1;
                    text.push('{');
                }
                '}' if depth == 0 => return Ok(text),
                '}' => {
                    depth -= 1;
                    text.push('}');
                }
                ch => text.push(ch),
            }
        }
    }

    /// Reads up to the closing `"`; braces inside protect quotes.
    fn quoted(&mut self, line: usize) -> Result<String, CodecError> {
        let mut depth = 0_usize;
        let mut text = String::new();
        loop {
            match self.expect_any(line)? {
                '"' if depth == 0 => return Ok(text),
                '{' => {
                    depth += 1;
                    text.push('{');
                }
                '}' => {
                    depth = depth.saturating_sub(1);
                    text.push('}');
                }
                ch => text.push(ch),
            }
        }
    }

    fn skip_balanced(&mut self, closer: char, line: usize) -> Result<(), CodecError> {
        let opener = if closer == '}' { '{' } else { '(' };
        let mut depth = 0_usize;
        loop {
            match self.expect_any(line)? {
                ch if ch == opener => depth += 1,
                ch if ch == closer && depth == 0 => return Ok(()),
                ch if ch == closer => depth -= 1,
                _ => {}
            }
        }
    }
}
