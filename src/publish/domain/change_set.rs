//! Unit of work committed by one publish cycle.

use camino::Utf8PathBuf;

/// Modified collection files plus the commit message describing them.
///
/// Each title line names one logical change, for example
/// `in-review: Add Smith2020 #12`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChangeSet {
    files: Vec<Utf8PathBuf>,
    lines: Vec<String>,
}

impl ChangeSet {
    /// Creates a change set over the written files.
    #[must_use]
    pub const fn new(files: Vec<Utf8PathBuf>) -> Self {
        Self {
            files,
            lines: Vec::new(),
        }
    }

    /// Appends a commit title line.
    #[must_use]
    pub fn with_line(mut self, line: impl Into<String>) -> Self {
        self.push_line(line);
        self
    }

    /// Appends a commit title line in place.
    pub fn push_line(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    /// Returns the files to stage.
    #[must_use]
    pub fn files(&self) -> &[Utf8PathBuf] {
        &self.files
    }

    /// Returns whether no file changed.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Returns the first line, used as the merge request title.
    #[must_use]
    pub fn title(&self) -> &str {
        self.lines.first().map_or("Update bibliography", String::as_str)
    }

    /// Returns the full commit message.
    #[must_use]
    pub fn message(&self) -> String {
        if self.lines.is_empty() {
            return self.title().to_owned();
        }
        self.lines.join("\n")
    }
}
