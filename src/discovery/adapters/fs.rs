//! JSON ledger file in the working copy.

use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;

use crate::discovery::{
    domain::PendingLedger,
    ports::{LedgerError, LedgerResult, LedgerStore},
};

/// Ledger stored as pretty-printed JSON.
#[derive(Debug)]
pub struct FileLedgerStore {
    root: Dir,
    path: Utf8PathBuf,
}

impl FileLedgerStore {
    /// Opens the ledger at `path`, relative to the working copy `root`.
    ///
    /// # Errors
    ///
    /// Returns a persistence error when `root` cannot be opened.
    pub fn open(root: &Utf8Path, path: impl Into<Utf8PathBuf>) -> LedgerResult<Self> {
        let dir =
            Dir::open_ambient_dir(root, ambient_authority()).map_err(LedgerError::persistence)?;
        Ok(Self {
            root: dir,
            path: path.into(),
        })
    }
}

#[async_trait]
impl LedgerStore for FileLedgerStore {
    async fn load(&self) -> LedgerResult<PendingLedger> {
        match self.root.read_to_string(&self.path) {
            Ok(text) => serde_json::from_str(&text).map_err(LedgerError::decode),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(PendingLedger::default()),
            Err(err) => Err(LedgerError::persistence(err)),
        }
    }

    async fn save(&self, ledger: &PendingLedger) -> LedgerResult<()> {
        if let Some(parent) = self.path.parent().filter(|parent| !parent.as_str().is_empty()) {
            self.root
                .create_dir_all(parent)
                .map_err(LedgerError::persistence)?;
        }
        let mut text = serde_json::to_string_pretty(ledger).map_err(LedgerError::decode)?;
        text.push('\n');
        self.root
            .write(&self.path, text)
            .map_err(LedgerError::persistence)
    }

    fn location(&self) -> Utf8PathBuf {
        self.path.clone()
    }
}
