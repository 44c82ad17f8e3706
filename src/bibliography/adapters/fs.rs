//! File-backed record store rooted in the version-control working copy.

use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use tracing::debug;

use crate::bibliography::{
    codec,
    domain::{CollectionName, Record},
    ports::{RecordStore, RecordStoreError, RecordStoreResult},
};

/// Record store keeping one `.bib` file per collection.
#[derive(Debug)]
pub struct FileRecordStore {
    root: Dir,
    bib_dir: Utf8PathBuf,
}

impl FileRecordStore {
    /// Opens the store for `bib_dir`, relative to the working copy `root`.
    ///
    /// # Errors
    ///
    /// Returns a persistence error when `root` cannot be opened.
    pub fn open(root: &Utf8Path, bib_dir: impl Into<Utf8PathBuf>) -> RecordStoreResult<Self> {
        let dir =
            Dir::open_ambient_dir(root, ambient_authority()).map_err(RecordStoreError::persistence)?;
        Ok(Self {
            root: dir,
            bib_dir: bib_dir.into(),
        })
    }
}

#[async_trait]
impl RecordStore for FileRecordStore {
    async fn read(&self, collection: CollectionName) -> RecordStoreResult<Vec<Record>> {
        let path = self.location(collection);
        let text = match self.root.read_to_string(&path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path, "collection file missing, reading as empty");
                return Ok(Vec::new());
            }
            Err(err) => return Err(RecordStoreError::persistence(err)),
        };
        codec::parse(&text).map_err(|source| RecordStoreError::Decode { collection, source })
    }

    async fn write(&self, collection: CollectionName, records: &[Record]) -> RecordStoreResult<()> {
        if !collection.is_writable() {
            return Err(RecordStoreError::ReadOnly(collection));
        }
        self.root
            .create_dir_all(&self.bib_dir)
            .map_err(RecordStoreError::persistence)?;
        let path = self.location(collection);
        self.root
            .write(&path, codec::serialize(records))
            .map_err(RecordStoreError::persistence)?;
        debug!(path = %path, records = records.len(), "wrote collection");
        Ok(())
    }

    fn location(&self, collection: CollectionName) -> Utf8PathBuf {
        self.bib_dir.join(collection.file_name())
    }
}
