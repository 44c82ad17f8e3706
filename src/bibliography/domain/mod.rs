//! Domain model for the record store.
//!
//! Records, the four named collections, and the per-run [`WorkingSet`]
//! snapshot that enforces deduplication and key uniqueness. Nothing here
//! touches the filesystem.

mod collection;
mod error;
mod ids;
mod record;
mod working_set;

pub use collection::{Collection, CollectionName};
pub use error::{BibliographyError, ParseCollectionNameError};
pub use ids::{CitationKey, Doi};
pub use record::{Field, Record};
pub use working_set::{KEY_SUFFIXES, WorkingSet};
