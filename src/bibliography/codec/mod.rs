//! Text codec for persisted collections.

pub mod bibtex;

pub use bibtex::{CodecError, parse, serialize, serialize_record};
