//! Persisted state of a document identity
//!
//! - `DocumentManifest`: the serializable representation
//! - `StateFile`: crc32-checked JSON file holding one manifest

mod checksum;
mod manifest;
mod state_file;

pub use checksum::{compute_checksum, format_checksum, parse_checksum};
pub use manifest::{DocumentManifest, MANIFEST_FORMAT_VERSION};
pub use state_file::StateFile;
