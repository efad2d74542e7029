//! Archive source interfaces and built-in readers.
//!
//! Ownership model:
//! - `ArchiveSource` is the pipeline-facing interface that yields raw entries.
//! - Readers never validate entries; `RecordStore::build` decides what is
//!   well-formed. Readers only count elements they could not decode at all.

use std::path::Path;

use crate::constants::source::{JSONL_EXTENSIONS, MEMORY_SOURCE_ID, XML_EXTENSIONS};
use crate::data::RawEntry;
use crate::errors::AnalyzerError;
use crate::transport::fs::{discover_archives, has_extension};
use crate::types::SourceId;

/// Source implementation modules.
pub mod sources;

pub use sources::jsonl_archive::JsonLinesArchive;
pub use sources::xml_archive::XmlArchive;

/// Everything one or more archives yielded.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ArchiveSnapshot {
    /// Raw entries in archive order.
    pub entries: Vec<RawEntry>,
    /// Elements that could not be decoded into an entry at all.
    pub undecodable: usize,
}

impl ArchiveSnapshot {
    /// Append another snapshot, keeping archive order.
    pub fn extend(&mut self, other: ArchiveSnapshot) {
        self.entries.extend(other.entries);
        self.undecodable += other.undecodable;
    }
}

impl From<Vec<RawEntry>> for ArchiveSnapshot {
    fn from(entries: Vec<RawEntry>) -> Self {
        Self {
            entries,
            undecodable: 0,
        }
    }
}

/// Pipeline-facing archive interface.
///
/// For a fixed file state, `load` must return the same entries in the same order.
pub trait ArchiveSource {
    /// Stable identifier used in logs and diagnostics.
    fn id(&self) -> &str;
    /// Read every entry of the archive.
    fn load(&self) -> Result<ArchiveSnapshot, AnalyzerError>;
}

/// Archive backed by entries already in memory.
#[derive(Clone, Debug)]
pub struct InMemoryArchive {
    id: SourceId,
    entries: Vec<RawEntry>,
}

impl InMemoryArchive {
    /// Create an in-memory archive from prebuilt entries.
    pub fn new(entries: Vec<RawEntry>) -> Self {
        Self {
            id: MEMORY_SOURCE_ID.to_string(),
            entries,
        }
    }

    /// Override the source id.
    pub fn with_id(mut self, id: impl Into<SourceId>) -> Self {
        self.id = id.into();
        self
    }
}

impl ArchiveSource for InMemoryArchive {
    fn id(&self) -> &str {
        &self.id
    }

    fn load(&self) -> Result<ArchiveSnapshot, AnalyzerError> {
        Ok(ArchiveSnapshot::from(self.entries.clone()))
    }
}

/// Pick a reader for `path` from its extension.
pub fn open_archive(path: &Path) -> Result<Box<dyn ArchiveSource>, AnalyzerError> {
    if has_extension(path, XML_EXTENSIONS) {
        return Ok(Box::new(XmlArchive::new(path)));
    }
    if has_extension(path, JSONL_EXTENSIONS) {
        return Ok(Box::new(JsonLinesArchive::new(path)));
    }
    Err(AnalyzerError::InvalidConfiguration(format!(
        "'{}' is not a recognised archive (expected .xml, .jsonl, or .ndjson)",
        path.display()
    )))
}

/// Load a single archive file, or every archive under a directory.
pub fn load_archives(path: &Path) -> Result<ArchiveSnapshot, AnalyzerError> {
    let mut snapshot = ArchiveSnapshot::default();
    for archive_path in discover_archives(path)? {
        let source = open_archive(&archive_path)?;
        snapshot.extend(source.load()?);
    }
    Ok(snapshot)
}
