use std::io;

use thiserror::Error;

use crate::types::{SourceId, StageName};

/// Fatal error type for configuration, archive IO, and empty-corpus failures.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error("archive '{source_id}' could not be read: {reason}")]
    Archive { source_id: SourceId, reason: String },
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("{stage} stage has nothing to work with: {details}")]
    EmptyCorpus { stage: StageName, details: String },
}

/// Per-entry ingestion problem. Entries that raise it are skipped, never fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IngestionError {
    #[error("entry is missing required field '{0}'")]
    MissingField(&'static str),
    #[error("entry could not be decoded: {0}")]
    Undecodable(String),
}
