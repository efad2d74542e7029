use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::data::RawEntry;
use crate::errors::{AnalyzerError, IngestionError};
use crate::source::{ArchiveSnapshot, ArchiveSource};
use crate::types::SourceId;

/// Reader for JSON-lines archives: one object per line using the XML attribute names.
///
/// `type` and `date` may be JSON numbers or strings. Blank lines are ignored;
/// lines that are not JSON objects are counted as undecodable and skipped.
pub struct JsonLinesArchive {
    id: SourceId,
    path: PathBuf,
}

impl JsonLinesArchive {
    /// Create a reader for the archive at `path`.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        Self {
            id: path.display().to_string(),
            path,
        }
    }

    /// Decode an in-memory document.
    pub fn parse_str(id: &str, contents: &str) -> ArchiveSnapshot {
        let mut snapshot = ArchiveSnapshot::default();
        for (line_idx, line) in contents.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match decode_line(line) {
                Ok(entry) => snapshot.entries.push(entry),
                Err(err) => {
                    warn!("[parley:jsonl] {}:{} skipped: {}", id, line_idx + 1, err);
                    snapshot.undecodable += 1;
                }
            }
        }
        info!(
            "[parley:jsonl] read {} entries from {} ({} undecodable)",
            snapshot.entries.len(),
            id,
            snapshot.undecodable
        );
        snapshot
    }
}

impl ArchiveSource for JsonLinesArchive {
    fn id(&self) -> &str {
        &self.id
    }

    fn load(&self) -> Result<ArchiveSnapshot, AnalyzerError> {
        let contents =
            std::fs::read_to_string(&self.path).map_err(|err| AnalyzerError::Archive {
                source_id: self.id.clone(),
                reason: err.to_string(),
            })?;
        Ok(Self::parse_str(&self.id, &contents))
    }
}

fn decode_line(line: &str) -> Result<RawEntry, IngestionError> {
    let object: Map<String, Value> =
        serde_json::from_str(line).map_err(|err| IngestionError::Undecodable(err.to_string()))?;
    Ok(RawEntry {
        address: scalar_field(&object, "address"),
        readable_date: scalar_field(&object, "readable_date"),
        type_code: scalar_field(&object, "type"),
        body: scalar_field(&object, "body"),
        contact_name: scalar_field(&object, "contact_name"),
        date: scalar_field(&object, "date"),
    })
}

/// Strings pass through; numbers and booleans are rendered; null and containers are absent.
fn scalar_field(object: &Map<String, Value>, key: &str) -> Option<String> {
    match object.get(key)? {
        Value::String(value) => Some(value.clone()),
        Value::Number(value) => Some(value.to_string()),
        Value::Bool(value) => Some(value.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
