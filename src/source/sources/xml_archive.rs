use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::info;

use crate::data::RawEntry;
use crate::errors::AnalyzerError;
use crate::source::{ArchiveSnapshot, ArchiveSource};
use crate::types::SourceId;

/// Root `<smses>` element. Non-`sms` children (for example `mms`) are ignored.
#[derive(Debug, Deserialize)]
struct XmlBackup {
    #[serde(rename = "sms", default)]
    messages: Vec<XmlMessage>,
}

/// One `<sms .../>` element; every attribute is optional.
#[derive(Debug, Deserialize)]
struct XmlMessage {
    #[serde(rename = "@address", default)]
    address: Option<String>,
    #[serde(rename = "@readable_date", default)]
    readable_date: Option<String>,
    #[serde(rename = "@type", default)]
    type_code: Option<String>,
    #[serde(rename = "@body", default)]
    body: Option<String>,
    #[serde(rename = "@contact_name", default)]
    contact_name: Option<String>,
    #[serde(rename = "@date", default)]
    date: Option<String>,
}

impl From<XmlMessage> for RawEntry {
    fn from(message: XmlMessage) -> Self {
        RawEntry {
            address: message.address,
            readable_date: message.readable_date,
            type_code: message.type_code,
            body: message.body,
            contact_name: message.contact_name,
            date: message.date,
        }
    }
}

/// Reader for attribute-per-message XML backups (`<smses><sms .../></smses>`).
pub struct XmlArchive {
    id: SourceId,
    path: PathBuf,
}

impl XmlArchive {
    /// Create a reader for the backup at `path`.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        Self {
            id: path.display().to_string(),
            path,
        }
    }

    /// Decode an in-memory document.
    pub fn parse_str(id: &str, contents: &str) -> Result<ArchiveSnapshot, AnalyzerError> {
        let backup: XmlBackup =
            quick_xml::de::from_str(contents).map_err(|err| AnalyzerError::Archive {
                source_id: id.to_string(),
                reason: err.to_string(),
            })?;
        let entries: Vec<RawEntry> = backup.messages.into_iter().map(RawEntry::from).collect();
        info!("[parley:xml] read {} entries from {}", entries.len(), id);
        Ok(ArchiveSnapshot::from(entries))
    }
}

impl ArchiveSource for XmlArchive {
    fn id(&self) -> &str {
        &self.id
    }

    fn load(&self) -> Result<ArchiveSnapshot, AnalyzerError> {
        let contents =
            std::fs::read_to_string(&self.path).map_err(|err| AnalyzerError::Archive {
                source_id: self.id.clone(),
                reason: err.to_string(),
            })?;
        Self::parse_str(&self.id, &contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const BACKUP: &str = r#"<?xml version='1.0' encoding='UTF-8' standalone='yes' ?>
<smses count="4">
  <sms protocol="0" address="+15551234567" date="1579536729000" type="1" body="Pizza tonight?" readable_date="Jan 20, 2020 4:12:09 PM" contact_name="Jane Doe" />
  <mms address="+15551234567" date="1579536730000"><parts /></mms>
  <sms address="5551234567" type="2" body="Sure &amp; bring napkins" readable_date="Jan 20, 2020 4:13:00 PM" contact_name="Jane Doe" />
  <sms type="1" body="no address here" />
</smses>"#;

    #[test]
    fn parses_attributes_and_skips_other_elements() {
        let snapshot = XmlArchive::parse_str("fixture", BACKUP).unwrap();
        assert_eq!(snapshot.entries.len(), 3);

        let first = &snapshot.entries[0];
        assert_eq!(first.address.as_deref(), Some("+15551234567"));
        assert_eq!(first.type_code.as_deref(), Some("1"));
        assert_eq!(first.contact_name.as_deref(), Some("Jane Doe"));
        assert_eq!(first.date.as_deref(), Some("1579536729000"));

        assert_eq!(
            snapshot.entries[1].body.as_deref(),
            Some("Sure & bring napkins")
        );
        assert!(snapshot.entries[2].address.is_none());
    }

    #[test]
    fn empty_backup_yields_no_entries() {
        let snapshot = XmlArchive::parse_str("empty", "<smses count=\"0\"></smses>").unwrap();
        assert!(snapshot.entries.is_empty());
    }

    #[test]
    fn malformed_document_is_an_archive_error() {
        let err = XmlArchive::parse_str("broken", "<smses><sms address=").unwrap_err();
        assert!(matches!(err, AnalyzerError::Archive { .. }));
    }

    #[test]
    fn load_reads_from_disk_and_reports_missing_files() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("texts.xml");
        std::fs::write(&path, BACKUP).unwrap();
        let archive = XmlArchive::new(&path);
        assert_eq!(archive.load().unwrap().entries.len(), 3);

        let missing = XmlArchive::new(temp.path().join("absent.xml"));
        assert!(matches!(
            missing.load().unwrap_err(),
            AnalyzerError::Archive { .. }
        ));
    }
}
