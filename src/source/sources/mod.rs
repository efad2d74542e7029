/// JSON-lines archive reader.
pub mod jsonl_archive;
/// XML backup archive reader.
pub mod xml_archive;
