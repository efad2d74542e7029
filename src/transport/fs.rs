use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::constants::source::{JSONL_EXTENSIONS, XML_EXTENSIONS};
use crate::errors::AnalyzerError;

/// True if the path's extension matches one of `extensions` (case-insensitive).
pub fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            extensions
                .iter()
                .any(|candidate| ext.eq_ignore_ascii_case(candidate))
        })
        .unwrap_or(false)
}

/// True if the path looks like an archive any built-in reader understands.
pub fn is_archive_file(path: &Path) -> bool {
    has_extension(path, XML_EXTENSIONS) || has_extension(path, JSONL_EXTENSIONS)
}

/// Resolve an input path into the archive files to read.
///
/// A file is returned as-is (the reader decides whether it understands it).
/// A directory is walked and every archive file below it is returned in
/// sorted path order so repeated runs read entries in the same order.
pub fn discover_archives(root: &Path) -> Result<Vec<PathBuf>, AnalyzerError> {
    if root.is_file() {
        return Ok(vec![root.to_path_buf()]);
    }
    if !root.is_dir() {
        return Err(AnalyzerError::Archive {
            source_id: root.display().to_string(),
            reason: "path does not exist".to_string(),
        });
    }
    let mut archives: Vec<PathBuf> = WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| is_archive_file(path))
        .collect();
    archives.sort();
    debug!(
        "[parley:fs] discovered {} archive files under {}",
        archives.len(),
        root.display()
    );
    Ok(archives)
}
