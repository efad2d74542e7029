/// Filesystem discovery of archive files.
pub mod fs;
