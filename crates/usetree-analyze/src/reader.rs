//! File content access.

use std::io;
use std::path::Path;

/// Source of module text.
///
/// Readers are shared by every concurrently classified branch.
pub trait SourceReader: Send + Sync {
    /// Read the full text of a module.
    fn read(&self, path: &Path) -> io::Result<String>;
}

/// Reads modules from the local filesystem as UTF-8.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsReader;

impl SourceReader for FsReader {
    fn read(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }
}

impl<F> SourceReader for F
where
    F: Fn(&Path) -> io::Result<String> + Send + Sync,
{
    fn read(&self, path: &Path) -> io::Result<String> {
        self(path)
    }
}
