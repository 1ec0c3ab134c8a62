//! Local filesystem resource source.

use captionkit_application::ResourceSource;
use std::io;
use std::path::Path;

/// Reads resources straight from the local filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct FsResourceSource;

impl ResourceSource for FsResourceSource {
    fn size(&self, path: &Path) -> io::Result<Option<u64>> {
        match std::fs::metadata(path) {
            Ok(meta) if meta.is_file() => Ok(Some(meta.len())),
            Ok(_) => Ok(None),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        std::fs::read(path)
    }
}
