//! Resource source port
//!
//! Where the bytes of a resource come from. The core never writes through it.

use std::io;
use std::path::Path;

/// Read-only access to the resources being analyzed
pub trait ResourceSource: Send + Sync {
    /// Size in bytes, or `None` if nothing exists at `path`
    fn size(&self, path: &Path) -> io::Result<Option<u64>>;

    /// Full contents of the resource
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;
}
