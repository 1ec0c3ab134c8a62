//! Single-slot encoder cache
//!
//! Reading and base64-encoding an image is the most expensive local step of a
//! submission. Several requests for the same image (alt text, caption and
//! description at once) share one encode through this cache. Only the most
//! recent resource is kept, so memory stays bounded to one payload.
//!
//! Callers submitting for two different resources concurrently should use one
//! cache per resource; a shared cache still works but re-reads on every switch.

use crate::ports::resource_source::ResourceSource;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use captionkit_domain::{JobError, JobErrorKind, mime_type_for};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::debug;

/// Transport-safe encoding of one resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedPayload {
    /// Base64 (standard alphabet, padded)
    pub data: String,
    pub mime: &'static str,
    /// Size of the decoded bytes
    pub byte_len: usize,
}

struct CachedEntry {
    path: PathBuf,
    payload: Arc<EncodedPayload>,
}

/// Memoizes the most recent (path, payload) pair
pub struct EncoderCache<R: ResourceSource> {
    source: Arc<R>,
    slot: Mutex<Option<CachedEntry>>,
}

impl<R: ResourceSource> EncoderCache<R> {
    pub fn new(source: Arc<R>) -> Self {
        Self {
            source,
            slot: Mutex::new(None),
        }
    }

    /// Encode the resource at `path`, reusing the cached payload if `path` is
    /// the cached one. A different path evicts the previous entry.
    ///
    /// The slot stays locked while reading so concurrent callers asking for
    /// the same path wait for one read instead of racing two.
    pub fn encode(&self, path: &Path) -> Result<Arc<EncodedPayload>, JobError> {
        let mut slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());

        if let Some(entry) = slot.as_ref()
            && entry.path == path
        {
            debug!("Encoder cache hit for {}", path.display());
            return Ok(Arc::clone(&entry.payload));
        }

        // Evict first: a failed read must not leave a stale entry behind
        *slot = None;

        let bytes = self.source.read(path).map_err(|e| read_error(path, e))?;
        if bytes.is_empty() {
            return Err(JobError::new(
                JobErrorKind::ResourceEmpty,
                format!("{} is empty", path.display()),
            ));
        }

        let payload = Arc::new(EncodedPayload {
            data: BASE64.encode(&bytes),
            mime: mime_type_for(path).unwrap_or("application/octet-stream"),
            byte_len: bytes.len(),
        });
        debug!(
            "Encoded {} ({} bytes -> {} chars)",
            path.display(),
            payload.byte_len,
            payload.data.len()
        );

        *slot = Some(CachedEntry {
            path: path.to_path_buf(),
            payload: Arc::clone(&payload),
        });
        Ok(payload)
    }

    /// Path currently cached, if any
    pub fn cached_path(&self) -> Option<PathBuf> {
        self.slot
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
            .map(|entry| entry.path.clone())
    }
}

fn read_error(path: &Path, error: io::Error) -> JobError {
    let kind = match error.kind() {
        io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied => {
            JobErrorKind::ResourceUnreadable
        }
        _ => JobErrorKind::ResourceReadError,
    };
    JobError::new(kind, format!("{}: {}", path.display(), error))
}
