//! Resource admission rules: format allow-list and size cap.

use crate::core::error::{JobError, JobErrorKind};
use std::path::Path;

/// Default size cap for a single resource (16 MiB)
pub const DEFAULT_MAX_RESOURCE_BYTES: u64 = 16 * 1024 * 1024;

/// Extensions the service accepts, with the MIME type sent on the wire
const SUPPORTED_FORMATS: &[(&str, &str)] = &[
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
    ("gif", "image/gif"),
    ("webp", "image/webp"),
];

/// Look up the MIME type for a path by its extension (case-insensitive)
pub fn mime_type_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    SUPPORTED_FORMATS
        .iter()
        .find(|(known, _)| *known == ext)
        .map(|(_, mime)| *mime)
}

/// Validate a resource before it is encoded and submitted.
///
/// `size` is `None` when the resource does not exist. Returns the MIME type
/// on success.
pub fn validate_resource(
    path: &Path,
    size: Option<u64>,
    max_bytes: u64,
) -> Result<&'static str, JobError> {
    let Some(size) = size else {
        return Err(JobError::new(
            JobErrorKind::NotFound,
            format!("{} does not exist", path.display()),
        ));
    };

    let mime = mime_type_for(path).ok_or_else(|| {
        JobError::new(
            JobErrorKind::UnsupportedFormat,
            format!(
                "{} is not one of: {}",
                path.display(),
                supported_extensions().join(", ")
            ),
        )
    })?;

    if size > max_bytes {
        return Err(JobError::new(
            JobErrorKind::TooLarge,
            format!("{} is {} bytes (max: {} bytes)", path.display(), size, max_bytes),
        ));
    }

    Ok(mime)
}

pub fn supported_extensions() -> Vec<&'static str> {
    SUPPORTED_FORMATS.iter().map(|(ext, _)| *ext).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_lookup_is_case_insensitive() {
        assert_eq!(mime_type_for(Path::new("photo.JPG")), Some("image/jpeg"));
        assert_eq!(mime_type_for(Path::new("logo.webp")), Some("image/webp"));
        assert_eq!(mime_type_for(Path::new("notes.txt")), None);
        assert_eq!(mime_type_for(Path::new("no_extension")), None);
    }

    #[test]
    fn test_missing_resource_is_not_found() {
        let err = validate_resource(Path::new("a.png"), None, 10).unwrap_err();
        assert_eq!(err.kind, JobErrorKind::NotFound);
    }

    #[test]
    fn test_unsupported_extension() {
        let err = validate_resource(Path::new("a.tiff"), Some(1), 10).unwrap_err();
        assert_eq!(err.kind, JobErrorKind::UnsupportedFormat);
    }

    #[test]
    fn test_size_cap_is_inclusive() {
        assert_eq!(validate_resource(Path::new("a.png"), Some(10), 10), Ok("image/png"));
        let err = validate_resource(Path::new("a.png"), Some(11), 10).unwrap_err();
        assert_eq!(err.kind, JobErrorKind::TooLarge);
    }
}
