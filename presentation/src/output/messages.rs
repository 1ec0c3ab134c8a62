//! Short user-facing messages for job failures

use captionkit_domain::{JobError, JobErrorKind, supported_extensions};

/// One-line explanation of a failed job for terminal output.
///
/// Service messages are shown verbatim since they usually say exactly what
/// went wrong; everything else gets a fixed sentence plus the detail.
pub fn user_message(error: &JobError) -> String {
    let summary = match error.kind {
        JobErrorKind::ServiceReportedError if error.is_credit_exhaustion() => {
            return format!("Out of credits: {}", error.detail);
        }
        JobErrorKind::ServiceReportedError => return error.detail.clone(),
        JobErrorKind::NoCredential => {
            "No API key configured (set CAPTIONKIT_SERVICE__API_KEY or [service] api_key)".to_string()
        }
        JobErrorKind::NotFound => "File not found".to_string(),
        JobErrorKind::UnsupportedFormat => format!(
            "Unsupported file type (supported: {})",
            supported_extensions().join(", ")
        ),
        JobErrorKind::TooLarge => "File is too large to upload".to_string(),
        JobErrorKind::ResourceUnreadable => "File could not be opened".to_string(),
        JobErrorKind::ResourceEmpty => "File is empty".to_string(),
        JobErrorKind::ResourceReadError => "File could not be read".to_string(),
        JobErrorKind::TransportFailure => "Could not reach the analysis service".to_string(),
        JobErrorKind::HttpStatus => "The analysis service returned an error".to_string(),
        JobErrorKind::MalformedResponse | JobErrorKind::PersistentMalformedResponse => {
            "The analysis service sent an unreadable response".to_string()
        }
        JobErrorKind::EmptyResult => "The analysis service returned no text".to_string(),
        JobErrorKind::UnexpectedResponseShape => {
            "The analysis service sent an unexpected response".to_string()
        }
        JobErrorKind::Timeout => "Timed out waiting for the analysis service".to_string(),
    };

    if error.detail.is_empty() {
        summary
    } else {
        format!("{} ({})", summary, error.detail)
    }
}
