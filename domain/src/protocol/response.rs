//! Response classification
//!
//! Every body returned by the analysis service passes through [`ParsedResponse::classify`]
//! exactly once. The rest of the system only ever matches on the resulting variant.

use crate::core::error::{JobError, JobErrorKind};
use crate::job::handle::JobHandle;
use serde_json::{Map, Value};

/// Status marker for a finished job
pub const STATUS_COMPLETED: &str = "completed";

/// Status markers for a job the service is still working on
pub const STATUS_IN_PROGRESS: &[&str] = &["queued", "processing"];

/// Keys that may carry the completion handle
const HANDLE_KEYS: &[&str] = &["completion_url", "poll_url"];

/// Keys that may carry an item's generated text, in lookup order
const TEXT_KEYS: &[&str] = &["text", "alt_text", "caption", "description"];

/// Keys that may carry an item's attributed backend
const SOURCE_KEYS: &[&str] = &["source", "model"];

/// Longest body excerpt kept in a malformed-response detail
const EXCERPT_LEN: usize = 120;

/// One generated item inside a completed payload
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratedItem {
    pub text: Option<String>,
    pub source: Option<String>,
}

/// The assets of a completed exchange
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletedPayload {
    pub items: Vec<GeneratedItem>,
    pub credits: Option<i64>,
    /// Diagnostic messages the service attached (top-level or per item)
    pub messages: Vec<String>,
}

/// A decoded service response
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedResponse {
    /// Final assets are present
    Completed(CompletedPayload),
    /// The job is accepted or still running.
    ///
    /// `status` is `None` when the body only carried a handle.
    InProgress {
        status: Option<String>,
        handle: Option<JobHandle>,
    },
    /// The body carried an `error` field
    ServiceError {
        message: String,
        credits: Option<i64>,
    },
    /// The body is not a JSON object
    Malformed { detail: String },
    /// Structured, but not a shape the protocol defines
    Unrecognized {
        detail: String,
        credits: Option<i64>,
    },
}

impl ParsedResponse {
    /// Decode a raw response body.
    ///
    /// Precedence: undecodable body, then `error` field (whatever the status says),
    /// then declared `status`, then handle or inline results.
    pub fn classify(body: &str) -> Self {
        let object = match serde_json::from_str::<Value>(body) {
            Ok(Value::Object(map)) => map,
            Ok(other) => {
                return ParsedResponse::Malformed {
                    detail: format!("expected a JSON object, got {}", json_type_name(&other)),
                };
            }
            Err(e) => {
                return ParsedResponse::Malformed {
                    detail: format!("{} (body: {})", e, excerpt(body)),
                };
            }
        };

        let credits = object.get("credits").and_then(parse_credits);

        if let Some(message) = object.get("error").and_then(error_message) {
            return ParsedResponse::ServiceError { message, credits };
        }

        let handle = HANDLE_KEYS
            .iter()
            .filter_map(|key| object.get(*key).and_then(Value::as_str))
            .map(str::trim)
            .find(|s| !s.is_empty())
            .map(JobHandle::new);

        match object.get("status").and_then(Value::as_str).map(str::trim) {
            Some(STATUS_COMPLETED) => {
                ParsedResponse::Completed(completed_payload(&object, credits))
            }
            Some(status) if STATUS_IN_PROGRESS.contains(&status) => ParsedResponse::InProgress {
                status: Some(status.to_string()),
                handle,
            },
            Some(status) => ParsedResponse::Unrecognized {
                detail: format!("unknown status '{status}'"),
                credits,
            },
            None if handle.is_some() => ParsedResponse::InProgress {
                status: None,
                handle,
            },
            None if object.contains_key("results") => {
                ParsedResponse::Completed(completed_payload(&object, credits))
            }
            None => ParsedResponse::Unrecognized {
                detail: format!(
                    "no status, handle or results (keys: {})",
                    object.keys().cloned().collect::<Vec<_>>().join(", ")
                ),
                credits,
            },
        }
    }

    /// Credit balance the body reported, whatever its shape
    pub fn credits(&self) -> Option<i64> {
        match self {
            ParsedResponse::Completed(payload) => payload.credits,
            ParsedResponse::ServiceError { credits, .. }
            | ParsedResponse::Unrecognized { credits, .. } => *credits,
            ParsedResponse::InProgress { .. } | ParsedResponse::Malformed { .. } => None,
        }
    }

    /// Short label for logs
    pub fn label(&self) -> &'static str {
        match self {
            ParsedResponse::Completed(_) => "completed",
            ParsedResponse::InProgress { .. } => "in_progress",
            ParsedResponse::ServiceError { .. } => "service_error",
            ParsedResponse::Malformed { .. } => "malformed",
            ParsedResponse::Unrecognized { .. } => "unrecognized",
        }
    }
}

/// Decode the body of an account query into the remaining credit balance.
pub fn parse_account_credits(body: &str) -> Result<i64, JobError> {
    match ParsedResponse::classify(body) {
        ParsedResponse::Malformed { detail } => {
            Err(JobError::new(JobErrorKind::MalformedResponse, detail))
        }
        ParsedResponse::ServiceError { message, credits } => {
            Err(JobError::service(message).with_credits(credits))
        }
        _ => serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|v| v.get("credits").and_then(parse_credits))
            .ok_or_else(|| {
                JobError::new(
                    JobErrorKind::UnexpectedResponseShape,
                    "account response has no credits field",
                )
            }),
    }
}

fn completed_payload(object: &Map<String, Value>, credits: Option<i64>) -> CompletedPayload {
    let raw_items: &[Value] = match object.get("results") {
        Some(Value::Array(items)) => items,
        Some(Value::Object(nested)) => match nested.get("items") {
            Some(Value::Array(items)) => items,
            _ => &[],
        },
        _ => &[],
    };

    let mut messages = string_list(object.get("messages"));
    let mut items = Vec::with_capacity(raw_items.len());

    for raw in raw_items {
        let Value::Object(item) = raw else {
            continue;
        };
        if let Some(message) = item.get("error").and_then(error_message) {
            messages.push(message);
        }
        items.push(GeneratedItem {
            text: first_string(item, TEXT_KEYS),
            source: first_string(item, SOURCE_KEYS),
        });
    }

    CompletedPayload {
        items,
        credits,
        messages,
    }
}

fn first_string(item: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| item.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

fn error_message(value: &Value) -> Option<String> {
    let message = match value {
        Value::Null | Value::Bool(false) => return None,
        Value::String(s) => s.trim().to_string(),
        Value::Object(map) => map
            .get("message")
            .and_then(Value::as_str)
            .map(|s| s.trim().to_string())
            .unwrap_or_else(|| value.to_string()),
        other => other.to_string(),
    };
    (!message.is_empty()).then_some(message)
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::String(s)) if !s.trim().is_empty() => vec![s.trim().to_string()],
        Some(Value::Array(values)) => values
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

fn parse_credits(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn excerpt(body: &str) -> String {
    let trimmed = body.trim();
    let mut end = trimmed.len().min(EXCERPT_LEN);
    while end > 0 && !trimmed.is_char_boundary(end) {
        end -= 1;
    }
    trimmed[..end].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_body_is_malformed() {
        let parsed = ParsedResponse::classify("<html><body>502 Bad Gateway</body></html>");
        assert!(matches!(parsed, ParsedResponse::Malformed { .. }));
    }

    #[test]
    fn test_non_object_json_is_malformed() {
        assert!(matches!(
            ParsedResponse::classify("[1, 2]"),
            ParsedResponse::Malformed { .. }
        ));
        assert!(matches!(
            ParsedResponse::classify("null"),
            ParsedResponse::Malformed { .. }
        ));
    }

    #[test]
    fn test_error_field_wins_over_status() {
        let parsed =
            ParsedResponse::classify(r#"{"status": "completed", "error": "Bad image", "credits": 7}"#);
        assert_eq!(
            parsed,
            ParsedResponse::ServiceError {
                message: "Bad image".into(),
                credits: Some(7)
            }
        );
    }

    #[test]
    fn test_error_object_message() {
        let parsed = ParsedResponse::classify(r#"{"error": {"code": 403, "message": "Access denied."}}"#);
        assert_eq!(
            parsed,
            ParsedResponse::ServiceError {
                message: "Access denied.".into(),
                credits: None
            }
        );
    }

    #[test]
    fn test_null_or_empty_error_is_ignored() {
        let parsed = ParsedResponse::classify(r#"{"status": "queued", "error": null}"#);
        assert!(matches!(parsed, ParsedResponse::InProgress { .. }));
        let parsed = ParsedResponse::classify(r#"{"status": "queued", "error": ""}"#);
        assert!(matches!(parsed, ParsedResponse::InProgress { .. }));
    }

    #[test]
    fn test_submit_with_handle_only() {
        let parsed = ParsedResponse::classify(r#"{"completion_url": "https://svc/jobs/1"}"#);
        assert_eq!(
            parsed,
            ParsedResponse::InProgress {
                status: None,
                handle: Some(JobHandle::new("https://svc/jobs/1"))
            }
        );
    }

    #[test]
    fn test_poll_url_alias() {
        let parsed =
            ParsedResponse::classify(r#"{"status": "queued", "poll_url": "https://svc/jobs/2"}"#);
        assert_eq!(
            parsed,
            ParsedResponse::InProgress {
                status: Some("queued".into()),
                handle: Some(JobHandle::new("https://svc/jobs/2"))
            }
        );
    }

    #[test]
    fn test_completed_with_nested_items() {
        let parsed = ParsedResponse::classify(
            r#"{"status": "completed", "credits": "41",
                "results": {"items": [{"caption": " A cat on a sofa ", "model": "vision-x"}]}}"#,
        );
        let ParsedResponse::Completed(payload) = parsed else {
            panic!("expected completed");
        };
        assert_eq!(payload.credits, Some(41));
        assert_eq!(payload.items[0].text.as_deref(), Some("A cat on a sofa"));
        assert_eq!(payload.items[0].source.as_deref(), Some("vision-x"));
    }

    #[test]
    fn test_inline_results_without_status() {
        let parsed = ParsedResponse::classify(r#"{"results": [{"text": "A dog"}], "credits": 3}"#);
        assert!(matches!(parsed, ParsedResponse::Completed(_)));
    }

    #[test]
    fn test_completed_collects_messages() {
        let parsed = ParsedResponse::classify(
            r#"{"status": "completed", "messages": ["image too dark"],
                "results": [{"text": "", "error": "no subject found"}]}"#,
        );
        let ParsedResponse::Completed(payload) = parsed else {
            panic!("expected completed");
        };
        assert_eq!(payload.messages, vec!["image too dark", "no subject found"]);
        assert_eq!(payload.items[0].text, None);
    }

    #[test]
    fn test_unknown_status_is_unrecognized() {
        assert!(matches!(
            ParsedResponse::classify(r#"{"status": "paused"}"#),
            ParsedResponse::Unrecognized { .. }
        ));
        assert!(matches!(
            ParsedResponse::classify(r#"{"hello": "world"}"#),
            ParsedResponse::Unrecognized { .. }
        ));
    }

    #[test]
    fn test_unrecognized_keeps_credits() {
        assert_eq!(
            ParsedResponse::classify(r#"{"status": "failed", "credits": 7}"#),
            ParsedResponse::Unrecognized {
                detail: "unknown status 'failed'".to_string(),
                credits: Some(7),
            }
        );
        assert!(matches!(
            ParsedResponse::classify(r#"{"credits": "3"}"#),
            ParsedResponse::Unrecognized {
                credits: Some(3),
                ..
            }
        ));
    }

    #[test]
    fn test_account_credits() {
        assert_eq!(parse_account_credits(r#"{"credits": 250}"#), Ok(250));
        let err = parse_account_credits(r#"{"error": "Access denied."}"#).unwrap_err();
        assert_eq!(err.kind, JobErrorKind::ServiceReportedError);
        let err = parse_account_credits(r#"{"plan": "free"}"#).unwrap_err();
        assert_eq!(err.kind, JobErrorKind::UnexpectedResponseShape);
    }
}
