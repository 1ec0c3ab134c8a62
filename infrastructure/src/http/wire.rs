//! Request bodies as they go on the wire.
//!
//! Response bodies are not modeled here: they are handed back raw and
//! classified by the domain's response parser.

use captionkit_application::{SubmitInstruction, SubmitPayload};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct WireImage<'a> {
    pub data: &'a str,
    pub mime: &'a str,
}

/// Body of `POST {endpoint}/analyze`
#[derive(Debug, Serialize)]
pub struct AnalyzeBody<'a> {
    pub images: [WireImage<'a>; 1],
    pub features: &'a [&'static str],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<&'a str>,
    pub language: &'a str,
    #[serde(skip_serializing_if = "no_models")]
    pub models: &'a [String],
}

fn no_models(models: &&[String]) -> bool {
    models.is_empty()
}

impl<'a> From<&'a SubmitPayload> for AnalyzeBody<'a> {
    fn from(payload: &'a SubmitPayload) -> Self {
        let (role, prompt) = match &payload.instruction {
            SubmitInstruction::Role(role) => (Some(role.as_str()), None),
            SubmitInstruction::Prompt(prompt) => (None, Some(prompt.as_str())),
        };
        Self {
            images: [WireImage {
                data: &payload.image.data,
                mime: payload.image.mime,
            }],
            features: &payload.features,
            role,
            prompt,
            language: &payload.language,
            models: &payload.backends,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use captionkit_application::EncodedPayload;
    use serde_json::json;
    use std::sync::Arc;

    fn payload(instruction: SubmitInstruction, backends: Vec<String>) -> SubmitPayload {
        SubmitPayload {
            image: Arc::new(EncodedPayload {
                data: "iVBORw0K".to_string(),
                mime: "image/png",
                byte_len: 6,
            }),
            instruction,
            language: "en".to_string(),
            backends,
            features: vec!["describe"],
        }
    }

    #[test]
    fn test_role_body() {
        let payload = payload(SubmitInstruction::Role("alt_text".into()), vec![]);
        let body = serde_json::to_value(AnalyzeBody::from(&payload)).unwrap();
        assert_eq!(
            body,
            json!({
                "images": [{"data": "iVBORw0K", "mime": "image/png"}],
                "features": ["describe"],
                "role": "alt_text",
                "language": "en",
            })
        );
    }

    #[test]
    fn test_prompt_body_with_backend() {
        let payload = payload(
            SubmitInstruction::Prompt("Describe the chart".into()),
            vec!["vision-large".into()],
        );
        let body = serde_json::to_value(AnalyzeBody::from(&payload)).unwrap();
        assert_eq!(body["prompt"], "Describe the chart");
        assert!(body.get("role").is_none());
        assert_eq!(body["models"], json!(["vision-large"]));
    }
}
