//! Blocking client for the hosted generative-language API.

use reqwest::blocking::Client;
use reqwest::header::USER_AGENT;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::GeminiConfig;
use crate::error::{AiError, Result};
use crate::generator::{GenerationRequest, TextGenerator};
use crate::template::{PromptPart, RenderedPrompt};

const API_KEY_HEADER: &str = "x-goog-api-key";

// ===== WIRE TYPES =====

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig<'a>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
enum Part<'a> {
    Text(&'a str),
    InlineData(Blob<'a>),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Blob<'a> {
    mime_type: &'a str,
    data: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    response_mime_type: &'static str,
    response_schema: &'a Value,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

fn request_body<'a>(
    prompt: &'a RenderedPrompt,
    response_schema: &'a Value,
) -> GenerateContentRequest<'a> {
    let parts = prompt
        .parts
        .iter()
        .map(|part| match part {
            PromptPart::Text(text) => Part::Text(text),
            PromptPart::Media(media) => Part::InlineData(Blob {
                mime_type: &media.mime_type,
                data: &media.data,
            }),
        })
        .collect();
    GenerateContentRequest {
        contents: vec![Content {
            role: "user",
            parts,
        }],
        generation_config: GenerationConfig {
            response_mime_type: "application/json",
            response_schema,
        },
    }
}

/// Text of the first candidate, parts concatenated.
fn candidate_text(response: GenerateContentResponse) -> Result<String> {
    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or(AiError::EmptyResponse)?;
    if let Some(reason) = candidate.finish_reason.as_deref()
        && reason != "STOP"
    {
        warn!("Model finished with reason {reason}");
    }
    let text: String = candidate
        .content
        .map(|content| content.parts)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|part| part.text)
        .collect();
    if text.trim().is_empty() {
        Err(AiError::EmptyResponse)
    } else {
        Ok(text)
    }
}

// ===== CLIENT =====

/// [`TextGenerator`] backed by the `generateContent` endpoint.
pub struct GeminiClient {
    client: Client,
    config: GeminiConfig,
    api_key: String,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig, api_key: String) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self {
            client,
            config,
            api_key,
        })
    }

    /// Build a client with the key taken from the environment.
    pub fn from_env(config: GeminiConfig) -> Result<Self> {
        let api_key = config.resolve_api_key()?;
        Self::new(config, api_key)
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }
}

impl TextGenerator for GeminiClient {
    fn generate(&self, request: &GenerationRequest) -> Result<String> {
        let url = self.config.generate_url();
        let body = request_body(&request.prompt, &request.response_schema);
        debug!(
            "POST {url} ({} parts, {} media)",
            body.contents[0].parts.len(),
            request.prompt.media().count()
        );

        let response = self
            .client
            .post(&url)
            .header(USER_AGENT, concat!("agri-shield/", env!("CARGO_PKG_VERSION")))
            .header(API_KEY_HEADER, &self.api_key)
            .json(&body)
            .send()?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response
                .text()
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AiError::Api { status, message });
        }

        let parsed: GenerateContentResponse = response.json()?;
        candidate_text(parsed)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::template::InlineMedia;

    #[test]
    fn body_carries_text_media_and_schema() {
        let prompt = RenderedPrompt {
            parts: vec![
                PromptPart::Text("Look at ".to_string()),
                PromptPart::Media(InlineMedia {
                    mime_type: "image/jpeg".to_string(),
                    data: "AAAA".to_string(),
                }),
            ],
        };
        let schema = json!({"type": "OBJECT"});
        let body = serde_json::to_value(request_body(&prompt, &schema)).unwrap();
        assert_eq!(
            body,
            json!({
                "contents": [{
                    "role": "user",
                    "parts": [
                        {"text": "Look at "},
                        {"inlineData": {"mimeType": "image/jpeg", "data": "AAAA"}}
                    ]
                }],
                "generationConfig": {
                    "responseMimeType": "application/json",
                    "responseSchema": {"type": "OBJECT"}
                }
            })
        );
    }

    #[test]
    fn first_candidate_parts_are_joined() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [
                {"content": {"parts": [{"text": "{\"a\":"}, {"text": "1}"}]}, "finishReason": "STOP"},
                {"content": {"parts": [{"text": "ignored"}]}}
            ]
        }))
        .unwrap();
        assert_eq!(candidate_text(response).unwrap(), "{\"a\":1}");
    }

    #[test]
    fn no_candidates_is_empty_response() {
        let response: GenerateContentResponse =
            serde_json::from_value(json!({"promptFeedback": {"blockReason": "SAFETY"}})).unwrap();
        assert!(matches!(
            candidate_text(response),
            Err(AiError::EmptyResponse)
        ));
    }
}
