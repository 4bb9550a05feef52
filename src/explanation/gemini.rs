//! Minimal `generateContent` client for the Gemini API.
//!
//! One POST per call, JSON reply mime type requested, key sent in the
//! `x-goog-api-key` header. Bounded by the configured timeouts, never retried.

use std::time::Duration;

use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::config::ExplanationConfig;
use super::errors::ExplanationError;
use super::{ExplanationPayload, EXPLANATION_FIELD_MISSING, STEPS_FIELD_MISSING};

const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    url: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(config: &ExplanationConfig, api_key: &str) -> Result<Self, ExplanationError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()
            .map_err(|e| ExplanationError::Transport(format!("cannot build HTTP client: {e}")))?;
        Ok(Self {
            http,
            url: format!(
                "{}/models/{}:generateContent",
                config.endpoint.trim_end_matches('/'),
                config.model
            ),
            api_key: api_key.to_string(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Sends the prompt and reads the `{explanation, steps}` pair out of the first candidate
    pub async fn generate(&self, prompt: &str) -> Result<ExplanationPayload, ExplanationError> {
        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
            },
        };
        debug!("POST {}", self.url);
        let response = self
            .http
            .post(&self.url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&body)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ExplanationError::Status(status.as_u16()));
        }
        let reply: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| ExplanationError::Malformed(e.to_string()))?;
        let text = reply
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .and_then(|content| content.parts.into_iter().next())
            .and_then(|part| part.text)
            .ok_or_else(|| ExplanationError::Malformed("no candidate text".to_string()))?;
        parse_reply_text(&text)
    }
}

/// The model text must be a JSON object; missing fields get their own fallback text
pub fn parse_reply_text(text: &str) -> Result<ExplanationPayload, ExplanationError> {
    let value: Value = serde_json::from_str(text.trim())
        .map_err(|e| ExplanationError::Malformed(e.to_string()))?;
    let Value::Object(fields) = value else {
        return Err(ExplanationError::Malformed(
            "reply is not a JSON object".to_string(),
        ));
    };
    let explanation = fields
        .get("explanation")
        .and_then(field_text)
        .unwrap_or_else(|| EXPLANATION_FIELD_MISSING.to_string());
    let steps = fields
        .get("steps")
        .and_then(field_text)
        .unwrap_or_else(|| STEPS_FIELD_MISSING.to_string());
    Ok(ExplanationPayload { explanation, steps })
}

/// strings as they are, lists of steps one per line
fn field_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => Some(
            items
                .iter()
                .map(|item| match item {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join("\n"),
        ),
        other => Some(other.to_string()),
    }
}
