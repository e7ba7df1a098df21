//! Gemini generateContent client.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::error::LlmError;
use crate::providers::LanguageModel;

const GENERATE_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Language-model collaborator over the Gemini REST API.
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: SecretString,
    model: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(http: reqwest::Client, api_key: SecretString, model: impl Into<String>) -> Self {
        Self {
            http,
            api_key,
            model: model.into(),
            base_url: GENERATE_BASE.to_string(),
        }
    }
}

#[async_trait]
impl LanguageModel for GeminiClient {
    async fn complete(&self, prompt: &str, temperature: f32) -> Result<String, LlmError> {
        let url = format!("{}/{}:generateContent", self.base_url, self.model);
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig { temperature },
        };

        let resp = self
            .http
            .post(&url)
            .query(&[("key", self.api_key.expose_secret())])
            .json(&request)
            .send()
            .await
            .map_err(|e| LlmError::Request(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(LlmError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let generated: GenerateResponse = resp
            .json()
            .await
            .map_err(|e| LlmError::Request(format!("decode response: {e}")))?;

        generated
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or_else(|| LlmError::InvalidResponse("no candidate text".into()))
    }
}

// ── Wire types ──────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_text_extraction() {
        let raw = r#"{"candidates":[{"content":{"parts":[{"text":"Summary: hi"}]}}]}"#;
        let parsed: GenerateResponse = serde_json::from_str(raw).unwrap();
        let text = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text);
        assert_eq!(text.as_deref(), Some("Summary: hi"));
    }

    #[test]
    fn empty_candidates_is_invalid() {
        let raw = r#"{"candidates":[]}"#;
        let parsed: GenerateResponse = serde_json::from_str(raw).unwrap();
        assert!(parsed.candidates.is_empty());
    }
}
