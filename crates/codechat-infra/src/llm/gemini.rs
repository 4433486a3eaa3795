//! GeminiClient -- concrete [`TextGenerator`] implementation for the Google
//! Gemini `generateContent` API.
//!
//! The API key is wrapped in [`secrecy::SecretString`] and is never logged
//! or included in `Debug` output.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use codechat_core::llm::generator::TextGenerator;
use codechat_types::config::LlmConfig;
use codechat_types::error::GenerationError;

/// Google Gemini text generation client.
///
/// Sends flat single-part prompts to `models/{model}:generateContent` and
/// returns the concatenated text of the first candidate.
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    model: String,
}

// GeminiClient intentionally does NOT derive Debug so the API key can never
// leak through formatting, even though SecretString already redacts it.

impl GeminiClient {
    /// Create a new Gemini client.
    pub fn new(api_key: SecretString, model: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .expect("failed to create reqwest client");

        Self {
            client,
            api_key,
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            model,
        }
    }

    /// Create a client from config, reading the API key from the environment
    /// variable the config names.
    pub fn from_config(config: &LlmConfig) -> Result<Self, GenerationError> {
        let key = std::env::var(&config.api_key_env)
            .map_err(|_| GenerationError::MissingApiKey)?;
        if key.trim().is_empty() {
            return Err(GenerationError::MissingApiKey);
        }

        Ok(Self::new(SecretString::from(key), config.model.clone()).with_base_url(config.api_url.clone()))
    }

    /// The configured model identifier.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Override the base URL (useful for testing or proxies).
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Build the generateContent URL for the configured model.
    fn url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
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
    #[serde(default)]
    text: String,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate's parts.
    fn first_candidate_text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .map(|p| p.text.as_str())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default()
    }
}

impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };

        let response = self
            .client
            .post(self.url())
            .query(&[("key", self.api_key.expose_secret())])
            .json(&body)
            .send()
            .await
            .map_err(|e| GenerationError::Http(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(GenerationError::Api {
                status: status.as_u16(),
                message: error_body,
            });
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::Deserialization(e.to_string()))?;

        let text = parsed.first_candidate_text();
        if text.trim().is_empty() {
            return Err(GenerationError::EmptyResponse);
        }

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_client() -> GeminiClient {
        GeminiClient::new(SecretString::from("test-key-not-real"), "gemini-pro".to_string())
    }

    #[test]
    fn test_url_construction() {
        let client = make_client();
        assert_eq!(
            client.url(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-pro:generateContent"
        );
    }

    #[test]
    fn test_with_base_url_strips_trailing_slash() {
        let client = make_client().with_base_url("http://localhost:8080/".to_string());
        assert_eq!(
            client.url(),
            "http://localhost:8080/v1beta/models/gemini-pro:generateContent"
        );
    }

    #[test]
    fn test_parses_candidate_text() {
        let json = r#"{
            "candidates": [
                {
                    "content": {
                        "parts": [
                            {"text": "Hello, "},
                            {"text": "world."}
                        ],
                        "role": "model"
                    },
                    "finishReason": "STOP"
                }
            ]
        }"#;

        let parsed: GenerateContentResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.first_candidate_text(), "Hello, world.");
    }

    #[test]
    fn test_empty_candidates_yield_empty_text() {
        let parsed: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed.first_candidate_text(), "");
    }

    #[test]
    fn test_request_serialization_shape() {
        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: "user: hi\n".to_string(),
                }],
            }],
        };

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["text"], "user: hi\n");
    }
}
