//! Generative-AI completion client.
//!
//! The rest of the application only sees [`CompletionProvider`]: a prompt goes in,
//! free text comes out, and the call may fail. The text is never parsed.

use crate::config::GeminiConfig;
use crate::error::{AppError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error};

/// Anything that turns a prompt into a text completion.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String>;
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
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

impl GenerateResponse {
    /// Concatenated text parts of the first candidate.
    fn text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text: String = content.parts.into_iter().filter_map(|p| p.text).collect();
        (!text.trim().is_empty()).then_some(text)
    }
}

/// Client for the Gemini `generateContent` endpoint.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl GeminiClient {
    pub fn new(api_key: String, base_url: &str, model: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        })
    }

    /// Creates a client from configuration; the API key is required.
    pub fn from_config(config: &GeminiConfig, timeout: Duration) -> Result<Self> {
        let api_key = config.api_key.clone().ok_or_else(|| {
            AppError::Config("GEMINI_API_KEY is not set".to_string())
        })?;
        Self::new(api_key, &config.base_url, &config.model, timeout)
    }
}

#[async_trait]
impl CompletionProvider for GeminiClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        let body = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        debug!("Requesting completion from {} ({} chars)", self.model, prompt.len());

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!("Error generating AI response: {}", e);
                AppError::Completion(format!("request failed: {e}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            error!("Completion request returned status {}: {}", status, detail);
            return Err(AppError::Completion(format!(
                "service returned status {}",
                status.as_u16()
            )));
        }

        let parsed: GenerateResponse = response.json().await.map_err(|e| {
            error!("Unable to parse completion response: {}", e);
            AppError::Completion(format!("invalid response: {e}"))
        })?;

        parsed
            .text()
            .ok_or_else(|| AppError::Completion("empty completion".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use serde_json::json;

    fn client_for(server: &mockito::ServerGuard) -> GeminiClient {
        GeminiClient::new(
            "test_key".to_string(),
            &server.url(),
            "gemini-2.5-flash",
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_complete_returns_joined_text() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/models/gemini-2.5-flash:generateContent")
            .match_header("x-goog-api-key", "test_key")
            .match_body(Matcher::PartialJson(
                json!({"contents": [{"parts": [{"text": "How is the air?"}]}]}),
            ))
            .with_status(200)
            .with_body(
                json!({
                    "candidates": [
                        {"content": {"parts": [{"text": "Fine. "}, {"text": "Go outside."}]}}
                    ]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let answer = client_for(&server)
            .complete("How is the air?")
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(answer, "Fine. Go outside.");
    }

    #[tokio::test]
    async fn test_empty_candidates_is_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/models/gemini-2.5-flash:generateContent")
            .with_status(200)
            .with_body(json!({"candidates": []}).to_string())
            .create_async()
            .await;

        let err = client_for(&server).complete("hi").await.unwrap_err();
        assert!(matches!(err, AppError::Completion(msg) if msg == "empty completion"));
    }

    #[tokio::test]
    async fn test_error_status_is_completion_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/models/gemini-2.5-flash:generateContent")
            .with_status(429)
            .with_body("quota")
            .create_async()
            .await;

        let err = client_for(&server).complete("hi").await.unwrap_err();
        assert!(err.to_string().contains("429"));
    }

    #[test]
    fn test_missing_api_key_is_config_error() {
        let config = GeminiConfig {
            api_key: None,
            base_url: "http://localhost".to_string(),
            model: "m".to_string(),
        };
        let err = GeminiClient::from_config(&config, Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }
}
