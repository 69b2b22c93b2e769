use log::debug;
use reqwest::Client;
use std::env;

use crate::models::generation::{GenerateContentRequest, GenerateContentResponse, GenerationError};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// A text-in, text-out generation backend.
pub trait TextGeneration {
    /// Returns the first candidate's text, or `UpstreamEmpty` when there is none.
    async fn generate_text(&self, prompt: &str) -> Result<String, GenerationError>;
}

#[derive(Clone)]
pub struct GeminiService {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiService {
    /// Reads `GEMINI_API_KEY`, and optionally `GEMINI_MODEL` and `GEMINI_BASE_URL`.
    pub fn new() -> Result<Self, GenerationError> {
        let api_key = env::var("GEMINI_API_KEY").map_err(|_| {
            GenerationError::EnvironmentError("GEMINI_API_KEY not set".to_string())
        })?;
        let model = env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let base_url = env::var("GEMINI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        Ok(Self::with_api_key(api_key, model).with_base_url(base_url))
    }

    pub fn with_api_key(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Overrides the base URL (for testing with wiremock).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

impl TextGeneration for GeminiService {
    async fn generate_text(&self, prompt: &str) -> Result<String, GenerationError> {
        let request = GenerateContentRequest::from_prompt(prompt);

        debug!("Sending generateContent request to model {}", self.model);

        // No client timeout: a slow generation is still a useful one
        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(GenerationError::UpstreamStatus {
                status: status.as_u16(),
                body,
            });
        }

        let payload: GenerateContentResponse = response.json().await.map_err(|e| {
            GenerationError::UpstreamMalformed(format!("Failed to parse response: {}", e))
        })?;

        payload
            .first_text()
            .filter(|text| !text.trim().is_empty())
            .map(str::to_string)
            .ok_or(GenerationError::UpstreamEmpty)
    }
}
