use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// Body of a `generateContent` call.
#[derive(Debug, Serialize)]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
}

impl GenerateContentRequest {
    pub fn from_prompt(prompt: &str) -> Self {
        Self {
            contents: vec![Content {
                role: None,
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                }],
            }],
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
}

#[derive(Debug, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    /// `candidates[0].content.parts[0].text`, if the model produced one.
    pub fn first_text(&self) -> Option<&str> {
        self.candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .first()?
            .text
            .as_deref()
    }
}

#[derive(Debug)]
pub enum GenerationError {
    InvalidRequest(String),
    Unauthenticated,
    EnvironmentError(String),
    HttpError(reqwest::Error),
    UpstreamStatus { status: u16, body: String },
    UpstreamEmpty,
    UpstreamMalformed(String),
    ExhaustedRetries {
        attempts: u32,
        last: Box<GenerationError>,
    },
    PersistenceFailure(String),
}

impl GenerationError {
    /// Failures caused by the upstream model or the network; another attempt may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            GenerationError::HttpError(_)
                | GenerationError::UpstreamStatus { .. }
                | GenerationError::UpstreamEmpty
                | GenerationError::UpstreamMalformed(_)
        )
    }
}

impl fmt::Display for GenerationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationError::InvalidRequest(msg) => write!(f, "Invalid trip request: {}", msg),
            GenerationError::Unauthenticated => write!(f, "User not authenticated"),
            GenerationError::EnvironmentError(msg) => write!(f, "Environment error: {}", msg),
            GenerationError::HttpError(err) => write!(f, "HTTP error: {}", err),
            GenerationError::UpstreamStatus { status, body } => {
                write!(f, "Generation request failed with status {}: {}", status, body)
            }
            GenerationError::UpstreamEmpty => write!(f, "Empty response from generation API"),
            GenerationError::UpstreamMalformed(msg) => {
                write!(f, "Invalid trip data received: {}", msg)
            }
            GenerationError::ExhaustedRetries { attempts, last } => {
                write!(f, "Trip generation failed after {} attempts: {}", attempts, last)
            }
            GenerationError::PersistenceFailure(msg) => write!(f, "Failed to save trip: {}", msg),
        }
    }
}

impl Error for GenerationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            GenerationError::HttpError(err) => Some(err),
            GenerationError::ExhaustedRetries { last, .. } => Some(last.as_ref()),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for GenerationError {
    fn from(err: reqwest::Error) -> Self {
        GenerationError::HttpError(err)
    }
}
