use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImaginaError {
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Request error: {0}")]
    RequestError(String),
    #[error("Response error: {0}")]
    ResponseError(String),
    #[error("Serialization error: {0}")]
    SerializationError(String),
    #[error("Insufficient credits: {required} required, {available} available")]
    InsufficientCredits { required: u32, available: u32 },
    #[error("Generation failed: {0}")]
    GenerationFailure(String),
    #[error("Generation timed out after {}s", .0.as_secs())]
    Timeout(Duration),
    #[error("A generation request is already in progress")]
    Busy,
    #[error("Prompt must not be empty")]
    EmptyPrompt,
    #[error("Unknown credit package: {0}")]
    UnknownPackage(String),
    #[error("Unknown image: {0}")]
    UnknownImage(String),
    #[error("Page {requested} is out of range (1..={total})")]
    PageOutOfRange { requested: usize, total: usize },
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ImaginaError {
    /// Errors raised by the external generator, including timeouts.
    pub fn is_generation_failure(&self) -> bool {
        matches!(
            self,
            ImaginaError::GenerationFailure(_)
                | ImaginaError::Timeout(_)
                | ImaginaError::RequestError(_)
                | ImaginaError::ResponseError(_)
        )
    }
}

impl From<reqwest::Error> for ImaginaError {
    fn from(err: reqwest::Error) -> Self {
        ImaginaError::RequestError(err.to_string())
    }
}

impl From<serde_json::Error> for ImaginaError {
    fn from(err: serde_json::Error) -> Self {
        ImaginaError::SerializationError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ImaginaError>;
