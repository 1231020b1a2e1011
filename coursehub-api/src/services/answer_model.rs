//! Language model seam
//!
//! Handlers only see [`AnswerModel`]; the Gemini client is one
//! implementation and tests plug in stubs.

use async_trait::async_trait;
use thiserror::Error;

/// Answer generation errors
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Rejected credentials: {0}")]
    Unauthorized(String),

    #[error("Quota exceeded")]
    QuotaExceeded,

    #[error("API error {0}: {1}")]
    ApiError(u16, String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Empty response")]
    EmptyResponse,
}

/// A hosted model that completes a prompt
#[async_trait]
pub trait AnswerModel: Send + Sync {
    /// Model identifier for logs
    fn model_name(&self) -> &str;

    /// Generate a completion for `prompt`
    async fn generate(&self, prompt: &str) -> Result<String, ModelError>;
}
