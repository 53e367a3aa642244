pub mod adapter;
pub mod gemini;

use std::fmt;

use async_trait::async_trait;

use crate::errors::PortalError;

pub use adapter::{AiAction, AiAdapter, RequestPhase, RequestTracker, SemanticMatch};

#[derive(Debug, Clone, PartialEq)]
pub enum AiError {
    NotConfigured,
    Transport(String),
    InvalidResponse(String),
    InFlight(String),
}

impl fmt::Display for AiError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AiError::NotConfigured => write!(f, "AI service is not configured"),
            AiError::Transport(msg) => write!(f, "AI transport error: {}", msg),
            AiError::InvalidResponse(msg) => write!(f, "AI response error: {}", msg),
            AiError::InFlight(msg) => write!(f, "AI request already in flight: {}", msg),
        }
    }
}

impl std::error::Error for AiError {}

impl From<AiError> for PortalError {
    fn from(err: AiError) -> Self {
        match err {
            AiError::InFlight(_) => PortalError::Conflict(err.to_string()),
            _ => PortalError::InternalError(err.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerateRequest {
    pub prompt: String,
    /// Ask the model for a JSON document instead of prose.
    pub json: bool,
}

/// Remote text generation. `Ok(None)` means the model answered without text.
#[async_trait]
pub trait GenerativeClient: Send + Sync {
    async fn generate(&self, request: GenerateRequest) -> Result<Option<String>, AiError>;
}
