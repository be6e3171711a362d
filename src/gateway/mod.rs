//! Text-completion collaborator used for analysis.

use thiserror::Error;

pub mod gemini;
pub mod prompts;

pub use gemini::GeminiGateway;

/// Non-exceptional outcomes of a completion call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    Text(String),
    /// The service refused to answer, e.g. safety filtering.
    Blocked { reason: String },
    Empty,
}

impl Completion {
    /// Flatten into user-facing text; blocked and empty results become an
    /// explanation rather than an error.
    pub fn into_text(self) -> String {
        match self {
            Completion::Text(text) => text,
            Completion::Blocked { reason } => format!(
                "Content generation blocked due to safety settings (Reason: {reason}). \
                 Please refine your query or check the content."
            ),
            Completion::Empty => "Received an empty response from the language model.".to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("API key not configured; set the {0} environment variable")]
    MissingApiKey(String),

    #[error("request failed: {0}")]
    Transport(String),

    #[error("service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed response: {0}")]
    Malformed(String),
}

pub trait AnalysisGateway {
    fn name(&self) -> &'static str;
    fn complete(&self, prompt: &str) -> Result<Completion, GatewayError>;
}
