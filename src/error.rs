use reqwest::StatusCode;
use thiserror::Error;

/// Failures from a completion exchange.
///
/// Every variant is absorbed at the app boundary and becomes a fallback chat
/// message; nothing here ever crosses into a global handler.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("Gemini API key not configured. Set GEMINI_API_KEY or add api_key to the config file.")]
    MissingKey,

    #[error("Gemini API error {status}: {message}")]
    Api { status: StatusCode, message: String },

    #[error("unexpected response shape from the Gemini API")]
    Format,

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
}
