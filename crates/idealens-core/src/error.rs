//! Centralized error types for IdeaLens.

use thiserror::Error;

/// Main error type for analysis operations.
///
/// Extraction and parsing failures are deliberately absent: the pipeline
/// absorbs them and always produces a complete result. Only configuration
/// and upstream failures can reach a caller.
#[derive(Error, Debug)]
pub enum IdeaLensError {
    #[error("GEMINI_API_KEY environment variable is not set")]
    MissingApiKey,

    #[error("Gemini API error (HTTP {status}): {body}")]
    Upstream { status: u16, body: String },

    #[error("Request to Gemini failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected Gemini response format: {0}")]
    MalformedResponse(String),
}

/// Result type for IdeaLens operations.
pub type IdeaLensResult<T> = Result<T, IdeaLensError>;
