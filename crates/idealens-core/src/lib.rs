//! IdeaLens Core Library
//!
//! Analysis pipeline and Gemini client for the IdeaLens project-idea
//! analyzer: tolerant JSON extraction, field salvage, normalization, and
//! the retry orchestration around the upstream call.

pub mod analysis;
pub mod error;
pub mod gemini;

pub use error::{IdeaLensError, IdeaLensResult};
