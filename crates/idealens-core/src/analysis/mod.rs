//! Project idea analysis.
//!
//! Drives the Gemini call and the extraction → salvage → validation
//! pipeline. Parsing failures never escape this module: the pipeline
//! either recovers a mapping from the model output or falls back to a
//! fully-defaulted placeholder result.

pub mod extract;
pub mod model;
pub mod salvage;
pub mod validate;

use tracing::{debug, warn};

use crate::error::{IdeaLensError, IdeaLensResult};
use crate::gemini::{GeminiClient, GenerationParams};
use model::IdeaAnalysis;

/// Untyped mapping recovered from model output, before validation.
///
/// May be incomplete, wrong-typed, or empty; `validate::normalize` turns
/// any of these into a complete `IdeaAnalysis`.
pub type ExtractionCandidate = serde_json::Map<String, serde_json::Value>;

/// Analyze a project idea, retrying once on unusable output.
///
/// The caller is responsible for rejecting empty ideas. Upstream and
/// transport failures on the first attempt are absorbed by the retry; on
/// the second attempt they propagate. A malformed Gemini response
/// propagates immediately on either attempt.
pub async fn analyze_idea(client: &GeminiClient, idea: &str) -> IdeaLensResult<IdeaAnalysis> {
    let first = match client
        .generate(
            &first_prompt(idea),
            GenerationParams {
                temperature: 0.35,
                max_output_tokens: 1400,
            },
        )
        .await
    {
        Ok(output) => {
            if let Some(candidate) = recover_candidate(&output.text) {
                return Ok(validate::normalize(candidate));
            }
            Some(output)
        }
        Err(err @ IdeaLensError::MalformedResponse(_)) => return Err(err),
        Err(err) => {
            warn!(error = %err, "First Gemini attempt failed, retrying");
            None
        }
    };

    // Retry once with tighter length constraints and lower randomness.
    let output = client
        .generate(
            &retry_prompt(idea),
            GenerationParams {
                temperature: 0.2,
                max_output_tokens: 1800,
            },
        )
        .await?;
    if let Some(candidate) = recover_candidate(&output.text) {
        return Ok(validate::normalize(candidate));
    }

    warn!("Both Gemini attempts were unusable, returning placeholder");
    let first_reason = first
        .as_ref()
        .map(|o| o.finish_reason.as_str())
        .unwrap_or("");
    Ok(validate::normalize(placeholder(
        first_reason,
        &output.finish_reason,
    )))
}

/// Extractor → salvager chain. `None` when not a single field could be
/// recovered.
fn recover_candidate(text: &str) -> Option<ExtractionCandidate> {
    let candidate = match extract::extract_object(text) {
        Ok(candidate) => candidate,
        Err(err) => {
            debug!(error = %err, "Extraction failed, salvaging field by field");
            salvage::salvage_fields(text)
        }
    };
    if candidate.is_empty() {
        None
    } else {
        Some(candidate)
    }
}

/// Prompt for the first attempt.
fn first_prompt(idea: &str) -> String {
    format!(
        "You are a practical startup advisor for solo developers. \
         Analyze the project idea and keep answers concise and concrete. \
         Project idea:\n{idea}"
    )
}

/// Prompt for the retry: same analysis, tighter length constraints.
fn retry_prompt(idea: &str) -> String {
    format!(
        "Retry the same analysis. \
         Keep each paragraph under 40 words and arrays short.\
         \n\nProject idea:\n{idea}"
    )
}

/// Candidate for the all-defaults fallback result; the summary reports why
/// both attempts were unusable.
fn placeholder(first_reason: &str, second_reason: &str) -> ExtractionCandidate {
    let summary = format!(
        "The model response was unusable. finishReason(s): {}, {}.",
        reason_or_unknown(first_reason),
        reason_or_unknown(second_reason),
    );
    let mut candidate = ExtractionCandidate::new();
    candidate.insert("summary".to_string(), serde_json::Value::String(summary));
    candidate
}

fn reason_or_unknown(reason: &str) -> &str {
    if reason.is_empty() {
        "unknown"
    } else {
        reason
    }
}
