//! Idea analysis route handler.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};

use idealens_core::analysis::model::IdeaAnalysis;
use idealens_core::IdeaLensError;

use crate::state::AppState;

#[derive(Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub idea: String,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// `POST /api/analyze` — analyze a project idea.
///
/// A missing or unreadable body is treated like an empty idea. Parsing
/// problems in the model output never surface here; only upstream and
/// configuration failures map to error responses.
pub async fn analyze(
    State(state): State<AppState>,
    payload: Option<Json<AnalyzeRequest>>,
) -> Result<Json<IdeaAnalysis>, (StatusCode, Json<ErrorResponse>)> {
    let idea = payload.map(|Json(req)| req.idea).unwrap_or_default();
    let idea = idea.trim();
    if idea.is_empty() {
        return Err(reject(
            StatusCode::BAD_REQUEST,
            "Please enter a project idea.".to_string(),
        ));
    }

    match idealens_core::analysis::analyze_idea(&state.client, idea).await {
        Ok(analysis) => Ok(Json(analysis)),
        Err(IdeaLensError::Upstream { status, body }) => Err(reject(
            StatusCode::BAD_GATEWAY,
            format!("Gemini API error (HTTP {}): {}", status, body),
        )),
        Err(IdeaLensError::MalformedResponse(_)) => Err(reject(
            StatusCode::BAD_GATEWAY,
            "Model response was malformed. Please try again.".to_string(),
        )),
        Err(err) => {
            tracing::error!(error = %err, "Analysis failed");
            Err(reject(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Unexpected server error. Check server logs.".to_string(),
            ))
        }
    }
}

fn reject(status: StatusCode, message: String) -> (StatusCode, Json<ErrorResponse>) {
    (status, Json(ErrorResponse { error: message }))
}
