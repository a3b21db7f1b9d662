//! Analysis result schema.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// The seven fields every analysis must contain, in declaration order.
///
/// The salvager's span-splitting and the validator's completeness check
/// both iterate this list, so the order here is the single source of
/// truth for field order.
pub const EXPECTED_KEYS: [&str; 7] = [
    "market_competition",
    "monetization_potential",
    "target_users",
    "feature_suggestions",
    "mvp_plan",
    "risk_score",
    "summary",
];

/// Default text for string fields the model did not provide.
pub const DEFAULT_TEXT: &str = "Not provided";

/// Whether a field holds a list of strings rather than free text.
pub fn is_list_key(key: &str) -> bool {
    matches!(key, "feature_suggestions" | "mvp_plan")
}

/// A structured business analysis of one project idea.
///
/// Built fresh per request and never mutated after being handed to the
/// caller. Serialization emits exactly the seven expected keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdeaAnalysis {
    pub market_competition: String,
    pub monetization_potential: String,
    pub target_users: String,
    pub feature_suggestions: Vec<String>,
    pub mvp_plan: Vec<String>,
    pub risk_score: String,
    pub summary: String,
}

/// JSON schema sent to Gemini for schema-constrained generation.
///
/// Best-effort: the model is asked to conform, the pipeline still treats
/// the output as untrusted text.
pub fn response_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "market_competition": {"type": "string"},
            "monetization_potential": {"type": "string"},
            "target_users": {"type": "string"},
            "feature_suggestions": {"type": "array", "items": {"type": "string"}},
            "mvp_plan": {"type": "array", "items": {"type": "string"}},
            "risk_score": {"type": "string"},
            "summary": {"type": "string"}
        },
        "required": EXPECTED_KEYS,
        "additionalProperties": false
    })
}
