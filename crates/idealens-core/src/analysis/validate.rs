//! Shape enforcement for recovered mappings.

use serde_json::Value;

use super::model::{IdeaAnalysis, DEFAULT_TEXT};
use super::ExtractionCandidate;

/// Normalize any candidate mapping into a complete `IdeaAnalysis`.
///
/// Total: every input, including the empty map, yields a record with all
/// seven fields populated. Missing text fields default to
/// `"Not provided"`, missing lists to empty. Non-array list values are
/// wrapped as a single element; list elements are stringified, trimmed,
/// and dropped when empty. Idempotent over its own output.
pub fn normalize(mut candidate: ExtractionCandidate) -> IdeaAnalysis {
    IdeaAnalysis {
        market_competition: take_text(&mut candidate, "market_competition"),
        monetization_potential: take_text(&mut candidate, "monetization_potential"),
        target_users: take_text(&mut candidate, "target_users"),
        feature_suggestions: take_list(&mut candidate, "feature_suggestions"),
        mvp_plan: take_list(&mut candidate, "mvp_plan"),
        risk_score: take_text(&mut candidate, "risk_score"),
        summary: take_text(&mut candidate, "summary"),
    }
}

fn take_text(candidate: &mut ExtractionCandidate, key: &str) -> String {
    match candidate.remove(key) {
        Some(value) => value_to_string(value),
        None => DEFAULT_TEXT.to_string(),
    }
}

fn take_list(candidate: &mut ExtractionCandidate, key: &str) -> Vec<String> {
    let items = match candidate.remove(key) {
        Some(Value::Array(items)) => items,
        Some(other) => vec![other],
        None => Vec::new(),
    };

    items
        .into_iter()
        .map(|item| value_to_string(item).trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}

/// String form of a JSON value: strings unwrap, everything else renders
/// to compact JSON.
fn value_to_string(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::super::model::EXPECTED_KEYS;
    use super::*;
    use serde_json::json;

    fn candidate_from(value: Value) -> ExtractionCandidate {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_empty_map_gets_all_defaults() {
        let analysis = normalize(ExtractionCandidate::new());
        assert_eq!(analysis.market_competition, DEFAULT_TEXT);
        assert_eq!(analysis.monetization_potential, DEFAULT_TEXT);
        assert_eq!(analysis.target_users, DEFAULT_TEXT);
        assert_eq!(analysis.risk_score, DEFAULT_TEXT);
        assert_eq!(analysis.summary, DEFAULT_TEXT);
        assert!(analysis.feature_suggestions.is_empty());
        assert!(analysis.mvp_plan.is_empty());
    }

    #[test]
    fn test_complete_input_passes_through_unchanged() {
        let analysis = normalize(candidate_from(json!({
            "market_competition": "low",
            "monetization_potential": "ads",
            "target_users": "devs",
            "feature_suggestions": ["a", "b"],
            "mvp_plan": ["step1"],
            "risk_score": "low",
            "summary": "ok"
        })));
        assert_eq!(analysis.market_competition, "low");
        assert_eq!(analysis.monetization_potential, "ads");
        assert_eq!(analysis.target_users, "devs");
        assert_eq!(analysis.feature_suggestions, vec!["a", "b"]);
        assert_eq!(analysis.mvp_plan, vec!["step1"]);
        assert_eq!(analysis.risk_score, "low");
        assert_eq!(analysis.summary, "ok");
    }

    #[test]
    fn test_idempotent_over_own_output() {
        let first = normalize(candidate_from(json!({
            "summary": "Good idea",
            "feature_suggestions": "just one",
            "mvp_plan": ["  step  ", ""]
        })));
        let reserialized = candidate_from(serde_json::to_value(&first).unwrap());
        let second = normalize(reserialized);
        assert_eq!(first, second);
    }

    #[test]
    fn test_output_serializes_to_exactly_the_expected_keys() {
        let analysis = normalize(ExtractionCandidate::new());
        let value = serde_json::to_value(&analysis).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), EXPECTED_KEYS.len());
        for key in EXPECTED_KEYS {
            assert!(object.contains_key(key));
        }
    }

    #[test]
    fn test_scalar_list_value_wrapped() {
        let analysis = normalize(candidate_from(json!({
            "feature_suggestions": "offline mode",
            "mvp_plan": 3
        })));
        assert_eq!(analysis.feature_suggestions, vec!["offline mode"]);
        assert_eq!(analysis.mvp_plan, vec!["3"]);
    }

    #[test]
    fn test_list_elements_stringified_trimmed_and_filtered() {
        let analysis = normalize(candidate_from(json!({
            "mvp_plan": ["  build core  ", "", "   ", 42, true]
        })));
        assert_eq!(analysis.mvp_plan, vec!["build core", "42", "true"]);
    }

    #[test]
    fn test_non_string_text_value_rendered_as_json() {
        let analysis = normalize(candidate_from(json!({
            "risk_score": 7,
            "summary": {"nested": "object"}
        })));
        assert_eq!(analysis.risk_score, "7");
        assert_eq!(analysis.summary, r#"{"nested":"object"}"#);
    }

    #[test]
    fn test_unknown_keys_are_discarded() {
        let analysis = normalize(candidate_from(json!({
            "summary": "ok",
            "confidence": 0.9,
            "extra": "ignored"
        })));
        assert_eq!(analysis.summary, "ok");
        let value = serde_json::to_value(&analysis).unwrap();
        assert!(value.get("confidence").is_none());
        assert!(value.get("extra").is_none());
    }
}
