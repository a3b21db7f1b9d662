//! Tolerant JSON extraction from model output.
//!
//! Models asked for JSON still return prose, markdown fences, single-quoted
//! pseudo-JSON, or objects truncated by the token limit. The extractor runs
//! a fixed sequence of strategies and returns the first mapping any of them
//! yields; exhaustion is an explicit error, never a panic.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use thiserror::Error;

use super::ExtractionCandidate;

/// How much of the offending text to carry in the failure diagnostic.
const PREVIEW_LEN: usize = 220;

/// No strategy could recover a JSON object from the text.
#[derive(Debug, Error)]
#[error("no valid JSON object found in model response; raw output starts with: {preview:?}")]
pub struct ExtractError {
    preview: String,
}

static FENCE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)```(?:json)?\s*(.*?)\s*```").expect("fence regex"));

/// Extract a JSON object from model output with tolerant fallbacks.
///
/// Strategies, in order: direct parse, repair-then-parse, fenced code
/// block, balanced-brace scan (with a permissive single-quote-dialect
/// retry on the scanned slice).
pub fn extract_object(text: &str) -> Result<ExtractionCandidate, ExtractError> {
    let trimmed = text.trim();

    if let Some(map) = parse_object(trimmed) {
        return Ok(map);
    }
    if let Some(map) = parse_object(&repair(trimmed)) {
        return Ok(map);
    }
    if let Some(map) = fenced_block(trimmed) {
        return Ok(map);
    }
    if let Some(map) = balanced_braces(trimmed) {
        return Ok(map);
    }

    Err(ExtractError {
        preview: preview(trimmed),
    })
}

/// Parse the whole string as a JSON object literal.
fn parse_object(text: &str) -> Option<ExtractionCandidate> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

/// Parse the interior of the first fenced code block: ```json { ... } ```
fn fenced_block(text: &str) -> Option<ExtractionCandidate> {
    let caps = FENCE_RE.captures(text)?;
    parse_object(caps.get(1)?.as_str().trim())
}

/// Take the first balanced `{...}` region from noisy text and parse it.
///
/// Depth counting is naive: braces inside string values miscount. The
/// repair strategy already handled well-formed strings, so this stays
/// faithful to a simple forward scan.
fn balanced_braces(text: &str) -> Option<ExtractionCandidate> {
    let start = text.find('{')?;
    let tail = &text[start..];

    let mut depth = 0i32;
    let mut end = None;
    for (i, ch) in tail.char_indices() {
        match ch {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    end = Some(start + i);
                    break;
                }
            }
            _ => {}
        }
    }

    let candidate = &text[start..=end?];
    // Last resort for Python-style dict output with single quotes.
    parse_object(candidate).or_else(|| parse_object(&normalize_quotes(candidate)))
}

/// Generic repair pass for malformed model JSON.
///
/// Strips markdown fences and leading prose, rewrites single-quoted
/// strings, drops trailing commas, and closes strings, braces, and
/// brackets lost to token-limit truncation. The result is a best-effort
/// candidate for parsing, not guaranteed valid.
fn repair(text: &str) -> String {
    let stripped = strip_fences(text);
    let body = match stripped.find('{') {
        Some(i) => &stripped[i..],
        None => stripped,
    };
    let normalized = normalize_quotes(body);

    let chars: Vec<char> = normalized.chars().collect();
    let mut out = String::with_capacity(normalized.len() + 4);
    let mut stack: Vec<char> = Vec::new();
    let mut in_string = false;
    let mut escaped = false;
    let mut i = 0;
    while i < chars.len() {
        let ch = chars[i];
        if in_string {
            out.push(ch);
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            i += 1;
            continue;
        }
        match ch {
            '"' => {
                in_string = true;
                out.push(ch);
            }
            '{' => {
                stack.push('}');
                out.push(ch);
            }
            '[' => {
                stack.push(']');
                out.push(ch);
            }
            '}' | ']' => {
                // closers that never opened are dropped
                if stack.last() == Some(&ch) {
                    stack.pop();
                    out.push(ch);
                }
            }
            ',' => {
                let mut j = i + 1;
                while j < chars.len() && chars[j].is_whitespace() {
                    j += 1;
                }
                if !matches!(chars.get(j), None | Some('}') | Some(']')) {
                    out.push(ch);
                }
            }
            _ => out.push(ch),
        }
        i += 1;
    }

    if in_string {
        if escaped {
            out.pop();
        }
        out.push('"');
    }
    let mut out = out.trim_end().to_string();
    if out.ends_with(',') {
        out.pop();
    } else if out.ends_with(':') {
        // truncation right after a key
        out.push_str(" null");
    }
    for close in stack.into_iter().rev() {
        out.push(close);
    }
    out
}

/// Strip a leading/trailing markdown fence when the whole text is fenced.
fn strip_fences(text: &str) -> &str {
    let trimmed = text.trim();
    if let Some(rest) = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
    {
        return rest.trim_end_matches("```").trim();
    }
    trimmed
}

/// Rewrite a Python-dict-like literal into JSON string syntax:
/// single-quoted strings become double-quoted, inner double quotes get
/// escaped, `\'` unescapes to a plain apostrophe.
fn normalize_quotes(text: &str) -> String {
    enum Ctx {
        Plain,
        Single,
        Double,
    }

    let mut out = String::with_capacity(text.len() + 8);
    let mut chars = text.chars();
    let mut ctx = Ctx::Plain;
    while let Some(ch) = chars.next() {
        match ctx {
            Ctx::Plain => match ch {
                '\'' => {
                    out.push('"');
                    ctx = Ctx::Single;
                }
                '"' => {
                    out.push('"');
                    ctx = Ctx::Double;
                }
                _ => out.push(ch),
            },
            Ctx::Single => match ch {
                '\\' => match chars.next() {
                    Some('\'') => out.push('\''),
                    Some(next) => {
                        out.push('\\');
                        out.push(next);
                    }
                    None => {}
                },
                '\'' => {
                    out.push('"');
                    ctx = Ctx::Plain;
                }
                '"' => out.push_str("\\\""),
                _ => out.push(ch),
            },
            Ctx::Double => match ch {
                '\\' => {
                    out.push('\\');
                    if let Some(next) = chars.next() {
                        out.push(next);
                    }
                }
                '"' => {
                    out.push('"');
                    ctx = Ctx::Plain;
                }
                _ => out.push(ch),
            },
        }
    }
    out
}

/// First `PREVIEW_LEN` bytes of the text, backed off to a char boundary.
fn preview(text: &str) -> String {
    if text.len() <= PREVIEW_LEN {
        return text.to_string();
    }
    let mut end = PREVIEW_LEN;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    text[..end].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_OBJECT: &str = r#"{"market_competition":"low","monetization_potential":"ads","target_users":"devs","feature_suggestions":["a","b"],"mvp_plan":["step1"],"risk_score":"low","summary":"ok"}"#;

    #[test]
    fn test_direct_parse_recovers_exact_object() {
        let map = extract_object(FULL_OBJECT).unwrap();
        assert_eq!(map.len(), 7);
        assert_eq!(map["summary"], "ok");
        assert_eq!(map["feature_suggestions"], serde_json::json!(["a", "b"]));
        assert_eq!(map["mvp_plan"], serde_json::json!(["step1"]));
    }

    #[test]
    fn test_fenced_block_with_leading_prose() {
        let text = format!(
            "Here is the analysis you asked for:\n```json\n{}\n```",
            FULL_OBJECT
        );
        let fenced = extract_object(&text).unwrap();
        let direct = extract_object(FULL_OBJECT).unwrap();
        assert_eq!(fenced, direct);
    }

    #[test]
    fn test_fence_without_language_tag() {
        let text = format!("```\n{}\n```", FULL_OBJECT);
        let map = extract_object(&text).unwrap();
        assert_eq!(map.len(), 7);
    }

    #[test]
    fn test_brace_scan_with_surrounding_prose() {
        let text = r#"Here is the result: {"summary": "Good idea", "risk_score": "medium"} extra trailing text"#;
        let map = extract_object(text).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map["summary"], "Good idea");
        assert_eq!(map["risk_score"], "medium");
    }

    #[test]
    fn test_brace_scan_handles_nesting() {
        let text = r#"prose {"a": {"b": "c"}, "d": "e"} more prose"#;
        let map = extract_object(text).unwrap();
        assert_eq!(map["a"]["b"], "c");
        assert_eq!(map["d"], "e");
    }

    #[test]
    fn test_repair_drops_trailing_comma() {
        let text = r#"{"summary": "ok", "risk_score": "low",}"#;
        let map = extract_object(text).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map["risk_score"], "low");
    }

    #[test]
    fn test_repair_single_quoted_object() {
        let text = "{'summary': 'ok', 'risk_score': 'low'}";
        let map = extract_object(text).unwrap();
        assert_eq!(map["summary"], "ok");
        assert_eq!(map["risk_score"], "low");
    }

    #[test]
    fn test_repair_truncated_string_and_brace() {
        let text = r#"{"summary": "cut off mid senten"#;
        let map = extract_object(text).unwrap();
        assert_eq!(map["summary"], "cut off mid senten");
    }

    #[test]
    fn test_repair_truncated_array() {
        let text = r#"{"feature_suggestions": ["a", "b"#;
        let map = extract_object(text).unwrap();
        assert_eq!(map["feature_suggestions"], serde_json::json!(["a", "b"]));
    }

    #[test]
    fn test_single_quote_dialect_inside_prose() {
        let text = "Result: {'summary': 'ok'} trailing words";
        let map = extract_object(text).unwrap();
        assert_eq!(map["summary"], "ok");
    }

    #[test]
    fn test_escaped_apostrophe_in_single_quotes() {
        let text = r"{'summary': 'it\'s fine'}";
        let map = extract_object(text).unwrap();
        assert_eq!(map["summary"], "it's fine");
    }

    #[test]
    fn test_failure_carries_bounded_preview() {
        let text = "no json here ".repeat(50);
        let err = extract_object(&text).unwrap_err();
        assert!(err.preview.len() <= PREVIEW_LEN);
        assert!(err.to_string().contains("no json here"));
    }

    #[test]
    fn test_failure_preview_respects_char_boundaries() {
        let text = "é".repeat(300);
        let err = extract_object(&text).unwrap_err();
        assert!(err.preview.len() <= PREVIEW_LEN);
        assert!(err.preview.chars().all(|c| c == 'é'));
    }

    #[test]
    fn test_empty_input_fails() {
        assert!(extract_object("").is_err());
        assert!(extract_object("   \n\t").is_err());
    }

    #[test]
    fn test_top_level_array_is_not_an_object() {
        assert!(extract_object("[1, 2, 3]").is_err());
    }

    #[test]
    fn test_unbalanced_closers_do_not_panic() {
        assert!(extract_object("}}}}").is_err());
        assert!(extract_object("]]{[").is_err());
    }
}
