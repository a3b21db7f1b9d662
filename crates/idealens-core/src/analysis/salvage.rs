//! Last-resort field scraping for near-JSON model output.
//!
//! Runs only after every extraction strategy failed. Scans the raw text
//! for the literal `"key":` markers of the expected fields and scrapes
//! whatever sits between them. Total by construction: adversarial or
//! truncated input yields a partial or empty mapping, never an error.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use super::model::{is_list_key, EXPECTED_KEYS};
use super::ExtractionCandidate;

/// `"<key>":` markers, one per expected key, in declaration order.
static KEY_MARKERS: Lazy<Vec<Regex>> = Lazy::new(|| {
    EXPECTED_KEYS
        .iter()
        .map(|key| {
            Regex::new(&format!(r#""{}"\s*:"#, regex::escape(key))).expect("key marker regex")
        })
        .collect()
});

/// `,? "<key>":` markers used to find where the next field begins.
static NEXT_MARKERS: Lazy<Vec<Regex>> = Lazy::new(|| {
    EXPECTED_KEYS
        .iter()
        .map(|key| {
            Regex::new(&format!(r#",?\s*"{}"\s*:"#, regex::escape(key))).expect("next marker regex")
        })
        .collect()
});

static ARRAY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\[(.*?)]").expect("array regex"));
static ITEM_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r#""([^"\n]+)""#).expect("item regex"));
static QUOTED_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^"((?:[^"\\]|\\.)*)""#).expect("quoted value regex"));
static SPLIT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\n;]+").expect("list split regex"));

/// Scrape whatever expected fields can be recognized in `text`.
///
/// Field boundaries assume the keys appear in declaration order: each
/// value span ends at the first marker of a *later* key. Model output
/// with reordered keys salvages fewer (or messier) fields rather than
/// failing; that limitation is accepted.
pub fn salvage_fields(text: &str) -> ExtractionCandidate {
    let mut result = ExtractionCandidate::new();
    if text.is_empty() {
        return result;
    }

    for (idx, key) in EXPECTED_KEYS.iter().enumerate() {
        let Some(marker) = KEY_MARKERS[idx].find(text) else {
            continue;
        };
        let start = marker.end();

        let mut end = text.len();
        for next_idx in idx + 1..EXPECTED_KEYS.len() {
            if let Some(next) = NEXT_MARKERS[next_idx].find(&text[start..]) {
                end = start + next.start();
                break;
            }
        }

        let raw_value = text[start..end].trim().trim_end_matches(',').trim();
        if raw_value.is_empty() {
            continue;
        }

        let value = if is_list_key(key) {
            Value::Array(salvage_list(raw_value))
        } else {
            Value::String(salvage_text(raw_value))
        };
        result.insert((*key).to_string(), value);
    }

    result
}

/// Pull list items out of a raw value span.
///
/// Prefers double-quoted items inside a bracketed region; falls back to
/// splitting on newlines/semicolons and trimming bullet markers.
fn salvage_list(raw: &str) -> Vec<Value> {
    let inside = ARRAY_RE
        .captures(raw)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .unwrap_or(raw);

    let mut items: Vec<String> = ITEM_RE
        .captures_iter(inside)
        .map(|caps| caps[1].to_string())
        .collect();

    if items.is_empty() {
        items = SPLIT_RE
            .split(inside)
            .map(trim_list_markers)
            .filter(|piece| !piece.is_empty())
            .map(str::to_string)
            .collect();
    }

    items.into_iter().map(Value::String).collect()
}

fn trim_list_markers(piece: &str) -> &str {
    piece.trim_matches(|c: char| matches!(c, ' ' | '-' | '•' | '\t' | '\r' | '\n'))
}

/// Unwrap a leading double-quoted value if present, unescaping `\"`.
fn salvage_text(raw: &str) -> String {
    let unwrapped = QUOTED_RE
        .captures(raw)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .unwrap_or(raw);
    unwrapped.replace("\\\"", "\"").trim().to_string()
}
