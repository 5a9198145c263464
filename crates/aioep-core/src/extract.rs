//! Best-effort recovery of a JSON object from raw model output.
//!
//! Completion text is not reliably pure JSON, so extraction is an ordered
//! list of pure strategies; the first success wins. When every strategy
//! fails the original text is wrapped as `{"raw": <text>}`, a sentinel the
//! caller treats as "no usable result", never as an error.

use regex::Regex;
use serde_json::{json, Value};
use std::sync::OnceLock;

static FENCE_RE: OnceLock<Regex> = OnceLock::new();

fn fence_re() -> &'static Regex {
    // Triple-backtick block, optionally tagged `json`, non-greedy interior.
    FENCE_RE.get_or_init(|| Regex::new(r"(?s)```(?:json)?\s*(.*?)\s*```").unwrap())
}

/// Strategy 1: the trimmed text is JSON.
fn parse_direct(raw: &str) -> Option<Value> {
    serde_json::from_str(raw.trim()).ok()
}

/// Strategy 2: the first fenced code block contains JSON.
fn parse_fenced(raw: &str) -> Option<Value> {
    let caps = fence_re().captures(raw)?;
    serde_json::from_str(caps.get(1)?.as_str().trim()).ok()
}

/// Strategy 3: the substring from the first `{` to the last `}` is JSON.
fn parse_braces(raw: &str) -> Option<Value> {
    let first = raw.find('{')?;
    let last = raw.rfind('}')?;
    if last <= first {
        return None;
    }
    serde_json::from_str(&raw[first..=last]).ok()
}

/// Coerce raw completion text into a JSON value.
pub fn extract(raw: &str) -> Value {
    let strategies: [fn(&str) -> Option<Value>; 3] = [parse_direct, parse_fenced, parse_braces];
    for strategy in strategies {
        if let Some(value) = strategy(raw) {
            return value;
        }
    }
    json!({ "raw": raw })
}

/// True when `value` is the extraction-failure sentinel: a `raw` key and no
/// `elements` key.
pub fn is_unparsed(value: &Value) -> bool {
    value.get("raw").is_some() && value.get("elements").is_none()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direct_parse_with_whitespace() {
        let value = extract("  \n {\"a\": 1} \n ");
        assert_eq!(value, json!({"a": 1}));
    }

    #[test]
    fn direct_parse_non_object_values() {
        assert_eq!(extract("[1, 2, 3]"), json!([1, 2, 3]));
        assert_eq!(extract("42"), json!(42));
    }

    #[test]
    fn fenced_block_tagged_json() {
        let value = extract("prefix ```json\n{\"a\":1}\n``` suffix");
        assert_eq!(value, json!({"a": 1}));
    }

    #[test]
    fn fenced_block_untagged() {
        let value = extract("Here you go:\n```\n{\"b\": 2}\n```\nDone.");
        assert_eq!(value, json!({"b": 2}));
    }

    #[test]
    fn brace_span_with_noise() {
        let value = extract("noise { \"a\": 1 } more noise");
        assert_eq!(value, json!({"a": 1}));
    }

    #[test]
    fn broken_fence_falls_through_to_braces() {
        // The fence interior is not valid JSON, but the brace span is.
        let value = extract("```json\nnot json\n```\nbut also { \"a\": 1 } here");
        assert_eq!(value, json!({"a": 1}));
    }

    #[test]
    fn no_json_at_all_yields_raw_sentinel() {
        let text = "I could not produce a model for this input.";
        let value = extract(text);
        assert_eq!(value, json!({"raw": text}));
        assert!(is_unparsed(&value));
    }

    #[test]
    fn braces_in_wrong_order_yield_raw_sentinel() {
        let text = "} backwards {";
        assert_eq!(extract(text), json!({"raw": text}));
    }

    #[test]
    fn extraction_is_idempotent() {
        for text in [
            "{\"a\": 1}",
            "prefix ```json\n{\"a\":1}\n``` suffix",
            "no json here",
        ] {
            assert_eq!(extract(text), extract(text));
        }
    }

    #[test]
    fn unparsed_detection_requires_missing_elements() {
        assert!(is_unparsed(&json!({"raw": "text"})));
        assert!(!is_unparsed(&json!({"raw": "text", "elements": []})));
        assert!(!is_unparsed(&json!({"elements": []})));
    }
}
