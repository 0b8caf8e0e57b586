//! Recover a key/value object from free-text LLM output
//!
//! Models are asked for one JSON object but regularly wrap it in prose or
//! markdown, quote it with apostrophes, or leave trailing commas. [`parse`]
//! repairs what it can and never fails; the worst case is an empty map.

use regex::Regex;
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::sync::LazyLock;
use tracing::{debug, warn};

/// Outermost `{...}` span, greedy across lines
static OBJECT_SPAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\{.*\}").expect("object span pattern is valid"));

static TRAILING_COMMA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",\s*([}\]])").expect("trailing comma pattern is valid"));

/// `"key": "value"` pairs, for output that is not valid JSON
static QUOTED_PAIR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""([^"]+)"\s*:\s*"([^"]*)""#).expect("quoted pair pattern is valid")
});

/// Parse LLM output into a JSON object, best effort
///
/// # Examples
///
/// ```
/// use invoicer_extractor::parser::parse;
///
/// let map = parse("Sure! {'Invoice no.': '4521', 'Total': '10',}");
/// assert_eq!(map["Invoice no."], "4521");
/// assert!(parse("no json here").is_empty());
/// ```
pub fn parse(raw: &str) -> Map<String, Value> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Map::new();
    }

    let span = OBJECT_SPAN
        .find(trimmed)
        .map_or(trimmed, |m| m.as_str());

    let quoted: Cow<'_, str> = if span.contains('\'') && !span.contains('"') {
        Cow::Owned(span.replace('\'', "\""))
    } else {
        Cow::Borrowed(span)
    };

    let cleaned = TRAILING_COMMA.replace_all(&quoted, "${1}");

    match serde_json::from_str::<Value>(&cleaned) {
        Ok(Value::Object(map)) => map,
        Ok(other) => {
            debug!(kind = json_kind(&other), "Model output is JSON but not an object");
            Map::new()
        }
        Err(e) => {
            let map = scan_pairs(&cleaned);
            warn!(
                error = %e,
                recovered = map.len(),
                "Model output is not valid JSON, scanned for quoted pairs"
            );
            map
        }
    }
}

/// Collect every `"key": "value"` pair; later keys overwrite earlier ones
fn scan_pairs(text: &str) -> Map<String, Value> {
    QUOTED_PAIR
        .captures_iter(text)
        .map(|caps| (caps[1].to_string(), Value::String(caps[2].to_string())))
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
