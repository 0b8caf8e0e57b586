//! Map parsed model output onto the canonical invoice record
//!
//! Pure functions, no I/O. Every output record carries all ten fields as
//! strings, and normalizing an already normalized record changes nothing.

use invoicer_domain::{CanonicalRecord, Field, FieldKind};
use serde_json::{Map, Value};

/// Normalize a parsed object into a canonical record
///
/// Keys are resolved through [`Field::from_alias`]; unknown keys are
/// ignored. When a response carries both a field's canonical name and a
/// synonym, the canonical entry wins. Among synonyms the first non-empty
/// one in response order wins.
pub fn normalize(map: &Map<String, Value>) -> CanonicalRecord {
    let mut record = CanonicalRecord::new();
    let mut from_canonical = [false; Field::ALL.len()];

    for (key, value) in map {
        let Some((field, canonical)) = Field::from_alias(key) else {
            continue;
        };
        if from_canonical[field.index()] && !canonical {
            continue;
        }
        if !canonical && !record.get(field).is_empty() {
            // First synonym wins among synonyms
            continue;
        }

        record.set(field, normalize_field(field, value));
        from_canonical[field.index()] |= canonical;
    }

    record
}

/// Normalize any JSON value; non-objects give the all-empty record
pub fn normalize_value(value: &Value) -> CanonicalRecord {
    match value {
        Value::Object(map) => normalize(map),
        _ => CanonicalRecord::new(),
    }
}

/// Coerce one value according to the field's kind
pub fn normalize_field(field: Field, value: &Value) -> String {
    let text = value_to_text(value);
    match field.kind() {
        FieldKind::Money => normalize_money(&text),
        FieldKind::Phone => normalize_phone(&text),
        FieldKind::Text if field == Field::Address => collapse_whitespace(&text),
        FieldKind::Text => text,
    }
}

/// Trimmed string form of a JSON value
fn value_to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.trim().to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items
            .iter()
            .map(value_to_text)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("; "),
        Value::Object(_) => value.to_string(),
    }
}

/// Reduce a monetary value to digits, one optional `.` and `-`
///
/// Decimal commas are converted: `"R$ 1.500,00"` becomes `"1500.00"`.
///
/// ```
/// use invoicer_extractor::normalizer::normalize_money;
///
/// assert_eq!(normalize_money("R$ 1.500,00"), "1500.00");
/// assert_eq!(normalize_money("$1,234.56"), "1234.56");
/// assert_eq!(normalize_money("€ 12,5"), "12.5");
/// ```
pub fn normalize_money(raw: &str) -> String {
    let kept: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, ',' | '.' | '-'))
        .collect();

    let last_comma = kept.rfind(',');
    let last_dot = kept.rfind('.');

    let decimal_at = match (last_comma, last_dot) {
        (Some(comma), Some(dot)) => Some(comma.max(dot)),
        (Some(comma), None) => {
            let fraction = &kept[comma + 1..];
            let single = kept.matches(',').count() == 1;
            let is_decimal = single
                && (1..=2).contains(&fraction.len())
                && fraction.bytes().all(|b| b.is_ascii_digit());
            is_decimal.then_some(comma)
        }
        (None, Some(dot)) => {
            let fraction = &kept[dot + 1..];
            let several = kept.matches('.').count() > 1;
            if several && fraction.len() == 3 {
                None
            } else {
                Some(dot)
            }
        }
        (None, None) => None,
    };

    kept.char_indices()
        .filter_map(|(i, c)| match c {
            ',' | '.' if Some(i) == decimal_at => Some('.'),
            ',' | '.' => None,
            other => Some(other),
        })
        .collect()
}

/// Keep digits only
pub fn normalize_phone(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

fn collapse_whitespace(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}
