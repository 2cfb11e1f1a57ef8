//! Lookup helpers for the upstream's irregular, bilingual element names.
//!
//! Every logical field is described by an ordered list of candidate keys
//! (native Korean first, romanized/English after). The first key that is
//! present with usable text wins.

use serde_json::{Map, Value};

/// Ordered candidate keys for one logical field
pub type Candidates = &'static [&'static str];

/// Return the first candidate value that is present and not null
pub fn first_value<'a>(obj: &'a Map<String, Value>, keys: Candidates) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| obj.get(*key))
        .find(|value| !value.is_null())
}

/// Return the first candidate that yields non-blank text
pub fn first_text(obj: &Map<String, Value>, keys: Candidates) -> Option<String> {
    keys.iter()
        .filter_map(|key| obj.get(*key))
        .filter_map(text_of)
        .find(|text| !text.trim().is_empty())
}

/// Same as [`first_text`] but defaults to an empty string
pub fn text_or_empty(obj: &Map<String, Value>, keys: Candidates) -> String {
    first_text(obj, keys).unwrap_or_default()
}

/// Coerce a text-like node into a string.
///
/// Strings and numbers are taken as-is, arrays are joined line by line and
/// objects are read through their `content` member.
pub fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(items) => {
            let lines: Vec<String> = items
                .iter()
                .filter_map(text_of)
                .filter(|line| !line.trim().is_empty())
                .collect();
            if lines.is_empty() {
                None
            } else {
                Some(lines.join("\n"))
            }
        }
        Value::Object(obj) => obj.get("content").and_then(text_of),
        _ => None,
    }
}

/// Treat a node that can be a single object or an array of objects as a list
pub fn one_or_many(value: Option<&Value>) -> Vec<&Map<String, Value>> {
    match value {
        Some(Value::Array(items)) => items.iter().filter_map(Value::as_object).collect(),
        Some(Value::Object(obj)) => vec![obj],
        _ => Vec::new(),
    }
}

/// Descend into the first candidate member that is an object
pub fn child_object<'a>(obj: &'a Map<String, Value>, keys: Candidates) -> Option<&'a Map<String, Value>> {
    keys.iter()
        .filter_map(|key| obj.get(*key))
        .find_map(Value::as_object)
}

/// Collapse runs of whitespace into single spaces and trim
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Rewrite an 8-digit `YYYYMMDD` date as `YYYY-MM-DD`; anything else passes through
pub fn normalize_date(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.len() == 8 && trimmed.bytes().all(|b| b.is_ascii_digit()) {
        format!("{}-{}-{}", &trimmed[0..4], &trimmed[4..6], &trimmed[6..8])
    } else {
        raw.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const TITLE: Candidates = &["법령명한글", "lawNameKorean"];

    fn object(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_native_key_wins() {
        let obj = object(json!({"법령명한글": "민법", "lawNameKorean": "Civil"}));
        assert_eq!(first_text(&obj, TITLE).as_deref(), Some("민법"));
    }

    #[test]
    fn test_romanized_fallback() {
        let obj = object(json!({"lawNameKorean": "민법"}));
        assert_eq!(first_text(&obj, TITLE).as_deref(), Some("민법"));

        let obj = object(json!({"법령명한글": "  ", "lawNameKorean": "민법"}));
        assert_eq!(first_text(&obj, TITLE).as_deref(), Some("민법"));
    }

    #[test]
    fn test_missing_field_is_empty() {
        let obj = object(json!({"other": 1}));
        assert_eq!(first_text(&obj, TITLE), None);
        assert_eq!(text_or_empty(&obj, TITLE), "");
    }

    #[test]
    fn test_text_of_shapes() {
        assert_eq!(text_of(&json!(12)).as_deref(), Some("12"));
        assert_eq!(text_of(&json!(["가", "", "나"])).as_deref(), Some("가\n나"));
        assert_eq!(text_of(&json!({"content": "법률", "code": "A0002"})).as_deref(), Some("법률"));
        assert_eq!(text_of(&json!(null)), None);
    }

    #[test]
    fn test_one_or_many() {
        let single = json!({"a": 1});
        assert_eq!(one_or_many(Some(&single)).len(), 1);

        let many = json!([{"a": 1}, {"a": 2}, "noise"]);
        assert_eq!(one_or_many(Some(&many)).len(), 2);

        assert!(one_or_many(None).is_empty());
    }

    #[test]
    fn test_normalize_date() {
        assert_eq!(normalize_date("20200805"), "2020-08-05");
        assert_eq!(normalize_date("2020-08-05"), "2020-08-05");
        assert_eq!(normalize_date("2020085"), "2020085");
        assert_eq!(normalize_date(""), "");
        assert_eq!(normalize_date("2020080A"), "2020080A");
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  개인정보   보호법\n"), "개인정보 보호법");
    }
}
