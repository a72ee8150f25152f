//! Normalization: loosely-typed candidate records to canonical [`Idea`]s.
//!
//! Each candidate is processed independently. Records missing a title or a
//! description are dropped; every other malformed field is coerced to a sane
//! default instead of rejecting the whole record. Output order matches input
//! order with discarded elements simply absent.

use log::debug;
use serde_json::Value;

use crate::{Complexity, Idea};

/// Sentinel category used when the backend omits one.
pub const DEFAULT_CATEGORY: &str = "Other";

/// Candidate key names per logical field, tried in order. Backends are
/// inconsistent about field naming, so each logical field resolves through a
/// short alternative list.
const TITLE_KEYS: &[&str] = &["title", "name"];
const DESCRIPTION_KEYS: &[&str] = &["description", "detail"];
const COMPLEXITY_KEYS: &[&str] = &["complexity", "level"];
const MONETIZABLE_KEYS: &[&str] = &["monetizable", "monetization", "monetizationPossible"];
const CATEGORY_KEYS: &[&str] = &["category"];
const TAGS_KEYS: &[&str] = &["tags"];

/// Normalizes extraction output into the canonical idea sequence.
///
/// Never raises; a candidate that cannot be salvaged just does not appear in
/// the result.
pub fn normalize_candidates(candidates: &[Value]) -> Vec<Idea> {
    let ideas: Vec<Idea> = candidates.iter().filter_map(normalize_one).collect();

    if ideas.len() < candidates.len() {
        debug!(
            "dropped {} of {} candidates during normalization",
            candidates.len() - ideas.len(),
            candidates.len()
        );
    }

    ideas
}

/// Normalizes a single candidate, or returns None when the mandatory fields
/// are missing after trimming.
fn normalize_one(candidate: &Value) -> Option<Idea> {
    let title = resolve_text(candidate, TITLE_KEYS)
        .unwrap_or_default()
        .trim()
        .to_string();
    let description = resolve_text(candidate, DESCRIPTION_KEYS)
        .unwrap_or_default()
        .trim()
        .to_string();

    if title.is_empty() || description.is_empty() {
        return None;
    }

    let complexity = resolve_text(candidate, COMPLEXITY_KEYS)
        .map(|raw| Complexity::from_raw(&raw))
        .unwrap_or_default();

    let monetizable = resolve(candidate, MONETIZABLE_KEYS)
        .map(is_truthy)
        .unwrap_or(false);

    let category = resolve_text(candidate, CATEGORY_KEYS)
        .map(|raw| raw.trim().to_string())
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| DEFAULT_CATEGORY.to_string());

    // Tags stay absent unless the backend actually sent an array.
    let tags = resolve(candidate, TAGS_KEYS)
        .and_then(Value::as_array)
        .map(|items| items.iter().map(value_to_text).collect());

    Some(Idea::new(
        title,
        description,
        complexity,
        monetizable,
        category,
        tags,
    ))
}

/// Returns the first present, non-null value among the candidate keys. A
/// JSON null counts as absent, so resolution falls through to the next key.
fn resolve<'a>(candidate: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .find_map(|key| candidate.get(*key).filter(|value| !value.is_null()))
}

/// Resolves a field and coerces it to text.
fn resolve_text(candidate: &Value, keys: &[&str]) -> Option<String> {
    resolve(candidate, keys).map(value_to_text)
}

/// Coerces a JSON scalar to text. Strings pass through unquoted; everything
/// else renders as its JSON text.
fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// JavaScript-style truthiness: false, 0, "" and null are falsy, everything
/// else is truthy.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::extract_candidates;

    fn normalize_single(candidate: Value) -> Vec<Idea> {
        normalize_candidates(&[candidate])
    }

    #[test]
    fn test_rejects_empty_title() {
        assert!(normalize_single(json!({"title": "", "description": "x"})).is_empty());
    }

    #[test]
    fn test_rejects_empty_description() {
        assert!(normalize_single(json!({"title": "x", "description": ""})).is_empty());
    }

    #[test]
    fn test_rejects_whitespace_only_fields() {
        assert!(normalize_single(json!({"title": "   ", "description": "x"})).is_empty());
        assert!(normalize_single(json!({"title": "x", "description": "\n\t"})).is_empty());
    }

    #[test]
    fn test_minimal_record_gets_defaults() {
        let ideas = normalize_single(json!({"title": "x", "description": "y"}));
        assert_eq!(ideas.len(), 1);
        let idea = &ideas[0];
        assert_eq!(idea.complexity, Complexity::Medium);
        assert!(!idea.monetizable);
        assert_eq!(idea.category, "Other");
        assert!(idea.tags.is_none());
    }

    #[test]
    fn test_title_and_description_are_trimmed() {
        let ideas = normalize_single(json!({"title": "  A  ", "description": " B "}));
        assert_eq!(ideas[0].title, "A");
        assert_eq!(ideas[0].description, "B");
    }

    #[test]
    fn test_name_and_detail_fallbacks() {
        let ideas = normalize_single(json!({"name": "A", "detail": "B"}));
        assert_eq!(ideas.len(), 1);
        assert_eq!(ideas[0].title, "A");
        assert_eq!(ideas[0].description, "B");
    }

    #[test]
    fn test_primary_key_wins_over_fallback() {
        let ideas = normalize_single(json!({
            "title": "primary", "name": "fallback", "description": "d"
        }));
        assert_eq!(ideas[0].title, "primary");
    }

    #[test]
    fn test_null_primary_key_falls_through() {
        let ideas = normalize_single(json!({
            "title": null, "name": "fallback", "description": "d"
        }));
        assert_eq!(ideas[0].title, "fallback");
    }

    #[test]
    fn test_complexity_mapping() {
        for (raw, expected) in [
            ("간단", Complexity::Simple),
            ("쉬움", Complexity::Simple),
            ("어려움", Complexity::Hard),
            ("고급", Complexity::Hard),
            ("중간", Complexity::Medium),
            ("", Complexity::Medium),
            ("unheard of", Complexity::Medium),
        ] {
            let ideas = normalize_single(json!({
                "title": "t", "description": "d", "complexity": raw
            }));
            assert_eq!(ideas[0].complexity, expected, "raw value {:?}", raw);
        }
    }

    #[test]
    fn test_complexity_level_fallback() {
        let ideas = normalize_single(json!({
            "title": "t", "description": "d", "level": "어려움"
        }));
        assert_eq!(ideas[0].complexity, Complexity::Hard);
    }

    #[test]
    fn test_monetizable_coercion() {
        for (raw, expected) in [
            (json!(true), true),
            (json!(false), false),
            (json!(1), true),
            (json!(0), false),
            (json!("yes"), true),
            (json!(""), false),
            (json!(null), false),
        ] {
            let ideas = normalize_single(json!({
                "title": "t", "description": "d", "monetizable": raw
            }));
            assert_eq!(ideas[0].monetizable, expected);
        }
    }

    #[test]
    fn test_monetizable_fallback_keys() {
        let ideas = normalize_single(json!({
            "title": "t", "description": "d", "monetization": true
        }));
        assert!(ideas[0].monetizable);

        let ideas = normalize_single(json!({
            "title": "t", "description": "d", "monetizationPossible": 1
        }));
        assert!(ideas[0].monetizable);
    }

    #[test]
    fn test_category_trim_and_default() {
        let ideas = normalize_single(json!({
            "title": "t", "description": "d", "category": "  앱  "
        }));
        assert_eq!(ideas[0].category, "앱");

        let ideas = normalize_single(json!({
            "title": "t", "description": "d", "category": "   "
        }));
        assert_eq!(ideas[0].category, "Other");
    }

    #[test]
    fn test_tags_array_coerced_to_text() {
        let ideas = normalize_single(json!({
            "title": "t", "description": "d", "tags": ["ai", 42, true]
        }));
        assert_eq!(
            ideas[0].tags,
            Some(vec!["ai".to_string(), "42".to_string(), "true".to_string()])
        );
    }

    #[test]
    fn test_tags_non_array_omitted() {
        let ideas = normalize_single(json!({
            "title": "t", "description": "d", "tags": "ai, ml"
        }));
        assert!(ideas[0].tags.is_none());
    }

    #[test]
    fn test_non_object_candidates_dropped() {
        let ideas = normalize_candidates(&[json!("just a string"), json!(42), json!(null)]);
        assert!(ideas.is_empty());
    }

    #[test]
    fn test_order_preserved_with_gaps_closed() {
        let ideas = normalize_candidates(&[
            json!({"title": "first", "description": "d"}),
            json!({"title": "", "description": "dropped"}),
            json!({"title": "second", "description": "d"}),
        ]);
        let titles: Vec<&str> = ideas.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["first", "second"]);
    }

    #[test]
    fn test_duplicate_records_not_deduplicated() {
        let record = json!({"title": "same", "description": "same"});
        let ideas = normalize_candidates(&[record.clone(), record]);
        assert_eq!(ideas.len(), 2);
        assert_eq!(ideas[0].id, ideas[1].id);
    }

    #[test]
    fn test_end_to_end_fenced_korean_response() {
        let raw = "```json\n[{\"title\":\"A\",\"description\":\"B\",\"complexity\":\"어려움\",\"monetizable\":1,\"category\":\"앱\"}]\n```";
        let candidates = extract_candidates(raw);
        assert_eq!(candidates.len(), 1);

        let ideas = normalize_candidates(&candidates);
        assert_eq!(ideas.len(), 1);
        let idea = &ideas[0];
        assert_eq!(idea.title, "A");
        assert_eq!(idea.description, "B");
        assert_eq!(idea.complexity, Complexity::Hard);
        assert!(idea.monetizable);
        assert_eq!(idea.category, "앱");
        assert_eq!(idea.id, crate::stable_id("A", "B"));
    }
}
