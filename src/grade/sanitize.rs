#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Defensive normalization of the evaluator's semi-structured response.
//!
//! The response is untrusted: models wrap JSON in markdown fences despite
//! instructions, return floats or out-of-range values, omit fields, or encode
//! booleans as strings. Every anomaly is absorbed into a safe default here;
//! nothing in this module returns an error.

use serde_json::{Map, Value, json};

use super::{
    penalty::{SimilarityTier, penalty},
    record::{EvaluationRecord, PARSE_FAILURE_FEEDBACK},
};

/// The four per-criterion score keys, in rubric order.
const CRITERIA: [&str; 4] = ["understanding", "key_points", "structure", "accuracy"];

/// Strips a leading ```` ```json ```` or ```` ``` ```` marker and a trailing
/// ```` ``` ```` marker, then trims surrounding whitespace.
///
/// A no-op on already-bare JSON text.
pub fn strip_code_fences(raw: &str) -> &str {
    let content = raw.trim();
    let content = content.strip_prefix("```json").unwrap_or(content);
    let content = content.strip_prefix("```").unwrap_or(content);
    let content = content.strip_suffix("```").unwrap_or(content);
    content.trim()
}

/// Best-effort structural parse into a generic key/value mapping.
///
/// Anything that is not a JSON object, including unparsable text, yields
/// `None` rather than an error.
fn parse_object(raw: &str) -> Option<Map<String, Value>> {
    serde_json::from_str::<Value>(raw)
        .ok()
        .and_then(|value| match value {
            Value::Object(map) => Some(map),
            _ => None,
        })
}

/// The fallback mapping substituted when the response cannot be parsed.
fn parse_failure_fields() -> Map<String, Value> {
    let mut fields = Map::new();
    for key in CRITERIA {
        fields.insert(key.to_string(), json!(0));
    }
    fields.insert("final_score".to_string(), json!(0));
    fields.insert("feedback".to_string(), json!(PARSE_FAILURE_FEEDBACK));
    fields
}

/// Applies the mid-tier penalty to the parsed fields in place.
///
/// The headline score absorbs the penalty in full; criterion scores present
/// in the response are dampened at half strength so feedback granularity
/// survives the deduction. When the original final score is zero the ratio is
/// undefined and the criteria are left as returned.
fn apply_penalty(fields: &mut Map<String, Value>, deduction: f64) {
    let original = fields
        .get("final_score")
        .and_then(Value::as_f64)
        .unwrap_or(0.0);
    fields.insert("final_score".to_string(), json!((original - deduction).max(0.0)));

    if original > 0.0 {
        let ratio = deduction / original;
        for key in CRITERIA {
            if let Some(value) = fields.get(key).and_then(Value::as_f64) {
                let adjusted = (value * (1.0 - ratio * 0.5)).floor().max(0.0);
                fields.insert(key.to_string(), json!(adjusted));
            }
        }
    }
}

/// Reads a numeric field, truncating to an integer and clamping to `[0, 100]`.
/// Absent or non-numeric values default to zero.
fn int_field(fields: &Map<String, Value>, key: &str) -> u8 {
    fields
        .get(key)
        .and_then(Value::as_f64)
        .map(|value| value.trunc().clamp(0.0, 100.0) as u8)
        .unwrap_or(0)
}

/// Reads the feedback field, defaulting to an empty string.
fn feedback_field(fields: &Map<String, Value>) -> String {
    fields
        .get("feedback")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Normalizes the correctness flag.
///
/// Absence means the model failed to emit it and reads as `false`. Textual
/// values are matched case-insensitively against `"true"`, `"1"`, and
/// `"yes"`, so the literal text `"false"` is never treated as true. Booleans
/// and numbers coerce by standard truthiness; any other JSON type is `false`.
fn bool_field(value: Option<&Value>) -> bool {
    match value {
        None => false,
        Some(Value::Bool(flag)) => *flag,
        Some(Value::String(text)) => {
            matches!(text.trim().to_ascii_lowercase().as_str(), "true" | "1" | "yes")
        }
        Some(Value::Number(number)) => number.as_f64().is_some_and(|value| value != 0.0),
        Some(_) => false,
    }
}

/// Converts the evaluator's raw text output into a canonical record.
///
/// Fence stripping, parsing, penalty blending, clamping, and boolean
/// normalization run in that order; later steps depend on earlier ones.
pub(crate) fn sanitize_response(raw: &str, similarity: f64) -> EvaluationRecord {
    let mut fields =
        parse_object(strip_code_fences(raw)).unwrap_or_else(parse_failure_fields);

    if SimilarityTier::classify(similarity) == SimilarityTier::Mid {
        apply_penalty(&mut fields, penalty(similarity));
    }

    EvaluationRecord {
        understanding: int_field(&fields, "understanding"),
        key_points:    int_field(&fields, "key_points"),
        structure:     int_field(&fields, "structure"),
        accuracy:      int_field(&fields, "accuracy"),
        final_score:   int_field(&fields, "final_score"),
        feedback:      feedback_field(&fields),
        is_correct:    bool_field(fields.get("is_correct").or_else(|| fields.get("isCorrect"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fence_stripping_removes_json_fences() {
        let raw = "```json\n{\"final_score\": 80}\n```";
        assert_eq!(strip_code_fences(raw), "{\"final_score\": 80}");
    }

    #[test]
    fn fence_stripping_removes_generic_fences() {
        let raw = "```\n{\"final_score\": 80}\n```";
        assert_eq!(strip_code_fences(raw), "{\"final_score\": 80}");
    }

    #[test]
    fn fence_stripping_is_idempotent_on_bare_json() {
        let raw = "{\"final_score\": 80}";
        assert_eq!(strip_code_fences(raw), raw);
        assert_eq!(strip_code_fences(strip_code_fences(raw)), raw);
    }

    #[test]
    fn non_object_json_falls_back() {
        let record = sanitize_response("[1, 2, 3]", 0.75);
        assert_eq!(record.final_score, 0);
        assert_eq!(record.feedback, PARSE_FAILURE_FEEDBACK);
        assert!(!record.is_correct);
    }

    #[test]
    fn out_of_range_scores_are_clamped() {
        let record = sanitize_response(
            r#"{"understanding": 150, "key_points": -20, "structure": 80.9,
                "accuracy": 101, "final_score": 105, "feedback": "ok"}"#,
            0.75,
        );
        assert_eq!(record.understanding, 100);
        assert_eq!(record.key_points, 0);
        assert_eq!(record.structure, 80);
        assert_eq!(record.accuracy, 100);
        assert_eq!(record.final_score, 100);
    }

    #[test]
    fn wrong_typed_scores_default_to_zero() {
        let record = sanitize_response(
            r#"{"understanding": "eighty", "key_points": null, "final_score": true,
                "feedback": "ok"}"#,
            0.75,
        );
        assert_eq!(record.understanding, 0);
        assert_eq!(record.key_points, 0);
        assert_eq!(record.final_score, 0);
        assert_eq!(record.feedback, "ok");
    }

    #[test]
    fn correctness_flag_normalization() {
        let cases = [
            (r#"{"isCorrect": "false"}"#, false),
            (r#"{"isCorrect": "TRUE"}"#, true),
            (r#"{"isCorrect": "yes"}"#, true),
            (r#"{"isCorrect": 1}"#, true),
            (r#"{"isCorrect": 0}"#, false),
            (r#"{"is_correct": true}"#, true),
            (r#"{"feedback": "ok"}"#, false),
            (r#"{"isCorrect": null}"#, false),
        ];

        for (body, expected) in cases {
            let record = sanitize_response(body, 0.75);
            assert_eq!(record.is_correct, expected, "body: {body}");
        }
    }

    #[test]
    fn mid_tier_penalty_dampens_criteria_at_half_strength() {
        // penalty(0.30) is exactly 40; with an original score of 80 the ratio
        // is 0.5 and each criterion shrinks to 80 * 0.75 = 60.
        let record = sanitize_response(
            r#"{"understanding": 80, "key_points": 80, "structure": 80,
                "accuracy": 80, "final_score": 80, "feedback": "ok"}"#,
            0.30,
        );
        assert_eq!(record.final_score, 40);
        assert_eq!(record.understanding, 60);
        assert_eq!(record.key_points, 60);
        assert_eq!(record.structure, 60);
        assert_eq!(record.accuracy, 60);
    }

    #[test]
    fn zero_original_score_skips_proportional_adjustment() {
        let record = sanitize_response(
            r#"{"understanding": 10, "key_points": 10, "structure": 10,
                "accuracy": 10, "final_score": 0, "feedback": "ok"}"#,
            0.45,
        );
        assert_eq!(record.final_score, 0);
        assert_eq!(record.understanding, 10);
        assert_eq!(record.accuracy, 10);
    }

    #[test]
    fn high_tier_applies_no_penalty() {
        let record = sanitize_response(
            r#"{"understanding": 80, "key_points": 80, "structure": 80,
                "accuracy": 80, "final_score": 80, "feedback": "ok"}"#,
            0.60,
        );
        assert_eq!(record.final_score, 80);
        assert_eq!(record.understanding, 80);
    }

    #[test]
    fn missing_criteria_are_left_absent_during_blending() {
        // Only `understanding` is present; the other criteria default to zero
        // at coercion time without tripping the blend.
        let record = sanitize_response(
            r#"{"understanding": 80, "final_score": 80, "feedback": "ok"}"#,
            0.45,
        );
        assert_eq!(record.final_score, 60);
        assert_eq!(record.understanding, 70);
        assert_eq!(record.key_points, 0);
        assert_eq!(record.structure, 0);
    }
}
