#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use serde::{Deserialize, Serialize};
use tabled::Tabled;

/// Feedback returned when the similarity gate rejects an answer outright.
pub(crate) const UNRELATED_FEEDBACK: &str = "Answer is unrelated.";

/// Feedback returned when the evaluator's response could not be parsed.
pub(crate) const PARSE_FAILURE_FEEDBACK: &str = "Error parsing LLM response.";

#[derive(Tabled, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
/// The canonical output of grading a single student answer.
///
/// Every numeric field is an integer in `[0, 100]` regardless of what the
/// external evaluator produced. `is_correct` reflects factual correctness
/// only and is independent of `final_score`.
pub struct EvaluationRecord {
    #[tabled(rename = "Understanding")]
    /// Score for understanding of the question and underlying concept.
    pub understanding: u8,
    #[tabled(rename = "Key Points")]
    /// Score for coverage of the essential ideas, steps, or facts.
    pub key_points:    u8,
    #[tabled(rename = "Structure")]
    /// Score for organization and coherence of the answer.
    pub structure:     u8,
    #[tabled(rename = "Accuracy")]
    /// Score for factual and logical correctness.
    pub accuracy:      u8,
    #[tabled(rename = "Final Score")]
    /// Overall score, reflecting the weighted combination of criteria.
    pub final_score:   u8,
    #[tabled(skip)]
    /// Free-text feedback for the student.
    pub feedback:      String,
    #[tabled(rename = "Correct")]
    /// Whether the answer is factually and conceptually correct.
    pub is_correct:    bool,
}

impl EvaluationRecord {
    /// The fixed record returned when similarity is below the low cutoff.
    pub fn unrelated() -> Self {
        Self {
            understanding: 0,
            key_points:    0,
            structure:     5,
            accuracy:      0,
            final_score:   5,
            feedback:      UNRELATED_FEEDBACK.to_string(),
            is_correct:    false,
        }
    }
}
