#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

/// The evaluator seam and its OpenAI-backed implementation.
pub mod evaluator;
/// The grading orchestrator.
pub mod grader;
/// Similarity tiers and the penalty ramp.
pub mod penalty;
/// Grading prompt rendering.
pub mod prompt;
/// The canonical evaluation record.
pub mod record;
/// Defensive normalization of evaluator responses.
pub mod sanitize;

pub use evaluator::{Evaluator, EvaluatorError, OpenAiEvaluator};
pub use grader::AnswerGrader;
pub use penalty::{
    HIGH_SIMILARITY_CUTOFF, LOW_SIMILARITY_CUTOFF, MAX_PENALTY, SimilarityTier, penalty,
};
pub use record::EvaluationRecord;
pub use sanitize::strip_code_fences;
