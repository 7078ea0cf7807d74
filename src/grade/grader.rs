#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use anyhow::Result;
use bon::Builder;

use super::{
    evaluator::Evaluator,
    penalty::SimilarityTier,
    prompt::render_grading_prompt,
    record::EvaluationRecord,
    sanitize::sanitize_response,
};
use crate::config;

/// Grades one student answer against a reference answer and rubric.
///
/// The similarity gate decides the grading regime before any model call:
/// low-similarity answers fail without contacting the evaluator, mid-band
/// answers are penalized after evaluation, and high-similarity answers are
/// graded normally. The rubric and reference materials are assumed validated
/// by the caller.
#[derive(Clone, Builder)]
#[builder(on(String, into))]
pub struct AnswerGrader {
    /// Cosine similarity between the reference and student answer embeddings.
    #[builder(getter)]
    similarity:       f64,
    /// Rubric text the evaluator grades against.
    #[builder(getter)]
    rubric:           String,
    /// The question being answered.
    #[builder(getter)]
    question:         String,
    /// The reference answer the student is compared to.
    #[builder(getter)]
    reference_answer: String,
    /// The student's submitted answer.
    #[builder(getter)]
    student_answer:   String,
}

impl AnswerGrader {
    /// Runs the grading pipeline, invoking the evaluator at most once.
    ///
    /// The only error this returns is a transport or auth failure of the
    /// evaluator call itself; a malformed model response degrades to safe
    /// default scores instead of failing the request.
    pub async fn run(self, evaluator: &impl Evaluator) -> Result<EvaluationRecord> {
        match SimilarityTier::classify(self.similarity) {
            SimilarityTier::Low => {
                tracing::info!(
                    similarity = self.similarity,
                    "similarity below low cutoff, returning auto-fail record"
                );
                return Ok(EvaluationRecord::unrelated());
            }
            SimilarityTier::Mid | SimilarityTier::High => {}
        }

        let prompts = config::prompts();
        let prompt = render_grading_prompt(
            prompts.grading_template(),
            self.similarity,
            &self.rubric,
            &self.question,
            &self.reference_answer,
            &self.student_answer,
        );

        let raw = evaluator.complete(&prompt).await?;
        Ok(sanitize_response(&raw, self.similarity))
    }
}
