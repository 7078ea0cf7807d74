#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

/// Renders the grading prompt from the embedded template.
///
/// The similarity and confidence values are human-readable signals for the
/// model; they feed no calculation downstream. Confidence is the similarity
/// expressed as a percentage, capped at 100.
pub(crate) fn render_grading_prompt(
    template: &str,
    similarity: f64,
    rubric: &str,
    question: &str,
    reference_answer: &str,
    student_answer: &str,
) -> String {
    let confidence = (similarity * 100.0).min(100.0);

    template
        .replace("{SIMILARITY}", &format!("{similarity:.2}"))
        .replace("{CONFIDENCE}", &format!("{confidence:.2}"))
        .replace("{RUBRIC}", rubric)
        .replace("{QUESTION}", question)
        .replace("{REFERENCE_ANSWER}", reference_answer)
        .replace("{STUDENT_ANSWER}", student_answer)
}
