use serde::Serialize;
use std::collections::HashMap;

use crate::models::answer::StudentAnswer;
use crate::models::paper::{ExamPaper, Question};
use crate::models::rubric::AssessmentObjective;

/// Placeholder sent to the grading model when a question has no submitted
/// answer text, as distinct from an empty string.
pub const NO_ANSWER_SENTINEL: &str = "(NO ANSWER PROVIDED)";

/// One entry of the marking request payload. Ephemeral: derived per marking
/// run and never persisted.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkingRequestItem {
    pub question_id: String,
    pub question_number: i32,
    pub question_text: String,
    pub max_marks: i32,
    pub assessment_objectives: Vec<AssessmentObjective>,
    pub source_ref: Option<String>,
    pub student_answer_text: String,
    pub is_skipped: bool,
}

pub struct ReconcileService;

impl ReconcileService {
    /// Decide which questions are in scope for marking and build the flat
    /// request list, in original paper order.
    ///
    /// A question is skipped (and excluded entirely) iff it belongs to an
    /// optional group, has no non-whitespace answer text, and carries no
    /// images: an unanswered sibling in an alternative-choice set must not be
    /// marked or penalized. Pure and synchronous; calling it twice with the
    /// same inputs yields the same sequence.
    pub fn build_marking_items(
        paper: &ExamPaper,
        answers: &HashMap<String, StudentAnswer>,
    ) -> Vec<MarkingRequestItem> {
        let mut items = Vec::with_capacity(paper.questions.len());

        for question in &paper.questions {
            let answer = answers.get(&question.id);
            let answer_text = answer.map(|a| a.text.trim()).unwrap_or("");
            let has_answer = !answer_text.is_empty();
            let has_images = question.has_images();

            let is_skipped = question.optional_group.is_some() && !has_answer && !has_images;
            if is_skipped {
                continue;
            }

            let student_answer_text = if has_answer {
                answer_text.to_string()
            } else {
                NO_ANSWER_SENTINEL.to_string()
            };

            items.push(MarkingRequestItem {
                question_id: question.id.clone(),
                question_number: question.number,
                question_text: Self::question_text_with_context(question, answer),
                max_marks: question.marks,
                assessment_objectives: question.assessment_objectives.clone(),
                source_ref: question.source_ref.clone(),
                student_answer_text,
                is_skipped: false,
            });
        }

        items
    }

    /// Append an image-prompt context block for image-carrying questions:
    /// either the prompt description the student selected, or both
    /// descriptions with a note that no selection was recorded.
    fn question_text_with_context(question: &Question, answer: Option<&StudentAnswer>) -> String {
        if !question.has_images() {
            return question.text.clone();
        }

        let first = question.image_prompt_description.as_deref().unwrap_or("");
        let second = question.image_prompt_description_2.as_deref().unwrap_or("");

        let context = match answer.and_then(|a| a.selected_image_index) {
            Some(index) => {
                let selected = if index == 1 { second } else { first };
                format!("[CONTEXT: Selected prompt description: {}]", selected)
            }
            None => format!(
                "[CONTEXT: Image prompt descriptions: (1) {} (2) {}. No selection was recorded.]",
                first, second
            ),
        };

        format!("{}\n{}", question.text, context)
    }
}
