use serde::Deserialize;
use std::collections::HashMap;
use validator::{Validate, ValidationError};

use crate::models::answer::StudentAnswer;
use crate::models::paper::{ExamPaper, PaperType};

#[derive(Debug, Deserialize)]
pub struct GenerateExamRequest {
    /// "PAPER_1" or "PAPER_2". Anything else is rejected at deserialization,
    /// never defaulted.
    #[serde(rename = "type")]
    pub paper_type: PaperType,
}

#[derive(Debug, Deserialize, Validate)]
pub struct MarkExamRequest {
    #[validate(custom(function = paper_has_questions))]
    pub paper: ExamPaper,
    #[serde(default)]
    pub answers: HashMap<String, StudentAnswer>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ModelAnswersRequest {
    #[validate(custom(function = paper_has_questions))]
    pub paper: ExamPaper,
}

// A paper without questions is a caller contract violation, not a marking
// failure.
fn paper_has_questions(paper: &ExamPaper) -> Result<(), ValidationError> {
    if paper.questions.is_empty() {
        return Err(ValidationError::new("paper_has_no_questions"));
    }
    Ok(())
}
