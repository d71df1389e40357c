use serde::{Deserialize, Serialize};

use crate::models::rubric::AssessmentObjective;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaperType {
    #[serde(rename = "PAPER_1")]
    Paper1,
    #[serde(rename = "PAPER_2")]
    Paper2,
}

impl PaperType {
    /// Fixed sitting time per paper variant.
    pub fn time_limit_minutes(self) -> i32 {
        match self {
            PaperType::Paper1 => 105,
            PaperType::Paper2 => 125,
        }
    }

    pub fn source_count(self) -> usize {
        match self {
            PaperType::Paper1 => 1,
            PaperType::Paper2 => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Section {
    A,
    B,
}

impl Default for Section {
    fn default() -> Self {
        Section::A
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    Short,
    Long,
    Extended,
}

impl Default for QuestionType {
    fn default() -> Self {
        QuestionType::Short
    }
}

/// A generated exam paper. Created once by the exam generator and consumed
/// read-only by the student flow and the marking engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamPaper {
    #[serde(default)]
    pub id: String,
    pub paper_type: PaperType,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub time_limit_minutes: i32,
    #[serde(default)]
    pub sources: Vec<Source>,
    #[serde(default)]
    pub questions: Vec<Question>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Source {
    /// Single-letter source identifier ("A", "B").
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub year: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub summary: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub number: i32,
    pub text: String,
    #[serde(default = "default_marks")]
    pub marks: i32,
    #[serde(default)]
    pub assessment_objectives: Vec<AssessmentObjective>,
    #[serde(default)]
    pub section: Section,
    #[serde(default)]
    pub source_ref: Option<String>,
    #[serde(rename = "type", default)]
    pub question_type: QuestionType,
    /// Alternative-choice tag: the student answers at most one member of the
    /// group, and unanswered siblings are neither marked nor penalized.
    #[serde(default)]
    pub optional_group: Option<String>,
    #[serde(default)]
    pub word_count_target: Option<i32>,
    #[serde(default)]
    pub images: Option<Vec<String>>,
    #[serde(default)]
    pub image_prompt_description: Option<String>,
    #[serde(default)]
    pub image_prompt_description_2: Option<String>,
}

fn default_marks() -> i32 {
    1
}

impl Question {
    pub fn has_images(&self) -> bool {
        self.images.as_ref().is_some_and(|imgs| !imgs.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paper_type_round_trips_wire_names() {
        assert_eq!(serde_json::to_string(&PaperType::Paper1).unwrap(), "\"PAPER_1\"");
        let t: PaperType = serde_json::from_str("\"PAPER_2\"").unwrap();
        assert_eq!(t, PaperType::Paper2);
        assert!(serde_json::from_str::<PaperType>("\"PAPER_3\"").is_err());
    }

    #[test]
    fn question_tolerates_sparse_model_output() {
        let q: Question = serde_json::from_str(
            r#"{"text": "List four things about the narrator.", "marks": 4}"#,
        )
        .unwrap();
        assert_eq!(q.number, 0);
        assert_eq!(q.section, Section::A);
        assert!(q.optional_group.is_none());
        assert!(!q.has_images());
    }

    #[test]
    fn image_prompt_field_names_follow_wire_shape() {
        let q: Question = serde_json::from_str(
            r#"{
                "text": "Write a description suggested by this picture.",
                "marks": 40,
                "imagePromptDescription": "a deserted pier in fog",
                "imagePromptDescription2": "a close-up detail of the railings"
            }"#,
        )
        .unwrap();
        assert_eq!(q.image_prompt_description.as_deref(), Some("a deserted pier in fog"));
        assert_eq!(
            q.image_prompt_description_2.as_deref(),
            Some("a close-up detail of the railings")
        );
    }
}
