use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::paper::PaperType;
use crate::models::rubric::AssessmentObjective;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonKind {
    Strength,
    Weakness,
    Improvement,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonPoint {
    pub kind: ComparisonKind,
    pub text: String,
}

/// Marking outcome for a single question. Produced once per marking run and
/// never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionResult {
    pub question_id: String,
    pub score: i32,
    pub max_score: i32,
    pub level: i32,
    pub feedback: String,
    #[serde(default)]
    pub assessment_objective_scores: BTreeMap<AssessmentObjective, i32>,
    pub model_answer: String,
    pub student_answer: String,
    #[serde(default)]
    pub comparison_points: Vec<ComparisonPoint>,
}

/// The final persisted record shape for one marking run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamResult {
    pub total_score: i32,
    pub max_score: i32,
    /// "1".."9", or "U" for unclassified.
    pub grade_estimate: String,
    pub overall_feedback: String,
    pub question_results: Vec<QuestionResult>,
    pub date: DateTime<Utc>,
    pub paper_type: PaperType,
}
