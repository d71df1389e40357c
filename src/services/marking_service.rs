use anyhow::Context;
use chrono::Utc;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use std::collections::{BTreeMap, HashMap};

use crate::error::{Error, Result};
use crate::models::answer::StudentAnswer;
use crate::models::paper::{ExamPaper, Question};
use crate::models::result::{ComparisonPoint, ExamResult, QuestionResult};
use crate::models::rubric::AssessmentObjective;
use crate::services::ai_service::AIService;
use crate::services::prompt_service::PromptService;
use crate::services::reconcile_service::{MarkingRequestItem, ReconcileService};
use crate::utils::json::extract_json;

/// Grading context only needs the opening of each source, not the full text.
const SOURCE_EXCERPT_CHARS: usize = 300;

const FALLBACK_FEEDBACK: &str = "AI marking unavailable for this question.";

/// The grading model's response shape. Per-question entries may arrive
/// reordered, renamed or missing; reconciliation handles all three.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MarkingResponse {
    #[serde(default)]
    total_score: i32,
    #[serde(default)]
    max_score: i32,
    #[serde(default = "default_grade")]
    grade_estimate: String,
    #[serde(default)]
    overall_feedback: String,
    #[serde(default)]
    question_results: Vec<AiQuestionResult>,
}

fn default_grade() -> String {
    "U".to_string()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AiQuestionResult {
    /// May echo either the id ("q3") or the bare number; kept loose.
    #[serde(default)]
    question_id: Option<JsonValue>,
    #[serde(default)]
    question_number: Option<i32>,
    #[serde(default)]
    score: i32,
    #[serde(default)]
    level: i32,
    #[serde(default)]
    feedback: String,
    #[serde(default)]
    assessment_objective_scores: BTreeMap<String, i32>,
    #[serde(default)]
    model_answer: String,
    #[serde(default)]
    comparison_points: Vec<ComparisonPoint>,
}

impl AiQuestionResult {
    /// Match by questionId OR human-readable number, never array position.
    fn matches(&self, question: &Question) -> bool {
        if let Some(id) = &self.question_id {
            if id.as_str() == Some(question.id.as_str()) {
                return true;
            }
            if id.as_i64() == Some(question.number as i64) {
                return true;
            }
            if id.as_str().and_then(|s| s.parse::<i32>().ok()) == Some(question.number) {
                return true;
            }
        }
        self.question_number == Some(question.number)
    }

    fn objective_scores(&self) -> BTreeMap<AssessmentObjective, i32> {
        self.assessment_objective_scores
            .iter()
            .filter_map(|(tag, score)| {
                serde_json::from_value::<AssessmentObjective>(JsonValue::String(tag.clone()))
                    .ok()
                    .map(|ao| (ao, *score))
            })
            .collect()
    }
}

#[derive(Clone)]
pub struct MarkingService {
    ai_service: AIService,
}

impl MarkingService {
    pub fn new(ai_service: AIService) -> Self {
        Self { ai_service }
    }

    /// Produce one exam result: reconcile answers, one grading-model call,
    /// decode, then reconcile the model's results back onto the paper. Any
    /// failure in that chain collapses into the one generic marking error.
    pub async fn mark_exam(
        &self,
        paper: &ExamPaper,
        answers: &HashMap<String, StudentAnswer>,
    ) -> Result<ExamResult> {
        self.mark_exam_inner(paper, answers)
            .await
            .map_err(Error::Marking)
    }

    async fn mark_exam_inner(
        &self,
        paper: &ExamPaper,
        answers: &HashMap<String, StudentAnswer>,
    ) -> anyhow::Result<ExamResult> {
        let items = ReconcileService::build_marking_items(paper, answers);
        let excerpts: Vec<String> = paper
            .sources
            .iter()
            .map(|s| Self::source_excerpt(&s.content).to_string())
            .collect();

        let prompt = PromptService::build_marking_prompt(paper.paper_type, &excerpts, &items);
        let raw = self.ai_service.complete(&prompt, true).await?;
        let response: MarkingResponse = serde_json::from_str(&extract_json(&raw))
            .context("Model returned unparseable marking JSON")?;

        let result = Self::assemble_result(paper, &items, answers, response);
        tracing::info!(
            paper_id = %paper.id,
            total = result.total_score,
            max = result.max_score,
            grade = %result.grade_estimate,
            "exam marked"
        );
        Ok(result)
    }

    /// Merge the model's totals with the reconciled per-question results.
    /// Totals and grade pass through verbatim: the model's arithmetic is the
    /// trust boundary here, so a mismatch against the per-question sum is
    /// logged and kept.
    fn assemble_result(
        paper: &ExamPaper,
        items: &[MarkingRequestItem],
        answers: &HashMap<String, StudentAnswer>,
        response: MarkingResponse,
    ) -> ExamResult {
        let question_results =
            Self::reconcile_results(paper, items, answers, &response.question_results);

        let reconciled_sum: i32 = question_results.iter().map(|r| r.score).sum();
        if reconciled_sum != response.total_score {
            tracing::warn!(
                reported = response.total_score,
                reconciled = reconciled_sum,
                "model totalScore disagrees with per-question sum"
            );
        }

        ExamResult {
            total_score: response.total_score,
            max_score: response.max_score,
            grade_estimate: response.grade_estimate,
            overall_feedback: response.overall_feedback,
            question_results,
            date: Utc::now(),
            paper_type: paper.paper_type,
        }
    }

    /// Walk the paper's questions in original order. Questions excluded by
    /// the reconciler (unanswered optional siblings) produce nothing; an
    /// in-scope question the model skipped gets a zero-score fallback so an
    /// eligible question is never silently dropped.
    fn reconcile_results(
        paper: &ExamPaper,
        items: &[MarkingRequestItem],
        answers: &HashMap<String, StudentAnswer>,
        ai_results: &[AiQuestionResult],
    ) -> Vec<QuestionResult> {
        let mut results = Vec::with_capacity(items.len());

        for question in &paper.questions {
            let Some(item) = items.iter().find(|i| i.question_id == question.id) else {
                continue;
            };

            let student_answer = answers
                .get(&question.id)
                .map(|a| a.text.trim().to_string())
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| item.student_answer_text.clone());

            match ai_results.iter().find(|r| r.matches(question)) {
                Some(ai) => results.push(QuestionResult {
                    question_id: question.id.clone(),
                    score: ai.score,
                    max_score: question.marks,
                    level: ai.level,
                    feedback: ai.feedback.clone(),
                    assessment_objective_scores: ai.objective_scores(),
                    model_answer: ai.model_answer.clone(),
                    student_answer,
                    comparison_points: ai.comparison_points.clone(),
                }),
                None => {
                    tracing::warn!(question_id = %question.id, "model omitted an in-scope question");
                    results.push(QuestionResult {
                        question_id: question.id.clone(),
                        score: 0,
                        max_score: question.marks,
                        level: 0,
                        feedback: FALLBACK_FEEDBACK.to_string(),
                        assessment_objective_scores: BTreeMap::new(),
                        model_answer: "N/A".to_string(),
                        student_answer,
                        comparison_points: Vec::new(),
                    });
                }
            }
        }

        results
    }

    /// First ~300 characters of a source, cut on a char boundary.
    fn source_excerpt(content: &str) -> &str {
        match content.char_indices().nth(SOURCE_EXCERPT_CHARS) {
            Some((idx, _)) => &content[..idx],
            None => content,
        }
    }
}
