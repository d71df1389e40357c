use anyhow::Context;
use serde_json::{json, Value as JsonValue};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::paper::{ExamPaper, PaperType, Question};
use crate::services::ai_service::AIService;
use crate::services::image_service::ImageService;
use crate::services::prompt_service::PromptService;
use crate::utils::json::extract_json;

/// Question number of the image-based writing alternative on Paper 1.
const PAPER_1_IMAGE_QUESTION: i32 = 5;

/// Stock description used when the model returns no first image prompt.
const STOCK_IMAGE_DESCRIPTION: &str =
    "an atmospheric 19th-century street scene at dusk, gas lamps glowing through fog";

#[derive(Clone)]
pub struct ExamService {
    ai_service: AIService,
    image_service: ImageService,
}

impl ExamService {
    pub fn new(ai_service: AIService, image_service: ImageService) -> Self {
        Self {
            ai_service,
            image_service,
        }
    }

    /// Produce one exam paper: a single text-model call, defensive decode,
    /// then (Paper 1 only) a two-slot concurrent image fetch for the
    /// image-based writing prompt. Any model/parse failure collapses into
    /// the one generic generation error; image failures only drop images.
    pub async fn generate_exam(&self, paper_type: PaperType) -> Result<ExamPaper> {
        let mut paper = self
            .request_paper(paper_type)
            .await
            .map_err(Error::ExamGeneration)?;

        if paper_type == PaperType::Paper1 {
            self.attach_writing_images(&mut paper).await;
        }

        tracing::info!(
            paper_id = %paper.id,
            questions = paper.questions.len(),
            sources = paper.sources.len(),
            "exam generated"
        );
        Ok(paper)
    }

    async fn request_paper(&self, paper_type: PaperType) -> anyhow::Result<ExamPaper> {
        let prompt = PromptService::build_generation_prompt(paper_type);
        let raw = self.ai_service.complete(&prompt, true).await?;
        Self::decode_paper(&raw, paper_type)
    }

    /// Decode the model's paper JSON. `questions` and `sources` are coerced
    /// to empty arrays when omitted or non-array; anything else malformed is
    /// rejected here with a specific cause (collapsed to the generic error
    /// at the boundary). Fixed business rules are applied regardless of what
    /// the model claimed: time limit, paper type, ids and numbering.
    pub(crate) fn decode_paper(raw: &str, paper_type: PaperType) -> anyhow::Result<ExamPaper> {
        let mut value: JsonValue = serde_json::from_str(&extract_json(raw))
            .context("Model returned unparseable exam JSON")?;

        for key in ["questions", "sources"] {
            if !value.get(key).map(JsonValue::is_array).unwrap_or(false) {
                value[key] = json!([]);
            }
        }
        value["paperType"] = serde_json::to_value(paper_type)?;

        let mut paper: ExamPaper =
            serde_json::from_value(value).context("Exam JSON missing required fields")?;

        paper.paper_type = paper_type;
        paper.time_limit_minutes = paper_type.time_limit_minutes();
        if paper.id.trim().is_empty() {
            paper.id = Uuid::new_v4().to_string();
        }
        for (idx, question) in paper.questions.iter_mut().enumerate() {
            if question.number <= 0 {
                question.number = (idx as i32) + 1;
            }
            if question.id.trim().is_empty() {
                question.id = format!("q{}", question.number);
            }
        }

        Ok(paper)
    }

    /// Two independent fire-and-forget image slots for the Paper 1 image
    /// question, joined before returning. Order is preserved as
    /// [prompt1, prompt2]; a failed slot is dropped, never inserted as a gap.
    async fn attach_writing_images(&self, paper: &mut ExamPaper) {
        let Some(question) = paper
            .questions
            .iter_mut()
            .find(|q| q.number == PAPER_1_IMAGE_QUESTION)
        else {
            tracing::warn!("paper 1 has no question {}, skipping images", PAPER_1_IMAGE_QUESTION);
            return;
        };

        let (first_desc, second_desc) = Self::image_descriptions(question);
        let (first, second) = tokio::join!(
            self.image_service.fetch_illustration(&first_desc),
            self.image_service.fetch_illustration(&second_desc),
        );

        let mut urls = Vec::with_capacity(2);
        for (slot, outcome) in [(1, first), (2, second)] {
            match outcome {
                Ok(url) => urls.push(url),
                Err(err) => {
                    tracing::warn!(slot, error = ?err, "illustration fetch failed, dropping slot")
                }
            }
        }
        if !urls.is_empty() {
            question.images = Some(urls);
        }

        // The marking flow reads the descriptions back out of the question,
        // so any fallback used here must be recorded on it.
        question.image_prompt_description = Some(first_desc);
        question.image_prompt_description_2 = Some(second_desc);
    }

    /// The two prompt descriptions for the image question, with fallbacks:
    /// a stock scene when the model gave none, and a close-up variant of the
    /// first description when the second is missing.
    pub(crate) fn image_descriptions(question: &Question) -> (String, String) {
        let first = question
            .image_prompt_description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| STOCK_IMAGE_DESCRIPTION.to_string());

        let second = question
            .image_prompt_description_2
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("a close-up detail of {}", first));

        (first, second)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::paper::{QuestionType, Section};
    use crate::models::rubric::AssessmentObjective;

    #[test]
    fn decode_fills_fixed_rules_and_numbering() {
        let raw = r#"{
            "title": "Mock Paper 1",
            "description": "Creative reading and writing",
            "timeLimitMinutes": 90,
            "sources": [{"id": "A", "title": "The Lamplighter", "author": "E. Hale",
                         "year": "1867", "content": "The fog rolled in.", "summary": "Fog."}],
            "questions": [
                {"text": "List four things about the fog.", "marks": 4,
                 "assessmentObjectives": ["AO1"], "section": "A", "type": "short"},
                {"text": "How does the writer use language here?", "marks": 8,
                 "assessmentObjectives": ["AO2"], "section": "A", "type": "long"}
            ]
        }"#;

        let paper = ExamService::decode_paper(raw, PaperType::Paper1).unwrap();
        assert_eq!(paper.paper_type, PaperType::Paper1);
        assert_eq!(paper.time_limit_minutes, 105);
        assert!(!paper.id.is_empty());
        assert_eq!(paper.questions[0].number, 1);
        assert_eq!(paper.questions[0].id, "q1");
        assert_eq!(paper.questions[1].id, "q2");
    }

    #[test]
    fn decode_coerces_missing_collections_to_empty() {
        let paper = ExamService::decode_paper(r#"{"title": "Bare"}"#, PaperType::Paper2).unwrap();
        assert!(paper.questions.is_empty());
        assert!(paper.sources.is_empty());
        assert_eq!(paper.time_limit_minutes, 125);
    }

    #[test]
    fn decode_coerces_non_array_collections_to_empty() {
        let raw = r#"{"title": "Odd", "questions": "not a list", "sources": 7}"#;
        let paper = ExamService::decode_paper(raw, PaperType::Paper1).unwrap();
        assert!(paper.questions.is_empty());
        assert!(paper.sources.is_empty());
    }

    #[test]
    fn decode_tolerates_prose_wrapped_json() {
        let raw = "Certainly! Here is the paper:\n```json\n{\"title\": \"Wrapped\"}\n```";
        let paper = ExamService::decode_paper(raw, PaperType::Paper1).unwrap();
        assert_eq!(paper.title, "Wrapped");
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(ExamService::decode_paper("total nonsense, no json", PaperType::Paper1).is_err());
    }

    fn image_question(first: Option<&str>, second: Option<&str>) -> Question {
        Question {
            id: "q5".to_string(),
            number: 5,
            text: "Write a description suggested by this picture.".to_string(),
            marks: 40,
            assessment_objectives: vec![AssessmentObjective::Ao5, AssessmentObjective::Ao6],
            section: Section::B,
            source_ref: None,
            question_type: QuestionType::Extended,
            optional_group: Some("paper1-writing".to_string()),
            word_count_target: Some(500),
            images: None,
            image_prompt_description: first.map(str::to_string),
            image_prompt_description_2: second.map(str::to_string),
        }
    }

    #[test]
    fn missing_second_description_synthesizes_close_up() {
        let q = image_question(Some("a deserted pier in fog"), None);
        let (first, second) = ExamService::image_descriptions(&q);
        assert_eq!(first, "a deserted pier in fog");
        assert_eq!(second, "a close-up detail of a deserted pier in fog");
    }

    #[test]
    fn missing_both_descriptions_falls_back_to_stock() {
        let q = image_question(None, None);
        let (first, second) = ExamService::image_descriptions(&q);
        assert_eq!(first, STOCK_IMAGE_DESCRIPTION);
        assert_eq!(second, format!("a close-up detail of {}", STOCK_IMAGE_DESCRIPTION));
    }

    #[test]
    fn blank_descriptions_are_treated_as_missing() {
        let q = image_question(Some("  "), Some(""));
        let (first, _) = ExamService::image_descriptions(&q);
        assert_eq!(first, STOCK_IMAGE_DESCRIPTION);
    }
}
