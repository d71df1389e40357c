use crate::models::paper::{ExamPaper, PaperType};
use crate::models::rubric::{bands_for, AssessmentObjective};
use crate::services::reconcile_service::{MarkingRequestItem, NO_ANSWER_SENTINEL};

/// Deterministic prompt templating for the generation and marking calls.
/// Pure string rendering: no network, no side effects. Invalid paper types
/// are unrepresentable because `PaperType` is the argument.
pub struct PromptService;

const GENERATION_SCHEMA: &str = r#"{
  "id": "string",
  "paperType": "PAPER_1",
  "title": "string",
  "description": "string",
  "timeLimitMinutes": 105,
  "sources": [
    {
      "id": "A",
      "title": "string",
      "author": "string",
      "year": "string",
      "content": "the full source text",
      "summary": "one-sentence summary"
    }
  ],
  "questions": [
    {
      "id": "q1",
      "number": 1,
      "text": "string",
      "marks": 4,
      "assessmentObjectives": ["AO1"],
      "section": "A",
      "sourceRef": "A",
      "type": "short",
      "optionalGroup": null,
      "wordCountTarget": null,
      "imagePromptDescription": null,
      "imagePromptDescription2": null
    }
  ]
}"#;

const MARKING_SCHEMA: &str = r#"{
  "totalScore": 0,
  "maxScore": 0,
  "gradeEstimate": "one of 1, 2, 3, 4, 5, 6, 7, 8, 9 or U",
  "overallFeedback": "string",
  "questionResults": [
    {
      "questionId": "q1",
      "questionNumber": 1,
      "score": 0,
      "level": 0,
      "assessmentObjectiveScores": { "AO5": 0, "AO6": 0 },
      "feedback": "string",
      "modelAnswer": "a full model answer",
      "comparisonPoints": [
        { "kind": "strength | weakness | improvement", "text": "string" }
      ]
    }
  ]
}"#;

impl PromptService {
    pub fn build_generation_prompt(paper_type: PaperType) -> String {
        let structure = match paper_type {
            PaperType::Paper1 => PAPER_1_STRUCTURE,
            PaperType::Paper2 => PAPER_2_STRUCTURE,
        };

        format!(
            "You are an experienced GCSE English Language examiner writing a brand new mock \
             exam paper.\n\n\
             {structure}\n\n\
             Return ONLY a JSON object with exactly this shape (no markdown, no commentary):\n\
             {schema}\n\n\
             Hard constraints:\n\
             - Invent the source text(s) yourself, in period-appropriate prose. Never reuse or \
             closely paraphrase a question from a real past paper.\n\
             - The source text is regenerated on every run and has no stable numbering, so \
             question wording must never point at numbered positions in the text. Refer to \
             'the opening', 'the middle section' or 'the final paragraph' instead.\n\
             - Every question's \"marks\" value must be a positive integer and match the \
             structure above exactly.\n\
             - Question ids are \"q1\", \"q2\" and so on, matching \"number\".",
            structure = structure,
            schema = GENERATION_SCHEMA,
        )
    }

    pub fn build_marking_prompt(
        paper_type: PaperType,
        source_excerpts: &[String],
        items: &[MarkingRequestItem],
    ) -> String {
        let paper_name = match paper_type {
            PaperType::Paper1 => "Paper 1 (19th-century fiction reading, plus creative writing)",
            PaperType::Paper2 => "Paper 2 (paired non-fiction reading, plus transactional writing)",
        };

        let excerpts = source_excerpts
            .iter()
            .enumerate()
            .map(|(i, e)| format!("Source {}: {}...", (b'A' + i as u8) as char, e))
            .collect::<Vec<_>>()
            .join("\n\n");

        let items_json = serde_json::to_string_pretty(items).unwrap_or_else(|_| "[]".to_string());

        format!(
            "You are an experienced GCSE English Language examiner marking a student's \
             completed {paper_name} mock paper.\n\n\
             Mark strictly against this rubric:\n{rubric}\n\
             Opening excerpts of the source material (for context only, the student saw the \
             full text):\n{excerpts}\n\n\
             The student's answers:\n{items_json}\n\n\
             Return ONLY a JSON object with exactly this shape (no markdown, no commentary):\n\
             {schema}\n\n\
             Marking rules:\n\
             - Mark every answer item provided above, and only those items.\n\
             - \"score\" must never exceed \"maxMarks\" for that question, and \
             \"assessmentObjectiveScores\" must break the score down across the question's \
             listed objectives.\n\
             - \"level\" is the rubric band the response sits in (0 for point-count \
             questions).\n\
             - An answer given as \"{sentinel}\" scores 0, but must still receive a full \
             model answer and at least one \"improvement\" comparison point explaining what \
             was missing.\n\
             - \"totalScore\" is the sum of the per-question scores; \"maxScore\" is the sum \
             of maxMarks. \"gradeEstimate\" maps the overall performance onto grades 9 to 1, \
             or U.\n\
             - Comparison points compare the student's answer to the model answer: what \
             worked (strength), what fell short (weakness), what to do next time \
             (improvement).",
            paper_name = paper_name,
            rubric = Self::rubric_as_prose(),
            excerpts = excerpts,
            items_json = items_json,
            schema = MARKING_SCHEMA,
            sentinel = NO_ANSWER_SENTINEL,
        )
    }

    /// Prompt for the freeform model-answers document (markdown, not JSON).
    pub fn build_model_answers_prompt(paper: &ExamPaper) -> String {
        let questions = paper
            .questions
            .iter()
            .map(|q| format!("Question {} ({} marks): {}", q.number, q.marks, q.text))
            .collect::<Vec<_>>()
            .join("\n");

        let sources = paper
            .sources
            .iter()
            .map(|s| format!("Source {} - {} by {} ({}):\n{}", s.id, s.title, s.author, s.year, s.content))
            .collect::<Vec<_>>()
            .join("\n\n");

        format!(
            "You are an experienced GCSE English Language examiner. Write full model answers \
             for every question on this mock paper, as a markdown document with one heading \
             per question. For optional questions, answer each alternative. Aim each answer \
             at the top rubric band.\n\n{sources}\n\n{questions}",
            sources = sources,
            questions = questions,
        )
    }

    /// Render the band table as prose for embedding in the marking prompt.
    /// AO1/AO3 have no bands and are described as point-count marked.
    fn rubric_as_prose() -> String {
        let mut out = String::new();
        out.push_str(
            "AO1 (identify and interpret explicit and implicit information) and AO3 \
             (compare writers' ideas and perspectives) are marked by point-count: one mark \
             per valid, distinct point, up to the question's maxMarks.\n",
        );

        for (objective, heading) in [
            (AssessmentObjective::Ao2, "AO2 (analyse language and structure)"),
            (AssessmentObjective::Ao4, "AO4 (evaluate texts critically)"),
            (AssessmentObjective::Ao5, "AO5 (writing: content and organisation, 24 marks)"),
            (AssessmentObjective::Ao6, "AO6 (writing: technical accuracy, 16 marks)"),
        ] {
            out.push_str(heading);
            out.push_str(":\n");
            for band in bands_for(objective) {
                out.push_str(&format!(
                    "  Level {} ({}-{} marks): {}\n",
                    band.level, band.mark_low, band.mark_high, band.descriptor
                ));
            }
        }
        out
    }
}

const PAPER_1_STRUCTURE: &str = "\
Paper 1: Explorations in Creative Reading and Writing. Time allowed: 105 minutes. \
Exactly ONE source: an extract from a 19th-century work of fiction that you invent.\n\
Section A (reading, about the source):\n\
- Question 1: 4 marks, AO1, type \"short\". List four explicit things from the opening of the source.\n\
- Question 2: 8 marks, AO2, type \"long\". Analyse the writer's use of language in part of the source.\n\
- Question 3: 8 marks, AO2, type \"long\". Analyse how the writer structures the whole source.\n\
- Question 4: 20 marks, AO4, type \"long\". Evaluate a critical statement about the source.\n\
Section B (writing, a two-way choice, optionalGroup \"paper1-writing\" on both):\n\
- Question 5: 40 marks, AO5 and AO6, type \"extended\". A descriptive writing task prompted \
by a picture. Set \"imagePromptDescription\" to a vivid one-sentence description of a scene \
an artist could paint for this task, and \"imagePromptDescription2\" to a contrasting \
second scene for the same task. wordCountTarget 500.\n\
- Question 6: 40 marks, AO5 and AO6, type \"extended\". A narrative writing task on a \
related theme, no images. wordCountTarget 500.";

const PAPER_2_STRUCTURE: &str = "\
Paper 2: Writers' Viewpoints and Perspectives. Time allowed: 125 minutes. \
Exactly TWO contrasting non-fiction sources that you invent: Source A from the 19th \
century, Source B from the 20th or 21st century, on the same theme.\n\
Section A (reading, about both sources):\n\
- Question 1: 4 marks, AO1, type \"short\". Four true statements about Source A.\n\
- Question 2: 4 marks, AO1, type \"short\". Retrieve explicit information from Source B.\n\
- Question 3: 8 marks, AO2, type \"long\". Analyse the writer's use of language in one source.\n\
- Question 4: 8 marks, AO3, type \"long\". Compare the writers' attitudes in a focused area.\n\
- Question 5: 8 marks, AO3, type \"long\". Compare the methods the writers use to convey \
their perspectives.\n\
- Question 6: 20 marks, AO4, type \"long\". Evaluate which source is more effective and why.\n\
Section B (writing):\n\
- Question 7: 16 marks, AO5 and AO6, type \"long\". A short transactional task (a formal \
letter or notice). wordCountTarget 250.\n\
- Question 8: 24 marks, AO5 and AO6, type \"long\". A longer transactional task (an article \
or speech). wordCountTarget 350.\n\
Then a two-way extended choice, optionalGroup \"paper2-extended\" on both:\n\
- Question 9: 40 marks, AO5 and AO6, type \"extended\". An essay presenting a viewpoint on \
the paper's theme. wordCountTarget 500.\n\
- Question 10: 40 marks, AO5 and AO6, type \"extended\". An essay presenting the opposing \
viewpoint. wordCountTarget 500.";
