use serde::{Deserialize, Serialize};
use std::fmt;

/// The six fixed grading dimensions of GCSE English Language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AssessmentObjective {
    #[serde(rename = "AO1")]
    Ao1,
    #[serde(rename = "AO2")]
    Ao2,
    #[serde(rename = "AO3")]
    Ao3,
    #[serde(rename = "AO4")]
    Ao4,
    #[serde(rename = "AO5")]
    Ao5,
    #[serde(rename = "AO6")]
    Ao6,
}

impl fmt::Display for AssessmentObjective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AssessmentObjective::Ao1 => "AO1",
            AssessmentObjective::Ao2 => "AO2",
            AssessmentObjective::Ao3 => "AO3",
            AssessmentObjective::Ao4 => "AO4",
            AssessmentObjective::Ao5 => "AO5",
            AssessmentObjective::Ao6 => "AO6",
        };
        f.write_str(s)
    }
}

/// One performance band within an objective's mark range.
///
/// The table below is the marking contract shared with the grading model.
/// Band boundaries are fixed lookup constants and are never recomputed.
/// AO1 and AO3 responses are marked by point-count and carry no bands.
#[derive(Debug, Clone, Serialize)]
pub struct RubricBand {
    pub objective: AssessmentObjective,
    pub level: i32,
    pub mark_low: i32,
    pub mark_high: i32,
    pub descriptor: &'static str,
}

const fn band(
    objective: AssessmentObjective,
    level: i32,
    mark_low: i32,
    mark_high: i32,
    descriptor: &'static str,
) -> RubricBand {
    RubricBand {
        objective,
        level,
        mark_low,
        mark_high,
        descriptor,
    }
}

pub const RUBRIC_BANDS: &[RubricBand] = &[
    // AO2: language and structure analysis, 8-mark reading questions
    band(
        AssessmentObjective::Ao2,
        1,
        1,
        2,
        "Simple awareness of language or structure; paraphrase rather than analysis; little or no subject terminology.",
    ),
    band(
        AssessmentObjective::Ao2,
        2,
        3,
        4,
        "Some understanding of the writer's methods; attempts to comment on effects; some relevant terminology.",
    ),
    band(
        AssessmentObjective::Ao2,
        3,
        5,
        6,
        "Clear understanding of the writer's methods; clear explanation of effects; relevant terminology used accurately.",
    ),
    band(
        AssessmentObjective::Ao2,
        4,
        7,
        8,
        "Perceptive, detailed analysis of the writer's methods; judicious textual detail; sophisticated and accurate terminology.",
    ),
    // AO4: critical evaluation, 20-mark reading questions
    band(
        AssessmentObjective::Ao4,
        1,
        1,
        5,
        "Simple, limited evaluation; simple personal response with little textual support.",
    ),
    band(
        AssessmentObjective::Ao4,
        2,
        6,
        10,
        "Some evaluative comments on the text and the writer's methods; some appropriate textual references.",
    ),
    band(
        AssessmentObjective::Ao4,
        3,
        11,
        15,
        "Clear and relevant evaluation; clear response to the statement supported by a range of textual references.",
    ),
    band(
        AssessmentObjective::Ao4,
        4,
        16,
        20,
        "Perceptive and detailed evaluation; convincing critical response rooted in judiciously selected detail.",
    ),
    // AO5: content and organisation, 24 marks of each writing task
    band(
        AssessmentObjective::Ao5,
        1,
        1,
        4,
        "Simple communication of one or two ideas; little awareness of purpose, audience or form; limited paragraphing.",
    ),
    band(
        AssessmentObjective::Ao5,
        2,
        5,
        9,
        "Some sustained attempt to match purpose and audience; some linked ideas; attempts at structural features.",
    ),
    band(
        AssessmentObjective::Ao5,
        3,
        10,
        14,
        "Generally matched register and clear purpose; engaging ideas; clear paragraphing with connected ideas.",
    ),
    band(
        AssessmentObjective::Ao5,
        4,
        15,
        19,
        "Consistently matched register; convincing and compelling ideas; coherent structure with integrated discourse markers.",
    ),
    band(
        AssessmentObjective::Ao5,
        5,
        20,
        24,
        "Compelling, crafted writing; subtle and sustained control of tone, structure and detail throughout.",
    ),
    // AO6: technical accuracy, 16 marks of each writing task
    band(
        AssessmentObjective::Ao6,
        1,
        1,
        3,
        "Occasional accurate sentence demarcation; simple vocabulary; frequent spelling errors impede meaning.",
    ),
    band(
        AssessmentObjective::Ao6,
        2,
        4,
        6,
        "Mostly secure demarcation; some control of sentence forms; accurate basic spelling.",
    ),
    band(
        AssessmentObjective::Ao6,
        3,
        7,
        9,
        "Mostly accurate punctuation; varied sentence forms for effect; generally accurate spelling including complex words.",
    ),
    band(
        AssessmentObjective::Ao6,
        4,
        10,
        12,
        "Wide range of punctuation used with accuracy; sustained variety of sentence forms; high level of spelling accuracy.",
    ),
    band(
        AssessmentObjective::Ao6,
        5,
        13,
        16,
        "Ambitious, precise vocabulary and punctuation used with craft; virtually error-free writing.",
    ),
];

/// Bands for one objective, in ascending level order (the table is stored sorted).
pub fn bands_for(objective: AssessmentObjective) -> impl Iterator<Item = &'static RubricBand> {
    RUBRIC_BANDS.iter().filter(move |b| b.objective == objective)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_ranges_are_contiguous_and_ascending() {
        for objective in [
            AssessmentObjective::Ao2,
            AssessmentObjective::Ao4,
            AssessmentObjective::Ao5,
            AssessmentObjective::Ao6,
        ] {
            let bands: Vec<_> = bands_for(objective).collect();
            assert!(!bands.is_empty(), "{} has no bands", objective);
            for (i, b) in bands.iter().enumerate() {
                assert_eq!(b.level, (i as i32) + 1, "{} levels not ascending", objective);
                assert!(b.mark_low <= b.mark_high);
                if i > 0 {
                    assert_eq!(
                        b.mark_low,
                        bands[i - 1].mark_high + 1,
                        "{} ranges not contiguous at level {}",
                        objective,
                        b.level
                    );
                }
            }
        }
    }

    #[test]
    fn point_count_objectives_have_no_bands() {
        assert_eq!(bands_for(AssessmentObjective::Ao1).count(), 0);
        assert_eq!(bands_for(AssessmentObjective::Ao3).count(), 0);
    }

    #[test]
    fn writing_band_totals_match_mark_split() {
        assert_eq!(bands_for(AssessmentObjective::Ao5).last().unwrap().mark_high, 24);
        assert_eq!(bands_for(AssessmentObjective::Ao6).last().unwrap().mark_high, 16);
    }

    #[test]
    fn objective_serializes_to_wire_tag() {
        let tag = serde_json::to_string(&AssessmentObjective::Ao3).unwrap();
        assert_eq!(tag, "\"AO3\"");
    }
}
