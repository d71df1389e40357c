use serde::{Deserialize, Serialize};

/// A student's answer to one question. Owned by the external answer-collection
/// flow and consumed read-only here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentAnswer {
    #[serde(default)]
    pub question_id: String,
    #[serde(default)]
    pub text: String,
    /// Only meaningful when the question carries images: 0-based index of the
    /// image prompt the student chose to write about.
    #[serde(default)]
    pub selected_image_index: Option<usize>,
}
