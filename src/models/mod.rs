pub mod answer;
pub mod paper;
pub mod result;
pub mod rubric;
