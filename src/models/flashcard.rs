//! Flashcard is a pair <question, answer>. Only text is used in both fields
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashcard {
    pub question: String,
    pub answer: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Flashcard {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            extra: Map::new(),
        }
    }

    /// Case-insensitive exact comparison against the stored answer.
    pub fn is_correct(&self, attempt: &str) -> bool {
        attempt.to_lowercase() == self.answer.to_lowercase()
    }
}
