pub mod config;
pub mod export;
pub mod models;
pub mod store;

pub use models::{AnswerOutcome, Flashcard, Group, SessionState, SessionStats, StudySession};
pub use store::{FlashcardStore, StoreError};
