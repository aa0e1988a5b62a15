pub mod flashcard;
pub mod group;
pub mod study_session;

pub use flashcard::Flashcard;
pub use group::Group;
pub use study_session::{AnswerOutcome, SessionState, SessionStats, StudySession};
