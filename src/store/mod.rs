pub mod json_store;

pub use json_store::{DEFAULT_FILE_NAME, FlashcardStore, Result, StoreError};
