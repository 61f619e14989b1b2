//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent lookups against the collection that found nothing.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("dictionary '{0}' not found")]
    DictionaryNotFound(String),

    #[error("dictionary '{dictionary}' does not contain word '{word}'")]
    WordNotFound { dictionary: String, word: String },
}

