//! AI suggestions domain - optional quality fixes produced by the validator model.

pub mod extractor;

pub use extractor::{extract_suggestions, AiSuggestions, PathValidation};
