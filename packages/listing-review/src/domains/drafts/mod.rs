//! Drafts domain - ephemeral per-listing edit overlays made by reviewers.

pub mod models;
pub mod store;

pub use models::{Draft, DraftField};
pub use store::DraftStore;
