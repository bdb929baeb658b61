//! Listings domain - listing records, their collaborators' data, and the
//! combined view merged from submitter and third-party sources.

pub mod combined;
pub mod models;

pub use combined::{CombinedInfoBuilder, CombinedListing};
pub use models::*;
