// Listing Review - reconciliation core
//
// Merges submitter-provided listing data with third-party place data and
// AI quality suggestions into one combined record, then drives the
// approval/rejection pipeline on top of it.
//
// Storage, HTTP and AI calls are collaborators injected through kernel traits.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;

pub use config::*;
