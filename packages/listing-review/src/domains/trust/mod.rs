//! Trust domain - how much weight a submitter's self-reported data gets.

pub mod assessment;

pub use assessment::{assess_submitter, Authority, TrustAssessment, TRUSTED_THRESHOLD};
