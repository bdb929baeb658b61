//! Approval domain - eligibility gate, payload assembly, audit diff and the
//! approve/reject entry points built on top of them.
//!
//! Flow:
//! - gate on the latest validation run (status + score)
//! - merge draft > AI suggestion > combined value into a write payload
//! - diff the payload against the stored listing for the audit log

pub mod actions;
pub mod assembler;
pub mod audit;
pub mod eligibility;
pub mod error;
pub mod events;

pub use actions::{
    approve_listing, discard_draft, load_review, reject_listing, save_draft,
    ApproveListingRequest, ReviewResult, ReviewView,
};
pub use assembler::{ApprovalAssembler, ApprovalInput, ApprovalPayload, ListingUpdate, ValueOrigin};
pub use audit::{AuditAction, AuditEntry, Replacement, Replacements};
pub use eligibility::{check_eligibility, ensure_eligible};
pub use error::{EligibilityError, ReviewError};
pub use events::ReviewEvent;
