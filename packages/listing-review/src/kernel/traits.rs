// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no review logic.
// Review logic lives in domain functions that take these traits.
//
// Naming convention: Base* for trait names (e.g., BaseListingRepository)

use anyhow::Result;
use async_trait::async_trait;

use crate::common::{ListingId, MemberId};
use crate::domains::approval::{ApprovalPayload, AuditEntry, ReviewEvent};
use crate::domains::listings::{Listing, PlaceData, Submitter, ValidationHistoryEntry};

// =============================================================================
// Listing storage
// =============================================================================

#[async_trait]
pub trait BaseListingRepository: Send + Sync {
    async fn find_listing(&self, listing_id: ListingId) -> Result<Option<Listing>>;

    /// The member who submitted `listing`, with their trust signals
    async fn find_submitter(&self, listing: &Listing) -> Result<Option<Submitter>>;

    /// Third-party place data fetched for the listing, if any
    async fn find_place_data(&self, listing_id: ListingId) -> Result<Option<PlaceData>>;

    /// Write the payload's field overrides and mark the listing approved
    async fn apply_approval(&self, payload: &ApprovalPayload) -> Result<()>;

    /// Mark the listing rejected
    async fn mark_rejected(
        &self,
        listing_id: ListingId,
        admin_id: MemberId,
        reason: &str,
    ) -> Result<()>;
}

// =============================================================================
// Validation history
// =============================================================================

#[async_trait]
pub trait BaseValidationHistory: Send + Sync {
    async fn history_for_listing(&self, listing_id: ListingId)
        -> Result<Vec<ValidationHistoryEntry>>;
}

// =============================================================================
// Audit log
// =============================================================================

/// Appended after the listing write succeeds. A failed append leaves the
/// listing approved without an audit entry; actions log it and return an error.
#[async_trait]
pub trait BaseAuditLog: Send + Sync {
    async fn append(&self, entry: AuditEntry) -> Result<()>;
}

// =============================================================================
// Review events (counters, notifications)
// =============================================================================

pub trait BaseReviewEventSink: Send + Sync {
    fn emit(&self, event: ReviewEvent);
}
