use thiserror::Error;

use crate::common::ListingId;
use crate::domains::listings::ListingStatus;

/// Why a listing may not be approved yet
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EligibilityError {
    #[error("no validation history for listing {0}")]
    NoValidationHistory(ListingId),

    #[error("latest validation status is '{status}', expected 'approved'")]
    NotApproved { status: String },

    #[error("latest validation score {score} is below the approval threshold {threshold}")]
    ScoreBelowThreshold { score: f64, threshold: f64 },
}

/// Errors surfaced by the review actions
#[derive(Error, Debug)]
pub enum ReviewError {
    #[error("Listing not found: {0}")]
    ListingNotFound(ListingId),

    #[error("Listing {listing_id} is already {status}")]
    AlreadyReviewed {
        listing_id: ListingId,
        status: ListingStatus,
    },

    #[error("Approval blocked: {0}")]
    Ineligible(#[from] EligibilityError),

    #[error("A rejection reason is required")]
    EmptyRejectionReason,

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}
