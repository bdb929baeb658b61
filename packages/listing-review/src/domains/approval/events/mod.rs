use serde::{Deserialize, Serialize};

use crate::common::{ListingId, MemberId};
use crate::domains::listings::ListingField;

/// Review events - facts about what happened to a listing under review.
///
/// Emitted through the injected `BaseReviewEventSink`; sinks decide whether
/// they become metrics, log lines or notifications.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReviewEvent {
    DraftSaved {
        listing_id: ListingId,
        editor_id: MemberId,
        fields: usize,
    },
    DraftDiscarded {
        listing_id: ListingId,
    },
    ApprovalBlocked {
        listing_id: ListingId,
        admin_id: MemberId,
        reason: String,
    },
    ListingApproved {
        listing_id: ListingId,
        admin_id: MemberId,
        replaced_fields: Vec<ListingField>,
    },
    ListingRejected {
        listing_id: ListingId,
        admin_id: MemberId,
    },
}

impl ReviewEvent {
    pub fn listing_id(&self) -> ListingId {
        match self {
            ReviewEvent::DraftSaved { listing_id, .. }
            | ReviewEvent::DraftDiscarded { listing_id }
            | ReviewEvent::ApprovalBlocked { listing_id, .. }
            | ReviewEvent::ListingApproved { listing_id, .. }
            | ReviewEvent::ListingRejected { listing_id, .. } => *listing_id,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ReviewEvent::DraftSaved { .. } => "draft_saved",
            ReviewEvent::DraftDiscarded { .. } => "draft_discarded",
            ReviewEvent::ApprovalBlocked { .. } => "approval_blocked",
            ReviewEvent::ListingApproved { .. } => "listing_approved",
            ReviewEvent::ListingRejected { .. } => "listing_rejected",
        }
    }
}
