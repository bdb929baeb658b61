//! Review actions
//!
//! Entry points called by the admin review surface. They take raw Uuid types,
//! do the work synchronously and return simple values.
//!
//! Flow for approval:
//! - gate on the latest validation run
//! - merge draft > AI suggestion > combined value into the write payload
//! - write listing, then audit log, then drop the draft and emit an event

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::assembler::{ApprovalAssembler, ApprovalInput};
use super::audit::AuditEntry;
use super::eligibility::{check_eligibility, ensure_eligible};
use super::error::ReviewError;
use super::events::ReviewEvent;
use crate::common::{ListingId, MemberId};
use crate::domains::drafts::{Draft, DraftField};
use crate::domains::listings::{
    CombinedInfoBuilder, CombinedListing, Listing, ListingField, PlaceData, Submitter,
    ValidationHistoryEntry,
};
use crate::domains::suggestions::AiSuggestions;
use crate::domains::trust::{assess_submitter, TrustAssessment};
use crate::kernel::ReviewDeps;

/// Result of a review decision (for the admin surface)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewResult {
    pub listing_id: Uuid,
    pub status: String,
    pub message: Option<String>,
}

impl ReviewResult {
    /// Describe a failed action. Gate failures report `blocked`.
    pub fn from_error(listing_id: Uuid, error: &ReviewError) -> Self {
        let status = match error {
            ReviewError::Ineligible(_) => "blocked",
            ReviewError::ListingNotFound(_) => "not_found",
            ReviewError::AlreadyReviewed { .. } => "already_reviewed",
            ReviewError::EmptyRejectionReason => "invalid",
            ReviewError::Serialization(_) | ReviewError::Internal(_) => "error",
        };

        Self {
            listing_id,
            status: status.to_string(),
            message: Some(error.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApproveListingRequest {
    pub listing_id: Uuid,
    pub admin_id: Uuid,
    pub notes: Option<String>,
}

/// Everything a reviewer sees before deciding
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewView {
    pub listing: Listing,
    pub trust: TrustAssessment,
    pub combined: CombinedListing,
    pub suggestions: AiSuggestions,
    pub latest_entry: Option<ValidationHistoryEntry>,
    pub draft: Option<Draft>,
    /// Why approval would currently be refused, if it would
    pub blocked_reason: Option<String>,
}

// ============================================================================
// Shared loading
// ============================================================================

async fn find_pending_listing(
    listing_id: ListingId,
    deps: &ReviewDeps,
) -> Result<Listing, ReviewError> {
    let listing = deps
        .listings
        .find_listing(listing_id)
        .await
        .context(format!("Failed to load listing {}", listing_id))?
        .ok_or(ReviewError::ListingNotFound(listing_id))?;

    if listing.status.is_terminal() {
        return Err(ReviewError::AlreadyReviewed {
            listing_id,
            status: listing.status,
        });
    }

    Ok(listing)
}

/// Submitter for the listing; unknown members get no trust signals.
async fn load_trust(listing: &Listing, deps: &ReviewDeps) -> Result<TrustAssessment, ReviewError> {
    let submitter = deps
        .listings
        .find_submitter(listing)
        .await
        .context(format!("Failed to load submitter for listing {}", listing.id))?
        .unwrap_or_else(|| {
            debug!(
                listing_id = %listing.id,
                submitted_by = %listing.submitted_by,
                "Submitter not found, treating as untrusted"
            );
            Submitter {
                username: listing.submitted_by.clone(),
                ..Default::default()
            }
        });

    Ok(assess_submitter(&submitter, &listing.category_path))
}

/// Third-party data is optional; lookup failures degrade to none.
async fn load_place_data(listing_id: ListingId, deps: &ReviewDeps) -> Option<PlaceData> {
    match deps.listings.find_place_data(listing_id).await {
        Ok(place) => place,
        Err(e) => {
            warn!(
                listing_id = %listing_id,
                error = %e,
                "Place data lookup failed, continuing without it"
            );
            None
        }
    }
}

// ============================================================================
// Entry Point: Load Review
// ============================================================================

/// Gather the listing, its merged view and the reviewer's draft.
///
/// Missing place data, history or draft never fail the load.
pub async fn load_review(listing_id: Uuid, deps: &ReviewDeps) -> Result<ReviewView, ReviewError> {
    let listing_id = ListingId::from_uuid(listing_id);

    let listing = deps
        .listings
        .find_listing(listing_id)
        .await
        .context(format!("Failed to load listing {}", listing_id))?
        .ok_or(ReviewError::ListingNotFound(listing_id))?;

    let trust = load_trust(&listing, deps).await?;
    let place = load_place_data(listing_id, deps).await;

    let history = match deps.history.history_for_listing(listing_id).await {
        Ok(history) => history,
        Err(e) => {
            warn!(listing_id = %listing_id, error = %e, "Validation history unavailable");
            Vec::new()
        }
    };

    let threshold = deps.config.approval_score_threshold;
    let blocked_reason = check_eligibility(listing_id, &history, threshold)
        .err()
        .map(|e| e.to_string());
    let latest_entry = ValidationHistoryEntry::latest(&history).cloned();
    let draft = deps.drafts.get(listing_id).await;

    let input = ApprovalInput {
        listing: &listing,
        trust: &trust,
        place: place.as_ref(),
        latest_entry: latest_entry.as_ref(),
        draft: draft.as_ref(),
    };
    let resolved_place = input.resolve_place();
    let suggestions = input.suggestions();
    let combined =
        CombinedInfoBuilder::from_config(&deps.config).build(&listing, &trust, resolved_place.as_ref());

    debug!(
        listing_id = %listing_id,
        authority = %trust.authority,
        has_draft = draft.is_some(),
        blocked = blocked_reason.is_some(),
        "Loaded review"
    );

    Ok(ReviewView {
        listing,
        trust,
        combined,
        suggestions,
        latest_entry,
        draft,
        blocked_reason,
    })
}

// ============================================================================
// Entry Point: Approve Listing
// ============================================================================

/// Approve a pending listing, writing merged field overrides.
///
/// Nothing is written when the approval gate fails. The draft is read once
/// and deleted after the write; a draft saved in between is dropped without
/// being applied, since the draft store only locks per call.
pub async fn approve_listing(
    request: ApproveListingRequest,
    deps: &ReviewDeps,
) -> Result<ReviewResult, ReviewError> {
    let listing_id = ListingId::from_uuid(request.listing_id);
    let admin_id = MemberId::from_uuid(request.admin_id);

    info!(listing_id = %listing_id, admin_id = %admin_id, "Approving listing");

    let listing = find_pending_listing(listing_id, deps).await?;

    let threshold = deps.config.approval_score_threshold;
    let latest_entry = match ensure_eligible(listing_id, threshold, deps.history.as_ref()).await {
        Ok(entry) => entry,
        Err(ReviewError::Ineligible(reason)) => {
            deps.emit(ReviewEvent::ApprovalBlocked {
                listing_id,
                admin_id,
                reason: reason.to_string(),
            });
            return Err(ReviewError::Ineligible(reason));
        }
        Err(e) => return Err(e),
    };

    let trust = load_trust(&listing, deps).await?;
    let place = load_place_data(listing_id, deps).await;
    let draft = deps.drafts.get(listing_id).await;

    let payload = ApprovalAssembler::from_config(&deps.config).assemble(
        ApprovalInput {
            listing: &listing,
            trust: &trust,
            place: place.as_ref(),
            latest_entry: Some(&latest_entry),
            draft: draft.as_ref(),
        },
        admin_id,
        request.notes,
    )?;

    let audit_entry = AuditEntry::approval(
        listing_id,
        admin_id,
        payload.notes.clone(),
        &payload.replacements,
    )?;

    deps.listings
        .apply_approval(&payload)
        .await
        .context(format!("Failed to write approval for listing {}", listing_id))?;

    if let Err(e) = deps.audit_log.append(audit_entry).await {
        warn!(
            listing_id = %listing_id,
            admin_id = %admin_id,
            error = %e,
            "Listing approved but audit entry was not written"
        );
        return Err(ReviewError::Internal(e.context(format!(
            "Failed to write audit entry for approved listing {}",
            listing_id
        ))));
    }

    deps.drafts.delete(listing_id).await;

    let replaced_fields = payload.replacements.fields();
    info!(
        listing_id = %listing_id,
        admin_id = %admin_id,
        replaced = replaced_fields.len(),
        "Listing approved"
    );

    let message = if replaced_fields.is_empty() {
        "Listing approved".to_string()
    } else {
        format!("Listing approved with {} field update(s)", replaced_fields.len())
    };

    deps.emit(ReviewEvent::ListingApproved {
        listing_id,
        admin_id,
        replaced_fields,
    });

    Ok(ReviewResult {
        listing_id: listing_id.into_uuid(),
        status: "approved".to_string(),
        message: Some(message),
    })
}

// ============================================================================
// Entry Point: Reject Listing
// ============================================================================

/// Reject a pending listing. The reason is required and is the only thing
/// recorded in the audit log.
pub async fn reject_listing(
    listing_id: Uuid,
    admin_id: Uuid,
    reason: &str,
    deps: &ReviewDeps,
) -> Result<ReviewResult, ReviewError> {
    let listing_id = ListingId::from_uuid(listing_id);
    let admin_id = MemberId::from_uuid(admin_id);

    let reason = reason.trim();
    if reason.is_empty() {
        return Err(ReviewError::EmptyRejectionReason);
    }

    info!(listing_id = %listing_id, admin_id = %admin_id, "Rejecting listing");

    find_pending_listing(listing_id, deps).await?;

    deps.listings
        .mark_rejected(listing_id, admin_id, reason)
        .await
        .context(format!("Failed to write rejection for listing {}", listing_id))?;

    deps.audit_log
        .append(AuditEntry::rejection(listing_id, admin_id, reason))
        .await
        .context(format!("Failed to write audit entry for listing {}", listing_id))?;

    deps.drafts.delete(listing_id).await;
    deps.emit(ReviewEvent::ListingRejected {
        listing_id,
        admin_id,
    });

    Ok(ReviewResult {
        listing_id: listing_id.into_uuid(),
        status: "rejected".to_string(),
        message: Some("Listing rejected".to_string()),
    })
}

// ============================================================================
// Drafts
// ============================================================================

/// Store the reviewer's edits, replacing any earlier draft for the listing.
pub async fn save_draft(
    listing_id: Uuid,
    editor_id: Uuid,
    fields: BTreeMap<ListingField, DraftField>,
    deps: &ReviewDeps,
) -> Draft {
    let listing_id = ListingId::from_uuid(listing_id);
    let editor_id = MemberId::from_uuid(editor_id);

    let draft = deps.drafts.save(listing_id, editor_id, fields).await;
    deps.emit(ReviewEvent::DraftSaved {
        listing_id,
        editor_id,
        fields: draft.fields.len(),
    });

    draft
}

/// Drop the listing's draft. Returns whether one existed.
pub async fn discard_draft(listing_id: Uuid, deps: &ReviewDeps) -> bool {
    let listing_id = ListingId::from_uuid(listing_id);

    let removed = deps.drafts.delete(listing_id).await;
    if removed {
        deps.emit(ReviewEvent::DraftDiscarded { listing_id });
    }

    removed
}
