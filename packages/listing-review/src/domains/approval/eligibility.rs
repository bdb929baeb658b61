use anyhow::Context;
use tracing::{info, warn};

use super::error::{EligibilityError, ReviewError};
use crate::common::ListingId;
use crate::domains::listings::ValidationHistoryEntry;
use crate::kernel::BaseValidationHistory;

/// Check that the latest validation run approved the listing with a score at
/// or above `threshold`.
///
/// The latest run is the one with the greatest `processed_at`; when two runs
/// share a timestamp the one listed first wins.
pub fn check_eligibility(
    listing_id: ListingId,
    history: &[ValidationHistoryEntry],
    threshold: f64,
) -> Result<&ValidationHistoryEntry, EligibilityError> {
    let latest = ValidationHistoryEntry::latest(history)
        .ok_or(EligibilityError::NoValidationHistory(listing_id))?;

    if !latest.is_approved() {
        return Err(EligibilityError::NotApproved {
            status: latest.status.clone(),
        });
    }

    // NaN never meets the threshold
    if latest.score.is_nan() || latest.score < threshold {
        return Err(EligibilityError::ScoreBelowThreshold {
            score: latest.score,
            threshold,
        });
    }

    Ok(latest)
}

/// Fetch the listing's validation history and run the eligibility gate.
///
/// Returns the entry that passed the gate.
pub async fn ensure_eligible(
    listing_id: ListingId,
    threshold: f64,
    history: &dyn BaseValidationHistory,
) -> Result<ValidationHistoryEntry, ReviewError> {
    let entries = history
        .history_for_listing(listing_id)
        .await
        .context(format!("Failed to load validation history for {}", listing_id))?;

    match check_eligibility(listing_id, &entries, threshold) {
        Ok(entry) => {
            info!(
                listing_id = %listing_id,
                validation_id = %entry.id,
                score = entry.score,
                "Listing passed approval gate"
            );
            Ok(entry.clone())
        }
        Err(e) => {
            warn!(listing_id = %listing_id, error = %e, "Listing failed approval gate");
            Err(e.into())
        }
    }
}
