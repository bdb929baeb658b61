use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::common::{ListingId, ValidationRunId};

/// Status string written by the validator when a listing passes.
pub const VALIDATION_STATUS_APPROVED: &str = "approved";

/// One automated validation pass over a listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationHistoryEntry {
    pub id: ValidationRunId,
    pub listing_id: ListingId,
    pub status: String, // 'approved', 'rejected', 'manual_review', ...
    pub score: f64,
    pub notes: Option<String>,
    #[serde(default)]
    pub score_breakdown: serde_json::Value,
    pub raw_ai_output: Option<String>,
    pub cached_place_data: Option<String>,
    pub processed_at: DateTime<Utc>,
}

impl ValidationHistoryEntry {
    pub fn is_approved(&self) -> bool {
        self.status == VALIDATION_STATUS_APPROVED
    }

    /// Entry with the latest `processed_at`. On equal timestamps the entry
    /// seen first is kept.
    pub fn latest(entries: &[ValidationHistoryEntry]) -> Option<&ValidationHistoryEntry> {
        entries.iter().fold(None, |latest, entry| match latest {
            Some(current) if entry.processed_at <= current.processed_at => Some(current),
            _ => Some(entry),
        })
    }
}
