use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::common::ListingId;

/// Listing - a business listing as submitted by an end user and stored by the
/// repository collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub id: ListingId,

    // Content
    pub name: String,
    pub address: String,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub description: Option<String>,

    // Location
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,

    // Hours: either free text or the `{"openhours":[...],"note":""}` document
    pub opening_hours: Option<String>,
    pub closed_days: Option<String>,

    // Categorization
    #[serde(default)]
    pub category_flags: BTreeMap<String, bool>,
    pub category_path: String,

    // Submission tracking
    pub submitted_by: String,

    pub status: ListingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Listing {
    /// Last time the submitter touched the listing (falls back to creation).
    pub fn last_modified_at(&self) -> DateTime<Utc> {
        self.updated_at.unwrap_or(self.created_at)
    }

    /// Current stored text for a writable field, as it would appear in an
    /// audit diff. Coordinates are rendered with `f64`'s shortest form.
    pub fn field_text(&self, field: super::ListingField) -> Option<String> {
        use super::ListingField as F;

        match field {
            F::Name => Some(self.name.clone()),
            F::Address => Some(self.address.clone()),
            F::Phone => self.phone.clone(),
            F::Website => self.website.clone(),
            F::Latitude => self.latitude.map(|v| v.to_string()),
            F::Longitude => self.longitude.map(|v| v.to_string()),
            F::OpeningHours => self.opening_hours.clone(),
            F::Description => self.description.clone(),
            F::ClosedDays => self.closed_days.clone(),
            F::Location | F::Categories | F::CategoryFlags => None,
        }
    }
}

/// Review status, stored as an integer code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "i32", try_from = "i32")]
pub enum ListingStatus {
    Pending,
    Approved,
    Rejected,
}

impl ListingStatus {
    pub fn code(&self) -> i32 {
        match self {
            ListingStatus::Pending => 0,
            ListingStatus::Approved => 1,
            ListingStatus::Rejected => -1,
        }
    }

    /// Approved and rejected are terminal for the review pipeline.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ListingStatus::Pending)
    }
}

impl From<ListingStatus> for i32 {
    fn from(status: ListingStatus) -> Self {
        status.code()
    }
}

impl TryFrom<i32> for ListingStatus {
    type Error = anyhow::Error;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(ListingStatus::Pending),
            1 => Ok(ListingStatus::Approved),
            -1 => Ok(ListingStatus::Rejected),
            _ => Err(anyhow::anyhow!("Invalid listing status code: {}", code)),
        }
    }
}

impl std::fmt::Display for ListingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListingStatus::Pending => write!(f, "pending"),
            ListingStatus::Approved => write!(f, "approved"),
            ListingStatus::Rejected => write!(f, "rejected"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_roundtrip_through_serde() {
        assert_eq!(serde_json::to_string(&ListingStatus::Rejected).unwrap(), "-1");
        let status: ListingStatus = serde_json::from_str("1").unwrap();
        assert_eq!(status, ListingStatus::Approved);
        assert!(serde_json::from_str::<ListingStatus>("2").is_err());
    }

    #[test]
    fn test_only_pending_is_open() {
        assert!(!ListingStatus::Pending.is_terminal());
        assert!(ListingStatus::Approved.is_terminal());
        assert!(ListingStatus::Rejected.is_terminal());
    }
}
