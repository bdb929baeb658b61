use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::assembler::ListingUpdate;
use crate::common::{ListingId, MemberId};
use crate::domains::listings::{Listing, ListingField};

/// One changed field: stored value before approval and the value written
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Replacement {
    pub old: String,
    pub new: String,
}

/// Field-level diff recorded alongside an approval audit entry.
///
/// Serializes as `{"name":{"old":"...","new":"..."}, ...}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Replacements(BTreeMap<ListingField, Replacement>);

impl Replacements {
    /// Diff the stored listing against the fields an approval will write.
    /// Fields whose new value equals the stored one are left out.
    pub fn between(listing: &Listing, update: &ListingUpdate) -> Self {
        let changes = update
            .entries()
            .into_iter()
            .filter_map(|(field, new)| {
                let old = listing.field_text(field).unwrap_or_default();
                (old != new).then_some((field, Replacement { old, new }))
            })
            .collect();

        Self(changes)
    }

    pub fn has_replacements(&self) -> bool {
        !self.0.is_empty()
    }

    pub fn get(&self, field: ListingField) -> Option<&Replacement> {
        self.0.get(&field)
    }

    pub fn fields(&self) -> Vec<ListingField> {
        self.0.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    Approve,
    Reject,
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuditAction::Approve => write!(f, "approve"),
            AuditAction::Reject => write!(f, "reject"),
        }
    }
}

/// Audit log record for a review decision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub listing_id: ListingId,
    pub admin_id: MemberId,
    pub action: AuditAction,
    /// Admin notes on approval; the rejection reason on rejection
    pub notes: Option<String>,
    /// Serialized `Replacements`, only for approvals that changed fields
    pub replacements: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl AuditEntry {
    pub fn approval(
        listing_id: ListingId,
        admin_id: MemberId,
        notes: Option<String>,
        replacements: &Replacements,
    ) -> Result<Self, serde_json::Error> {
        let replacements = if replacements.has_replacements() {
            Some(replacements.to_json()?)
        } else {
            None
        };

        Ok(Self {
            listing_id,
            admin_id,
            action: AuditAction::Approve,
            notes,
            replacements,
            created_at: Utc::now(),
        })
    }

    pub fn rejection(listing_id: ListingId, admin_id: MemberId, reason: &str) -> Self {
        Self {
            listing_id,
            admin_id,
            action: AuditAction::Reject,
            notes: Some(reason.to_string()),
            replacements: None,
            created_at: Utc::now(),
        }
    }
}
