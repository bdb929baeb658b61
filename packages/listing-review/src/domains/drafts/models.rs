use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::common::{ListingId, MemberId};
use crate::domains::listings::{ListingField, Provenance};

/// A reviewer's pending value for one field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftField {
    pub value: String,
    /// Source of the combined value this edit overrides
    pub original_source: Provenance,
}

impl DraftField {
    pub fn new(value: impl Into<String>, original_source: Provenance) -> Self {
        Self {
            value: value.into(),
            original_source,
        }
    }
}

/// Unsaved edits for a listing. At most one exists per listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Draft {
    pub listing_id: ListingId,
    pub editor_id: MemberId,
    pub fields: BTreeMap<ListingField, DraftField>,
    pub updated_at: DateTime<Utc>,
}

impl Draft {
    /// The edited value for `field`, if the editor touched it.
    pub fn value(&self, field: ListingField) -> Option<&str> {
        self.fields.get(&field).map(|f| f.value.as_str())
    }
}
