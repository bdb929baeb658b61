//! Approval payload assembly.
//!
//! Each writable field resolves to the first available value of:
//! 1. the reviewer's draft override
//! 2. the AI suggestion (name, description and closed days only)
//! 3. the combined value
//!
//! A resolved value equal to the stored one is left out of the payload, so
//! the write and the audit diff only carry real changes. Opening hours are
//! always recomputed from the combined weekday lines.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

use super::audit::Replacements;
use crate::common::{ListingId, MemberId};
use crate::config::Config;
use crate::domains::drafts::Draft;
use crate::domains::listings::{
    CombinedInfoBuilder, CombinedListing, Listing, ListingField, PlaceData, Provenance,
    ValidationHistoryEntry,
};
use crate::domains::schedules::{transcode_weekday_lines, OpenHours};
use crate::domains::suggestions::{extract_suggestions, AiSuggestions};
use crate::domains::trust::TrustAssessment;

/// Where a resolved value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueOrigin {
    Draft,
    AiSuggestion,
    Submitter,
    ThirdParty,
}

impl ValueOrigin {
    fn from_provenance(provenance: Provenance) -> Option<Self> {
        match provenance {
            Provenance::User => Some(ValueOrigin::Submitter),
            Provenance::ThirdParty => Some(ValueOrigin::ThirdParty),
            Provenance::Unset => None,
        }
    }
}

/// Field overrides to write on approval. `None` leaves the stored value as is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListingUpdate {
    pub name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub opening_hours: Option<String>,
    pub description: Option<String>,
    pub closed_days: Option<String>,
}

impl ListingUpdate {
    /// Set fields in their text form, in `ListingField::WRITABLE` order.
    pub fn entries(&self) -> Vec<(ListingField, String)> {
        let text = |value: &Option<String>| value.clone();
        let number = |value: &Option<f64>| value.map(|v| v.to_string());

        [
            (ListingField::Name, text(&self.name)),
            (ListingField::Address, text(&self.address)),
            (ListingField::Phone, text(&self.phone)),
            (ListingField::Website, text(&self.website)),
            (ListingField::Latitude, number(&self.latitude)),
            (ListingField::Longitude, number(&self.longitude)),
            (ListingField::OpeningHours, text(&self.opening_hours)),
            (ListingField::Description, text(&self.description)),
            (ListingField::ClosedDays, text(&self.closed_days)),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.map(|v| (field, v)))
        .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    fn set_text(&mut self, field: ListingField, value: String) {
        match field {
            ListingField::Name => self.name = Some(value),
            ListingField::Address => self.address = Some(value),
            ListingField::Phone => self.phone = Some(value),
            ListingField::Website => self.website = Some(value),
            ListingField::OpeningHours => self.opening_hours = Some(value),
            ListingField::Description => self.description = Some(value),
            ListingField::ClosedDays => self.closed_days = Some(value),
            _ => {}
        }
    }
}

/// Everything needed to write an approval
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApprovalPayload {
    pub listing_id: ListingId,
    pub admin_id: MemberId,
    pub notes: Option<String>,
    pub fields: ListingUpdate,
    pub origins: BTreeMap<ListingField, ValueOrigin>,
    pub replacements: Replacements,
    /// Drafted fields that approval cannot override (hours, display-only fields)
    #[serde(default)]
    pub ignored_draft_fields: Vec<ListingField>,
}

/// Inputs gathered for one listing
#[derive(Debug, Clone, Copy)]
pub struct ApprovalInput<'a> {
    pub listing: &'a Listing,
    pub trust: &'a TrustAssessment,
    pub place: Option<&'a PlaceData>,
    pub latest_entry: Option<&'a ValidationHistoryEntry>,
    pub draft: Option<&'a Draft>,
}

impl<'a> ApprovalInput<'a> {
    /// Place data passed in, else the copy cached on the validation run.
    pub fn resolve_place(&self) -> Option<PlaceData> {
        self.place.cloned().or_else(|| {
            self.latest_entry
                .and_then(|entry| entry.cached_place_data.as_deref())
                .and_then(PlaceData::from_cached)
        })
    }

    pub fn suggestions(&self) -> AiSuggestions {
        extract_suggestions(
            self.latest_entry
                .and_then(|entry| entry.raw_ai_output.as_deref()),
        )
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ApprovalAssembler {
    combined: CombinedInfoBuilder,
}

impl ApprovalAssembler {
    pub fn new(combined: CombinedInfoBuilder) -> Self {
        Self { combined }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(CombinedInfoBuilder::from_config(config))
    }

    pub fn assemble(
        &self,
        input: ApprovalInput<'_>,
        admin_id: MemberId,
        notes: Option<String>,
    ) -> Result<ApprovalPayload, serde_json::Error> {
        self.assemble_at(input, admin_id, notes, Utc::now())
    }

    /// Resolve every writable field and diff the result against the listing.
    ///
    /// Fails only when the opening hours document cannot be serialized.
    pub fn assemble_at(
        &self,
        input: ApprovalInput<'_>,
        admin_id: MemberId,
        notes: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<ApprovalPayload, serde_json::Error> {
        let listing = input.listing;
        let place = input.resolve_place();
        let combined = self
            .combined
            .build_at(listing, input.trust, place.as_ref(), now);
        let suggestions = input.suggestions();

        let mut resolver = Resolver {
            listing,
            draft: input.draft,
            fields: ListingUpdate::default(),
            origins: BTreeMap::new(),
        };

        resolver.text(ListingField::Name, suggestions.name.as_deref(), &combined);
        resolver.text(ListingField::Address, None, &combined);
        resolver.text(ListingField::Phone, None, &combined);
        resolver.text(ListingField::Website, None, &combined);
        resolver.text(
            ListingField::Description,
            suggestions.description.as_deref(),
            &combined,
        );
        resolver.text(
            ListingField::ClosedDays,
            suggestions.closed_days.as_deref(),
            &combined,
        );
        resolver.location(&combined);
        resolver.opening_hours(&combined)?;

        let ignored_draft_fields: Vec<ListingField> = input
            .draft
            .map(|draft| {
                draft
                    .fields
                    .keys()
                    .copied()
                    .filter(|field| !field.is_writable() || *field == ListingField::OpeningHours)
                    .collect()
            })
            .unwrap_or_default();
        if !ignored_draft_fields.is_empty() {
            debug!(
                listing_id = %listing.id,
                ignored = ignored_draft_fields.len(),
                "Draft has values for non-overridable fields"
            );
        }

        let replacements = Replacements::between(listing, &resolver.fields);

        debug!(
            listing_id = %listing.id,
            changed = replacements.len(),
            "Assembled approval payload"
        );

        Ok(ApprovalPayload {
            listing_id: listing.id,
            admin_id,
            notes: notes
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty()),
            fields: resolver.fields,
            origins: resolver.origins,
            replacements,
            ignored_draft_fields,
        })
    }
}

struct Resolver<'a> {
    listing: &'a Listing,
    draft: Option<&'a Draft>,
    fields: ListingUpdate,
    origins: BTreeMap<ListingField, ValueOrigin>,
}

impl Resolver<'_> {
    fn draft_value(&self, field: ListingField) -> Option<String> {
        self.draft
            .and_then(|d| d.value(field))
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }

    fn text(&mut self, field: ListingField, suggestion: Option<&str>, combined: &CombinedListing) {
        let combined_value = match field {
            ListingField::Name => Some(&combined.name),
            ListingField::Address => Some(&combined.address),
            ListingField::Phone => Some(&combined.phone),
            ListingField::Website => Some(&combined.website),
            ListingField::Description => Some(&combined.description),
            _ => None,
        }
        .filter(|v| !v.is_empty())
        .and_then(|v| {
            ValueOrigin::from_provenance(combined.source(field)).map(|origin| (v.clone(), origin))
        });

        let resolved = self
            .draft_value(field)
            .map(|v| (v, ValueOrigin::Draft))
            .or_else(|| suggestion.map(|v| (v.to_string(), ValueOrigin::AiSuggestion)))
            .or(combined_value);

        let Some((value, origin)) = resolved else {
            return;
        };

        let current = self.listing.field_text(field);
        if current.as_deref().map(str::trim) == Some(value.as_str()) {
            return;
        }

        self.fields.set_text(field, value);
        self.origins.insert(field, origin);
    }

    fn location(&mut self, combined: &CombinedListing) {
        let drafted = self.draft_location();
        let resolved = drafted.map(|pair| (pair, ValueOrigin::Draft)).or_else(|| {
            let pair = combined.latitude.zip(combined.longitude)?;
            ValueOrigin::from_provenance(combined.source(ListingField::Location))
                .map(|origin| (pair, origin))
        });

        let Some(((latitude, longitude), origin)) = resolved else {
            return;
        };

        if self.listing.latitude != Some(latitude) {
            self.fields.latitude = Some(latitude);
            self.origins.insert(ListingField::Latitude, origin);
        }
        if self.listing.longitude != Some(longitude) {
            self.fields.longitude = Some(longitude);
            self.origins.insert(ListingField::Longitude, origin);
        }
    }

    /// Drafted coordinates count only as a complete, numeric pair.
    fn draft_location(&self) -> Option<(f64, f64)> {
        let latitude = self.draft_value(ListingField::Latitude);
        let longitude = self.draft_value(ListingField::Longitude);
        if latitude.is_none() && longitude.is_none() {
            return None;
        }

        let parsed = latitude
            .and_then(|v| v.parse::<f64>().ok())
            .zip(longitude.and_then(|v| v.parse::<f64>().ok()))
            .filter(|(lat, lng)| lat.is_finite() && lng.is_finite());

        if parsed.is_none() {
            warn!(
                listing_id = %self.listing.id,
                "Ignoring incomplete or non-numeric drafted coordinates"
            );
        }
        parsed
    }

    fn opening_hours(&mut self, combined: &CombinedListing) -> Result<(), serde_json::Error> {
        let hours = transcode_weekday_lines(&combined.opening_hours)?;
        if hours.is_empty() {
            return Ok(());
        }

        let Some(origin) = ValueOrigin::from_provenance(combined.source(ListingField::OpeningHours))
        else {
            return Ok(());
        };

        // Submitter hours already stored as a document are the stored value;
        // re-transcoding through 12-hour text would turn a 24:00 close into 00:00.
        if origin == ValueOrigin::Submitter
            && self
                .listing
                .opening_hours
                .as_deref()
                .and_then(OpenHours::parse)
                .is_some()
        {
            return Ok(());
        }

        if self.listing.opening_hours.as_deref().map(str::trim) == Some(hours.as_str()) {
            return Ok(());
        }

        self.fields.opening_hours = Some(hours);
        self.origins.insert(ListingField::OpeningHours, origin);
        Ok(())
    }
}
