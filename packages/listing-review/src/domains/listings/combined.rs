//! Combined listing view.
//!
//! Merges the submitter's listing with third-party place data field by field,
//! recording which source supplied each value.
//!
//! Precedence for every mergeable field:
//! 1. submitter value, when the submitter is trusted and edited recently
//! 2. third-party value, when present
//! 3. whichever value exists
//! 4. nothing, with an unset provenance

use chrono::{DateTime, Months, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use super::models::{Listing, ListingField, PlaceData, Provenance};
use crate::config::Config;
use crate::domains::schedules::weekday_lines_from_text;
use crate::domains::trust::TrustAssessment;

/// Final per-field values plus their provenance
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CombinedListing {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub website: String,
    /// Latitude and longitude always come from the same source
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Weekday lines, transcoded at approval time
    pub opening_hours: Vec<String>,
    pub categories: Vec<String>,
    pub description: String,
    pub category_flags: BTreeMap<String, bool>,
    pub sources: BTreeMap<ListingField, Provenance>,
}

impl CombinedListing {
    pub fn source(&self, field: ListingField) -> Provenance {
        self.sources.get(&field).copied().unwrap_or_default()
    }

    fn record<T>(&mut self, field: ListingField, choice: Choice<T>) -> Option<T> {
        self.sources.insert(field, choice.provenance);
        choice.value
    }
}

struct Choice<T> {
    value: Option<T>,
    provenance: Provenance,
}

impl<T> Choice<T> {
    fn pick(prefer_user: bool, user: Option<T>, third_party: Option<T>) -> Self {
        let (value, provenance) = match (user, third_party) {
            (Some(user), _) if prefer_user => (Some(user), Provenance::User),
            (_, Some(third_party)) => (Some(third_party), Provenance::ThirdParty),
            (Some(user), None) => (Some(user), Provenance::User),
            (None, None) => (None, Provenance::Unset),
        };
        Self { value, provenance }
    }

    fn only(value: Option<T>, provenance: Provenance) -> Self {
        match value {
            Some(value) => Self {
                value: Some(value),
                provenance,
            },
            None => Self {
                value: None,
                provenance: Provenance::Unset,
            },
        }
    }
}

/// Trimmed value, or `None` when blank.
fn text(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

fn pair(latitude: Option<f64>, longitude: Option<f64>) -> Option<(f64, f64)> {
    match (latitude, longitude) {
        (Some(lat), Some(lng)) if lat.is_finite() && lng.is_finite() => Some((lat, lng)),
        _ => None,
    }
}

fn non_empty<T>(items: Vec<T>) -> Option<Vec<T>> {
    (!items.is_empty()).then_some(items)
}

/// Builds the combined view with a recency window for submitter edits
#[derive(Debug, Clone, Copy)]
pub struct CombinedInfoBuilder {
    recency_months: u32,
}

impl CombinedInfoBuilder {
    pub fn new(recency_months: u32) -> Self {
        Self { recency_months }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.trust_recency_months)
    }

    /// Whether the submitter's values win merges for this listing at `now`.
    pub fn prefers_submitter(
        &self,
        listing: &Listing,
        trust: &TrustAssessment,
        now: DateTime<Utc>,
    ) -> bool {
        if !trust.is_trusted() {
            return false;
        }

        match now.checked_sub_months(Months::new(self.recency_months)) {
            Some(cutoff) => listing.last_modified_at() >= cutoff,
            None => true,
        }
    }

    pub fn build(
        &self,
        listing: &Listing,
        trust: &TrustAssessment,
        place: Option<&PlaceData>,
    ) -> CombinedListing {
        self.build_at(listing, trust, place, Utc::now())
    }

    pub fn build_at(
        &self,
        listing: &Listing,
        trust: &TrustAssessment,
        place: Option<&PlaceData>,
        now: DateTime<Utc>,
    ) -> CombinedListing {
        let prefer_user = self.prefers_submitter(listing, trust, now);
        let mut combined = CombinedListing::default();

        combined.name = combined
            .record(
                ListingField::Name,
                Choice::pick(
                    prefer_user,
                    text(&listing.name),
                    place.and_then(|p| text(&p.name)),
                ),
            )
            .unwrap_or_default();

        combined.address = combined
            .record(
                ListingField::Address,
                Choice::pick(
                    prefer_user,
                    text(&listing.address),
                    place.and_then(|p| text(&p.address)),
                ),
            )
            .unwrap_or_default();

        combined.phone = combined
            .record(
                ListingField::Phone,
                Choice::pick(
                    prefer_user,
                    listing.phone.as_deref().and_then(text),
                    place.and_then(|p| text(&p.phone)),
                ),
            )
            .unwrap_or_default();

        combined.website = combined
            .record(
                ListingField::Website,
                Choice::pick(
                    prefer_user,
                    listing.website.as_deref().and_then(text),
                    place.and_then(|p| text(&p.website)),
                ),
            )
            .unwrap_or_default();

        let location = combined.record(
            ListingField::Location,
            Choice::pick(
                prefer_user,
                pair(listing.latitude, listing.longitude),
                place.and_then(|p| pair(p.latitude, p.longitude)),
            ),
        );
        combined.latitude = location.map(|(lat, _)| lat);
        combined.longitude = location.map(|(_, lng)| lng);

        let user_hours = listing
            .opening_hours
            .as_deref()
            .map(weekday_lines_from_text)
            .and_then(non_empty);
        let place_hours = place.and_then(|p| {
            non_empty(
                p.weekday_hours
                    .iter()
                    .filter_map(|line| text(line))
                    .collect(),
            )
        });
        combined.opening_hours = combined
            .record(
                ListingField::OpeningHours,
                Choice::pick(prefer_user, user_hours, place_hours),
            )
            .unwrap_or_default();

        // Third-party only
        let categories = place.and_then(|p| {
            non_empty(
                p.categories
                    .iter()
                    .filter_map(|c| text(c))
                    .collect(),
            )
        });
        combined.categories = combined
            .record(
                ListingField::Categories,
                Choice::only(categories, Provenance::ThirdParty),
            )
            .unwrap_or_default();

        // Submitter only
        combined.description = combined
            .record(
                ListingField::Description,
                Choice::only(listing.description.as_deref().and_then(text), Provenance::User),
            )
            .unwrap_or_default();

        let flags = (!listing.category_flags.is_empty()).then(|| listing.category_flags.clone());
        combined.category_flags = combined
            .record(
                ListingField::CategoryFlags,
                Choice::only(flags, Provenance::User),
            )
            .unwrap_or_default();

        debug!(
            listing_id = %listing.id,
            prefer_user = prefer_user,
            has_place_data = place.is_some(),
            "Built combined listing"
        );

        combined
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::ListingId;
    use crate::domains::listings::ListingStatus;
    use crate::domains::trust::Authority;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, 1, 12, 0, 0).unwrap()
    }

    fn listing(updated_days_ago: i64) -> Listing {
        Listing {
            id: ListingId::new(),
            name: "Nokomis Cafe".to_string(),
            address: "4564 34th Ave S".to_string(),
            phone: Some("612-555-0100".to_string()),
            website: None,
            description: Some("Coffee and pastries".to_string()),
            latitude: Some(44.91),
            longitude: Some(-93.22),
            opening_hours: Some("Monday: 7:00 AM – 3:00 PM".to_string()),
            closed_days: None,
            category_flags: BTreeMap::from([("cafe".to_string(), true)]),
            category_path: "us/mn/minneapolis/food".to_string(),
            submitted_by: "maria".to_string(),
            status: ListingStatus::Pending,
            created_at: now() - Duration::days(400),
            updated_at: Some(now() - Duration::days(updated_days_ago)),
        }
    }

    fn place() -> PlaceData {
        PlaceData {
            name: "Cafe Nokomis".to_string(),
            address: "4564 34th Ave S, Minneapolis, MN".to_string(),
            phone: "(612) 555-0199".to_string(),
            website: "https://cafenokomis.example".to_string(),
            latitude: Some(44.9123),
            longitude: Some(-93.2211),
            weekday_hours: vec!["Monday: 6:30 AM – 2:00 PM".to_string()],
            categories: vec!["cafe".to_string(), "bakery".to_string()],
        }
    }

    fn trust(value: f64) -> TrustAssessment {
        TrustAssessment {
            trust: value,
            authority: Authority::Trusted,
            reason: "test".to_string(),
        }
    }

    fn builder() -> CombinedInfoBuilder {
        CombinedInfoBuilder::new(3)
    }

    #[test]
    fn test_trusted_recent_submitter_wins() {
        let combined = builder().build_at(&listing(10), &trust(0.8), Some(&place()), now());

        assert_eq!(combined.name, "Nokomis Cafe");
        assert_eq!(combined.source(ListingField::Name), Provenance::User);
        assert_eq!(combined.phone, "612-555-0100");
        assert_eq!(combined.latitude, Some(44.91));
        assert_eq!(combined.longitude, Some(-93.22));
        assert_eq!(combined.source(ListingField::Location), Provenance::User);
        assert_eq!(combined.opening_hours, vec!["Monday: 7:00 AM – 3:00 PM"]);
    }

    #[test]
    fn test_missing_submitter_value_falls_back_to_third_party() {
        let combined = builder().build_at(&listing(10), &trust(0.8), Some(&place()), now());

        assert_eq!(combined.website, "https://cafenokomis.example");
        assert_eq!(combined.source(ListingField::Website), Provenance::ThirdParty);
    }

    #[test]
    fn test_stale_edit_prefers_third_party() {
        let combined = builder().build_at(&listing(120), &trust(0.8), Some(&place()), now());

        assert_eq!(combined.name, "Cafe Nokomis");
        assert_eq!(combined.source(ListingField::Name), Provenance::ThirdParty);
        assert_eq!(combined.latitude, Some(44.9123));
        assert_eq!(combined.longitude, Some(-93.2211));
    }

    #[test]
    fn test_untrusted_submitter_prefers_third_party() {
        let combined = builder().build_at(&listing(1), &trust(0.3), Some(&place()), now());

        assert_eq!(combined.address, "4564 34th Ave S, Minneapolis, MN");
        assert_eq!(combined.source(ListingField::Address), Provenance::ThirdParty);
        assert_eq!(combined.opening_hours, vec!["Monday: 6:30 AM – 2:00 PM"]);
    }

    #[test]
    fn test_no_place_data_keeps_submitter_values() {
        let combined = builder().build_at(&listing(120), &trust(0.3), None, now());

        assert_eq!(combined.name, "Nokomis Cafe");
        assert_eq!(combined.source(ListingField::Name), Provenance::User);
        assert!(combined.categories.is_empty());
        assert_eq!(combined.source(ListingField::Categories), Provenance::Unset);
    }

    #[test]
    fn test_neither_source_is_empty_and_unset() {
        let mut l = listing(1);
        l.website = Some("   ".to_string());
        let combined = builder().build_at(&l, &trust(0.9), None, now());

        assert_eq!(combined.website, "");
        assert_eq!(combined.source(ListingField::Website), Provenance::Unset);
    }

    #[test]
    fn test_location_is_never_mixed() {
        let mut l = listing(1);
        l.longitude = None;
        let combined = builder().build_at(&l, &trust(0.9), Some(&place()), now());

        assert_eq!(combined.latitude, Some(44.9123));
        assert_eq!(combined.longitude, Some(-93.2211));
        assert_eq!(combined.source(ListingField::Location), Provenance::ThirdParty);
    }

    #[test]
    fn test_single_source_fields() {
        let combined = builder().build_at(&listing(1), &trust(0.9), Some(&place()), now());

        assert_eq!(combined.categories, vec!["cafe", "bakery"]);
        assert_eq!(combined.source(ListingField::Categories), Provenance::ThirdParty);
        assert_eq!(combined.description, "Coffee and pastries");
        assert_eq!(combined.source(ListingField::Description), Provenance::User);
        assert_eq!(combined.source(ListingField::CategoryFlags), Provenance::User);
    }

    #[test]
    fn test_missing_updated_at_uses_created_at() {
        let mut l = listing(1);
        l.updated_at = None;
        assert!(!builder().prefers_submitter(&l, &trust(0.9), now()));

        l.created_at = now() - Duration::days(5);
        assert!(builder().prefers_submitter(&l, &trust(0.9), now()));
    }

    #[test]
    fn test_every_value_has_provenance() {
        for (days, score, place) in [(1, 0.9, Some(place())), (200, 0.1, None)] {
            let combined = builder().build_at(&listing(days), &trust(score), place.as_ref(), now());
            let has_value = [
                (ListingField::Name, !combined.name.is_empty()),
                (ListingField::Address, !combined.address.is_empty()),
                (ListingField::Phone, !combined.phone.is_empty()),
                (ListingField::Website, !combined.website.is_empty()),
                (ListingField::Location, combined.latitude.is_some()),
                (ListingField::OpeningHours, !combined.opening_hours.is_empty()),
                (ListingField::Categories, !combined.categories.is_empty()),
                (ListingField::Description, !combined.description.is_empty()),
                (ListingField::CategoryFlags, !combined.category_flags.is_empty()),
            ];
            for (field, has) in has_value {
                assert_eq!(combined.source(field).is_set(), has, "{}", field);
            }
        }
    }
}
