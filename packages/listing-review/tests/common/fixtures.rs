//! Test fixtures for seeding the in-memory review dependencies.

#![allow(dead_code)]

use chrono::{Duration, Utc};
use listing_review::common::{ListingId, ValidationRunId};
use listing_review::domains::listings::{
    Listing, ListingStatus, PlaceData, Submitter, ValidationHistoryEntry,
};
use listing_review::kernel::TestDependencies;
use std::collections::BTreeMap;

/// A pending listing submitted by "maria", edited yesterday
pub fn pending_listing() -> Listing {
    Listing {
        id: ListingId::new(),
        name: "Nokomis Cafe".to_string(),
        address: "4564 34th Ave S".to_string(),
        phone: None,
        website: Some("http://nokomis.example".to_string()),
        description: Some("Coffee".to_string()),
        latitude: None,
        longitude: None,
        opening_hours: None,
        closed_days: None,
        category_flags: BTreeMap::new(),
        category_path: "us/mn/minneapolis/food".to_string(),
        submitted_by: "maria".to_string(),
        status: ListingStatus::Pending,
        created_at: Utc::now() - Duration::days(30),
        updated_at: Some(Utc::now() - Duration::days(1)),
    }
}

pub fn place_data() -> PlaceData {
    PlaceData {
        name: "Cafe Nokomis".to_string(),
        address: String::new(),
        phone: "612-555-0100".to_string(),
        website: String::new(),
        latitude: Some(44.9123),
        longitude: Some(-93.2211),
        weekday_hours: vec![
            "Monday: 7:00 AM – 3:00 PM".to_string(),
            "Sunday: Closed".to_string(),
        ],
        categories: vec!["cafe".to_string()],
    }
}

pub fn trusted_submitter(username: &str) -> Submitter {
    Submitter {
        username: username.to_string(),
        trusted: true,
        ..Default::default()
    }
}

/// A validation run processed `minutes_ago` minutes before now
pub fn history_entry(
    listing_id: ListingId,
    status: &str,
    score: f64,
    minutes_ago: i64,
) -> ValidationHistoryEntry {
    ValidationHistoryEntry {
        id: ValidationRunId::new(),
        listing_id,
        status: status.to_string(),
        score,
        notes: None,
        score_breakdown: serde_json::Value::Null,
        raw_ai_output: None,
        cached_place_data: None,
        processed_at: Utc::now() - Duration::minutes(minutes_ago),
    }
}

/// Seed a pending listing with an approved, high-scoring validation run
pub fn seed_approvable(test_deps: &TestDependencies) -> Listing {
    let listing = pending_listing();
    test_deps.listings.insert_listing(listing.clone());
    test_deps
        .history
        .push(history_entry(listing.id, "approved", 92.0, 5));
    listing
}
