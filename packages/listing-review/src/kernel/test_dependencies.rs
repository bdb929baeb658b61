// TestDependencies - in-memory collaborators for testing
//
// Provides mock repositories and sinks that can be wired into ReviewDeps for
// tests and local tooling. Every mock records the calls it receives.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::{
    BaseAuditLog, BaseListingRepository, BaseReviewEventSink, BaseValidationHistory, ReviewDeps,
};
use crate::common::{ListingId, MemberId};
use crate::config::Config;
use crate::domains::approval::{ApprovalPayload, AuditEntry, ReviewEvent};
use crate::domains::drafts::DraftStore;
use crate::domains::listings::{
    Listing, ListingStatus, PlaceData, Submitter, ValidationHistoryEntry,
};

// =============================================================================
// Mock Listing Repository
// =============================================================================

/// Arguments captured from a rejection
#[derive(Debug, Clone, PartialEq)]
pub struct RejectionCall {
    pub listing_id: ListingId,
    pub admin_id: MemberId,
    pub reason: String,
}

#[derive(Default)]
pub struct MockListingRepository {
    listings: Mutex<HashMap<ListingId, Listing>>,
    submitters: Mutex<HashMap<String, Submitter>>,
    place_data: Mutex<HashMap<ListingId, PlaceData>>,
    approvals: Mutex<Vec<ApprovalPayload>>,
    rejections: Mutex<Vec<RejectionCall>>,
    fail_place_lookups: Mutex<bool>,
    fail_writes: Mutex<bool>,
}

impl MockListingRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_listing(&self, listing: Listing) {
        self.listings.lock().unwrap().insert(listing.id, listing);
    }

    pub fn insert_submitter(&self, submitter: Submitter) {
        self.submitters
            .lock()
            .unwrap()
            .insert(submitter.username.clone(), submitter);
    }

    pub fn insert_place_data(&self, listing_id: ListingId, place: PlaceData) {
        self.place_data.lock().unwrap().insert(listing_id, place);
    }

    /// Make every place data lookup fail (simulates the places service being down)
    pub fn fail_place_lookups(&self) {
        *self.fail_place_lookups.lock().unwrap() = true;
    }

    /// Make approval and rejection writes fail
    pub fn fail_writes(&self) {
        *self.fail_writes.lock().unwrap() = true;
    }

    pub fn listing(&self, listing_id: ListingId) -> Option<Listing> {
        self.listings.lock().unwrap().get(&listing_id).cloned()
    }

    /// All approval payloads written so far
    pub fn approvals(&self) -> Vec<ApprovalPayload> {
        self.approvals.lock().unwrap().clone()
    }

    /// All rejections written so far
    pub fn rejections(&self) -> Vec<RejectionCall> {
        self.rejections.lock().unwrap().clone()
    }

    fn check_writable(&self) -> Result<()> {
        if *self.fail_writes.lock().unwrap() {
            return Err(anyhow!("listing store unavailable"));
        }
        Ok(())
    }
}

#[async_trait]
impl BaseListingRepository for MockListingRepository {
    async fn find_listing(&self, listing_id: ListingId) -> Result<Option<Listing>> {
        Ok(self.listing(listing_id))
    }

    async fn find_submitter(&self, listing: &Listing) -> Result<Option<Submitter>> {
        Ok(self
            .submitters
            .lock()
            .unwrap()
            .get(&listing.submitted_by)
            .cloned())
    }

    async fn find_place_data(&self, listing_id: ListingId) -> Result<Option<PlaceData>> {
        if *self.fail_place_lookups.lock().unwrap() {
            return Err(anyhow!("places service unavailable"));
        }
        Ok(self.place_data.lock().unwrap().get(&listing_id).cloned())
    }

    async fn apply_approval(&self, payload: &ApprovalPayload) -> Result<()> {
        self.check_writable()?;

        let mut listings = self.listings.lock().unwrap();
        let listing = listings
            .get_mut(&payload.listing_id)
            .ok_or_else(|| anyhow!("listing {} not found", payload.listing_id))?;

        let fields = &payload.fields;
        if let Some(name) = &fields.name {
            listing.name = name.clone();
        }
        if let Some(address) = &fields.address {
            listing.address = address.clone();
        }
        if fields.phone.is_some() {
            listing.phone = fields.phone.clone();
        }
        if fields.website.is_some() {
            listing.website = fields.website.clone();
        }
        if fields.latitude.is_some() {
            listing.latitude = fields.latitude;
        }
        if fields.longitude.is_some() {
            listing.longitude = fields.longitude;
        }
        if fields.opening_hours.is_some() {
            listing.opening_hours = fields.opening_hours.clone();
        }
        if fields.description.is_some() {
            listing.description = fields.description.clone();
        }
        if fields.closed_days.is_some() {
            listing.closed_days = fields.closed_days.clone();
        }
        listing.status = ListingStatus::Approved;

        self.approvals.lock().unwrap().push(payload.clone());
        Ok(())
    }

    async fn mark_rejected(
        &self,
        listing_id: ListingId,
        admin_id: MemberId,
        reason: &str,
    ) -> Result<()> {
        self.check_writable()?;

        if let Some(listing) = self.listings.lock().unwrap().get_mut(&listing_id) {
            listing.status = ListingStatus::Rejected;
        }

        self.rejections.lock().unwrap().push(RejectionCall {
            listing_id,
            admin_id,
            reason: reason.to_string(),
        });
        Ok(())
    }
}

// =============================================================================
// Mock Validation History
// =============================================================================

#[derive(Default)]
pub struct MockValidationHistory {
    entries: Mutex<HashMap<ListingId, Vec<ValidationHistoryEntry>>>,
}

impl MockValidationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry; entries are returned in insertion order
    pub fn push(&self, entry: ValidationHistoryEntry) {
        self.entries
            .lock()
            .unwrap()
            .entry(entry.listing_id)
            .or_default()
            .push(entry);
    }
}

#[async_trait]
impl BaseValidationHistory for MockValidationHistory {
    async fn history_for_listing(
        &self,
        listing_id: ListingId,
    ) -> Result<Vec<ValidationHistoryEntry>> {
        Ok(self
            .entries
            .lock()
            .unwrap()
            .get(&listing_id)
            .cloned()
            .unwrap_or_default())
    }
}

// =============================================================================
// Mock Audit Log
// =============================================================================

#[derive(Default)]
pub struct MockAuditLog {
    entries: Mutex<Vec<AuditEntry>>,
    fail_appends: Mutex<bool>,
}

impl MockAuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every append fail
    pub fn fail_appends(&self) {
        *self.fail_appends.lock().unwrap() = true;
    }

    pub fn entries(&self) -> Vec<AuditEntry> {
        self.entries.lock().unwrap().clone()
    }
}

#[async_trait]
impl BaseAuditLog for MockAuditLog {
    async fn append(&self, entry: AuditEntry) -> Result<()> {
        if *self.fail_appends.lock().unwrap() {
            return Err(anyhow!("audit log unavailable"));
        }
        self.entries.lock().unwrap().push(entry);
        Ok(())
    }
}

// =============================================================================
// Mock Event Sink
// =============================================================================

#[derive(Default)]
pub struct MockEventSink {
    events: Mutex<Vec<ReviewEvent>>,
}

impl MockEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ReviewEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Count events of one kind (e.g. `"listing_approved"`)
    pub fn count(&self, kind: &str) -> usize {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.kind() == kind)
            .count()
    }
}

impl BaseReviewEventSink for MockEventSink {
    fn emit(&self, event: ReviewEvent) {
        self.events.lock().unwrap().push(event);
    }
}

// =============================================================================
// TestDependencies
// =============================================================================

/// Mock collaborators plus the handles tests use to inspect them
pub struct TestDependencies {
    pub listings: Arc<MockListingRepository>,
    pub history: Arc<MockValidationHistory>,
    pub audit_log: Arc<MockAuditLog>,
    pub events: Arc<MockEventSink>,
    pub drafts: DraftStore,
    pub config: Config,
}

impl TestDependencies {
    pub fn new() -> Self {
        Self {
            listings: Arc::new(MockListingRepository::new()),
            history: Arc::new(MockValidationHistory::new()),
            audit_log: Arc::new(MockAuditLog::new()),
            events: Arc::new(MockEventSink::new()),
            drafts: DraftStore::new(),
            config: Config::default(),
        }
    }

    /// Override the configuration
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Build ReviewDeps that share these mocks
    pub fn deps(&self) -> ReviewDeps {
        ReviewDeps::new(
            self.listings.clone(),
            self.history.clone(),
            self.audit_log.clone(),
            self.events.clone(),
            self.drafts.clone(),
            self.config.clone(),
        )
    }
}

impl Default for TestDependencies {
    fn default() -> Self {
        Self::new()
    }
}
