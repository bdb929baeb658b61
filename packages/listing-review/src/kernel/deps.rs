//! Review dependencies for actions (using traits for testability)
//!
//! Wiring is explicit: hosts construct each collaborator and pass it to
//! `ReviewDeps::new`.

use std::sync::Arc;

use crate::config::Config;
use crate::domains::approval::ReviewEvent;
use crate::domains::drafts::DraftStore;
use crate::kernel::{
    BaseAuditLog, BaseListingRepository, BaseReviewEventSink, BaseValidationHistory,
};

/// Dependencies accessible to review actions
#[derive(Clone)]
pub struct ReviewDeps {
    pub listings: Arc<dyn BaseListingRepository>,
    pub history: Arc<dyn BaseValidationHistory>,
    pub audit_log: Arc<dyn BaseAuditLog>,
    pub events: Arc<dyn BaseReviewEventSink>,
    /// Process-wide draft overlay shared by every request
    pub drafts: DraftStore,
    pub config: Config,
}

impl ReviewDeps {
    pub fn new(
        listings: Arc<dyn BaseListingRepository>,
        history: Arc<dyn BaseValidationHistory>,
        audit_log: Arc<dyn BaseAuditLog>,
        events: Arc<dyn BaseReviewEventSink>,
        drafts: DraftStore,
        config: Config,
    ) -> Self {
        Self {
            listings,
            history,
            audit_log,
            events,
            drafts,
            config,
        }
    }

    pub fn emit(&self, event: ReviewEvent) {
        self.events.emit(event);
    }
}
