//! Logging setup and the default event sink.

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::domains::approval::ReviewEvent;
use crate::kernel::BaseReviewEventSink;

/// Install the global tracing subscriber (env filter + fmt layer).
///
/// Honors `RUST_LOG`; defaults to `info,listing_review=debug`. Calling it
/// twice is harmless: the second install is ignored.
pub fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,listing_review=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

/// Event sink that turns review events into structured log lines
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEventSink;

impl BaseReviewEventSink for TracingEventSink {
    fn emit(&self, event: ReviewEvent) {
        info!(
            event = event.kind(),
            listing_id = %event.listing_id(),
            "Review event"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::ListingId;

    #[test]
    fn test_init_tracing_is_idempotent() {
        init_tracing();
        init_tracing();
    }

    #[test]
    fn test_tracing_sink_accepts_events() {
        init_tracing();
        TracingEventSink.emit(ReviewEvent::DraftDiscarded {
            listing_id: ListingId::new(),
        });
    }
}
