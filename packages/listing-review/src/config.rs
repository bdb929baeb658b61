use anyhow::{bail, Context, Result};
use dotenvy::dotenv;
use std::env;

/// Default minimum validation score (0-100 scale) required before approval.
pub const DEFAULT_APPROVAL_SCORE_THRESHOLD: f64 = 70.0;

/// Default window, in months, during which a trusted submitter's edits win.
pub const DEFAULT_TRUST_RECENCY_MONTHS: u32 = 3;

/// Review pipeline configuration loaded from environment variables
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub approval_score_threshold: f64,
    pub trust_recency_months: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            approval_score_threshold: DEFAULT_APPROVAL_SCORE_THRESHOLD,
            trust_recency_months: DEFAULT_TRUST_RECENCY_MONTHS,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup (used by tests)
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let approval_score_threshold = match lookup("APPROVAL_SCORE_THRESHOLD") {
            Some(raw) => raw
                .trim()
                .parse::<f64>()
                .context("APPROVAL_SCORE_THRESHOLD must be a valid number")?,
            None => DEFAULT_APPROVAL_SCORE_THRESHOLD,
        };
        if !approval_score_threshold.is_finite() || approval_score_threshold < 0.0 {
            bail!(
                "APPROVAL_SCORE_THRESHOLD must be a finite, non-negative number (got {})",
                approval_score_threshold
            );
        }

        let trust_recency_months = match lookup("TRUST_RECENCY_MONTHS") {
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .context("TRUST_RECENCY_MONTHS must be a non-negative integer")?,
            None => DEFAULT_TRUST_RECENCY_MONTHS,
        };

        Ok(Self {
            approval_score_threshold,
            trust_recency_months,
        })
    }
}
