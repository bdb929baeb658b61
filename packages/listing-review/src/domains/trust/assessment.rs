use serde::{Deserialize, Serialize};

use crate::domains::listings::Submitter;

/// Baseline trust for a member flagged as trusted.
pub const TRUSTED_BASELINE: f64 = 0.8;

/// Baseline trust when no signal vouches for the submitter.
pub const UNTRUSTED_BASELINE: f64 = 0.3;

/// Minimum trust for a submitter's values to win a merge.
pub const TRUSTED_THRESHOLD: f64 = TRUSTED_BASELINE;

const OWNER_FLOOR: f64 = 0.9;
const REGIONAL_AMBASSADOR_FLOOR: f64 = 0.85;
const REGIONAL_BONUS_PER_LEVEL: f64 = 0.03;
const OUT_OF_REGION_BONUS: f64 = 0.05;

/// Authority the submitter speaks with for this listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Authority {
    Community,
    Trusted,
    RegionalAmbassador,
    Owner,
}

impl std::fmt::Display for Authority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Authority::Community => write!(f, "community"),
            Authority::Trusted => write!(f, "trusted"),
            Authority::RegionalAmbassador => write!(f, "regional_ambassador"),
            Authority::Owner => write!(f, "owner"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrustAssessment {
    /// Always within `[0, 1]`
    pub trust: f64,
    pub authority: Authority,
    pub reason: String,
}

impl TrustAssessment {
    pub fn is_trusted(&self) -> bool {
        self.trust >= TRUSTED_THRESHOLD
    }
}

/// Score a submitter's credibility for a listing filed under `category_path`.
///
/// Pure and deterministic. A submitter with no signals gets the untrusted
/// baseline with `Community` authority.
pub fn assess_submitter(submitter: &Submitter, category_path: &str) -> TrustAssessment {
    let mut reasons = Vec::new();

    let (mut trust, mut authority) = if submitter.trusted {
        reasons.push("trusted member".to_string());
        (TRUSTED_BASELINE, Authority::Trusted)
    } else {
        (UNTRUSTED_BASELINE, Authority::Community)
    };

    if submitter.is_owner {
        trust = trust.max(OWNER_FLOOR);
        authority = Authority::Owner;
        reasons.push("owns this listing".to_string());
    }

    if submitter.is_ambassador() {
        let level = submitter.ambassador_level;
        match submitter.ambassador_region.as_deref() {
            Some(region) if path_covers_region(category_path, region) => {
                let bonus = REGIONAL_BONUS_PER_LEVEL * f64::from(level);
                trust = trust.max(REGIONAL_AMBASSADOR_FLOOR) + bonus;
                if authority != Authority::Owner {
                    authority = Authority::RegionalAmbassador;
                }
                reasons.push(format!(
                    "level {} ambassador for {}",
                    level,
                    region.trim()
                ));
            }
            _ => {
                trust += OUT_OF_REGION_BONUS;
                reasons.push(format!("level {} ambassador outside region", level));
            }
        }
    }

    let reason = if reasons.is_empty() {
        "no trust signals".to_string()
    } else {
        reasons.join("; ")
    };

    TrustAssessment {
        trust: trust.clamp(0.0, 1.0),
        authority,
        reason,
    }
}

/// True when `region` is one of the path's segments (case-insensitive).
/// Segments are separated by `/` or `>`.
fn path_covers_region(category_path: &str, region: &str) -> bool {
    let region = region.trim();
    if region.is_empty() {
        return false;
    }

    category_path
        .split(['/', '>'])
        .map(str::trim)
        .any(|segment| segment.eq_ignore_ascii_case(region))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submitter(trusted: bool, is_owner: bool) -> Submitter {
        Submitter {
            username: "maria".to_string(),
            trusted,
            is_owner,
            ..Default::default()
        }
    }

    #[test]
    fn test_no_signals_is_low_confidence() {
        let assessment = assess_submitter(&submitter(false, false), "us/mn/minneapolis/food");
        assert_eq!(assessment.trust, UNTRUSTED_BASELINE);
        assert_eq!(assessment.authority, Authority::Community);
        assert_eq!(assessment.reason, "no trust signals");
        assert!(!assessment.is_trusted());
    }

    #[test]
    fn test_trusted_baseline() {
        let assessment = assess_submitter(&submitter(true, false), "");
        assert_eq!(assessment.trust, TRUSTED_BASELINE);
        assert_eq!(assessment.authority, Authority::Trusted);
        assert!(assessment.is_trusted());
    }

    #[test]
    fn test_owner_raises_untrusted_submitter() {
        let assessment = assess_submitter(&submitter(false, true), "");
        assert_eq!(assessment.trust, OWNER_FLOOR);
        assert_eq!(assessment.authority, Authority::Owner);
        assert!(assessment.is_trusted());
    }

    #[test]
    fn test_regional_ambassador_matches_path_segment() {
        let mut s = submitter(false, false);
        s.ambassador_level = 2;
        s.ambassador_region = Some("Minneapolis".to_string());

        let assessment = assess_submitter(&s, "us / mn / minneapolis / restaurants");
        assert_eq!(assessment.authority, Authority::RegionalAmbassador);
        assert!((assessment.trust - 0.91).abs() < 1e-9);
        assert!(assessment.reason.contains("Minneapolis"));
    }

    #[test]
    fn test_ambassador_outside_region_gets_small_bonus() {
        let mut s = submitter(false, false);
        s.ambassador_level = 3;
        s.ambassador_region = Some("duluth".to_string());

        let assessment = assess_submitter(&s, "us/mn/minneapolis");
        assert_eq!(assessment.authority, Authority::Community);
        assert!((assessment.trust - 0.35).abs() < 1e-9);
    }

    #[test]
    fn test_owner_authority_survives_ambassador_and_trust_is_clamped() {
        let mut s = submitter(true, true);
        s.ambassador_level = 10;
        s.ambassador_region = Some("mn".to_string());

        let assessment = assess_submitter(&s, "us>mn>st paul");
        assert_eq!(assessment.authority, Authority::Owner);
        assert_eq!(assessment.trust, 1.0);
    }

    #[test]
    fn test_region_must_be_whole_segment() {
        assert!(!path_covers_region("us/minnesota", "minn"));
        assert!(!path_covers_region("us/mn", "  "));
        assert!(path_covers_region("US/MN", "mn"));
    }
}
