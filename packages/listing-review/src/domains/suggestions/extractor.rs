//! Extraction of AI quality suggestions from the raw validator output.
//!
//! The output is an opaque blob stored on the validation history entry. Only
//! two sections are read:
//!
//! ```json
//! {
//!   "suggestions": {"name": "...", "description": "...", "closed_days": "..."},
//!   "path_validation": {"is_valid": false, "current_path": "...", "suggested_path": "...", "reason": "..."}
//! }
//! ```
//!
//! Suggestions are a non-critical enrichment: malformed input at any level
//! degrades to "no suggestion" and never fails the caller.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, warn};

/// Suggestions extracted from a validator run. Every value is non-blank.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AiSuggestions {
    /// Presence implies the stored name needs a correction
    pub name: Option<String>,
    pub description: Option<String>,
    pub closed_days: Option<String>,
    /// Display only; never written back
    pub path_validation: Option<PathValidation>,
}

impl AiSuggestions {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.closed_days.is_none()
            && self.path_validation.is_none()
    }
}

/// The validator's opinion on the listing's category path
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PathValidation {
    pub is_valid: Option<bool>,
    pub current_path: Option<String>,
    pub suggested_path: Option<String>,
    pub reason: Option<String>,
}

impl PathValidation {
    fn is_empty(&self) -> bool {
        self.is_valid.is_none()
            && self.current_path.is_none()
            && self.suggested_path.is_none()
            && self.reason.is_none()
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawOutput {
    #[serde(default, deserialize_with = "lenient")]
    suggestions: Option<RawSuggestions>,
    #[serde(default, deserialize_with = "lenient")]
    path_validation: Option<RawPathValidation>,
}

#[derive(Debug, Default, Deserialize)]
struct RawSuggestions {
    #[serde(default, deserialize_with = "lenient")]
    name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    description: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    closed_days: Option<ClosedDays>,
}

#[derive(Debug, Default, Deserialize)]
struct RawPathValidation {
    #[serde(default, deserialize_with = "lenient")]
    is_valid: Option<bool>,
    #[serde(default, deserialize_with = "lenient")]
    current_path: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    suggested_path: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    reason: Option<String>,
}

/// Models answer closed days either as a sentence or as a list of days.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ClosedDays {
    Text(String),
    Days(Vec<String>),
}

impl ClosedDays {
    fn into_text(self) -> Option<String> {
        match self {
            ClosedDays::Text(text) => non_blank(Some(text)),
            ClosedDays::Days(days) => {
                let days: Vec<String> = days
                    .into_iter()
                    .filter_map(|day| non_blank(Some(day)))
                    .collect();
                (!days.is_empty()).then(|| days.join(", "))
            }
        }
    }
}

/// Decode a value as `T`, turning a type mismatch into `None` instead of an error.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Models frequently wrap JSON answers in markdown fences.
fn strip_code_blocks(raw: &str) -> &str {
    raw.trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim()
}

/// Extract suggestions from raw AI output. Absent or malformed input yields
/// empty suggestions.
pub fn extract_suggestions(raw_output: Option<&str>) -> AiSuggestions {
    let Some(raw) = raw_output.map(strip_code_blocks).filter(|r| !r.is_empty()) else {
        return AiSuggestions::default();
    };

    let parsed: RawOutput = match serde_json::from_str(raw) {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!(error = %e, "Ignoring unparseable AI output");
            return AiSuggestions::default();
        }
    };

    let suggestions = parsed.suggestions.unwrap_or_default();
    let path_validation = parsed.path_validation.map(|raw| PathValidation {
        is_valid: raw.is_valid,
        current_path: non_blank(raw.current_path),
        suggested_path: non_blank(raw.suggested_path),
        reason: non_blank(raw.reason),
    });

    let extracted = AiSuggestions {
        name: non_blank(suggestions.name),
        description: non_blank(suggestions.description),
        closed_days: suggestions.closed_days.and_then(ClosedDays::into_text),
        path_validation: path_validation.filter(|p| !p.is_empty()),
    };

    debug!(
        has_name = extracted.name.is_some(),
        has_description = extracted.description.is_some(),
        has_closed_days = extracted.closed_days.is_some(),
        "Extracted AI suggestions"
    );

    extracted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_and_blank_input() {
        assert!(extract_suggestions(None).is_empty());
        assert!(extract_suggestions(Some("   ")).is_empty());
    }

    #[test]
    fn test_malformed_input_is_empty() {
        assert!(extract_suggestions(Some("{not json")).is_empty());
        assert!(extract_suggestions(Some("[1, 2, 3]")).is_empty());
        assert!(extract_suggestions(Some("\"just a string\"")).is_empty());
    }

    #[test]
    fn test_full_output() {
        let raw = r#"{
            "suggestions": {
                "name": "  Cafe Nokomis ",
                "description": "Neighborhood coffee shop",
                "closed_days": ["Monday", " ", "Tuesday"]
            },
            "path_validation": {
                "is_valid": false,
                "current_path": "food/bakery",
                "suggested_path": "food/cafe",
                "reason": "Serves coffee, not bread"
            },
            "score": 91
        }"#;

        let suggestions = extract_suggestions(Some(raw));
        assert_eq!(suggestions.name.as_deref(), Some("Cafe Nokomis"));
        assert_eq!(suggestions.description.as_deref(), Some("Neighborhood coffee shop"));
        assert_eq!(suggestions.closed_days.as_deref(), Some("Monday, Tuesday"));

        let path = suggestions.path_validation.unwrap();
        assert_eq!(path.is_valid, Some(false));
        assert_eq!(path.suggested_path.as_deref(), Some("food/cafe"));
    }

    #[test]
    fn test_blank_values_are_not_suggestions() {
        let raw = r#"{"suggestions": {"name": "   ", "description": "", "closed_days": "  "}}"#;
        assert!(extract_suggestions(Some(raw)).is_empty());
    }

    #[test]
    fn test_malformed_section_does_not_spoil_others() {
        let raw = r#"{"suggestions": "rename it", "path_validation": {"is_valid": true}}"#;
        let suggestions = extract_suggestions(Some(raw));
        assert!(suggestions.name.is_none());
        assert_eq!(suggestions.path_validation.unwrap().is_valid, Some(true));

        let raw = r#"{"suggestions": {"name": 42, "description": "Family owned"}, "path_validation": []}"#;
        let suggestions = extract_suggestions(Some(raw));
        assert!(suggestions.name.is_none());
        assert_eq!(suggestions.description.as_deref(), Some("Family owned"));
        assert!(suggestions.path_validation.is_none());
    }

    #[test]
    fn test_fenced_output() {
        let raw = "```json\n{\"suggestions\": {\"closed_days\": \"Sundays\"}}\n```";
        assert_eq!(
            extract_suggestions(Some(raw)).closed_days.as_deref(),
            Some("Sundays")
        );
    }
}
