//! Opening hours transcoding.
//!
//! Converts per-day lines such as `"Monday: 11:00 AM – 9:00 PM"` into the
//! structured document stored on listings:
//!
//! ```json
//! {"openhours":["Mon-11:00-21:00"],"note":""}
//! ```
//!
//! Lines are processed independently. A line that cannot be understood is
//! dropped rather than partially emitted.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

const DAYS: [(&str, &str); 7] = [
    ("Monday", "Mon"),
    ("Tuesday", "Tue"),
    ("Wednesday", "Wed"),
    ("Thursday", "Thu"),
    ("Friday", "Fri"),
    ("Saturday", "Sat"),
    ("Sunday", "Sun"),
];

lazy_static! {
    // Whitespace before the meridiem may be a regular space, U+202F, U+2009 or U+00A0.
    static ref TIME_TOKEN: Regex =
        Regex::new(r"\b(\d{1,2}):(\d{2})[\s\u{00A0}\u{2009}\u{202F}]+([AaPp][Mm])\b")
            .expect("time token pattern is valid");
}

/// Structured weekly hours as stored on a listing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenHours {
    pub openhours: Vec<String>,
    #[serde(default)]
    pub note: String,
}

impl OpenHours {
    /// Parse a stored hours document. Returns `None` for anything that is not
    /// a well-formed `{"openhours":[...]}` object.
    pub fn parse(text: &str) -> Option<Self> {
        let trimmed = text.trim();
        if !trimmed.starts_with('{') {
            return None;
        }
        serde_json::from_str(trimmed).ok()
    }

    /// Render entries back into `"<DayName>: <hours>"` lines.
    ///
    /// Entries with an unknown day or malformed times are skipped.
    pub fn to_weekday_lines(&self) -> Vec<String> {
        self.openhours
            .iter()
            .filter_map(|entry| render_entry(entry))
            .collect()
    }
}

/// Transcode weekday lines into the structured hours document.
///
/// Returns an empty string when no line survives (empty input, every day
/// closed, or nothing parseable). Serialization is the only failure.
pub fn transcode_weekday_lines<S: AsRef<str>>(lines: &[S]) -> Result<String, serde_json::Error> {
    let openhours: Vec<String> = lines
        .iter()
        .filter_map(|line| parse_weekday_line(line.as_ref()))
        .collect();

    if openhours.is_empty() {
        return Ok(String::new());
    }

    serde_json::to_string(&OpenHours {
        openhours,
        note: String::new(),
    })
}

/// Turn stored hours text into weekday lines.
///
/// A structured document is expanded entry by entry; anything else is treated
/// as free text with one day per line.
pub fn weekday_lines_from_text(text: &str) -> Vec<String> {
    if let Some(hours) = OpenHours::parse(text) {
        return hours.to_weekday_lines();
    }

    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse a single `"<DayName>: <text>"` line into an `"<Day>-<open>-<close>"` entry.
pub fn parse_weekday_line(line: &str) -> Option<String> {
    let Some((day_name, hours)) = line.split_once(':') else {
        debug!(line = %line, "Dropping hours line without a day separator");
        return None;
    };

    let Some(day) = day_abbreviation(day_name) else {
        debug!(day = %day_name.trim(), "Dropping hours line with unknown day");
        return None;
    };

    let lowered = hours.to_lowercase();
    if lowered.contains("closed") {
        return None;
    }
    if lowered.contains("24 hours") || lowered.contains("open 24") {
        return Some(format!("{}-00:00-24:00", day));
    }

    let times: Vec<Option<String>> = TIME_TOKEN
        .captures_iter(hours)
        .map(|caps| {
            let hour = caps[1].parse::<u32>().ok()?;
            to_24_hour(hour, &caps[2], &caps[3])
        })
        .collect();

    match times.as_slice() {
        [Some(open), Some(close)] => Some(format!("{}-{}-{}", day, open, close)),
        _ => {
            debug!(day = %day, tokens = times.len(), "Dropping hours line without exactly two times");
            None
        }
    }
}

/// Convert a 12-hour clock reading to `HH:MM`.
///
/// `PM` adds twelve hours unless the hour is 12; `12 AM` becomes `00`.
/// Returns `None` for hours outside 1-12 or minutes outside 0-59.
pub fn to_24_hour(hour: u32, minute: &str, meridiem: &str) -> Option<String> {
    let minutes = minute.parse::<u32>().ok()?;
    if !(1..=12).contains(&hour) || minutes > 59 || minute.len() != 2 {
        return None;
    }

    let hour = if meridiem.eq_ignore_ascii_case("pm") {
        if hour == 12 {
            12
        } else {
            hour + 12
        }
    } else if meridiem.eq_ignore_ascii_case("am") {
        if hour == 12 {
            0
        } else {
            hour
        }
    } else {
        return None;
    };

    Some(format!("{:02}:{}", hour, minute))
}

fn day_abbreviation(day_name: &str) -> Option<&'static str> {
    let day_name = day_name.trim();
    DAYS.iter()
        .find(|(full, _)| full.eq_ignore_ascii_case(day_name))
        .map(|(_, short)| *short)
}

fn day_full_name(abbreviation: &str) -> Option<&'static str> {
    DAYS.iter()
        .find(|(_, short)| *short == abbreviation)
        .map(|(full, _)| *full)
}

fn render_entry(entry: &str) -> Option<String> {
    let mut parts = entry.splitn(3, '-');
    let day = day_full_name(parts.next()?)?;
    let open = parts.next()?;
    let close = parts.next()?;

    if open == "00:00" && close == "24:00" {
        return Some(format!("{}: Open 24 hours", day));
    }

    Some(format!(
        "{}: {} – {}",
        day,
        to_12_hour(open)?,
        to_12_hour(close)?
    ))
}

fn to_12_hour(time: &str) -> Option<String> {
    let (hour, minute) = time.split_once(':')?;
    let hour = hour.parse::<u32>().ok()?;
    if hour > 24 || minute.len() != 2 || minute.parse::<u32>().ok()? > 59 {
        return None;
    }

    let (display_hour, meridiem) = match hour % 24 {
        0 => (12, "AM"),
        h @ 1..=11 => (h, "AM"),
        12 => (12, "PM"),
        h => (h - 12, "PM"),
    };

    Some(format!("{}:{} {}", display_hour, minute, meridiem))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_example_week() {
        let json = transcode_weekday_lines(&["Monday: 11:00 AM – 9:00 PM", "Tuesday: Closed"]).unwrap();
        assert_eq!(json, r#"{"openhours":["Mon-11:00-21:00"],"note":""}"#);
    }

    #[test]
    fn test_meridiem_conversion() {
        assert_eq!(to_24_hour(12, "00", "AM").as_deref(), Some("00:00"));
        assert_eq!(to_24_hour(12, "00", "PM").as_deref(), Some("12:00"));
        assert_eq!(to_24_hour(7, "30", "PM").as_deref(), Some("19:30"));
        assert_eq!(to_24_hour(7, "05", "am").as_deref(), Some("07:05"));
        assert_eq!(to_24_hour(13, "00", "PM"), None);
        assert_eq!(to_24_hour(0, "00", "AM"), None);
        assert_eq!(to_24_hour(9, "75", "AM"), None);
    }

    #[test]
    fn test_closed_is_case_insensitive() {
        assert_eq!(parse_weekday_line("Sunday: CLOSED"), None);
        assert_eq!(parse_weekday_line("Sunday: closed for holidays 9:00 AM – 5:00 PM"), None);
    }

    #[test]
    fn test_open_all_day() {
        assert_eq!(
            parse_weekday_line("Friday: Open 24 hours").as_deref(),
            Some("Fri-00:00-24:00")
        );
        assert_eq!(
            parse_weekday_line("Saturday: 24 hours").as_deref(),
            Some("Sat-00:00-24:00")
        );
    }

    #[test]
    fn test_unicode_spaces_before_meridiem() {
        let line = "Wednesday: 7:30\u{202F}AM – 10:00\u{2009}PM";
        assert_eq!(parse_weekday_line(line).as_deref(), Some("Wed-07:30-22:00"));

        let line = "Thursday: 8:00\u{00A0}AM – 5:00 PM";
        assert_eq!(parse_weekday_line(line).as_deref(), Some("Thu-08:00-17:00"));
    }

    #[test]
    fn test_unknown_day_dropped() {
        assert_eq!(parse_weekday_line("Holiday: 9:00 AM – 5:00 PM"), None);
        assert_eq!(parse_weekday_line("9:00 AM – 5:00 PM"), None);
    }

    #[test]
    fn test_split_shifts_dropped_not_truncated() {
        assert_eq!(
            parse_weekday_line("Monday: 11:00 AM – 2:00 PM, 5:00 PM – 9:00 PM"),
            None
        );
        assert_eq!(parse_weekday_line("Monday: from 11:00 AM"), None);
    }

    #[test]
    fn test_empty_and_all_closed_yield_empty_string() {
        let empty: [&str; 0] = [];
        assert_eq!(transcode_weekday_lines(&empty).unwrap(), "");
        assert_eq!(
            transcode_weekday_lines(&["Monday: Closed", "Tuesday: closed"]).unwrap(),
            ""
        );
    }

    #[test]
    fn test_output_counts_only_valid_lines() {
        let lines = [
            "Monday: 9:00 AM – 5:00 PM",
            "Tuesday: Closed",
            "Wednesday: 9:00 AM",
            "Thursday: 9:00 AM – 5:00 PM",
            "Someday: 9:00 AM – 5:00 PM",
        ];
        let json = transcode_weekday_lines(&lines).unwrap();
        let hours = OpenHours::parse(&json).unwrap();
        assert_eq!(hours.openhours, vec!["Mon-09:00-17:00", "Thu-09:00-17:00"]);
    }

    #[test]
    fn test_structured_text_expands_to_lines() {
        let text = r#"{"openhours":["Mon-07:30-22:00","Sat-00:00-24:00","Bad-entry"],"note":""}"#;
        assert_eq!(
            weekday_lines_from_text(text),
            vec!["Monday: 7:30 AM – 10:00 PM", "Saturday: Open 24 hours"]
        );
    }

    #[test]
    fn test_free_text_split_by_line() {
        let text = "Monday: 9:00 AM – 5:00 PM\n\n  Tuesday: Closed  \n";
        assert_eq!(
            weekday_lines_from_text(text),
            vec!["Monday: 9:00 AM – 5:00 PM", "Tuesday: Closed"]
        );
    }

    #[test]
    fn test_expanded_lines_transcode_back() {
        let stored = r#"{"openhours":["Mon-00:00-12:30","Tue-12:00-23:45"],"note":""}"#;
        let lines = weekday_lines_from_text(stored);
        assert_eq!(transcode_weekday_lines(&lines).unwrap(), stored);
    }
}
