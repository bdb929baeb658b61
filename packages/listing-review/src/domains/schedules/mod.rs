//! Schedules domain - weekly opening hours.

pub mod opening_hours;

pub use opening_hours::{transcode_weekday_lines, weekday_lines_from_text, OpenHours};
