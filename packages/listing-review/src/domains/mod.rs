pub mod approval;
pub mod drafts;
pub mod listings;
pub mod schedules;
pub mod suggestions;
pub mod trust;
