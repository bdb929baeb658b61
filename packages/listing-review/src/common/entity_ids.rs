//! Typed ID definitions for review entities.
//!
//! ```rust
//! use listing_review::common::{ListingId, MemberId};
//!
//! let listing_id = ListingId::new();
//! let admin_id = MemberId::new();
//! // let wrong: ListingId = admin_id; // compile error
//! # let _ = (listing_id, admin_id);
//! ```

pub use super::id::Id;

/// Marker type for business listings under review.
pub struct Listing;

/// Marker type for members (submitters, editors and admins).
pub struct Member;

/// Marker type for validation history entries.
pub struct ValidationRun;

/// Typed ID for listings.
pub type ListingId = Id<Listing>;

/// Typed ID for members.
pub type MemberId = Id<Member>;

/// Typed ID for validation history entries.
pub type ValidationRunId = Id<ValidationRun>;
