pub mod field;
pub mod listing;
pub mod place_data;
pub mod submitter;
pub mod validation_history;

pub use field::*;
pub use listing::*;
pub use place_data::*;
pub use submitter::*;
pub use validation_history::*;
