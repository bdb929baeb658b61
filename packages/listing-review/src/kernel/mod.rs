//! Kernel module - collaborator traits and dependency wiring.

pub mod deps;
pub mod telemetry;
pub mod test_dependencies;
pub mod traits;

pub use deps::ReviewDeps;
pub use telemetry::{init_tracing, TracingEventSink};
pub use test_dependencies::TestDependencies;
pub use traits::*;
