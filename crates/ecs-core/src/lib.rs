//! ecs-core: shared foundation for the environmental control workspace.
//!
//! Contains:
//! - units (uom SI types + PSI / lb/h / mmHg constructors)
//! - numeric (finite/timestep guards and clamped ratios)
//! - ids (compact handles for tanks, pipes, controls, buses and cues)
//! - error (shared error types)

pub mod error;
pub mod ids;
pub mod numeric;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{EcsError, EcsResult};
pub use ids::*;
pub use numeric::*;
pub use units::*;
