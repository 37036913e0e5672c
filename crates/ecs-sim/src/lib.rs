//! ecs-sim: the host vehicle around the environmental control components.
//!
//! Provides:
//! - YAML vehicle configuration with validation (bundled CSM config)
//! - Vehicle assembly: network, panel, cues and every ECS component
//! - Per-tick stepping with a single network pass per tick
//! - ECS scenario sections (`BEGIN_ECS` .. `END_ECS`) save and load
//! - Fixed-step run loop with decimated sample recording

pub mod config;
pub mod error;
pub mod scenario;
pub mod sim;
pub mod validate;
pub mod vehicle;

// Re-exports for public API
pub use config::{ConfigError, ConfigResult, VehicleConfig, load_yaml, save_yaml};
pub use error::{SimError, SimResult};
pub use scenario::{SECTION_BEGIN, SECTION_END, ecs_records};
pub use sim::{SimOptions, SimRecord, run};
pub use validate::{ValidationError, validate_config};
pub use vehicle::{EcsCommand, Vehicle};
