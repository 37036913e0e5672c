//! Panel controls, DC buses and audible cues for the ECS.
//!
//! This crate is the panel side of the environmental control system. It owns
//! every switch, breaker and selector; the ECS components only read their
//! positions. It also provides the cue-playback seam the components use for
//! audible feedback.
//!
//! # Architecture
//!
//! - Controls are discrete: a position index in `0..positions`
//! - The `Panel` is a registry addressed by `ControlId` / `BusId` handles
//! - Cues are fire-and-forget through the `CuePlayer` trait
//!
//! # Example
//!
//! ```
//! use ecs_controls::{Panel, ThreePosition};
//!
//! let mut panel = Panel::new();
//! let vent = panel.add_three_position("PostLandingVent", ThreePosition::Center);
//! panel.set_position(vent, ThreePosition::Up.position()).unwrap();
//! assert_eq!(panel.three_position(vent), Some(ThreePosition::Up));
//! ```

pub mod control;
pub mod cue;
pub mod error;
pub mod panel;

pub use control::{ControlInput, ControlKind, DcBus, ThreePosition};
pub use cue::{CueLog, CuePlayer};
pub use error::{ControlError, ControlResult};
pub use panel::Panel;
