//! Core traits shared by every ECS component.

use ecs_controls::{CuePlayer, Panel};
use ecs_core::units::{Velocity, mps};
use ecs_network::Network;

use crate::scenario::{ScenarioRecord, ScenarioWriter};

/// The slice of the host vehicle the ECS reads.
pub trait VehicleState {
    /// Vertical velocity relative to the local surface.
    fn vertical_velocity(&self) -> Velocity;

    /// Whether a crew is aboard. Crew health is not evaluated otherwise.
    fn crew_aboard(&self) -> bool {
        true
    }
}

/// Plain vehicle state the host refreshes once per tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VehicleSnapshot {
    pub vertical_velocity: Velocity,
    pub crew_aboard: bool,
}

impl VehicleSnapshot {
    pub fn new(vertical_velocity_mps: f64, crew_aboard: bool) -> Self {
        Self {
            vertical_velocity: mps(vertical_velocity_mps),
            crew_aboard,
        }
    }
}

impl Default for VehicleSnapshot {
    fn default() -> Self {
        Self::new(0.0, true)
    }
}

impl VehicleState for VehicleSnapshot {
    fn vertical_velocity(&self) -> Velocity {
        self.vertical_velocity
    }

    fn crew_aboard(&self) -> bool {
        self.crew_aboard
    }
}

/// Everything a component may touch during one tick.
///
/// The network is the only mutable collaborator besides the cue player;
/// controls are read-only to components.
pub struct SystemContext<'a> {
    pub network: &'a mut Network,
    pub panel: &'a Panel,
    pub cues: &'a mut dyn CuePlayer,
    pub vehicle: &'a dyn VehicleState,
}

/// A component of the environmental control system.
///
/// The host calls `system_timestep` once per tick on every component with
/// the same `simdt`, then runs the fluid network once.
pub trait EcsComponent {
    /// Scenario record key this component saves under.
    fn record_key(&self) -> String;

    /// Read controls and network state, then command the network.
    fn system_timestep(&mut self, ctx: &mut SystemContext<'_>, simdt: f64);

    /// Append this component's persistent fields. Stateless components
    /// write nothing.
    fn save_state(&self, _out: &mut ScenarioWriter) {}

    /// Restore persistent fields from a record with this component's key.
    /// Missing or malformed fields keep their current values.
    fn load_state(&mut self, _record: &ScenarioRecord<'_>) {}
}
