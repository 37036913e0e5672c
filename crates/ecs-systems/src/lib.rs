//! ecs-systems: the environmental control components of the command module.
//!
//! Provides the six ECS components that sit between the panel and the fluid
//! network:
//! - `PressureRegulator`: cabin pressure regulator (set-point + flow ceiling)
//! - `DemandRegulator`: O2 demand regulator with suit relief path
//! - `ReliefValve`: cabin pressure relief and post-landing vent
//! - `ReturnValve`: suit circuit return valve
//! - `SupplyRouter`: O2 SM supply, surge tank and repress package routing
//! - `CrewStatusMonitor`: crew survival state machine
//!
//! Components hold handles into the externally owned `Network` and `Panel`
//! and are stepped through the `EcsComponent` trait with a `SystemContext`.
//! Their persistent fields round-trip through flat scenario records.
//!
//! # Example
//!
//! ```
//! use ecs_core::units::{k, m3, psi};
//! use ecs_controls::{CueLog, Panel};
//! use ecs_network::NetworkBuilder;
//! use ecs_systems::{EcsComponent, PressureRegulator, SystemContext, VehicleSnapshot};
//!
//! let mut builder = NetworkBuilder::new();
//! let main_reg = builder.add_tank("O2MAINREG", m3(0.01), psi(100.0), k(290.0));
//! let cabin = builder.add_tank("CABIN", m3(6.0), psi(4.0), k(295.0));
//! let line = builder.add_pipe("CABINREGULATOR", main_reg, cabin, 1e-7);
//! let mut network = builder.build().unwrap();
//! let panel = Panel::new();
//! let mut cues = CueLog::new();
//! let vehicle = VehicleSnapshot::default();
//!
//! let mut regulator = PressureRegulator::new(&network, line).unwrap();
//! regulator.set_pressure_psi(5.0);
//!
//! let mut ctx = SystemContext {
//!     network: &mut network,
//!     panel: &panel,
//!     cues: &mut cues,
//!     vehicle: &vehicle,
//! };
//! regulator.system_timestep(&mut ctx, 0.1);
//! assert!(network.pipe(line).unwrap().is_open());
//! ```

pub mod crew_status;
pub mod demand_regulator;
pub mod error;
pub mod limits;
pub mod pressure_regulator;
pub mod relief_valve;
pub mod return_valve;
pub mod scenario;
pub mod supply_router;
pub mod traits;

// Re-exports
pub use crew_status::{CrewStatus, CrewStatusMonitor};
pub use demand_regulator::DemandRegulator;
pub use error::{SystemError, SystemResult};
pub use limits::{Hazard, PhysiologyLimits};
pub use pressure_regulator::PressureRegulator;
pub use relief_valve::{ReliefLever, ReliefSettings, ReliefValve, ReliefValveWiring};
pub use return_valve::ReturnValve;
pub use scenario::{FieldValue, ScenarioRecord, ScenarioWriter};
pub use supply_router::{Routing, SupplyLines, SupplyRouter, SupplySelectors};
pub use traits::{EcsComponent, SystemContext, VehicleSnapshot, VehicleState};
