//! ecs-network: the pressurized-volume network the ECS components drive.
//!
//! Provides:
//! - Tanks (pressurized volumes) and pipes (valved connections between tanks)
//! - Incremental network builder with validation
//! - A lumped explicit transport step that moves gas along open pipes
//!
//! Components never own tanks or pipes. They keep `TankId`/`PipeId` handles
//! and receive the `Network` by reference each step.
//!
//! # Example
//!
//! ```
//! use ecs_core::units::{k, m3, psi, to_psi};
//! use ecs_network::NetworkBuilder;
//!
//! let mut builder = NetworkBuilder::new();
//! let cabin = builder.add_tank("CABIN", m3(6.0), psi(5.0), k(295.0));
//! let space = builder.add_boundary("AMBIENT", psi(0.0), k(295.0));
//! let vent = builder.add_pipe("CABINVENT", cabin, space, 1e-6);
//! let mut network = builder.build().unwrap();
//!
//! network.pipe_mut(vent).unwrap().set_open(true);
//! network.advance(1.0);
//! assert!(to_psi(network.tank(cabin).unwrap().pressure()) < 5.0);
//! ```

pub mod builder;
pub mod error;
pub mod network;
pub mod transport;
pub(crate) mod validate;

// Re-exports for ergonomics
pub use builder::NetworkBuilder;
pub use error::{NetworkError, NetworkResult};
pub use network::{Network, Pipe, Tank};
