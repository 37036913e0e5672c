//! Incremental network builder.

use ecs_core::units::constants::R_O2;
use ecs_core::units::{Pressure, Temperature, Volume};
use ecs_core::{PipeId, TankId};

use crate::error::NetworkResult;
use crate::network::{Network, Pipe, Tank};
use crate::validate;

/// Volume given to boundary tanks; it only matters for the ideal-gas
/// bookkeeping since boundaries never change state.
const BOUNDARY_VOLUME_M3: f64 = 1.0;

/// Builder for constructing a network incrementally.
///
/// Use `add_tank`, `add_boundary` and `add_pipe` to build up the network,
/// then call `build()` to validate and freeze its topology.
#[derive(Debug, Default)]
pub struct NetworkBuilder {
    tanks: Vec<Tank>,
    pipes: Vec<Pipe>,
}

impl NetworkBuilder {
    /// Create a new empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tank filled to `pressure` at `temperature` and return its ID.
    pub fn add_tank(
        &mut self,
        name: impl Into<String>,
        volume: Volume,
        pressure: Pressure,
        temperature: Temperature,
    ) -> TankId {
        self.push_tank(name.into(), volume.value, pressure, temperature, false)
    }

    /// Add a fixed-state boundary tank (ambient, effectively infinite supply).
    pub fn add_boundary(
        &mut self,
        name: impl Into<String>,
        pressure: Pressure,
        temperature: Temperature,
    ) -> TankId {
        self.push_tank(name.into(), BOUNDARY_VOLUME_M3, pressure, temperature, true)
    }

    /// Add a pipe from `from` into `to`.
    ///
    /// `conductance` is the mass flow (kg/s) per pascal of driving pressure at
    /// unit opening. Pipes start closed with unit opening and no commands.
    pub fn add_pipe(
        &mut self,
        name: impl Into<String>,
        from: TankId,
        to: TankId,
        conductance: f64,
    ) -> PipeId {
        let id = PipeId::from_index(self.pipes.len() as u32);
        self.pipes.push(Pipe {
            id,
            name: name.into(),
            from,
            to,
            conductance,
            open: false,
            size: 1.0,
            target: None,
            max_flow: None,
            flow_kgps: 0.0,
        });
        id
    }

    /// Build and validate the network.
    pub fn build(self) -> NetworkResult<Network> {
        validate::validate_structure(&self.tanks, &self.pipes)?;
        Ok(Network {
            tanks: self.tanks,
            pipes: self.pipes,
        })
    }

    fn push_tank(
        &mut self,
        name: String,
        volume_m3: f64,
        pressure: Pressure,
        temperature: Temperature,
        fixed: bool,
    ) -> TankId {
        let id = TankId::from_index(self.tanks.len() as u32);
        let temperature_k = temperature.value;
        // Guarded again in validation; keeps the division finite here.
        let mass_kg = if volume_m3 > 0.0 && temperature_k > 0.0 {
            (pressure.value * volume_m3 / (R_O2 * temperature_k)).max(0.0)
        } else {
            0.0
        };
        self.tanks.push(Tank {
            id,
            name,
            volume_m3,
            mass_kg,
            temperature_k,
            co2_fraction: 0.0,
            fixed,
        });
        id
    }
}
