//! Tanks, pipes and the network arena that owns them.

use ecs_core::units::constants::R_O2;
use ecs_core::units::{Mass, MassRate, Pressure, Temperature, Volume, kg, kgps, pa};
use ecs_core::{PipeId, TankId};

use crate::error::{NetworkError, NetworkResult};

/// A pressurized volume (cabin, suit loop, O2 bottle, ambient).
///
/// Gas is treated as ideal oxygen with a trace CO2 mass fraction, which is
/// all the ECS components need to read back (pressure, temperature, CO2
/// partial pressure). A fixed tank is a boundary whose state never changes.
#[derive(Debug, Clone, PartialEq)]
pub struct Tank {
    pub id: TankId,
    pub name: String,
    pub(crate) volume_m3: f64,
    pub(crate) mass_kg: f64,
    pub(crate) temperature_k: f64,
    pub(crate) co2_fraction: f64,
    pub(crate) fixed: bool,
}

impl Tank {
    pub fn volume(&self) -> Volume {
        ecs_core::units::m3(self.volume_m3)
    }

    pub fn mass(&self) -> Mass {
        kg(self.mass_kg)
    }

    pub fn temperature(&self) -> Temperature {
        ecs_core::units::k(self.temperature_k)
    }

    /// Ideal-gas pressure from current contents.
    pub fn pressure(&self) -> Pressure {
        pa(self.mass_kg * R_O2 * self.temperature_k / self.volume_m3)
    }

    /// Partial pressure of CO2 (mass fraction approximation).
    pub fn co2_partial_pressure(&self) -> Pressure {
        self.pressure() * self.co2_fraction
    }

    pub fn co2_fraction(&self) -> f64 {
        self.co2_fraction
    }

    pub fn is_fixed(&self) -> bool {
        self.fixed
    }

    /// Set contents so that the tank sits at `p` at its current temperature.
    pub fn set_pressure(&mut self, p: Pressure) {
        self.mass_kg = (p.value * self.volume_m3 / (R_O2 * self.temperature_k)).max(0.0);
    }

    /// Change temperature at constant contents (pressure follows).
    pub fn set_temperature(&mut self, t: Temperature) {
        if t.value > 0.0 {
            self.temperature_k = t.value;
        }
    }

    pub fn set_co2_fraction(&mut self, fraction: f64) {
        self.co2_fraction = fraction.clamp(0.0, 1.0);
    }
}

/// A valved connection from an upstream tank into a downstream tank.
///
/// The `open` flag is the inbound connection state the ECS components
/// command. `size` scales the opening; `target` and `max_flow` are the
/// regulator commands the transport step honours.
#[derive(Debug, Clone, PartialEq)]
pub struct Pipe {
    pub id: PipeId,
    pub name: String,
    pub(crate) from: TankId,
    pub(crate) to: TankId,
    pub(crate) conductance: f64,
    pub(crate) open: bool,
    pub(crate) size: f64,
    pub(crate) target: Option<Pressure>,
    pub(crate) max_flow: Option<MassRate>,
    pub(crate) flow_kgps: f64,
}

impl Pipe {
    /// Upstream tank.
    pub fn from(&self) -> TankId {
        self.from
    }

    /// Downstream tank.
    pub fn to(&self) -> TankId {
        self.to
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn set_open(&mut self, open: bool) {
        self.open = open;
    }

    pub fn size(&self) -> f64 {
        self.size
    }

    pub fn set_size(&mut self, size: f64) {
        self.size = size;
    }

    /// Commanded downstream pressure, `None` when unregulated.
    pub fn target_pressure(&self) -> Option<Pressure> {
        self.target
    }

    pub fn set_target_pressure(&mut self, target: Option<Pressure>) {
        self.target = target;
    }

    /// Flow ceiling, `None` when unrestricted.
    pub fn max_flow(&self) -> Option<MassRate> {
        self.max_flow
    }

    pub fn set_max_flow(&mut self, max_flow: Option<MassRate>) {
        self.max_flow = max_flow;
    }

    /// Flow computed by the last transport step (positive = from → to).
    pub fn flow(&self) -> MassRate {
        kgps(self.flow_kgps)
    }
}

/// The fluid network: validated tank and pipe arenas addressed by handle.
///
/// Topology is frozen at build time; only tank contents and pipe commands
/// change afterwards.
#[derive(Debug, Clone)]
pub struct Network {
    pub(crate) tanks: Vec<Tank>,
    pub(crate) pipes: Vec<Pipe>,
}

impl Network {
    /// Return all tanks.
    pub fn tanks(&self) -> &[Tank] {
        &self.tanks
    }

    /// Return all pipes.
    pub fn pipes(&self) -> &[Pipe] {
        &self.pipes
    }

    /// Get a tank by ID (returns None if ID out of bounds).
    pub fn tank(&self, id: TankId) -> Option<&Tank> {
        self.tanks.get(id.slot())
    }

    pub fn tank_mut(&mut self, id: TankId) -> Option<&mut Tank> {
        self.tanks.get_mut(id.slot())
    }

    /// Get a pipe by ID (returns None if ID out of bounds).
    pub fn pipe(&self, id: PipeId) -> Option<&Pipe> {
        self.pipes.get(id.slot())
    }

    pub fn pipe_mut(&mut self, id: PipeId) -> Option<&mut Pipe> {
        self.pipes.get_mut(id.slot())
    }

    /// Lookup that reports an unknown handle as an error.
    pub fn require_tank(&self, id: TankId) -> NetworkResult<&Tank> {
        self.tank(id).ok_or(NetworkError::UnknownTank { tank: id })
    }

    /// Lookup that reports an unknown handle as an error.
    pub fn require_pipe(&self, id: PipeId) -> NetworkResult<&Pipe> {
        self.pipe(id).ok_or(NetworkError::UnknownPipe { pipe: id })
    }

    pub fn tank_by_name(&self, name: &str) -> Option<TankId> {
        self.tanks.iter().find(|t| t.name == name).map(|t| t.id)
    }

    pub fn pipe_by_name(&self, name: &str) -> Option<PipeId> {
        self.pipes.iter().find(|p| p.name == name).map(|p| p.id)
    }

    /// Pressure of the tank feeding a pipe.
    pub fn inlet_pressure(&self, pipe: PipeId) -> Option<Pressure> {
        let pipe = self.pipe(pipe)?;
        Some(self.tank(pipe.from)?.pressure())
    }

    /// Pressure of the tank a pipe discharges into.
    pub fn outlet_pressure(&self, pipe: PipeId) -> Option<Pressure> {
        let pipe = self.pipe(pipe)?;
        Some(self.tank(pipe.to)?.pressure())
    }

    /// Upstream minus downstream pressure across a pipe.
    pub fn differential(&self, pipe: PipeId) -> Option<Pressure> {
        Some(self.inlet_pressure(pipe)? - self.outlet_pressure(pipe)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NetworkBuilder;
    use ecs_core::units::{k, m3, psi, to_psi};

    #[test]
    fn tank_pressure_follows_contents() {
        let mut builder = NetworkBuilder::new();
        let cabin = builder.add_tank("CABIN", m3(6.0), psi(5.0), k(295.0));
        let mut network = builder.build().unwrap();

        let tank = network.tank_mut(cabin).unwrap();
        assert!((to_psi(tank.pressure()) - 5.0).abs() < 1e-9);

        tank.set_pressure(psi(3.5));
        assert!((to_psi(tank.pressure()) - 3.5).abs() < 1e-9);

        // Heating at fixed contents raises pressure.
        tank.set_temperature(k(590.0));
        assert!((to_psi(tank.pressure()) - 7.0).abs() < 1e-9);
    }

    #[test]
    fn co2_partial_pressure_is_fractional() {
        let mut builder = NetworkBuilder::new();
        let suit = builder.add_tank("SUIT", m3(0.2), psi(4.0), k(290.0));
        let mut network = builder.build().unwrap();

        let tank = network.tank_mut(suit).unwrap();
        tank.set_co2_fraction(0.25);
        assert!((to_psi(tank.co2_partial_pressure()) - 1.0).abs() < 1e-9);

        tank.set_co2_fraction(3.0);
        assert_eq!(tank.co2_fraction(), 1.0);
    }

    #[test]
    fn pipe_commands_round_trip() {
        let mut builder = NetworkBuilder::new();
        let a = builder.add_tank("A", m3(1.0), psi(10.0), k(290.0));
        let b = builder.add_tank("B", m3(1.0), psi(5.0), k(290.0));
        let p = builder.add_pipe("AB", a, b, 1e-6);
        let mut network = builder.build().unwrap();

        let pipe = network.pipe_mut(p).unwrap();
        assert!(!pipe.is_open());
        pipe.set_open(true);
        pipe.set_target_pressure(Some(psi(5.0)));
        pipe.set_max_flow(None);

        assert!(network.pipe(p).unwrap().is_open());
        assert_eq!(network.pipe(p).unwrap().target_pressure(), Some(psi(5.0)));
        let dp = network.differential(p).unwrap();
        assert!((to_psi(dp) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn unknown_handles_are_reported() {
        let network = NetworkBuilder::new().build().unwrap();
        assert!(network.tank(TankId::from_index(3)).is_none());
        let ghost = PipeId::from_index(3);
        assert_eq!(
            network.require_pipe(ghost).unwrap_err(),
            NetworkError::UnknownPipe { pipe: ghost }
        );
    }
}
