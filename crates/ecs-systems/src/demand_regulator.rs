//! O2 demand regulator feeding the suit loop.

use ecs_core::PipeId;
use ecs_network::Network;
use tracing::info;

use crate::error::SystemResult;
use crate::scenario::{FieldValue, ScenarioRecord, ScenarioWriter, keys};
use crate::traits::{EcsComponent, SystemContext};

/// Supplies the suit loop on demand through a primary pipe and can vent
/// excess through a secondary suit relief pipe.
///
/// The relief path is only ever open while the primary is not closed.
/// Flow magnitudes are left to the network; the regulator only sets flags.
#[derive(Debug, Clone)]
pub struct DemandRegulator {
    pipe: PipeId,
    suit_relief: PipeId,
    closed: bool,
    suit_relief_valve_open: bool,
}

impl DemandRegulator {
    pub fn new(network: &Network, pipe: PipeId, suit_relief: PipeId) -> SystemResult<Self> {
        network.require_pipe(pipe)?;
        network.require_pipe(suit_relief)?;
        Ok(Self {
            pipe,
            suit_relief,
            closed: false,
            suit_relief_valve_open: false,
        })
    }

    /// No-op while closed.
    pub fn open_suit_relief_valve(&mut self) {
        if !self.closed {
            self.suit_relief_valve_open = true;
        }
    }

    /// No-op while closed.
    pub fn reset_suit_relief_valve(&mut self) {
        if !self.closed {
            self.suit_relief_valve_open = false;
        }
    }

    /// Shut the primary path. The relief path is shut with it and stays
    /// shut after a later `reset`.
    pub fn close(&mut self, network: &mut Network) {
        if !self.closed {
            info!(pipe = %self.pipe, "O2 demand regulator closed");
        }
        self.closed = true;
        self.suit_relief_valve_open = false;
        self.push_flags(network);
    }

    /// Reopen the primary path only.
    pub fn reset(&mut self, network: &mut Network) {
        if self.closed {
            info!(pipe = %self.pipe, "O2 demand regulator reset");
        }
        self.closed = false;
        self.push_flags(network);
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn is_suit_relief_valve_open(&self) -> bool {
        self.suit_relief_valve_open
    }

    fn push_flags(&self, network: &mut Network) {
        if let Some(pipe) = network.pipe_mut(self.pipe) {
            pipe.set_open(!self.closed);
        }
        if let Some(pipe) = network.pipe_mut(self.suit_relief) {
            pipe.set_open(!self.closed && self.suit_relief_valve_open);
        }
    }
}

impl EcsComponent for DemandRegulator {
    fn record_key(&self) -> String {
        keys::O2_DEMAND_REGULATOR.to_string()
    }

    fn system_timestep(&mut self, ctx: &mut SystemContext<'_>, _simdt: f64) {
        self.push_flags(ctx.network);
    }

    fn save_state(&self, out: &mut ScenarioWriter) {
        out.record(
            keys::O2_DEMAND_REGULATOR,
            &[
                ("closed", FieldValue::Bool(self.closed)),
                (
                    "suitreliefvalveopen",
                    FieldValue::Bool(self.suit_relief_valve_open),
                ),
            ],
        );
    }

    fn load_state(&mut self, record: &ScenarioRecord<'_>) {
        if let Some(closed) = record.bool("closed") {
            self.closed = closed;
        }
        if let Some(open) = record.bool("suitreliefvalveopen") {
            self.suit_relief_valve_open = open;
        }
        if self.closed {
            self.suit_relief_valve_open = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::VehicleSnapshot;
    use ecs_controls::{CueLog, Panel};
    use ecs_core::units::{k, m3, psi};
    use ecs_network::NetworkBuilder;

    fn fixture() -> (Network, PipeId, PipeId) {
        let mut b = NetworkBuilder::new();
        let supply = b.add_tank("O2MAINREG", m3(0.01), psi(100.0), k(290.0));
        let suit = b.add_tank("SUIT", m3(0.1), psi(4.8), k(290.0));
        let cabin = b.add_tank("CABIN", m3(6.0), psi(5.0), k(295.0));
        let primary = b.add_pipe("O2DEMANDREG", supply, suit, 1e-7);
        let relief = b.add_pipe("SUITRELIEF", suit, cabin, 1e-7);
        (b.build().unwrap(), primary, relief)
    }

    fn step(reg: &mut DemandRegulator, network: &mut Network) {
        let panel = Panel::new();
        let mut cues = CueLog::new();
        let vehicle = VehicleSnapshot::default();
        let mut ctx = SystemContext {
            network,
            panel: &panel,
            cues: &mut cues,
            vehicle: &vehicle,
        };
        reg.system_timestep(&mut ctx, 0.5);
    }

    #[test]
    fn step_pushes_both_flags() {
        let (mut network, primary, relief) = fixture();
        let mut reg = DemandRegulator::new(&network, primary, relief).unwrap();
        step(&mut reg, &mut network);
        assert!(network.pipe(primary).unwrap().is_open());
        assert!(!network.pipe(relief).unwrap().is_open());

        reg.open_suit_relief_valve();
        step(&mut reg, &mut network);
        assert!(network.pipe(relief).unwrap().is_open());

        reg.reset_suit_relief_valve();
        step(&mut reg, &mut network);
        assert!(!network.pipe(relief).unwrap().is_open());
    }

    #[test]
    fn close_then_reset_keeps_relief_shut() {
        let (mut network, primary, relief) = fixture();
        let mut reg = DemandRegulator::new(&network, primary, relief).unwrap();
        reg.open_suit_relief_valve();
        reg.close(&mut network);
        step(&mut reg, &mut network);
        assert!(!network.pipe(primary).unwrap().is_open());
        assert!(!network.pipe(relief).unwrap().is_open());

        reg.reset(&mut network);
        step(&mut reg, &mut network);
        assert!(network.pipe(primary).unwrap().is_open());
        assert!(!network.pipe(relief).unwrap().is_open());
        assert!(!reg.is_suit_relief_valve_open());
    }

    #[test]
    fn relief_commands_ignored_while_closed() {
        let (mut network, primary, relief) = fixture();
        let mut reg = DemandRegulator::new(&network, primary, relief).unwrap();
        reg.close(&mut network);
        reg.open_suit_relief_valve();
        assert!(!reg.is_suit_relief_valve_open());
        step(&mut reg, &mut network);
        assert!(!network.pipe(relief).unwrap().is_open());
    }

    #[test]
    fn loaded_closed_state_drops_relief_flag() {
        let (mut network, primary, relief) = fixture();
        let mut reg = DemandRegulator::new(&network, primary, relief).unwrap();
        let record =
            ScenarioRecord::parse("O2DEMANDREGULATOR closed 1 suitreliefvalveopen 1").unwrap();
        reg.load_state(&record);
        assert!(reg.is_closed());
        assert!(!reg.is_suit_relief_valve_open());
        step(&mut reg, &mut network);
        assert!(!network.pipe(relief).unwrap().is_open());

        reg.reset(&mut network);
        step(&mut reg, &mut network);
        assert!(network.pipe(primary).unwrap().is_open());
        assert!(!network.pipe(relief).unwrap().is_open());
    }

    #[test]
    fn loaded_open_relief_survives_when_primary_open() {
        let (mut network, primary, relief) = fixture();
        let mut reg = DemandRegulator::new(&network, primary, relief).unwrap();
        let record =
            ScenarioRecord::parse("O2DEMANDREGULATOR closed 0 suitreliefvalveopen 1").unwrap();
        reg.load_state(&record);
        step(&mut reg, &mut network);
        assert!(reg.is_suit_relief_valve_open());
        assert!(network.pipe(relief).unwrap().is_open());
    }
}
