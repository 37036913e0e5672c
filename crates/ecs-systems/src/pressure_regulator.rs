//! Cabin pressure regulator.

use ecs_core::units::{MassRate, Pressure, lbph, psi};
use ecs_core::PipeId;
use ecs_network::Network;
use tracing::info;

use crate::error::SystemResult;
use crate::scenario::{FieldValue, ScenarioRecord, ScenarioWriter, keys};
use crate::traits::{EcsComponent, SystemContext};

/// Regulates the pressure delivered through one pipe.
///
/// Regulation is stateless: every step re-asserts the commanded pressure and
/// flow ceiling on the pipe. While closed the pipe is held shut.
#[derive(Debug, Clone)]
pub struct PressureRegulator {
    pipe: PipeId,
    pressure: Option<Pressure>,
    max_flow: Option<MassRate>,
    closed: bool,
}

impl PressureRegulator {
    pub fn new(network: &Network, pipe: PipeId) -> SystemResult<Self> {
        network.require_pipe(pipe)?;
        Ok(Self {
            pipe,
            pressure: None,
            max_flow: None,
            closed: false,
        })
    }

    pub fn pipe(&self) -> PipeId {
        self.pipe
    }

    /// Commanded outlet pressure. Takes effect while not closed.
    pub fn set_pressure_psi(&mut self, p: f64) {
        self.pressure = Some(psi(p));
    }

    pub fn pressure(&self) -> Option<Pressure> {
        self.pressure
    }

    pub fn set_max_flow_lbh(&mut self, flow: f64) {
        self.max_flow = Some(lbph(flow));
    }

    /// Remove the flow ceiling.
    pub fn reset_max_flow(&mut self) {
        self.max_flow = None;
    }

    pub fn max_flow(&self) -> Option<MassRate> {
        self.max_flow
    }

    pub fn close(&mut self, network: &mut Network) {
        if !self.closed {
            info!(pipe = %self.pipe, "cabin pressure regulator closed");
        }
        self.closed = true;
        if let Some(pipe) = network.pipe_mut(self.pipe) {
            pipe.set_open(false);
        }
    }

    pub fn reset(&mut self, network: &mut Network) {
        if self.closed {
            info!(pipe = %self.pipe, "cabin pressure regulator reset");
        }
        self.closed = false;
        if let Some(pipe) = network.pipe_mut(self.pipe) {
            pipe.set_open(true);
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl EcsComponent for PressureRegulator {
    fn record_key(&self) -> String {
        keys::CABIN_PRESSURE_REGULATOR.to_string()
    }

    fn system_timestep(&mut self, ctx: &mut SystemContext<'_>, _simdt: f64) {
        let Some(pipe) = ctx.network.pipe_mut(self.pipe) else {
            return;
        };
        if self.closed {
            pipe.set_open(false);
            return;
        }
        pipe.set_open(true);
        pipe.set_target_pressure(self.pressure);
        pipe.set_max_flow(self.max_flow);
    }

    fn save_state(&self, out: &mut ScenarioWriter) {
        out.record(
            keys::CABIN_PRESSURE_REGULATOR,
            &[("closed", FieldValue::Bool(self.closed))],
        );
    }

    fn load_state(&mut self, record: &ScenarioRecord<'_>) {
        if let Some(closed) = record.bool("closed") {
            self.closed = closed;
        }
    }
}
