//! Cabin pressure relief valve and post-landing vent.

use ecs_controls::{ControlKind, Panel, ThreePosition};
use ecs_core::numeric::unit_ratio;
use ecs_core::units::to_psi;
use ecs_core::{BusId, ControlId, CueId, PipeId};
use ecs_network::Network;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::SystemResult;
use crate::scenario::{FieldValue, ScenarioRecord, ScenarioWriter, keys};
use crate::traits::{EcsComponent, SystemContext};

/// Relief valve lever (a three-detent thumbwheel).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReliefLever {
    /// Held shut at any pressure.
    Closed,
    /// Opens on overpressure.
    Normal,
    /// Held open at full leak size.
    Dump,
}

impl ReliefLever {
    /// Unknown positions read as `Normal`.
    pub fn from_position(position: u8) -> Self {
        match position {
            0 => ReliefLever::Closed,
            2 => ReliefLever::Dump,
            _ => ReliefLever::Normal,
        }
    }

    pub fn position(self) -> u8 {
        match self {
            ReliefLever::Closed => 0,
            ReliefLever::Normal => 1,
            ReliefLever::Dump => 2,
        }
    }
}

/// Network and panel handles a relief valve is wired to.
#[derive(Debug, Clone, Copy)]
pub struct ReliefValveWiring {
    /// Cabin to ambient.
    pub vent: PipeId,
    /// Ambient to cabin, used by the post-landing vent.
    pub inlet: PipeId,
    pub lever: ControlId,
    pub post_landing_valve: ControlId,
    pub post_landing_vent: ControlId,
    pub post_landing_power: BusId,
}

/// Persistent tunables of a relief valve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReliefSettings {
    /// Opening of the vent when fully open (0 = sealed).
    pub leak_size: f64,
    /// Overpressure above which the valve begins to open.
    pub relief_pressure_psi: f64,
}

/// Vents the cabin to ambient on overpressure or on command, and lets
/// ambient air in through the post-landing vent.
///
/// The vent cue plays once on every transition from fully shut to open.
#[derive(Debug, Clone)]
pub struct ReliefValve {
    index: u32,
    wiring: ReliefValveWiring,
    settings: ReliefSettings,
    vent_cue: CueId,
    vent_open: bool,
    inlet_open: bool,
}

impl ReliefValve {
    pub fn new(
        index: u32,
        wiring: ReliefValveWiring,
        settings: ReliefSettings,
        vent_cue: CueId,
        network: &Network,
        panel: &Panel,
    ) -> SystemResult<Self> {
        network.require_pipe(wiring.vent)?;
        network.require_pipe(wiring.inlet)?;
        panel.require_kind(wiring.lever, ControlKind::Thumbwheel { positions: 3 })?;
        panel.require_kind(wiring.post_landing_valve, ControlKind::CircuitBreaker)?;
        panel.require_kind(wiring.post_landing_vent, ControlKind::ThreePosition)?;
        panel.require_bus(wiring.post_landing_power)?;
        Ok(Self {
            index,
            wiring,
            settings,
            vent_cue,
            vent_open: false,
            inlet_open: false,
        })
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn set_leak_size(&mut self, leak_size: f64) {
        self.settings.leak_size = leak_size;
    }

    pub fn leak_size(&self) -> f64 {
        self.settings.leak_size
    }

    pub fn set_relief_pressure_psi(&mut self, p: f64) {
        self.settings.relief_pressure_psi = p;
    }

    pub fn relief_pressure_psi(&self) -> f64 {
        self.settings.relief_pressure_psi
    }

    pub fn settings(&self) -> ReliefSettings {
        self.settings
    }

    /// Vent state commanded by the last step.
    pub fn is_venting(&self) -> bool {
        self.vent_open
    }

    /// Post-landing inlet state commanded by the last step.
    pub fn is_inlet_open(&self) -> bool {
        self.inlet_open
    }

    /// Vent opening for the given lever and overpressure.
    fn vent_opening(&self, lever: ReliefLever, overpressure_psi: f64) -> f64 {
        let ReliefSettings {
            leak_size,
            relief_pressure_psi: relief,
        } = self.settings;
        match lever {
            ReliefLever::Closed => 0.0,
            ReliefLever::Dump => leak_size,
            ReliefLever::Normal if overpressure_psi > relief => {
                leak_size * unit_ratio(overpressure_psi - relief, relief)
            }
            ReliefLever::Normal => 0.0,
        }
    }

    fn post_landing_inlet_open(&self, panel: &Panel) -> bool {
        panel.breaker_closed(self.wiring.post_landing_valve)
            && panel.bus_powered(self.wiring.post_landing_power)
            && panel.three_position(self.wiring.post_landing_vent) == Some(ThreePosition::Up)
    }
}

fn pipe_open(network: &Network, pipe: PipeId) -> bool {
    network.pipe(pipe).is_some_and(|p| p.is_open())
}

impl EcsComponent for ReliefValve {
    fn record_key(&self) -> String {
        format!("{}{}", keys::CABIN_PRESSURE_RELIEF_VALVE, self.index)
    }

    fn system_timestep(&mut self, ctx: &mut SystemContext<'_>, _simdt: f64) {
        let network = &mut *ctx.network;
        let was_open = pipe_open(network, self.wiring.vent) || pipe_open(network, self.wiring.inlet);

        let lever = ctx
            .panel
            .position(self.wiring.lever)
            .map_or(ReliefLever::Normal, ReliefLever::from_position);
        let overpressure = network
            .differential(self.wiring.vent)
            .map_or(0.0, to_psi);
        let opening = self.vent_opening(lever, overpressure);
        self.vent_open = opening > 0.0;
        if let Some(pipe) = network.pipe_mut(self.wiring.vent) {
            pipe.set_open(self.vent_open);
            pipe.set_size(opening);
        }

        self.inlet_open = self.post_landing_inlet_open(ctx.panel) && self.settings.leak_size > 0.0;
        if let Some(pipe) = network.pipe_mut(self.wiring.inlet) {
            pipe.set_open(self.inlet_open);
            pipe.set_size(self.settings.leak_size);
        }

        let now_open = self.vent_open || self.inlet_open;
        if now_open && !was_open {
            info!(valve = self.index, ?lever, overpressure_psi = overpressure, "relief valve opened");
            ctx.cues.play(self.vent_cue);
        } else if was_open && !now_open {
            info!(valve = self.index, "relief valve closed");
        }
    }

    fn save_state(&self, out: &mut ScenarioWriter) {
        out.record(
            &self.record_key(),
            &[
                ("leaksize", FieldValue::Real(self.settings.leak_size)),
                (
                    "reliefpressure",
                    FieldValue::Real(self.settings.relief_pressure_psi),
                ),
            ],
        );
    }

    fn load_state(&mut self, record: &ScenarioRecord<'_>) {
        if let Some(leak_size) = record.real("leaksize") {
            self.settings.leak_size = leak_size;
        }
        if let Some(relief) = record.real("reliefpressure") {
            self.settings.relief_pressure_psi = relief;
        }
    }
}
