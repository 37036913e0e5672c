//! O2 SM supply, surge tank and repress package routing.

use ecs_controls::{ControlKind, Panel};
use ecs_core::{ControlId, PipeId};
use ecs_network::Network;
use tracing::info;

use crate::error::SystemResult;
use crate::scenario::{FieldValue, ScenarioRecord, ScenarioWriter, keys};
use crate::traits::{EcsComponent, SystemContext};

/// Selector detents.
pub mod positions {
    pub const OFF: u8 = 0;
    pub const ON: u8 = 1;
    /// Repress package only: recharge the bottles from the main regulator.
    pub const FILL: u8 = 2;
}

/// Pipes from each source into the shared O2 main regulator node.
#[derive(Debug, Clone, Copy)]
pub struct SupplyLines {
    pub sm_supply: PipeId,
    pub surge_tank: PipeId,
    pub repress_package: PipeId,
    /// Main regulator back into the repress package.
    pub repress_fill: Option<PipeId>,
}

/// The three rotary selectors.
#[derive(Debug, Clone, Copy)]
pub struct SupplySelectors {
    pub sm_supply: ControlId,
    pub surge_tank: ControlId,
    pub repress_package: ControlId,
}

/// Which lines are connected for a given set of selector positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Routing {
    pub sm_supply: bool,
    pub surge_tank: bool,
    pub repress_package: bool,
    pub repress_fill: bool,
}

/// Connects each O2 source whose selector is ON into the shared output.
///
/// Several sources may feed at once; the network resolves the mix.
/// Closing the router disconnects every line regardless of selectors.
#[derive(Debug, Clone)]
pub struct SupplyRouter {
    lines: SupplyLines,
    selectors: SupplySelectors,
    closed: bool,
}

impl SupplyRouter {
    pub fn new(
        network: &Network,
        panel: &Panel,
        lines: SupplyLines,
        selectors: SupplySelectors,
    ) -> SystemResult<Self> {
        network.require_pipe(lines.sm_supply)?;
        network.require_pipe(lines.surge_tank)?;
        network.require_pipe(lines.repress_package)?;
        if let Some(fill) = lines.repress_fill {
            network.require_pipe(fill)?;
        }
        for selector in [selectors.sm_supply, selectors.surge_tank, selectors.repress_package] {
            panel.require_kind(selector, ControlKind::Rotary { positions: 2 })?;
        }
        Ok(Self {
            lines,
            selectors,
            closed: false,
        })
    }

    /// Routing implied by the selectors right now, ignoring `closed`.
    pub fn routing(&self, panel: &Panel) -> Routing {
        let at = |id: ControlId| panel.position(id).unwrap_or(positions::OFF);
        let repress = at(self.selectors.repress_package);
        Routing {
            sm_supply: at(self.selectors.sm_supply) == positions::ON,
            surge_tank: at(self.selectors.surge_tank) == positions::ON,
            repress_package: repress == positions::ON,
            repress_fill: repress == positions::FILL && self.lines.repress_fill.is_some(),
        }
    }

    pub fn close(&mut self, network: &mut Network) {
        if !self.closed {
            info!("O2 SM supply closed");
        }
        self.closed = true;
        self.apply(network, Routing::default());
    }

    /// Lift the master override; selectors take effect on the next step.
    pub fn reset(&mut self) {
        if self.closed {
            info!("O2 SM supply reset");
        }
        self.closed = false;
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn apply(&self, network: &mut Network, routing: Routing) {
        let mut set = |pipe: PipeId, open: bool| {
            if let Some(p) = network.pipe_mut(pipe) {
                p.set_open(open);
            }
        };
        set(self.lines.sm_supply, routing.sm_supply);
        set(self.lines.surge_tank, routing.surge_tank);
        set(self.lines.repress_package, routing.repress_package);
        if let Some(fill) = self.lines.repress_fill {
            set(fill, routing.repress_fill);
        }
    }
}

impl EcsComponent for SupplyRouter {
    fn record_key(&self) -> String {
        keys::O2_SM_SUPPLY.to_string()
    }

    fn system_timestep(&mut self, ctx: &mut SystemContext<'_>, _simdt: f64) {
        let routing = if self.closed {
            Routing::default()
        } else {
            self.routing(ctx.panel)
        };
        self.apply(ctx.network, routing);
    }

    fn save_state(&self, out: &mut ScenarioWriter) {
        out.record(keys::O2_SM_SUPPLY, &[("closed", FieldValue::Bool(self.closed))]);
    }

    fn load_state(&mut self, record: &ScenarioRecord<'_>) {
        if let Some(closed) = record.bool("closed") {
            self.closed = closed;
        }
    }
}
