//! Suit circuit return valve.

use ecs_controls::{ControlKind, Panel};
use ecs_core::{ControlId, PipeId};
use ecs_network::Network;

use crate::error::SystemResult;
use crate::scenario::keys;
use crate::traits::{EcsComponent, SystemContext};

/// Conducts whenever its breaker is closed. No memory of its own.
#[derive(Debug, Clone)]
pub struct ReturnValve {
    pipe: PipeId,
    lever: ControlId,
}

impl ReturnValve {
    pub fn new(network: &Network, panel: &Panel, pipe: PipeId, lever: ControlId) -> SystemResult<Self> {
        network.require_pipe(pipe)?;
        panel.require_kind(lever, ControlKind::CircuitBreaker)?;
        Ok(Self { pipe, lever })
    }

    pub fn is_open(&self, panel: &Panel) -> bool {
        panel.breaker_closed(self.lever)
    }
}

impl EcsComponent for ReturnValve {
    fn record_key(&self) -> String {
        keys::SUIT_CIRCUIT_RETURN_VALVE.to_string()
    }

    fn system_timestep(&mut self, ctx: &mut SystemContext<'_>, _simdt: f64) {
        let open = self.is_open(ctx.panel);
        if let Some(pipe) = ctx.network.pipe_mut(self.pipe) {
            pipe.set_open(open);
        }
    }
}
