//! Lumped explicit transport step.
//!
//! This is the reference stand-in for the vehicle's fluid solver. It runs
//! once per host tick after every ECS component has issued its commands:
//! each open pipe moves gas in proportion to its driving pressure, subject
//! to the pipe's regulator target and flow ceiling.

use ecs_core::numeric::{ensure_step, unit_ratio};
use tracing::trace;

use crate::network::Network;

/// Largest fraction of a donor tank's contents one pipe may move per step.
const MAX_DONOR_FRACTION: f64 = 0.5;

impl Network {
    /// Advance tank contents by `dt` seconds using the current pipe commands.
    pub fn advance(&mut self, dt: f64) {
        let Ok(dt) = ensure_step(dt, "network dt") else {
            return;
        };

        let n = self.tanks.len();
        let mut dm = vec![0.0_f64; n];
        let mut dco2 = vec![0.0_f64; n];
        let tanks = &self.tanks;

        for pipe in &mut self.pipes {
            if !pipe.open || pipe.size <= 0.0 {
                pipe.flow_kgps = 0.0;
                continue;
            }
            let (up, down) = (&tanks[pipe.from.slot()], &tanks[pipe.to.slot()]);
            let p_up = up.pressure().value;
            let p_down = down.pressure().value;

            // A regulated pipe delivers only until the outlet reaches target.
            let drive = match pipe.target {
                Some(target) => (p_up.min(target.value) - p_down).max(0.0),
                None => p_up - p_down,
            };
            let mut mdot = pipe.conductance * pipe.size * drive;

            if let Some(max) = pipe.max_flow {
                let max = max.value.abs();
                mdot = mdot.clamp(-max, max);
            }

            let donor = if mdot >= 0.0 { up } else { down };
            if !donor.fixed {
                let cap = MAX_DONOR_FRACTION * donor.mass_kg / dt;
                mdot = mdot.clamp(-cap, cap);
            }

            pipe.flow_kgps = mdot;
            let moved = mdot * dt;
            let co2 = moved * donor.co2_fraction;
            dm[pipe.from.slot()] -= moved;
            dm[pipe.to.slot()] += moved;
            dco2[pipe.from.slot()] -= co2;
            dco2[pipe.to.slot()] += co2;

            trace!(pipe = %pipe.name, mdot, "pipe flow");
        }

        for (i, tank) in self.tanks.iter_mut().enumerate() {
            if tank.fixed {
                continue;
            }
            let co2_mass = tank.co2_fraction * tank.mass_kg + dco2[i];
            tank.mass_kg = (tank.mass_kg + dm[i]).max(0.0);
            tank.co2_fraction = unit_ratio(co2_mass, tank.mass_kg);
        }
    }
}
