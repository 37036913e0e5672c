//! Fixed-step run loop and sample recording.

use ecs_core::numeric::ensure_step;
use ecs_systems::CrewStatus;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{SimError, SimResult};
use crate::vehicle::Vehicle;

/// Options for simulation runs.
#[derive(Clone, Debug)]
pub struct SimOptions {
    /// Fixed time step (seconds)
    pub dt: f64,
    /// Final simulation time (seconds)
    pub t_end: f64,
    /// Maximum number of steps (safety limit)
    pub max_steps: usize,
    /// Record every N-th step (decimation)
    pub record_every: usize,
}

impl Default for SimOptions {
    fn default() -> Self {
        Self {
            dt: 1.0,
            t_end: 600.0,
            max_steps: 1_000_000,
            record_every: 10,
        }
    }
}

/// Sampled run history.
#[derive(Clone, Debug, Default, Serialize)]
pub struct SimRecord {
    /// Time points (seconds)
    pub t: Vec<f64>,
    pub crew_status: Vec<CrewStatus>,
    pub cabin_psi: Vec<f64>,
    pub suit_psi: Vec<f64>,
}

impl SimRecord {
    fn sample(&mut self, vehicle: &Vehicle) {
        self.t.push(vehicle.time());
        self.crew_status.push(vehicle.crew_status());
        self.cabin_psi.push(vehicle.cabin_psi());
        self.suit_psi.push(vehicle.suit_psi());
    }

    pub fn len(&self) -> usize {
        self.t.len()
    }

    pub fn is_empty(&self) -> bool {
        self.t.is_empty()
    }

    pub fn final_status(&self) -> Option<CrewStatus> {
        self.crew_status.last().copied()
    }
}

/// Step `vehicle` from its current time until `t_end`.
pub fn run(vehicle: &mut Vehicle, opts: &SimOptions) -> SimResult<SimRecord> {
    ensure_step(opts.dt, "dt must be positive")?;
    if !(opts.t_end.is_finite() && opts.t_end >= 0.0) {
        return Err(SimError::InvalidArg {
            what: "t_end must be non-negative",
        });
    }
    if opts.max_steps == 0 {
        return Err(SimError::InvalidArg {
            what: "max_steps must be positive",
        });
    }
    if opts.record_every == 0 {
        return Err(SimError::InvalidArg {
            what: "record_every must be positive",
        });
    }

    let mut record = SimRecord::default();
    record.sample(vehicle);

    let start_status = vehicle.crew_status();
    let mut step = 0;
    // Half-step slack keeps t_end reachable despite float accumulation.
    while vehicle.time() + 0.5 * opts.dt < opts.t_end && step < opts.max_steps {
        vehicle.timestep(opts.dt);
        step += 1;
        if step % opts.record_every == 0 {
            record.sample(vehicle);
        }
    }

    // Always record final state
    if step % opts.record_every != 0 {
        record.sample(vehicle);
    }

    if vehicle.crew_status() != start_status {
        info!(from = ?start_status, to = ?vehicle.crew_status(), "crew status changed during run");
    }
    debug!(steps = step, samples = record.len(), t = vehicle.time(), "run finished");
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sim_options_defaults() {
        let opts = SimOptions::default();
        assert_eq!(opts.dt, 1.0);
        assert_eq!(opts.record_every, 10);
    }

    #[test]
    fn rejects_bad_options() {
        let mut vehicle = Vehicle::csm().unwrap();
        for opts in [
            SimOptions {
                dt: 0.0,
                ..SimOptions::default()
            },
            SimOptions {
                t_end: -1.0,
                ..SimOptions::default()
            },
            SimOptions {
                record_every: 0,
                ..SimOptions::default()
            },
        ] {
            assert!(matches!(run(&mut vehicle, &opts), Err(SimError::InvalidArg { .. })));
        }
    }

    #[test]
    fn decimates_and_records_final_state() {
        let mut vehicle = Vehicle::csm().unwrap();
        let opts = SimOptions {
            dt: 1.0,
            t_end: 25.0,
            max_steps: 1_000,
            record_every: 10,
        };
        let record = run(&mut vehicle, &opts).unwrap();
        assert_eq!(record.t, vec![0.0, 10.0, 20.0, 25.0]);
        assert_eq!(record.final_status(), Some(CrewStatus::Ok));
    }
}
