//! Crew survival state machine.
//!
//! Five hazards are timed independently. A hazard whose timer first reaches
//! its duration limit worsens the crew's condition by one level. Several
//! timers crossing on the same step still count as a single escalation.

use ecs_controls::CuePlayer;
use ecs_core::units::constants::G0_MPS2;
use ecs_core::units::{to_mmhg, to_psi};
use ecs_core::{CueId, TankId};
use ecs_network::{Network, Tank};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::SystemResult;
use crate::limits::{Hazard, PhysiologyLimits};
use crate::scenario::{FieldValue, ScenarioRecord, ScenarioWriter, keys};
use crate::traits::{EcsComponent, SystemContext, VehicleState};

/// Crew condition. Only ever moves forward during a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CrewStatus {
    Ok,
    Critical,
    Dead,
}

impl CrewStatus {
    pub fn ordinal(self) -> u8 {
        match self {
            CrewStatus::Ok => 0,
            CrewStatus::Critical => 1,
            CrewStatus::Dead => 2,
        }
    }

    pub fn from_ordinal(ordinal: i64) -> Option<Self> {
        match ordinal {
            0 => Some(CrewStatus::Ok),
            1 => Some(CrewStatus::Critical),
            2 => Some(CrewStatus::Dead),
            _ => None,
        }
    }

    /// One level worse; `Dead` stays `Dead`.
    pub fn next(self) -> Self {
        match self {
            CrewStatus::Ok => CrewStatus::Critical,
            CrewStatus::Critical | CrewStatus::Dead => CrewStatus::Dead,
        }
    }
}

/// Seconds each hazard has been continuously present.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
struct HazardTimers {
    suit_pressure_low: f64,
    suit_pressure_high: f64,
    suit_temperature: f64,
    suit_co2: f64,
    acceleration: f64,
}

impl HazardTimers {
    fn get(&self, hazard: Hazard) -> f64 {
        match hazard {
            Hazard::SuitPressureLow => self.suit_pressure_low,
            Hazard::SuitPressureHigh => self.suit_pressure_high,
            Hazard::SuitTemperature => self.suit_temperature,
            Hazard::SuitCo2 => self.suit_co2,
            Hazard::Acceleration => self.acceleration,
        }
    }

    fn get_mut(&mut self, hazard: Hazard) -> &mut f64 {
        match hazard {
            Hazard::SuitPressureLow => &mut self.suit_pressure_low,
            Hazard::SuitPressureHigh => &mut self.suit_pressure_high,
            Hazard::SuitTemperature => &mut self.suit_temperature,
            Hazard::SuitCo2 => &mut self.suit_co2,
            Hazard::Acceleration => &mut self.acceleration,
        }
    }
}

/// Watches the suit loop and vehicle motion and tracks crew survival.
#[derive(Debug, Clone)]
pub struct CrewStatusMonitor {
    suit: TankId,
    limits: PhysiologyLimits,
    death_cue: CueId,
    status: CrewStatus,
    timers: HazardTimers,
    /// m/s
    last_vertical_velocity: f64,
    first_timestep_done: bool,
    last_cause: Option<Hazard>,
}

impl CrewStatusMonitor {
    pub fn new(
        network: &Network,
        suit: TankId,
        limits: PhysiologyLimits,
        death_cue: CueId,
    ) -> SystemResult<Self> {
        network.require_tank(suit)?;
        Ok(Self {
            suit,
            limits,
            death_cue,
            status: CrewStatus::Ok,
            timers: HazardTimers::default(),
            last_vertical_velocity: 0.0,
            first_timestep_done: false,
            last_cause: None,
        })
    }

    pub fn status(&self) -> CrewStatus {
        self.status
    }

    /// Seconds `hazard` has been continuously present.
    pub fn elapsed(&self, hazard: Hazard) -> f64 {
        self.timers.get(hazard)
    }

    pub fn last_vertical_velocity(&self) -> f64 {
        self.last_vertical_velocity
    }

    /// Hazard behind the most recent escalation in this session.
    pub fn last_cause(&self) -> Option<Hazard> {
        self.last_cause
    }

    pub fn limits(&self) -> &PhysiologyLimits {
        &self.limits
    }

    /// Advance the monitor by `simdt` seconds.
    pub fn timestep(
        &mut self,
        simdt: f64,
        network: &Network,
        vehicle: &dyn VehicleState,
        cues: &mut dyn CuePlayer,
    ) {
        if self.status == CrewStatus::Dead {
            return;
        }
        let velocity = vehicle.vertical_velocity().value;
        if !self.first_timestep_done {
            self.first_timestep_done = true;
            self.last_vertical_velocity = velocity;
            return;
        }
        if !vehicle.crew_aboard() || simdt <= 0.0 {
            self.last_vertical_velocity = velocity;
            return;
        }
        let Some(suit) = network.tank(self.suit) else {
            return;
        };

        let acceleration = (velocity - self.last_vertical_velocity).abs() / simdt;
        self.last_vertical_velocity = velocity;

        let mut crossed = None;
        for hazard in Hazard::ALL {
            let timer = self.timers.get_mut(hazard);
            if !hazard_present(&self.limits, hazard, suit, acceleration) {
                *timer = 0.0;
                continue;
            }
            let before = *timer;
            *timer += simdt;
            let limit = self.limits.duration(hazard);
            if crossed.is_none() && before < limit && *timer >= limit {
                crossed = Some(hazard);
            }
        }

        if let Some(hazard) = crossed {
            self.escalate(hazard, cues);
        }
    }

    fn escalate(&mut self, hazard: Hazard, cues: &mut dyn CuePlayer) {
        let next = self.status.next();
        self.status = next;
        self.last_cause = Some(hazard);
        warn!(status = ?next, cause = hazard.label(), "crew status escalated");
        if next == CrewStatus::Dead {
            cues.play(self.death_cue);
        }
    }
}

fn hazard_present(limits: &PhysiologyLimits, hazard: Hazard, suit: &Tank, acceleration: f64) -> bool {
    match hazard {
        Hazard::SuitPressureLow => to_psi(suit.pressure()) < limits.suit_pressure_low_psi,
        Hazard::SuitPressureHigh => to_psi(suit.pressure()) > limits.suit_pressure_high_psi,
        Hazard::SuitTemperature => {
            let t = suit.temperature().value;
            t < limits.suit_temperature_min_k || t > limits.suit_temperature_max_k
        }
        Hazard::SuitCo2 => to_mmhg(suit.co2_partial_pressure()) > limits.suit_co2_mmhg,
        Hazard::Acceleration => acceleration > limits.acceleration_g * G0_MPS2,
    }
}

impl EcsComponent for CrewStatusMonitor {
    fn record_key(&self) -> String {
        keys::CREW_STATUS.to_string()
    }

    fn system_timestep(&mut self, ctx: &mut SystemContext<'_>, simdt: f64) {
        self.timestep(simdt, ctx.network, ctx.vehicle, ctx.cues);
    }

    fn save_state(&self, out: &mut ScenarioWriter) {
        let mut fields = vec![("status", FieldValue::Int(i64::from(self.status.ordinal())))];
        for hazard in Hazard::ALL {
            fields.push((hazard.record_field(), FieldValue::Real(self.timers.get(hazard))));
        }
        fields.push((
            "lastverticalvelocity",
            FieldValue::Real(self.last_vertical_velocity),
        ));
        out.record(keys::CREW_STATUS, &fields);
    }

    fn load_state(&mut self, record: &ScenarioRecord<'_>) {
        if let Some(ordinal) = record.int("status") {
            match CrewStatus::from_ordinal(ordinal) {
                Some(status) => self.status = status,
                None => debug!(ordinal, "unknown crew status ignored"),
            }
        }
        for hazard in Hazard::ALL {
            if let Some(elapsed) = record.real(hazard.record_field()) {
                *self.timers.get_mut(hazard) = elapsed;
            }
        }
        if let Some(v) = record.real("lastverticalvelocity") {
            self.last_vertical_velocity = v;
        }
    }
}
