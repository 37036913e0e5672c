//! Physiological limits for the crew status monitor.
//!
//! Values come from the vehicle configuration; nothing here is specific to
//! one spacecraft.

use serde::{Deserialize, Serialize};

/// The five independently timed hazards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Hazard {
    SuitPressureLow,
    SuitPressureHigh,
    SuitTemperature,
    SuitCo2,
    Acceleration,
}

impl Hazard {
    pub const ALL: [Hazard; 5] = [
        Hazard::SuitPressureLow,
        Hazard::SuitPressureHigh,
        Hazard::SuitTemperature,
        Hazard::SuitCo2,
        Hazard::Acceleration,
    ];

    /// Field name of this hazard's timer in a `CREWSTATUS` record.
    pub fn record_field(self) -> &'static str {
        match self {
            Hazard::SuitPressureLow => "suitpressurelowtime",
            Hazard::SuitPressureHigh => "suitpressurehightime",
            Hazard::SuitTemperature => "suittemperaturetime",
            Hazard::SuitCo2 => "suitco2time",
            Hazard::Acceleration => "accelerationtime",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Hazard::SuitPressureLow => "suit pressure low",
            Hazard::SuitPressureHigh => "suit pressure high",
            Hazard::SuitTemperature => "suit temperature",
            Hazard::SuitCo2 => "suit CO2",
            Hazard::Acceleration => "acceleration",
        }
    }
}

/// Hazard thresholds and how long each may persist before the crew's
/// condition worsens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhysiologyLimits {
    pub suit_pressure_low_psi: f64,
    pub suit_pressure_low_duration_s: f64,
    pub suit_pressure_high_psi: f64,
    pub suit_pressure_high_duration_s: f64,
    pub suit_temperature_min_k: f64,
    pub suit_temperature_max_k: f64,
    pub suit_temperature_duration_s: f64,
    pub suit_co2_mmhg: f64,
    pub suit_co2_duration_s: f64,
    pub acceleration_g: f64,
    pub acceleration_duration_s: f64,
}

impl PhysiologyLimits {
    /// Seconds `hazard` may persist before it escalates crew status.
    pub fn duration(&self, hazard: Hazard) -> f64 {
        match hazard {
            Hazard::SuitPressureLow => self.suit_pressure_low_duration_s,
            Hazard::SuitPressureHigh => self.suit_pressure_high_duration_s,
            Hazard::SuitTemperature => self.suit_temperature_duration_s,
            Hazard::SuitCo2 => self.suit_co2_duration_s,
            Hazard::Acceleration => self.acceleration_duration_s,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_fields_are_distinct() {
        let mut names: Vec<_> = Hazard::ALL.iter().map(|h| h.record_field()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), Hazard::ALL.len());
    }

    #[test]
    fn duration_lookup() {
        let limits = PhysiologyLimits {
            suit_pressure_low_psi: 2.5,
            suit_pressure_low_duration_s: 1.0,
            suit_pressure_high_psi: 22.0,
            suit_pressure_high_duration_s: 2.0,
            suit_temperature_min_k: 270.0,
            suit_temperature_max_k: 310.0,
            suit_temperature_duration_s: 3.0,
            suit_co2_mmhg: 10.0,
            suit_co2_duration_s: 4.0,
            acceleration_g: 16.0,
            acceleration_duration_s: 5.0,
        };
        let got: Vec<f64> = Hazard::ALL.iter().map(|h| limits.duration(*h)).collect();
        assert_eq!(got, vec![1.0, 2.0, 3.0, 4.0, 5.0]);
    }
}
