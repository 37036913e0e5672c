//! Vehicle configuration validation.

use crate::config::{LATEST_VERSION, VehicleConfig};

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing section: {what}")]
    Missing { what: String },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

fn invalid(field: impl Into<String>, value: f64, reason: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.into(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn positive(field: impl Into<String>, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, value, "must be positive"))
    }
}

fn non_negative(field: impl Into<String>, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(field, value, "must be non-negative"))
    }
}

pub fn validate_config(config: &VehicleConfig) -> Result<(), ValidationError> {
    if config.version == 0 || config.version > LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: config.version,
        });
    }

    for (name, tank) in config.tanks.iter() {
        positive(format!("tanks.{name}.volume_m3"), tank.volume_m3)?;
        non_negative(format!("tanks.{name}.pressure_psi"), tank.pressure_psi)?;
        positive(format!("tanks.{name}.temperature_k"), tank.temperature_k)?;
        if !(0.0..=1.0).contains(&tank.co2_fraction) {
            return Err(invalid(
                format!("tanks.{name}.co2_fraction"),
                tank.co2_fraction,
                "must be within 0..=1",
            ));
        }
    }
    non_negative("ambient.pressure_psi", config.ambient.pressure_psi)?;
    positive("ambient.temperature_k", config.ambient.temperature_k)?;

    let plumbing = &config.plumbing;
    positive("plumbing.main_regulator_psi", plumbing.main_regulator_psi)?;
    positive("plumbing.suit_demand_psi", plumbing.suit_demand_psi)?;
    for (name, conductance) in plumbing.conductances() {
        non_negative(format!("plumbing.{name}"), conductance)?;
    }

    positive("cabin_regulator.pressure_psi", config.cabin_regulator.pressure_psi)?;
    if let Some(flow) = config.cabin_regulator.max_flow_lbh {
        non_negative("cabin_regulator.max_flow_lbh", flow)?;
    }

    if config.relief_valves.is_empty() {
        return Err(ValidationError::Missing {
            what: "relief_valves".to_string(),
        });
    }
    for (i, valve) in config.relief_valves.iter().enumerate() {
        non_negative(format!("relief_valves[{i}].leak_size"), valve.leak_size)?;
        positive(
            format!("relief_valves[{i}].relief_pressure_psi"),
            valve.relief_pressure_psi,
        )?;
    }

    let limits = &config.physiology;
    non_negative("physiology.suit_pressure_low_psi", limits.suit_pressure_low_psi)?;
    positive("physiology.suit_pressure_high_psi", limits.suit_pressure_high_psi)?;
    if limits.suit_pressure_low_psi >= limits.suit_pressure_high_psi {
        return Err(invalid(
            "physiology.suit_pressure_low_psi",
            limits.suit_pressure_low_psi,
            "must be below suit_pressure_high_psi",
        ));
    }
    positive("physiology.suit_temperature_max_k", limits.suit_temperature_max_k)?;
    if limits.suit_temperature_min_k >= limits.suit_temperature_max_k {
        return Err(invalid(
            "physiology.suit_temperature_min_k",
            limits.suit_temperature_min_k,
            "must be below suit_temperature_max_k",
        ));
    }
    positive("physiology.suit_co2_mmhg", limits.suit_co2_mmhg)?;
    positive("physiology.acceleration_g", limits.acceleration_g)?;
    for (field, duration) in [
        ("suit_pressure_low_duration_s", limits.suit_pressure_low_duration_s),
        ("suit_pressure_high_duration_s", limits.suit_pressure_high_duration_s),
        ("suit_temperature_duration_s", limits.suit_temperature_duration_s),
        ("suit_co2_duration_s", limits.suit_co2_duration_s),
        ("acceleration_duration_s", limits.acceleration_duration_s),
    ] {
        positive(format!("physiology.{field}"), duration)?;
    }

    non_negative("panel.post_landing_bus_voltage", config.panel.post_landing_bus_voltage)?;
    Ok(())
}
