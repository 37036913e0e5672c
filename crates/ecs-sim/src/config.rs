//! Vehicle configuration: initial tank conditions, plumbing, component
//! tunables and physiology limits.

use std::path::Path;

use ecs_systems::{PhysiologyLimits, ReliefSettings};
use serde::{Deserialize, Serialize};

use crate::validate::{ValidationError, validate_config};

pub const LATEST_VERSION: u32 = 1;

const CSM_YAML: &str = include_str!("../config/csm.yaml");

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VehicleConfig {
    pub version: u32,
    pub name: String,
    pub tanks: TanksDef,
    pub ambient: AmbientDef,
    pub plumbing: PlumbingDef,
    pub cabin_regulator: CabinRegulatorDef,
    pub relief_valves: Vec<ReliefSettings>,
    pub physiology: PhysiologyLimits,
    #[serde(default)]
    pub panel: PanelDef,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TanksDef {
    pub sm_supply: TankDef,
    pub surge_tank: TankDef,
    pub repress_package: TankDef,
    pub o2_main_reg: TankDef,
    pub cabin: TankDef,
    pub suit: TankDef,
}

impl TanksDef {
    /// `(field name, definition)` pairs, for diagnostics.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &TankDef)> {
        [
            ("sm_supply", &self.sm_supply),
            ("surge_tank", &self.surge_tank),
            ("repress_package", &self.repress_package),
            ("o2_main_reg", &self.o2_main_reg),
            ("cabin", &self.cabin),
            ("suit", &self.suit),
        ]
        .into_iter()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TankDef {
    pub volume_m3: f64,
    pub pressure_psi: f64,
    pub temperature_k: f64,
    #[serde(default)]
    pub co2_fraction: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AmbientDef {
    pub pressure_psi: f64,
    pub temperature_k: f64,
}

/// Pipe conductances (kg/s per Pa at full opening) and the fixed
/// set-points of the plumbing no component regulates.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlumbingDef {
    pub main_regulator_psi: f64,
    pub suit_demand_psi: f64,
    pub sm_supply_line: f64,
    pub surge_tank_line: f64,
    pub repress_line: f64,
    pub repress_fill_line: f64,
    pub cabin_regulator_line: f64,
    pub demand_regulator_line: f64,
    pub suit_relief_line: f64,
    pub suit_return_line: f64,
    pub relief_vent_line: f64,
    pub post_landing_inlet_line: f64,
}

impl PlumbingDef {
    pub fn conductances(&self) -> impl Iterator<Item = (&'static str, f64)> {
        [
            ("sm_supply_line", self.sm_supply_line),
            ("surge_tank_line", self.surge_tank_line),
            ("repress_line", self.repress_line),
            ("repress_fill_line", self.repress_fill_line),
            ("cabin_regulator_line", self.cabin_regulator_line),
            ("demand_regulator_line", self.demand_regulator_line),
            ("suit_relief_line", self.suit_relief_line),
            ("suit_return_line", self.suit_return_line),
            ("relief_vent_line", self.relief_vent_line),
            ("post_landing_inlet_line", self.post_landing_inlet_line),
        ]
        .into_iter()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CabinRegulatorDef {
    pub pressure_psi: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_flow_lbh: Option<f64>,
}

/// Initial panel settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PanelDef {
    #[serde(default = "default_bus_voltage")]
    pub post_landing_bus_voltage: f64,
    #[serde(default = "default_true")]
    pub sm_supply_on: bool,
    #[serde(default = "default_true")]
    pub surge_tank_on: bool,
    #[serde(default = "default_true")]
    pub suit_return_closed: bool,
    #[serde(default = "default_true")]
    pub crew_aboard: bool,
}

impl Default for PanelDef {
    fn default() -> Self {
        Self {
            post_landing_bus_voltage: default_bus_voltage(),
            sm_supply_on: true,
            surge_tank_on: true,
            suit_return_closed: true,
            crew_aboard: true,
        }
    }
}

fn default_bus_voltage() -> f64 {
    28.0
}

fn default_true() -> bool {
    true
}

impl VehicleConfig {
    /// The bundled command module configuration.
    pub fn csm() -> ConfigResult<Self> {
        Self::from_yaml_str(CSM_YAML)
    }

    pub fn from_yaml_str(content: &str) -> ConfigResult<Self> {
        let config: VehicleConfig = serde_yaml::from_str(content)?;
        validate_config(&config)?;
        Ok(config)
    }

    pub fn to_yaml_string(&self) -> ConfigResult<String> {
        validate_config(self)?;
        Ok(serde_yaml::to_string(self)?)
    }
}

pub fn load_yaml(path: &Path) -> ConfigResult<VehicleConfig> {
    let content = std::fs::read_to_string(path)?;
    VehicleConfig::from_yaml_str(&content)
}

pub fn save_yaml(path: &Path, config: &VehicleConfig) -> ConfigResult<()> {
    let content = config.to_yaml_string()?;
    std::fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_csm_config_is_valid() {
        let config = VehicleConfig::csm().unwrap();
        assert_eq!(config.version, LATEST_VERSION);
        assert_eq!(config.relief_valves.len(), 2);
        assert!(config.panel.crew_aboard);
    }

    #[test]
    fn yaml_round_trip() {
        let config = VehicleConfig::csm().unwrap();
        let text = config.to_yaml_string().unwrap();
        let back = VehicleConfig::from_yaml_str(&text).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn rejects_malformed_yaml() {
        let err = VehicleConfig::from_yaml_str("version: [1").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }

    #[test]
    fn panel_section_is_optional() {
        let config = VehicleConfig::csm().unwrap();
        let mut value: serde_yaml::Value = serde_yaml::to_value(&config).unwrap();
        if let serde_yaml::Value::Mapping(map) = &mut value {
            map.remove("panel");
        }
        let text = serde_yaml::to_string(&value).unwrap();
        let back = VehicleConfig::from_yaml_str(&text).unwrap();
        assert_eq!(back.panel, PanelDef::default());
    }
}
