//! Error types for vehicle assembly and simulation runs.

use thiserror::Error;

use crate::config::ConfigError;

/// Errors encountered while building or running a vehicle.
#[derive(Error, Debug)]
pub enum SimError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Assembly error: {message}")]
    Assembly { message: String },

    #[error("Panel error: {0}")]
    Panel(#[from] ecs_controls::ControlError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SimResult<T> = Result<T, SimError>;

impl From<ecs_core::EcsError> for SimError {
    fn from(e: ecs_core::EcsError) -> Self {
        match e {
            ecs_core::EcsError::NonFinite { what, .. } | ecs_core::EcsError::InvalidArg { what } => {
                SimError::InvalidArg { what }
            }
            other => SimError::Assembly {
                message: other.to_string(),
            },
        }
    }
}

impl From<ecs_network::NetworkError> for SimError {
    fn from(e: ecs_network::NetworkError) -> Self {
        SimError::Assembly {
            message: e.to_string(),
        }
    }
}

impl From<ecs_systems::SystemError> for SimError {
    fn from(e: ecs_systems::SystemError) -> Self {
        SimError::Assembly {
            message: e.to_string(),
        }
    }
}

impl From<crate::validate::ValidationError> for SimError {
    fn from(e: crate::validate::ValidationError) -> Self {
        SimError::Config(e.into())
    }
}
