//! Error types for component construction.
//!
//! Stepping never fails; only wiring a component to handles it cannot use
//! is reported.

use ecs_controls::ControlError;
use ecs_core::error::EcsError;
use ecs_network::NetworkError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SystemError {
    #[error("Network wiring: {0}")]
    Network(#[from] NetworkError),

    #[error("Panel wiring: {0}")]
    Control(#[from] ControlError),

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },
}

pub type SystemResult<T> = Result<T, SystemError>;

impl From<SystemError> for EcsError {
    fn from(e: SystemError) -> Self {
        match e {
            SystemError::Network(inner) => inner.into(),
            SystemError::Control(_) => EcsError::InvalidArg {
                what: "panel wiring",
            },
            SystemError::InvalidArg { what } => EcsError::InvalidArg { what },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecs_core::{PipeId, TankId};

    #[test]
    fn error_display() {
        let err = SystemError::from(NetworkError::UnknownPipe {
            pipe: PipeId::from_index(4),
        });
        assert!(err.to_string().contains("Pipe 4"));
    }

    #[test]
    fn error_conversion() {
        let err = SystemError::from(NetworkError::UnknownTank {
            tank: TankId::from_index(1),
        });
        let core: EcsError = err.into();
        assert!(matches!(core, EcsError::UnknownHandle { what: "tank", .. }));
    }
}
