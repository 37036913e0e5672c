//! Network-specific error types.

use ecs_core::{EcsError, PipeId, TankId};

pub type NetworkResult<T> = Result<T, NetworkError>;

/// Network construction and lookup errors.
#[derive(Debug, Clone, PartialEq)]
pub enum NetworkError {
    /// A pipe refers to a tank that doesn't exist.
    InvalidTankRef { pipe: PipeId, tank: TankId },

    /// A pipe connects a tank to itself.
    SelfLoop { pipe: PipeId },

    /// Two tanks or two pipes share a name.
    DuplicateName { name: String },

    /// A tank was declared with a non-physical parameter.
    NonPhysicalTank { tank: TankId, what: &'static str },

    /// A pipe was declared with a non-physical parameter.
    NonPhysicalPipe { pipe: PipeId, what: &'static str },

    /// Handle not present in this network.
    UnknownTank { tank: TankId },

    /// Handle not present in this network.
    UnknownPipe { pipe: PipeId },
}

impl std::fmt::Display for NetworkError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NetworkError::InvalidTankRef { pipe, tank } => {
                write!(f, "Pipe {} refers to non-existent tank {}", pipe, tank)
            }
            NetworkError::SelfLoop { pipe } => {
                write!(f, "Pipe {} connects a tank to itself", pipe)
            }
            NetworkError::DuplicateName { name } => {
                write!(f, "Name '{}' is used more than once", name)
            }
            NetworkError::NonPhysicalTank { tank, what } => {
                write!(f, "Tank {} has non-physical {}", tank, what)
            }
            NetworkError::NonPhysicalPipe { pipe, what } => {
                write!(f, "Pipe {} has non-physical {}", pipe, what)
            }
            NetworkError::UnknownTank { tank } => write!(f, "Tank {} not in network", tank),
            NetworkError::UnknownPipe { pipe } => write!(f, "Pipe {} not in network", pipe),
        }
    }
}

impl std::error::Error for NetworkError {}

impl From<NetworkError> for EcsError {
    fn from(err: NetworkError) -> Self {
        match err {
            NetworkError::UnknownTank { tank } => EcsError::UnknownHandle {
                what: "tank",
                id: tank.id(),
            },
            NetworkError::UnknownPipe { pipe } => EcsError::UnknownHandle {
                what: "pipe",
                id: pipe.id(),
            },
            _ => EcsError::Invariant {
                what: "network structure",
            },
        }
    }
}
