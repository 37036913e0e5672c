//! Error types for panel operations.

use ecs_core::{BusId, ControlId};
use thiserror::Error;

/// Result type for panel operations.
pub type ControlResult<T> = Result<T, ControlError>;

/// Errors that can occur in panel operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ControlError {
    /// Control handle not registered on this panel.
    #[error("Unknown control: {id}")]
    UnknownControl { id: ControlId },

    /// Bus handle not registered on this panel.
    #[error("Unknown bus: {id}")]
    UnknownBus { id: BusId },

    /// Requested position is outside the control's position set.
    #[error("Position {position} out of range for control '{name}' ({positions} positions)")]
    PositionOutOfRange {
        name: String,
        position: u8,
        positions: u8,
    },

    /// A component expected a different kind of control.
    #[error("Control '{name}' is a {actual}, expected {expected}")]
    WrongKind {
        name: String,
        expected: &'static str,
        actual: &'static str,
    },

    /// No control with this name.
    #[error("No control named '{name}'")]
    UnknownName { name: String },
}
