//! Control input kinds and position semantics.

use ecs_core::{BusId, ControlId};
use serde::{Deserialize, Serialize};

/// Minimum DC bus voltage at which powered equipment operates.
pub const MIN_DC_VOLTAGE: f64 = 20.0;

/// What kind of panel control an input is, and how many positions it has.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ControlKind {
    /// Two-position toggle: 0 = down/off, 1 = up/on.
    Toggle,
    /// Three-position toggle, see [`ThreePosition`].
    ThreePosition,
    /// Circuit breaker: 0 = tripped (open), 1 = closed (conducting).
    CircuitBreaker,
    /// Rotary selector with `positions` detents.
    Rotary { positions: u8 },
    /// Thumbwheel with `positions` detents.
    Thumbwheel { positions: u8 },
}

impl ControlKind {
    /// Number of discrete positions.
    pub fn positions(self) -> u8 {
        match self {
            ControlKind::Toggle | ControlKind::CircuitBreaker => 2,
            ControlKind::ThreePosition => 3,
            ControlKind::Rotary { positions } | ControlKind::Thumbwheel { positions } => positions,
        }
    }

    /// Short name for diagnostics.
    pub fn label(self) -> &'static str {
        match self {
            ControlKind::Toggle => "toggle",
            ControlKind::ThreePosition => "three-position switch",
            ControlKind::CircuitBreaker => "circuit breaker",
            ControlKind::Rotary { .. } => "rotary selector",
            ControlKind::Thumbwheel { .. } => "thumbwheel",
        }
    }

    /// Whether two kinds are the same family, ignoring position count.
    pub fn same_family(self, other: ControlKind) -> bool {
        core::mem::discriminant(&self) == core::mem::discriminant(&other)
    }
}

/// Positions of a three-position toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThreePosition {
    Down,
    Center,
    Up,
}

impl ThreePosition {
    pub fn position(self) -> u8 {
        match self {
            ThreePosition::Down => 0,
            ThreePosition::Center => 1,
            ThreePosition::Up => 2,
        }
    }

    pub fn from_position(position: u8) -> Option<Self> {
        match position {
            0 => Some(ThreePosition::Down),
            1 => Some(ThreePosition::Center),
            2 => Some(ThreePosition::Up),
            _ => None,
        }
    }
}

/// A discrete control on the panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlInput {
    pub id: ControlId,
    pub name: String,
    pub kind: ControlKind,
    pub(crate) position: u8,
}

impl ControlInput {
    pub fn position(&self) -> u8 {
        self.position
    }
}

/// A DC bus feeding powered valves.
#[derive(Debug, Clone, PartialEq)]
pub struct DcBus {
    pub id: BusId,
    pub name: String,
    pub(crate) voltage: f64,
}

impl DcBus {
    pub fn voltage(&self) -> f64 {
        self.voltage
    }

    pub fn is_powered(&self) -> bool {
        self.voltage >= MIN_DC_VOLTAGE
    }
}
