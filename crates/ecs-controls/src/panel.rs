//! The panel: registry of controls and DC buses.

use ecs_core::{BusId, ControlId};
use tracing::debug;

use crate::control::{ControlInput, ControlKind, DcBus, ThreePosition};
use crate::error::{ControlError, ControlResult};

/// Owns every control input and bus. Components hold handles and read
/// positions through `&Panel`; only the panel's owner moves switches.
#[derive(Debug, Clone, Default)]
pub struct Panel {
    controls: Vec<ControlInput>,
    buses: Vec<DcBus>,
}

impl Panel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_toggle(&mut self, name: impl Into<String>, on: bool) -> ControlId {
        self.add_control(name.into(), ControlKind::Toggle, u8::from(on))
    }

    pub fn add_three_position(&mut self, name: impl Into<String>, initial: ThreePosition) -> ControlId {
        self.add_control(name.into(), ControlKind::ThreePosition, initial.position())
    }

    pub fn add_breaker(&mut self, name: impl Into<String>, closed: bool) -> ControlId {
        self.add_control(name.into(), ControlKind::CircuitBreaker, u8::from(closed))
    }

    pub fn add_rotary(&mut self, name: impl Into<String>, positions: u8, initial: u8) -> ControlId {
        let positions = positions.max(1);
        self.add_control(
            name.into(),
            ControlKind::Rotary { positions },
            initial.min(positions - 1),
        )
    }

    pub fn add_thumbwheel(&mut self, name: impl Into<String>, positions: u8, initial: u8) -> ControlId {
        let positions = positions.max(1);
        self.add_control(
            name.into(),
            ControlKind::Thumbwheel { positions },
            initial.min(positions - 1),
        )
    }

    pub fn add_bus(&mut self, name: impl Into<String>, voltage: f64) -> BusId {
        let id = BusId::from_index(self.buses.len() as u32);
        self.buses.push(DcBus {
            id,
            name: name.into(),
            voltage,
        });
        id
    }

    fn add_control(&mut self, name: String, kind: ControlKind, position: u8) -> ControlId {
        let id = ControlId::from_index(self.controls.len() as u32);
        self.controls.push(ControlInput {
            id,
            name,
            kind,
            position,
        });
        id
    }

    pub fn controls(&self) -> &[ControlInput] {
        &self.controls
    }

    pub fn control(&self, id: ControlId) -> Option<&ControlInput> {
        self.controls.get(id.slot())
    }

    pub fn control_by_name(&self, name: &str) -> Option<ControlId> {
        self.controls.iter().find(|c| c.name == name).map(|c| c.id)
    }

    pub fn bus(&self, id: BusId) -> Option<&DcBus> {
        self.buses.get(id.slot())
    }

    /// Current position, `None` for an unknown handle.
    pub fn position(&self, id: ControlId) -> Option<u8> {
        self.control(id).map(ControlInput::position)
    }

    pub fn three_position(&self, id: ControlId) -> Option<ThreePosition> {
        self.position(id).and_then(ThreePosition::from_position)
    }

    /// True when the breaker conducts. Unknown handles read as tripped.
    pub fn breaker_closed(&self, id: ControlId) -> bool {
        self.position(id) == Some(1)
    }

    /// True when the bus carries operating voltage. Unknown handles read as dead.
    pub fn bus_powered(&self, id: BusId) -> bool {
        self.bus(id).is_some_and(DcBus::is_powered)
    }

    /// Move a control to `position`.
    pub fn set_position(&mut self, id: ControlId, position: u8) -> ControlResult<()> {
        let control = self
            .controls
            .get_mut(id.slot())
            .ok_or(ControlError::UnknownControl { id })?;
        let positions = control.kind.positions();
        if position >= positions {
            return Err(ControlError::PositionOutOfRange {
                name: control.name.clone(),
                position,
                positions,
            });
        }
        if control.position != position {
            debug!(control = %control.name, from = control.position, to = position, "control moved");
        }
        control.position = position;
        Ok(())
    }

    pub fn set_position_by_name(&mut self, name: &str, position: u8) -> ControlResult<()> {
        let id = self
            .control_by_name(name)
            .ok_or_else(|| ControlError::UnknownName {
                name: name.to_string(),
            })?;
        self.set_position(id, position)
    }

    pub fn set_voltage(&mut self, id: BusId, voltage: f64) -> ControlResult<()> {
        let bus = self
            .buses
            .get_mut(id.slot())
            .ok_or(ControlError::UnknownBus { id })?;
        bus.voltage = voltage;
        Ok(())
    }

    /// Check that `id` exists and belongs to the `expected` family.
    pub fn require_kind(&self, id: ControlId, expected: ControlKind) -> ControlResult<()> {
        let control = self.control(id).ok_or(ControlError::UnknownControl { id })?;
        if control.kind.same_family(expected) {
            Ok(())
        } else {
            Err(ControlError::WrongKind {
                name: control.name.clone(),
                expected: expected.label(),
                actual: control.kind.label(),
            })
        }
    }

    pub fn require_bus(&self, id: BusId) -> ControlResult<()> {
        self.bus(id).map(|_| ()).ok_or(ControlError::UnknownBus { id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn breaker_reads() {
        let mut panel = Panel::new();
        let cb = panel.add_breaker("SuitCircuitReturn", true);
        assert!(panel.breaker_closed(cb));

        panel.set_position(cb, 0).unwrap();
        assert!(!panel.breaker_closed(cb));
        assert!(!panel.breaker_closed(ControlId::from_index(42)));
    }

    #[test]
    fn rotary_rejects_out_of_range() {
        let mut panel = Panel::new();
        let rp = panel.add_rotary("RepressPackage", 3, 0);

        assert!(panel.set_position(rp, 2).is_ok());
        let err = panel.set_position(rp, 3).unwrap_err();
        assert!(matches!(err, ControlError::PositionOutOfRange { positions: 3, .. }));
        assert_eq!(panel.position(rp), Some(2));
    }

    #[test]
    fn initial_position_is_clamped() {
        let mut panel = Panel::new();
        let tw = panel.add_thumbwheel("ReliefLever", 3, 9);
        assert_eq!(panel.position(tw), Some(2));
    }

    #[test]
    fn by_name_lookup() {
        let mut panel = Panel::new();
        panel.add_toggle("A", false);
        let b = panel.add_toggle("B", false);
        panel.set_position_by_name("B", 1).unwrap();
        assert_eq!(panel.position(b), Some(1));
        assert!(matches!(
            panel.set_position_by_name("C", 1),
            Err(ControlError::UnknownName { .. })
        ));
    }

    #[test]
    fn kind_checks() {
        let mut panel = Panel::new();
        let cb = panel.add_breaker("CB", true);
        let rot = panel.add_rotary("ROT", 2, 0);

        assert!(panel.require_kind(cb, ControlKind::CircuitBreaker).is_ok());
        assert!(panel.require_kind(rot, ControlKind::Rotary { positions: 9 }).is_ok());
        assert!(matches!(
            panel.require_kind(rot, ControlKind::CircuitBreaker),
            Err(ControlError::WrongKind { .. })
        ));
    }

    #[test]
    fn bus_voltage() {
        let mut panel = Panel::new();
        let bus = panel.add_bus("BATC", 0.0);
        assert!(!panel.bus_powered(bus));
        panel.set_voltage(bus, 28.0).unwrap();
        assert!(panel.bus_powered(bus));
    }

    proptest! {
        #[test]
        fn position_always_in_range(moves in prop::collection::vec(0_u8..8, 0..32)) {
            let mut panel = Panel::new();
            let rot = panel.add_rotary("ROT", 5, 0);
            for m in moves {
                let _ = panel.set_position(rot, m);
                prop_assert!(panel.position(rot).unwrap() < 5);
            }
        }
    }
}
