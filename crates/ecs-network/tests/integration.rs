//! Integration tests for ecs-network.

use ecs_core::units::{k, m3, psi, to_psi};
use ecs_network::{NetworkBuilder, NetworkError};

#[test]
fn build_minimal_network() {
    // Build: SUPPLY -> [P1] -> CABIN -> [P2] -> SPACE
    let mut builder = NetworkBuilder::new();
    let supply = builder.add_tank("SUPPLY", m3(0.1), psi(900.0), k(290.0));
    let cabin = builder.add_tank("CABIN", m3(6.0), psi(5.0), k(295.0));
    let space = builder.add_boundary("SPACE", psi(0.0), k(295.0));
    let p1 = builder.add_pipe("P1", supply, cabin, 1e-7);
    let p2 = builder.add_pipe("P2", cabin, space, 1e-7);

    let network = builder.build().unwrap();

    assert_eq!(network.tanks().len(), 3);
    assert_eq!(network.pipes().len(), 2);
    assert_eq!(network.tank_by_name("CABIN"), Some(cabin));
    assert_eq!(network.pipe_by_name("P2"), Some(p2));
    assert_eq!(network.pipe(p1).unwrap().to(), cabin);
    assert!(network.tank(space).unwrap().is_fixed());
    assert!((to_psi(network.inlet_pressure(p1).unwrap()) - 900.0).abs() < 1e-6);
}

#[test]
fn duplicate_names_rejected() {
    let mut builder = NetworkBuilder::new();
    builder.add_tank("CABIN", m3(6.0), psi(5.0), k(295.0));
    builder.add_tank("CABIN", m3(6.0), psi(5.0), k(295.0));

    assert!(matches!(
        builder.build(),
        Err(NetworkError::DuplicateName { .. })
    ));
}

#[test]
fn self_loop_rejected() {
    let mut builder = NetworkBuilder::new();
    let cabin = builder.add_tank("CABIN", m3(6.0), psi(5.0), k(295.0));
    let p = builder.add_pipe("LOOP", cabin, cabin, 1e-7);

    assert_eq!(builder.build().unwrap_err(), NetworkError::SelfLoop { pipe: p });
}

#[test]
fn non_physical_tank_rejected() {
    let mut builder = NetworkBuilder::new();
    builder.add_tank("CABIN", m3(0.0), psi(5.0), k(295.0));

    assert!(matches!(
        builder.build(),
        Err(NetworkError::NonPhysicalTank { what: "volume", .. })
    ));
}

#[test]
fn vent_to_vacuum_depressurizes() {
    let mut builder = NetworkBuilder::new();
    let cabin = builder.add_tank("CABIN", m3(6.0), psi(5.0), k(295.0));
    let space = builder.add_boundary("SPACE", psi(0.0), k(295.0));
    let vent = builder.add_pipe("VENT", cabin, space, 1e-6);
    let mut network = builder.build().unwrap();

    network.pipe_mut(vent).unwrap().set_open(true);
    let mut last = to_psi(network.tank(cabin).unwrap().pressure());
    for _ in 0..50 {
        network.advance(1.0);
        let now = to_psi(network.tank(cabin).unwrap().pressure());
        assert!(now <= last);
        last = now;
    }
    assert!(last < 5.0);
    assert_eq!(to_psi(network.tank(space).unwrap().pressure()), 0.0);
}
