//! Whole-vehicle behaviour with the reference network step.

use ecs_sim::vehicle::names;
use ecs_sim::{EcsCommand, SimOptions, Vehicle, VehicleConfig, run};
use ecs_systems::{CrewStatus, Hazard};

fn csm() -> VehicleConfig {
    VehicleConfig::csm().unwrap()
}

fn cue_plays(vehicle: &Vehicle, name: &str) -> usize {
    let cues = vehicle.cues();
    cues.history()
        .iter()
        .filter(|c| cues.name(**c) == Some(name))
        .count()
}

fn steps(vehicle: &mut Vehicle, n: usize, dt: f64) {
    for _ in 0..n {
        vehicle.timestep(dt);
    }
}

/// Alternate vertical velocity hard enough to exceed the g limit every step.
fn shake(vehicle: &mut Vehicle, n: usize) {
    for i in 0..n {
        vehicle.set_vertical_velocity_mps(if i % 2 == 0 { 200.0 } else { 0.0 });
        vehicle.timestep(1.0);
    }
}

#[test]
fn nominal_cabin_holds_pressure_and_crew() {
    let mut vehicle = Vehicle::csm().unwrap();
    let record = run(
        &mut vehicle,
        &SimOptions {
            dt: 1.0,
            t_end: 600.0,
            ..SimOptions::default()
        },
    )
    .unwrap();
    assert_eq!(record.final_status(), Some(CrewStatus::Ok));
    assert!((vehicle.cabin_psi() - 5.0).abs() < 0.2);
    assert!(vehicle.suit_psi() > 4.0);
    assert_eq!(cue_plays(&vehicle, names::CABIN_VENT_CUE), 0);
}

#[test]
fn overpressured_cabin_vents_toward_relief() {
    let mut config = csm();
    config.tanks.cabin.pressure_psi = 7.0;
    let mut vehicle = Vehicle::from_config(&config).unwrap();
    steps(&mut vehicle, 120, 1.0);

    let p = vehicle.cabin_psi();
    assert!(p < 7.0, "cabin still at {p} psi");
    assert!(p > 5.9, "cabin vented below relief: {p} psi");
    // two valves, each cues once on opening
    assert_eq!(cue_plays(&vehicle, names::CABIN_VENT_CUE), 2);
}

#[test]
fn closed_cabin_regulator_stops_repressurisation() {
    let mut config = csm();
    config.tanks.cabin.pressure_psi = 4.0;

    let mut open = Vehicle::from_config(&config).unwrap();
    let mut closed = Vehicle::from_config(&config).unwrap();
    closed.command(EcsCommand::CloseCabinRegulator);
    steps(&mut open, 60, 1.0);
    steps(&mut closed, 60, 1.0);

    let line = closed.network().pipe_by_name(names::CABIN_REGULATOR).unwrap();
    assert!(!closed.network().pipe(line).unwrap().is_open());
    assert!(closed.cabin_psi() < open.cabin_psi());
    assert!(open.cabin_psi() > 4.0);
}

#[test]
fn post_landing_vent_admits_outside_air() {
    let mut vehicle = Vehicle::csm().unwrap();
    vehicle.set_ambient_psi(14.7);
    vehicle.set_control(names::POST_LANDING_VENT, 2).unwrap();
    steps(&mut vehicle, 60, 1.0);
    assert!(vehicle.cabin_psi() > 5.5);
    assert!(vehicle.relief_valves().iter().all(|v| v.is_inlet_open()));
    assert!(cue_plays(&vehicle, names::CABIN_VENT_CUE) >= 1);
}

#[test]
fn tripped_breaker_keeps_post_landing_vent_shut() {
    let mut vehicle = Vehicle::csm().unwrap();
    vehicle.set_ambient_psi(14.7);
    vehicle.set_control(names::POST_LANDING_VENT, 2).unwrap();
    vehicle.set_control(names::POST_LANDING_VENT_VALVE, 0).unwrap();
    steps(&mut vehicle, 10, 1.0);
    assert!(vehicle.relief_valves().iter().all(|v| !v.is_inlet_open()));
    assert!(vehicle.cabin_psi() < 5.5);
}

#[test]
fn sustained_g_load_kills_in_two_stages() {
    let mut vehicle = Vehicle::csm().unwrap();
    vehicle.timestep(1.0); // baseline
    shake(&mut vehicle, 10);
    assert_eq!(vehicle.crew_status(), CrewStatus::Critical);
    assert_eq!(vehicle.crew_monitor().last_cause(), Some(Hazard::Acceleration));

    // one calm step clears the timer, the next ten seconds cross again
    vehicle.timestep(1.0);
    assert_eq!(vehicle.crew_monitor().elapsed(Hazard::Acceleration), 0.0);
    shake(&mut vehicle, 10);
    assert_eq!(vehicle.crew_status(), CrewStatus::Dead);
    assert_eq!(cue_plays(&vehicle, names::CREW_DEATH_CUE), 1);

    shake(&mut vehicle, 20);
    assert_eq!(cue_plays(&vehicle, names::CREW_DEATH_CUE), 1);
}

#[test]
fn uncrewed_vehicle_survives_anything() {
    let mut config = csm();
    config.panel.crew_aboard = false;
    let mut vehicle = Vehicle::from_config(&config).unwrap();
    shake(&mut vehicle, 40);
    assert_eq!(vehicle.crew_status(), CrewStatus::Ok);
}

#[test]
fn scenario_round_trips_between_vehicles() {
    let mut first = Vehicle::csm().unwrap();
    first.timestep(1.0);
    shake(&mut first, 12);
    first.command(EcsCommand::CloseO2Supply);
    first.command(EcsCommand::OpenSuitReliefValve);
    if let Some(valve) = first.relief_valve_mut(2) {
        valve.set_leak_size(0.35);
        valve.set_relief_pressure_psi(6.25);
    }
    let saved = first.save_scenario();
    assert!(saved.starts_with("BEGIN_ECS\n"));
    assert!(saved.trim_end().ends_with("END_ECS"));
    assert!(saved.contains("CABINPRESSURERELIEFVALVE2 leaksize 0.35 reliefpressure 6.25"));

    let mut second = Vehicle::csm().unwrap();
    let text = format!("SHIP CSM\n{saved}OTHERSYSTEM foo 1\n");
    // the return valve has nothing to persist
    assert_eq!(second.load_scenario(&text), 6);
    assert_eq!(second.save_scenario(), saved);
    assert_eq!(second.crew_status(), CrewStatus::Critical);
    assert!(second.supply_router().is_closed());
    assert!(second.demand_regulator().is_suit_relief_valve_open());
}

#[test]
fn loaded_closed_supply_shuts_lines_on_next_tick() {
    let mut vehicle = Vehicle::csm().unwrap();
    vehicle.timestep(1.0);
    vehicle.load_scenario("BEGIN_ECS\nO2SMSUPPLY closed 1\nEND_ECS\n");
    vehicle.timestep(1.0);
    let network = vehicle.network();
    for name in [names::SM_SUPPLY_LINE, names::SURGE_TANK_LINE, names::REPRESS_LINE] {
        let pipe = network.pipe_by_name(name).unwrap();
        assert!(!network.pipe(pipe).unwrap().is_open(), "{name} open");
    }
}

#[test]
fn run_continues_from_loaded_time() {
    let mut vehicle = Vehicle::csm().unwrap();
    steps(&mut vehicle, 5, 1.0);
    let record = run(
        &mut vehicle,
        &SimOptions {
            dt: 1.0,
            t_end: 15.0,
            record_every: 5,
            ..SimOptions::default()
        },
    )
    .unwrap();
    assert_eq!(record.t, vec![5.0, 10.0, 15.0]);
}
