//! The command module host.
//!
//! Owns the fluid network, the panel and the cue log, and steps every ECS
//! component once per tick before running the network exactly once.

use std::path::Path;

use ecs_controls::{CueLog, Panel, ThreePosition};
use ecs_core::units::{k, m3, psi, to_psi};
use ecs_core::{PipeId, TankId};
use ecs_network::{Network, NetworkBuilder};
use ecs_systems::supply_router::positions;
use ecs_systems::{
    CrewStatus, CrewStatusMonitor, DemandRegulator, EcsComponent, PressureRegulator,
    ReliefValve, ReliefValveWiring, ReturnValve, ScenarioWriter, SupplyLines, SupplyRouter,
    SupplySelectors, SystemContext, VehicleSnapshot,
};
use tracing::{debug, info};

use crate::config::{TankDef, VehicleConfig};
use crate::error::SimResult;
use crate::scenario::{SECTION_BEGIN, SECTION_END, ecs_records};
use crate::validate::validate_config;

/// Names of the tanks, pipes, controls and cues the host registers.
pub mod names {
    pub const SM_SUPPLY: &str = "SMSUPPLY";
    pub const SURGE_TANK: &str = "SURGETANK";
    pub const REPRESS_PACKAGE: &str = "REPRESSPACKAGE";
    pub const O2_MAIN_REG: &str = "O2MAINREG";
    pub const CABIN: &str = "CABIN";
    pub const SUIT: &str = "SUIT";
    pub const AMBIENT: &str = "AMBIENT";

    pub const SM_SUPPLY_LINE: &str = "SMSUPPLYLINE";
    pub const SURGE_TANK_LINE: &str = "SURGETANKLINE";
    pub const REPRESS_LINE: &str = "REPRESSLINE";
    pub const REPRESS_FILL: &str = "REPRESSFILL";
    pub const CABIN_REGULATOR: &str = "CABINREGULATOR";
    pub const O2_DEMAND_REGULATOR: &str = "O2DEMANDREGULATOR";
    pub const SUIT_RELIEF: &str = "SUITRELIEF";
    pub const SUIT_CIRCUIT_RETURN: &str = "SUITCIRCUITRETURN";
    /// Followed by the relief valve index.
    pub const RELIEF_VENT: &str = "RELIEFVENT";
    /// Followed by the relief valve index.
    pub const POST_LANDING_INLET: &str = "POSTLANDINGINLET";

    pub const SM_SUPPLY_VALVE: &str = "SMSupplyValve";
    pub const SURGE_TANK_VALVE: &str = "SurgeTankValve";
    pub const REPRESS_PACKAGE_VALVE: &str = "RepressPackageValve";
    pub const SUIT_CIRCUIT_RETURN_VALVE: &str = "SuitCircuitReturnValve";
    /// Followed by the relief valve index.
    pub const CABIN_PRESSURE_RELIEF_LEVER: &str = "CabinPressureReliefLever";
    pub const POST_LANDING_VENT_VALVE: &str = "PostLandingVentValve";
    pub const POST_LANDING_VENT: &str = "PostLandingVent";
    pub const POST_LANDING_BUS: &str = "PostLandingBus";

    pub const CABIN_VENT_CUE: &str = "CabinVent";
    pub const CREW_DEATH_CUE: &str = "CrewDeath";
}

/// Crew or ground commands to the ECS components.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EcsCommand {
    CloseCabinRegulator,
    ResetCabinRegulator,
    CloseDemandRegulator,
    ResetDemandRegulator,
    OpenSuitReliefValve,
    ResetSuitReliefValve,
    CloseO2Supply,
    ResetO2Supply,
}

/// The ECS components of one vehicle.
#[derive(Debug)]
struct EcsSystems {
    supply: SupplyRouter,
    cabin_regulator: PressureRegulator,
    demand_regulator: DemandRegulator,
    return_valve: ReturnValve,
    relief_valves: Vec<ReliefValve>,
    crew: CrewStatusMonitor,
}

impl EcsSystems {
    fn each(&self) -> Vec<&dyn EcsComponent> {
        let mut all: Vec<&dyn EcsComponent> = Vec::with_capacity(5 + self.relief_valves.len());
        all.push(&self.supply);
        all.push(&self.cabin_regulator);
        all.push(&self.demand_regulator);
        all.push(&self.return_valve);
        for valve in &self.relief_valves {
            all.push(valve);
        }
        all.push(&self.crew);
        all
    }

    fn each_mut(&mut self) -> Vec<&mut dyn EcsComponent> {
        let mut all: Vec<&mut dyn EcsComponent> = Vec::with_capacity(5 + self.relief_valves.len());
        all.push(&mut self.supply);
        all.push(&mut self.cabin_regulator);
        all.push(&mut self.demand_regulator);
        all.push(&mut self.return_valve);
        for valve in &mut self.relief_valves {
            all.push(valve);
        }
        all.push(&mut self.crew);
        all
    }
}

/// A command module with its environmental control system.
#[derive(Debug)]
pub struct Vehicle {
    name: String,
    network: Network,
    panel: Panel,
    cues: CueLog,
    state: VehicleSnapshot,
    systems: EcsSystems,
    cabin: TankId,
    suit: TankId,
    ambient: TankId,
    time_s: f64,
}

fn add_tank(builder: &mut NetworkBuilder, name: &str, def: &TankDef) -> TankId {
    builder.add_tank(name, m3(def.volume_m3), psi(def.pressure_psi), k(def.temperature_k))
}

impl Vehicle {
    /// The bundled command module.
    pub fn csm() -> SimResult<Self> {
        Self::from_config(&VehicleConfig::csm()?)
    }

    pub fn from_config(config: &VehicleConfig) -> SimResult<Self> {
        validate_config(config)?;
        let tanks = &config.tanks;
        let plumbing = &config.plumbing;

        let mut b = NetworkBuilder::new();
        let sm_supply = add_tank(&mut b, names::SM_SUPPLY, &tanks.sm_supply);
        let surge_tank = add_tank(&mut b, names::SURGE_TANK, &tanks.surge_tank);
        let repress = add_tank(&mut b, names::REPRESS_PACKAGE, &tanks.repress_package);
        let main_reg = add_tank(&mut b, names::O2_MAIN_REG, &tanks.o2_main_reg);
        let cabin = add_tank(&mut b, names::CABIN, &tanks.cabin);
        let suit = add_tank(&mut b, names::SUIT, &tanks.suit);
        let ambient = b.add_boundary(
            names::AMBIENT,
            psi(config.ambient.pressure_psi),
            k(config.ambient.temperature_k),
        );

        let lines = SupplyLines {
            sm_supply: b.add_pipe(names::SM_SUPPLY_LINE, sm_supply, main_reg, plumbing.sm_supply_line),
            surge_tank: b.add_pipe(names::SURGE_TANK_LINE, surge_tank, main_reg, plumbing.surge_tank_line),
            repress_package: b.add_pipe(names::REPRESS_LINE, repress, main_reg, plumbing.repress_line),
            repress_fill: Some(b.add_pipe(names::REPRESS_FILL, main_reg, repress, plumbing.repress_fill_line)),
        };
        let cabin_reg_line = b.add_pipe(names::CABIN_REGULATOR, main_reg, cabin, plumbing.cabin_regulator_line);
        let demand_line = b.add_pipe(names::O2_DEMAND_REGULATOR, main_reg, suit, plumbing.demand_regulator_line);
        let suit_relief = b.add_pipe(names::SUIT_RELIEF, suit, cabin, plumbing.suit_relief_line);
        let suit_return = b.add_pipe(names::SUIT_CIRCUIT_RETURN, cabin, suit, plumbing.suit_return_line);
        let relief_lines: Vec<(PipeId, PipeId)> = (1..=config.relief_valves.len())
            .map(|i| {
                (
                    b.add_pipe(format!("{}{i}", names::RELIEF_VENT), cabin, ambient, plumbing.relief_vent_line),
                    b.add_pipe(
                        format!("{}{i}", names::POST_LANDING_INLET),
                        ambient,
                        cabin,
                        plumbing.post_landing_inlet_line,
                    ),
                )
            })
            .collect();
        let mut network = b.build()?;

        for (id, def) in [
            (sm_supply, &tanks.sm_supply),
            (surge_tank, &tanks.surge_tank),
            (repress, &tanks.repress_package),
            (main_reg, &tanks.o2_main_reg),
            (cabin, &tanks.cabin),
            (suit, &tanks.suit),
        ] {
            if let Some(tank) = network.tank_mut(id) {
                tank.set_co2_fraction(def.co2_fraction);
            }
        }
        // Fixed set-points of plumbing no component regulates.
        let main_psi = Some(psi(plumbing.main_regulator_psi));
        for line in [lines.sm_supply, lines.surge_tank, lines.repress_package]
            .into_iter()
            .chain(lines.repress_fill)
        {
            if let Some(pipe) = network.pipe_mut(line) {
                pipe.set_target_pressure(main_psi);
            }
        }
        if let Some(pipe) = network.pipe_mut(demand_line) {
            pipe.set_target_pressure(Some(psi(plumbing.suit_demand_psi)));
        }

        let settings = &config.panel;
        let mut panel = Panel::new();
        let on_off = |on: bool| if on { positions::ON } else { positions::OFF };
        let selectors = SupplySelectors {
            sm_supply: panel.add_rotary(names::SM_SUPPLY_VALVE, 2, on_off(settings.sm_supply_on)),
            surge_tank: panel.add_rotary(names::SURGE_TANK_VALVE, 2, on_off(settings.surge_tank_on)),
            repress_package: panel.add_rotary(names::REPRESS_PACKAGE_VALVE, 3, positions::OFF),
        };
        let return_breaker = panel.add_breaker(names::SUIT_CIRCUIT_RETURN_VALVE, settings.suit_return_closed);
        let post_landing_valve = panel.add_breaker(names::POST_LANDING_VENT_VALVE, true);
        let post_landing_vent = panel.add_three_position(names::POST_LANDING_VENT, ThreePosition::Down);
        let post_landing_power = panel.add_bus(names::POST_LANDING_BUS, settings.post_landing_bus_voltage);

        let mut cues = CueLog::new();
        let vent_cue = cues.register(names::CABIN_VENT_CUE);
        let death_cue = cues.register(names::CREW_DEATH_CUE);

        let mut cabin_regulator = PressureRegulator::new(&network, cabin_reg_line)?;
        cabin_regulator.set_pressure_psi(config.cabin_regulator.pressure_psi);
        if let Some(flow) = config.cabin_regulator.max_flow_lbh {
            cabin_regulator.set_max_flow_lbh(flow);
        }

        let mut relief_valves = Vec::with_capacity(relief_lines.len());
        for (i, ((vent, inlet), tunables)) in relief_lines.into_iter().zip(&config.relief_valves).enumerate() {
            let index = i as u32 + 1;
            let lever = panel.add_thumbwheel(format!("{}{index}", names::CABIN_PRESSURE_RELIEF_LEVER), 3, 1);
            let wiring = ReliefValveWiring {
                vent,
                inlet,
                lever,
                post_landing_valve,
                post_landing_vent,
                post_landing_power,
            };
            relief_valves.push(ReliefValve::new(index, wiring, *tunables, vent_cue, &network, &panel)?);
        }

        let systems = EcsSystems {
            supply: SupplyRouter::new(&network, &panel, lines, selectors)?,
            cabin_regulator,
            demand_regulator: DemandRegulator::new(&network, demand_line, suit_relief)?,
            return_valve: ReturnValve::new(&network, &panel, suit_return, return_breaker)?,
            relief_valves,
            crew: CrewStatusMonitor::new(&network, suit, config.physiology.clone(), death_cue)?,
        };

        info!(vehicle = %config.name, relief_valves = systems.relief_valves.len(), "vehicle assembled");
        Ok(Self {
            name: config.name.clone(),
            network,
            panel,
            cues,
            state: VehicleSnapshot::new(0.0, settings.crew_aboard),
            systems,
            cabin,
            suit,
            ambient,
            time_s: 0.0,
        })
    }

    /// Step every component with the same `simdt`, then the network once.
    pub fn timestep(&mut self, simdt: f64) {
        let mut ctx = SystemContext {
            network: &mut self.network,
            panel: &self.panel,
            cues: &mut self.cues,
            vehicle: &self.state,
        };
        for component in self.systems.each_mut() {
            component.system_timestep(&mut ctx, simdt);
        }
        self.network.advance(simdt);
        self.time_s += simdt;
    }

    pub fn command(&mut self, command: EcsCommand) {
        let network = &mut self.network;
        let systems = &mut self.systems;
        match command {
            EcsCommand::CloseCabinRegulator => systems.cabin_regulator.close(network),
            EcsCommand::ResetCabinRegulator => systems.cabin_regulator.reset(network),
            EcsCommand::CloseDemandRegulator => systems.demand_regulator.close(network),
            EcsCommand::ResetDemandRegulator => systems.demand_regulator.reset(network),
            EcsCommand::OpenSuitReliefValve => systems.demand_regulator.open_suit_relief_valve(),
            EcsCommand::ResetSuitReliefValve => systems.demand_regulator.reset_suit_relief_valve(),
            EcsCommand::CloseO2Supply => systems.supply.close(network),
            EcsCommand::ResetO2Supply => systems.supply.reset(),
        }
        debug!(?command, "ECS command applied");
    }

    /// Write the ECS section of a scenario.
    pub fn save_scenario(&self) -> String {
        let mut out = ScenarioWriter::new();
        out.line(SECTION_BEGIN);
        for component in self.systems.each() {
            component.save_state(&mut out);
        }
        out.line(SECTION_END);
        info!(vehicle = %self.name, t = self.time_s, "scenario saved");
        out.into_string()
    }

    /// Restore component state from a scenario and return how many records
    /// were applied. Records for other systems are skipped.
    pub fn load_scenario(&mut self, text: &str) -> usize {
        let mut applied = 0;
        for record in ecs_records(text) {
            let mut matched = false;
            for component in self.systems.each_mut() {
                if component.record_key() == record.key() {
                    component.load_state(&record);
                    matched = true;
                }
            }
            if matched {
                applied += 1;
            } else {
                debug!(key = record.key(), "unknown scenario record ignored");
            }
        }
        info!(vehicle = %self.name, records = applied, "scenario loaded");
        applied
    }

    pub fn save_scenario_file(&self, path: &Path) -> SimResult<()> {
        std::fs::write(path, self.save_scenario())?;
        Ok(())
    }

    pub fn load_scenario_file(&mut self, path: &Path) -> SimResult<usize> {
        let text = std::fs::read_to_string(path)?;
        Ok(self.load_scenario(&text))
    }

    /// Move a panel control by name.
    pub fn set_control(&mut self, name: &str, position: u8) -> SimResult<()> {
        self.panel.set_position_by_name(name, position)?;
        Ok(())
    }

    pub fn set_vertical_velocity_mps(&mut self, v: f64) {
        self.state = VehicleSnapshot::new(v, self.state.crew_aboard);
    }

    pub fn set_crew_aboard(&mut self, aboard: bool) {
        self.state.crew_aboard = aboard;
    }

    /// Change the outside pressure, e.g. after splashdown.
    pub fn set_ambient_psi(&mut self, p: f64) {
        if let Some(tank) = self.network.tank_mut(self.ambient) {
            tank.set_pressure(psi(p));
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Simulated seconds since assembly.
    pub fn time(&self) -> f64 {
        self.time_s
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    pub fn network_mut(&mut self) -> &mut Network {
        &mut self.network
    }

    pub fn panel(&self) -> &Panel {
        &self.panel
    }

    pub fn panel_mut(&mut self) -> &mut Panel {
        &mut self.panel
    }

    pub fn cues(&self) -> &CueLog {
        &self.cues
    }

    pub fn components(&self) -> Vec<&dyn EcsComponent> {
        self.systems.each()
    }

    pub fn cabin_regulator(&self) -> &PressureRegulator {
        &self.systems.cabin_regulator
    }

    pub fn demand_regulator(&self) -> &DemandRegulator {
        &self.systems.demand_regulator
    }

    pub fn relief_valves(&self) -> &[ReliefValve] {
        &self.systems.relief_valves
    }

    /// Relief valve by its 1-based index.
    pub fn relief_valve_mut(&mut self, index: u32) -> Option<&mut ReliefValve> {
        self.systems
            .relief_valves
            .iter_mut()
            .find(|v| v.index() == index)
    }

    pub fn return_valve(&self) -> &ReturnValve {
        &self.systems.return_valve
    }

    pub fn supply_router(&self) -> &SupplyRouter {
        &self.systems.supply
    }

    pub fn crew_monitor(&self) -> &CrewStatusMonitor {
        &self.systems.crew
    }

    pub fn crew_status(&self) -> CrewStatus {
        self.systems.crew.status()
    }

    pub fn cabin(&self) -> TankId {
        self.cabin
    }

    pub fn suit(&self) -> TankId {
        self.suit
    }

    pub fn cabin_psi(&self) -> f64 {
        self.tank_psi(self.cabin)
    }

    pub fn suit_psi(&self) -> f64 {
        self.tank_psi(self.suit)
    }

    fn tank_psi(&self, tank: TankId) -> f64 {
        self.network
            .tank(tank)
            .map_or(0.0, |t| to_psi(t.pressure()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assembles_bundled_vehicle() {
        let vehicle = Vehicle::csm().unwrap();
        assert_eq!(vehicle.name(), "CSM");
        assert_eq!(vehicle.relief_valves().len(), 2);
        assert_eq!(vehicle.components().len(), 7);
        assert!(vehicle.panel().control_by_name("CabinPressureReliefLever2").is_some());
        assert!(vehicle.network().pipe_by_name("RELIEFVENT1").is_some());
    }

    #[test]
    fn first_tick_commands_network() {
        let mut vehicle = Vehicle::csm().unwrap();
        vehicle.timestep(1.0);
        let network = vehicle.network();
        let open = |name: &str| network.pipe(network.pipe_by_name(name).unwrap()).unwrap().is_open();
        assert!(open(names::CABIN_REGULATOR));
        assert!(open(names::O2_DEMAND_REGULATOR));
        assert!(open(names::SM_SUPPLY_LINE));
        assert!(open(names::SUIT_CIRCUIT_RETURN));
        assert!(!open(names::REPRESS_LINE));
        assert!(!open("RELIEFVENT1"));
        assert_eq!(vehicle.time(), 1.0);
    }

    #[test]
    fn commands_reach_components() {
        let mut vehicle = Vehicle::csm().unwrap();
        vehicle.command(EcsCommand::CloseCabinRegulator);
        assert!(vehicle.cabin_regulator().is_closed());
        vehicle.command(EcsCommand::CloseDemandRegulator);
        vehicle.command(EcsCommand::OpenSuitReliefValve);
        assert!(!vehicle.demand_regulator().is_suit_relief_valve_open());
        vehicle.command(EcsCommand::ResetDemandRegulator);
        vehicle.command(EcsCommand::OpenSuitReliefValve);
        assert!(vehicle.demand_regulator().is_suit_relief_valve_open());
        vehicle.command(EcsCommand::CloseO2Supply);
        assert!(vehicle.supply_router().is_closed());
        vehicle.command(EcsCommand::ResetO2Supply);
        assert!(!vehicle.supply_router().is_closed());
    }

    #[test]
    fn unknown_control_is_an_error() {
        let mut vehicle = Vehicle::csm().unwrap();
        assert!(vehicle.set_control("NoSuchSwitch", 1).is_err());
        assert!(vehicle.set_control(names::REPRESS_PACKAGE_VALVE, 3).is_err());
        assert!(vehicle.set_control(names::REPRESS_PACKAGE_VALVE, 2).is_ok());
    }
}
