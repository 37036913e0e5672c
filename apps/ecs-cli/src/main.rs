use clap::{Parser, Subcommand, ValueEnum};
use ecs_sim::{EcsCommand, SimOptions, SimRecord, SimResult, Vehicle, VehicleConfig, ecs_records, load_yaml};
use ecs_systems::CrewStatus;
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "ecs-cli")]
#[command(about = "Spacecraft environmental control system simulator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a vehicle configuration file
    Validate {
        /// Path to the vehicle YAML file
        config_path: PathBuf,
    },
    /// Run a simulation
    Run(RunArgs),
    /// List the ECS records in a scenario file
    Show {
        /// Path to the scenario file
        scenario_path: PathBuf,
    },
}

#[derive(clap::Args)]
struct RunArgs {
    /// Vehicle YAML file (defaults to the bundled CSM)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Time step in seconds
    #[arg(long, default_value_t = 1.0)]
    dt: f64,
    /// End time in seconds
    #[arg(long)]
    t_end: f64,
    /// Record every N-th step
    #[arg(long, default_value_t = 10)]
    record_every: usize,
    /// Scenario to restore before running
    #[arg(long)]
    load: Option<PathBuf>,
    /// Where to write the scenario after running
    #[arg(long)]
    save: Option<PathBuf>,
    /// Move a panel control before running, e.g. `RepressPackageValve=1`
    #[arg(long = "set", value_parser = parse_setting)]
    settings: Vec<(String, u8)>,
    /// ECS command to issue before running
    #[arg(long = "command", value_enum)]
    commands: Vec<CommandArg>,
    /// Vertical velocity held for the whole run (m/s)
    #[arg(long)]
    velocity: Option<f64>,
    /// Outside pressure (psi)
    #[arg(long)]
    ambient_psi: Option<f64>,
    /// Print the sampled series as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum CommandArg {
    CloseCabinRegulator,
    ResetCabinRegulator,
    CloseDemandRegulator,
    ResetDemandRegulator,
    OpenSuitRelief,
    ResetSuitRelief,
    CloseO2Supply,
    ResetO2Supply,
}

impl From<CommandArg> for EcsCommand {
    fn from(arg: CommandArg) -> Self {
        match arg {
            CommandArg::CloseCabinRegulator => EcsCommand::CloseCabinRegulator,
            CommandArg::ResetCabinRegulator => EcsCommand::ResetCabinRegulator,
            CommandArg::CloseDemandRegulator => EcsCommand::CloseDemandRegulator,
            CommandArg::ResetDemandRegulator => EcsCommand::ResetDemandRegulator,
            CommandArg::OpenSuitRelief => EcsCommand::OpenSuitReliefValve,
            CommandArg::ResetSuitRelief => EcsCommand::ResetSuitReliefValve,
            CommandArg::CloseO2Supply => EcsCommand::CloseO2Supply,
            CommandArg::ResetO2Supply => EcsCommand::ResetO2Supply,
        }
    }
}

fn parse_setting(s: &str) -> Result<(String, u8), String> {
    let (name, position) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=POSITION, got '{s}'"))?;
    let position = position
        .trim()
        .parse()
        .map_err(|_| format!("invalid position '{position}'"))?;
    Ok((name.trim().to_string(), position))
}

#[derive(Serialize)]
struct RunReport<'a> {
    vehicle: &'a str,
    t_end: f64,
    final_status: CrewStatus,
    record: &'a SimRecord,
}

fn main() -> SimResult<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { config_path } => cmd_validate(&config_path),
        Commands::Run(args) => cmd_run(&args),
        Commands::Show { scenario_path } => cmd_show(&scenario_path),
    }
}

fn cmd_validate(config_path: &Path) -> SimResult<()> {
    println!("Validating vehicle: {}", config_path.display());
    let config = load_yaml(config_path)?;
    println!(
        "✓ {} is valid ({} relief valves)",
        config.name,
        config.relief_valves.len()
    );
    Ok(())
}

fn cmd_run(args: &RunArgs) -> SimResult<()> {
    let config = match &args.config {
        Some(path) => load_yaml(path)?,
        None => VehicleConfig::csm()?,
    };
    let mut vehicle = Vehicle::from_config(&config)?;

    if let Some(path) = &args.load {
        let applied = vehicle.load_scenario_file(path)?;
        println!("Restored {} ECS records from {}", applied, path.display());
    }
    for (name, position) in &args.settings {
        vehicle.set_control(name, *position)?;
    }
    for command in &args.commands {
        vehicle.command((*command).into());
    }
    if let Some(v) = args.velocity {
        vehicle.set_vertical_velocity_mps(v);
    }
    if let Some(p) = args.ambient_psi {
        vehicle.set_ambient_psi(p);
    }

    let opts = SimOptions {
        dt: args.dt,
        t_end: vehicle.time() + args.t_end,
        record_every: args.record_every,
        ..SimOptions::default()
    };
    let record = ecs_sim::run(&mut vehicle, &opts)?;

    if args.json {
        let report = RunReport {
            vehicle: vehicle.name(),
            t_end: vehicle.time(),
            final_status: vehicle.crew_status(),
            record: &record,
        };
        match serde_json::to_string_pretty(&report) {
            Ok(text) => println!("{text}"),
            Err(e) => eprintln!("JSON output failed: {e}"),
        }
    } else {
        println!("Ran {} for {:.1} s (dt = {} s)", vehicle.name(), vehicle.time(), args.dt);
        println!("  Samples: {}", record.len());
        println!("  Cabin: {:.3} psi", vehicle.cabin_psi());
        println!("  Suit:  {:.3} psi", vehicle.suit_psi());
        println!("  Crew:  {:?}", vehicle.crew_status());
        if let Some(cause) = vehicle.crew_monitor().last_cause() {
            println!("  Last hazard: {}", cause.label());
        }
    }

    if let Some(path) = &args.save {
        vehicle.save_scenario_file(path)?;
        println!("Saved scenario to {}", path.display());
    }
    Ok(())
}

fn cmd_show(scenario_path: &Path) -> SimResult<()> {
    let text = std::fs::read_to_string(scenario_path)?;
    let records = ecs_records(&text);
    if records.is_empty() {
        println!("No ECS section in {}", scenario_path.display());
        return Ok(());
    }
    for record in records {
        println!("{}", record.key());
        for (name, value) in record.fields() {
            println!("  {name:<24} {value}");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_control_settings() {
        assert_eq!(
            parse_setting("RepressPackageValve=2"),
            Ok(("RepressPackageValve".to_string(), 2))
        );
        assert!(parse_setting("RepressPackageValve").is_err());
        assert!(parse_setting("RepressPackageValve=x").is_err());
    }

    #[test]
    fn cli_parses_run_flags() {
        let cli = Cli::try_parse_from([
            "ecs-cli",
            "run",
            "--t-end",
            "60",
            "--set",
            "SurgeTankValve=0",
            "--command",
            "close-cabin-regulator",
            "--json",
        ])
        .unwrap();
        let Commands::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.t_end, 60.0);
        assert_eq!(args.settings, vec![("SurgeTankValve".to_string(), 0)]);
        assert_eq!(args.commands.len(), 1);
        assert!(args.json);
    }
}
