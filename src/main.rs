use anyhow::Result;
use clap::Parser;
use lattice_gas_common::SimulationConfig;
use lattice_gas_engine::output::{write_lattice_csv, write_series_csv, write_snapshots, SnapshotFormat};
use lattice_gas_engine::scan::{run_scan, write_scan_csv};
use lattice_gas_engine::{runner, SimulationController};
use log::{debug, info, warn};
use std::path::PathBuf;

/// Headless driver for the lattice gas engine
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the config.toml file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Number of frames to run (overrides [run].frames)
    #[arg(short, long)]
    frames: Option<u64>,

    /// RNG seed (overrides [dynamics].seed)
    #[arg(long)]
    seed: Option<u64>,

    /// Run the [scan] phase-diagram sweep instead of a single simulation
    #[arg(long)]
    scan: bool,

    /// Base filename for output files (overrides [output].base_filename)
    #[arg(short, long)]
    output: Option<String>,
}

fn main() -> Result<()> {
    // Initialize the logger
    env_logger::init();
    let args = Args::parse();

    info!("Starting Lattice Gas Engine...");

    // --- Load Configuration ---
    let mut config = if args.config.exists() {
        SimulationConfig::load(&args.config)?
    } else {
        warn!("Config file '{}' not found; using built-in defaults.", args.config.display());
        SimulationConfig::default()
    };
    if let Some(frames) = args.frames {
        config.run.frames = frames;
    }
    if let Some(seed) = args.seed {
        config.dynamics.seed = Some(seed);
    }
    if let Some(base) = args.output {
        config.output.base_filename = base;
    }
    debug!("Configuration: {:#?}", config);

    if args.scan {
        let Some(scan) = config.scan.clone() else {
            anyhow::bail!("--scan given but the config has no [scan] section.");
        };
        let points = run_scan(&config, &scan);
        write_scan_csv(&config.output.base_filename, &points)?;
        info!("Scan Complete.");
        return Ok(());
    }

    // --- Initialize Simulation ---
    let mut controller = SimulationController::new(&config);
    info!(
        "Lattice {}x{}, {} trials per frame, T={:.2}, mu={:.2}",
        controller.lattice().width(),
        controller.lattice().height(),
        controller.trials_per_tick(),
        controller.temperature(),
        controller.chemical_potential()
    );

    let output = &config.output;
    let report = runner::run(&mut controller, &config.run, output.save_snapshots, output.snapshot_lattice);

    // --- Save Recorded Data ---
    info!("Saving recorded data...");
    if output.save_series {
        write_series_csv(&output.base_filename, &report.samples)?;
    } else {
        info!("Skipping series output as per config (save_series is false).");
    }
    if output.save_snapshots {
        let format = SnapshotFormat::from_config(output.format.as_deref());
        write_snapshots(&output.base_filename, &report.snapshots, format)?;
    }
    if output.save_final_lattice {
        write_lattice_csv(&output.base_filename, controller.lattice())?;
    }

    info!("Simulation Complete.");
    Ok(())
}
