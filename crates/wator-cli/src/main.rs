//! Command line runner for the Wa-Tor simulation.

mod render;
mod telemetry;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::{event, info, warn, Level};
use wator_core::SimulationConfig;
use wator_world::export::{export_file_name, CompactHistory, GridRecording, HistoryExport};
use wator_world::World;

/// Chronons to run when neither a config file nor `--chronons` says otherwise
const DEFAULT_CHRONONS: u64 = 100;

#[derive(Parser, Debug)]
#[command(author, version, about = "Wa-Tor predator/prey simulation", long_about = None)]
struct Args {
    /// TOML or JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of chronons to run
    #[arg(short = 'n', long)]
    chronons: Option<u64>,

    /// Random seed
    #[arg(short, long)]
    seed: Option<u64>,

    #[arg(long)]
    width: Option<i32>,

    #[arg(long)]
    height: Option<i32>,

    /// Share of cells holding a fish at start
    #[arg(long)]
    fish_fraction: Option<f64>,

    /// Share of cells holding a shark at start
    #[arg(long)]
    shark_fraction: Option<f64>,

    #[arg(long)]
    fish_period: Option<u32>,

    #[arg(long)]
    shark_period: Option<u32>,

    /// Shark energy at birth and after each meal
    #[arg(long)]
    shark_energy: Option<i32>,

    /// Print the grid after every chronon
    #[arg(long)]
    render: bool,

    /// Write the population history to this file, or to a timestamped file
    /// in this directory
    #[arg(long)]
    export: Option<PathBuf>,

    /// Export only the fish and shark series
    #[arg(long, requires = "export")]
    compact: bool,

    /// Write every grid frame as JSON to this file
    #[arg(long)]
    record_grids: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long)]
    log_json: bool,

    /// Stop as soon as either species dies out
    #[arg(long)]
    stop_on_extinction: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    telemetry::init_telemetry(args.log_json);

    let config = load_config(&args)?;
    info!(
        chronons = config.chronons,
        seed = config.seed,
        width = config.world.width,
        height = config.world.height,
        "Starting simulation"
    );

    let mut world = World::new(config).context("Failed to create world")?;
    let mut recording = args
        .record_grids
        .as_ref()
        .map(|_| GridRecording::new(world.width(), world.height()));

    observe(&world, &args, recording.as_mut());
    run(&mut world, &args, recording.as_mut())?;
    summarize(&world);

    if let Some(path) = &args.export {
        write_history(&world, path, args.compact)?;
    }
    if let (Some(path), Some(recording)) = (&args.record_grids, &recording) {
        std::fs::write(path, recording.to_json()?)
            .with_context(|| format!("Failed to write grid recording to {}", path.display()))?;
        info!(path = %path.display(), frames = recording.frames.len(), "Grid recording written");
    }

    Ok(())
}

fn load_config(args: &Args) -> Result<SimulationConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            let is_json = path.extension().is_some_and(|ext| ext == "json");
            let parsed = if is_json {
                SimulationConfig::from_json(&content)
            } else {
                SimulationConfig::from_toml(&content)
            };
            parsed.with_context(|| format!("Invalid config {}", path.display()))?
        }
        None => SimulationConfig {
            chronons: DEFAULT_CHRONONS,
            ..Default::default()
        },
    };

    if let Some(chronons) = args.chronons {
        config.chronons = chronons;
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(width) = args.width {
        config.world.width = width;
    }
    if let Some(height) = args.height {
        config.world.height = height;
    }
    if let Some(fraction) = args.fish_fraction {
        config.world.fish_fraction = fraction;
    }
    if let Some(fraction) = args.shark_fraction {
        config.world.shark_fraction = fraction;
    }
    if let Some(period) = args.fish_period {
        config.fish.reproduction_period = period;
    }
    if let Some(period) = args.shark_period {
        config.shark.reproduction_period = period;
    }
    if let Some(energy) = args.shark_energy {
        config.shark.initial_energy = energy;
    }

    config.validate().context("Invalid simulation parameters")?;
    Ok(config)
}

fn run(world: &mut World, args: &Args, mut recording: Option<&mut GridRecording>) -> Result<()> {
    let chronons = world.config().chronons;
    let summary_every = (chronons / 10).max(1);

    for _ in 0..chronons {
        world.advance().context("Simulation state became inconsistent")?;
        observe(world, args, recording.as_deref_mut());

        if world.chronon() % summary_every == 0 {
            info!(
                chronon = world.chronon(),
                fish = world.fish_count(),
                sharks = world.shark_count(),
                "Population"
            );
        }

        if args.stop_on_extinction && world.is_extinct() {
            if let Some(species) = world.extinct_species() {
                warn!(chronon = world.chronon(), %species, "Species extinct, stopping early");
            }
            break;
        }
    }
    Ok(())
}

/// Render and record the current chronon
fn observe(world: &World, args: &Args, recording: Option<&mut GridRecording>) {
    if args.render {
        let snapshot = world.grid_snapshot();
        println!(
            "{}",
            render::render_frame(world.chronon(), world.fish_count(), world.shark_count(), &snapshot)
        );
    }
    if let Some(recording) = recording {
        recording.capture(world);
    }
}

fn summarize(world: &World) {
    let history = world.history();
    let peak_fish = history.iter().map(|sample| sample.fish).max().unwrap_or(0);
    let peak_sharks = history.iter().map(|sample| sample.sharks).max().unwrap_or(0);

    info!(
        chronons = world.chronon(),
        fish = world.fish_count(),
        sharks = world.shark_count(),
        peak_fish,
        peak_sharks,
        "Simulation finished"
    );

    event!(
        Level::INFO,
        gauge_name = "chronons_completed",
        gauge_value = world.chronon(),
        "Chronons completed gauge"
    );
}

/// Write the history to `path`, or into a timestamped file when `path` is a
/// directory
fn write_history(world: &World, path: &Path, compact: bool) -> Result<()> {
    let target = if path.is_dir() {
        let kind = if compact { "compact" } else { "history" };
        path.join(export_file_name(
            kind,
            world.chronon(),
            world.width(),
            world.height(),
            Utc::now(),
        ))
    } else {
        path.to_path_buf()
    };

    let json = if compact {
        CompactHistory::from_world(world).to_json()?
    } else {
        HistoryExport::from_world(world).to_json()?
    };

    std::fs::write(&target, json)
        .with_context(|| format!("Failed to write history to {}", target.display()))?;
    info!(
        path = %target.display(),
        chronons = world.history().len() - 1,
        "History exported"
    );
    Ok(())
}
