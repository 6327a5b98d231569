//! JSON records of a run: population history and per-chronon grid frames.

use crate::random::RandomSource;
use crate::world::World;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use wator_core::{Result, SimulationConfig};

/// Parameters a run was started with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationParameters {
    pub width: i32,
    pub height: i32,
    pub initial_fish_fraction: f64,
    pub initial_shark_fraction: f64,
    pub fish_reproduction_period: u32,
    pub shark_reproduction_period: u32,
    pub shark_initial_energy: i32,
    pub seed: u64,
}

impl From<&SimulationConfig> for SimulationParameters {
    fn from(config: &SimulationConfig) -> Self {
        Self {
            width: config.world.width,
            height: config.world.height,
            initial_fish_fraction: config.world.fish_fraction,
            initial_shark_fraction: config.world.shark_fraction,
            fish_reproduction_period: config.fish.reproduction_period,
            shark_reproduction_period: config.shark.reproduction_period,
            shark_initial_energy: config.shark.initial_energy,
            seed: config.seed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChrononRecord {
    pub chronon: u64,
    pub fish_count: usize,
    pub shark_count: usize,
}

/// Full population history with the parameters that produced it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryExport {
    pub recorded_at: DateTime<Utc>,
    pub simulation_parameters: SimulationParameters,
    pub chronons: Vec<ChrononRecord>,
}

impl HistoryExport {
    pub fn from_world<R: RandomSource>(world: &World<R>) -> Self {
        Self {
            recorded_at: Utc::now(),
            simulation_parameters: SimulationParameters::from(world.config()),
            chronons: world
                .history()
                .iter()
                .map(|sample| ChrononRecord {
                    chronon: sample.chronon,
                    fish_count: sample.fish,
                    shark_count: sample.sharks,
                })
                .collect(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Just the two population series
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompactHistory {
    pub fish_population: Vec<usize>,
    pub shark_population: Vec<usize>,
}

impl CompactHistory {
    pub fn from_world<R: RandomSource>(world: &World<R>) -> Self {
        let (fish_population, shark_population) = world
            .history()
            .iter()
            .map(|sample| (sample.fish, sample.sharks))
            .unzip();
        Self {
            fish_population,
            shark_population,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridFrame {
    pub chronon: u64,
    /// One string per row, `F` fish, `S` shark, space for water
    pub rows: Vec<String>,
}

/// Grid frames captured chronon by chronon
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridRecording {
    pub width: i32,
    pub height: i32,
    pub frames: Vec<GridFrame>,
}

impl GridRecording {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            frames: Vec::new(),
        }
    }

    /// Append the world's current grid
    pub fn capture<R: RandomSource>(&mut self, world: &World<R>) {
        self.frames.push(GridFrame {
            chronon: world.chronon(),
            rows: world.grid_snapshot().to_symbol_rows(),
        });
    }

    /// Chronons recorded after the initial frame
    pub fn chronons(&self) -> usize {
        self.frames.len().saturating_sub(1)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// `wator_<kind>_<timestamp>_chronons_<n>_<w>x<h>.json`
pub fn export_file_name(kind: &str, chronons: u64, width: i32, height: i32, at: DateTime<Utc>) -> String {
    format!(
        "wator_{}_{}_chronons_{}_{}x{}.json",
        kind,
        at.format("%Y%m%d_%H%M%S"),
        chronons,
        width,
        height
    )
}
