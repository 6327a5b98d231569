//! Configuration types for the simulation.
//!
//! Every section deserializes with defaults, so a configuration file only needs
//! the values it changes:
//!
//! ```toml
//! chronons = 200
//! seed = 7
//!
//! [world]
//! width = 80
//! height = 40
//!
//! [shark]
//! initial_energy = 4
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// World geometry and initial population
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Width of the world grid
    pub width: i32,
    /// Height of the world grid
    pub height: i32,
    /// Share of cells holding a fish at chronon 0 (0.0 to 1.0)
    pub fish_fraction: f64,
    /// Share of cells holding a shark at chronon 0 (0.0 to 1.0)
    pub shark_fraction: f64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 50,
            height: 50,
            fish_fraction: 0.5,
            shark_fraction: 0.05,
        }
    }
}

impl WorldConfig {
    pub fn validate(&self) -> Result<()> {
        if self.width <= 0 || self.height <= 0 {
            return Err(Error::config(format!(
                "grid dimensions must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        if self.width.checked_mul(self.height).is_none() {
            return Err(Error::config(format!(
                "grid of {}x{} cells is too large",
                self.width, self.height
            )));
        }
        check_fraction("fish_fraction", self.fish_fraction)?;
        check_fraction("shark_fraction", self.shark_fraction)?;
        if self.fish_fraction + self.shark_fraction > 1.0 {
            return Err(Error::config(format!(
                "fish_fraction + shark_fraction must not exceed 1.0, got {}",
                self.fish_fraction + self.shark_fraction
            )));
        }
        Ok(())
    }

    pub fn cell_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Fish placed at chronon 0: `floor(fish_fraction * cells)`
    pub fn initial_fish(&self) -> usize {
        (self.fish_fraction * self.cell_count() as f64).floor() as usize
    }

    /// Sharks placed at chronon 0: `floor(shark_fraction * cells)`
    pub fn initial_sharks(&self) -> usize {
        (self.shark_fraction * self.cell_count() as f64).floor() as usize
    }
}

fn check_fraction(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        return Err(Error::config(format!(
            "{} must be within [0, 1], got {}",
            name, value
        )));
    }
    Ok(())
}

/// Fish life cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FishConfig {
    /// Chronons between two spawns
    pub reproduction_period: u32,
}

impl Default for FishConfig {
    fn default() -> Self {
        Self {
            reproduction_period: 8,
        }
    }
}

impl FishConfig {
    pub fn validate(&self) -> Result<()> {
        if self.reproduction_period == 0 {
            return Err(Error::config("fish reproduction_period must be positive"));
        }
        Ok(())
    }
}

/// Shark life cycle and metabolism
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SharkConfig {
    /// Chronons between two spawns
    pub reproduction_period: u32,
    /// Energy at birth, restored in full after every meal
    pub initial_energy: i32,
}

impl Default for SharkConfig {
    fn default() -> Self {
        Self {
            reproduction_period: 12,
            initial_energy: 5,
        }
    }
}

impl SharkConfig {
    pub fn validate(&self) -> Result<()> {
        if self.reproduction_period == 0 {
            return Err(Error::config("shark reproduction_period must be positive"));
        }
        if self.initial_energy <= 0 {
            return Err(Error::config(format!(
                "shark initial_energy must be positive, got {}",
                self.initial_energy
            )));
        }
        Ok(())
    }
}

/// Complete run configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of chronons a run advances
    pub chronons: u64,
    /// Random seed for reproducibility
    pub seed: u64,
    /// World configuration
    pub world: WorldConfig,
    /// Fish configuration
    pub fish: FishConfig,
    /// Shark configuration
    pub shark: SharkConfig,
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<()> {
        self.world.validate()?;
        self.fish.validate()?;
        self.shark.validate()?;
        Ok(())
    }

    /// Parse and validate a TOML document
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a JSON document
    pub fn from_json(content: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }
}
