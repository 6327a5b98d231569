//! Core type definitions for the simulation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// 2D position in the world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn add(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Apply toroidal wrapping for given world dimensions
    pub fn wrap(&self, width: i32, height: i32) -> Self {
        Self {
            x: self.x.rem_euclid(width),
            y: self.y.rem_euclid(height),
        }
    }

    /// One step in `direction`, wrapped onto a `width` x `height` torus
    pub fn step(&self, direction: Direction, width: i32, height: i32) -> Self {
        let (dx, dy) = direction.to_delta();
        self.add(dx, dy).wrap(width, height)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Orthogonal movement directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    West,
    East,
    North,
    South,
}

impl Direction {
    pub fn to_delta(&self) -> (i32, i32) {
        match self {
            Direction::West => (-1, 0),
            Direction::East => (1, 0),
            Direction::North => (0, -1),
            Direction::South => (0, 1),
        }
    }

    /// Neighbor scan order. Seeded runs depend on it staying fixed.
    pub fn all() -> [Direction; 4] {
        [
            Direction::West,
            Direction::East,
            Direction::North,
            Direction::South,
        ]
    }
}

/// The two species living on the planet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Species {
    Fish,
    Shark,
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Species::Fish => write!(f, "fish"),
            Species::Shark => write!(f, "shark"),
        }
    }
}

/// What a viewer sees in a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Occupancy {
    #[default]
    Empty,
    Fish,
    Shark,
}

impl Occupancy {
    /// Single-character code, also used by the grid recordings
    pub fn symbol(&self) -> char {
        match self {
            Occupancy::Empty => ' ',
            Occupancy::Fish => 'F',
            Occupancy::Shark => 'S',
        }
    }
}

impl From<Species> for Occupancy {
    fn from(species: Species) -> Self {
        match species {
            Species::Fish => Occupancy::Fish,
            Species::Shark => Occupancy::Shark,
        }
    }
}

/// Population counts recorded at the end of a chronon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopulationSample {
    pub chronon: u64,
    pub fish: usize,
    pub sharks: usize,
}

impl PopulationSample {
    pub fn new(chronon: u64, fish: usize, sharks: usize) -> Self {
        Self { chronon, fish, sharks }
    }

    pub fn total(&self) -> usize {
        self.fish + self.sharks
    }
}
