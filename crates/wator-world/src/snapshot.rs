//! Read-only views handed to renderers and exporters.

use serde::{Deserialize, Serialize};
use wator_core::{Occupancy, Position};

/// Occupancy of every cell at one instant, detached from the live world
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSnapshot {
    pub width: i32,
    pub height: i32,
    cells: Vec<Occupancy>,
}

impl GridSnapshot {
    pub(crate) fn new(width: i32, height: i32, cells: Vec<Occupancy>) -> Self {
        Self {
            width,
            height,
            cells,
        }
    }

    /// Occupancy at `pos`, wrapped onto the torus
    pub fn get(&self, pos: Position) -> Occupancy {
        let wrapped = pos.wrap(self.width, self.height);
        self.cells[(wrapped.y * self.width + wrapped.x) as usize]
    }

    pub fn count(&self, occupancy: Occupancy) -> usize {
        self.cells.iter().filter(|&&cell| cell == occupancy).count()
    }

    pub fn cells(&self) -> &[Occupancy] {
        &self.cells
    }

    /// Rows from top (y = 0) to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[Occupancy]> + '_ {
        self.cells.chunks(self.width as usize)
    }

    /// One string per row using [`Occupancy::symbol`]
    pub fn to_symbol_rows(&self) -> Vec<String> {
        self.rows()
            .map(|row| row.iter().map(Occupancy::symbol).collect())
            .collect()
    }
}
