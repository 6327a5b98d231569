//! 2D toroidal occupancy grid.

use crate::entity::EntityId;
use crate::snapshot::GridSnapshot;
use wator_core::{Direction, Error, Occupancy, Position, Result, Species};

/// Content of one cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Fish(EntityId),
    Shark(EntityId),
}

impl Cell {
    pub fn occupied_by(species: Species, id: EntityId) -> Self {
        match species {
            Species::Fish => Cell::Fish(id),
            Species::Shark => Cell::Shark(id),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn entity(&self) -> Option<EntityId> {
        match self {
            Cell::Empty => None,
            Cell::Fish(id) | Cell::Shark(id) => Some(*id),
        }
    }

    pub fn species(&self) -> Option<Species> {
        match self {
            Cell::Empty => None,
            Cell::Fish(_) => Some(Species::Fish),
            Cell::Shark(_) => Some(Species::Shark),
        }
    }

    pub fn occupancy(&self) -> Occupancy {
        self.species().map(Occupancy::from).unwrap_or_default()
    }
}

/// A 2D toroidal grid where each cell holds at most one entity
#[derive(Debug, Clone)]
pub struct Grid {
    pub width: i32,
    pub height: i32,
    cells: Vec<Cell>,
}

impl Grid {
    /// Dimensions are validated by the configuration layer before this is called.
    pub(crate) fn new(width: i32, height: i32) -> Self {
        debug_assert!(
            width > 0 && height > 0,
            "grid dimensions must be positive, got {}x{}",
            width,
            height
        );
        let size = (width * height) as usize;
        Self {
            width,
            height,
            cells: vec![Cell::Empty; size],
        }
    }

    /// Whether `pos` lies inside the grid without wrapping
    pub fn contains(&self, pos: Position) -> bool {
        (0..self.width).contains(&pos.x) && (0..self.height).contains(&pos.y)
    }

    /// Get the occupant at position (with toroidal wrapping)
    pub fn occupant(&self, pos: Position) -> Cell {
        self.cells[self.pos_to_index(pos)]
    }

    /// Put an entity into an empty cell.
    ///
    /// Placing onto an occupied cell would orphan its current occupant, so it
    /// is reported as an invariant violation instead.
    pub fn place(&mut self, pos: Position, species: Species, id: EntityId) -> Result<()> {
        let index = self.pos_to_index(pos);
        match self.cells[index] {
            Cell::Empty => {
                self.cells[index] = Cell::occupied_by(species, id);
                Ok(())
            }
            other => Err(Error::invariant(format!(
                "cannot place {} {} at {}: cell already holds {:?}",
                species, id, pos, other
            ))),
        }
    }

    /// Empty a cell, returning what was there
    pub fn clear(&mut self, pos: Position) -> Cell {
        let index = self.pos_to_index(pos);
        std::mem::take(&mut self.cells[index])
    }

    /// The four orthogonal neighbors in fixed order: west, east, north, south
    pub fn neighbors(&self, pos: Position) -> [Position; 4] {
        Direction::all().map(|direction| pos.step(direction, self.width, self.height))
    }

    pub fn empty_neighbors(&self, pos: Position) -> Vec<Position> {
        self.neighbors(pos)
            .into_iter()
            .filter(|&n| self.occupant(n).is_empty())
            .collect()
    }

    pub fn fish_neighbors(&self, pos: Position) -> Vec<Position> {
        self.neighbors(pos)
            .into_iter()
            .filter(|&n| matches!(self.occupant(n), Cell::Fish(_)))
            .collect()
    }

    /// Number of cells showing `occupancy`
    pub fn count(&self, occupancy: Occupancy) -> usize {
        self.cells
            .iter()
            .filter(|cell| cell.occupancy() == occupancy)
            .count()
    }

    /// Owned copy of the occupancy of every cell
    pub fn snapshot(&self) -> GridSnapshot {
        GridSnapshot::new(
            self.width,
            self.height,
            self.cells.iter().map(Cell::occupancy).collect(),
        )
    }

    fn pos_to_index(&self, pos: Position) -> usize {
        let wrapped = pos.wrap(self.width, self.height);
        (wrapped.y * self.width + wrapped.x) as usize
    }

    /// Get position from index
    pub fn index_to_pos(&self, index: usize) -> Position {
        let x = (index as i32) % self.width;
        let y = (index as i32) / self.width;
        Position::new(x, y)
    }

    /// Iterator over all positions, row by row
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.cells.len()).map(move |i| self.index_to_pos(i))
    }

    /// Iterator over all cells with positions
    pub fn iter(&self) -> impl Iterator<Item = (Position, Cell)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, cell)| (self.index_to_pos(i), *cell))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(index: u32) -> EntityId {
        EntityId::new(index, 0)
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "grid dimensions must be positive")]
    fn test_grid_rejects_negative_dimensions() {
        Grid::new(-4, 3);
    }

    #[test]
    fn test_grid_creation() {
        let grid = Grid::new(10, 4);
        assert_eq!(grid.width, 10);
        assert_eq!(grid.height, 4);
        assert_eq!(grid.cells.len(), 40);
        assert_eq!(grid.count(Occupancy::Empty), 40);
    }

    #[test]
    fn test_toroidal_neighbors() {
        let grid = Grid::new(6, 4);
        let neighbors = grid.neighbors(Position::new(0, 0));
        assert_eq!(
            neighbors,
            [
                Position::new(5, 0),
                Position::new(1, 0),
                Position::new(0, 3),
                Position::new(0, 1),
            ]
        );

        let neighbors = grid.neighbors(Position::new(5, 3));
        assert!(neighbors.contains(&Position::new(0, 3)));
        assert!(neighbors.contains(&Position::new(5, 0)));
    }

    #[test]
    fn test_place_and_clear() {
        let mut grid = Grid::new(3, 3);
        let pos = Position::new(1, 2);
        grid.place(pos, Species::Shark, id(7)).unwrap();
        assert_eq!(grid.occupant(pos), Cell::Shark(id(7)));
        assert_eq!(grid.occupant(Position::new(4, -1)), Cell::Shark(id(7)));

        assert_eq!(grid.clear(pos), Cell::Shark(id(7)));
        assert!(grid.occupant(pos).is_empty());
        assert_eq!(grid.clear(pos), Cell::Empty);
    }

    #[test]
    fn test_place_refuses_occupied_cell() {
        let mut grid = Grid::new(3, 3);
        let pos = Position::new(0, 0);
        grid.place(pos, Species::Fish, id(1)).unwrap();

        let err = grid.place(pos, Species::Shark, id(2)).unwrap_err();
        assert!(matches!(err, Error::InvariantViolation(_)));
        assert_eq!(grid.occupant(pos), Cell::Fish(id(1)));
    }

    #[test]
    fn test_filtered_neighbors() {
        let mut grid = Grid::new(5, 5);
        let center = Position::new(2, 2);
        grid.place(Position::new(1, 2), Species::Fish, id(1)).unwrap();
        grid.place(Position::new(2, 1), Species::Shark, id(2)).unwrap();

        assert_eq!(grid.fish_neighbors(center), vec![Position::new(1, 2)]);
        assert_eq!(
            grid.empty_neighbors(center),
            vec![Position::new(3, 2), Position::new(2, 3)]
        );
    }

    #[test]
    fn test_snapshot_reflects_cells() {
        let mut grid = Grid::new(4, 2);
        grid.place(Position::new(3, 1), Species::Fish, id(0)).unwrap();
        grid.place(Position::new(0, 0), Species::Shark, id(1)).unwrap();

        let snapshot = grid.snapshot();
        assert_eq!(snapshot.get(Position::new(3, 1)), Occupancy::Fish);
        assert_eq!(snapshot.get(Position::new(0, 0)), Occupancy::Shark);
        assert_eq!(snapshot.count(Occupancy::Empty), 6);
        assert_eq!(grid.count(Occupancy::Fish), 1);
    }

    #[test]
    fn test_index_roundtrip_covers_grid() {
        let grid = Grid::new(7, 3);
        let positions: Vec<_> = grid.positions().collect();
        assert_eq!(positions.len(), 21);
        assert_eq!(positions[0], Position::new(0, 0));
        assert_eq!(positions[8], Position::new(1, 1));
        assert!(positions.iter().all(|&p| grid.contains(p)));
    }
}
