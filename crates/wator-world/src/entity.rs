//! Fish and shark individuals.

use serde::{Deserialize, Serialize};
use std::fmt;
use wator_core::{Position, Species};

/// Stable handle into the population registry.
///
/// The generation changes every time a slot is recycled, so a handle kept past
/// an entity's death never resolves to its successor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId {
    index: u32,
    generation: u32,
}

impl EntityId {
    pub(crate) fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    pub fn index(&self) -> usize {
        self.index as usize
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}

/// Species-specific state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Vitals {
    Fish,
    Shark { energy: i32, initial_energy: i32 },
}

/// One fish or shark
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    position: Position,
    reproduction_period: u32,
    reproduction_timer: u32,
    alive: bool,
    vitals: Vitals,
}

impl Entity {
    pub fn fish(position: Position, reproduction_period: u32) -> Self {
        Self {
            position,
            reproduction_period,
            reproduction_timer: reproduction_period,
            alive: true,
            vitals: Vitals::Fish,
        }
    }

    pub fn shark(position: Position, reproduction_period: u32, initial_energy: i32) -> Self {
        Self {
            position,
            reproduction_period,
            reproduction_timer: reproduction_period,
            alive: true,
            vitals: Vitals::Shark {
                energy: initial_energy,
                initial_energy,
            },
        }
    }

    /// Override the countdown, e.g. to lay out a scenario mid-cycle
    pub fn with_timer(mut self, reproduction_timer: u32) -> Self {
        self.reproduction_timer = reproduction_timer;
        self
    }

    /// Override the current energy of a shark. No effect on fish.
    pub fn with_energy(mut self, current: i32) -> Self {
        if let Vitals::Shark { energy, .. } = &mut self.vitals {
            *energy = current;
        }
        self
    }

    pub fn species(&self) -> Species {
        match self.vitals {
            Vitals::Fish => Species::Fish,
            Vitals::Shark { .. } => Species::Shark,
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn reproduction_period(&self) -> u32 {
        self.reproduction_period
    }

    pub fn reproduction_timer(&self) -> u32 {
        self.reproduction_timer
    }

    pub fn vitals(&self) -> Vitals {
        self.vitals
    }

    /// Current energy, `None` for fish
    pub fn energy(&self) -> Option<i32> {
        match self.vitals {
            Vitals::Fish => None,
            Vitals::Shark { energy, .. } => Some(energy),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn die(&mut self) {
        self.alive = false;
    }

    pub fn can_reproduce(&self) -> bool {
        self.reproduction_timer == 0
    }

    /// Count the reproduction timer down by one, stopping at zero
    pub fn tick_timer(&mut self) {
        self.reproduction_timer = self.reproduction_timer.saturating_sub(1);
    }

    /// Produce a newborn at the current cell and restart this entity's cycle.
    ///
    /// The newborn inherits the period and, for sharks, starts with the full
    /// initial energy.
    pub fn spawn(&mut self) -> Entity {
        self.reproduction_timer = self.reproduction_period;
        match self.vitals {
            Vitals::Fish => Entity::fish(self.position, self.reproduction_period),
            Vitals::Shark { initial_energy, .. } => {
                Entity::shark(self.position, self.reproduction_period, initial_energy)
            }
        }
    }

    /// Relocate after a successful move; a move costs one timer tick
    pub fn move_to(&mut self, position: Position) {
        self.position = position;
        self.tick_timer();
    }

    /// Spend one unit of energy. Returns what is left, `None` for fish.
    pub fn burn_energy(&mut self) -> Option<i32> {
        match &mut self.vitals {
            Vitals::Fish => None,
            Vitals::Shark { energy, .. } => {
                *energy -= 1;
                Some(*energy)
            }
        }
    }

    /// Refill a shark after a meal
    pub fn feed(&mut self) {
        if let Vitals::Shark {
            energy,
            initial_energy,
        } = &mut self.vitals
        {
            *energy = *initial_energy;
        }
    }

    pub fn is_starving(&self) -> bool {
        matches!(self.vitals, Vitals::Shark { energy, .. } if energy <= 0)
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.vitals {
            Vitals::Fish => write!(
                f,
                "Fish at {} - timer {}",
                self.position, self.reproduction_timer
            ),
            Vitals::Shark { energy, .. } => write!(
                f,
                "Shark at {} - energy {}, timer {}",
                self.position, energy, self.reproduction_timer
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_creation() {
        let fish = Entity::fish(Position::new(5, 7), 3);
        assert_eq!(fish.species(), Species::Fish);
        assert_eq!(fish.reproduction_timer(), 3);
        assert_eq!(fish.energy(), None);
        assert!(fish.is_alive());

        let shark = Entity::shark(Position::new(3, 4), 12, 6);
        assert_eq!(shark.species(), Species::Shark);
        assert_eq!(shark.energy(), Some(6));
        assert!(!shark.is_starving());
    }

    #[test]
    fn test_timer_stops_at_zero() {
        let mut fish = Entity::fish(Position::new(0, 0), 2);
        fish.tick_timer();
        fish.tick_timer();
        fish.tick_timer();
        assert_eq!(fish.reproduction_timer(), 0);
        assert!(fish.can_reproduce());
    }

    #[test]
    fn test_spawn_resets_parent_and_copies_traits() {
        let mut shark = Entity::shark(Position::new(2, 2), 10, 4)
            .with_timer(0)
            .with_energy(1);

        let baby = shark.spawn();
        assert_eq!(baby.position(), Position::new(2, 2));
        assert_eq!(baby.reproduction_timer(), 10);
        assert_eq!(baby.energy(), Some(4));
        assert_eq!(shark.reproduction_timer(), 10);
        assert_eq!(shark.energy(), Some(1));

        shark.move_to(Position::new(2, 3));
        assert_eq!(shark.reproduction_timer(), 9);
    }

    #[test]
    fn test_energy_management() {
        let mut shark = Entity::shark(Position::new(0, 0), 12, 2);
        assert_eq!(shark.burn_energy(), Some(1));
        assert_eq!(shark.burn_energy(), Some(0));
        assert!(shark.is_starving());

        shark.feed();
        assert_eq!(shark.energy(), Some(2));
        assert!(!shark.is_starving());

        let mut fish = Entity::fish(Position::new(0, 0), 5).with_energy(9);
        assert_eq!(fish.burn_energy(), None);
        assert!(!fish.is_starving());
    }

    #[test]
    fn test_entity_id_display() {
        assert_eq!(EntityId::new(4, 2).to_string(), "#4v2");
    }
}
