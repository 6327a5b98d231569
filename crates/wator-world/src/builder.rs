//! Hand-laid worlds for scenarios and tests.

use crate::entity::{Entity, Vitals};
use crate::grid::Grid;
use crate::random::{seeded, RandomSource};
use crate::registry::Registry;
use crate::world::World;
use rand_chacha::ChaCha8Rng;
use wator_core::{Error, Position, Result, SimulationConfig};

/// Places entities at explicit cells instead of the random initial layout.
///
/// Geometry and species parameters come from the configuration; its initial
/// fractions are ignored.
pub struct WorldBuilder<R: RandomSource = ChaCha8Rng> {
    config: SimulationConfig,
    rng: R,
    entities: Vec<Entity>,
}

impl WorldBuilder<ChaCha8Rng> {
    pub fn new(config: SimulationConfig) -> Self {
        let rng = seeded(config.seed);
        Self {
            config,
            rng,
            entities: Vec::new(),
        }
    }
}

impl<R: RandomSource> WorldBuilder<R> {
    /// Swap in another random source, e.g. a scripted one
    pub fn with_rng<R2: RandomSource>(self, rng: R2) -> WorldBuilder<R2> {
        WorldBuilder {
            config: self.config,
            rng,
            entities: self.entities,
        }
    }

    /// A fish with a full reproduction timer
    pub fn fish(self, pos: Position) -> Self {
        let period = self.config.fish.reproduction_period;
        self.entity(Entity::fish(pos, period))
    }

    pub fn fish_with_timer(self, pos: Position, timer: u32) -> Self {
        let period = self.config.fish.reproduction_period;
        self.entity(Entity::fish(pos, period).with_timer(timer))
    }

    /// A shark with full energy and a full reproduction timer
    pub fn shark(self, pos: Position) -> Self {
        let shark = &self.config.shark;
        let entity = Entity::shark(pos, shark.reproduction_period, shark.initial_energy);
        self.entity(entity)
    }

    pub fn shark_with(self, pos: Position, energy: i32, timer: u32) -> Self {
        let shark = &self.config.shark;
        let entity = Entity::shark(pos, shark.reproduction_period, shark.initial_energy)
            .with_energy(energy)
            .with_timer(timer);
        self.entity(entity)
    }

    /// Add a fully specified entity
    pub fn entity(mut self, entity: Entity) -> Self {
        self.entities.push(entity);
        self
    }

    pub fn build(self) -> Result<World<R>> {
        self.config.world.validate()?;
        self.config.fish.validate()?;
        self.config.shark.validate()?;

        let mut grid = Grid::new(self.config.world.width, self.config.world.height);
        let mut registry = Registry::new();

        for entity in self.entities {
            let pos = entity.position();
            let species = entity.species();

            if !grid.contains(pos) {
                return Err(Error::config(format!(
                    "{} at {} lies outside the {}x{} grid",
                    species, pos, grid.width, grid.height
                )));
            }
            if !grid.occupant(pos).is_empty() {
                return Err(Error::config(format!("two entities placed at {}", pos)));
            }
            check_vitals(&entity)?;

            let id = registry.add(entity);
            grid.place(pos, species, id)?;
            registry.increment(species);
        }

        Ok(World::assemble(self.config, grid, registry, self.rng))
    }
}

/// Reject life-cycle parameters the transition rules cannot work with
fn check_vitals(entity: &Entity) -> Result<()> {
    let pos = entity.position();
    let species = entity.species();

    if entity.reproduction_period() == 0 {
        return Err(Error::config(format!(
            "{} at {} has a zero reproduction period",
            species, pos
        )));
    }
    if entity.reproduction_timer() > entity.reproduction_period() {
        return Err(Error::config(format!(
            "{} at {} has timer {} above its period {}",
            species,
            pos,
            entity.reproduction_timer(),
            entity.reproduction_period()
        )));
    }
    if let Vitals::Shark { initial_energy, .. } = entity.vitals() {
        if initial_energy <= 0 {
            return Err(Error::config(format!(
                "shark at {} has initial energy {}",
                pos, initial_energy
            )));
        }
    }
    if entity.is_starving() {
        return Err(Error::config(format!("shark at {} starts with no energy", pos)));
    }
    Ok(())
}
