//! Per-chronon transition engine.
//!
//! One call to [`TransitionEngine::run_chronon`] activates every entity that was
//! alive when the chronon started, in a shuffled order, and applies the fish and
//! shark policies one entity at a time. Grid cells are updated immediately, so
//! later activations see the effects of earlier ones.

use crate::entity::{Entity, EntityId};
use crate::grid::{Cell, Grid};
use crate::random::RandomSource;
use crate::registry::Registry;
use serde::{Deserialize, Serialize};
use tracing::trace;
use wator_core::{Error, Position, Result, Species};

/// What happened during one chronon
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChrononReport {
    /// Index of the chronon once it completed
    pub chronon: u64,
    /// Entities in the activation list
    pub activations: usize,
    /// Activations skipped because the entity died earlier in the chronon
    pub skipped: usize,
    pub fish_born: usize,
    pub sharks_born: usize,
    pub fish_eaten: usize,
    pub sharks_starved: usize,
    /// Entities with nowhere to go that stayed in place
    pub blocked: usize,
    /// Dead entities swept from the registry at the end
    pub purged: usize,
}

/// Where a shark goes after choosing its action
#[derive(Debug, Clone, Copy)]
enum SharkMove {
    Hunt(Position),
    Swim(Position),
}

impl SharkMove {
    fn destination(&self) -> Position {
        match self {
            SharkMove::Hunt(pos) | SharkMove::Swim(pos) => *pos,
        }
    }
}

/// Exclusive borrow of a world's state for the duration of one chronon
pub struct TransitionEngine<'w, R: RandomSource> {
    grid: &'w mut Grid,
    registry: &'w mut Registry,
    rng: &'w mut R,
    report: ChrononReport,
}

impl<'w, R: RandomSource> TransitionEngine<'w, R> {
    pub fn new(grid: &'w mut Grid, registry: &'w mut Registry, rng: &'w mut R) -> Self {
        Self {
            grid,
            registry,
            rng,
            report: ChrononReport::default(),
        }
    }

    /// Advance `chronon` by one and append exactly one history entry
    pub fn run_chronon(mut self, chronon: &mut u64) -> Result<ChrononReport> {
        let mut activation: Vec<EntityId> = self
            .registry
            .living_fish()
            .chain(self.registry.living_sharks())
            .collect();
        self.rng.shuffle(&mut activation);
        self.report.activations = activation.len();

        for id in activation {
            let species = match self.registry.get(id) {
                Some(entity) if entity.is_alive() => entity.species(),
                _ => {
                    self.report.skipped += 1;
                    continue;
                }
            };

            match species {
                Species::Fish => self.act_fish(id)?,
                Species::Shark => self.act_shark(id)?,
            }
        }

        self.report.purged = self.registry.purge_dead();
        *chronon += 1;
        self.registry.record_chronon(*chronon);
        self.report.chronon = *chronon;

        Ok(self.report)
    }

    fn act_fish(&mut self, id: EntityId) -> Result<()> {
        let origin = self.located(id)?;
        let free = self.grid.empty_neighbors(origin);

        if free.is_empty() {
            self.entity_mut(id)?.tick_timer();
            self.report.blocked += 1;
            return Ok(());
        }

        let destination = free[self.rng.pick(free.len())];
        self.leave(id, origin)?;
        self.entity_mut(id)?.move_to(destination);
        self.grid.place(destination, Species::Fish, id)
    }

    fn act_shark(&mut self, id: EntityId) -> Result<()> {
        let origin = self.located(id)?;

        let action = match self.choose_shark_move(origin) {
            Some(action) => action,
            None => return self.starve_in_place(id, origin),
        };

        match action {
            SharkMove::Hunt(target) => {
                self.eat(target)?;
                self.entity_mut(id)?.feed();
            }
            SharkMove::Swim(_) => {
                self.entity_mut(id)?.burn_energy();
            }
        }

        let destination = action.destination();
        self.leave(id, origin)?;

        let shark = self.entity_mut(id)?;
        shark.move_to(destination);
        if shark.is_starving() {
            shark.die();
            self.registry.decrement(Species::Shark)?;
            self.report.sharks_starved += 1;
            trace!(shark = %id, position = %destination, "Shark starved after moving");
            return Ok(());
        }

        self.grid.place(destination, Species::Shark, id)
    }

    /// Prey first, then open water; `None` when boxed in
    fn choose_shark_move(&mut self, origin: Position) -> Option<SharkMove> {
        let prey = self.grid.fish_neighbors(origin);
        if !prey.is_empty() {
            return Some(SharkMove::Hunt(prey[self.rng.pick(prey.len())]));
        }

        let free = self.grid.empty_neighbors(origin);
        if !free.is_empty() {
            return Some(SharkMove::Swim(free[self.rng.pick(free.len())]));
        }

        None
    }

    fn starve_in_place(&mut self, id: EntityId, origin: Position) -> Result<()> {
        self.report.blocked += 1;
        let shark = self.entity_mut(id)?;
        shark.burn_energy();
        if shark.is_starving() {
            shark.die();
            self.grid.clear(origin);
            self.registry.decrement(Species::Shark)?;
            self.report.sharks_starved += 1;
            trace!(shark = %id, position = %origin, "Blocked shark starved");
        }
        Ok(())
    }

    fn eat(&mut self, target: Position) -> Result<()> {
        let fish_id = match self.grid.occupant(target) {
            Cell::Fish(fish_id) => fish_id,
            other => {
                return Err(Error::invariant(format!(
                    "prey cell {} holds {:?} instead of a fish",
                    target, other
                )))
            }
        };

        let fish = self.entity_mut(fish_id)?;
        if !fish.is_alive() {
            return Err(Error::invariant(format!(
                "grid still references dead fish {} at {}",
                fish_id, target
            )));
        }
        fish.die();
        self.grid.clear(target);
        self.registry.decrement(Species::Fish)?;
        self.report.fish_eaten += 1;
        trace!(fish = %fish_id, position = %target, "Fish eaten");
        Ok(())
    }

    /// Vacate `origin`, leaving a newborn behind when the timer has run out
    fn leave(&mut self, id: EntityId, origin: Position) -> Result<()> {
        self.grid.clear(origin);

        let parent = self.entity_mut(id)?;
        if !parent.can_reproduce() {
            return Ok(());
        }

        let baby: Entity = parent.spawn();
        let species = baby.species();
        let baby_id = self.registry.add(baby);
        self.grid.place(origin, species, baby_id)?;
        self.registry.increment(species);

        match species {
            Species::Fish => self.report.fish_born += 1,
            Species::Shark => self.report.sharks_born += 1,
        }
        trace!(parent = %id, baby = %baby_id, %species, position = %origin, "Entity reproduced");
        Ok(())
    }

    /// Current position of `id`, checked against the grid
    fn located(&self, id: EntityId) -> Result<Position> {
        let entity = self
            .registry
            .get(id)
            .ok_or_else(|| Error::invariant(format!("unknown entity {}", id)))?;
        let position = entity.position();

        if self.grid.occupant(position).entity() != Some(id) {
            return Err(Error::invariant(format!(
                "{} {} believes it is at {} but the grid holds {:?}",
                entity.species(),
                id,
                position,
                self.grid.occupant(position)
            )));
        }
        Ok(position)
    }

    fn entity_mut(&mut self, id: EntityId) -> Result<&mut Entity> {
        self.registry
            .get_mut(id)
            .ok_or_else(|| Error::invariant(format!("unknown entity {}", id)))
    }
}
