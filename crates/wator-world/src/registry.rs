//! Population registry: entity storage, live sets, counters and history.

use crate::entity::{Entity, EntityId};
use wator_core::{Error, PopulationSample, Result, Species};

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    entity: Option<Entity>,
}

/// Owns every entity of a world.
///
/// The counters are bookkeeping written by the transition engine; the registry
/// only refuses to take them below zero.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    slots: Vec<Slot>,
    free: Vec<u32>,
    fish: Vec<EntityId>,
    sharks: Vec<EntityId>,
    fish_count: usize,
    shark_count: usize,
    history: Vec<PopulationSample>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_fish(&mut self, entity: Entity) -> Result<EntityId> {
        self.add_as(Species::Fish, entity)
    }

    pub fn add_shark(&mut self, entity: Entity) -> Result<EntityId> {
        self.add_as(Species::Shark, entity)
    }

    /// Store an entity in its species' live set under a fresh id
    pub fn add(&mut self, entity: Entity) -> EntityId {
        let species = entity.species();
        let id = self.insert(entity);
        match species {
            Species::Fish => self.fish.push(id),
            Species::Shark => self.sharks.push(id),
        }
        id
    }

    fn add_as(&mut self, species: Species, entity: Entity) -> Result<EntityId> {
        if entity.species() != species {
            return Err(Error::invariant(format!(
                "{} registered as {}",
                entity.species(),
                species
            )));
        }
        Ok(self.add(entity))
    }

    fn insert(&mut self, entity: Entity) -> EntityId {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.entity = Some(entity);
            EntityId::new(index, slot.generation)
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(Slot {
                generation: 0,
                entity: Some(entity),
            });
            EntityId::new(index, 0)
        }
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.slots
            .get(id.index())
            .filter(|slot| slot.generation == id.generation())
            .and_then(|slot| slot.entity.as_ref())
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.slots
            .get_mut(id.index())
            .filter(|slot| slot.generation == id.generation())
            .and_then(|slot| slot.entity.as_mut())
    }

    pub fn is_alive(&self, id: EntityId) -> bool {
        self.get(id).is_some_and(Entity::is_alive)
    }

    /// Ids of fish that are alive right now, in insertion order
    pub fn living_fish(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.fish.iter().copied().filter(|&id| self.is_alive(id))
    }

    /// Ids of sharks that are alive right now, in insertion order
    pub fn living_sharks(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.sharks.iter().copied().filter(|&id| self.is_alive(id))
    }

    pub fn living(&self, species: Species) -> Box<dyn Iterator<Item = EntityId> + '_> {
        match species {
            Species::Fish => Box::new(self.living_fish()),
            Species::Shark => Box::new(self.living_sharks()),
        }
    }

    pub fn fish_count(&self) -> usize {
        self.fish_count
    }

    pub fn shark_count(&self) -> usize {
        self.shark_count
    }

    pub fn count(&self, species: Species) -> usize {
        match species {
            Species::Fish => self.fish_count,
            Species::Shark => self.shark_count,
        }
    }

    pub fn increment(&mut self, species: Species) {
        *self.counter_mut(species) += 1;
    }

    pub fn decrement(&mut self, species: Species) -> Result<()> {
        let counter = self.counter_mut(species);
        *counter = counter
            .checked_sub(1)
            .ok_or_else(|| Error::invariant(format!("{} population would drop below zero", species)))?;
        Ok(())
    }

    fn counter_mut(&mut self, species: Species) -> &mut usize {
        match species {
            Species::Fish => &mut self.fish_count,
            Species::Shark => &mut self.shark_count,
        }
    }

    /// Append the current counts to the history
    pub fn record_chronon(&mut self, chronon: u64) -> PopulationSample {
        let sample = PopulationSample::new(chronon, self.fish_count, self.shark_count);
        self.history.push(sample);
        sample
    }

    pub fn history(&self) -> &[PopulationSample] {
        &self.history
    }

    /// Drop dead entities and recycle their slots. Returns how many were removed.
    pub fn purge_dead(&mut self) -> usize {
        let mut removed = 0;
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.entity.as_ref().is_some_and(|e| !e.is_alive()) {
                slot.entity = None;
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(index as u32);
                removed += 1;
            }
        }

        if removed > 0 {
            let slots = &self.slots;
            let alive = |id: &EntityId| {
                let slot = &slots[id.index()];
                slot.generation == id.generation() && slot.entity.is_some()
            };
            self.fish.retain(alive);
            self.sharks.retain(alive);
        }

        removed
    }

    /// Entities currently stored, dead ones included until the next purge
    pub fn len(&self) -> usize {
        self.fish.len() + self.sharks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
