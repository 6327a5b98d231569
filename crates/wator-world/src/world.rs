//! The simulated planet: owns grid, registry and random source.

use crate::engine::{ChrononReport, TransitionEngine};
use crate::entity::{Entity, EntityId};
use crate::grid::Grid;
use crate::random::{seeded, RandomSource};
use crate::registry::Registry;
use crate::snapshot::GridSnapshot;
use rand_chacha::ChaCha8Rng;
use std::collections::HashSet;
use tracing::{debug, event, info, instrument, Level};
use wator_core::{Error, PopulationSample, Position, Result, SimulationConfig, Species};

pub struct World<R: RandomSource = ChaCha8Rng> {
    config: SimulationConfig,
    grid: Grid,
    registry: Registry,
    rng: R,
    chronon: u64,
    last_report: Option<ChrononReport>,
}

impl World<ChaCha8Rng> {
    /// Validate `config`, then populate a world seeded from `config.seed`
    pub fn new(config: SimulationConfig) -> Result<Self> {
        let rng = seeded(config.seed);
        Self::with_rng(config, rng)
    }
}

impl<R: RandomSource> World<R> {
    /// Like [`World::new`] with a caller-supplied random source
    pub fn with_rng(config: SimulationConfig, mut rng: R) -> Result<Self> {
        config.validate()?;

        let mut grid = Grid::new(config.world.width, config.world.height);
        let mut registry = Registry::new();

        let mut cells: Vec<Position> = grid.positions().collect();
        rng.shuffle(&mut cells);

        let fish = config.world.initial_fish();
        let sharks = config.world.initial_sharks();
        if fish + sharks > cells.len() {
            return Err(Error::config(format!(
                "{} fish and {} sharks do not fit in {} cells",
                fish,
                sharks,
                cells.len()
            )));
        }
        let (fish_cells, rest) = cells.split_at(fish);

        for &pos in fish_cells {
            let id = registry.add_fish(Entity::fish(pos, config.fish.reproduction_period))?;
            grid.place(pos, Species::Fish, id)?;
            registry.increment(Species::Fish);
        }
        for &pos in &rest[..sharks] {
            let id = registry.add_shark(Entity::shark(
                pos,
                config.shark.reproduction_period,
                config.shark.initial_energy,
            ))?;
            grid.place(pos, Species::Shark, id)?;
            registry.increment(Species::Shark);
        }

        info!(
            width = config.world.width,
            height = config.world.height,
            fish = fish,
            sharks = sharks,
            seed = config.seed,
            "World populated"
        );

        Ok(Self::assemble(config, grid, registry, rng))
    }

    /// Wrap already-consistent state and record the chronon 0 entry
    pub(crate) fn assemble(
        config: SimulationConfig,
        grid: Grid,
        mut registry: Registry,
        rng: R,
    ) -> Self {
        registry.record_chronon(0);
        Self {
            config,
            grid,
            registry,
            rng,
            chronon: 0,
            last_report: None,
        }
    }

    /// Execute exactly one chronon.
    ///
    /// Errors only when grid and registry have drifted apart; the world must
    /// not be advanced further after that. The full consistency check runs
    /// after every chronon, in release builds too.
    pub fn advance(&mut self) -> Result<()> {
        let report = TransitionEngine::new(&mut self.grid, &mut self.registry, &mut self.rng)
            .run_chronon(&mut self.chronon)?;

        self.verify_invariants()?;

        debug!(
            chronon = report.chronon,
            fish = self.fish_count(),
            sharks = self.shark_count(),
            fish_born = report.fish_born,
            sharks_born = report.sharks_born,
            fish_eaten = report.fish_eaten,
            sharks_starved = report.sharks_starved,
            skipped = report.skipped,
            "Chronon complete"
        );

        event!(
            Level::TRACE,
            gauge_name = "fish_population",
            gauge_value = self.fish_count(),
            chronon = report.chronon,
            "Fish population gauge"
        );

        event!(
            Level::TRACE,
            gauge_name = "shark_population",
            gauge_value = self.shark_count(),
            chronon = report.chronon,
            "Shark population gauge"
        );

        self.last_report = Some(report);
        Ok(())
    }

    /// Advance `chronons` times
    #[instrument(skip(self), fields(start = self.chronon))]
    pub fn run(&mut self, chronons: u64) -> Result<()> {
        for _ in 0..chronons {
            self.advance()?;
        }
        Ok(())
    }

    pub fn chronon(&self) -> u64 {
        self.chronon
    }

    pub fn width(&self) -> i32 {
        self.grid.width
    }

    pub fn height(&self) -> i32 {
        self.grid.height
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn grid_snapshot(&self) -> GridSnapshot {
        self.grid.snapshot()
    }

    pub fn fish_count(&self) -> usize {
        self.registry.fish_count()
    }

    pub fn shark_count(&self) -> usize {
        self.registry.shark_count()
    }

    /// One entry per completed chronon, plus the chronon 0 entry
    pub fn history(&self) -> &[PopulationSample] {
        self.registry.history()
    }

    pub fn last_report(&self) -> Option<&ChrononReport> {
        self.last_report.as_ref()
    }

    pub fn living_fish(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.registry.living_fish()
    }

    pub fn living_sharks(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.registry.living_sharks()
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.registry.get(id)
    }

    /// Entity standing at `pos`, if any
    pub fn entity_at(&self, pos: Position) -> Option<(EntityId, &Entity)> {
        let id = self.grid.occupant(pos).entity()?;
        self.registry.get(id).map(|entity| (id, entity))
    }

    /// The first species to die out, sharks checked first
    pub fn extinct_species(&self) -> Option<Species> {
        if self.shark_count() == 0 {
            Some(Species::Shark)
        } else if self.fish_count() == 0 {
            Some(Species::Fish)
        } else {
            None
        }
    }

    /// Whether either species has died out
    pub fn is_extinct(&self) -> bool {
        self.extinct_species().is_some()
    }

    /// Full consistency check between grid, registry and counters
    pub fn verify_invariants(&self) -> Result<()> {
        for (pos, cell) in self.grid.iter() {
            let Some(id) = cell.entity() else { continue };
            let entity = self.registry.get(id).ok_or_else(|| {
                Error::invariant(format!("cell {} references unknown entity {}", pos, id))
            })?;
            if !entity.is_alive() {
                return Err(Error::invariant(format!(
                    "cell {} references dead entity {}",
                    pos, id
                )));
            }
            if cell.species() != Some(entity.species()) {
                return Err(Error::invariant(format!(
                    "cell {} marked {:?} holds a {}",
                    pos,
                    cell,
                    entity.species()
                )));
            }
            if entity.position() != pos {
                return Err(Error::invariant(format!(
                    "{} {} stored at {} but found at {}",
                    entity.species(),
                    id,
                    entity.position(),
                    pos
                )));
            }
        }

        for species in [Species::Fish, Species::Shark] {
            let mut seen = HashSet::new();
            for id in self.registry.living(species) {
                let Some(entity) = self.registry.get(id) else {
                    return Err(Error::invariant(format!("living {} {} is missing", species, id)));
                };
                if self.grid.occupant(entity.position()).entity() != Some(id) {
                    return Err(Error::invariant(format!(
                        "living {} {} is not placed at {}",
                        species,
                        id,
                        entity.position()
                    )));
                }
                seen.insert(id);
            }
            if seen.len() != self.registry.count(species) {
                return Err(Error::invariant(format!(
                    "{} counter says {} but {} are alive",
                    species,
                    self.registry.count(species),
                    seen.len()
                )));
            }
        }

        let alive = self.registry.living_fish().count() + self.registry.living_sharks().count();
        if self.registry.len() != alive {
            return Err(Error::invariant(format!(
                "{} dead entities were not purged",
                self.registry.len() - alive
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wator_core::{Occupancy, WorldConfig};

    fn config(seed: u64) -> SimulationConfig {
        SimulationConfig {
            seed,
            world: WorldConfig {
                width: 20,
                height: 15,
                fish_fraction: 0.4,
                shark_fraction: 0.08,
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_world_creation() {
        let world = World::new(config(42)).unwrap();
        assert_eq!(world.chronon(), 0);
        assert_eq!(world.fish_count(), 120);
        assert_eq!(world.shark_count(), 24);
        assert_eq!(world.history(), &[PopulationSample::new(0, 120, 24)]);
        assert!(world.last_report().is_none());

        let snapshot = world.grid_snapshot();
        assert_eq!(snapshot.count(Occupancy::Fish), 120);
        assert_eq!(snapshot.count(Occupancy::Shark), 24);
        world.verify_invariants().unwrap();
    }

    #[test]
    fn test_invalid_config_builds_nothing() {
        let mut bad = config(1);
        bad.world.shark_fraction = 0.9;
        assert!(matches!(World::new(bad), Err(Error::Configuration(_))));
    }

    #[test]
    fn test_same_seed_same_run() {
        let mut a = World::new(config(7)).unwrap();
        let mut b = World::new(config(7)).unwrap();
        a.run(25).unwrap();
        b.run(25).unwrap();

        assert_eq!(a.history(), b.history());
        assert_eq!(a.grid_snapshot(), b.grid_snapshot());
    }

    #[test]
    fn test_history_tracks_every_chronon() {
        let mut world = World::new(config(3)).unwrap();
        for expected in 1..=30u64 {
            world.advance().unwrap();
            assert_eq!(world.chronon(), expected);
            assert_eq!(world.history().len() as u64, expected + 1);

            let last = world.history().last().unwrap();
            assert_eq!(last.chronon, expected);
            assert_eq!(last.fish, world.fish_count());
            assert_eq!(last.sharks, world.shark_count());
        }
    }

    #[test]
    fn test_population_conservation() {
        let mut world = World::new(config(11)).unwrap();
        for _ in 0..40 {
            let before = (world.fish_count(), world.shark_count());
            world.advance().unwrap();
            let report = *world.last_report().unwrap();

            assert_eq!(world.fish_count(), world.living_fish().count());
            assert_eq!(world.shark_count(), world.living_sharks().count());
            assert_eq!(
                world.fish_count(),
                before.0 + report.fish_born - report.fish_eaten
            );
            assert_eq!(
                world.shark_count(),
                before.1 + report.sharks_born - report.sharks_starved
            );
        }
    }

    #[test]
    fn test_entity_at_matches_grid() {
        let world = World::new(config(5)).unwrap();
        let id = world.living_sharks().next().unwrap();
        let pos = world.entity(id).unwrap().position();

        let (found, entity) = world.entity_at(pos).unwrap();
        assert_eq!(found, id);
        assert_eq!(entity.species(), Species::Shark);
    }

    #[test]
    fn test_advance_reports_counter_drift() {
        let mut world = crate::builder::WorldBuilder::new(config(1))
            .fish(Position::new(3, 3))
            .build()
            .unwrap();
        world.registry.increment(Species::Fish);

        let result = world.advance();
        assert!(matches!(result, Err(Error::InvariantViolation(_))));
    }

    #[test]
    fn test_extinction_detection() {
        let mut cfg = config(2);
        cfg.world.shark_fraction = 0.0;
        let world = World::new(cfg).unwrap();
        assert_eq!(world.extinct_species(), Some(Species::Shark));
        assert!(world.is_extinct());

        let world = World::new(config(2)).unwrap();
        assert_eq!(world.extinct_species(), None);
        assert!(!world.is_extinct());
    }
}
