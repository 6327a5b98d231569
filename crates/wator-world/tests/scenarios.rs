use wator_core::{FishConfig, Occupancy, Position, SharkConfig, SimulationConfig, Species, WorldConfig};
use wator_world::{ScriptedRandom, World, WorldBuilder};

fn config(width: i32, height: i32, fish_period: u32, shark_period: u32, energy: i32) -> SimulationConfig {
    SimulationConfig {
        chronons: 1,
        seed: 0,
        world: WorldConfig {
            width,
            height,
            fish_fraction: 0.0,
            shark_fraction: 0.0,
        },
        fish: FishConfig {
            reproduction_period: fish_period,
        },
        shark: SharkConfig {
            reproduction_period: shark_period,
            initial_energy: energy,
        },
    }
}

fn scripted(config: SimulationConfig) -> WorldBuilder<ScriptedRandom> {
    WorldBuilder::new(config).with_rng(ScriptedRandom::first_choice())
}

#[test]
fn test_three_by_three_chronon() {
    let mut world = scripted(config(3, 3, 5, 10, 3))
        .fish_with_timer(Position::new(1, 1), 0)
        .shark_with(Position::new(0, 0), 3, 10)
        .build()
        .unwrap();

    world.advance().unwrap();

    // Shark acts first, has no adjacent prey and swims west across the edge
    let (_, shark) = world.entity_at(Position::new(2, 0)).unwrap();
    assert_eq!(shark.species(), Species::Shark);
    assert_eq!(shark.energy(), Some(2));
    assert_eq!(shark.reproduction_timer(), 9);

    // Fish spawns in place, then moves west with a fresh timer
    let (_, baby) = world.entity_at(Position::new(1, 1)).unwrap();
    assert_eq!(baby.species(), Species::Fish);
    assert_eq!(baby.reproduction_timer(), 5);

    let (_, parent) = world.entity_at(Position::new(0, 1)).unwrap();
    assert_eq!(parent.species(), Species::Fish);
    assert_eq!(parent.reproduction_timer(), 4);

    assert_eq!(world.fish_count(), 2);
    assert_eq!(world.shark_count(), 1);
    assert_eq!(world.chronon(), 1);
    assert!(world.verify_invariants().is_ok());
}

#[test]
fn test_fish_wraps_around_the_edge() {
    let mut world = scripted(config(4, 4, 8, 12, 5))
        .fish(Position::new(0, 0))
        .build()
        .unwrap();

    world.advance().unwrap();

    let snapshot = world.grid_snapshot();
    assert_eq!(snapshot.get(Position::new(3, 0)), Occupancy::Fish);
    assert_eq!(snapshot.get(Position::new(0, 0)), Occupancy::Empty);
}

#[test]
fn test_shark_starves_after_last_move() {
    let mut world = scripted(config(3, 3, 8, 10, 3))
        .shark_with(Position::new(1, 1), 1, 10)
        .build()
        .unwrap();

    world.advance().unwrap();

    assert_eq!(world.shark_count(), 0);
    assert_eq!(world.grid_snapshot().count(Occupancy::Empty), 9);
    assert_eq!(world.last_report().unwrap().sharks_starved, 1);
    assert_eq!(world.extinct_species(), Some(Species::Shark));
}

#[test]
fn test_shark_prefers_prey_over_water() {
    let mut world = scripted(config(5, 5, 8, 12, 4))
        .fish(Position::new(2, 1))
        .shark_with(Position::new(1, 1), 2, 12)
        .build()
        .unwrap();

    world.advance().unwrap();

    let (_, shark) = world.entity_at(Position::new(2, 1)).unwrap();
    assert_eq!(shark.species(), Species::Shark);
    assert_eq!(shark.energy(), Some(4));
    assert_eq!(world.fish_count(), 0);

    let report = world.last_report().unwrap();
    assert_eq!(report.fish_eaten, 1);
    assert_eq!(report.skipped, 1);
}

#[test]
fn test_shark_reproduces_when_timer_expires() {
    let mut world = scripted(config(5, 5, 8, 6, 5))
        .shark_with(Position::new(2, 2), 3, 0)
        .build()
        .unwrap();

    world.advance().unwrap();

    assert_eq!(world.shark_count(), 2);

    let (_, baby) = world.entity_at(Position::new(2, 2)).unwrap();
    assert_eq!(baby.energy(), Some(5));
    assert_eq!(baby.reproduction_timer(), 6);

    let (_, parent) = world.entity_at(Position::new(1, 2)).unwrap();
    assert_eq!(parent.energy(), Some(2));
    assert_eq!(parent.reproduction_timer(), 5);
}

#[test]
fn test_history_tracks_every_chronon() {
    let mut world = World::new(SimulationConfig {
        seed: 99,
        world: WorldConfig {
            width: 20,
            height: 20,
            fish_fraction: 0.25,
            shark_fraction: 0.05,
        },
        ..Default::default()
    })
    .unwrap();

    world.run(25).unwrap();

    let history = world.history();
    assert_eq!(history.len(), 26);
    assert_eq!(history[0].fish, 100);
    assert_eq!(history[0].sharks, 20);
    for (chronon, sample) in history.iter().enumerate() {
        assert_eq!(sample.chronon, chronon as u64);
    }
    let last = history.last().unwrap();
    assert_eq!(last.fish, world.fish_count());
    assert_eq!(last.sharks, world.shark_count());
}

#[test]
fn test_surrounded_shark_starves_in_place() {
    // Full 3x3 of sharks: nobody can move. The starving one is registered
    // first, so the scripted shuffle activates it last.
    let mut builder = scripted(config(3, 3, 8, 10, 5)).shark_with(Position::new(1, 1), 1, 10);
    for y in 0..3 {
        for x in 0..3 {
            if (x, y) != (1, 1) {
                builder = builder.shark_with(Position::new(x, y), 5, 7);
            }
        }
    }
    let mut world = builder.build().unwrap();

    world.advance().unwrap();

    assert_eq!(world.shark_count(), 8);
    assert!(world.entity_at(Position::new(1, 1)).is_none());
    assert_eq!(world.grid_snapshot().get(Position::new(1, 1)), Occupancy::Empty);

    let report = world.last_report().unwrap();
    assert_eq!(report.sharks_starved, 1);
    assert_eq!(report.blocked, 9);

    let (_, neighbor) = world.entity_at(Position::new(1, 0)).unwrap();
    assert_eq!(neighbor.energy(), Some(4));
    assert_eq!(neighbor.reproduction_timer(), 7);
    assert!(world.verify_invariants().is_ok());
}
