//! Wa-Tor simulation engine.
//!
//! Fish and sharks share a toroidal grid. Each call to [`World::advance`] runs
//! one chronon: every entity alive at its start acts once, in a shuffled order,
//! moving, eating, breeding or starving according to its species.

pub mod builder;
pub mod engine;
pub mod entity;
pub mod export;
pub mod grid;
pub mod random;
pub mod registry;
pub mod shared;
pub mod snapshot;
pub mod world;

pub use builder::WorldBuilder;
pub use engine::{ChrononReport, TransitionEngine};
pub use entity::{Entity, EntityId, Vitals};
pub use grid::{Cell, Grid};
pub use random::{seeded, RandomSource, ScriptedRandom};
pub use registry::Registry;
pub use shared::{Frame, SharedWorld};
pub use snapshot::GridSnapshot;
pub use world::World;
