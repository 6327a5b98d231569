//! Lock-protected world for frontends that read while another thread advances.

use crate::random::RandomSource;
use crate::snapshot::GridSnapshot;
use crate::world::World;
use parking_lot::RwLock;
use rand_chacha::ChaCha8Rng;
use std::sync::Arc;
use wator_core::{PopulationSample, Result};

/// Single writer, many readers.
///
/// Every accessor takes the lock once, so the values it returns always belong
/// to the same chronon.
pub struct SharedWorld<R: RandomSource = ChaCha8Rng> {
    inner: Arc<RwLock<World<R>>>,
}

impl<R: RandomSource> Clone for SharedWorld<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

/// Everything a viewer needs for one frame
#[derive(Debug, Clone)]
pub struct Frame {
    pub chronon: u64,
    pub fish: usize,
    pub sharks: usize,
    pub grid: GridSnapshot,
}

impl<R: RandomSource> SharedWorld<R> {
    pub fn new(world: World<R>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(world)),
        }
    }

    pub fn advance(&self) -> Result<()> {
        self.inner.write().advance()
    }

    pub fn run(&self, chronons: u64) -> Result<()> {
        for _ in 0..chronons {
            self.advance()?;
        }
        Ok(())
    }

    /// Run `f` against the world under a read lock
    pub fn read<T>(&self, f: impl FnOnce(&World<R>) -> T) -> T {
        f(&self.inner.read())
    }

    pub fn frame(&self) -> Frame {
        self.read(|world| Frame {
            chronon: world.chronon(),
            fish: world.fish_count(),
            sharks: world.shark_count(),
            grid: world.grid_snapshot(),
        })
    }

    pub fn chronon(&self) -> u64 {
        self.read(|world| world.chronon())
    }

    pub fn history(&self) -> Vec<PopulationSample> {
        self.read(|world| world.history().to_vec())
    }

    /// Take the world back once every other handle is gone
    pub fn into_inner(self) -> Option<World<R>> {
        Arc::try_unwrap(self.inner).ok().map(RwLock::into_inner)
    }
}
