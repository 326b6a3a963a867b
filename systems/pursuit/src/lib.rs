#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that decides where every pursuer heads next.
//!
//! The system never touches the world directly. Callers hand it a
//! [`PursuitView`] built from read-only queries and feed the returned
//! directions back through `Command::StepPursuers`.

mod chase;
mod random_walk;
mod search;

use maze_chase_core::{Coordinate, Direction, Grid, PursuerSnapshot, TileKind};
use serde::{Deserialize, Serialize};

pub use chase::{target_corners, PursuerMode, ShortestPathChase};
pub use random_walk::{direction_weights, pick, WeightedRandomWalk};
pub use search::{first_step, PathSearch, RouteCache};

/// Default number of memoised `(start, target)` routes.
pub const DEFAULT_ROUTE_CACHE_CAPACITY: usize = 4096;

/// Read-only inputs a strategy needs for one tick.
#[derive(Clone, Copy, Debug)]
pub struct PursuitView<'a> {
    /// Visible board tiles; only walls block movement.
    pub tiles: &'a Grid<TileKind>,
    /// Current player cell.
    pub player: Coordinate,
    /// Pursuers in their fixed order.
    pub pursuers: &'a [PursuerSnapshot],
}

impl<'a> PursuitView<'a> {
    /// Bundles the borrowed board, player and pursuers.
    #[must_use]
    pub const fn new(
        tiles: &'a Grid<TileKind>,
        player: Coordinate,
        pursuers: &'a [PursuerSnapshot],
    ) -> Self {
        Self {
            tiles,
            player,
            pursuers,
        }
    }
}

/// Pursuer behaviour selected once per session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// Scatter to a corner, then follow shortest paths to the player.
    #[default]
    ShortestPathChase,
    /// Wander with momentum-weighted random choices.
    WeightedRandomWalk,
}

/// Construction parameters for [`Pursuit`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    kind: StrategyKind,
    seed: u64,
    route_cache_capacity: usize,
}

impl Config {
    /// Creates a configuration for the given strategy and random seed.
    #[must_use]
    pub const fn new(kind: StrategyKind, seed: u64) -> Self {
        Self {
            kind,
            seed,
            route_cache_capacity: DEFAULT_ROUTE_CACHE_CAPACITY,
        }
    }

    /// Overrides the route cache bound.
    #[must_use]
    pub const fn with_route_cache_capacity(mut self, capacity: usize) -> Self {
        self.route_cache_capacity = capacity;
        self
    }

    /// Selected strategy.
    #[must_use]
    pub const fn kind(&self) -> StrategyKind {
        self.kind
    }

    /// Seed of the random stream.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Route cache bound.
    #[must_use]
    pub const fn route_cache_capacity(&self) -> usize {
        self.route_cache_capacity
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(StrategyKind::default(), 0)
    }
}

/// Stateful pursuer strategy.
#[derive(Debug)]
pub enum Pursuit {
    /// See [`ShortestPathChase`].
    ShortestPathChase(ShortestPathChase),
    /// See [`WeightedRandomWalk`].
    WeightedRandomWalk(WeightedRandomWalk),
}

impl Pursuit {
    /// Builds fresh strategy state: every pursuer scattering, empty caches
    /// and a freshly seeded random stream.
    #[must_use]
    pub fn new(config: Config) -> Self {
        match config.kind {
            StrategyKind::ShortestPathChase => {
                Self::ShortestPathChase(ShortestPathChase::new(config.route_cache_capacity))
            }
            StrategyKind::WeightedRandomWalk => {
                Self::WeightedRandomWalk(WeightedRandomWalk::new(config.seed))
            }
        }
    }

    /// Strategy this state belongs to.
    #[must_use]
    pub fn kind(&self) -> StrategyKind {
        match self {
            Self::ShortestPathChase(_) => StrategyKind::ShortestPathChase,
            Self::WeightedRandomWalk(_) => StrategyKind::WeightedRandomWalk,
        }
    }

    /// Exactly one direction per pursuer, in pursuer order.
    pub fn next_moves(&mut self, view: &PursuitView<'_>) -> Vec<Direction> {
        match self {
            Self::ShortestPathChase(chase) => chase.next_moves(view),
            Self::WeightedRandomWalk(walk) => walk.next_moves(view),
        }
    }
}

pub(crate) fn is_open(tiles: &Grid<TileKind>, cell: Coordinate) -> bool {
    tiles.get(cell).is_some_and(|tile| *tile != TileKind::Wall)
}
