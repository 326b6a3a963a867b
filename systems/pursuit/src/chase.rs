//! Scatter-then-chase pursuit driven by shortest paths.

use maze_chase_core::{Coordinate, Direction, Grid, TileKind};
use tracing::debug;

use crate::{
    search::{PathSearch, RouteCache},
    PursuitView,
};

/// Behavioural state of a single pursuer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PursuerMode {
    /// Heading for the pursuer's assigned corner.
    #[default]
    Scatter,
    /// Heading for the player. Never left once entered.
    Chase,
}

/// Moves every pursuer one hop along a shortest path, first to its corner
/// and then toward the player.
#[derive(Debug)]
pub struct ShortestPathChase {
    modes: Vec<PursuerMode>,
    corners: Option<[Coordinate; 4]>,
    routes: RouteCache,
    search: PathSearch,
}

impl ShortestPathChase {
    /// Creates the strategy with every pursuer scattering and an empty
    /// route cache bounded to `route_cache_capacity` entries.
    #[must_use]
    pub fn new(route_cache_capacity: usize) -> Self {
        Self {
            modes: Vec::new(),
            corners: None,
            routes: RouteCache::new(route_cache_capacity),
            search: PathSearch::default(),
        }
    }

    /// Mode of the pursuer at `index`.
    #[must_use]
    pub fn mode(&self, index: usize) -> PursuerMode {
        self.modes.get(index).copied().unwrap_or_default()
    }

    /// Corner targets, known once the first moves were computed.
    #[must_use]
    pub fn corners(&self) -> Option<[Coordinate; 4]> {
        self.corners
    }

    /// Number of memoised routes.
    #[must_use]
    pub fn cached_routes(&self) -> usize {
        self.routes.len()
    }

    /// Forgets every memoised route.
    pub fn clear_cache(&mut self) {
        self.routes.clear();
    }

    /// First hop from `start` toward `target`, served from the cache when
    /// the pair was seen before.
    pub fn route(
        &mut self,
        tiles: &Grid<TileKind>,
        start: Coordinate,
        target: Coordinate,
    ) -> Direction {
        if let Some(direction) = self.routes.get(start, target) {
            return direction;
        }
        let direction = self.search.first_step(tiles, start, target);
        self.routes.insert(start, target, direction);
        direction
    }

    /// Computes one direction per pursuer, in pursuer order.
    pub fn next_moves(&mut self, view: &PursuitView<'_>) -> Vec<Direction> {
        let corners = *self
            .corners
            .get_or_insert_with(|| target_corners(view.tiles));
        if self.modes.len() < view.pursuers.len() {
            self.modes.resize(view.pursuers.len(), PursuerMode::Scatter);
        }

        let mut moves = Vec::with_capacity(view.pursuers.len());
        for (index, pursuer) in view.pursuers.iter().enumerate() {
            let mode = self.modes[index];
            let direction = match mode {
                PursuerMode::Scatter => {
                    let corner = corners[index % corners.len()];
                    let direction = self.route(view.tiles, pursuer.position, corner);
                    if !direction.is_none() && pursuer.position.step(direction) == corner {
                        self.modes[index] = PursuerMode::Chase;
                        debug!(pursuer = ?pursuer.name, %corner, "corner reached, chasing");
                    }
                    direction
                }
                PursuerMode::Chase => self.route(view.tiles, pursuer.position, view.player),
            };
            moves.push(direction);
        }
        moves
    }
}

/// Cells one step in from each board corner: top-left, top-right,
/// bottom-left, bottom-right.
#[must_use]
pub fn target_corners(tiles: &Grid<TileKind>) -> [Coordinate; 4] {
    let right = i32::try_from(tiles.width()).unwrap_or(i32::MAX) - 2;
    let bottom = i32::try_from(tiles.height()).unwrap_or(i32::MAX) - 2;
    [
        Coordinate::new(1, 1),
        Coordinate::new(right, 1),
        Coordinate::new(1, bottom),
        Coordinate::new(right, bottom),
    ]
}
