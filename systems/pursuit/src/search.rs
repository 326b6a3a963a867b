//! Breadth-first first-hop search and the bounded route cache.

use std::collections::{HashMap, VecDeque};

use maze_chase_core::{Coordinate, Direction, Grid, TileKind};

use crate::is_open;

const UNVISITED: usize = usize::MAX;

/// Neighbour expansion order; decides ties between equal-length paths.
const SEARCH_ORDER: [Direction; 4] = [
    Direction::Left,
    Direction::Right,
    Direction::Up,
    Direction::Down,
];

/// Finds the first hop of a shortest path between two cells.
///
/// Allocates fresh scratch space; repeated callers should keep a
/// [`PathSearch`] around instead.
#[must_use]
pub fn first_step(tiles: &Grid<TileKind>, start: Coordinate, target: Coordinate) -> Direction {
    PathSearch::default().first_step(tiles, start, target)
}

/// Reusable breadth-first search over the non-wall cells of a board.
#[derive(Debug, Default)]
pub struct PathSearch {
    parents: Vec<usize>,
    frontier: VecDeque<Coordinate>,
}

impl PathSearch {
    /// Direction of the first hop from `start` along a shortest path to `target`.
    ///
    /// Each cell is visited at most once and keeps a single parent pointer;
    /// the search stops as soon as the target is dequeued and only the hop
    /// leaving `start` is reconstructed. Returns `Direction::None` when the
    /// target is unreachable or equal to `start`.
    pub fn first_step(
        &mut self,
        tiles: &Grid<TileKind>,
        start: Coordinate,
        target: Coordinate,
    ) -> Direction {
        let Some(start_index) = tiles.index_of(start) else {
            return Direction::None;
        };
        if start == target {
            return Direction::None;
        }

        self.parents.clear();
        self.parents.resize(tiles.width() * tiles.height(), UNVISITED);
        self.frontier.clear();

        self.parents[start_index] = start_index;
        self.frontier.push_back(start);

        while let Some(cell) = self.frontier.pop_front() {
            let Some(cell_index) = tiles.index_of(cell) else {
                continue;
            };

            if cell == target {
                let mut current = cell_index;
                while self.parents[current] != start_index {
                    current = self.parents[current];
                }
                return tiles
                    .coordinate_of(current)
                    .map_or(Direction::None, |hop| start.direction_to(hop));
            }

            for direction in SEARCH_ORDER {
                let neighbor = cell.step(direction);
                if !is_open(tiles, neighbor) {
                    continue;
                }
                let Some(neighbor_index) = tiles.index_of(neighbor) else {
                    continue;
                };
                if self.parents[neighbor_index] != UNVISITED {
                    continue;
                }
                self.parents[neighbor_index] = cell_index;
                self.frontier.push_back(neighbor);
            }
        }

        Direction::None
    }
}

/// First hops memoised by `(start, target)`.
///
/// Walls never move within a session, so a stored hop stays correct for the
/// whole session. Once `capacity` routes are stored the oldest one is
/// evicted to make room.
#[derive(Debug)]
pub struct RouteCache {
    capacity: usize,
    routes: HashMap<(Coordinate, Coordinate), Direction>,
    order: VecDeque<(Coordinate, Coordinate)>,
}

impl RouteCache {
    /// Creates an empty cache holding at most `capacity` routes.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            routes: HashMap::new(),
            order: VecDeque::new(),
        }
    }

    /// Stored first hop for the pair, if any.
    #[must_use]
    pub fn get(&self, start: Coordinate, target: Coordinate) -> Option<Direction> {
        self.routes.get(&(start, target)).copied()
    }

    /// Records the first hop for the pair.
    pub fn insert(&mut self, start: Coordinate, target: Coordinate, direction: Direction) {
        if self.capacity == 0 {
            return;
        }
        let key = (start, target);
        if self.routes.insert(key, direction).is_some() {
            return;
        }
        self.order.push_back(key);
        while self.order.len() > self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                let _ = self.routes.remove(&oldest);
            }
        }
    }

    /// Number of stored routes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Reports whether no route is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Forgets every stored route.
    pub fn clear(&mut self) {
        self.routes.clear();
        self.order.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open(width: usize, height: usize) -> Grid<TileKind> {
        Grid::new(width, height, TileKind::Empty)
    }

    #[test]
    fn straight_corridor_heads_for_target() {
        let tiles = open(5, 1);
        assert_eq!(
            first_step(&tiles, Coordinate::new(0, 0), Coordinate::new(4, 0)),
            Direction::Right
        );
        assert_eq!(
            first_step(&tiles, Coordinate::new(4, 0), Coordinate::new(0, 0)),
            Direction::Left
        );
    }

    #[test]
    fn detours_around_walls() {
        let mut tiles = open(3, 3);
        tiles.set(Coordinate::new(1, 0), TileKind::Wall);
        tiles.set(Coordinate::new(1, 1), TileKind::Wall);

        assert_eq!(
            first_step(&tiles, Coordinate::new(0, 0), Coordinate::new(2, 0)),
            Direction::Down
        );
    }

    #[test]
    fn equal_paths_prefer_left_then_right_then_up_then_down() {
        let tiles = open(3, 3);
        let center = Coordinate::new(1, 1);

        assert_eq!(
            first_step(&tiles, center, Coordinate::new(0, 0)),
            Direction::Left
        );
        assert_eq!(
            first_step(&tiles, center, Coordinate::new(2, 2)),
            Direction::Right
        );
        assert_eq!(
            first_step(&tiles, center, Coordinate::new(1, 2)),
            Direction::Down
        );

        let mut ring = open(3, 3);
        ring.set(center, TileKind::Wall);
        assert_eq!(
            first_step(&ring, Coordinate::new(0, 1), Coordinate::new(2, 1)),
            Direction::Up
        );
    }

    #[test]
    fn unreachable_or_reached_targets_yield_none() {
        let mut tiles = open(3, 1);
        tiles.set(Coordinate::new(1, 0), TileKind::Wall);

        let start = Coordinate::new(0, 0);
        assert_eq!(first_step(&tiles, start, Coordinate::new(2, 0)), Direction::None);
        assert_eq!(first_step(&tiles, start, start), Direction::None);
        assert_eq!(
            first_step(&tiles, start, Coordinate::new(7, 7)),
            Direction::None
        );
        assert_eq!(
            first_step(&tiles, Coordinate::new(-1, 0), start),
            Direction::None
        );
    }

    #[test]
    fn entity_overlays_do_not_block_the_search() {
        let mut tiles = open(3, 1);
        tiles.set(Coordinate::new(1, 0), TileKind::Player);

        assert_eq!(
            first_step(&tiles, Coordinate::new(0, 0), Coordinate::new(2, 0)),
            Direction::Right
        );
    }

    #[test]
    fn reused_search_matches_fresh_search() {
        let mut tiles = open(6, 4);
        tiles.set(Coordinate::new(2, 1), TileKind::Wall);
        tiles.set(Coordinate::new(2, 2), TileKind::Wall);
        let mut search = PathSearch::default();

        for (start, target) in [
            (Coordinate::new(0, 1), Coordinate::new(5, 2)),
            (Coordinate::new(5, 3), Coordinate::new(0, 0)),
            (Coordinate::new(1, 1), Coordinate::new(3, 1)),
        ] {
            assert_eq!(
                search.first_step(&tiles, start, target),
                first_step(&tiles, start, target)
            );
        }
    }

    #[test]
    fn cache_evicts_oldest_route_first() {
        let mut cache = RouteCache::new(2);
        let a = Coordinate::new(0, 0);
        let b = Coordinate::new(1, 0);
        let c = Coordinate::new(2, 0);

        cache.insert(a, b, Direction::Right);
        cache.insert(b, c, Direction::Right);
        cache.insert(a, b, Direction::Right);
        assert_eq!(cache.len(), 2);

        cache.insert(c, a, Direction::Left);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(a, b), None);
        assert_eq!(cache.get(b, c), Some(Direction::Right));
        assert_eq!(cache.get(c, a), Some(Direction::Left));
    }

    #[test]
    fn zero_capacity_cache_stores_nothing() {
        let mut cache = RouteCache::new(0);
        cache.insert(Coordinate::new(0, 0), Coordinate::new(1, 0), Direction::Right);
        assert!(cache.is_empty());
    }
}
