//! Property tests for the first-hop search and the route cache.

use std::collections::VecDeque;

use maze_chase_core::{Coordinate, Direction, Grid, TileKind};
use maze_chase_system_pursuit::{first_step, ShortestPathChase};
use proptest::prelude::*;

const WIDTH: usize = 7;
const HEIGHT: usize = 6;

fn board(walls: &[bool]) -> Grid<TileKind> {
    let mut tiles = Grid::new(WIDTH, HEIGHT, TileKind::Dot);
    for (index, &wall) in walls.iter().enumerate() {
        if wall {
            let cell = Coordinate::new((index % WIDTH) as i32, (index / WIDTH) as i32);
            tiles.set(cell, TileKind::Wall);
        }
    }
    tiles
}

fn open(tiles: &Grid<TileKind>, cell: Coordinate) -> bool {
    tiles.get(cell).is_some_and(|tile| *tile != TileKind::Wall)
}

/// Reference breadth-first distance, independent of the crate under test.
fn distance(tiles: &Grid<TileKind>, start: Coordinate, target: Coordinate) -> Option<u32> {
    let mut seen = vec![start];
    let mut queue = VecDeque::from([(start, 0u32)]);
    while let Some((cell, steps)) = queue.pop_front() {
        if cell == target {
            return Some(steps);
        }
        for direction in Direction::CARDINALS {
            let next = cell.step(direction);
            if open(tiles, next) && !seen.contains(&next) {
                seen.push(next);
                queue.push_back((next, steps + 1));
            }
        }
    }
    None
}

fn cell() -> impl Strategy<Value = Coordinate> {
    (0..WIDTH as i32, 0..HEIGHT as i32).prop_map(|(x, y)| Coordinate::new(x, y))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(512))]

    #[test]
    fn first_hop_shortens_the_remaining_path(
        walls in prop::collection::vec(prop::bool::weighted(0.3), WIDTH * HEIGHT),
        start in cell(),
        target in cell(),
    ) {
        let mut walls = walls;
        walls[start.y() as usize * WIDTH + start.x() as usize] = false;
        let tiles = board(&walls);

        let hop = first_step(&tiles, start, target);
        match distance(&tiles, start, target) {
            None | Some(0) => prop_assert_eq!(hop, Direction::None),
            Some(steps) => {
                prop_assert!(!hop.is_none());
                let next = start.step(hop);
                prop_assert!(open(&tiles, next));
                prop_assert_eq!(distance(&tiles, next, target), Some(steps - 1));
            }
        }
    }

    #[test]
    fn cached_routes_match_fresh_searches(
        walls in prop::collection::vec(prop::bool::weighted(0.25), WIDTH * HEIGHT),
        pairs in prop::collection::vec((cell(), cell()), 1..24),
        capacity in 0usize..6,
    ) {
        let tiles = board(&walls);
        let mut chase = ShortestPathChase::new(capacity);

        for &(start, target) in pairs.iter().chain(pairs.iter()) {
            prop_assert_eq!(chase.route(&tiles, start, target), first_step(&tiles, start, target));
            prop_assert!(chase.cached_routes() <= capacity);
        }
    }
}
