//! Momentum-weighted random walk.

use maze_chase_core::{Coordinate, Direction, Grid, TileKind};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::{is_open, PursuitView};

const STRAIGHT_WEIGHT: f64 = 8.0;
const PERPENDICULAR_WEIGHT: f64 = 5.0;
const REVERSE_WEIGHT: f64 = 2.0;
const UNIFORM_WEIGHT: f64 = 1.0;

/// Pursuers wander, favouring their current heading over turns and turns
/// over reversing.
#[derive(Debug)]
pub struct WeightedRandomWalk {
    rng: ChaCha8Rng,
}

impl WeightedRandomWalk {
    /// Creates the walk with a deterministic random stream.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Draws one direction per pursuer, in pursuer order.
    pub fn next_moves(&mut self, view: &PursuitView<'_>) -> Vec<Direction> {
        view.pursuers
            .iter()
            .map(|pursuer| {
                let distribution =
                    direction_weights(view.tiles, pursuer.position, pursuer.direction);
                let sample: f64 = self.rng.gen();
                pick(&distribution, sample)
            })
            .collect()
    }
}

/// Normalised probability of each cardinal direction, highest first.
///
/// Equal weights keep the `[Up, Down, Left, Right]` order. A pursuer without
/// a heading, or whose heading runs into a wall, gets a uniform distribution.
#[must_use]
pub fn direction_weights(
    tiles: &Grid<TileKind>,
    position: Coordinate,
    heading: Direction,
) -> Vec<(Direction, f64)> {
    let momentum = !heading.is_none() && is_open(tiles, position.step(heading));

    let mut weights: Vec<(Direction, f64)> = Direction::CARDINALS
        .iter()
        .map(|&direction| {
            let weight = if !momentum {
                UNIFORM_WEIGHT
            } else if direction == heading {
                STRAIGHT_WEIGHT
            } else if direction == heading.opposite() {
                REVERSE_WEIGHT
            } else {
                PERPENDICULAR_WEIGHT
            };
            (direction, weight)
        })
        .collect();

    let total: f64 = weights.iter().map(|(_, weight)| weight).sum();
    for (_, weight) in &mut weights {
        *weight /= total;
    }
    weights.sort_by(|left, right| right.1.total_cmp(&left.1));
    weights
}

/// First candidate whose running sum reaches `sample`; the last candidate
/// absorbs floating-point shortfall.
#[must_use]
pub fn pick(distribution: &[(Direction, f64)], sample: f64) -> Direction {
    let mut cumulative = 0.0;
    for &(direction, weight) in distribution {
        cumulative += weight;
        if cumulative >= sample {
            return direction;
        }
    }
    distribution
        .last()
        .map_or(Direction::None, |&(direction, _)| direction)
}
