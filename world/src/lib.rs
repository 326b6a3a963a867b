#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative session state management for Maze Chase.

use std::time::Duration;

use maze_chase_core::{Command, Coordinate, Direction, Event, GameStatus, PursuerName, TileKind};
use tracing::{debug, info, trace};

mod board;
mod layout;

pub use board::Board;
pub use layout::{Layout, LayoutError};

/// Score awarded for eating a dot.
pub const DOT_SCORE: u32 = 10;
/// Score awarded for eating a power pellet.
pub const POWER_PELLET_SCORE: u32 = 50;

const DEFAULT_POWER_UP_DURATION: Duration = Duration::from_secs(5);
const DEFAULT_CAPTURE_BONUS: u32 = 200;

/// Tunable scoring and timing rules for a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rules {
    /// How long a power pellet keeps pursuer collisions safe.
    pub power_up_duration: Duration,
    /// Score awarded for catching a pursuer while powered up.
    pub capture_bonus: u32,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            power_up_duration: DEFAULT_POWER_UP_DURATION,
            capture_bonus: DEFAULT_CAPTURE_BONUS,
        }
    }
}

/// Represents the authoritative Maze Chase session state.
#[derive(Clone, Debug)]
pub struct World {
    board: Board,
    rules: Rules,
    player: Coordinate,
    pursuers: Vec<Pursuer>,
    score: u32,
    remaining: usize,
    status: GameStatus,
    committed: Direction,
    power_up: Option<Duration>,
    elapsed: Duration,
    tick_index: u64,
}

impl World {
    /// Creates a fresh session from the provided layout.
    #[must_use]
    pub fn new(layout: &Layout, rules: Rules) -> Self {
        let mut board = Board::from_layout(layout);
        let player = layout.player();
        board.overlay(player, TileKind::Player);

        let pursuers: Vec<Pursuer> = layout
            .pursuers()
            .iter()
            .map(|&(name, cell)| Pursuer::spawn(name, cell))
            .collect();
        for pursuer in &pursuers {
            board.overlay(pursuer.position, TileKind::Pursuer(pursuer.name));
        }

        let remaining = board.collectibles_remaining();
        Self {
            board,
            rules,
            player,
            pursuers,
            score: 0,
            remaining,
            status: GameStatus::NONE,
            committed: Direction::None,
            power_up: None,
            elapsed: Duration::ZERO,
            tick_index: 0,
        }
    }

    /// Reports whether the coordinate lies on the board.
    #[must_use]
    pub fn is_within_bounds(&self, cell: Coordinate) -> bool {
        self.board.tiles().contains(cell)
    }

    /// Reports whether any entity may enter the cell.
    #[must_use]
    pub fn is_valid_move(&self, cell: Coordinate) -> bool {
        self.board
            .tiles()
            .get(cell)
            .is_some_and(|tile| *tile != TileKind::Wall)
    }

    /// Reports whether the player may enter the cell; staying put never counts.
    #[must_use]
    pub fn is_valid_player_move(&self, cell: Coordinate) -> bool {
        self.is_valid_move(cell) && cell != self.player
    }

    fn set_status(&mut self, status: GameStatus, out_events: &mut Vec<Event>) {
        if self.status == status {
            return;
        }
        self.status = status;
        out_events.push(Event::StatusChanged { status });
    }

    fn step_player(&mut self, queued: Option<Direction>, out_events: &mut Vec<Event>) {
        if self.status.is_game_over() {
            return;
        }

        if let Some(direction) = queued {
            let candidate = self.player.step(direction);
            if self.is_valid_player_move(candidate) {
                self.committed = direction;
                out_events.push(Event::IntentCommitted { direction });
                self.move_player(candidate, direction, out_events);
                return;
            }
        }

        let direction = self.committed;
        let candidate = self.player.step(direction);
        if self.is_valid_player_move(candidate) {
            self.move_player(candidate, direction, out_events);
        } else {
            trace!(player = %self.player, "player stalled");
            out_events.push(Event::PlayerStalled);
        }
    }

    fn move_player(&mut self, to: Coordinate, direction: Direction, out_events: &mut Vec<Event>) {
        let from = self.player;

        match self.board.collect(to) {
            Some(TileKind::Dot) => {
                self.score += DOT_SCORE;
                self.remaining = self.remaining.saturating_sub(1);
                out_events.push(Event::DotCollected { cell: to });
            }
            Some(TileKind::PowerPellet) => {
                self.score += POWER_PELLET_SCORE;
                self.remaining = self.remaining.saturating_sub(1);
                self.power_up = Some(self.rules.power_up_duration);
                debug!(cell = %to, "power pellet eaten");
                out_events.push(Event::PowerPelletCollected { cell: to });
            }
            _ => {}
        }

        self.player = to;
        self.board.overlay(to, TileKind::Player);
        self.refresh_cell(from);
        out_events.push(Event::PlayerMoved {
            from,
            to,
            direction,
        });
    }

    fn step_pursuers(&mut self, moves: &[Direction], out_events: &mut Vec<Event>) {
        if self.status.is_game_over() {
            return;
        }

        for (index, &direction) in moves.iter().enumerate() {
            let Some(pursuer) = self.pursuers.get(index) else {
                break;
            };
            let from = pursuer.position;
            let to = from.step(direction);
            if !self.is_valid_move(to) {
                continue;
            }

            let pursuer = &mut self.pursuers[index];
            pursuer.position = to;
            pursuer.direction = direction;
            let name = pursuer.name;

            if to != from {
                self.refresh_cell(from);
                out_events.push(Event::PursuerMoved {
                    pursuer: name,
                    from,
                    to,
                });
            }
            self.board.overlay(to, TileKind::Pursuer(name));
        }
    }

    fn resolve_outcome(&mut self, out_events: &mut Vec<Event>) {
        if self.status.is_game_over() {
            return;
        }

        if self.remaining == 0 {
            self.set_status(GameStatus::GAME_OVER | GameStatus::VICTORY, out_events);
            out_events.push(Event::BoardCleared);
            info!(score = self.score, "board cleared");
            return;
        }

        for index in 0..self.pursuers.len() {
            let pursuer = &self.pursuers[index];
            if pursuer.position != self.player {
                continue;
            }
            let name = pursuer.name;

            if self.power_up.is_none() {
                self.set_status(GameStatus::GAME_OVER, out_events);
                out_events.push(Event::PlayerCaught { pursuer: name });
                info!(?name, score = self.score, "player caught");
                return;
            }

            let bonus = self.rules.capture_bonus;
            self.score += bonus;
            let pursuer = &mut self.pursuers[index];
            let from = pursuer.position;
            let home = pursuer.initial_position;
            pursuer.position = home;
            pursuer.direction = Direction::None;

            self.refresh_cell(from);
            self.board.overlay(home, TileKind::Pursuer(name));
            debug!(?name, bonus, "pursuer captured");
            out_events.push(Event::PursuerCaptured {
                pursuer: name,
                bonus,
            });
        }
    }

    fn advance_clock(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        self.elapsed = self.elapsed.saturating_add(dt);
        self.tick_index = self.tick_index.saturating_add(1);

        if let Some(remaining) = self.power_up {
            let left = remaining.saturating_sub(dt);
            if left.is_zero() {
                self.power_up = None;
                debug!("power-up expired");
                out_events.push(Event::PowerUpExpired);
            } else {
                self.power_up = Some(left);
            }
        }

        out_events.push(Event::TimeAdvanced { dt });
    }

    /// Redraws a cell from whichever entity still stands on it, or from the
    /// food layer when it is unoccupied.
    fn refresh_cell(&mut self, cell: Coordinate) {
        if self.player == cell {
            self.board.overlay(cell, TileKind::Player);
        } else if let Some(pursuer) = self.pursuers.iter().find(|p| p.position == cell) {
            let tile = TileKind::Pursuer(pursuer.name);
            self.board.overlay(cell, tile);
        } else {
            self.board.restore(cell);
        }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Start => {
            if world.status.is_game_over() {
                return;
            }
            world.set_status(GameStatus::RUNNING, out_events);
        }
        Command::StepPlayer { queued } => world.step_player(queued, out_events),
        Command::StepPursuers { moves } => world.step_pursuers(&moves, out_events),
        Command::ResolveOutcome => world.resolve_outcome(out_events),
        Command::Tick { dt } => world.advance_clock(dt, out_events),
        Command::Halt => {
            let mut status = GameStatus::GAME_OVER;
            if world.status.is_victory() {
                status |= GameStatus::VICTORY;
            }
            world.set_status(status, out_events);
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use maze_chase_core::{Coordinate, Direction, GameStatus, Grid, PursuerSnapshot, TileKind};

    use super::{Board, World};

    /// Provides read-only access to the board and its food layer.
    #[must_use]
    pub fn board(world: &World) -> &Board {
        &world.board
    }

    /// Current score.
    #[must_use]
    pub fn score(world: &World) -> u32 {
        world.score
    }

    /// Current session status.
    #[must_use]
    pub fn status(world: &World) -> GameStatus {
        world.status
    }

    /// Dots and power pellets still to be eaten.
    #[must_use]
    pub fn remaining_collectibles(world: &World) -> usize {
        world.remaining
    }

    /// Reports whether pursuer collisions are currently safe.
    #[must_use]
    pub fn is_powered_up(world: &World) -> bool {
        world.power_up.is_some()
    }

    /// Time left on the power-up, zero when inactive.
    #[must_use]
    pub fn power_up_remaining(world: &World) -> Duration {
        world.power_up.unwrap_or(Duration::ZERO)
    }

    /// Simulated time elapsed since the session started ticking.
    #[must_use]
    pub fn elapsed(world: &World) -> Duration {
        world.elapsed
    }

    /// Number of ticks applied so far.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Cell occupied by the player.
    #[must_use]
    pub fn player(world: &World) -> Coordinate {
        world.player
    }

    /// Direction the player keeps moving in when no intent applies.
    #[must_use]
    pub fn committed_direction(world: &World) -> Direction {
        world.committed
    }

    /// Captures the pursuers in index order.
    #[must_use]
    pub fn pursuers(world: &World) -> Vec<PursuerSnapshot> {
        world.pursuers.iter().map(super::Pursuer::snapshot).collect()
    }

    /// Renders the visible board with layout characters, one string per row.
    #[must_use]
    pub fn render_rows(world: &World) -> Vec<String> {
        world
            .board
            .tiles()
            .rows()
            .map(|row| row.iter().map(|tile| tile.marker()).collect())
            .collect()
    }

    /// Captures an owned copy of the observable state.
    #[must_use]
    pub fn snapshot(world: &World) -> Snapshot {
        Snapshot {
            tiles: world.board.tiles().clone(),
            score: world.score,
            status: world.status,
            remaining_collectibles: world.remaining,
            power_up_remaining: power_up_remaining(world),
            elapsed: world.elapsed,
            tick_index: world.tick_index,
            player: world.player,
            committed_direction: world.committed,
            pursuers: pursuers(world),
        }
    }

    /// Owned copy of the observable session state.
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct Snapshot {
        /// Visible tiles, terrain plus entity overlays.
        pub tiles: Grid<TileKind>,
        /// Current score.
        pub score: u32,
        /// Current session status.
        pub status: GameStatus,
        /// Dots and power pellets still to be eaten.
        pub remaining_collectibles: usize,
        /// Time left on the power-up, zero when inactive.
        pub power_up_remaining: Duration,
        /// Simulated time elapsed.
        pub elapsed: Duration,
        /// Number of ticks applied so far.
        pub tick_index: u64,
        /// Cell occupied by the player.
        pub player: Coordinate,
        /// Direction the player keeps moving in when no intent applies.
        pub committed_direction: Direction,
        /// Pursuers in index order.
        pub pursuers: Vec<PursuerSnapshot>,
    }

    impl Snapshot {
        /// Reports whether pursuer collisions are currently safe.
        #[must_use]
        pub fn is_powered_up(&self) -> bool {
            !self.power_up_remaining.is_zero()
        }
    }
}

#[derive(Clone, Debug)]
struct Pursuer {
    name: PursuerName,
    position: Coordinate,
    initial_position: Coordinate,
    direction: Direction,
}

impl Pursuer {
    fn spawn(name: PursuerName, cell: Coordinate) -> Self {
        Self {
            name,
            position: cell,
            initial_position: cell,
            direction: Direction::None,
        }
    }

    fn snapshot(&self) -> maze_chase_core::PursuerSnapshot {
        maze_chase_core::PursuerSnapshot {
            name: self.name,
            position: self.position,
            initial_position: self.initial_position,
            direction: self.direction,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world(rows: &[&str]) -> World {
        let layout = Layout::parse(rows).expect("layout parses");
        World::new(&layout, Rules::default())
    }

    fn run(world: &mut World, command: Command) -> Vec<Event> {
        let mut events = Vec::new();
        apply(world, command, &mut events);
        events
    }

    #[test]
    fn new_world_overlays_entities_and_counts_collectibles() {
        let world = world(&["P.o1", "wwww"]);

        assert_eq!(query::remaining_collectibles(&world), 2);
        assert_eq!(query::status(&world), GameStatus::NONE);
        assert_eq!(query::render_rows(&world), vec!["P.o1", "wwww"]);
        assert_eq!(
            query::board(&world).food()[Coordinate::new(3, 0)],
            TileKind::Empty
        );
    }

    #[test]
    fn start_is_ignored_after_game_over() {
        let mut world = world(&["P."]);
        let _ = run(&mut world, Command::Halt);
        assert!(run(&mut world, Command::Start).is_empty());
        assert_eq!(query::status(&world), GameStatus::GAME_OVER);
    }

    #[test]
    fn halt_keeps_victory_bit() {
        let mut world = world(&["P."]);
        let _ = run(
            &mut world,
            Command::StepPlayer {
                queued: Some(Direction::Right),
            },
        );
        let _ = run(&mut world, Command::ResolveOutcome);
        let _ = run(&mut world, Command::Halt);

        assert_eq!(
            query::status(&world),
            GameStatus::GAME_OVER | GameStatus::VICTORY
        );
    }

    #[test]
    fn player_never_walks_into_walls_or_off_the_board() {
        let mut world = world(&["wP."]);
        let events = run(
            &mut world,
            Command::StepPlayer {
                queued: Some(Direction::Left),
            },
        );
        assert_eq!(events, vec![Event::PlayerStalled]);

        let events = run(
            &mut world,
            Command::StepPlayer {
                queued: Some(Direction::Up),
            },
        );
        assert_eq!(events, vec![Event::PlayerStalled]);
        assert_eq!(query::player(&world), Coordinate::new(1, 0));
    }

    #[test]
    fn vacated_pursuer_cell_shows_remaining_entity() {
        let mut world = world(&["P12."]);
        let _ = run(
            &mut world,
            Command::StepPursuers {
                moves: vec![Direction::Right, Direction::Right],
            },
        );

        // Blinky moved onto Pinky's old cell before Pinky left it.
        assert_eq!(query::render_rows(&world), vec!["P 12"]);
    }

    #[test]
    fn power_up_expires_after_its_duration() {
        let mut world = world(&["Po.."]);
        let _ = run(
            &mut world,
            Command::StepPlayer {
                queued: Some(Direction::Right),
            },
        );
        assert!(query::is_powered_up(&world));

        let dt = Duration::from_millis(2_500);
        let first = run(&mut world, Command::Tick { dt });
        assert!(!first.contains(&Event::PowerUpExpired));
        assert_eq!(query::power_up_remaining(&world), dt);

        let second = run(&mut world, Command::Tick { dt });
        assert!(second.contains(&Event::PowerUpExpired));
        assert!(!query::is_powered_up(&world));
        assert_eq!(query::elapsed(&world), Duration::from_secs(5));
        assert_eq!(query::tick_index(&world), 2);
    }
}
