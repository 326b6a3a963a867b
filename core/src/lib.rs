#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Maze Chase engine.
//!
//! This crate defines the message surface that connects the engine, the
//! authoritative world, and pure systems. The engine submits [`Command`]
//! values describing the steps of a tick, the world executes those commands
//! via its `apply` entry point, and then reports [`Event`] values describing
//! what changed. Systems read immutable views of the board and respond with
//! data the engine turns into new commands.

use std::{
    fmt,
    ops::{BitOr, BitOrAssign},
    time::Duration,
};

use serde::{Deserialize, Serialize};

mod grid;

pub use grid::Grid;

/// Cardinal movement directions, plus the absence of movement.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    Up,
    /// Movement toward increasing row indices.
    Down,
    /// Movement toward decreasing column indices.
    Left,
    /// Movement toward increasing column indices.
    Right,
    /// No movement requested or possible.
    #[default]
    None,
}

impl Direction {
    /// The four cardinal directions in declaration order.
    pub const CARDINALS: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Returns the direction pointing the opposite way.
    ///
    /// # Panics
    ///
    /// `Direction::None` has no reverse; asking for one is a contract
    /// violation by the caller.
    #[must_use]
    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
            Direction::None => panic!("Direction::None has no opposite"),
        }
    }

    /// Reports whether the direction is [`Direction::None`].
    #[must_use]
    pub const fn is_none(self) -> bool {
        matches!(self, Direction::None)
    }
}

/// Location of a single board cell expressed as column (`x`) and row (`y`).
///
/// Coordinates carry no bounds of their own; validity is always judged
/// against a particular board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coordinate {
    x: i32,
    y: i32,
}

impl Coordinate {
    /// Creates a new coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Zero-based column index.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Zero-based row index.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Coordinate reached by taking one step in `direction`.
    ///
    /// `Direction::None` yields the coordinate itself.
    #[must_use]
    pub const fn step(self, direction: Direction) -> Self {
        match direction {
            Direction::Up => Self::new(self.x, self.y - 1),
            Direction::Down => Self::new(self.x, self.y + 1),
            Direction::Left => Self::new(self.x - 1, self.y),
            Direction::Right => Self::new(self.x + 1, self.y),
            Direction::None => self,
        }
    }

    /// Direction that leads from `self` toward `other`.
    ///
    /// The column axis is checked before the row axis, so only adjacent
    /// coordinates produce an exact step. Equal coordinates yield
    /// `Direction::None`.
    #[must_use]
    pub fn direction_to(self, other: Coordinate) -> Direction {
        if other.x > self.x {
            Direction::Right
        } else if other.x < self.x {
            Direction::Left
        } else if other.y > self.y {
            Direction::Down
        } else if other.y < self.y {
            Direction::Up
        } else {
            Direction::None
        }
    }

    /// Computes the Manhattan distance between two coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: Coordinate) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Identity of one of the four pursuers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PursuerName {
    /// First pursuer, laid out with the `'1'` marker.
    Blinky,
    /// Second pursuer, laid out with the `'2'` marker.
    Pinky,
    /// Third pursuer, laid out with the `'3'` marker.
    Inky,
    /// Fourth pursuer, laid out with the `'4'` marker.
    Clyde,
}

impl PursuerName {
    /// Every pursuer identity in layout order.
    pub const ALL: [PursuerName; 4] = [
        PursuerName::Blinky,
        PursuerName::Pinky,
        PursuerName::Inky,
        PursuerName::Clyde,
    ];

    /// Layout character reserved for the pursuer's start cell.
    #[must_use]
    pub const fn marker(self) -> char {
        match self {
            PursuerName::Blinky => '1',
            PursuerName::Pinky => '2',
            PursuerName::Inky => '3',
            PursuerName::Clyde => '4',
        }
    }

    /// Resolves a layout character into the pursuer it designates.
    #[must_use]
    pub fn from_marker(marker: char) -> Option<Self> {
        Self::ALL.into_iter().find(|name| name.marker() == marker)
    }
}

/// Semantic content of one board cell: terrain or an entity overlay.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    /// Open floor with nothing to collect.
    #[default]
    Empty,
    /// Impassable terrain.
    Wall,
    /// Collectible worth a small score.
    Dot,
    /// Collectible that also grants the power-up.
    PowerPellet,
    /// Overlay marking the player's cell.
    Player,
    /// Overlay marking a pursuer's cell.
    Pursuer(PursuerName),
}

impl TileKind {
    /// Reports whether the tile is a dot or a power pellet.
    #[must_use]
    pub const fn is_collectible(self) -> bool {
        matches!(self, TileKind::Dot | TileKind::PowerPellet)
    }

    /// Character used for the tile in text layouts.
    #[must_use]
    pub const fn marker(self) -> char {
        match self {
            TileKind::Empty => ' ',
            TileKind::Wall => 'w',
            TileKind::Dot => '.',
            TileKind::PowerPellet => 'o',
            TileKind::Player => 'P',
            TileKind::Pursuer(name) => name.marker(),
        }
    }
}

/// Bit set describing the lifecycle of a session.
///
/// `GAME_OVER` and `VICTORY` are set together when the board is cleared.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct GameStatus(u8);

impl GameStatus {
    /// Session initialised but not started.
    pub const NONE: GameStatus = GameStatus(0);
    /// Tick loop is advancing the session.
    pub const RUNNING: GameStatus = GameStatus(1);
    /// Session ended.
    pub const GAME_OVER: GameStatus = GameStatus(1 << 1);
    /// Session ended because every collectible was eaten.
    pub const VICTORY: GameStatus = GameStatus(1 << 2);

    /// Raw flag bits.
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Reports whether every flag in `other` is set.
    #[must_use]
    pub const fn contains(self, other: GameStatus) -> bool {
        self.0 & other.0 == other.0
    }

    /// Reports whether the session is running.
    #[must_use]
    pub const fn is_running(self) -> bool {
        self.contains(Self::RUNNING)
    }

    /// Reports whether the session has ended, won or lost.
    #[must_use]
    pub const fn is_game_over(self) -> bool {
        self.contains(Self::GAME_OVER)
    }

    /// Reports whether the session ended in a win.
    #[must_use]
    pub const fn is_victory(self) -> bool {
        self.contains(Self::VICTORY)
    }
}

impl BitOr for GameStatus {
    type Output = GameStatus;

    fn bitor(self, rhs: GameStatus) -> GameStatus {
        GameStatus(self.0 | rhs.0)
    }
}

impl BitOrAssign for GameStatus {
    fn bitor_assign(&mut self, rhs: GameStatus) {
        self.0 |= rhs.0;
    }
}

impl fmt::Debug for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const NAMES: [(GameStatus, &str); 3] = [
            (GameStatus::RUNNING, "Running"),
            (GameStatus::GAME_OVER, "GameOver"),
            (GameStatus::VICTORY, "Victory"),
        ];

        let mut written = false;
        for (flag, name) in NAMES {
            if self.contains(flag) {
                if written {
                    f.write_str("|")?;
                }
                f.write_str(name)?;
                written = true;
            }
        }
        if !written {
            f.write_str("None")?;
        }
        Ok(())
    }
}

/// Immutable representation of a single pursuer used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PursuerSnapshot {
    /// Identity of the pursuer, also its board overlay.
    pub name: PursuerName,
    /// Cell currently occupied.
    pub position: Coordinate,
    /// Start cell recorded at load time, used to respawn after capture.
    pub initial_position: Coordinate,
    /// Direction of the pursuer's last applied move.
    pub direction: Direction,
}

/// Commands that express all permissible world mutations.
///
/// One tick applies `StepPlayer`, `StepPursuers`, `ResolveOutcome` and
/// `Tick` in that order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Marks the session as running.
    Start,
    /// Resolves the player's move for this tick.
    StepPlayer {
        /// Head of the intent queue, if any. It is only consumed when the
        /// world reports [`Event::IntentCommitted`].
        queued: Option<Direction>,
    },
    /// Applies one computed move per pursuer, aligned by pursuer index.
    StepPursuers {
        /// Directions produced by the active pursuer strategy.
        moves: Vec<Direction>,
    },
    /// Evaluates victory, captures and defeat.
    ResolveOutcome,
    /// Advances the simulation clock and the power-up timer.
    Tick {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Ends the session on external request.
    Halt,
}

/// Events reported by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// The session status changed.
    StatusChanged {
        /// Status after the change.
        status: GameStatus,
    },
    /// The queued intent was applied and must be removed from the queue.
    IntentCommitted {
        /// Direction that became the committed direction.
        direction: Direction,
    },
    /// Neither the queued intent nor the committed direction could move the
    /// player; pending intents are stale.
    PlayerStalled,
    /// The player moved one cell.
    PlayerMoved {
        /// Cell the player left.
        from: Coordinate,
        /// Cell the player entered.
        to: Coordinate,
        /// Direction of travel.
        direction: Direction,
    },
    /// The player ate a dot.
    DotCollected {
        /// Cell that held the dot.
        cell: Coordinate,
    },
    /// The player ate a power pellet and is powered up.
    PowerPelletCollected {
        /// Cell that held the pellet.
        cell: Coordinate,
    },
    /// A pursuer moved one cell.
    PursuerMoved {
        /// Pursuer that moved.
        pursuer: PursuerName,
        /// Cell the pursuer left.
        from: Coordinate,
        /// Cell the pursuer entered.
        to: Coordinate,
    },
    /// A powered-up player caught a pursuer, sending it home.
    PursuerCaptured {
        /// Pursuer that was captured.
        pursuer: PursuerName,
        /// Score awarded for the capture.
        bonus: u32,
    },
    /// A pursuer caught the unpowered player.
    PlayerCaught {
        /// Pursuer that caught the player.
        pursuer: PursuerName,
    },
    /// Every collectible has been eaten.
    BoardCleared,
    /// The power-up ran out.
    PowerUpExpired,
    /// The simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
}
