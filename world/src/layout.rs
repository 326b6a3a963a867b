//! Text layouts that seed a session's board and entity start cells.

use maze_chase_core::{Coordinate, Grid, PursuerName, TileKind};
use thiserror::Error;

const PLAYER_MARKER: char = 'P';

/// The fixed 28×31 maze every session is played on.
const CLASSIC_ROWS: [&str; 31] = [
    "wwwwwwwwwwwwwwwwwwwwwwwwwwww",
    "w............ww............w",
    "w.wwww.wwwww.ww.wwwww.wwww.w",
    "wowwww.wwwww.ww.wwwww.wwwwow",
    "w.wwww.wwwww.ww.wwwww.wwww.w",
    "w..........................w",
    "w.wwww.ww.wwwwwwww.ww.wwww.w",
    "w.wwww.ww.wwwwwwww.ww.wwww.w",
    "w......ww....ww....ww......w",
    "wwwwww.wwwww ww wwwww.wwwwww",
    "     w.wwwww ww wwwww.w     ",
    "     w.ww          ww.w     ",
    "     w.ww www--www ww.w     ",
    "wwwwww.ww w      w ww.wwwwww",
    "      .   w  1234w   .      ",
    "wwwwww.ww w      w ww.wwwwww",
    "     w.ww wwwwwwww ww.w     ",
    "     w.ww          ww.w     ",
    "     w.ww wwwwwwww ww.w     ",
    "wwwwww.ww wwwwwwww ww.wwwwww",
    "w............ww............w",
    "w.wwww.wwwww.ww.wwwww.wwww.w",
    "w.wwww.wwwww.ww.wwwww.wwww.w",
    "wo..ww....... P.......ww..ow",
    "www.ww.ww.wwwwwwww.ww.ww.www",
    "www.ww.ww.wwwwwwww.ww.ww.www",
    "w......ww....ww....ww......w",
    "w.wwwwwwwwww.ww.wwwwwwwwww.w",
    "w.wwwwwwwwww.ww.wwwwwwwwww.w",
    "w..........................w",
    "wwwwwwwwwwwwwwwwwwwwwwwwwwww",
];

/// Reasons a text layout cannot seed a board.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum LayoutError {
    /// The layout has no rows or only empty rows.
    #[error("layout contains no cells")]
    Empty,
    /// The layout exceeds the coordinate range.
    #[error("layout of {width}x{height} cells exceeds the coordinate range")]
    TooLarge {
        /// Longest row length.
        width: usize,
        /// Number of rows.
        height: usize,
    },
    /// No cell carries the player start marker.
    #[error("layout has no player start marker `P`")]
    MissingPlayer,
    /// A start marker was placed more than once.
    #[error("start marker `{marker}` appears at {first} and again at {second}")]
    DuplicateMarker {
        /// The repeated character.
        marker: char,
        /// Cell of the first occurrence.
        first: Coordinate,
        /// Cell of the repeated occurrence.
        second: Coordinate,
    },
}

/// Parsed layout: terrain plus the start cells of every entity.
///
/// Start cells are recorded as `Empty` terrain; entity overlays are applied
/// when a world is built from the layout.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Layout {
    terrain: Grid<TileKind>,
    player: Coordinate,
    pursuers: Vec<(PursuerName, Coordinate)>,
}

impl Layout {
    /// Parses text rows into a layout.
    ///
    /// `w` is a wall, `.` a dot, `o` a power pellet, `P` the player start and
    /// `1`..`4` the pursuer starts. Every other character is empty floor, as
    /// are the missing cells of rows shorter than the longest one.
    pub fn parse<S: AsRef<str>>(rows: &[S]) -> Result<Self, LayoutError> {
        let height = rows.len();
        let width = rows
            .iter()
            .map(|row| row.as_ref().chars().count())
            .max()
            .unwrap_or(0);
        if width == 0 || height == 0 {
            return Err(LayoutError::Empty);
        }
        if i32::try_from(width).is_err() || i32::try_from(height).is_err() {
            return Err(LayoutError::TooLarge { width, height });
        }

        let mut terrain = Grid::new(width, height, TileKind::Empty);
        let mut player: Option<Coordinate> = None;
        let mut pursuers: Vec<(PursuerName, Coordinate)> = Vec::new();

        for (y, row) in (0i32..).zip(rows) {
            for (x, marker) in (0i32..).zip(row.as_ref().chars()) {
                let cell = Coordinate::new(x, y);
                match marker {
                    'w' => terrain.set(cell, TileKind::Wall),
                    '.' => terrain.set(cell, TileKind::Dot),
                    'o' => terrain.set(cell, TileKind::PowerPellet),
                    PLAYER_MARKER => {
                        if let Some(first) = player {
                            return Err(LayoutError::DuplicateMarker {
                                marker,
                                first,
                                second: cell,
                            });
                        }
                        player = Some(cell);
                    }
                    other => {
                        let Some(name) = PursuerName::from_marker(other) else {
                            continue;
                        };
                        if let Some(&(_, first)) =
                            pursuers.iter().find(|(existing, _)| *existing == name)
                        {
                            return Err(LayoutError::DuplicateMarker {
                                marker,
                                first,
                                second: cell,
                            });
                        }
                        pursuers.push((name, cell));
                    }
                }
            }
        }

        let player = player.ok_or(LayoutError::MissingPlayer)?;
        pursuers.sort_by_key(|(name, _)| *name);

        Ok(Self {
            terrain,
            player,
            pursuers,
        })
    }

    /// The fixed maze used for every session.
    pub fn classic() -> Result<Self, LayoutError> {
        Self::parse(&CLASSIC_ROWS)
    }

    /// Terrain with entity start cells left empty.
    #[must_use]
    pub fn terrain(&self) -> &Grid<TileKind> {
        &self.terrain
    }

    /// Start cell of the player.
    #[must_use]
    pub const fn player(&self) -> Coordinate {
        self.player
    }

    /// Start cells of the pursuers, ordered by name.
    #[must_use]
    pub fn pursuers(&self) -> &[(PursuerName, Coordinate)] {
        &self.pursuers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classic_layout_places_every_entity() {
        let layout = Layout::classic().expect("classic layout parses");

        assert_eq!(layout.terrain().width(), 28);
        assert_eq!(layout.terrain().height(), 31);
        assert_eq!(layout.player(), Coordinate::new(14, 23));
        assert_eq!(
            layout.pursuers(),
            &[
                (PursuerName::Blinky, Coordinate::new(13, 14)),
                (PursuerName::Pinky, Coordinate::new(14, 14)),
                (PursuerName::Inky, Coordinate::new(15, 14)),
                (PursuerName::Clyde, Coordinate::new(16, 14)),
            ]
        );
    }

    #[test]
    fn classic_corners_are_open_floor() {
        let layout = Layout::classic().expect("classic layout parses");
        for corner in [
            Coordinate::new(1, 1),
            Coordinate::new(26, 1),
            Coordinate::new(1, 29),
            Coordinate::new(26, 29),
        ] {
            assert_ne!(layout.terrain()[corner], TileKind::Wall, "{corner}");
        }
    }

    #[test]
    fn short_rows_are_padded_with_empty_floor() {
        let layout = Layout::parse(&["wwww", "wP", "w.o-"]).expect("layout parses");

        assert_eq!(layout.terrain().width(), 4);
        assert_eq!(layout.terrain()[Coordinate::new(3, 1)], TileKind::Empty);
        assert_eq!(layout.terrain()[Coordinate::new(1, 1)], TileKind::Empty);
        assert_eq!(layout.terrain()[Coordinate::new(1, 2)], TileKind::Dot);
        assert_eq!(layout.terrain()[Coordinate::new(2, 2)], TileKind::PowerPellet);
        assert_eq!(layout.terrain()[Coordinate::new(3, 2)], TileKind::Empty);
    }

    #[test]
    fn pursuers_are_ordered_by_name_not_position() {
        let layout = Layout::parse(&["3P1"]).expect("layout parses");
        assert_eq!(
            layout.pursuers(),
            &[
                (PursuerName::Blinky, Coordinate::new(2, 0)),
                (PursuerName::Inky, Coordinate::new(0, 0)),
            ]
        );
    }

    #[test]
    fn rejects_missing_player() {
        assert_eq!(Layout::parse(&["w.w"]), Err(LayoutError::MissingPlayer));
    }

    #[test]
    fn rejects_empty_layout() {
        let rows: [&str; 0] = [];
        assert_eq!(Layout::parse(&rows), Err(LayoutError::Empty));
        assert_eq!(Layout::parse(&["", ""]), Err(LayoutError::Empty));
    }

    #[test]
    fn rejects_duplicate_markers() {
        assert_eq!(
            Layout::parse(&["P.P"]),
            Err(LayoutError::DuplicateMarker {
                marker: 'P',
                first: Coordinate::new(0, 0),
                second: Coordinate::new(2, 0),
            })
        );
        assert!(matches!(
            Layout::parse(&["P2", "2."]),
            Err(LayoutError::DuplicateMarker { marker: '2', .. })
        ));
    }
}
