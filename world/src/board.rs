//! Visible tile grid paired with the food layer beneath it.

use maze_chase_core::{Coordinate, Grid, TileKind};

use crate::layout::Layout;

/// What is currently visible on each cell, plus the ground truth under it.
///
/// The food layer only ever holds terrain (`Wall`, `Dot`, `PowerPellet`,
/// `Empty`). Every cell that no entity occupies shows its food-layer value;
/// the world restores a cell from the food layer when its occupant leaves.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    tiles: Grid<TileKind>,
    food: Grid<TileKind>,
}

impl Board {
    pub(crate) fn from_layout(layout: &Layout) -> Self {
        Self {
            tiles: layout.terrain().clone(),
            food: layout.terrain().clone(),
        }
    }

    /// Visible tiles: terrain with entity overlays.
    #[must_use]
    pub fn tiles(&self) -> &Grid<TileKind> {
        &self.tiles
    }

    /// Persistent terrain beneath any entity.
    #[must_use]
    pub fn food(&self) -> &Grid<TileKind> {
        &self.food
    }

    /// Number of columns.
    #[must_use]
    pub fn width(&self) -> usize {
        self.tiles.width()
    }

    /// Number of rows.
    #[must_use]
    pub fn height(&self) -> usize {
        self.tiles.height()
    }

    /// Number of dots and power pellets left in the food layer.
    #[must_use]
    pub fn collectibles_remaining(&self) -> usize {
        self.food
            .iter()
            .filter(|(_, tile)| tile.is_collectible())
            .count()
    }

    pub(crate) fn overlay(&mut self, cell: Coordinate, tile: TileKind) {
        self.tiles.set(cell, tile);
    }

    pub(crate) fn restore(&mut self, cell: Coordinate) {
        if let Some(&ground) = self.food.get(cell) {
            self.tiles.set(cell, ground);
        }
    }

    /// Removes a dot or pellet from the food layer, returning what was eaten.
    pub(crate) fn collect(&mut self, cell: Coordinate) -> Option<TileKind> {
        let ground = *self.food.get(cell)?;
        if !ground.is_collectible() {
            return None;
        }
        self.food.set(cell, TileKind::Empty);
        Some(ground)
    }
}
