//! Fixed-size two-dimensional cell container.

use std::ops::{Index, IndexMut};

use crate::Coordinate;

/// Dense row-major grid of `width × height` homogeneous cells.
///
/// The dimensions never change after construction. Indexing by
/// `(row, column)` or by [`Coordinate`] panics outside the grid, so callers
/// check [`Grid::contains`] first; [`Grid::get`] offers checked access.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid<T> {
    width: usize,
    height: usize,
    cells: Vec<T>,
}

impl<T: Clone> Grid<T> {
    /// Creates a grid with every cell set to `fill`.
    #[must_use]
    pub fn new(width: usize, height: usize, fill: T) -> Self {
        Self {
            width,
            height,
            cells: vec![fill; width * height],
        }
    }
}

impl<T> Grid<T> {
    /// Number of columns.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Reports whether the coordinate lies inside the grid.
    #[must_use]
    pub fn contains(&self, coord: Coordinate) -> bool {
        self.index_of(coord).is_some()
    }

    /// Returns the cell at `coord`, if it lies inside the grid.
    #[must_use]
    pub fn get(&self, coord: Coordinate) -> Option<&T> {
        self.index_of(coord).map(|offset| &self.cells[offset])
    }

    /// Overwrites the cell at `coord`. Coordinates outside the grid are ignored.
    pub fn set(&mut self, coord: Coordinate, value: T) {
        if let Some(offset) = self.index_of(coord) {
            self.cells[offset] = value;
        }
    }

    /// Iterator over the rows of the grid, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[T]> {
        self.cells.chunks(self.width.max(1))
    }

    /// Iterator over every cell paired with its coordinate, in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Coordinate, &T)> {
        let width = self.width;
        self.cells
            .iter()
            .enumerate()
            .map(move |(offset, cell)| (offset_coordinate(width, offset), cell))
    }

    /// Row-major offset of `coord`, if it lies inside the grid.
    #[must_use]
    pub fn index_of(&self, coord: Coordinate) -> Option<usize> {
        let column = usize::try_from(coord.x()).ok()?;
        let row = usize::try_from(coord.y()).ok()?;
        if column < self.width && row < self.height {
            Some(row * self.width + column)
        } else {
            None
        }
    }

    /// Coordinate of the cell at row-major `offset`, if it lies inside the grid.
    #[must_use]
    pub fn coordinate_of(&self, offset: usize) -> Option<Coordinate> {
        (offset < self.cells.len()).then(|| offset_coordinate(self.width, offset))
    }
}

fn offset_coordinate(width: usize, offset: usize) -> Coordinate {
    let width = width.max(1);
    let x = i32::try_from(offset % width).unwrap_or(i32::MAX);
    let y = i32::try_from(offset / width).unwrap_or(i32::MAX);
    Coordinate::new(x, y)
}

impl<T> Index<(usize, usize)> for Grid<T> {
    type Output = T;

    fn index(&self, (row, column): (usize, usize)) -> &T {
        assert!(column < self.width, "column {column} outside grid");
        &self.cells[row * self.width + column]
    }
}

impl<T> IndexMut<(usize, usize)> for Grid<T> {
    fn index_mut(&mut self, (row, column): (usize, usize)) -> &mut T {
        assert!(column < self.width, "column {column} outside grid");
        &mut self.cells[row * self.width + column]
    }
}

impl<T> Index<Coordinate> for Grid<T> {
    type Output = T;

    fn index(&self, coord: Coordinate) -> &T {
        match self.index_of(coord) {
            Some(offset) => &self.cells[offset],
            None => panic!("{coord} outside {}x{} grid", self.width, self.height),
        }
    }
}

impl<T> IndexMut<Coordinate> for Grid<T> {
    fn index_mut(&mut self, coord: Coordinate) -> &mut T {
        match self.index_of(coord) {
            Some(offset) => &mut self.cells[offset],
            None => panic!("{coord} outside {}x{} grid", self.width, self.height),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_column_and_coordinate_indexing_agree() {
        let mut grid = Grid::new(4, 3, 0u8);
        grid[(2, 1)] = 7;
        assert_eq!(grid[Coordinate::new(1, 2)], 7);

        grid[Coordinate::new(3, 0)] = 9;
        assert_eq!(grid[(0, 3)], 9);
    }

    #[test]
    fn contains_rejects_negative_and_overflowing_coordinates() {
        let grid = Grid::new(2, 2, ());
        assert!(grid.contains(Coordinate::new(1, 1)));
        assert!(!grid.contains(Coordinate::new(-1, 0)));
        assert!(!grid.contains(Coordinate::new(0, 2)));
        assert!(!grid.contains(Coordinate::new(2, 0)));
        assert_eq!(grid.get(Coordinate::new(5, 5)), None);
    }

    #[test]
    fn iter_reports_row_major_coordinates() {
        let grid = Grid::new(2, 2, 'x');
        let coords: Vec<_> = grid.iter().map(|(coord, _)| coord).collect();
        assert_eq!(
            coords,
            vec![
                Coordinate::new(0, 0),
                Coordinate::new(1, 0),
                Coordinate::new(0, 1),
                Coordinate::new(1, 1),
            ]
        );
        assert_eq!(grid.rows().count(), 2);
    }

    #[test]
    fn offsets_and_coordinates_convert_both_ways() {
        let grid = Grid::new(3, 2, 0u8);
        assert_eq!(grid.index_of(Coordinate::new(2, 1)), Some(5));
        assert_eq!(grid.coordinate_of(5), Some(Coordinate::new(2, 1)));
        assert_eq!(grid.index_of(Coordinate::new(3, 0)), None);
        assert_eq!(grid.index_of(Coordinate::new(0, -1)), None);
        assert_eq!(grid.coordinate_of(6), None);
    }

    #[test]
    #[should_panic(expected = "outside")]
    fn coordinate_index_outside_grid_panics() {
        let grid = Grid::new(1, 1, 0i32);
        let _value: i32 = grid[Coordinate::new(1, 0)];
    }
}
