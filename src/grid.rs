//! Board grid and geometry primitives shared by both games
//!
//! Coordinates follow screen order: `x` grows rightward, `y` grows downward,
//! row 0 is the top of the board.

/// A cell coordinate on (or near) the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// This point moved by (dx, dy)
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// A cell on the board - either empty or holding an occupant tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cell<T> {
    #[default]
    Empty,
    Filled(T),
}

impl<T> Cell<T> {
    pub fn is_filled(&self) -> bool {
        matches!(self, Cell::Filled(_))
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }
}

/// Fixed-size grid of settled cells
///
/// The grid only knows what is permanently on the board. Moving entities
/// (the falling piece, the snake) are tracked by their controllers and
/// composited with [`Grid::merged`] when needed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid<T> {
    width: usize,
    height: usize,
    /// Stored as [row][col], row 0 is the top
    cells: Vec<Vec<Cell<T>>>,
}

impl<T: Copy> Grid<T> {
    /// Create a new empty grid
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![vec![Cell::Empty; width]; height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Check if a coordinate lies on the board
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    /// Check if an in-bounds cell is occupied
    ///
    /// Callers must bounds-check first.
    pub fn is_occupied(&self, x: i32, y: i32) -> bool {
        debug_assert!(self.in_bounds(x, y), "is_occupied({x}, {y}) out of bounds");
        self.cells[y as usize][x as usize].is_filled()
    }

    /// Get the cell at (x, y), None if out of bounds
    #[cfg(test)]
    pub fn get(&self, x: i32, y: i32) -> Option<Cell<T>> {
        if !self.in_bounds(x, y) {
            return None;
        }
        Some(self.cells[y as usize][x as usize])
    }

    /// Set a cell, returns false if out of bounds
    pub fn set(&mut self, x: i32, y: i32, cell: Cell<T>) -> bool {
        if !self.in_bounds(x, y) {
            return false;
        }
        self.cells[y as usize][x as usize] = cell;
        true
    }

    /// Rows from top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[Cell<T>]> {
        self.cells.iter().map(|row| row.as_slice())
    }

    /// Number of filled cells on the whole board
    #[cfg(test)]
    pub fn filled_count(&self) -> usize {
        self.cells
            .iter()
            .map(|row| row.iter().filter(|cell| cell.is_filled()).count())
            .sum()
    }

    /// Return a copy of this grid with `cells` marked as `tag`
    ///
    /// Cells outside the board (a piece still poking above the top) are
    /// skipped. The receiver is left untouched.
    pub fn merged<I>(&self, cells: I, tag: T) -> Self
    where
        I: IntoIterator<Item = Point>,
    {
        let mut next = self.clone();
        for point in cells {
            next.set(point.x, point.y, Cell::Filled(tag));
        }
        next
    }

    /// Remove every full row, returning the compacted grid and the count
    ///
    /// Surviving rows keep their relative order and sink to the bottom; the
    /// same number of empty rows is inserted at the top.
    pub fn clear_full_rows(&self) -> (Self, usize) {
        let remaining: Vec<Vec<Cell<T>>> = self
            .cells
            .iter()
            .filter(|row| !row.iter().all(|cell| cell.is_filled()))
            .cloned()
            .collect();
        let cleared = self.height - remaining.len();

        let mut cells = vec![vec![Cell::Empty; self.width]; cleared];
        cells.extend(remaining);

        (
            Self {
                width: self.width,
                height: self.height,
                cells,
            },
            cleared,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fill_row(grid: &mut Grid<u8>, y: i32, tag: u8) {
        for x in 0..grid.width() as i32 {
            grid.set(x, y, Cell::Filled(tag));
        }
    }

    #[test]
    fn test_new_grid_is_empty() {
        let grid: Grid<u8> = Grid::new(10, 18);
        assert_eq!(grid.filled_count(), 0);
        assert_eq!(grid.rows().count(), 18);
        assert!(grid.rows().all(|row| row.len() == 10));
    }

    #[test]
    fn test_bounds() {
        let grid: Grid<u8> = Grid::new(18, 16);
        assert!(grid.in_bounds(0, 0));
        assert!(grid.in_bounds(17, 15));
        assert!(!grid.in_bounds(-1, 0));
        assert!(!grid.in_bounds(0, -1));
        assert!(!grid.in_bounds(18, 0));
        assert!(!grid.in_bounds(0, 16));
        assert_eq!(grid.get(18, 0), None);
    }

    #[test]
    fn test_set_and_get() {
        let mut grid = Grid::new(4, 4);
        assert!(grid.set(1, 2, Cell::Filled(7u8)));
        assert_eq!(grid.get(1, 2), Some(Cell::Filled(7)));
        assert!(grid.is_occupied(1, 2));
        assert!(!grid.is_occupied(2, 1));
        assert!(!grid.set(4, 0, Cell::Filled(1)));
    }

    #[test]
    fn test_merged_leaves_source_untouched() {
        let grid: Grid<u8> = Grid::new(5, 5);
        let merged = grid.merged([Point::new(0, 4), Point::new(1, 4), Point::new(2, -1)], 3);
        assert_eq!(grid.filled_count(), 0);
        // The above-top block is dropped
        assert_eq!(merged.filled_count(), 2);
        assert_eq!(merged.get(1, 4), Some(Cell::Filled(3)));
    }

    #[test]
    fn test_clear_rows_two_and_five() {
        let mut grid: Grid<u8> = Grid::new(4, 8);
        fill_row(&mut grid, 2, 1);
        fill_row(&mut grid, 5, 1);
        // Partial rows tagged by their original index
        grid.set(0, 1, Cell::Filled(10));
        grid.set(1, 3, Cell::Filled(30));
        grid.set(2, 4, Cell::Filled(40));
        grid.set(3, 7, Cell::Filled(70));

        let (cleared, count) = grid.clear_full_rows();
        assert_eq!(count, 2);

        // Two fresh empty rows on top
        assert!(cleared.rows().take(2).all(|row| row.iter().all(Cell::is_empty)));
        // Rows 0,1,3,4,6,7 keep their order in rows 2..8
        assert_eq!(cleared.get(0, 3), Some(Cell::Filled(10)));
        assert_eq!(cleared.get(1, 4), Some(Cell::Filled(30)));
        assert_eq!(cleared.get(2, 5), Some(Cell::Filled(40)));
        assert_eq!(cleared.get(3, 7), Some(Cell::Filled(70)));
        assert_eq!(cleared.filled_count(), 4);
        // Source grid unchanged
        assert_eq!(grid.filled_count(), 12);
    }

    #[test]
    fn test_clear_without_full_rows() {
        let mut grid: Grid<u8> = Grid::new(3, 3);
        grid.set(0, 2, Cell::Filled(1));
        let (cleared, count) = grid.clear_full_rows();
        assert_eq!(count, 0);
        assert_eq!(cleared, grid);
    }
}
