//! Placement and collision checks
//!
//! Everything here is a pure query: the board is only borrowed, so calling
//! a check any number of times never changes the outcome of the next one.

use crate::grid::{Grid, Point};

/// Anything that occupies a set of board cells
pub trait Footprint {
    /// Absolute cells covered at the current position
    fn cells(&self) -> Vec<Point>;
}

/// Check whether `entity`, moved by (dx, dy), fits on the board
///
/// Horizontal overflow and anything at or below the floor is illegal.
/// Cells above the top row are legal so pieces may spawn partially hidden.
pub fn can_place<T: Copy, E: Footprint + ?Sized>(
    board: &Grid<T>,
    entity: &E,
    dx: i32,
    dy: i32,
) -> bool {
    entity.cells().into_iter().all(|cell| {
        let target = cell.offset(dx, dy);
        if target.x < 0 || target.x >= board.width() as i32 {
            return false;
        }
        if target.y >= board.height() as i32 {
            return false;
        }
        if target.y < 0 {
            return true;
        }
        !board.is_occupied(target.x, target.y)
    })
}

/// Check whether a point lies outside a `width` x `height` area
pub fn hits_wall(width: usize, height: usize, point: Point) -> bool {
    point.x < 0 || point.y < 0 || point.x >= width as i32 || point.y >= height as i32
}

/// Check whether a new head position runs into the body
///
/// On a plain move the tail vacates its cell in the same tick, so it is
/// excluded. When the move grows the snake the tail stays and counts.
pub fn hits_body<'a, I>(segments: I, next_head: Point, growing: bool) -> bool
where
    I: IntoIterator<Item = &'a Point>,
    I::IntoIter: ExactSizeIterator,
{
    let segments = segments.into_iter();
    let checked = if growing {
        segments.len()
    } else {
        segments.len().saturating_sub(1)
    };
    segments.take(checked).any(|segment| *segment == next_head)
}
