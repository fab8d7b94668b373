//! Active falling piece

use crate::collision::{Footprint, can_place};
use crate::grid::{Grid, Point};
use crate::tetromino::{PieceKind, RotationDirection, Shape, shape_width};

/// A falling piece
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    pub kind: PieceKind,
    /// Index into the kind's rotation table
    pub rotation: usize,
    /// Normalized block offsets for the current rotation
    pub shape: Shape,
    /// Anchor of the shape's bounding box on the board
    pub x: i32,
    pub y: i32,
}

impl Piece {
    /// Create a piece centred horizontally on the top row
    pub fn new(kind: PieceKind, rotation: usize, board_width: usize) -> Self {
        let rotation = rotation % kind.rotations().len();
        let shape = kind.shape(rotation);
        let x = (board_width as i32 - shape_width(&shape)).div_euclid(2);
        Self {
            kind,
            rotation,
            shape,
            x,
            y: 0,
        }
    }

    /// Absolute board positions of all 4 blocks
    pub fn block_positions(&self) -> [Point; 4] {
        self.shape.map(|b| b.offset(self.x, self.y))
    }

    pub fn width(&self) -> i32 {
        shape_width(&self.shape)
    }

    /// A copy moved by (dx, dy)
    pub fn shifted(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self.clone()
        }
    }

    /// Rotated copy, or None if the rotated shape cannot be placed
    ///
    /// The new shape is re-normalized and pushed back inside the side walls;
    /// there are no wall kicks beyond that clamp.
    pub fn rotated<T: Copy>(&self, direction: RotationDirection, board: &Grid<T>) -> Option<Self> {
        let count = self.kind.rotations().len();
        let rotation = direction.apply(self.rotation, count);
        let mut candidate = Self {
            rotation,
            shape: self.kind.shape(rotation),
            ..self.clone()
        };
        let max_x = board.width() as i32 - candidate.width();
        candidate.x = candidate.x.min(max_x).max(0);
        can_place(board, &candidate, 0, 0).then_some(candidate)
    }

    /// Largest downward offset that keeps the piece legal
    pub fn drop_distance<T: Copy>(&self, board: &Grid<T>) -> i32 {
        let mut distance = 0;
        while can_place(board, self, 0, distance + 1) {
            distance += 1;
        }
        distance
    }

    /// Where the piece would land if hard dropped
    pub fn ghost<T: Copy>(&self, board: &Grid<T>) -> Self {
        self.shifted(0, self.drop_distance(board))
    }
}

impl Footprint for Piece {
    fn cells(&self) -> Vec<Point> {
        self.block_positions().to_vec()
    }
}
