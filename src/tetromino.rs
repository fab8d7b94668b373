//! Chaos Drop piece definitions
//!
//! The seven canonical shapes with every rotation they cycle through. Block
//! coordinates are raw (not yet normalized); [`normalize`] shifts them so
//! the bounding box starts at (0, 0).

use crate::grid::Point;
use ratatui::style::Color;

/// Four block offsets describing one rotation of a piece
pub type Shape = [Point; 4];

const fn p(x: i32, y: i32) -> Point {
    Point::new(x, y)
}

const I_ROTATIONS: [Shape; 2] = [
    [p(0, 0), p(1, 0), p(2, 0), p(3, 0)],
    [p(2, -1), p(2, 0), p(2, 1), p(2, 2)],
];

const J_ROTATIONS: [Shape; 4] = [
    [p(0, 0), p(0, 1), p(1, 1), p(2, 1)],
    [p(1, -1), p(1, 0), p(1, 1), p(0, 1)],
    [p(0, 0), p(1, 0), p(2, 0), p(2, 1)],
    [p(0, -1), p(1, -1), p(1, 0), p(1, 1)],
];

const L_ROTATIONS: [Shape; 4] = [
    [p(2, 0), p(0, 1), p(1, 1), p(2, 1)],
    [p(1, -1), p(1, 0), p(1, 1), p(2, 1)],
    [p(0, 0), p(1, 0), p(2, 0), p(0, 1)],
    [p(0, -1), p(1, -1), p(1, 0), p(1, 1)],
];

const O_ROTATIONS: [Shape; 1] = [[p(1, 0), p(2, 0), p(1, 1), p(2, 1)]];

const S_ROTATIONS: [Shape; 2] = [
    [p(1, 0), p(2, 0), p(0, 1), p(1, 1)],
    [p(1, -1), p(1, 0), p(2, 0), p(2, 1)],
];

const T_ROTATIONS: [Shape; 4] = [
    [p(1, 0), p(0, 1), p(1, 1), p(2, 1)],
    [p(1, -1), p(1, 0), p(1, 1), p(2, 0)],
    [p(0, 0), p(1, 0), p(2, 0), p(1, 1)],
    [p(0, 0), p(1, -1), p(1, 0), p(1, 1)],
];

const Z_ROTATIONS: [Shape; 2] = [
    [p(0, 0), p(1, 0), p(1, 1), p(2, 1)],
    [p(2, -1), p(1, 0), p(2, 0), p(1, 1)],
];

/// The 7 piece types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    I,
    J,
    L,
    O,
    S,
    T,
    Z,
}

impl PieceKind {
    /// Get the color for this piece
    pub fn color(&self) -> Color {
        match self {
            PieceKind::I => Color::Cyan,
            PieceKind::J => Color::Blue,
            PieceKind::L => Color::Rgb(255, 165, 0), // Orange
            PieceKind::O => Color::Yellow,
            PieceKind::S => Color::Green,
            PieceKind::T => Color::Magenta,
            PieceKind::Z => Color::Red,
        }
    }

    pub fn all() -> [PieceKind; 7] {
        [
            PieceKind::I,
            PieceKind::J,
            PieceKind::L,
            PieceKind::O,
            PieceKind::S,
            PieceKind::T,
            PieceKind::Z,
        ]
    }

    /// Every rotation this piece cycles through, in order
    pub fn rotations(&self) -> &'static [Shape] {
        match self {
            PieceKind::I => &I_ROTATIONS,
            PieceKind::J => &J_ROTATIONS,
            PieceKind::L => &L_ROTATIONS,
            PieceKind::O => &O_ROTATIONS,
            PieceKind::S => &S_ROTATIONS,
            PieceKind::T => &T_ROTATIONS,
            PieceKind::Z => &Z_ROTATIONS,
        }
    }

    /// Normalized shape for a rotation index (wraps around)
    pub fn shape(&self, rotation: usize) -> Shape {
        let rotations = self.rotations();
        normalize(rotations[rotation % rotations.len()])
    }
}

/// Shift a shape so its bounding box starts at (0, 0)
pub fn normalize(shape: Shape) -> Shape {
    let min_x = shape.iter().map(|b| b.x).min().unwrap_or(0);
    let min_y = shape.iter().map(|b| b.y).min().unwrap_or(0);
    shape.map(|b| b.offset(-min_x, -min_y))
}

/// Width of a shape's bounding box
pub fn shape_width(shape: &Shape) -> i32 {
    shape.iter().map(|b| b.x).max().unwrap_or(0) + 1
}

/// Direction for rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationDirection {
    Clockwise,
    CounterClockwise,
}

impl RotationDirection {
    /// Step through the rotation table in this direction
    pub fn apply(&self, index: usize, count: usize) -> usize {
        match self {
            RotationDirection::Clockwise => (index + 1) % count,
            RotationDirection::CounterClockwise => (index + count - 1) % count,
        }
    }
}
