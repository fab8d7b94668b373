//! Arcade modes: Snake, Hunter Snake, Chaos Drop

use crate::snake::SnakeVariant;

/// Playable games
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArcadeMode {
    #[default]
    Snake,
    HunterSnake,
    ChaosDrop,
}

impl ArcadeMode {
    pub fn name(&self) -> &'static str {
        match self {
            ArcadeMode::Snake => "Snake",
            ArcadeMode::HunterSnake => "Hunter Snake",
            ArcadeMode::ChaosDrop => "Chaos Drop",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ArcadeMode::Snake => "Eat, grow, don't bite yourself",
            ArcadeMode::HunterSnake => "The food hunts you - every catch costs two segments",
            ArcadeMode::ChaosDrop => "Build the ugliest stack you can - clears cost points",
        }
    }

    /// One-line control reminder shown under the board
    pub fn controls(&self) -> &'static str {
        match self {
            ArcadeMode::Snake | ArcadeMode::HunterSnake => "Arrows/WASD steer  R restart  Esc menu",
            ArcadeMode::ChaosDrop => {
                "A/D move  W/X rotate  Q reverse  S soft  Space drop  R restart  Esc menu"
            }
        }
    }

    /// Leaderboard the mode submits to
    ///
    /// Both snake variants share one board.
    pub fn slug(&self) -> &'static str {
        match self {
            ArcadeMode::Snake | ArcadeMode::HunterSnake => "snake",
            ArcadeMode::ChaosDrop => "chaos",
        }
    }

    /// Snake variant for the snake modes
    pub fn snake_variant(&self) -> Option<SnakeVariant> {
        match self {
            ArcadeMode::Snake => Some(SnakeVariant::Classic),
            ArcadeMode::HunterSnake => Some(SnakeVariant::Hunter),
            ArcadeMode::ChaosDrop => None,
        }
    }

    pub fn all() -> &'static [ArcadeMode] {
        &[ArcadeMode::Snake, ArcadeMode::HunterSnake, ArcadeMode::ChaosDrop]
    }
}
