//! Scoring
//!
//! Chaos Drop rewards a messy stack: every lock is scored from the surface
//! shape of the settled board and the holes buried in it, minus a penalty
//! for each row that got cleared. Snake scoring is just the snake's length.

use crate::grid::Grid;

/// Points lost for every cleared row
pub const CLEAR_PENALTY: u64 = 2;
/// Points per buried hole
pub const HOLE_WEIGHT: u32 = 3;

/// Surface analysis of a settled board
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardAnalysis {
    pub heights: Vec<u32>,
    pub total_height: u32,
    pub bumpiness: u32,
    pub holes: u32,
    /// Points this board is worth on its own, never below 1
    pub chaos_score: u32,
}

/// Height of each column, measured from the floor to its highest block
pub fn column_heights<T: Copy>(board: &Grid<T>) -> Vec<u32> {
    let height = board.height();
    (0..board.width() as i32)
        .map(|x| {
            (0..height as i32)
                .find(|&y| board.is_occupied(x, y))
                .map_or(0, |y| (height as i32 - y) as u32)
        })
        .collect()
}

/// Count empty cells that have a block somewhere above them in their column
pub fn count_holes<T: Copy>(board: &Grid<T>) -> u32 {
    let mut holes = 0;
    for x in 0..board.width() as i32 {
        let mut covered = false;
        for y in 0..board.height() as i32 {
            if board.is_occupied(x, y) {
                covered = true;
            } else if covered {
                holes += 1;
            }
        }
    }
    holes
}

/// Analyze a board after a lock
pub fn analyze<T: Copy>(board: &Grid<T>) -> BoardAnalysis {
    let heights = column_heights(board);
    let total_height: u32 = heights.iter().sum();
    let bumpiness: u32 = heights.windows(2).map(|w| w[0].abs_diff(w[1])).sum();
    let holes = count_holes(board);

    // round(surface / 2) with halves rounding up, as integers
    let surface = total_height + bumpiness;
    let chaos_score = ((surface + 1) / 2 + holes * HOLE_WEIGHT).max(1);

    BoardAnalysis {
        heights,
        total_height,
        bumpiness,
        holes,
        chaos_score,
    }
}

/// Running Chaos Drop score
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChaosScore {
    pub points: u64,
    pub lines_cleared: u32,
    pub placements: u32,
}

impl ChaosScore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one lock, returns the signed change in points
    pub fn add_lock(&mut self, analysis: &BoardAnalysis, cleared_rows: usize) -> i64 {
        let before = self.points as i64;
        let delta = analysis.chaos_score as i64 - (cleared_rows as u64 * CLEAR_PENALTY) as i64;
        self.points = (before + delta).max(0) as u64;
        self.lines_cleared += cleared_rows as u32;
        self.placements += 1;
        self.points as i64 - before
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Cell;

    fn board_from(rows: &[&str]) -> Grid<u8> {
        let mut board = Grid::new(rows[0].len(), rows.len());
        for (y, row) in rows.iter().enumerate() {
            for (x, c) in row.chars().enumerate() {
                if c == '#' {
                    board.set(x as i32, y as i32, Cell::Filled(1));
                }
            }
        }
        board
    }

    #[test]
    fn test_empty_board_scores_minimum() {
        let board: Grid<u8> = Grid::new(10, 18);
        let analysis = analyze(&board);
        assert_eq!(analysis.total_height, 0);
        assert_eq!(analysis.bumpiness, 0);
        assert_eq!(analysis.holes, 0);
        assert_eq!(analysis.chaos_score, 1);
    }

    #[test]
    fn test_heights_bumpiness_holes() {
        let board = board_from(&[
            "....", //
            ".#..", //
            ".#.#", //
            "#..#", //
        ]);
        let analysis = analyze(&board);
        assert_eq!(analysis.heights, vec![1, 3, 0, 2]);
        assert_eq!(analysis.total_height, 6);
        assert_eq!(analysis.bumpiness, 2 + 3 + 2);
        assert_eq!(analysis.holes, 1);
        // round(13 / 2) + 3 = 7 + 3
        assert_eq!(analysis.chaos_score, 10);
    }

    #[test]
    fn test_running_score_never_negative() {
        let mut score = ChaosScore::new();
        let analysis = BoardAnalysis {
            chaos_score: 1,
            ..BoardAnalysis::default()
        };
        let delta = score.add_lock(&analysis, 4);
        assert_eq!(score.points, 0);
        assert_eq!(delta, 0);
        assert_eq!(score.lines_cleared, 4);
        assert_eq!(score.placements, 1);
    }

    #[test]
    fn test_clear_penalty_subtracts() {
        let mut score = ChaosScore {
            points: 20,
            ..ChaosScore::default()
        };
        let analysis = BoardAnalysis {
            chaos_score: 5,
            ..BoardAnalysis::default()
        };
        assert_eq!(score.add_lock(&analysis, 2), 1);
        assert_eq!(score.points, 21);
    }
}
