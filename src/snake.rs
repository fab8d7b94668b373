//! Snake game logic
//!
//! Two variants share one controller. Classic snake chases stationary food
//! and grows when it eats. Hunter snake is chased instead: the food walks
//! toward the head on its own timer, speeding up as it goes, and every catch
//! costs the snake two segments. The hunter variant also grows the snake on a
//! fixed schedule so there is always something to lose.

use crate::collision::{hits_body, hits_wall};
use crate::grid::{Grid, Point};
use crate::randomizer::Randomizer;
use crate::run::{Action, ArcadeGame, RunClock, RunExtras, RunStatus, Snapshot, Ticker};
use std::collections::VecDeque;
use std::time::Duration;
use tracing::{debug, info};

/// Standard snake board dimensions
pub const SNAKE_WIDTH: usize = 18;
pub const SNAKE_HEIGHT: usize = 16;

/// Segments lost when the hunter catches the snake
const CATCH_PENALTY: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// (dx, dy) with y growing downward
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub fn opposite(&self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SnakeVariant {
    /// Stationary food, eating grows the snake
    #[default]
    Classic,
    /// Food hunts the snake, catches shrink it, growth is forced
    Hunter,
}

/// Board size and timings for a snake run
#[derive(Debug, Clone)]
pub struct SnakeConfig {
    pub variant: SnakeVariant,
    pub width: usize,
    pub height: usize,
    pub move_interval: Duration,
    pub food_initial_delay: Duration,
    pub food_min_delay: Duration,
    /// How much faster the hunter gets with every step it takes
    pub food_acceleration_step: Duration,
    pub growth_interval: Duration,
}

impl SnakeConfig {
    pub fn classic() -> Self {
        Self {
            variant: SnakeVariant::Classic,
            width: SNAKE_WIDTH,
            height: SNAKE_HEIGHT,
            move_interval: Duration::from_millis(180),
            food_initial_delay: Duration::from_millis(520),
            food_min_delay: Duration::from_millis(220),
            food_acceleration_step: Duration::from_millis(4),
            growth_interval: Duration::from_millis(5000),
        }
    }

    pub fn hunter() -> Self {
        Self {
            variant: SnakeVariant::Hunter,
            ..Self::classic()
        }
    }
}

impl Default for SnakeConfig {
    fn default() -> Self {
        Self::classic()
    }
}

/// What to draw in a cell of the composited board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnakeTile {
    Head,
    Body,
    Food,
}

/// Snake game state
#[derive(Debug, Clone)]
pub struct SnakeGame {
    config: SnakeConfig,
    randomizer: Randomizer,
    /// Head first
    segments: VecDeque<Point>,
    /// Direction of the last committed move
    heading: Direction,
    /// Direction the next move will take
    queued: Direction,
    food: Option<Point>,
    status: RunStatus,
    clock: RunClock,
    move_timer: Ticker,
    food_timer: Ticker,
    growth_timer: Ticker,
    best_length: usize,
    foods_eaten: u32,
    catches: u32,
    snapshot: Option<Snapshot>,
}

impl SnakeGame {
    pub fn new(config: SnakeConfig) -> Self {
        Self::with_randomizer(config, Randomizer::new())
    }

    #[cfg(test)]
    pub fn with_seed(config: SnakeConfig, seed: u64) -> Self {
        Self::with_randomizer(config, Randomizer::with_seed(seed))
    }

    fn with_randomizer(config: SnakeConfig, randomizer: Randomizer) -> Self {
        let mut game = Self {
            move_timer: Ticker::new(config.move_interval),
            food_timer: Ticker::new(config.food_initial_delay),
            growth_timer: Ticker::new(config.growth_interval),
            config,
            randomizer,
            segments: VecDeque::new(),
            heading: Direction::Right,
            queued: Direction::Right,
            food: None,
            status: RunStatus::Idle,
            clock: RunClock::new(),
            best_length: 0,
            foods_eaten: 0,
            catches: 0,
            snapshot: None,
        };
        game.reset();
        game
    }

    /// Put everything back to its starting position
    fn reset(&mut self) {
        let origin = Point::new(
            (self.config.width / 2) as i32,
            (self.config.height / 2) as i32,
        );
        self.segments = (0..3).map(|i| origin.offset(-i, 0)).collect();
        self.heading = Direction::Right;
        self.queued = Direction::Right;
        self.food = self.randomizer.free_cell(
            self.config.width,
            self.config.height,
            &self.segments,
        );
        self.clock = RunClock::new();
        self.move_timer = Ticker::new(self.config.move_interval);
        self.food_timer = Ticker::new(self.config.food_initial_delay);
        self.growth_timer = Ticker::new(self.config.growth_interval);
        self.best_length = self.segments.len();
        self.foods_eaten = 0;
        self.catches = 0;
        self.snapshot = None;
    }

    pub fn config(&self) -> &SnakeConfig {
        &self.config
    }

    pub fn variant(&self) -> SnakeVariant {
        self.config.variant
    }

    pub fn segments(&self) -> &VecDeque<Point> {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn food(&self) -> Option<Point> {
        self.food
    }

    pub fn heading(&self) -> Direction {
        self.heading
    }

    pub fn best_length(&self) -> usize {
        self.best_length
    }

    pub fn foods_eaten(&self) -> u32 {
        self.foods_eaten
    }

    pub fn catches(&self) -> u32 {
        self.catches
    }

    /// Current hunter step delay
    pub fn food_delay(&self) -> Duration {
        self.food_timer.interval()
    }

    /// Request a new direction, rejected if it would reverse into the neck
    pub fn steer(&mut self, direction: Direction) -> bool {
        if self.segments.len() > 1 && direction == self.heading.opposite() {
            return false;
        }
        self.queued = direction;
        true
    }

    /// Snake, food and hunter composited for drawing
    pub fn tiles(&self) -> Grid<SnakeTile> {
        let mut grid = Grid::new(self.config.width, self.config.height);
        grid = grid.merged(self.segments.iter().skip(1).copied(), SnakeTile::Body);
        if let Some(food) = self.food {
            grid = grid.merged([food], SnakeTile::Food);
        }
        if let Some(&head) = self.segments.front() {
            grid = grid.merged([head], SnakeTile::Head);
        }
        grid
    }

    /// One movement tick
    fn advance(&mut self) {
        let Some(&head) = self.segments.front() else {
            return;
        };
        self.heading = self.queued;
        let (dx, dy) = self.heading.delta();
        let next = head.offset(dx, dy);

        if hits_wall(self.config.width, self.config.height, next) {
            debug!(x = next.x, y = next.y, "snake hit the wall");
            self.end_run(self.segments.len() as u64);
            return;
        }

        let food_here = self.food == Some(next);
        let eats = food_here && self.config.variant == SnakeVariant::Classic;
        if hits_body(&self.segments, next, eats) {
            debug!(x = next.x, y = next.y, "snake bit itself");
            self.end_run(self.segments.len() as u64);
            return;
        }

        self.segments.push_front(next);
        if !eats {
            self.segments.pop_back();
        }

        if eats {
            self.foods_eaten += 1;
            self.relocate_food();
            self.track_best();
        } else if food_here {
            // Ran straight into the hunter
            self.caught();
        }
    }

    /// One hunter tick: step toward the head, catch on contact
    fn hunt(&mut self) {
        let (Some(food), Some(&head)) = (self.food, self.segments.front()) else {
            return;
        };
        let next = step_toward(food, head, self.config.width, self.config.height);
        if self.segments.contains(&next) {
            self.caught();
            return;
        }
        self.food = Some(next);
        let faster = self
            .food_timer
            .interval()
            .saturating_sub(self.config.food_acceleration_step)
            .max(self.config.food_min_delay);
        self.food_timer.set_interval(faster);
    }

    /// Forced growth: the tail is duplicated and unfolds on the next move
    fn grow(&mut self) {
        if let Some(&tail) = self.segments.back() {
            self.segments.push_back(tail);
            self.track_best();
        }
    }

    fn caught(&mut self) {
        self.catches += 1;
        let remaining = self.segments.len().saturating_sub(CATCH_PENALTY);
        self.segments.truncate(remaining);
        debug!(length = remaining, catches = self.catches, "hunter caught the snake");
        if remaining == 0 {
            self.end_run(0);
            return;
        }
        self.relocate_food();
        self.food_timer.set_interval(self.config.food_initial_delay);
        self.food_timer.reset();
    }

    fn relocate_food(&mut self) {
        self.food = self.randomizer.free_cell(
            self.config.width,
            self.config.height,
            &self.segments,
        );
    }

    fn track_best(&mut self) {
        self.best_length = self.best_length.max(self.segments.len());
    }

    fn end_run(&mut self, score: u64) {
        self.status = RunStatus::Over;
        self.snapshot = Some(Snapshot {
            score,
            elapsed_secs: self.clock.seconds(),
            extras: RunExtras::Snake {
                best_length: self.best_length,
                foods_eaten: self.foods_eaten,
                catches: self.catches,
            },
        });
        info!(
            variant = ?self.config.variant,
            score,
            elapsed = self.clock.seconds(),
            "snake run over"
        );
    }
}

impl ArcadeGame for SnakeGame {
    fn start(&mut self) {
        self.reset();
        self.status = RunStatus::Running;
        info!(variant = ?self.config.variant, "snake run started");
    }

    fn update(&mut self, dt: Duration) {
        if self.status != RunStatus::Running {
            return;
        }
        self.clock.advance(dt);
        self.move_timer.advance(dt);
        if self.config.variant == SnakeVariant::Hunter {
            self.growth_timer.advance(dt);
            self.food_timer.advance(dt);
        }

        while self.status == RunStatus::Running && self.move_timer.fire() {
            self.advance();
        }
        while self.status == RunStatus::Running && self.growth_timer.fire() {
            self.grow();
        }
        while self.status == RunStatus::Running && self.food_timer.fire() {
            self.hunt();
        }
    }

    fn apply(&mut self, action: Action) {
        let direction = match action {
            Action::Up => Direction::Up,
            Action::Down => Direction::Down,
            Action::Left => Direction::Left,
            Action::Right => Direction::Right,
            Action::Restart => {
                if self.status != RunStatus::Running {
                    self.start();
                }
                return;
            }
            _ => return,
        };
        match self.status {
            RunStatus::Over => {}
            RunStatus::Idle => {
                self.start();
                self.steer(direction);
            }
            RunStatus::Running => {
                self.steer(direction);
            }
        }
    }

    fn status(&self) -> RunStatus {
        self.status
    }

    fn score(&self) -> u64 {
        match &self.snapshot {
            Some(snapshot) => snapshot.score,
            None => self.segments.len() as u64,
        }
    }

    fn elapsed_secs(&self) -> u64 {
        self.clock.seconds()
    }

    fn snapshot(&self) -> Option<&Snapshot> {
        self.snapshot.as_ref()
    }
}

/// Move one cell toward `target` along the dominant axis, staying on the board
///
/// Ties go horizontal.
fn step_toward(from: Point, target: Point, width: usize, height: usize) -> Point {
    let dx = target.x - from.x;
    let dy = target.y - from.y;
    if dx == 0 && dy == 0 {
        return from;
    }
    let (sx, sy) = if dx.abs() >= dy.abs() {
        (dx.signum(), 0)
    } else {
        (0, dy.signum())
    };
    Point::new(
        (from.x + sx).clamp(0, width as i32 - 1),
        (from.y + sy).clamp(0, height as i32 - 1),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    const TICK: Duration = Duration::from_millis(180);

    fn running(config: SnakeConfig) -> SnakeGame {
        let mut game = SnakeGame::with_seed(config, 11);
        game.start();
        game
    }

    fn place(game: &mut SnakeGame, segments: &[(i32, i32)], heading: Direction, food: Option<(i32, i32)>) {
        game.segments = segments.iter().map(|&(x, y)| Point::new(x, y)).collect();
        game.heading = heading;
        game.queued = heading;
        game.food = food.map(|(x, y)| Point::new(x, y));
        game.best_length = game.segments.len();
    }

    #[test]
    fn test_initial_layout() {
        let game = SnakeGame::with_seed(SnakeConfig::classic(), 1);
        assert_eq!(game.status(), RunStatus::Idle);
        let expected: Vec<Point> = vec![Point::new(9, 8), Point::new(8, 8), Point::new(7, 8)];
        assert_eq!(game.segments().iter().copied().collect::<Vec<_>>(), expected);
        let food = game.food().unwrap();
        assert!(!game.segments().contains(&food));
    }

    #[test]
    fn test_wall_collision_ends_run() {
        let mut game = running(SnakeConfig::classic());
        place(&mut game, &[(0, 5), (1, 5), (2, 5)], Direction::Left, Some((10, 10)));

        game.update(TICK);

        assert_eq!(game.status(), RunStatus::Over);
        let snapshot = game.snapshot().unwrap();
        assert_eq!(snapshot.score, 3);
        // Frozen in place
        assert_eq!(game.segments()[0], Point::new(0, 5));
    }

    #[test]
    fn test_self_bite_on_the_biting_tick_only() {
        let mut game = running(SnakeConfig::classic());
        place(
            &mut game,
            &[(5, 5), (4, 5), (3, 5), (2, 5), (1, 5)],
            Direction::Right,
            Some((15, 0)),
        );

        assert!(game.steer(Direction::Down));
        game.update(TICK);
        assert_eq!(game.status(), RunStatus::Running);

        assert!(game.steer(Direction::Left));
        game.update(TICK);
        assert_eq!(game.status(), RunStatus::Running);

        // (4, 5) is still part of the body, not the tail
        assert!(game.steer(Direction::Up));
        game.update(TICK);
        assert_eq!(game.status(), RunStatus::Over);
        assert_eq!(game.snapshot().unwrap().score, 5);
    }

    #[test]
    fn test_length_four_loop_bites_after_forced_growth() {
        let mut game = running(SnakeConfig::classic());
        place(&mut game, &[(2, 2), (3, 2), (3, 3), (2, 3)], Direction::Left, Some((15, 0)));
        assert!(game.steer(Direction::Down));

        // Tail duplicated in place, so (2, 3) is no longer the vacating tail
        game.grow();
        assert_eq!(game.len(), 5);
        game.update(TICK);
        assert_eq!(game.status(), RunStatus::Over);
    }

    #[test]
    fn test_chasing_the_tail_is_allowed() {
        let mut game = running(SnakeConfig::classic());
        place(&mut game, &[(2, 2), (3, 2), (3, 3), (2, 3)], Direction::Left, Some((15, 0)));
        assert!(game.steer(Direction::Down));
        game.update(TICK);
        assert_eq!(game.status(), RunStatus::Running);
        assert_eq!(game.segments()[0], Point::new(2, 3));
    }

    #[test]
    fn test_eating_grows_and_moves_food() {
        let mut game = running(SnakeConfig::classic());
        place(&mut game, &[(5, 5), (4, 5), (3, 5)], Direction::Right, Some((6, 5)));

        game.update(TICK);

        assert_eq!(game.status(), RunStatus::Running);
        assert_eq!(game.len(), 4);
        assert_eq!(game.segments()[0], Point::new(6, 5));
        assert_eq!(game.segments()[3], Point::new(3, 5));
        assert_eq!(game.foods_eaten(), 1);
        assert_eq!(game.best_length(), 4);
        let food = game.food().unwrap();
        assert!(!game.segments().contains(&food));
    }

    #[test]
    fn test_reverse_rejected() {
        let mut game = running(SnakeConfig::classic());
        assert!(!game.steer(Direction::Left));
        game.update(TICK);
        assert_eq!(game.heading(), Direction::Right);
        assert_eq!(game.segments()[0], Point::new(10, 8));
    }

    #[test]
    fn test_quick_turn_cannot_reverse_into_neck() {
        let mut game = running(SnakeConfig::classic());
        // Up is queued but not yet taken, so Left is still a reversal
        assert!(game.steer(Direction::Up));
        assert!(!game.steer(Direction::Left));
        game.update(TICK);
        assert_eq!(game.heading(), Direction::Up);
    }

    #[test]
    fn test_single_segment_may_reverse() {
        let mut game = running(SnakeConfig::classic());
        place(&mut game, &[(5, 5)], Direction::Right, Some((15, 0)));
        assert!(game.steer(Direction::Left));
    }

    #[test]
    fn test_hunter_steps_toward_head_and_speeds_up() {
        let mut game = running(SnakeConfig::hunter());
        place(&mut game, &[(5, 5), (4, 5), (3, 5)], Direction::Right, Some((12, 7)));

        game.hunt();

        assert_eq!(game.food(), Some(Point::new(11, 7)));
        assert_eq!(game.food_delay(), Duration::from_millis(516));
    }

    #[test]
    fn test_hunter_delay_floors() {
        let mut game = running(SnakeConfig::hunter());
        place(&mut game, &[(0, 0), (0, 1), (0, 2)], Direction::Right, Some((17, 15)));
        game.food_timer.set_interval(Duration::from_millis(222));
        game.hunt();
        assert_eq!(game.food_delay(), Duration::from_millis(220));
    }

    #[test]
    fn test_hunter_catch_costs_two_segments() {
        let mut game = running(SnakeConfig::hunter());
        place(
            &mut game,
            &[(5, 5), (4, 5), (3, 5), (2, 5), (1, 5)],
            Direction::Right,
            Some((7, 5)),
        );
        game.food_timer.set_interval(Duration::from_millis(300));

        // Food at (7,5) steps onto (6,5), still free
        game.hunt();
        assert_eq!(game.len(), 5);
        // Next step lands on the head
        game.hunt();

        assert_eq!(game.len(), 3);
        assert_eq!(game.catches(), 1);
        assert_eq!(game.food_delay(), Duration::from_millis(520));
        assert_eq!(game.status(), RunStatus::Running);
        let food = game.food().unwrap();
        assert!(!game.segments().contains(&food));
    }

    #[test]
    fn test_hunter_catch_to_zero_ends_run() {
        let mut game = running(SnakeConfig::hunter());
        place(&mut game, &[(5, 5), (4, 5)], Direction::Right, Some((6, 5)));
        game.hunt();
        assert_eq!(game.status(), RunStatus::Over);
        assert_eq!(game.snapshot().unwrap().score, 0);
        assert!(game.segments().is_empty());
    }

    #[test]
    fn test_head_into_hunter_is_a_catch() {
        let mut game = running(SnakeConfig::hunter());
        place(&mut game, &[(5, 5), (4, 5), (3, 5), (2, 5)], Direction::Right, Some((6, 5)));
        game.advance();
        assert_eq!(game.len(), 2);
        assert_eq!(game.catches(), 1);
    }

    #[test]
    fn test_forced_growth_on_schedule() {
        let config = SnakeConfig {
            move_interval: Duration::from_secs(60),
            food_initial_delay: Duration::from_secs(60),
            ..SnakeConfig::hunter()
        };
        let mut game = running(config);
        game.update(Duration::from_millis(4999));
        assert_eq!(game.len(), 3);
        game.update(Duration::from_millis(1));
        assert_eq!(game.len(), 4);
        assert_eq!(game.best_length(), 4);
    }

    #[test]
    fn test_classic_never_grows_on_timer() {
        let config = SnakeConfig {
            move_interval: Duration::from_secs(60),
            ..SnakeConfig::classic()
        };
        let mut game = running(config);
        let food = game.food();
        game.update(Duration::from_secs(10));
        assert_eq!(game.len(), 3);
        assert_eq!(game.food(), food);
        assert_eq!(game.elapsed_secs(), 10);
    }

    #[test]
    fn test_over_is_frozen_until_restart() {
        let mut game = running(SnakeConfig::classic());
        place(&mut game, &[(17, 5), (16, 5), (15, 5)], Direction::Right, Some((0, 0)));
        game.update(TICK);
        assert_eq!(game.status(), RunStatus::Over);

        let frozen = game.segments().clone();
        game.update(Duration::from_secs(5));
        game.apply(Action::Up);
        assert_eq!(game.segments(), &frozen);
        assert_eq!(game.elapsed_secs(), 0);

        game.apply(Action::Restart);
        assert_eq!(game.status(), RunStatus::Running);
        assert!(game.snapshot().is_none());
        assert_eq!(game.len(), 3);
    }

    #[test]
    fn test_first_direction_key_starts_run() {
        let mut game = SnakeGame::with_seed(SnakeConfig::classic(), 5);
        game.apply(Action::Down);
        assert_eq!(game.status(), RunStatus::Running);
        game.update(TICK);
        assert_eq!(game.segments()[0], Point::new(9, 9));
    }

    #[test]
    fn test_segments_stay_in_bounds_and_unique() {
        let mut game = running(SnakeConfig::classic());
        let turns = [Direction::Down, Direction::Left, Direction::Up, Direction::Right];
        for step in 0..2000 {
            if step % 7 == 0 {
                game.steer(turns[(step / 7) % turns.len()]);
            }
            game.update(TICK);
            if game.status() == RunStatus::Over {
                game.start();
                continue;
            }
            let unique: HashSet<Point> = game.segments().iter().copied().collect();
            assert_eq!(unique.len(), game.len());
            assert!(game
                .segments()
                .iter()
                .all(|p| !hits_wall(SNAKE_WIDTH, SNAKE_HEIGHT, *p)));
        }
    }

    #[test]
    fn test_step_toward() {
        let target = Point::new(5, 5);
        assert_eq!(step_toward(Point::new(9, 6), target, 18, 16), Point::new(8, 6));
        assert_eq!(step_toward(Point::new(5, 1), target, 18, 16), Point::new(5, 2));
        // Tie goes horizontal
        assert_eq!(step_toward(Point::new(7, 7), target, 18, 16), Point::new(6, 7));
        assert_eq!(step_toward(target, target, 18, 16), target);
    }
}
