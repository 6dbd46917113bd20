use super::{
    action::Direction,
    config::GameConfig,
    state::{GameState, Position, Snake},
};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;

/// Result of a game tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickOutcome {
    /// Whether the snake ate food this tick
    pub ate_food: bool,
    /// Whether this tick ended the round
    pub game_over: bool,
    /// Whether the round is over after this tick
    pub terminated: bool,
    /// Whether the tick interval changed; the host should re-arm its timer
    pub speed_changed: bool,
}

/// The game engine: owns the state and advances it one tick at a time
pub struct GameEngine {
    config: GameConfig,
    state: GameState,
    rng: StdRng,
}

impl GameEngine {
    /// Create a new game engine with the given configuration
    pub fn new(config: GameConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Create an engine whose food placement is reproducible
    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: GameConfig, mut rng: StdRng) -> Self {
        let state = Self::initial_state(&config, &mut rng);
        info!(
            "new game on a {}x{} grid, tick {} ms",
            state.grid_width, state.grid_height, state.tick_interval_ms
        );
        Self { config, state, rng }
    }

    fn initial_state(config: &GameConfig, rng: &mut StdRng) -> GameState {
        let (cols, rows) = (config.cols(), config.rows());
        let head = Position::new((cols / 2) as i32, (rows / 2) as i32);

        let mut snake = Snake::new(head, Direction::Right, config.initial_snake_length);
        for segment in snake.body.iter_mut() {
            *segment = segment.wrapped(cols, rows);
        }

        let food = Self::spawn_food_avoid_snake(rng, &snake, cols, rows);

        GameState::new(snake, food, cols, rows, config.base_tick_ms)
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Read-only view of the current state
    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[cfg(test)]
    pub(crate) fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    /// Interval the host timer should use for the next tick
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.state.tick_interval_ms)
    }

    /// False once the round is over; the host stops ticking
    pub fn should_continue(&self) -> bool {
        !self.state.game_over
    }

    /// Start a new round, keeping the high score
    pub fn reset(&mut self) {
        let high_score = self.state.high_score;
        self.state = Self::initial_state(&self.config, &mut self.rng);
        self.state.high_score = high_score;
        info!("round started, high score {}", high_score);
    }

    /// Restart after game over; ignored while a round is running
    pub fn restart(&mut self) -> bool {
        if !self.state.game_over {
            return false;
        }
        self.reset();
        true
    }

    /// Request a new heading. Reversals and requests after game over are ignored.
    pub fn set_direction(&mut self, requested: Direction) -> bool {
        if self.state.game_over || self.state.velocity.is_opposite(requested) {
            return false;
        }
        self.state.velocity = requested;
        true
    }

    /// Execute one step of the game
    pub fn tick(&mut self) -> TickOutcome {
        if self.state.game_over {
            return TickOutcome {
                terminated: true,
                ..Default::default()
            };
        }

        let mut outcome = TickOutcome::default();
        let state = &mut self.state;

        state
            .snake
            .advance(state.velocity, state.grid_width, state.grid_height);

        if state.snake.head == state.food {
            outcome.ate_food = true;
            state.snake.grow();
            state.foods_eaten += 1;
            state.food = Self::spawn_food_avoid_snake(
                &mut self.rng,
                &state.snake,
                state.grid_width,
                state.grid_height,
            );

            if state.tick_interval_ms > self.config.min_tick_ms {
                state.tick_interval_ms = state
                    .tick_interval_ms
                    .saturating_sub(self.config.speed_step_ms)
                    .max(self.config.min_tick_ms);
                outcome.speed_changed = true;
            }
            debug!(
                "food eaten, length {}, tick {} ms, next food at ({}, {})",
                state.snake.body_len(),
                state.tick_interval_ms,
                state.food.x,
                state.food.y
            );
        }

        if state.snake.bites_itself() {
            state.game_over = true;
            state.high_score = state.high_score.max(state.snake.body_len());
            outcome.game_over = true;
            info!(
                "game over with score {}, high score {}",
                state.snake.body_len(),
                state.high_score
            );
        }

        outcome.terminated = state.game_over;
        outcome
    }

    /// Spawn food at a random cell not covered by the snake
    fn spawn_food_avoid_snake(
        rng: &mut StdRng,
        snake: &Snake,
        width: usize,
        height: usize,
    ) -> Position {
        loop {
            let x = rng.gen_range(0..width) as i32;
            let y = rng.gen_range(0..height) as i32;
            let pos = Position::new(x, y);

            if !snake.occupies(pos) {
                return pos;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> GameEngine {
        GameEngine::with_seed(GameConfig::default(), 7)
    }

    /// Park the food somewhere the snake will not reach in a few ticks
    fn park_food(engine: &mut GameEngine) {
        engine.state.food = Position::new(0, 0);
    }

    #[test]
    fn test_reset() {
        let engine = engine();
        let state = engine.state();

        assert!(!state.game_over);
        assert_eq!(state.high_score, 0);
        assert_eq!(state.foods_eaten, 0);
        assert_eq!(state.snake.head, Position::new(12, 12));
        assert_eq!(
            state.snake.body,
            vec![Position::new(11, 12), Position::new(10, 12)]
        );
        assert_eq!(state.velocity, Direction::Right);
        assert_eq!(engine.tick_interval(), Duration::from_millis(100));
        assert!(!state.is_occupied_by_snake(state.food));
        assert!(state.is_in_bounds(state.food));
    }

    #[test]
    fn test_basic_movement() {
        let mut engine = engine();
        park_food(&mut engine);

        let outcome = engine.tick();

        assert!(!outcome.terminated);
        assert!(!outcome.ate_food);
        assert_eq!(engine.state.snake.head, Position::new(13, 12));
        assert_eq!(
            engine.state.snake.body,
            vec![Position::new(12, 12), Position::new(11, 12)]
        );
    }

    #[test]
    fn test_food_consumption() {
        let mut engine = engine();
        engine.state.food = Position::new(13, 12);

        let outcome = engine.tick();

        assert!(outcome.ate_food);
        assert!(outcome.speed_changed);
        assert!(!outcome.terminated);
        assert_eq!(engine.state.snake.body_len(), 3);
        assert_eq!(engine.state.foods_eaten, 1);
        assert_eq!(engine.tick_interval(), Duration::from_millis(95));
        assert!(!engine.state.is_occupied_by_snake(engine.state.food));
    }

    #[test]
    fn test_length_grows_only_on_food() {
        let mut engine = engine();

        for _ in 0..500 {
            if !engine.should_continue() {
                break;
            }
            let before = engine.state.snake.body_len();
            let food = engine.state.food;
            let next = engine
                .state
                .snake
                .head
                .moved_in_direction(engine.state.velocity)
                .wrapped(24, 24);

            let outcome = engine.tick();

            let grown = engine.state.snake.body_len() - before;
            assert_eq!(grown == 1, next == food);
            assert_eq!(outcome.ate_food, next == food);
            assert!(grown <= 1);
            assert!(!engine.state.is_occupied_by_snake(engine.state.food));

            // Wander so both axes get exercised
            let turn = if engine.state.foods_eaten % 2 == 0 {
                Direction::Down
            } else {
                Direction::Right
            };
            engine.set_direction(turn);
        }
    }

    #[test]
    fn test_wrap_in_every_direction() {
        for dir in [Direction::Up, Direction::Down, Direction::Left, Direction::Right] {
            let mut engine = GameEngine::with_seed(GameConfig::small(), 3);
            engine.state.snake = Snake::new(Position::new(5, 5), dir, 1);
            engine.state.velocity = dir;

            for _ in 0..25 {
                park_food(&mut engine);
                if engine.state.snake.head == Position::new(0, 0) {
                    engine.state.food = Position::new(9, 9);
                }
                engine.tick();
                let head = engine.state.snake.head;
                assert!(engine.state.is_in_bounds(head), "{dir:?} left the grid at {head:?}");
            }

            // 25 steps on a 10-wide torus lands 5 cells further along
            let (dx, dy) = dir.delta();
            assert_eq!(
                engine.state.snake.head,
                Position::new(5 + 5 * dx, 5 + 5 * dy).wrapped(10, 10)
            );
        }
    }

    #[test]
    fn test_self_collision() {
        let mut engine = GameEngine::with_seed(GameConfig::small(), 1);
        engine.state.high_score = 2;

        // Head at (5, 5) going Right with four body segments
        engine.state.snake = Snake::new(Position::new(5, 5), Direction::Right, 5);
        engine.state.food = Position::new(9, 9);

        engine.tick();
        engine.set_direction(Direction::Down);
        engine.tick();
        engine.set_direction(Direction::Left);
        engine.tick();
        engine.set_direction(Direction::Up);
        let outcome = engine.tick();

        assert!(outcome.game_over);
        assert!(outcome.terminated);
        assert!(!engine.should_continue());
        assert_eq!(engine.state.high_score, 4);
    }

    #[test]
    fn test_terminated_game_no_update() {
        let mut engine = engine();
        engine.state.game_over = true;
        let before = engine.state.clone();

        let outcome = engine.tick();

        assert!(outcome.terminated);
        assert!(!outcome.game_over);
        assert_eq!(engine.state, before);
    }

    #[test]
    fn test_prevent_180_degree_turn() {
        let mut engine = engine();

        assert!(!engine.set_direction(Direction::Left));
        assert_eq!(engine.state.velocity, Direction::Right);
    }

    #[test]
    fn test_last_valid_turn_wins() {
        let mut engine = engine();
        // Long enough that a Down-then-Up double reversal would bite the neck
        engine.state.snake = Snake::new(Position::new(12, 12), Direction::Right, 5);
        park_food(&mut engine);

        assert!(engine.set_direction(Direction::Down));
        assert!(!engine.set_direction(Direction::Up));
        assert_eq!(engine.state.velocity, Direction::Down);

        let outcome = engine.tick();
        assert!(!outcome.game_over);
        assert!(engine.should_continue());
        assert_eq!(engine.state.snake.head, Position::new(12, 13));
        assert_eq!(engine.state.snake.body[0], Position::new(12, 12));

        let outcome = engine.tick();
        assert!(!outcome.terminated);
        assert_eq!(engine.state.snake.head, Position::new(12, 14));
    }

    #[test]
    fn test_direction_ignored_after_game_over() {
        let mut engine = engine();
        engine.state.game_over = true;

        assert!(!engine.set_direction(Direction::Up));
        assert_eq!(engine.state.velocity, Direction::Right);
    }

    #[test]
    fn test_speed_ramp_floors() {
        let mut engine = engine();
        let mut previous = engine.tick_interval();

        for eaten in 1..=20u64 {
            let next = engine
                .state
                .snake
                .head
                .moved_in_direction(engine.state.velocity)
                .wrapped(24, 24);
            engine.state.food = next;
            engine.state.snake = Snake::new(engine.state.snake.head, Direction::Right, 3);

            let outcome = engine.tick();
            assert!(outcome.ate_food);

            let interval = engine.tick_interval();
            assert!(interval <= previous);
            assert_eq!(interval, Duration::from_millis((100 - 5 * eaten).max(40)));
            assert_eq!(outcome.speed_changed, eaten <= 12);
            previous = interval;
        }

        assert_eq!(engine.tick_interval(), Duration::from_millis(40));
    }

    #[test]
    fn test_restart_only_after_game_over() {
        let mut engine = engine();
        park_food(&mut engine);
        engine.tick();

        assert!(!engine.restart());
        assert_eq!(engine.state.snake.head, Position::new(13, 12));

        engine.state.game_over = true;
        engine.state.high_score = 9;
        engine.state.tick_interval_ms = 60;

        assert!(engine.restart());
        assert!(!engine.state.game_over);
        assert_eq!(engine.state.snake.head, Position::new(12, 12));
        assert_eq!(engine.state.velocity, Direction::Right);
        assert_eq!(engine.tick_interval(), Duration::from_millis(100));
        assert_eq!(engine.state.high_score, 9);
    }

    #[test]
    fn test_high_score_never_decreases() {
        let mut engine = engine();
        let mut best = 0;

        for body in [6usize, 4, 8, 5] {
            engine.reset();
            engine.state.snake = Snake::new(Position::new(10, 5), Direction::Right, body + 1);
            engine.state.food = Position::new(20, 20);
            let before = engine.state.high_score;

            // Tight square back onto the old head position
            engine.tick();
            for turn in [Direction::Down, Direction::Left, Direction::Up] {
                engine.set_direction(turn);
                engine.tick();
            }

            assert!(engine.state.game_over);
            assert!(engine.state.high_score >= before);
            best = best.max(body);
            assert_eq!(engine.state.high_score, best);
        }
    }

    #[test]
    fn test_widest_board_keeps_food_on_grid() {
        let mut config = GameConfig::new(i32::MAX as u32, 24);
        config.tile_size = 1;
        assert!(config.validate().is_ok());

        let mut engine = GameEngine::with_seed(config, 3);
        assert_eq!(engine.state.grid_width, i32::MAX as usize);
        assert!(engine.state.is_in_bounds(engine.state.food));

        // Last column wraps back to the first without overflowing
        let edge = Position::new(i32::MAX - 1, 5);
        engine.state.snake = Snake::new(edge, Direction::Right, 3);
        engine.state.food = Position::new(0, 0);
        engine.tick();
        assert_eq!(engine.state.snake.head, Position::new(0, 5));

        for seed in 0..50 {
            engine.rng = StdRng::seed_from_u64(seed);
            engine.reset();
            assert!(engine.state.is_in_bounds(engine.state.food));
            assert!(!engine.state.is_occupied_by_snake(engine.state.food));
        }
    }

    #[test]
    fn test_food_never_on_snake_after_reset() {
        let mut engine = GameEngine::with_seed(GameConfig::new(75, 75), 11);
        for _ in 0..200 {
            engine.reset();
            assert!(!engine.state.is_occupied_by_snake(engine.state.food));
        }
    }
}
