use super::action::Direction;

/// A position on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move position in a direction
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx, dy)
    }

    /// Fold the position back onto a `width` x `height` torus
    pub fn wrapped(&self, width: usize, height: usize) -> Self {
        Self {
            x: self.x.rem_euclid(width as i32),
            y: self.y.rem_euclid(height as i32),
        }
    }
}

/// The snake in the game
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    pub head: Position,
    /// Body segments, index 0 nearest the head
    pub body: Vec<Position>,
}

impl Snake {
    /// Create a snake of `length` cells (head included) whose body trails
    /// behind the head, opposite to `direction`
    pub fn new(head: Position, direction: Direction, length: usize) -> Self {
        let (dx, dy) = direction.delta();
        let mut body = Vec::with_capacity(length.saturating_sub(1));
        let mut prev = head;

        for _ in 1..length {
            prev = prev.moved_by(-dx, -dy);
            body.push(prev);
        }

        Self { head, body }
    }

    /// Get the tail position (head when there is no body)
    pub fn tail(&self) -> Position {
        self.body.last().copied().unwrap_or(self.head)
    }

    /// Check if position collides with snake body (excluding head)
    pub fn collides_with_body(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    /// Check if the head sits on one of its own body segments
    pub fn bites_itself(&self) -> bool {
        self.collides_with_body(self.head)
    }

    /// Check if any snake cell, head included, is at `pos`
    pub fn occupies(&self, pos: Position) -> bool {
        self.head == pos || self.collides_with_body(pos)
    }

    /// Pull every segment onto its predecessor, then step the head and wrap it
    pub fn advance(&mut self, direction: Direction, width: usize, height: usize) {
        for i in (1..self.body.len()).rev() {
            self.body[i] = self.body[i - 1];
        }
        if let Some(first) = self.body.first_mut() {
            *first = self.head;
        }

        self.head = self
            .head
            .moved_in_direction(direction)
            .wrapped(width, height);
    }

    /// Append a segment on top of the current tail; it separates on the next move
    pub fn grow(&mut self) {
        let tail = self.tail();
        self.body.push(tail);
    }

    /// Number of body segments (the score)
    pub fn body_len(&self) -> usize {
        self.body.len()
    }

    /// Number of cells covered, head included
    pub fn cell_count(&self) -> usize {
        self.body.len() + 1
    }
}

/// Complete game state
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub snake: Snake,
    pub food: Position,
    pub velocity: Direction,
    pub grid_width: usize,
    pub grid_height: usize,
    pub tick_interval_ms: u64,
    pub foods_eaten: u32,
    pub game_over: bool,
    pub high_score: usize,
}

impl GameState {
    /// Create a new game state
    pub fn new(
        snake: Snake,
        food: Position,
        grid_width: usize,
        grid_height: usize,
        tick_interval_ms: u64,
    ) -> Self {
        Self {
            snake,
            food,
            velocity: Direction::Right,
            grid_width,
            grid_height,
            tick_interval_ms,
            foods_eaten: 0,
            game_over: false,
            high_score: 0,
        }
    }

    /// Current score: body length, head excluded
    pub fn score(&self) -> usize {
        self.snake.body_len()
    }

    /// Check if a position is within the grid bounds
    pub fn is_in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0
            && pos.x < self.grid_width as i32
            && pos.y >= 0
            && pos.y < self.grid_height as i32
    }

    /// Check if a position is occupied by the snake
    pub fn is_occupied_by_snake(&self, pos: Position) -> bool {
        self.snake.occupies(pos)
    }
}
