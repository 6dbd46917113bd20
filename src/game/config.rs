use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for the game
///
/// Sizes are in logical units; the grid is `board_width / tile_size` columns
/// by `board_height / tile_size` rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Width of the board in logical units
    pub board_width: u32,
    /// Height of the board in logical units
    pub board_height: u32,
    /// Edge length of one tile in logical units
    pub tile_size: u32,
    /// Initial length of the snake, head included
    pub initial_snake_length: usize,

    // Speed ramp
    /// Tick interval at the start of every round (ms)
    pub base_tick_ms: u64,
    /// Lowest tick interval the ramp can reach (ms)
    pub min_tick_ms: u64,
    /// Amount the interval shrinks per food eaten (ms)
    pub speed_step_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board_width: 600,
            board_height: 600,
            tile_size: 25,
            initial_snake_length: 3,
            base_tick_ms: 100,
            min_tick_ms: 40,
            speed_step_ms: 5,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with a custom board size
    pub fn new(board_width: u32, board_height: u32) -> Self {
        Self {
            board_width,
            board_height,
            ..Default::default()
        }
    }

    /// Create a small grid (10x10 tiles) for testing
    pub fn small() -> Self {
        Self::new(250, 250)
    }

    /// Load a configuration from a JSON file
    ///
    /// Missing fields fall back to their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Number of grid columns
    pub fn cols(&self) -> usize {
        (self.board_width / self.tile_size.max(1)) as usize
    }

    /// Number of grid rows
    pub fn rows(&self) -> usize {
        (self.board_height / self.tile_size.max(1)) as usize
    }

    /// Validate configuration parameters
    ///
    /// # Returns
    ///
    /// `Ok(())` if all parameters are valid, `Err(String)` with an error message otherwise.
    pub fn validate(&self) -> Result<(), String> {
        if self.tile_size == 0 {
            return Err("tile_size must be at least 1".to_string());
        }

        // Grid and logical coordinates are i32 downstream
        let limit = i32::MAX as u32;
        if self.board_width > limit || self.board_height > limit || self.tile_size > limit {
            return Err(format!(
                "board {}x{} with tile size {} exceeds {} logical units",
                self.board_width,
                self.board_height,
                self.tile_size,
                i32::MAX
            ));
        }

        if self.cols() == 0 || self.rows() == 0 {
            return Err(format!(
                "board {}x{} is smaller than one tile of size {}",
                self.board_width, self.board_height, self.tile_size
            ));
        }

        if self.initial_snake_length == 0 {
            return Err("initial_snake_length must be at least 1".to_string());
        }

        if self.initial_snake_length > self.cols() {
            return Err(format!(
                "initial_snake_length ({}) does not fit in {} columns",
                self.initial_snake_length,
                self.cols()
            ));
        }

        let cells = self.cols().checked_mul(self.rows()).unwrap_or(usize::MAX);
        if cells <= self.initial_snake_length {
            return Err("grid leaves no free cell for food".to_string());
        }

        if self.min_tick_ms == 0 {
            return Err("min_tick_ms must be positive".to_string());
        }

        if self.base_tick_ms < self.min_tick_ms {
            return Err(format!(
                "base_tick_ms ({}) cannot be below min_tick_ms ({})",
                self.base_tick_ms, self.min_tick_ms
            ));
        }

        Ok(())
    }
}
