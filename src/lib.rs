//! Grid Snake - a tile-grid snake game for the terminal
//!
//! This library provides:
//! - Core game logic (game module): a fixed-tick state machine with toroidal
//!   wrap, growth, self-collision and a speed ramp
//! - Rendering (render module): a pure scene renderer producing draw commands,
//!   a software raster surface and the ratatui front end
//! - Keyboard mapping (input module) and session stats (metrics module)
//! - The interactive terminal mode (modes module)

pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
