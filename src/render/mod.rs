//! Rendering: a pure scene description plus the surfaces that draw it

pub mod draw;
pub mod raster;
pub mod renderer;
pub mod scene;
pub mod surface;

pub use draw::{DrawCommand, Font, Point, Rect, Rgb, Rgba};
pub use raster::{Label, Raster};
pub use renderer::{BoardView, Renderer};
pub use scene::{BoardLayout, render};
pub use surface::{Surface, replay};
