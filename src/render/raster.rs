//! Software drawing surface backed by an RGB pixel buffer
//!
//! Logical coordinates are scaled onto a pixel grid of any resolution. Text is
//! not rasterized; it is kept as labels anchored to a pixel column and row, one
//! glyph per pixel column, for a character-cell display to print on top.

use std::ops::Range;

use super::draw::{Font, Point, Rect, Rgb, Rgba};
use super::surface::Surface;

/// A run of text positioned on the pixel grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    pub col: usize,
    pub row: usize,
    pub text: String,
    pub color: Rgb,
    pub bold: bool,
}

pub struct Raster {
    width: usize,
    height: usize,
    /// Logical units per pixel, horizontally and vertically
    unit_x: f32,
    unit_y: f32,
    pixels: Vec<Rgb>,
    labels: Vec<Label>,
}

impl Raster {
    /// A `width` x `height` pixel buffer showing a `logical_width` x
    /// `logical_height` board, cleared to black
    pub fn new(width: usize, height: usize, logical_width: i32, logical_height: i32) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        Self {
            width,
            height,
            unit_x: logical_width.max(1) as f32 / width as f32,
            unit_y: logical_height.max(1) as f32 / height as f32,
            pixels: vec![Rgb::BLACK; width * height],
            labels: Vec::new(),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgb> {
        if x < self.width && y < self.height {
            Some(self.pixels[y * self.width + x])
        } else {
            None
        }
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    fn paint(&mut self, x: usize, y: usize, color: Rgba) {
        let pixel = &mut self.pixels[y * self.width + x];
        *pixel = if color.is_opaque() {
            color.rgb
        } else {
            color.over(*pixel)
        };
    }

    /// Pixel column holding logical x
    fn column_of(&self, x: f32) -> usize {
        ((x / self.unit_x).floor().max(0.0) as usize).min(self.width - 1)
    }

    /// Pixel row holding logical y
    fn row_of(&self, y: f32) -> usize {
        ((y / self.unit_y).floor().max(0.0) as usize).min(self.height - 1)
    }
}

/// Pixels whose centres fall inside `lo..hi`
fn centre_span(lo: i32, hi: i32, unit: f32, len: usize) -> Range<usize> {
    let start = (lo as f32 / unit - 0.5).ceil().max(0.0) as usize;
    let end = ((hi as f32 / unit - 0.5).ceil().max(0.0) as usize).min(len);
    start..end
}

/// Pixels overlapping `lo..hi` at all
fn touch_span(lo: f32, hi: f32, unit: f32, len: usize) -> Range<usize> {
    let start = (lo / unit).floor().max(0.0) as usize;
    let end = ((hi / unit).ceil().max(0.0) as usize).min(len);
    start..end
}

impl Surface for Raster {
    fn fill_rect(&mut self, rect: Rect, color: Rgba) {
        let cols = centre_span(rect.x, rect.right(), self.unit_x, self.width);
        for y in centre_span(rect.y, rect.bottom(), self.unit_y, self.height) {
            for x in cols.clone() {
                self.paint(x, y, color);
            }
        }
    }

    fn fill_ellipse(&mut self, bounds: Rect, color: Rgba) {
        let rx = bounds.width as f32 / 2.0;
        let ry = bounds.height as f32 / 2.0;
        if rx <= 0.0 || ry <= 0.0 {
            return;
        }
        let cx = bounds.x as f32 + rx;
        let cy = bounds.y as f32 + ry;

        // A pixel is covered when any part of it lies inside the ellipse, so
        // tiles a few pixels wide still show a solid blob.
        let cols = touch_span(bounds.x as f32, bounds.right() as f32, self.unit_x, self.width);
        for y in touch_span(bounds.y as f32, bounds.bottom() as f32, self.unit_y, self.height) {
            let top = y as f32 * self.unit_y;
            let ny = cy.clamp(top, top + self.unit_y);
            let dy = (ny - cy) / ry;
            for x in cols.clone() {
                let left = x as f32 * self.unit_x;
                let nx = cx.clamp(left, left + self.unit_x);
                let dx = (nx - cx) / rx;
                if dx * dx + dy * dy <= 1.0 {
                    self.paint(x, y, color);
                }
            }
        }
    }

    fn draw_line(&mut self, from: Point, to: Point, color: Rgba) {
        let (mut x0, mut y0) = (
            self.column_of(from.x as f32) as i64,
            self.row_of(from.y as f32) as i64,
        );
        let (x1, y1) = (
            self.column_of(to.x as f32) as i64,
            self.row_of(to.y as f32) as i64,
        );

        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.paint(x0 as usize, y0 as usize, color);
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }

    fn draw_text(&mut self, text: &str, at: Point, font: Font, color: Rgba) {
        let middle = at.y as f32 - font.size as f32 / 2.0;
        let label = Label {
            col: self.column_of(at.x as f32),
            row: self.row_of(middle),
            text: text.to_string(),
            color: color.rgb,
            bold: font.bold,
        };
        self.labels.push(label);
    }

    fn text_width(&self, text: &str, _font: Font) -> i32 {
        (text.chars().count() as f32 * self.unit_x).round() as i32
    }
}
