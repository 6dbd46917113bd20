//! Draw commands: the resolution-independent output of the scene renderer
//!
//! Coordinates are logical board units with the origin at the top-left corner
//! and y growing downwards.

/// Opaque colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Same colour with the given opacity
    pub const fn with_alpha(self, a: u8) -> Rgba {
        Rgba { rgb: self, a }
    }

    pub const fn opaque(self) -> Rgba {
        self.with_alpha(u8::MAX)
    }
}

/// Colour with straight (non-premultiplied) alpha
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub rgb: Rgb,
    pub a: u8,
}

impl Rgba {
    pub fn is_opaque(&self) -> bool {
        self.a == u8::MAX
    }

    /// Composite this colour over `dst`
    pub fn over(&self, dst: Rgb) -> Rgb {
        let alpha = self.a as f32 / 255.0;
        let mix = |src: u8, dst: u8| (src as f32 * alpha + dst as f32 * (1.0 - alpha)).round() as u8;
        Rgb::new(
            mix(self.rgb.r, dst.r),
            mix(self.rgb.g, dst.g),
            mix(self.rgb.b, dst.b),
        )
    }
}

impl From<Rgb> for Rgba {
    fn from(rgb: Rgb) -> Self {
        rgb.opaque()
    }
}

/// Linear per-channel blend from `a` (t = 0) to `b` (t = 1); t is clamped
pub fn blend(a: Rgb, b: Rgb, t: f32) -> Rgb {
    let t = t.clamp(0.0, 1.0);
    let mix = |a: u8, b: u8| (a as f32 * (1.0 - t) + b as f32 * t) as u8;
    Rgb::new(mix(a.r, b.r), mix(a.g, b.g), mix(a.b, b.b))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle in logical units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    /// Shrink by `pad` on every side
    pub fn inset(&self, pad: i32) -> Self {
        Self::new(
            self.x + pad,
            self.y + pad,
            (self.width - 2 * pad).max(0),
            (self.height - 2 * pad).max(0),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Font {
    /// Em size in logical units
    pub size: i32,
    pub bold: bool,
}

impl Font {
    pub const fn bold(size: i32) -> Self {
        Self { size, bold: true }
    }

    pub const fn regular(size: i32) -> Self {
        Self { size, bold: false }
    }
}

/// A single drawing primitive
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Vertical gradient from `top` at the upper edge to `bottom` at the lower edge
    FillGradient { rect: Rect, top: Rgb, bottom: Rgb },
    FillRect { rect: Rect, color: Rgba },
    /// Ellipse inscribed in `bounds`
    FillEllipse { bounds: Rect, color: Rgba },
    Line { from: Point, to: Point, color: Rgba },
    /// Text with its baseline starting at `at`
    Text {
        text: String,
        at: Point,
        font: Font,
        color: Rgba,
    },
    /// Text centred horizontally in `0..span`, baseline at `baseline`
    CenteredText {
        text: String,
        span: i32,
        baseline: i32,
        font: Font,
        color: Rgba,
    },
}
