use super::draw::{DrawCommand, Font, Point, Rect, Rgb, Rgba, blend};

/// Primitive 2D drawing operations a host must provide
pub trait Surface {
    fn fill_rect(&mut self, rect: Rect, color: Rgba);

    /// Fill the ellipse inscribed in `bounds`
    fn fill_ellipse(&mut self, bounds: Rect, color: Rgba);

    fn draw_line(&mut self, from: Point, to: Point, color: Rgba);

    /// Draw `text` with its baseline starting at `at`
    fn draw_text(&mut self, text: &str, at: Point, font: Font, color: Rgba);

    /// Advance width of `text` in logical units
    fn text_width(&self, text: &str, font: Font) -> i32;

    /// Vertical gradient, one logical row per band
    fn fill_vertical_gradient(&mut self, rect: Rect, top: Rgb, bottom: Rgb) {
        let span = (rect.height - 1).max(1) as f32;
        for row in 0..rect.height {
            let color = blend(top, bottom, row as f32 / span);
            self.fill_rect(Rect::new(rect.x, rect.y + row, rect.width, 1), color.opaque());
        }
    }
}

/// Execute draw commands in order against a surface
pub fn replay<S: Surface + ?Sized>(commands: &[DrawCommand], surface: &mut S) {
    for command in commands {
        match command {
            DrawCommand::FillGradient { rect, top, bottom } => {
                surface.fill_vertical_gradient(*rect, *top, *bottom)
            }
            DrawCommand::FillRect { rect, color } => surface.fill_rect(*rect, *color),
            DrawCommand::FillEllipse { bounds, color } => surface.fill_ellipse(*bounds, *color),
            DrawCommand::Line { from, to, color } => surface.draw_line(*from, *to, *color),
            DrawCommand::Text {
                text,
                at,
                font,
                color,
            } => surface.draw_text(text, *at, *font, *color),
            DrawCommand::CenteredText {
                text,
                span,
                baseline,
                font,
                color,
            } => {
                let x = (span - surface.text_width(text, *font)) / 2;
                surface.draw_text(text, Point::new(x, *baseline), *font, *color);
            }
        }
    }
}
