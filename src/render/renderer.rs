use ratatui::{
    Frame,
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use super::draw::Rgb;
use super::raster::Raster;
use super::scene::{self, BoardLayout};
use super::surface::replay;
use crate::game::GameState;
use crate::metrics::GameMetrics;

const UPPER_HALF: &str = "▀";

pub struct Renderer {
    layout: BoardLayout,
}

impl Renderer {
    pub fn new(layout: BoardLayout) -> Self {
        Self { layout }
    }

    pub fn render(&self, frame: &mut Frame, state: &GameState, metrics: &GameMetrics) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2), // Header
                Constraint::Min(0),    // Board
                Constraint::Length(1), // Footer
            ])
            .split(frame.area());

        frame.render_widget(self.render_stats(state, metrics), chunks[0]);

        match self.board_area(chunks[1]) {
            Some(area) => {
                let raster = self.rasterize(state, area);
                frame.render_widget(BoardView::new(&raster), area);
            }
            None => frame.render_widget(self.render_too_small(), chunks[1]),
        }

        frame.render_widget(self.render_controls(), chunks[2]);
    }

    /// Largest centred area that keeps tiles square, one cell being two pixels tall
    fn board_area(&self, area: Rect) -> Option<Rect> {
        let (board_w, board_h) = (
            self.layout.width.max(1) as u64,
            self.layout.height.max(1) as u64,
        );
        let (fit_w, fit_h) = (area.width as u64, area.height as u64 * 2);

        let (pixels_x, pixels_y) = if fit_w * board_h <= fit_h * board_w {
            (fit_w, fit_w * board_h / board_w)
        } else {
            (fit_h * board_w / board_h, fit_h)
        };

        let cols = (self.layout.width / self.layout.tile_size.max(1)).max(1) as u64;
        if pixels_x < cols || pixels_y < 2 {
            return None;
        }

        let width = pixels_x.min(area.width as u64) as u16;
        let height = pixels_y.div_ceil(2).min(area.height as u64) as u16;
        Some(Rect::new(
            area.x + (area.width - width) / 2,
            area.y + (area.height - height) / 2,
            width,
            height,
        ))
    }

    fn rasterize(&self, state: &GameState, area: Rect) -> Raster {
        let mut raster = Raster::new(
            area.width as usize,
            area.height as usize * 2,
            self.layout.width,
            self.layout.height,
        );
        replay(&scene::render(state, &self.layout), &mut raster);
        raster
    }

    fn render_stats(&self, state: &GameState, metrics: &GameMetrics) -> Paragraph<'_> {
        let text = vec![Line::from(vec![
            Span::styled("Score: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                state.score().to_string(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled("High: ", Style::default().fg(Color::Yellow)),
            Span::styled(state.high_score.to_string(), Style::default().fg(Color::White)),
            Span::raw("    "),
            Span::styled("Speed: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                format!("{} ms", state.tick_interval_ms),
                Style::default().fg(Color::White),
            ),
            Span::raw("    "),
            Span::styled("Rounds: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                metrics.games_played.to_string(),
                Style::default().fg(Color::White),
            ),
            Span::raw("    "),
            Span::styled("Time: ", Style::default().fg(Color::Yellow)),
            Span::styled(metrics.format_time(), Style::default().fg(Color::White)),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_too_small(&self) -> Paragraph<'_> {
        Paragraph::new(Line::from(Span::styled(
            "Terminal too small for the board",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
    }

    fn render_controls(&self) -> Paragraph<'_> {
        let text = vec![Line::from(vec![
            Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
            Span::raw(" or "),
            Span::styled("WASD", Style::default().fg(Color::Cyan)),
            Span::raw(" to move | "),
            Span::styled("Enter", Style::default().fg(Color::Green)),
            Span::raw("/"),
            Span::styled("R", Style::default().fg(Color::Green)),
            Span::raw(" to restart | "),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" to quit"),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }
}

fn to_color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.r, rgb.g, rgb.b)
}

/// Shows a raster with upper-half blocks: two pixels per terminal cell
pub struct BoardView<'a> {
    raster: &'a Raster,
}

impl<'a> BoardView<'a> {
    pub fn new(raster: &'a Raster) -> Self {
        Self { raster }
    }
}

impl Widget for BoardView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let width = area.width.min(self.raster.width() as u16);
        let height = area.height.min(self.raster.height().div_ceil(2) as u16);

        for row in 0..height {
            for col in 0..width {
                let (x, y) = (col as usize, row as usize * 2);
                let Some(cell) = buf.cell_mut((area.x + col, area.y + row)) else {
                    continue;
                };
                cell.set_symbol(UPPER_HALF);
                if let Some(top) = self.raster.pixel(x, y) {
                    cell.set_fg(to_color(top));
                }
                match self.raster.pixel(x, y + 1) {
                    Some(bottom) => cell.set_bg(to_color(bottom)),
                    None => cell.set_bg(Color::Reset),
                };
            }
        }

        for label in self.raster.labels() {
            let row = (label.row / 2) as u16;
            let col = label.col as u16;
            if row >= height || col >= width {
                continue;
            }

            let mut style = Style::default().fg(to_color(label.color));
            if label.bold {
                style = style.add_modifier(Modifier::BOLD);
            }
            let room = (width - col) as usize;
            let text: String = label.text.chars().take(room).collect();
            buf.set_string(area.x + col, area.y + row, text, style);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{GameConfig, GameEngine};
    use crate::render::draw::{Font, Point, Rect as BoardRect};
    use crate::render::surface::Surface;
    use ratatui::{Terminal, backend::TestBackend};

    fn renderer() -> Renderer {
        Renderer::new(BoardLayout::from_config(&GameConfig::default()))
    }

    #[test]
    fn test_board_area_keeps_tiles_square() {
        let area = renderer().board_area(Rect::new(0, 2, 100, 30)).unwrap();
        // 30 rows give 60 pixels of height; width follows
        assert_eq!(area.width, 60);
        assert_eq!(area.height, 30);
        assert_eq!(area.x, 20);
        assert_eq!(area.y, 2);
    }

    #[test]
    fn test_board_area_too_small() {
        assert!(renderer().board_area(Rect::new(0, 0, 20, 40)).is_none());
    }

    #[test]
    fn test_board_area_on_huge_board() {
        let renderer = Renderer::new(BoardLayout::new(10_000_000, 10_000_000, 1_000_000));
        let area = renderer.board_area(Rect::new(0, 0, 500, 100)).unwrap();
        assert_eq!(area, Rect::new(150, 0, 200, 100));

        let renderer = Renderer::new(BoardLayout::new(i32::MAX, 24, 1));
        assert!(renderer.board_area(Rect::new(0, 0, 500, 100)).is_none());
    }

    #[test]
    fn test_board_view_pairs_pixels() {
        let mut raster = Raster::new(2, 3, 2, 3);
        raster.fill_rect(BoardRect::new(0, 0, 2, 1), Rgb::WHITE.opaque());
        raster.draw_text("x", Point::new(1, 3), Font::regular(1), Rgb::WHITE.opaque());

        let mut buf = Buffer::empty(Rect::new(0, 0, 2, 2));
        BoardView::new(&raster).render(Rect::new(0, 0, 2, 2), &mut buf);

        let cell = &buf[(0, 0)];
        assert_eq!(cell.symbol(), UPPER_HALF);
        assert_eq!(cell.fg, Color::Rgb(255, 255, 255));
        assert_eq!(cell.bg, Color::Rgb(0, 0, 0));

        // Odd pixel height leaves the last half-cell empty
        assert_eq!(buf[(0, 1)].bg, Color::Reset);
        assert_eq!(buf[(1, 1)].symbol(), "x");
    }

    #[test]
    fn test_full_frame_draws_hud_and_board() {
        let engine = GameEngine::with_seed(GameConfig::default(), 5);
        let metrics = GameMetrics::new();
        let renderer = renderer();

        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        terminal
            .draw(|frame| renderer.render(frame, engine.state(), &metrics))
            .unwrap();

        let buffer = terminal.backend().buffer();
        let row = |y: u16| -> String {
            (0..80u16)
                .map(|x| buffer[(x, y)].symbol().to_string())
                .collect()
        };
        let header = row(0);
        assert!(header.contains("Score: 2"));
        assert!(header.contains("Speed: 100 ms"));
        assert!(row(29).contains("to quit"));

        let board_text: String = (2..29u16)
            .flat_map(|y| (0..80u16).map(move |x| (x, y)))
            .map(|pos| buffer[pos].symbol().to_string())
            .collect();
        assert!(board_text.contains("Score: 2"));
        assert!(board_text.contains(UPPER_HALF));
    }
}
