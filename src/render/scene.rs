//! Scene renderer: turns a game state into an ordered list of draw commands

use super::draw::{DrawCommand, Font, Point, Rect, Rgb, blend};
use crate::game::{GameConfig, GameState, Position};

const BACKGROUND_TOP: Rgb = Rgb::new(20, 24, 33);
const BACKGROUND_BOTTOM: Rgb = Rgb::new(48, 62, 82);
const GRID_ALPHA: u8 = 20;
const FOOD: Rgb = Rgb::new(255, 90, 90);
const BODY_NEAR_HEAD: Rgb = Rgb::new(80, 220, 120);
const BODY_AT_TAIL: Rgb = Rgb::new(20, 160, 90);
const HEAD: Rgb = Rgb::new(120, 255, 160);
const OVERLAY_ALPHA: u8 = 140;

/// Gap between a tile edge and the circle drawn inside it
const TILE_PADDING: i32 = 4;

const HUD_FONT: Font = Font::bold(16);
const TITLE_FONT: Font = Font::bold(36);
const HINT_FONT: Font = Font::regular(18);

/// Board geometry in logical units
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardLayout {
    pub width: i32,
    pub height: i32,
    pub tile_size: i32,
}

impl BoardLayout {
    pub fn new(width: i32, height: i32, tile_size: i32) -> Self {
        Self {
            width,
            height,
            tile_size,
        }
    }

    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(
            config.board_width as i32,
            config.board_height as i32,
            config.tile_size as i32,
        )
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width, self.height)
    }

    /// Rectangle covered by a grid cell
    pub fn tile(&self, pos: Position) -> Rect {
        Rect::new(
            pos.x * self.tile_size,
            pos.y * self.tile_size,
            self.tile_size,
            self.tile_size,
        )
    }

    fn cols(&self) -> i32 {
        self.width / self.tile_size.max(1)
    }

    fn rows(&self) -> i32 {
        self.height / self.tile_size.max(1)
    }
}

/// Build the draw list for one frame, back to front
pub fn render(state: &GameState, layout: &BoardLayout) -> Vec<DrawCommand> {
    let mut commands = Vec::with_capacity(state.snake.cell_count() + 64);

    commands.push(DrawCommand::FillGradient {
        rect: layout.bounds(),
        top: BACKGROUND_TOP,
        bottom: BACKGROUND_BOTTOM,
    });

    push_grid(&mut commands, layout);

    commands.push(DrawCommand::FillEllipse {
        bounds: layout.tile(state.food).inset(TILE_PADDING),
        color: FOOD.opaque(),
    });

    let body = &state.snake.body;
    for (i, segment) in body.iter().enumerate().rev() {
        commands.push(DrawCommand::FillEllipse {
            bounds: layout.tile(*segment).inset(TILE_PADDING),
            color: segment_color(i, body.len()).opaque(),
        });
    }

    commands.push(DrawCommand::FillEllipse {
        bounds: layout.tile(state.snake.head).inset(TILE_PADDING),
        color: HEAD.opaque(),
    });

    push_scores(&mut commands, state);

    if state.game_over {
        push_game_over(&mut commands, layout);
    }

    commands
}

/// Colour of body segment `index` (0 nearest the head) in a body of `len`
pub fn segment_color(index: usize, len: usize) -> Rgb {
    let t = if len > 1 {
        index as f32 / (len - 1) as f32
    } else {
        0.0
    };
    blend(BODY_NEAR_HEAD, BODY_AT_TAIL, t)
}

fn push_grid(commands: &mut Vec<DrawCommand>, layout: &BoardLayout) {
    let color = Rgb::WHITE.with_alpha(GRID_ALPHA);

    for c in 0..=layout.cols() {
        let x = c * layout.tile_size;
        commands.push(DrawCommand::Line {
            from: Point::new(x, 0),
            to: Point::new(x, layout.height),
            color,
        });
    }

    for r in 0..=layout.rows() {
        let y = r * layout.tile_size;
        commands.push(DrawCommand::Line {
            from: Point::new(0, y),
            to: Point::new(layout.width, y),
            color,
        });
    }
}

fn push_scores(commands: &mut Vec<DrawCommand>, state: &GameState) {
    commands.push(DrawCommand::Text {
        text: format!("Score: {}", state.score()),
        at: Point::new(10, 20),
        font: HUD_FONT,
        color: Rgb::WHITE.opaque(),
    });
    commands.push(DrawCommand::Text {
        text: format!("High: {}", state.high_score),
        at: Point::new(10, 40),
        font: HUD_FONT,
        color: Rgb::WHITE.opaque(),
    });
}

fn push_game_over(commands: &mut Vec<DrawCommand>, layout: &BoardLayout) {
    commands.push(DrawCommand::FillRect {
        rect: layout.bounds(),
        color: Rgb::BLACK.with_alpha(OVERLAY_ALPHA),
    });
    commands.push(DrawCommand::CenteredText {
        text: "Game Over".to_string(),
        span: layout.width,
        baseline: (layout.height - 20) / 2,
        font: TITLE_FONT,
        color: Rgb::WHITE.opaque(),
    });
    commands.push(DrawCommand::CenteredText {
        text: "Press ENTER to Restart".to_string(),
        span: layout.width,
        baseline: (layout.height + 20) / 2,
        font: HINT_FONT,
        color: Rgb::WHITE.opaque(),
    });
}
