use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use log::{debug, info};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stdout, stdout};
use std::time::Duration;
use tokio::time::{Instant, Interval, MissedTickBehavior, interval, interval_at};

use crate::game::{GameConfig, GameEngine};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::GameMetrics;
use crate::render::{BoardLayout, Renderer};

/// Keeps the round clock in the header moving between ticks
const CLOCK_INTERVAL: Duration = Duration::from_millis(250);

pub struct HumanMode {
    engine: GameEngine,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    should_quit: bool,
    /// Set when the engine's tick interval changed and the timer must follow
    rearm_timer: bool,
}

impl HumanMode {
    pub fn new(config: GameConfig, seed: Option<u64>) -> Self {
        let renderer = Renderer::new(BoardLayout::from_config(&config));
        let engine = match seed {
            Some(seed) => GameEngine::with_seed(config, seed),
            None => GameEngine::new(config),
        };

        Self {
            engine,
            metrics: GameMetrics::new(),
            renderer,
            input_handler: InputHandler::new(),
            should_quit: false,
            rearm_timer: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut terminal = open_terminal()?;
        let played = self.run_game_loop(&mut terminal).await;
        let restored = close_terminal(&mut terminal);

        // A failed round is the more useful error to report
        played.and(restored)
    }

    async fn run_game_loop(&mut self, terminal: &mut Tui) -> Result<()> {
        let mut event_stream = EventStream::new();
        let mut tick_timer = tick_timer(self.engine.tick_interval());
        let mut clock_timer = interval(CLOCK_INTERVAL);

        info!(
            "playing on a {}x{} grid, tick {:?}",
            self.engine.state().grid_width,
            self.engine.state().grid_height,
            self.engine.tick_interval()
        );

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event)?;
                        self.draw(terminal)?;
                    }
                }

                // Game logic tick, idle once the round is over
                _ = tick_timer.tick(), if self.engine.should_continue() => {
                    self.update_game();
                    self.draw(terminal)?;
                }

                _ = clock_timer.tick() => {
                    self.draw(terminal)?;
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.rearm_timer {
                tick_timer = self::tick_timer(self.engine.tick_interval());
                self.rearm_timer = false;
            }

            if self.should_quit {
                debug!("quit requested");
                break;
            }
        }

        Ok(())
    }

    fn draw(&mut self, terminal: &mut Tui) -> Result<()> {
        self.metrics.update();
        terminal
            .draw(|frame| {
                self.renderer
                    .render(frame, self.engine.state(), &self.metrics);
            })
            .context("Failed to draw frame")?;
        Ok(())
    }

    fn handle_event(&mut self, event: Event) -> Result<()> {
        if let Event::Key(key) = event {
            // Only process key press events, not release
            if key.kind != KeyEventKind::Press {
                return Ok(());
            }

            match self.input_handler.handle_key_event(key) {
                KeyAction::Turn(direction) => {
                    self.engine.set_direction(direction);
                }
                KeyAction::Restart => {
                    self.restart_game();
                }
                KeyAction::Quit => {
                    self.should_quit = true;
                }
                KeyAction::None => {}
            }
        }

        Ok(())
    }

    fn update_game(&mut self) {
        let outcome = self.engine.tick();

        if outcome.speed_changed {
            self.rearm_timer = true;
        }

        if outcome.game_over {
            self.metrics.on_game_over();
        }
    }

    fn restart_game(&mut self) {
        if self.engine.restart() {
            self.metrics.on_game_start();
            self.rearm_timer = true;
        }
    }
}

type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Raw mode plus the alternate screen, cursor hidden
fn open_terminal() -> Result<Tui> {
    enable_raw_mode().context("Could not switch the terminal to raw mode")?;

    let mut out = stdout();
    if let Err(e) = execute!(out, EnterAlternateScreen) {
        let _ = disable_raw_mode();
        return Err(e).context("Could not open the alternate screen");
    }

    let mut terminal = match Terminal::new(CrosstermBackend::new(stdout())) {
        Ok(terminal) => terminal,
        Err(e) => {
            let _ = execute!(out, LeaveAlternateScreen);
            let _ = disable_raw_mode();
            return Err(e).context("Could not attach the renderer to stdout");
        }
    };

    if let Err(e) = terminal.hide_cursor().and_then(|()| terminal.clear()) {
        let _ = close_terminal(&mut terminal);
        return Err(e).context("Could not prepare the screen");
    }
    Ok(terminal)
}

/// Undo `open_terminal`; every step runs even if an earlier one fails
fn close_terminal(terminal: &mut Tui) -> Result<()> {
    let raw = disable_raw_mode().context("Could not leave raw mode");
    let screen = execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("Could not return to the main screen");
    let cursor = terminal.show_cursor().context("Could not restore the cursor");
    raw.and(screen).and(cursor)
}

/// Timer whose first tick is one full period away
fn tick_timer(period: Duration) -> Interval {
    let mut timer = interval_at(Instant::now() + period, period);
    timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
    timer
}
