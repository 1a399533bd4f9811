use std::time::Duration;

use crate::cell::{CellType, CellView};
use crate::error::Result;
use crate::field::Field;
use crate::snake::{MoveResult, Snake};
use crate::ticker::Ticker;

pub const DEFAULT_FRAME_DELAY: Duration = Duration::from_millis(150);

/// How a finished game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ending {
    Crashed { obstacle: CellType },
    /// The snake fills the whole interior and no apple fits anymore.
    Won,
}

type ScoreHook = Box<dyn FnMut(u32)>;
type GameOverHook = Box<dyn FnMut()>;

/// The game loop: turns ticks into snake steps and step outcomes into score
/// and termination.
///
/// A `Game` is single-use. Once the snake crashes or fills the field it stays
/// over, and a new round needs a new field, snake and game.
pub struct Game<V, T> {
    field: Field<V>,
    snake: Snake,
    ticker: T,
    frame_delay: Duration,
    score: u32,
    paused: bool,
    ending: Option<Ending>,
    on_score_change: Option<ScoreHook>,
    on_game_over: Option<GameOverHook>,
}

impl<V: CellView, T: Ticker> Game<V, T> {
    /// Puts the snake on the field and drops the first apple. The game starts
    /// paused, or already won when the snake leaves no room for an apple.
    pub fn new(mut field: Field<V>, snake: Snake, ticker: T) -> Result<Self> {
        snake.spawn(&mut field)?;
        let ending = match field.spawn_apple() {
            Some(_) => None,
            None => Some(Ending::Won),
        };

        Ok(Game {
            field,
            snake,
            ticker,
            frame_delay: DEFAULT_FRAME_DELAY,
            score: 0,
            paused: true,
            ending,
            on_score_change: None,
            on_game_over: None,
        })
    }

    pub fn with_frame_delay(mut self, frame_delay: Duration) -> Self {
        self.frame_delay = frame_delay;
        self
    }

    pub fn on_score_change(&mut self, hook: impl FnMut(u32) + 'static) {
        self.on_score_change = Some(Box::new(hook));
    }

    pub fn on_game_over(&mut self, hook: impl FnMut() + 'static) {
        self.on_game_over = Some(Box::new(hook));
    }

    /// Does nothing when already running or when the game is over.
    pub fn start(&mut self) {
        if !self.paused || self.is_over() {
            return;
        }

        self.ticker.start(self.frame_delay);
        self.paused = false;
        log::info!("game started, one step every {:?}", self.frame_delay);
    }

    pub fn stop(&mut self) {
        self.ticker.stop();
        if !self.paused {
            log::info!("game paused at score {}", self.score);
        }
        self.paused = true;
    }

    pub fn toggle(&mut self) {
        if self.paused {
            self.start();
        } else {
            self.stop();
        }
    }

    /// Runs one step of the snake and reacts to its outcome. Once the game is
    /// over the snake stays put and `None` is returned.
    pub fn tick(&mut self) -> Result<Option<MoveResult>> {
        if self.is_over() {
            return Ok(None);
        }

        let result = self.snake.step(&mut self.field)?;

        match result {
            MoveResult::GameOver { obstacle } => {
                log::info!("game over: ran into {} with score {}", obstacle, self.score);
                self.finish(Ending::Crashed { obstacle });
            }
            MoveResult::AteApple { new_head } => {
                self.score += 1;
                log::debug!("apple eaten at ({}, {}), score {}", new_head.x, new_head.y, self.score);

                if let Some(hook) = self.on_score_change.as_mut() {
                    hook(self.score);
                }
                if self.field.spawn_apple().is_none() {
                    log::info!("snake fills the field, won with score {}", self.score);
                    self.finish(Ending::Won);
                }
            }
            MoveResult::Advanced { .. } => {}
        }

        Ok(Some(result))
    }

    fn finish(&mut self, ending: Ending) {
        self.stop();
        self.ending = Some(ending);

        if let Some(hook) = self.on_game_over.as_mut() {
            hook();
        }
    }

    /// Runs every tick the ticker has due, stopping early if the game gets
    /// paused or ends. Returns how many ticks ran.
    pub fn pump(&mut self) -> Result<u32> {
        let due = self.ticker.due_ticks();
        let mut ran = 0;

        while ran < due && !self.paused {
            self.tick()?;
            ran += 1;
        }

        Ok(ran)
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_over(&self) -> bool {
        self.ending.is_some()
    }

    pub fn is_won(&self) -> bool {
        self.ending == Some(Ending::Won)
    }

    pub fn ending(&self) -> Option<Ending> {
        self.ending
    }

    pub fn frame_delay(&self) -> Duration {
        self.frame_delay
    }

    pub fn field(&self) -> &Field<V> {
        &self.field
    }

    pub fn field_mut(&mut self) -> &mut Field<V> {
        &mut self.field
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn snake_mut(&mut self) -> &mut Snake {
        &mut self.snake
    }

    pub fn ticker(&self) -> &T {
        &self.ticker
    }

    pub fn ticker_mut(&mut self) -> &mut T {
        &mut self.ticker
    }
}
