use std::time::Duration;

use crate::cell::Position;
use crate::error::{Error, Result};
use crate::field::Field;
use crate::game::DEFAULT_FRAME_DELAY;
use crate::snake::{Direction, Snake};

/// Everything a session needs to build a round.
#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    /// Field height, walls included
    pub rows: usize,
    /// Field width, walls included
    pub cols: usize,
    /// Time between two snake steps
    pub frame_delay: Duration,
    pub initial_length: usize,
    /// Where the head starts; the body trails behind it
    pub start: Position,
    pub direction: Direction,
    /// Seed for apple placement, random when unset
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            rows: 20,
            cols: 20,
            frame_delay: DEFAULT_FRAME_DELAY,
            initial_length: 3,
            start: Position::new(3, 1),
            direction: Direction::Right,
            seed: None,
        }
    }
}

impl GameConfig {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            ..Default::default()
        }
    }

    /// Catches a bad field size, a start position off the interior or a
    /// snake too long to leave room for an apple, before the terminal is
    /// taken over.
    pub fn validate(&self) -> Result<()> {
        let field = Field::new(self.rows, self.cols, |_, _| ())?;
        let snake = Snake::new(&field, self.start, self.initial_length, self.direction)?;

        if snake.len() >= (self.rows - 2) * (self.cols - 2) {
            return Err(Error::FieldFull {
                length: snake.len(),
                rows: self.rows,
                cols: self.cols,
            });
        }

        Ok(())
    }
}
