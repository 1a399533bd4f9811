use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use anyhow::{bail, Result};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::style::Color;

use crate::config::GameConfig;
use crate::field::Field;
use crate::game::Game;
use crate::snake::{Direction, Snake};
use crate::term::{to_coords, Coords, Glyph, TermInt, TermManager, TermView};
use crate::ticker::IntervalTicker;

/// How long to wait for input while no tick is scheduled.
const IDLE_POLL: Duration = Duration::from_millis(250);

const DEAD_SNAKE_CHAR: char = 'X';

type TermGame = Game<TermView, IntervalTicker>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Turn(Direction),
    TogglePause,
    Quit,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// An interactive terminal session: `init`, then `run` until the player
/// quits, then `teardown`. Every round gets a fresh field, snake and game.
pub struct GameSession {
    config: GameConfig,
    term: Rc<RefCell<TermManager>>,
    rounds: u64,
}

impl GameSession {
    /// Validates the config and takes over the terminal.
    pub fn init(config: GameConfig) -> Result<Self> {
        config.validate()?;

        let mut term = TermManager::new()?;
        let (width, height) = term.size();
        // One extra row for the score line
        if (width as usize) < config.cols || (height as usize) < config.rows + 1 {
            bail!(
                "terminal is {}x{}, the {}x{} field needs at least {}x{}",
                width,
                height,
                config.cols,
                config.rows,
                config.cols,
                config.rows + 1
            );
        }

        term.setup()?;
        log::info!("session started on a {}x{} terminal", width, height);

        Ok(GameSession { config, term: Rc::new(RefCell::new(term)), rounds: 0 })
    }

    pub fn run(&mut self) -> Result<()> {
        if self.show_intro()? == Flow::Quit {
            return Ok(());
        }

        while self.play()? == Flow::Continue {}

        log::info!("player quit after {} round(s)", self.rounds);
        Ok(())
    }

    pub fn teardown(&mut self) -> Result<()> {
        self.term.borrow_mut().restore()
    }

    ///////////////////////////////////////////////////////////////////////////

    fn show_intro(&mut self) -> Result<Flow> {
        let lines = &[
            "Arrow keys or WASD to move",
            "Space or Esc to pause",
            "CTRL+C to quit",
            "",
            "Press any key to begin",
        ];

        let center = self.field_center();
        let mut term = self.term.borrow_mut();
        term.show_message(center, lines)?;
        let key = term.read_key_blocking()?;
        term.hide_message()?;

        Ok(if is_ctrl_c(&key) { Flow::Quit } else { Flow::Continue })
    }

    fn new_game(&mut self) -> Result<TermGame> {
        self.term.borrow_mut().clear()?;
        self.rounds += 1;

        let GameConfig { rows, cols, .. } = self.config;
        let term = Rc::clone(&self.term);
        let mut field = Field::new(rows, cols, |pos, _| TermView::new(Rc::clone(&term), pos, rows, cols))?;
        if let Some(seed) = self.config.seed {
            field = field.with_seed(seed.wrapping_add(self.rounds));
        }

        let snake = Snake::new(&field, self.config.start, self.config.initial_length, self.config.direction)?;
        let mut game = Game::new(field, snake, IntervalTicker::new())?.with_frame_delay(self.config.frame_delay);

        let status = self.status_line();
        let hud = Rc::clone(&self.term);
        game.on_score_change(move |score| {
            let text = format!("Score: {}", score);
            if let Err(err) = hud.borrow_mut().print_text(status, &text, Color::White) {
                log::error!("failed to draw score: {:#}", err);
            }
        });

        let round = self.rounds;
        game.on_game_over(move || log::info!("round {} over", round));

        self.term.borrow_mut().print_text(status, "Score: 0", Color::White)?;
        log::info!("round {} ready", self.rounds);
        Ok(game)
    }

    fn play(&mut self) -> Result<Flow> {
        let mut game = self.new_game()?;
        let center = self.field_center();
        self.term
            .borrow_mut()
            .show_message(center, &["Press an arrow key", "to start"])?;

        loop {
            let timeout = game.ticker().time_until_next().unwrap_or(IDLE_POLL);
            let keys = self.term.borrow().read_key_events(timeout)?;

            for key in &keys {
                match key_action(key) {
                    KeyAction::Quit => return Ok(Flow::Quit),
                    KeyAction::Turn(direction) => {
                        if game.is_paused() {
                            self.resume(&mut game)?;
                        }
                        game.snake_mut().set_direction(direction);
                    }
                    KeyAction::TogglePause => self.toggle_pause(&mut game)?,
                    KeyAction::None => {}
                }
            }

            game.pump()?;
            self.term.borrow_mut().flush()?;

            if game.is_over() {
                return self.game_over(&game);
            }
        }
    }

    fn resume(&mut self, game: &mut TermGame) -> Result<()> {
        self.term.borrow_mut().hide_message()?;
        game.start();
        Ok(())
    }

    fn toggle_pause(&mut self, game: &mut TermGame) -> Result<()> {
        if game.is_paused() {
            return self.resume(game);
        }

        game.stop();
        let center = self.field_center();
        self.term
            .borrow_mut()
            .show_message(center, &["Paused", "Press Space to resume", "or Ctrl+C to quit"])
    }

    fn game_over(&mut self, game: &TermGame) -> Result<Flow> {
        let center = self.field_center();
        let (x, y) = self.status_line();
        let mut term = self.term.borrow_mut();

        let title = if game.is_won() {
            term.print_text((x + 12, y), "You won!", Color::Green)?;
            "You won!"
        } else {
            for pos in game.snake().body() {
                term.print_at(to_coords(*pos), Glyph::new(DEAD_SNAKE_CHAR, Color::Red))?;
            }
            term.print_text((x + 12, y), "Game over!", Color::Red)?;
            "Game over!"
        };

        term.show_message(
            center,
            &[
                title,
                &*format!("Score: {}", game.score()),
                "",
                "Press any key to play again,",
                "or CTRL+C to quit.",
            ],
        )?;

        let key = term.read_key_blocking()?;
        Ok(if is_ctrl_c(&key) { Flow::Quit } else { Flow::Continue })
    }

    fn field_center(&self) -> Coords {
        ((self.config.cols / 2) as TermInt, (self.config.rows / 2) as TermInt)
    }

    fn status_line(&self) -> Coords {
        (0, self.config.rows as TermInt)
    }
}

pub fn key_action(ev: &KeyEvent) -> KeyAction {
    if is_ctrl_c(ev) {
        return KeyAction::Quit;
    }

    match ev.code {
        KeyCode::Char('w') | KeyCode::Up => KeyAction::Turn(Direction::Up),
        KeyCode::Char('a') | KeyCode::Left => KeyAction::Turn(Direction::Left),
        KeyCode::Char('s') | KeyCode::Down => KeyAction::Turn(Direction::Down),
        KeyCode::Char('d') | KeyCode::Right => KeyAction::Turn(Direction::Right),
        KeyCode::Char(' ') | KeyCode::Esc => KeyAction::TogglePause,
        KeyCode::Char('q') => KeyAction::Quit,
        _ => KeyAction::None,
    }
}

fn is_ctrl_c(ev: &KeyEvent) -> bool {
    matches!(ev, KeyEvent { code: KeyCode::Char('c'), modifiers: KeyModifiers::CONTROL })
}
