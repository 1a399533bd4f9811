use std::cell::RefCell;
use std::io::{stdout, Stdout, Write};
use std::rc::Rc;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{poll, read, Event, KeyEvent};
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute, queue, terminal};

use crate::cell::{CellType, CellView, Position};

pub type TermInt = u16;
pub type Coords = (TermInt, TermInt);

const WALL_COLOR: Color = Color::Rgb { r: 105, g: 105, b: 105 };
const APPLE_COLOR: Color = Color::Rgb { r: 220, g: 20, b: 60 };
const SNAKE_COLOR: Color = Color::Rgb { r: 138, g: 43, b: 226 };

pub const SNAKE_BODY_CHAR: char = '█';
pub const APPLE_CHAR: char = 'O';

/// A character cell on screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glyph {
    pub ch: char,
    pub color: Color,
}

impl Glyph {
    pub const BLANK: Glyph = Glyph::new(' ', Color::Reset);

    pub const fn new(ch: char, color: Color) -> Self {
        Glyph { ch, color }
    }
}

pub struct TermManager {
    width: TermInt,
    height: TermInt,
    stdout: Stdout,
    screen: Vec<Glyph>,
    current_msg: Option<Message>,
}

struct Message {
    top_left: Coords,
    width: TermInt,
    height: TermInt,
}

impl TermManager {
    pub fn new() -> Result<Self> {
        let (width, height) = terminal::size().context("Failed to read terminal size")?;
        let screen = vec![Glyph::BLANK; width as usize * height as usize];
        Ok(TermManager { width, height, stdout: stdout(), screen, current_msg: None })
    }

    pub fn setup(&mut self) -> Result<()> {
        execute!(self.stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        terminal::enable_raw_mode().context("Failed to enable raw mode")?;
        execute!(self.stdout, cursor::Hide, cursor::DisableBlinking).context("Failed to hide cursor")?;
        Ok(())
    }

    pub fn restore(&mut self) -> Result<()> {
        terminal::disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(self.stdout, ResetColor, cursor::Show, cursor::EnableBlinking).context("Failed to show cursor")?;
        execute!(self.stdout, LeaveAlternateScreen).context("Failed to leave alternate screen")?;
        Ok(())
    }

    pub fn read_key_blocking(&self) -> Result<KeyEvent> {
        loop {
            if let Event::Key(ev) = read().context("Failed to read terminal event")? {
                return Ok(ev);
            }
        }
    }

    /// Waits up to `timeout` for input, then drains whatever else is queued.
    pub fn read_key_events(&self, timeout: Duration) -> Result<Vec<KeyEvent>> {
        let mut events = vec![];
        let mut wait = timeout;

        while poll(wait).context("Failed to poll terminal events")? {
            if let Event::Key(ev) = read().context("Failed to read terminal event")? {
                events.push(ev);
            }
            wait = Duration::from_millis(0);
        }

        Ok(events)
    }

    pub fn size(&self) -> Coords {
        (self.width, self.height)
    }

    /// Draws a boxed message centred on `center`, remembering what it covers
    /// so `hide_message` can put it back.
    pub fn show_message(&mut self, center: Coords, lines: &[&str]) -> Result<()> {
        if self.has_message() {
            self.hide_message()?;
        }

        let msg_height = (lines.len() + 2) as TermInt;
        let msg_width = (lines.iter().map(|x| x.chars().count()).max().unwrap_or(0) + 2) as TermInt;
        let top_left = (
            center.0.saturating_sub(msg_width / 2),
            center.1.saturating_sub(msg_height / 2),
        );

        // Top and bottom padding lines
        for y in [top_left.1, top_left.1 + msg_height - 1] {
            for x_diff in 0..msg_width {
                self.print_at_no_save((top_left.0 + x_diff, y), Glyph::BLANK)?;
            }
        }

        for (i, line) in lines.iter().enumerate() {
            let padded_line = format!("{line: ^width$}", line = line, width = msg_width as usize);
            let y = top_left.1 + i as TermInt + 1;
            for (x_diff, ch) in padded_line.chars().enumerate() {
                self.print_at_no_save((top_left.0 + x_diff as TermInt, y), Glyph::new(ch, Color::White))?;
            }
        }

        self.current_msg = Some(Message { top_left, width: msg_width, height: msg_height });
        self.flush()
    }

    pub fn hide_message(&mut self) -> Result<()> {
        let msg = match self.current_msg.take() {
            Some(msg) => msg,
            None => return Ok(()),
        };

        // Put back what the box was hiding
        for y_diff in 0..msg.height {
            for x_diff in 0..msg.width {
                let pos = (msg.top_left.0 + x_diff, msg.top_left.1 + y_diff);
                if let Some(idx) = self.index(pos) {
                    let glyph = self.screen[idx];
                    self.print_at_no_save(pos, glyph)?;
                }
            }
        }

        self.flush()
    }

    pub fn has_message(&self) -> bool {
        self.current_msg.is_some()
    }

    pub fn print_at(&mut self, pos: Coords, glyph: Glyph) -> Result<()> {
        if let Some(idx) = self.index(pos) {
            self.screen[idx] = glyph;
            // Keep the box on top; the new glyph shows once it is hidden
            if !self.is_under_message(pos) {
                self.print_at_no_save(pos, glyph)?;
            }
        }
        Ok(())
    }

    pub fn print_text(&mut self, pos: Coords, text: &str, color: Color) -> Result<()> {
        for (i, ch) in text.chars().enumerate() {
            self.print_at((pos.0 + i as TermInt, pos.1), Glyph::new(ch, color))?;
        }
        Ok(())
    }

    pub fn clear(&mut self) -> Result<()> {
        execute!(self.stdout, terminal::Clear(ClearType::All)).context("Failed to clear terminal")?;
        self.screen = vec![Glyph::BLANK; self.width as usize * self.height as usize];
        self.current_msg = None;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.stdout.flush().context("Failed to flush terminal")
    }

    ///////////////////////////////////////////////////////////////////////////

    fn index(&self, pos: Coords) -> Option<usize> {
        if pos.0 >= self.width || pos.1 >= self.height {
            return None;
        }
        Some(self.width as usize * pos.1 as usize + pos.0 as usize)
    }

    fn is_under_message(&self, pos: Coords) -> bool {
        self.current_msg.as_ref().map_or(false, |msg| {
            (msg.top_left.0..msg.top_left.0 + msg.width).contains(&pos.0)
                && (msg.top_left.1..msg.top_left.1 + msg.height).contains(&pos.1)
        })
    }

    fn print_at_no_save(&mut self, pos: Coords, glyph: Glyph) -> Result<()> {
        if self.index(pos).is_none() {
            return Ok(());
        }
        queue!(
            self.stdout,
            cursor::MoveTo(pos.0, pos.1),
            SetForegroundColor(glyph.color),
            Print(glyph.ch),
            ResetColor
        )
        .context("Failed to queue terminal output")?;
        Ok(())
    }
}

/// Draws field cells into a shared [`TermManager`], one character per cell
/// with the field's top-left corner at the terminal's top-left corner.
pub struct TermView {
    term: Rc<RefCell<TermManager>>,
    wall: Glyph,
}

impl TermView {
    /// `rows` and `cols` are the field's, used to pick the border character.
    pub fn new(term: Rc<RefCell<TermManager>>, pos: Position, rows: usize, cols: usize) -> Self {
        TermView { term, wall: wall_glyph(pos, rows, cols) }
    }

    fn glyph(&self, kind: CellType) -> Glyph {
        match kind {
            CellType::Weed => Glyph::BLANK,
            CellType::Apple => Glyph::new(APPLE_CHAR, APPLE_COLOR),
            CellType::Snake => Glyph::new(SNAKE_BODY_CHAR, SNAKE_COLOR),
            CellType::Wall => self.wall,
        }
    }
}

impl CellView for TermView {
    fn render(&mut self, pos: Position, kind: CellType) {
        let glyph = self.glyph(kind);
        if let Err(err) = self.term.borrow_mut().print_at(to_coords(pos), glyph) {
            log::error!("failed to draw {} cell at ({}, {}): {:#}", kind, pos.x, pos.y, err);
        }
    }
}

pub fn to_coords(pos: Position) -> Coords {
    (pos.x.max(0) as TermInt, pos.y.max(0) as TermInt)
}

fn wall_glyph(pos: Position, rows: usize, cols: usize) -> Glyph {
    let is_top_or_bottom = pos.y == 0 || pos.y as usize + 1 == rows;
    let is_side = pos.x == 0 || pos.x as usize + 1 == cols;
    let ch = match (is_top_or_bottom, is_side) {
        (true, true) => '+',
        (true, false) => '-',
        _ => '|',
    };
    Glyph::new(ch, WALL_COLOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wall_glyphs() {
        assert_eq!(wall_glyph(Position::new(0, 0), 5, 6).ch, '+');
        assert_eq!(wall_glyph(Position::new(5, 4), 5, 6).ch, '+');
        assert_eq!(wall_glyph(Position::new(2, 0), 5, 6).ch, '-');
        assert_eq!(wall_glyph(Position::new(2, 4), 5, 6).ch, '-');
        assert_eq!(wall_glyph(Position::new(0, 2), 5, 6).ch, '|');
        assert_eq!(wall_glyph(Position::new(5, 3), 5, 6).ch, '|');
    }

    #[test]
    fn test_to_coords() {
        assert_eq!(to_coords(Position::new(3, 7)), (3, 7));
        assert_eq!(to_coords(Position::new(-2, 1)), (0, 1));
    }
}
