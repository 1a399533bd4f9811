use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// A coordinate on the field. `x` grows to the right, `y` grows downwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellType {
    Weed,
    Apple,
    Snake,
    Wall,
}

impl CellType {
    pub const ALL: [CellType; 4] = [CellType::Weed, CellType::Apple, CellType::Snake, CellType::Wall];

    pub fn name(&self) -> &'static str {
        match self {
            CellType::Weed => "weed",
            CellType::Apple => "apple",
            CellType::Snake => "snake",
            CellType::Wall => "wall",
        }
    }
}

impl fmt::Display for CellType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CellType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        CellType::ALL
            .iter()
            .copied()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| Error::InvalidCellType(s.to_string()))
    }
}

/// Presentation side of a cell. The engine calls `render` after every
/// committed type change so the view never goes stale.
pub trait CellView {
    fn render(&mut self, pos: Position, kind: CellType);
}

/// Headless view, draws nothing.
impl CellView for () {
    fn render(&mut self, _pos: Position, _kind: CellType) {}
}

/// A single unit of the field: a type tag plus whatever view the cell
/// factory attached to it.
#[derive(Debug)]
pub struct Cell<V> {
    pos: Position,
    kind: CellType,
    view: V,
}

impl<V: CellView> Cell<V> {
    pub(crate) fn new(pos: Position, kind: CellType, view: V) -> Self {
        Cell { pos, kind, view }
    }

    pub fn position(&self) -> Position {
        self.pos
    }

    pub fn kind(&self) -> CellType {
        self.kind
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    /// Returns false without rendering when `kind` is already the current type.
    pub fn set_kind(&mut self, kind: CellType) -> bool {
        if kind == self.kind {
            return false;
        }

        self.kind = kind;
        self.render();
        true
    }

    pub fn set_type(&mut self, name: &str) -> Result<bool> {
        let kind = name.parse()?;
        Ok(self.set_kind(kind))
    }

    pub fn render(&mut self) {
        self.view.render(self.pos, self.kind);
    }

    pub fn is_wall(&self) -> bool {
        self.kind == CellType::Wall
    }

    pub fn is_snake(&self) -> bool {
        self.kind == CellType::Snake
    }

    pub fn is_apple(&self) -> bool {
        self.kind == CellType::Apple
    }
}
