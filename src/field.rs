//! The playing field: a rows x cols grid of cells surrounded by a wall ring.
//!
//! Cells are stored row-major (`y * cols + x`). Coordinates outside
//! `[0, cols) x [0, rows)` are rejected with [`Error::OutOfBounds`].

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::cell::{Cell, CellType, CellView, Position};
use crate::error::{Error, Result};

/// Smallest side that still leaves a playable interior inside the walls.
pub const MIN_SIDE: usize = 3;

pub struct Field<V> {
    rows: usize,
    cols: usize,
    cells: Vec<Cell<V>>,
    rng: StdRng,
}

impl<V: CellView> Field<V> {
    /// Builds the grid, asking `factory` for the view of every cell.
    /// Each cell is rendered once as soon as it exists.
    pub fn new<F>(rows: usize, cols: usize, mut factory: F) -> Result<Self>
    where
        F: FnMut(Position, CellType) -> V,
    {
        if rows < MIN_SIDE || cols < MIN_SIDE {
            return Err(Error::InvalidDimensions { rows, cols });
        }

        let mut cells = Vec::with_capacity(rows * cols);
        for y in 0..rows {
            for x in 0..cols {
                let is_top_or_bottom = y == 0 || y + 1 == rows;
                let is_side = x == 0 || x + 1 == cols;
                let kind = if is_top_or_bottom || is_side {
                    CellType::Wall
                } else {
                    CellType::Weed
                };

                let pos = Position::new(x as i32, y as i32);
                let mut cell = Cell::new(pos, kind, factory(pos, kind));
                cell.render();
                cells.push(cell);
            }
        }

        Ok(Field {
            rows,
            cols,
            cells,
            rng: StdRng::from_entropy(),
        })
    }

    /// Makes apple placement reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    fn index(&self, x: i32, y: i32) -> Result<usize> {
        if x < 0 || y < 0 || x as usize >= self.cols || y as usize >= self.rows {
            return Err(Error::OutOfBounds {
                x,
                y,
                cols: self.cols,
                rows: self.rows,
            });
        }
        Ok(y as usize * self.cols + x as usize)
    }

    pub fn cell(&self, x: i32, y: i32) -> Result<&Cell<V>> {
        let idx = self.index(x, y)?;
        Ok(&self.cells[idx])
    }

    pub fn cell_mut(&mut self, x: i32, y: i32) -> Result<&mut Cell<V>> {
        let idx = self.index(x, y)?;
        Ok(&mut self.cells[idx])
    }

    pub fn kind_at(&self, pos: Position) -> Result<CellType> {
        self.cell(pos.x, pos.y).map(Cell::kind)
    }

    /// Returns whether the cell actually changed (and was re-rendered).
    pub fn set_kind(&mut self, pos: Position, kind: CellType) -> Result<bool> {
        Ok(self.cell_mut(pos.x, pos.y)?.set_kind(kind))
    }

    pub fn is_wall(&self, x: i32, y: i32) -> Result<bool> {
        self.cell(x, y).map(Cell::is_wall)
    }

    pub fn is_snake(&self, x: i32, y: i32) -> Result<bool> {
        self.cell(x, y).map(Cell::is_snake)
    }

    pub fn is_apple(&self, x: i32, y: i32) -> Result<bool> {
        self.cell(x, y).map(Cell::is_apple)
    }

    /// True for cells strictly inside the wall ring.
    pub fn is_interior(&self, pos: Position) -> bool {
        pos.x > 0 && pos.y > 0 && (pos.x as usize) + 1 < self.cols && (pos.y as usize) + 1 < self.rows
    }

    pub fn cells(&self) -> impl Iterator<Item = &Cell<V>> {
        self.cells.iter()
    }

    pub fn count(&self, kind: CellType) -> usize {
        self.cells.iter().filter(|cell| cell.kind() == kind).count()
    }

    /// Whether some interior cell is neither wall nor snake.
    pub fn has_free_interior(&self) -> bool {
        self.cells
            .iter()
            .any(|cell| self.is_interior(cell.position()) && !cell.is_snake() && !cell.is_wall())
    }

    /// Turns a random interior cell that is neither wall nor snake into an
    /// apple and returns its position. An existing apple may be picked again.
    /// Returns `None` when the snake covers the whole interior.
    pub fn spawn_apple(&mut self) -> Option<Position> {
        if !self.has_free_interior() {
            log::debug!("no free cell left for an apple");
            return None;
        }

        loop {
            let x = self.rng.gen_range(1..self.cols - 1);
            let y = self.rng.gen_range(1..self.rows - 1);
            let idx = y * self.cols + x;
            let cell = &mut self.cells[idx];

            if cell.is_snake() || cell.is_wall() {
                continue;
            }

            cell.set_kind(CellType::Apple);
            log::debug!("apple spawned at ({}, {})", x, y);
            return Some(cell.position());
        }
    }
}
