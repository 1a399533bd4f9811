//! Snake on a walled grid.
//!
//! The engine ([`field`], [`snake`], [`game`]) knows nothing about drawing:
//! every cell carries a [`CellView`] that is told about each type change.
//! [`term`] and [`session`] provide the terminal front end.

pub mod cell;
pub mod config;
pub mod error;
pub mod field;
pub mod game;
pub mod session;
pub mod snake;
pub mod term;
pub mod ticker;

pub use cell::{Cell, CellType, CellView, Position};
pub use config::GameConfig;
pub use error::{Error, Result};
pub use field::Field;
pub use game::{Ending, Game};
pub use snake::{Direction, MoveResult, Snake};
pub use ticker::{IntervalTicker, ManualTicker, Ticker};
