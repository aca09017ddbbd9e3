//! Klondike solitaire rules engine: dealing, drawing, legal moves between
//! piles, win detection and the session's win/loss record.

pub mod card;
pub mod celebration;
pub mod column;
pub mod deck;
pub mod error;
pub mod game;
pub mod layout;
pub mod moves;
pub mod pile;
pub mod snapshot;

#[cfg(test)]
mod tests;

pub use card::{Card, Color, Suit};
pub use error::{MoveError, RejectReason};
pub use game::{DrawMode, Game, GameEvent, Stats, StockAction};
pub use layout::{Rect, TableLayout};
pub use moves::{AutoMove, DropOutcome};
pub use pile::{Pile, PileId};
pub use snapshot::{PileSnapshot, TableSnapshot};
