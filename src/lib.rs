//! Legal move search for backgammon turns.
//!
//! Given a board, the color to move and a roll, the crate finds every legal way to
//! play the roll, under the rules that as many dice as possible must be used, that
//! the higher die must be used when only one can be, and that bearing off the last
//! piece ends the turn at once. The result is an index of allowed moves that a
//! `Turn` walks one move at a time.

pub mod board;
pub mod builder;
pub mod dice;
pub mod error;
pub mod sequence;
pub mod turn;
mod tests;

pub use board::{Board, Color, Move, MoveLabel, Origin};
pub use builder::{BuilderKind, MoveIndex, TurnBuilder, TurnResult};
pub use dice::Dice;
pub use error::{MoveError, ParseError, SearchError, TurnError};
pub use turn::{Turn, TurnSettings};
