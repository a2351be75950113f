//! Error types for move legality, search and turn handling.

use thiserror::Error;

use crate::board::{Color, Origin};

/// A single-face move was rejected by the board.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum MoveError {
    #[error("{color} has no piece on the bar")]
    NoPieceOnBar { color: Color },

    #[error("{color} has a piece on the bar and must come in first")]
    PieceOnBar { color: Color },

    #[error("{color} has no piece on point {point}")]
    NoPieceOnSlot { color: Color, point: u8 },

    #[error("point {point} is held by the opponent")]
    OccupiedSlot { point: u8 },

    #[error("{color} may not bear off before all pieces are home")]
    MayNotBearoff { color: Color },

    #[error("{color} may not bear off from point {point} with a {face} while pieces remain behind it")]
    IllegalBearoff { color: Color, point: u8, face: u8 },

    #[error("origin {origin} is off the board")]
    MoveOutOfRange { origin: u8 },

    #[error("invalid roll {faces:?}")]
    InvalidRoll { faces: Vec<u8> },
}

/// The move search hit an internal bound or was given unusable dice.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SearchError {
    #[error("sequence depth {depth} exceeds the maximum of {max}")]
    MaxDepthExceeded { depth: usize, max: usize },

    #[error(transparent)]
    Move(#[from] MoveError),
}

/// The caller violated the turn state machine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TurnError {
    #[error("the turn has not been rolled")]
    NotRolled,

    #[error("the turn has already been rolled")]
    AlreadyRolled,

    #[error("the turn is already finished")]
    AlreadyFinished,

    #[error("moving from {origin} with a {face} is not allowed")]
    IllegalMove { origin: Origin, face: u8 },

    #[error("no moves have been made")]
    NoMovesMade,

    #[error("moves remain to be played")]
    MovesRemaining,

    #[error("{color} has legal moves and cannot pass")]
    HasMoves { color: Color },

    #[error(transparent)]
    Move(#[from] MoveError),

    #[error(transparent)]
    Search(#[from] SearchError),
}

/// Failure to read a board state string or a move label.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ParseError {
    #[error("couldn't parse state string \"{input}\": {reason}")]
    Malformed { input: String, reason: String },

    #[error("couldn't parse point {point}: unexpected \"{value}\"")]
    BadPoint { point: u8, value: String },

    #[error("{color} has {count} pieces instead of 15")]
    PieceCount { color: Color, count: u32 },

    #[error("couldn't parse move label \"{input}\"")]
    BadLabel { input: String },
}
