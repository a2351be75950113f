use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::board::color_trait::{ColorTr, RedTr, WhiteTr};
use crate::board::{Board, Color, Origin};
use crate::error::{MoveError, ParseError};

/// One die face applied to one piece.
///
/// The variant is decided when the move is constructed: a bar origin is a come-in,
/// a destination past the edge of the board is a bear-off, anything else is regular.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Move {
    ComeIn { color: Color, face: u8 },
    Regular { color: Color, from: u8, face: u8 },
    Bearoff { color: Color, from: u8, face: u8 },
}

impl Move {
    /// Checks the move against `board` before constructing it.
    pub fn new(board: &Board, color: Color, origin: Origin, face: u8) -> Result<Self, MoveError> {
        match color {
            Color::White => Self::new_colortr::<WhiteTr>(board, origin, face),
            Color::Red => Self::new_colortr::<RedTr>(board, origin, face),
        }
    }

    /// Classifies the move without checking it. Only for speculative use,
    /// where the caller already knows the move is legal.
    pub fn new_unchecked(color: Color, origin: Origin, face: u8) -> Self {
        match origin {
            Origin::Bar => Move::ComeIn { color, face },
            Origin::Point(from) => {
                let overruns = match color {
                    Color::White => WhiteTr::advance(from, face).is_none(),
                    Color::Red => RedTr::advance(from, face).is_none(),
                };
                if overruns {
                    Move::Bearoff { color, from, face }
                } else {
                    Move::Regular { color, from, face }
                }
            }
        }
    }

    fn new_colortr<Us: ColorTr>(board: &Board, origin: Origin, face: u8) -> Result<Self, MoveError> {
        let color = Us::color();
        if !(1..=6).contains(&face) {
            return Err(MoveError::InvalidRoll { faces: vec![face] });
        }
        let from = match origin {
            Origin::Bar => {
                if board.bar_count(color) == 0 {
                    return Err(MoveError::NoPieceOnBar { color });
                }
                let entry = Us::entry_point(face);
                if board.point(entry).is_blocked_for(color) {
                    return Err(MoveError::OccupiedSlot { point: entry });
                }
                return Ok(Move::ComeIn { color, face });
            }
            Origin::Point(from) => from,
        };
        if !(1..=24).contains(&from) {
            return Err(MoveError::MoveOutOfRange { origin: from });
        }
        if board.bar_count(color) > 0 {
            return Err(MoveError::PieceOnBar { color });
        }
        if board.point(from).count_of(color) == 0 {
            return Err(MoveError::NoPieceOnSlot { color, point: from });
        }
        match Us::advance(from, face) {
            Some(to) if board.point(to).is_blocked_for(color) => {
                Err(MoveError::OccupiedSlot { point: to })
            }
            Some(_) => Ok(Move::Regular { color, from, face }),
            None => {
                if !board.may_bearoff(color) {
                    return Err(MoveError::MayNotBearoff { color });
                }
                if Us::distance_off(from) < face && board.has_piece_behind::<Us>(from) {
                    return Err(MoveError::IllegalBearoff {
                        color,
                        point: from,
                        face,
                    });
                }
                Ok(Move::Bearoff { color, from, face })
            }
        }
    }

    pub fn color(&self) -> Color {
        match *self {
            Move::ComeIn { color, .. }
            | Move::Regular { color, .. }
            | Move::Bearoff { color, .. } => color,
        }
    }

    pub fn face(&self) -> u8 {
        match *self {
            Move::ComeIn { face, .. } | Move::Regular { face, .. } | Move::Bearoff { face, .. } => {
                face
            }
        }
    }

    pub fn origin(&self) -> Origin {
        match *self {
            Move::ComeIn { .. } => Origin::Bar,
            Move::Regular { from, .. } | Move::Bearoff { from, .. } => Origin::Point(from),
        }
    }

    /// The point the piece lands on, or `None` when it is borne off
    pub fn destination(&self) -> Option<u8> {
        match *self {
            Move::ComeIn { color, face } => Some(match color {
                Color::White => WhiteTr::entry_point(face),
                Color::Red => RedTr::entry_point(face),
            }),
            Move::Regular { color, from, face } => match color {
                Color::White => WhiteTr::advance(from, face),
                Color::Red => RedTr::advance(from, face),
            },
            Move::Bearoff { .. } => None,
        }
    }

    pub fn label(&self) -> MoveLabel {
        MoveLabel::new(self.origin(), self.face())
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// The counterpart of `Move`. When applied to a `Board`, it fully reverses the accompanying `Move`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ReverseMove {
    pub(crate) mv: Move,
    pub(crate) hit: bool,
}

impl ReverseMove {
    pub fn mv(&self) -> Move {
        self.mv
    }

    /// Whether the move sent an opposing blot to the bar
    pub fn hit(&self) -> bool {
        self.hit
    }
}

/// Key of a move in the allowed-move index, written `origin:face`, e.g. `13:5` or `bar:3`.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(into = "String", try_from = "String"))]
pub struct MoveLabel {
    pub origin: Origin,
    pub face: u8,
}

impl MoveLabel {
    pub fn new(origin: Origin, face: u8) -> Self {
        MoveLabel { origin, face }
    }
}

impl Ord for MoveLabel {
    fn cmp(&self, other: &Self) -> Ordering {
        self.origin
            .cmp(&other.origin)
            .then(self.face.cmp(&other.face))
    }
}

impl PartialOrd for MoveLabel {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for MoveLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.origin, self.face)
    }
}

impl FromStr for MoveLabel {
    type Err = ParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let bad_label = || ParseError::BadLabel {
            input: input.to_string(),
        };
        let (origin, face) = input.split_once(':').ok_or_else(bad_label)?;
        let origin = origin.parse::<Origin>().map_err(|_| bad_label())?;
        match face.parse::<u8>() {
            Ok(face @ 1..=6) => Ok(MoveLabel::new(origin, face)),
            _ => Err(bad_label()),
        }
    }
}

impl From<MoveLabel> for String {
    fn from(label: MoveLabel) -> Self {
        label.to_string()
    }
}

impl TryFrom<String> for MoveLabel {
    type Error = ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
