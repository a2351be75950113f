use std::fmt;
use std::ops;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// One of the two sides. White moves from point 1 towards point 24, Red the other way.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Color {
    White = 0,
    Red = 1,
}

impl Color {
    pub fn disc(self) -> usize {
        self as u16 as usize
    }

    pub fn to_char(self) -> char {
        match self {
            Color::White => 'W',
            Color::Red => 'R',
        }
    }

    pub fn from_char(ch: char) -> Option<Self> {
        match ch {
            'W' => Some(Color::White),
            'R' => Some(Color::Red),
            _ => None,
        }
    }
}

impl ops::Not for Color {
    type Output = Color;

    fn not(self) -> Self::Output {
        match self {
            Color::White => Color::Red,
            Color::Red => Color::White,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => write!(f, "White"),
            Color::Red => write!(f, "Red"),
        }
    }
}

/// Where a move starts: the bar, or a point numbered 1 to 24.
///
/// Ordered with the bar first, then by point number.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Origin {
    Bar,
    Point(u8),
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Origin::Bar => write!(f, "bar"),
            Origin::Point(point) => write!(f, "{}", point),
        }
    }
}

impl FromStr for Origin {
    type Err = ParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        if input == "bar" {
            return Ok(Origin::Bar);
        }
        match input.parse::<u8>() {
            Ok(point @ 1..=24) => Ok(Origin::Point(point)),
            _ => Err(ParseError::BadLabel {
                input: input.to_string(),
            }),
        }
    }
}

/// The contents of one point: zero or more pieces of a single color
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Hash)]
pub struct Point {
    pub(crate) owner: Option<Color>,
    pub(crate) count: u8,
}

impl Point {
    pub fn owner(self) -> Option<Color> {
        self.owner
    }

    pub fn count(self) -> u8 {
        self.count
    }

    pub fn is_empty(self) -> bool {
        self.count == 0
    }

    /// Number of pieces of `color` on this point
    pub fn count_of(self, color: Color) -> u8 {
        if self.owner == Some(color) {
            self.count
        } else {
            0
        }
    }

    /// A point is blocked for a color when two or more opposing pieces hold it
    pub fn is_blocked_for(self, color: Color) -> bool {
        self.owner == Some(!color) && self.count >= 2
    }

    /// A lone opposing piece that would be hit by `color` landing here
    pub fn is_blot_for(self, color: Color) -> bool {
        self.owner == Some(!color) && self.count == 1
    }
}
