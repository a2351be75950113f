//* Traits for white/red colors. Useful for writing functions that are generic over color,
//* like how the move checks are structured.

use super::Color;

pub(crate) trait ColorTr {
    fn color() -> Color;

    /// Point reached by moving `face` pips forward from `point`, or `None` past the edge
    fn advance(point: u8, face: u8) -> Option<u8>;

    /// Point entered from the bar with `face`
    fn entry_point(face: u8) -> u8;

    fn is_home(point: u8) -> bool;

    /// Pips needed to bear a piece off from `point`
    fn distance_off(point: u8) -> u8;
}

pub(crate) struct WhiteTr {}

impl ColorTr for WhiteTr {
    fn color() -> Color {
        Color::White
    }

    fn advance(point: u8, face: u8) -> Option<u8> {
        let destination = point + face;
        if destination <= 24 {
            Some(destination)
        } else {
            None
        }
    }

    fn entry_point(face: u8) -> u8 {
        face
    }

    fn is_home(point: u8) -> bool {
        point >= 19
    }

    fn distance_off(point: u8) -> u8 {
        25 - point
    }
}

pub(crate) struct RedTr {}

impl ColorTr for RedTr {
    fn color() -> Color {
        Color::Red
    }

    fn advance(point: u8, face: u8) -> Option<u8> {
        if point > face {
            Some(point - face)
        } else {
            None
        }
    }

    fn entry_point(face: u8) -> u8 {
        25 - face
    }

    fn is_home(point: u8) -> bool {
        point <= 6
    }

    fn distance_off(point: u8) -> u8 {
        point
    }
}
