//! Backgammon board representation, single-face move generation and state strings.

use std::fmt;
use std::fmt::Write;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use lazy_static::lazy_static;
use rand::{Rng, SeedableRng};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::ParseError;
use color_trait::{ColorTr, RedTr, WhiteTr};

pub(crate) mod color_trait;
pub mod mv;
pub mod utils;

pub use mv::{Move, MoveLabel, ReverseMove};
pub use utils::{Color, Origin, Point};

/// Number of pieces each side plays with
pub const NUM_PIECES: u8 = 15;

pub const NUM_POINTS: usize = 24;

/// Zobrist locations per color: the bar, the 24 points and the home pile
const NUM_LOCATIONS: usize = NUM_POINTS + 2;

lazy_static! {
    static ref ZOBRIST_KEYS: Box<ZobristKeys> = ZobristKeys::new();
}

struct ZobristKeys {
    counts: [[[u64; NUM_PIECES as usize + 1]; NUM_LOCATIONS]; 2],
}

impl ZobristKeys {
    fn new() -> Box<Self> {
        let mut rng = rand::rngs::StdRng::from_seed([0; 32]);
        let mut keys = Box::new(ZobristKeys {
            counts: [[[0; NUM_PIECES as usize + 1]; NUM_LOCATIONS]; 2],
        });
        for word in keys.counts.iter_mut().flatten().flatten() {
            *word = rng.gen();
        }
        keys
    }
}

fn zobrist_count(color: Color, location: Location, count: u8) -> u64 {
    ZOBRIST_KEYS.counts[color.disc()][location.zobrist_index()][count as usize]
}

/// Somewhere a piece can be
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Location {
    Bar,
    Point(u8),
    Home,
}

impl Location {
    fn zobrist_index(self) -> usize {
        match self {
            Location::Bar => 0,
            Location::Point(point) => point as usize,
            Location::Home => NUM_LOCATIONS - 1,
        }
    }
}

/// Complete representation of a backgammon position: points, bars and home piles.
///
/// Points are numbered 1 to 24. Equality compares occupancy only, and hashing uses
/// a Zobrist hash that is kept up to date by `do_move` and `reverse_move`.
#[derive(Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(into = "String", try_from = "String"))]
pub struct Board {
    points: [Point; NUM_POINTS],
    bars: [u8; 2],
    homes: [u8; 2],
    hash: u64,
}

impl PartialEq for Board {
    fn eq(&self, other: &Self) -> bool {
        self.points == other.points && self.bars == other.bars && self.homes == other.homes
    }
}

impl Eq for Board {}

impl Hash for Board {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash)
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        for row in [(13..=24).collect::<Vec<u8>>(), (1..=12).rev().collect()] {
            for point in row {
                match self.point(point).owner() {
                    None => write!(f, "[  .]")?,
                    Some(color) => {
                        write!(f, "[{}{:2}]", color.to_char(), self.point(point).count())?
                    }
                }
            }
            writeln!(f)?;
        }
        writeln!(
            f,
            "Bar: {}/{}, home: {}/{}.",
            self.bars[0], self.bars[1], self.homes[0], self.homes[1]
        )?;
        writeln!(f, "State: {}", self.state_string())?;
        Ok(())
    }
}

impl Default for Board {
    /// A board with no pieces on it. Only useful as a starting point for parsing.
    fn default() -> Self {
        Board::empty()
    }
}

impl Board {
    fn empty() -> Self {
        let mut board = Board {
            points: [Point::default(); NUM_POINTS],
            bars: [0; 2],
            homes: [0; 2],
            hash: 0,
        };
        board.hash = board.zobrist_hash_from_scratch();
        board
    }

    /// The standard starting position
    pub fn setup() -> Self {
        let mut board = Board::empty();
        for (point, count) in [(1, 2), (12, 5), (17, 3), (19, 5)] {
            for _ in 0..count {
                board.add_piece(Color::White, Location::Point(point));
                board.add_piece(Color::Red, Location::Point(25 - point));
            }
        }
        board
    }

    /// The contents of a point in 1..=24. Panics on any other number.
    pub fn point(&self, point: u8) -> Point {
        debug_assert!(
            (1..=NUM_POINTS as u8).contains(&point),
            "Invalid point {}",
            point
        );
        self.points[point as usize - 1]
    }

    pub fn points(&self) -> impl Iterator<Item = (u8, Point)> + '_ {
        (1..=NUM_POINTS as u8).zip(self.points.iter().copied())
    }

    pub fn bar_count(&self, color: Color) -> u8 {
        self.bars[color.disc()]
    }

    pub fn home_count(&self, color: Color) -> u8 {
        self.homes[color.disc()]
    }

    /// Pieces of `color` on points, bar and home. Always 15 on a legal board.
    pub fn piece_count(&self, color: Color) -> u8 {
        self.points.iter().map(|point| point.count_of(color)).sum::<u8>()
            + self.bar_count(color)
            + self.home_count(color)
    }

    pub fn has_winner(&self, color: Color) -> bool {
        self.home_count(color) == NUM_PIECES
    }

    /// Total pips `color` needs to bear off every piece
    pub fn pip_count(&self, color: Color) -> u32 {
        let on_points: u32 = self
            .points()
            .map(|(point, contents)| {
                let distance = match color {
                    Color::White => WhiteTr::distance_off(point),
                    Color::Red => RedTr::distance_off(point),
                };
                contents.count_of(color) as u32 * distance as u32
            })
            .sum();
        on_points + self.bar_count(color) as u32 * 25
    }

    /// Whether every piece of `color` not yet borne off is in its home quadrant
    pub fn may_bearoff(&self, color: Color) -> bool {
        match color {
            Color::White => self.may_bearoff_colortr::<WhiteTr>(),
            Color::Red => self.may_bearoff_colortr::<RedTr>(),
        }
    }

    fn may_bearoff_colortr<Us: ColorTr>(&self) -> bool {
        let color = Us::color();
        self.bar_count(color) == 0
            && self
                .points()
                .all(|(point, contents)| contents.count_of(color) == 0 || Us::is_home(point))
    }

    /// Whether `Us` has a piece farther from home than `point`
    pub(crate) fn has_piece_behind<Us: ColorTr>(&self, point: u8) -> bool {
        let distance = Us::distance_off(point);
        self.points().any(|(other, contents)| {
            contents.count_of(Us::color()) > 0 && Us::distance_off(other) > distance
        })
    }

    /// Adds all legal moves for `color` using one die showing `face` to the provided vector.
    ///
    /// While `color` has pieces on the bar, only the come-in move can be generated.
    pub fn generate_moves(&self, color: Color, face: u8, moves: &mut Vec<Move>) {
        debug_assert!((1..=6).contains(&face), "Invalid face {}", face);
        if self.bar_count(color) > 0 {
            moves.extend(Move::new(self, color, Origin::Bar, face).ok());
            return;
        }
        for (point, contents) in self.points() {
            if contents.count_of(color) > 0 {
                moves.extend(Move::new(self, color, Origin::Point(point), face).ok());
            }
        }
    }

    /// Applies a move that is legal on this board, returning the information needed to reverse it
    pub fn do_move(&mut self, mv: Move) -> ReverseMove {
        let color = mv.color();
        let mut hit = false;
        match mv {
            Move::ComeIn { .. } => self.remove_piece(color, Location::Bar),
            Move::Regular { from, .. } | Move::Bearoff { from, .. } => {
                self.remove_piece(color, Location::Point(from))
            }
        }
        match mv.destination() {
            Some(to) => {
                if self.point(to).is_blot_for(color) {
                    self.remove_piece(!color, Location::Point(to));
                    self.add_piece(!color, Location::Bar);
                    hit = true;
                }
                self.add_piece(color, Location::Point(to));
            }
            None => self.add_piece(color, Location::Home),
        }

        debug_assert_eq!(
            self.piece_count(color),
            NUM_PIECES,
            "Wrong number of pieces after {}:\n{:?}",
            mv,
            self
        );
        debug_assert_eq!(self.hash, self.zobrist_hash_from_scratch());

        ReverseMove { mv, hit }
    }

    pub fn reverse_move(&mut self, reverse_move: ReverseMove) {
        let ReverseMove { mv, hit } = reverse_move;
        let color = mv.color();
        match mv.destination() {
            Some(to) => {
                self.remove_piece(color, Location::Point(to));
                if hit {
                    self.remove_piece(!color, Location::Bar);
                    self.add_piece(!color, Location::Point(to));
                }
            }
            None => self.remove_piece(color, Location::Home),
        }
        match mv {
            Move::ComeIn { .. } => self.add_piece(color, Location::Bar),
            Move::Regular { from, .. } | Move::Bearoff { from, .. } => {
                self.add_piece(color, Location::Point(from))
            }
        }

        debug_assert_eq!(self.piece_count(color), NUM_PIECES);
        debug_assert_eq!(self.hash, self.zobrist_hash_from_scratch());
    }

    pub fn zobrist_hash(&self) -> u64 {
        self.hash
    }

    pub(crate) fn zobrist_hash_from_scratch(&self) -> u64 {
        let mut hash = 0;
        for color in [Color::White, Color::Red] {
            hash ^= zobrist_count(color, Location::Bar, self.bar_count(color));
            hash ^= zobrist_count(color, Location::Home, self.home_count(color));
            for (point, contents) in self.points() {
                hash ^= zobrist_count(color, Location::Point(point), contents.count_of(color));
            }
        }
        hash
    }

    fn count_at(&self, color: Color, location: Location) -> u8 {
        match location {
            Location::Bar => self.bar_count(color),
            Location::Home => self.home_count(color),
            Location::Point(point) => self.point(point).count_of(color),
        }
    }

    fn add_piece(&mut self, color: Color, location: Location) {
        let count = self.count_at(color, location);
        self.hash ^= zobrist_count(color, location, count) ^ zobrist_count(color, location, count + 1);
        match location {
            Location::Bar => self.bars[color.disc()] += 1,
            Location::Home => self.homes[color.disc()] += 1,
            Location::Point(point) => {
                let contents = &mut self.points[point as usize - 1];
                debug_assert_ne!(contents.owner, Some(!color), "Point {} is mixed", point);
                contents.owner = Some(color);
                contents.count += 1;
            }
        }
    }

    fn remove_piece(&mut self, color: Color, location: Location) {
        let count = self.count_at(color, location);
        debug_assert!(count > 0, "No {} piece at {:?}", color, location);
        self.hash ^= zobrist_count(color, location, count) ^ zobrist_count(color, location, count - 1);
        match location {
            Location::Bar => self.bars[color.disc()] -= 1,
            Location::Home => self.homes[color.disc()] -= 1,
            Location::Point(point) => {
                let contents = &mut self.points[point as usize - 1];
                contents.count -= 1;
                if contents.count == 0 {
                    contents.owner = None;
                }
            }
        }
    }

    /// Canonical encoding of the full occupancy, used as the equality key during search.
    ///
    /// Layout: `<white bar>/<red bar>|<point 1>,...,<point 24>|<white home>/<red home>`,
    /// where each point is `0`, `W<count>` or `R<count>`.
    pub fn state_string(&self) -> String {
        let mut f = String::with_capacity(96);
        write!(f, "{}/{}|", self.bars[0], self.bars[1]).unwrap();
        for (i, (_, contents)) in self.points().enumerate() {
            if i > 0 {
                f.push(',');
            }
            match contents.owner() {
                None => f.push('0'),
                Some(color) => write!(f, "{}{}", color.to_char(), contents.count()).unwrap(),
            }
        }
        write!(f, "|{}/{}", self.homes[0], self.homes[1]).unwrap();
        f
    }

    pub fn from_state_string(input: &str) -> Result<Self, ParseError> {
        let malformed = |reason: &str| ParseError::Malformed {
            input: input.to_string(),
            reason: reason.to_string(),
        };
        let sections: Vec<&str> = input.trim().split('|').collect();
        if sections.len() != 3 {
            return Err(malformed("expected 3 sections separated by '|'"));
        }

        let mut board = Board::empty();

        let (white_bar, red_bar) = parse_pair(sections[0]).ok_or_else(|| malformed("bad bar counts"))?;
        let (white_home, red_home) =
            parse_pair(sections[2]).ok_or_else(|| malformed("bad home counts"))?;

        let cells: Vec<&str> = sections[1].split(',').collect();
        if cells.len() != NUM_POINTS {
            return Err(malformed(&format!(
                "had {} points instead of {}",
                cells.len(),
                NUM_POINTS
            )));
        }
        for (point, cell) in (1..=NUM_POINTS as u8).zip(cells) {
            let bad_point = || ParseError::BadPoint {
                point,
                value: cell.to_string(),
            };
            if cell == "0" {
                continue;
            }
            let mut chars = cell.chars();
            let color = chars.next().and_then(Color::from_char).ok_or_else(bad_point)?;
            let count = chars
                .as_str()
                .parse::<u8>()
                .ok()
                .filter(|count| (1..=NUM_PIECES).contains(count))
                .ok_or_else(bad_point)?;
            board.points[point as usize - 1] = Point {
                owner: Some(color),
                count,
            };
        }
        board.bars = [white_bar, red_bar];
        board.homes = [white_home, red_home];

        for color in [Color::White, Color::Red] {
            let count = board
                .points
                .iter()
                .map(|point| point.count_of(color) as u32)
                .sum::<u32>()
                + board.bar_count(color) as u32
                + board.home_count(color) as u32;
            if count != NUM_PIECES as u32 {
                return Err(ParseError::PieceCount { color, count });
            }
        }

        board.hash = board.zobrist_hash_from_scratch();
        return Ok(board);

        fn parse_pair(section: &str) -> Option<(u8, u8)> {
            let (white, red) = section.split_once('/')?;
            Some((white.parse().ok()?, red.parse().ok()?))
        }
    }
}

impl FromStr for Board {
    type Err = ParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        Board::from_state_string(input)
    }
}

impl From<Board> for String {
    fn from(board: Board) -> Self {
        board.state_string()
    }
}

impl TryFrom<String> for Board {
    type Error = ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Board::from_state_string(&value)
    }
}
