//! Dice rolls, and the face sequences a roll can be played in.

use std::fmt;

use arrayvec::ArrayVec;
use rand::Rng;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::MoveError;

/// Longest sequence of faces a single roll can produce (a double)
pub const MAX_SEQUENCE_LEN: usize = 4;

/// One fixed order in which the faces of a roll are proposed to be played
pub type FaceSequence = ArrayVec<u8, MAX_SEQUENCE_LEN>;

/// A validated roll of two dice. A double is played as four faces.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Dice {
    faces: [u8; 2],
}

impl Dice {
    pub fn new(first: u8, second: u8) -> Result<Self, MoveError> {
        if (1..=6).contains(&first) && (1..=6).contains(&second) {
            Ok(Dice {
                faces: [first, second],
            })
        } else {
            Err(MoveError::InvalidRoll {
                faces: vec![first, second],
            })
        }
    }

    /// Accepts either two faces, or four equal faces for a double
    pub fn from_faces(faces: &[u8]) -> Result<Self, MoveError> {
        let invalid = || MoveError::InvalidRoll {
            faces: faces.to_vec(),
        };
        match faces {
            [first, second] => Dice::new(*first, *second).map_err(|_| invalid()),
            [first, rest @ ..] if rest.len() == 3 && rest.iter().all(|face| face == first) => {
                Dice::new(*first, *first).map_err(|_| invalid())
            }
            _ => Err(invalid()),
        }
    }

    pub fn roll<R: Rng>(rng: &mut R) -> Self {
        Dice {
            faces: [rng.gen_range(1..=6), rng.gen_range(1..=6)],
        }
    }

    pub fn first(&self) -> u8 {
        self.faces[0]
    }

    pub fn second(&self) -> u8 {
        self.faces[1]
    }

    pub fn is_double(&self) -> bool {
        self.faces[0] == self.faces[1]
    }

    /// The faces available to play, four of them for a double
    pub fn faces(&self) -> FaceSequence {
        let mut faces = FaceSequence::new();
        if self.is_double() {
            for _ in 0..MAX_SEQUENCE_LEN {
                faces.push(self.faces[0]);
            }
        } else {
            faces.push(self.faces[0]);
            faces.push(self.faces[1]);
        }
        faces
    }

    /// Every ordering of the faces: both orders of a pair, or the single sequence of a double
    pub fn sequences(&self) -> ArrayVec<FaceSequence, 2> {
        let mut sequences = ArrayVec::new();
        sequences.push(self.faces());
        if !self.is_double() {
            sequences.push(self.faces().into_iter().rev().collect());
        }
        sequences
    }
}

impl fmt::Display for Dice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.faces[0], self.faces[1])
    }
}
