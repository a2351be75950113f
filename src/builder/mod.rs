//! Combines the trees of every dice ordering into the set of allowed plays for a turn.
//!
//! A play must use as many dice as possible. When only one die of a pair can be used
//! and either could be, the higher one must be played. Bearing off the last piece wins
//! on the spot, so winning plays are allowed even when dice are left over.
//!
//! Two builders implement these rules independently: `DepthBuilder` on depth-first
//! trees, and `BreadthBuilder` on breadth-first trees. They must always agree.

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::board::{Board, Color, MoveLabel};
use crate::dice::Dice;
use crate::error::SearchError;
use crate::sequence::SequenceTree;

mod breadth;
mod depth;
mod index;

pub use breadth::BreadthBuilder;
pub use depth::DepthBuilder;
pub use index::MoveIndex;

/// Builds the allowed plays for one color and roll
pub trait TurnBuilder {
    fn build(&self, board: &Board, color: Color, dice: &Dice) -> Result<TurnResult, SearchError>;
}

/// Which search strategy to build turns with
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BuilderKind {
    #[default]
    Depth,
    Breadth,
}

/// Everything a player may do with one roll.
#[derive(Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TurnResult {
    allowed_moves: MoveIndex,
    end_states: BTreeMap<String, Vec<MoveLabel>>,
    allowed_faces: BTreeSet<u8>,
    max_depth: u8,
    has_winner: bool,
}

impl TurnResult {
    pub(crate) fn new(
        allowed_moves: MoveIndex,
        end_states: BTreeMap<String, Vec<MoveLabel>>,
        max_depth: u8,
        has_winner: bool,
    ) -> Self {
        let allowed_faces = allowed_moves.labels().map(|label| label.face).collect();
        TurnResult {
            allowed_moves,
            end_states,
            allowed_faces,
            max_depth,
            has_winner,
        }
    }

    /// The full index of allowed moves, starting from the first move
    pub fn allowed_moves(&self) -> &MoveIndex {
        &self.allowed_moves
    }

    /// Each distinct end position, by state string, mapped to one series of moves reaching it
    pub fn end_states(&self) -> &BTreeMap<String, Vec<MoveLabel>> {
        &self.end_states
    }

    pub fn allowed_end_states(&self) -> impl Iterator<Item = &str> {
        self.end_states.keys().map(String::as_str)
    }

    pub fn series_for(&self, state: &str) -> Option<&[MoveLabel]> {
        self.end_states.get(state).map(Vec::as_slice)
    }

    /// Faces that can be played as the first move
    pub fn allowed_faces(&self) -> &BTreeSet<u8> {
        &self.allowed_faces
    }

    /// Most faces playable in any ordering
    pub fn max_depth(&self) -> u8 {
        self.max_depth
    }

    pub fn has_winner(&self) -> bool {
        self.has_winner
    }

    /// Whether no move at all can be played
    pub fn is_cant_move(&self) -> bool {
        self.allowed_faces.is_empty()
    }
}

/// Builds a turn with the chosen strategy
pub fn build_turn(
    kind: BuilderKind,
    flag_keys: bool,
    board: &Board,
    color: Color,
    dice: &Dice,
) -> Result<TurnResult, SearchError> {
    match kind {
        BuilderKind::Depth => DepthBuilder::new()
            .flag_keys(flag_keys)
            .build(board, color, dice),
        BuilderKind::Breadth => BreadthBuilder::new().build(board, color, dice),
    }
}

/// Builds one tree per ordering of the dice, in parallel with the `rayon` feature
fn build_trees<F>(dice: &Dice, build: F) -> Result<Vec<SequenceTree>, SearchError>
where
    F: Fn(&[u8]) -> Result<SequenceTree, SearchError> + Sync + Send,
{
    let sequences = dice.sequences();
    #[cfg(feature = "rayon")]
    {
        use rayon::prelude::*;
        sequences
            .par_iter()
            .map(|sequence| build(sequence.as_slice()))
            .collect()
    }
    #[cfg(not(feature = "rayon"))]
    {
        sequences
            .iter()
            .map(|sequence| build(sequence.as_slice()))
            .collect()
    }
}

/// Keeps the smallest series of labels seen for an end state
fn keep_smallest_series(
    end_states: &mut BTreeMap<String, Vec<MoveLabel>>,
    state: String,
    series: &[MoveLabel],
) {
    match end_states.entry(state) {
        Entry::Vacant(entry) => {
            entry.insert(series.to_vec());
        }
        Entry::Occupied(mut entry) => {
            if series < entry.get().as_slice() {
                entry.insert(series.to_vec());
            }
        }
    }
}
