//! One player's turn: roll the dice, play moves one at a time, then finish.
//!
//! Every move is checked against the allowed-move index built at roll time, so a
//! finished turn always consists of a legal play.

use std::collections::{BTreeMap, BTreeSet};

use log::{debug, warn};
use rand::Rng;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::board::{Board, Color, Move, MoveLabel, Origin, ReverseMove};
use crate::builder::{build_turn, BuilderKind, MoveIndex, TurnResult};
use crate::dice::{Dice, FaceSequence};
use crate::error::TurnError;

/// How a turn searches for its allowed moves.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TurnSettings {
    builder: BuilderKind,
    flag_keys: bool,
}

impl Default for TurnSettings {
    fn default() -> Self {
        TurnSettings {
            builder: BuilderKind::Depth,
            flag_keys: true,
        }
    }
}

impl TurnSettings {
    pub fn builder(mut self, builder: BuilderKind) -> Self {
        self.builder = builder;
        self
    }

    /// Share the subtrees of repeated positions in depth-first trees.
    /// Has no effect on breadth-first search.
    pub fn flag_keys(mut self, flag_keys: bool) -> Self {
        self.flag_keys = flag_keys;
        self
    }

    pub fn builder_kind(&self) -> BuilderKind {
        self.builder
    }

    pub fn uses_flag_keys(&self) -> bool {
        self.flag_keys
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TurnState {
    Unrolled,
    Rolled,
    Finished,
}

#[derive(Clone, Debug)]
pub struct Turn {
    board: Board,
    color: Color,
    settings: TurnSettings,
    state: TurnState,
    dice: Option<Dice>,
    result: Option<TurnResult>,
    moves: Vec<(Move, ReverseMove)>,
    /// Labels of the moves played so far, the current position in the allowed-move index
    path: Vec<MoveLabel>,
    cant_move: bool,
}

impl Turn {
    pub fn new(board: Board, color: Color) -> Self {
        Self::with_settings(board, color, TurnSettings::default())
    }

    pub fn with_settings(board: Board, color: Color, settings: TurnSettings) -> Self {
        Turn {
            board,
            color,
            settings,
            state: TurnState::Unrolled,
            dice: None,
            result: None,
            moves: vec![],
            path: vec![],
            cant_move: false,
        }
    }

    /// Rolls the given dice, and computes every legal play for them
    pub fn roll(&mut self, dice: Dice) -> Result<&TurnResult, TurnError> {
        match self.state {
            TurnState::Unrolled => (),
            TurnState::Rolled => return Err(TurnError::AlreadyRolled),
            TurnState::Finished => return Err(TurnError::AlreadyFinished),
        }
        let result = build_turn(
            self.settings.builder,
            self.settings.flag_keys,
            &self.board,
            self.color,
            &dice,
        )?;
        debug!(
            "{} rolled {}, allowed moves {}",
            self.color,
            dice,
            result.allowed_moves()
        );
        self.dice = Some(dice);
        self.state = TurnState::Rolled;
        Ok(&*self.result.insert(result))
    }

    pub fn roll_random<R: Rng>(&mut self, rng: &mut R) -> Result<Dice, TurnError> {
        let dice = Dice::roll(rng);
        self.roll(dice)?;
        Ok(dice)
    }

    /// Plays one face, if the allowed-move index permits it at this point of the turn
    pub fn move_piece(&mut self, origin: Origin, face: u8) -> Result<Move, TurnError> {
        self.check_in_progress()?;
        let label = MoveLabel::new(origin, face);
        if !self
            .allowed_moves()
            .map_or(false, |allowed| allowed.contains(&label))
        {
            warn!(
                "Rejected {} for {} after [{}]",
                label,
                self.color,
                self.played_string()
            );
            return Err(TurnError::IllegalMove { origin, face });
        }
        let mv = Move::new(&self.board, self.color, origin, face)?;
        let reverse_move = self.board.do_move(mv);
        self.moves.push((mv, reverse_move));
        self.path.push(label);
        debug!("{} played {}", self.color, label);
        Ok(mv)
    }

    /// Takes back the last move of the turn
    pub fn undo(&mut self) -> Result<Move, TurnError> {
        self.check_in_progress()?;
        let (mv, reverse_move) = self.moves.pop().ok_or(TurnError::NoMovesMade)?;
        self.board.reverse_move(reverse_move);
        self.path.pop();
        debug!("{} took back {}", self.color, mv);
        Ok(mv)
    }

    /// Ends the turn once no further move is allowed. A roll with no legal play
    /// can be finished straight away.
    pub fn finish(&mut self) -> Result<(), TurnError> {
        self.check_in_progress()?;
        if self
            .allowed_moves()
            .map_or(false, |allowed| !allowed.is_empty())
        {
            return Err(TurnError::MovesRemaining);
        }
        debug!("{} finished with [{}]", self.color, self.played_string());
        self.state = TurnState::Finished;
        Ok(())
    }

    /// Ends a turn in which no move can be played
    pub fn set_cant_move(&mut self) -> Result<(), TurnError> {
        self.check_in_progress()?;
        if self
            .result
            .as_ref()
            .map_or(false, |result| !result.is_cant_move())
        {
            return Err(TurnError::HasMoves { color: self.color });
        }
        debug!("{} cannot move with {:?}", self.color, self.dice);
        self.cant_move = true;
        self.state = TurnState::Finished;
        Ok(())
    }

    fn check_in_progress(&self) -> Result<(), TurnError> {
        match self.state {
            TurnState::Unrolled => Err(TurnError::NotRolled),
            TurnState::Rolled => Ok(()),
            TurnState::Finished => Err(TurnError::AlreadyFinished),
        }
    }

    fn played_string(&self) -> String {
        self.path
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// The moves still allowed after the ones already played, or `None` before rolling
    pub fn allowed_moves(&self) -> Option<&MoveIndex> {
        self.result.as_ref()?.allowed_moves().descend(&self.path)
    }

    /// The index of allowed moves from the start of the turn
    pub fn allowed_move_index(&self) -> Option<&MoveIndex> {
        self.result.as_ref().map(TurnResult::allowed_moves)
    }

    pub fn allowed_end_states(&self) -> impl Iterator<Item = &str> {
        self.result
            .iter()
            .flat_map(|result| result.allowed_end_states())
    }

    /// Every allowed end position, mapped to one series of moves that reaches it
    pub fn end_states_to_series(&self) -> Option<&BTreeMap<String, Vec<MoveLabel>>> {
        self.result.as_ref().map(TurnResult::end_states)
    }

    /// Faces that can be played as the first move of the turn
    pub fn allowed_faces(&self) -> Option<&BTreeSet<u8>> {
        self.result.as_ref().map(TurnResult::allowed_faces)
    }

    /// Faces that can be played next, after the moves already made
    pub fn next_faces(&self) -> BTreeSet<u8> {
        self.allowed_moves()
            .map(|allowed| allowed.labels().map(|label| label.face).collect())
            .unwrap_or_default()
    }

    pub fn result(&self) -> Option<&TurnResult> {
        self.result.as_ref()
    }

    /// The live board, including the moves played so far
    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn settings(&self) -> TurnSettings {
        self.settings
    }

    pub fn state(&self) -> TurnState {
        self.state
    }

    pub fn moves(&self) -> impl Iterator<Item = Move> + '_ {
        self.moves.iter().map(|(mv, _)| *mv)
    }

    /// Labels of the moves played so far
    pub fn played(&self) -> &[MoveLabel] {
        &self.path
    }

    pub fn dice(&self) -> Option<Dice> {
        self.dice
    }

    pub fn is_rolled(&self) -> bool {
        self.state != TurnState::Unrolled
    }

    pub fn is_finished(&self) -> bool {
        self.state == TurnState::Finished
    }

    pub fn is_cant_move(&self) -> bool {
        self.cant_move
    }

    /// Faces of the roll not used by any move yet. Empty before rolling.
    pub fn remaining_faces(&self) -> FaceSequence {
        let mut remaining = self.dice.map(|dice| dice.faces()).unwrap_or_default();
        for label in self.path.iter() {
            if let Some(i) = remaining.iter().position(|face| *face == label.face) {
                remaining.remove(i);
            }
        }
        remaining
    }

    pub fn into_board(self) -> Board {
        self.board
    }
}
