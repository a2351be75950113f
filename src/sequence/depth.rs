use std::collections::hash_map::Entry;
use std::collections::HashMap;

use arrayvec::ArrayVec;
use log::trace;

use super::{NodeId, SequenceTree};
use crate::board::{Board, Color};
use crate::dice::MAX_SEQUENCE_LEN;
use crate::error::SearchError;

/// A position together with the faces already spent reaching it.
/// Two nodes with equal keys have identical subtrees.
#[derive(PartialEq, Eq, Hash)]
struct FlagKey {
    board: Board,
    faces_played: ArrayVec<u8, MAX_SEQUENCE_LEN>,
}

impl FlagKey {
    fn new(board: &Board, faces_played: &[u8]) -> Self {
        let mut faces_played: ArrayVec<u8, MAX_SEQUENCE_LEN> =
            faces_played.iter().copied().collect();
        faces_played.sort_unstable();
        FlagKey {
            board: board.clone(),
            faces_played,
        }
    }
}

impl SequenceTree {
    /// Builds the tree by fully exploring each child before the next, on a single working board.
    ///
    /// With `flag_keys` set, a node whose position was already explored at the same stage
    /// shares the children of the first such node instead of expanding them again.
    /// This only saves work, mostly for doubles, and does not change the resulting index.
    pub fn build_depth_first(
        board: &Board,
        color: Color,
        sequence: &[u8],
        flag_keys: bool,
    ) -> Result<Self, SearchError> {
        if sequence.len() > MAX_SEQUENCE_LEN {
            return Err(SearchError::MaxDepthExceeded {
                depth: sequence.len(),
                max: MAX_SEQUENCE_LEN,
            });
        }
        let mut tree = SequenceTree::new(board.clone(), color, sequence);
        let mut working_board = board.clone();
        let mut seen = if flag_keys { Some(HashMap::new()) } else { None };
        tree.expand_depth_first(&mut working_board, NodeId::ROOT, &mut seen)?;
        trace!(
            "Depth-first tree for {} {:?}: {} nodes, max depth {}",
            color,
            tree.sequence,
            tree.len(),
            tree.max_depth
        );
        Ok(tree)
    }

    fn expand_depth_first(
        &mut self,
        board: &mut Board,
        id: NodeId,
        seen: &mut Option<HashMap<FlagKey, NodeId>>,
    ) -> Result<(), SearchError> {
        let depth = self.node(id).depth as usize;
        if depth > MAX_SEQUENCE_LEN {
            return Err(SearchError::MaxDepthExceeded {
                depth,
                max: MAX_SEQUENCE_LEN,
            });
        }
        if self.node(id).is_winner || depth == self.sequence.len() {
            return Ok(());
        }

        if let Some(seen) = seen.as_mut() {
            match seen.entry(FlagKey::new(board, &self.sequence[..depth])) {
                Entry::Occupied(entry) => {
                    let children = self.node(*entry.get()).children.clone();
                    self.nodes[id.index()].children = children;
                    return Ok(());
                }
                Entry::Vacant(entry) => {
                    entry.insert(id);
                }
            }
        }

        let face = self.sequence[depth];
        let mut moves = vec![];
        board.generate_moves(self.color, face, &mut moves);
        for mv in moves {
            let reverse_move = board.do_move(mv);
            let child = self.add_node(board.clone(), id, mv);
            let result = self.expand_depth_first(board, child, seen);
            board.reverse_move(reverse_move);
            result?;
        }
        Ok(())
    }
}
