use log::trace;

use super::{NodeId, SequenceTree};
use crate::board::{Board, Color};
use crate::dice::MAX_SEQUENCE_LEN;
use crate::error::SearchError;

impl SequenceTree {
    /// Builds the tree one level at a time, keeping the nodes of each level in a list.
    /// Winning nodes are recorded at the level they are found and never expanded.
    pub fn build_breadth_first(
        board: &Board,
        color: Color,
        sequence: &[u8],
    ) -> Result<Self, SearchError> {
        if sequence.len() > MAX_SEQUENCE_LEN {
            return Err(SearchError::MaxDepthExceeded {
                depth: sequence.len(),
                max: MAX_SEQUENCE_LEN,
            });
        }
        let mut tree = SequenceTree::new(board.clone(), color, sequence);
        let mut levels: Vec<Vec<NodeId>> = vec![vec![NodeId::ROOT]];
        let mut moves = vec![];

        for (depth, &face) in sequence.iter().enumerate() {
            let mut next_level = vec![];
            for &id in levels[depth].iter() {
                if tree.node(id).is_winner {
                    continue;
                }
                moves.clear();
                tree.node(id).board.generate_moves(color, face, &mut moves);
                for &mv in moves.iter() {
                    let mut child_board = tree.node(id).board.clone();
                    child_board.do_move(mv);
                    next_level.push(tree.add_node(child_board, id, mv));
                }
            }
            trace!(
                "Level {} of {} {:?}: {} nodes",
                depth + 1,
                color,
                tree.sequence,
                next_level.len()
            );
            if next_level.is_empty() {
                break;
            }
            levels.push(next_level);
        }

        Ok(tree)
    }
}
