use std::collections::{BTreeMap, BTreeSet};

use log::debug;

use super::{build_trees, keep_smallest_series, MoveIndex, TurnBuilder, TurnResult};
use crate::board::{Board, Color};
use crate::dice::{Dice, MAX_SEQUENCE_LEN};
use crate::error::SearchError;
use crate::sequence::{NodeId, SequenceTree};

/// Builds turns from breadth-first trees. Leaves are grouped by depth across all trees,
/// and the paths of the retained ones are inserted into the index.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct BreadthBuilder {}

impl BreadthBuilder {
    pub fn new() -> Self {
        BreadthBuilder {}
    }
}

impl TurnBuilder for BreadthBuilder {
    fn build(&self, board: &Board, color: Color, dice: &Dice) -> Result<TurnResult, SearchError> {
        let trees = build_trees(dice, |sequence| {
            SequenceTree::build_breadth_first(board, color, sequence)
        })?;

        // Leaves of every tree, as (tree, node) pairs, indexed by depth
        let mut leaves_by_depth: Vec<Vec<(usize, NodeId)>> = vec![vec![]; MAX_SEQUENCE_LEN + 1];
        for (tree_id, tree) in trees.iter().enumerate() {
            for leaf in tree.leaves() {
                leaves_by_depth[tree.node(leaf).depth() as usize].push((tree_id, leaf));
            }
        }

        let max_depth = leaves_by_depth
            .iter()
            .rposition(|leaves| !leaves.is_empty())
            .unwrap_or(0);

        let single_faces: BTreeSet<u8> = leaves_by_depth[1]
            .iter()
            .map(|&(tree_id, _)| trees[tree_id].sequence()[0])
            .collect();
        let highest_face = single_faces.iter().next_back().copied();
        let must_play_higher = max_depth == 1 && single_faces.len() > 1;

        let mut allowed_moves = MoveIndex::new();
        let mut end_states = BTreeMap::new();
        let mut retained = 0;
        for (depth, leaves) in leaves_by_depth.iter().enumerate() {
            for &(tree_id, leaf) in leaves {
                let tree = &trees[tree_id];
                let node = tree.node(leaf);
                let keep = if node.is_winner() {
                    true
                } else if depth != max_depth {
                    false
                } else if must_play_higher {
                    Some(tree.sequence()[0]) == highest_face
                } else {
                    true
                };
                if keep {
                    let path = tree.path_to(leaf);
                    allowed_moves.insert_path(&path);
                    keep_smallest_series(&mut end_states, node.board().state_string(), &path);
                    retained += 1;
                }
            }
        }

        let has_winner = trees.iter().any(SequenceTree::has_winner);
        debug!(
            "Breadth builder: {} {} on {}, {} trees, max depth {}, {} retained leaves, {} end states",
            color,
            dice,
            board.state_string(),
            trees.len(),
            max_depth,
            retained,
            end_states.len()
        );
        Ok(TurnResult::new(
            allowed_moves,
            end_states,
            max_depth as u8,
            has_winner,
        ))
    }
}
