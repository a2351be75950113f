use std::collections::{BTreeMap, BTreeSet, HashMap};

use log::debug;

use super::{build_trees, keep_smallest_series, MoveIndex, TurnBuilder, TurnResult};
use crate::board::{Board, Color, MoveLabel};
use crate::dice::Dice;
use crate::error::SearchError;
use crate::sequence::{NodeId, SequenceNode, SequenceTree};

/// Builds turns from depth-first trees, pruning each tree by recursive descent from the root.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct DepthBuilder {
    flag_keys: bool,
}

impl Default for DepthBuilder {
    fn default() -> Self {
        DepthBuilder { flag_keys: true }
    }
}

impl DepthBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether trees skip re-expanding positions they have already explored. Defaults to true.
    pub fn flag_keys(mut self, flag_keys: bool) -> Self {
        self.flag_keys = flag_keys;
        self
    }
}

/// Which leaves of a tree survive pruning
struct Retention {
    max_depth: u8,
    /// Set when only one die can be played, and it must be this face
    required_face: Option<u8>,
    first_face: Option<u8>,
}

impl Retention {
    fn keeps(&self, node: &SequenceNode) -> bool {
        if node.is_winner() {
            return true;
        }
        node.depth() == self.max_depth
            && match self.required_face {
                Some(face) => self.first_face == Some(face),
                None => true,
            }
    }
}

impl TurnBuilder for DepthBuilder {
    fn build(&self, board: &Board, color: Color, dice: &Dice) -> Result<TurnResult, SearchError> {
        let trees = build_trees(dice, |sequence| {
            SequenceTree::build_depth_first(board, color, sequence, self.flag_keys)
        })?;

        let max_depth = trees
            .iter()
            .map(SequenceTree::max_depth)
            .max()
            .unwrap_or(0);

        let playable_alone: BTreeSet<u8> = trees
            .iter()
            .filter(|tree| {
                tree.root()
                    .children()
                    .values()
                    .any(|child| tree.node(*child).is_leaf())
            })
            .filter_map(|tree| tree.sequence().first().copied())
            .collect();
        let required_face = if max_depth == 1 && playable_alone.len() > 1 {
            playable_alone.iter().max().copied()
        } else {
            None
        };

        let mut allowed_moves = MoveIndex::new();
        let mut end_states = BTreeMap::new();
        for tree in trees.iter() {
            let retention = Retention {
                max_depth,
                required_face,
                first_face: tree.sequence().first().copied(),
            };
            let mut memo = HashMap::new();
            if let Some(index) = prune(tree, NodeId::ROOT, &retention, &mut memo) {
                collect_end_states(tree, NodeId::ROOT, &index, &mut vec![], &mut end_states);
                allowed_moves.merge(index);
            }
        }

        let has_winner = trees.iter().any(SequenceTree::has_winner);
        debug!(
            "Depth builder: {} {} on {}, {} trees, max depth {}, {} end states{}",
            color,
            dice,
            board.state_string(),
            trees.len(),
            max_depth,
            end_states.len(),
            if has_winner { ", can win" } else { "" }
        );
        Ok(TurnResult::new(
            allowed_moves,
            end_states,
            max_depth,
            has_winner,
        ))
    }
}

/// The retained part of the subtree at `id`, or `None` if nothing under it survives.
/// Nodes can be shared through flag keys, so results are memoized per node.
fn prune(
    tree: &SequenceTree,
    id: NodeId,
    retention: &Retention,
    memo: &mut HashMap<NodeId, Option<MoveIndex>>,
) -> Option<MoveIndex> {
    if let Some(pruned) = memo.get(&id) {
        return pruned.clone();
    }
    let node = tree.node(id);
    let pruned = if node.is_leaf() {
        retention.keeps(node).then(MoveIndex::new)
    } else {
        let mut index = MoveIndex::new();
        for (label, child) in node.children() {
            if let Some(sub) = prune(tree, *child, retention, memo) {
                index.insert(*label, sub);
            }
        }
        (!index.is_empty()).then_some(index)
    };
    memo.insert(id, pruned.clone());
    pruned
}

/// Walks the pruned index in label order alongside the tree, recording each end position
fn collect_end_states(
    tree: &SequenceTree,
    id: NodeId,
    index: &MoveIndex,
    path: &mut Vec<MoveLabel>,
    end_states: &mut BTreeMap<String, Vec<MoveLabel>>,
) {
    let node = tree.node(id);
    if index.is_empty() {
        keep_smallest_series(end_states, node.board().state_string(), path);
        return;
    }
    for (label, sub) in index {
        if let Some(child) = node.child(label) {
            path.push(*label);
            collect_end_states(tree, child, sub, path, end_states);
            path.pop();
        }
    }
}
