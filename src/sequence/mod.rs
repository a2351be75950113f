//! Trees of single-face moves for one fixed ordering of the dice.
//!
//! Nodes live in an arena owned by the tree. Parent links are plain indices,
//! so walking back to the root never involves shared ownership.

use std::collections::{BTreeMap, BTreeSet};

use crate::board::{Board, Color, Move, MoveLabel};
use crate::builder::MoveIndex;
use crate::dice::FaceSequence;

mod breadth;
mod depth;

/// Index of a node in its tree's arena
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub const ROOT: NodeId = NodeId(0);

    fn index(self) -> usize {
        self.0 as usize
    }
}

/// One position reached while playing a face sequence
#[derive(Clone, Debug)]
pub struct SequenceNode {
    board: Board,
    depth: u8,
    parent: Option<NodeId>,
    mv: Option<Move>,
    children: BTreeMap<MoveLabel, NodeId>,
    is_winner: bool,
}

impl SequenceNode {
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Number of faces played to reach this node
    pub fn depth(&self) -> u8 {
        self.depth
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// The move leading here from the parent. `None` for the root.
    pub fn mv(&self) -> Option<Move> {
        self.mv
    }

    pub fn children(&self) -> &BTreeMap<MoveLabel, NodeId> {
        &self.children
    }

    pub fn child(&self, label: &MoveLabel) -> Option<NodeId> {
        self.children.get(label).copied()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Whether the mover has every piece home at this node
    pub fn is_winner(&self) -> bool {
        self.is_winner
    }
}

/// The full graph of moves for one board, color and face sequence.
#[derive(Clone, Debug)]
pub struct SequenceTree {
    color: Color,
    sequence: FaceSequence,
    nodes: Vec<SequenceNode>,
    max_depth: u8,
    winners: Vec<NodeId>,
}

impl SequenceTree {
    fn new(board: Board, color: Color, sequence: &[u8]) -> Self {
        let is_winner = board.has_winner(color);
        SequenceTree {
            color,
            sequence: sequence.iter().copied().collect(),
            nodes: vec![SequenceNode {
                board,
                depth: 0,
                parent: None,
                mv: None,
                children: BTreeMap::new(),
                is_winner,
            }],
            max_depth: 0,
            winners: if is_winner { vec![NodeId::ROOT] } else { vec![] },
        }
    }

    /// Registers `board` as the child of `parent` reached through `mv`
    fn add_node(&mut self, board: Board, parent: NodeId, mv: Move) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        let depth = self.nodes[parent.index()].depth + 1;
        let is_winner = board.has_winner(self.color);
        self.nodes.push(SequenceNode {
            board,
            depth,
            parent: Some(parent),
            mv: Some(mv),
            children: BTreeMap::new(),
            is_winner,
        });
        self.nodes[parent.index()].children.insert(mv.label(), id);
        self.max_depth = self.max_depth.max(depth);
        if is_winner {
            self.winners.push(id);
        }
        id
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn sequence(&self) -> &[u8] {
        &self.sequence
    }

    pub fn root(&self) -> &SequenceNode {
        &self.nodes[NodeId::ROOT.index()]
    }

    pub fn node(&self, id: NodeId) -> &SequenceNode {
        &self.nodes[id.index()]
    }

    /// Number of nodes in the arena
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Greatest number of faces played along any path
    pub fn max_depth(&self) -> u8 {
        self.max_depth
    }

    pub fn has_winner(&self) -> bool {
        !self.winners.is_empty()
    }

    pub fn winners(&self) -> &[NodeId] {
        &self.winners
    }

    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len() as u32).map(NodeId)
    }

    pub fn leaves(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.node_ids().filter(move |id| self.node(*id).is_leaf())
    }

    /// Labels of the moves from the root down to `id`, walking parent links
    pub fn path_to(&self, id: NodeId) -> Vec<MoveLabel> {
        let mut path = vec![];
        let mut node = self.node(id);
        while let (Some(parent), Some(mv)) = (node.parent, node.mv) {
            path.push(mv.label());
            node = self.node(parent);
        }
        path.reverse();
        path
    }

    /// The complete, unpruned label index of the tree
    pub fn move_index(&self) -> MoveIndex {
        self.move_index_from(NodeId::ROOT)
    }

    fn move_index_from(&self, id: NodeId) -> MoveIndex {
        let mut index = MoveIndex::new();
        for (label, child) in self.node(id).children() {
            index.insert(*label, self.move_index_from(*child));
        }
        index
    }

    /// Canonical text of the unpruned label index, e.g. `{13:5{8:3},24:1}`
    pub fn serialize_index(&self) -> String {
        self.move_index().to_string()
    }

    /// State strings of every position where the sequence stops
    pub fn leaf_states(&self) -> BTreeSet<String> {
        self.leaves()
            .map(|id| self.node(id).board().state_string())
            .collect()
    }
}
