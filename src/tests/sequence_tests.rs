use crate::board::{Board, Color};
use crate::error::SearchError;
use crate::sequence::{NodeId, SequenceTree};
use crate::tests::{board_with, either_wins_board, labels};

fn assert_same_tree(depth_first: &SequenceTree, breadth_first: &SequenceTree) {
    assert_eq!(depth_first.move_index(), breadth_first.move_index());
    assert_eq!(depth_first.leaf_states(), breadth_first.leaf_states());
    assert_eq!(depth_first.max_depth(), breadth_first.max_depth());
    assert_eq!(depth_first.has_winner(), breadth_first.has_winner());
}

#[test]
fn setup_red_three_one_test() {
    let board = Board::setup();
    let tree = SequenceTree::build_depth_first(&board, Color::Red, &[3, 1], true).unwrap();
    assert_eq!(tree.max_depth(), 2);
    assert_eq!(tree.sequence(), &[3, 1]);
    assert_eq!(tree.color(), Color::Red);
    assert!(!tree.has_winner());
    assert_eq!(tree.root().children().len(), 4);
    assert_eq!(tree.root().depth(), 0);
    assert!(tree.root().parent().is_none());

    let breadth_first = SequenceTree::build_breadth_first(&board, Color::Red, &[3, 1]).unwrap();
    assert_same_tree(&tree, &breadth_first);
    assert_eq!(tree.len(), breadth_first.len());
}

#[test]
fn children_snapshot_their_boards_test() {
    let board = Board::setup();
    let tree = SequenceTree::build_depth_first(&board, Color::White, &[3, 1], true).unwrap();
    assert_eq!(tree.root().board(), &board);

    let label = "17:3".parse().unwrap();
    let child = tree.root().child(&label).unwrap();
    let node = tree.node(child);
    assert_eq!(node.depth(), 1);
    assert_eq!(node.parent(), Some(NodeId::ROOT));
    assert_eq!(node.mv().map(|mv| mv.label()), Some(label));
    assert_eq!(node.board().point(17).count(), 2);
    assert_eq!(node.board().point(20).count(), 1);
    assert_eq!(tree.path_to(child), labels(&["17:3"]));
}

#[test]
fn leaves_have_full_paths_test() {
    let board = Board::setup();
    let tree = SequenceTree::build_breadth_first(&board, Color::White, &[6, 4]).unwrap();
    assert_eq!(tree.max_depth(), 2);
    for leaf in tree.leaves() {
        let node = tree.node(leaf);
        assert_eq!(node.depth(), 2);
        assert_eq!(tree.path_to(leaf).len(), 2);
        assert!(node.is_leaf());
    }
}

#[test]
fn doubles_agree_with_and_without_flag_keys_test() {
    let board = Board::setup();
    let with_keys =
        SequenceTree::build_depth_first(&board, Color::White, &[1, 1, 1, 1], true).unwrap();
    let without_keys =
        SequenceTree::build_depth_first(&board, Color::White, &[1, 1, 1, 1], false).unwrap();
    let breadth_first =
        SequenceTree::build_breadth_first(&board, Color::White, &[1, 1, 1, 1]).unwrap();

    assert_eq!(with_keys.max_depth(), 4);
    assert_same_tree(&with_keys, &without_keys);
    assert_same_tree(&with_keys, &breadth_first);
    assert_eq!(with_keys.serialize_index(), breadth_first.serialize_index());
    // 1:1 then 17:1 reaches the same position as 17:1 then 1:1
    assert!(with_keys.len() < without_keys.len());
    assert_eq!(without_keys.len(), breadth_first.len());
}

#[test]
fn sequence_too_long_test() {
    let board = Board::setup();
    let expected = Err(SearchError::MaxDepthExceeded { depth: 5, max: 4 });
    assert_eq!(
        SequenceTree::build_depth_first(&board, Color::White, &[1, 1, 1, 1, 1], true)
            .map(|tree| tree.max_depth()),
        expected
    );
    assert_eq!(
        SequenceTree::build_breadth_first(&board, Color::White, &[1, 1, 1, 1, 1])
            .map(|tree| tree.max_depth()),
        expected
    );
}

#[test]
fn winner_stops_expansion_test() {
    let board = either_wins_board();
    let tree = SequenceTree::build_depth_first(&board, Color::White, &[2, 1], true).unwrap();
    assert!(tree.has_winner());
    assert_eq!(tree.winners().len(), 1);
    assert_eq!(tree.max_depth(), 1);
    assert_eq!(tree.serialize_index(), "{24:2}");

    let winner = tree.node(tree.winners()[0]);
    assert!(winner.is_winner());
    assert!(winner.is_leaf());
    assert!(winner.board().has_winner(Color::White));

    let breadth_first = SequenceTree::build_breadth_first(&board, Color::White, &[2, 1]).unwrap();
    assert_same_tree(&tree, &breadth_first);
}

#[test]
fn blocked_entry_gives_bare_root_test() {
    let board = board_with(&[(19, 14)], &[(1, 2), (2, 2), (3, 2), (4, 2), (5, 2), (6, 2)], (1, 0));
    let sequences: [&[u8]; 2] = [&[6, 6, 6, 6], &[3, 5]];
    for sequence in sequences {
        let tree = SequenceTree::build_depth_first(&board, Color::White, sequence, true).unwrap();
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.max_depth(), 0);
        assert!(tree.root().is_leaf());
        assert_eq!(tree.serialize_index(), "{}");
        assert_eq!(tree.leaf_states().len(), 1);
    }
}

#[test]
fn partial_sequence_stops_at_last_playable_face_test() {
    // White can play the 5 from 10 to 15, but no 6 afterwards
    let board = board_with(&[(10, 1)], &[(16, 2), (21, 2)], (0, 0));
    let tree = SequenceTree::build_breadth_first(&board, Color::White, &[5, 6]).unwrap();
    assert_eq!(tree.max_depth(), 1);
    assert_eq!(tree.serialize_index(), "{10:5}");

    let tree = SequenceTree::build_depth_first(&board, Color::White, &[6, 5], true).unwrap();
    assert_eq!(tree.max_depth(), 0);
    assert_eq!(tree.serialize_index(), "{}");
}
