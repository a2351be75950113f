use std::collections::BTreeSet;

use crate::board::{Board, Color, Move, MoveLabel, Origin};
use crate::builder::{
    build_turn, BreadthBuilder, BuilderKind, DepthBuilder, MoveIndex, TurnBuilder, TurnResult,
};
use crate::dice::Dice;
use crate::error::MoveError;
use crate::tests::{board_with, either_wins_board, labels, white_on_bar_board};

/// Builds with every strategy, checks that they agree, and returns the result
fn build_all(board: &Board, color: Color, dice: Dice) -> TurnResult {
    let depth = DepthBuilder::new().build(board, color, &dice).unwrap();
    let depth_without_keys = DepthBuilder::new()
        .flag_keys(false)
        .build(board, color, &dice)
        .unwrap();
    let breadth = BreadthBuilder::new().build(board, color, &dice).unwrap();
    assert_eq!(depth, depth_without_keys, "{} {}", color, dice);
    assert_eq!(depth, breadth, "{} {}", color, dice);
    depth
}

fn faces(faces: &[u8]) -> BTreeSet<u8> {
    faces.iter().copied().collect()
}

#[test]
fn either_wins_test() {
    let board = either_wins_board();
    let result = build_all(&board, Color::White, Dice::new(2, 1).unwrap());

    assert_eq!(result.allowed_moves().to_string(), "{24:1,24:2}");
    assert_eq!(result.allowed_faces(), &faces(&[1, 2]));
    assert_eq!(result.max_depth(), 1);
    assert!(result.has_winner());

    // Both bear-offs reach the same position
    assert_eq!(result.end_states().len(), 1);
    let (state, series) = result.end_states().iter().next().unwrap();
    assert_eq!(series, &labels(&["24:1"]));
    assert!(Board::from_state_string(state)
        .unwrap()
        .has_winner(Color::White));

    let result = build_all(&board, Color::Red, Dice::new(2, 1).unwrap());
    assert_eq!(result.allowed_moves().to_string(), "{1:1,1:2}");
}

#[test]
fn higher_die_must_be_played_test() {
    // Either die can be played from 10, but never both
    let board = board_with(&[(10, 1)], &[(21, 2)], (0, 0));
    let result = build_all(&board, Color::White, Dice::new(6, 5).unwrap());

    assert_eq!(result.allowed_moves().to_string(), "{10:6}");
    assert_eq!(result.allowed_faces(), &faces(&[6]));
    assert_eq!(result.max_depth(), 1);
    assert!(!result.has_winner());
    assert_eq!(result.end_states().len(), 1);

    // The order of the dice makes no difference
    let reversed = build_all(&board, Color::White, Dice::new(5, 6).unwrap());
    assert_eq!(reversed.allowed_moves(), result.allowed_moves());
    assert_eq!(reversed.end_states(), result.end_states());
}

#[test]
fn lower_die_when_higher_is_blocked_test() {
    let board = board_with(&[(10, 1)], &[(16, 2), (21, 2)], (0, 0));
    let result = build_all(&board, Color::White, Dice::new(6, 5).unwrap());

    assert_eq!(result.allowed_moves().to_string(), "{10:5}");
    assert_eq!(result.allowed_faces(), &faces(&[5]));
    assert_eq!(result.max_depth(), 1);
}

#[test]
fn both_dice_must_be_played_test() {
    // 10:5 stops the 6, so only 10:6 followed by 16:5 uses both dice
    let board = board_with(&[(10, 1)], &[(15, 2)], (0, 0));
    let result = build_all(&board, Color::White, Dice::new(6, 5).unwrap());

    assert_eq!(result.allowed_moves().to_string(), "{10:6{16:5}}");
    assert_eq!(result.allowed_faces(), &faces(&[6]));
    assert_eq!(result.max_depth(), 2);
    assert_eq!(
        result.end_states().values().collect::<Vec<_>>(),
        [&labels(&["10:6", "16:5"])]
    );
}

#[test]
fn maximal_play_drops_shorter_plays_test() {
    // 12:6 leaves no 5 to play, every other start uses both dice
    let board = board_with(&[(10, 1), (12, 1)], &[(15, 2), (23, 2)], (0, 0));
    let result = build_all(&board, Color::White, Dice::new(6, 5).unwrap());

    assert_eq!(result.max_depth(), 2);
    assert_eq!(
        result.allowed_moves().to_string(),
        "{10:6{12:5,16:5},12:5{10:6}}"
    );
    for path in result.allowed_moves().paths() {
        assert_eq!(path.len(), 2, "{:?}", path);
    }
    assert!(!result.allowed_moves().contains(&"12:6".parse().unwrap()));
    // 10:6 12:5 and 12:5 10:6 transpose
    assert_eq!(result.end_states().len(), 2);
}

#[test]
fn win_overrides_maximal_play_test() {
    let board = board_with(&[(19, 1)], &[(1, 1)], (0, 0));
    let result = build_all(&board, Color::White, Dice::new(6, 1).unwrap());

    assert_eq!(result.max_depth(), 2);
    assert!(result.has_winner());
    assert_eq!(result.allowed_moves().to_string(), "{19:1{20:6},19:6}");
    assert_eq!(result.allowed_faces(), &faces(&[1, 6]));

    let expected_state = board_with(&[], &[(1, 1)], (0, 0)).state_string();
    assert_eq!(
        result.series_for(&expected_state),
        Some(&labels(&["19:1", "20:6"])[..])
    );
    assert_eq!(result.end_states().len(), 1);
}

#[test]
fn blocked_from_bar_test() {
    let board = white_on_bar_board();
    let result = build_all(&board, Color::White, Dice::new(6, 6).unwrap());

    assert_eq!(result.max_depth(), 0);
    assert!(result.allowed_moves().is_empty());
    assert!(result.allowed_faces().is_empty());
    assert!(result.is_cant_move());
    assert_eq!(result.allowed_end_states().collect::<Vec<_>>(), [board.state_string()]);
    assert_eq!(result.series_for(&board.state_string()), Some(&[][..]));
}

#[test]
fn must_come_in_before_moving_test() {
    let board = white_on_bar_board();
    let result = build_all(&board, Color::White, Dice::new(3, 1).unwrap());
    for path in result.allowed_moves().paths() {
        assert_eq!(path[0].origin, Origin::Bar);
    }
    assert_eq!(result.max_depth(), 2);
}

#[test]
fn opening_three_one_test() {
    let board = Board::setup();
    let result = build_all(&board, Color::White, Dice::new(3, 1).unwrap());

    assert_eq!(result.max_depth(), 2);
    assert_eq!(result.allowed_faces(), &faces(&[1, 3]));
    assert_eq!(
        result.allowed_moves().descend(&labels(&["17:3", "19:1"])),
        Some(&Default::default())
    );
    assert_eq!(
        result.allowed_moves().descend(&labels(&["19:1", "17:3"])),
        Some(&Default::default())
    );

    let mut played = board.clone();
    for label in labels(&["19:1", "17:3"]) {
        let mv = Move::new(&played, Color::White, label.origin, label.face).unwrap();
        played.do_move(mv);
    }
    // The smallest series is reported for each end state
    assert_eq!(
        result.series_for(&played.state_string()),
        Some(&labels(&["17:3", "19:1"])[..])
    );
}

#[test]
fn opening_double_test() {
    let board = Board::setup();
    let result = build_all(&board, Color::Red, Dice::new(6, 6).unwrap());
    assert_eq!(result.max_depth(), 4);
    assert_eq!(result.allowed_faces(), &faces(&[6]));
    assert_eq!(result.allowed_moves().depth(), 4);
    for series in result.end_states().values() {
        assert_eq!(series.len(), 4);
    }
}

#[test]
fn build_turn_dispatch_test() {
    let board = Board::setup();
    let dice = Dice::new(5, 2).unwrap();
    let depth = build_turn(BuilderKind::Depth, true, &board, Color::Red, &dice).unwrap();
    let breadth = build_turn(BuilderKind::Breadth, true, &board, Color::Red, &dice).unwrap();
    assert_eq!(depth, breadth);
    assert_eq!(BuilderKind::default(), BuilderKind::Depth);
}

#[test]
fn invalid_dice_test() {
    assert_eq!(
        Dice::new(0, 3),
        Err(MoveError::InvalidRoll { faces: vec![0, 3] })
    );
    assert!(Dice::new(3, 7).is_err());
    assert_eq!(Dice::from_faces(&[3, 3, 3, 3]), Dice::new(3, 3));
    assert_eq!(Dice::from_faces(&[4, 2]), Dice::new(4, 2));
    let bad_rolls: [&[u8]; 6] = [&[3, 3, 3], &[3, 3, 3, 4], &[1], &[], &[2, 2, 2, 2, 2], &[7, 7, 7, 7]];
    for bad in bad_rolls {
        assert_eq!(
            Dice::from_faces(bad),
            Err(MoveError::InvalidRoll {
                faces: bad.to_vec()
            })
        );
    }
}

#[test]
fn dice_sequences_test() {
    let dice = Dice::new(5, 2).unwrap();
    assert!(!dice.is_double());
    assert_eq!(dice.to_string(), "5-2");
    let sequences: Vec<Vec<u8>> = dice.sequences().iter().map(|s| s.to_vec()).collect();
    assert_eq!(sequences, [vec![5, 2], vec![2, 5]]);

    let dice = Dice::new(4, 4).unwrap();
    assert!(dice.is_double());
    let sequences: Vec<Vec<u8>> = dice.sequences().iter().map(|s| s.to_vec()).collect();
    assert_eq!(sequences, [vec![4, 4, 4, 4]]);
}

#[test]
fn end_state_series_replay_test() {
    let board = Board::setup();
    let result = build_all(&board, Color::White, Dice::new(6, 2).unwrap());
    for (state, series) in result.end_states() {
        let mut replayed = board.clone();
        for label in series {
            let mv = Move::new(&replayed, Color::White, label.origin, label.face).unwrap();
            replayed.do_move(mv);
        }
        assert_eq!(&replayed.state_string(), state);
        let path: &[MoveLabel] = series;
        assert_eq!(result.allowed_moves().descend(path), Some(&Default::default()));
    }
}

#[test]
fn move_index_merge_test() {
    let mut index = MoveIndex::new();
    index.insert_path(&labels(&["13:5", "8:3"]));
    let mut other = MoveIndex::new();
    other.insert_path(&labels(&["13:5", "13:3"]));
    other.insert_path(&labels(&["24:1"]));
    index.merge(other);

    assert_eq!(index.to_string(), "{13:5{8:3,13:3},24:1}");
    assert_eq!(index.len(), 2);
    assert_eq!(index.depth(), 2);
    assert_eq!(
        index.paths(),
        [
            labels(&["13:5", "8:3"]),
            labels(&["13:5", "13:3"]),
            labels(&["24:1"])
        ]
    );
    assert_eq!(index.descend(&labels(&["13:5"])).map(MoveIndex::len), Some(2));
    assert!(index.descend(&labels(&["24:1", "8:3"])).is_none());
    assert_eq!(MoveIndex::new().paths(), [Vec::<MoveLabel>::new()]);
    assert_eq!(MoveIndex::new().to_string(), "{}");
}
