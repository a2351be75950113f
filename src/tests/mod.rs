#[cfg(test)]
mod builder_tests;
#[cfg(test)]
mod sequence_tests;

#[cfg(test)]
use crate::board::{Board, MoveLabel};

/// Builds a board from `(point, count)` lists and bar counts.
/// Pieces not listed are borne off.
#[cfg(test)]
fn board_with(white: &[(u8, u8)], red: &[(u8, u8)], bars: (u8, u8)) -> Board {
    let mut cells = vec!["0".to_string(); 24];
    for &(point, count) in white {
        cells[point as usize - 1] = format!("W{}", count);
    }
    for &(point, count) in red {
        cells[point as usize - 1] = format!("R{}", count);
    }
    let home = |pieces: &[(u8, u8)], bar: u8| {
        15 - bar - pieces.iter().map(|(_, count)| count).sum::<u8>()
    };
    let state = format!(
        "{}/{}|{}|{}/{}",
        bars.0,
        bars.1,
        cells.join(","),
        home(white, bars.0),
        home(red, bars.1)
    );
    Board::from_state_string(&state).unwrap()
}

/// The standard setup with one White piece moved from point 1 to the bar
#[cfg(test)]
fn white_on_bar_board() -> Board {
    board_with(
        &[(1, 1), (12, 5), (17, 3), (19, 5)],
        &[(24, 2), (13, 5), (8, 3), (6, 5)],
        (1, 0),
    )
}

/// White and Red each have a single piece left, one pip from bearing off
#[cfg(test)]
fn either_wins_board() -> Board {
    board_with(&[(24, 1)], &[(1, 1)], (0, 0))
}

#[cfg(test)]
fn labels(labels: &[&str]) -> Vec<MoveLabel> {
    labels.iter().map(|label| label.parse().unwrap()).collect()
}
