use std::ops::Deref;

use druid::Data;
use thiserror::Error;
use tracing::{debug, info};

/// Cell triples that win the game, scanned in this order: rows, columns, then
/// the `\` and `/` diagonals.
pub const WINNING_LINES: [[usize; 3]; 8] = [
    [0, 1, 2], [3, 4, 5], [6, 7, 8],
    [0, 3, 6], [1, 4, 7], [2, 5, 8],
    [0, 4, 8], [2, 4, 6],
];

#[derive(Clone, Copy, Data, Debug, Eq, PartialEq)]
pub enum Player {X, O}
impl Player {
    #[inline]
    pub fn opponent(self) -> Self {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }
}
impl std::fmt::Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Player::X => "X",
            Player::O => "O",
        })
    }
}

// index into WINNING_LINES, also the drawing orientation
#[derive(Clone, Copy, Data, Debug, Eq, PartialEq)]
pub struct Line(u8);
impl Line {
    #[inline]
    pub fn orientation(self) -> u8 {
        self.0
    }
    #[inline]
    pub fn cells(self) -> [usize; 3] {
        WINNING_LINES[self.0 as usize]
    }
}

#[derive(Clone, Copy, Data, Debug, Eq, PartialEq)]
pub enum Status {
    InProgress,
    Won { winner: Player, line: Line },
    Draw,
}
impl Status {
    #[inline]
    pub fn is_terminal(self) -> bool {
        self != Status::InProgress
    }
}

#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub enum InvalidMove {
    #[error("the game is over, reset to play again")]
    GameOver,
    #[error("cell {0} is outside the board")]
    OutOfRange(usize),
    #[error("cell {0} is already taken")]
    Occupied(usize),
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Placement {
    pub index: usize,
    pub mark: Player,
    pub status: Status,
}

#[derive(Clone, Data, Debug)]
pub struct TicTacToe {
    cells: [Option<Player>; 9],
    turn: Player,
}
impl Default for TicTacToe {
    fn default() -> Self {
        Self::new()
    }
}
impl TicTacToe {
    pub fn new() -> Self {
        Self {
            cells: [None; 9],
            turn: Player::X,
        }
    }
    #[inline]
    pub fn turn(&self) -> Player {
        self.turn
    }
    #[inline]
    pub fn get(&self, idx: usize) -> Option<Player> {
        self.cells.get(idx).copied().flatten()
    }
    pub fn moves_played(&self) -> usize {
        self.cells.iter().filter(|x| x.is_some()).count()
    }
    #[inline]
    pub fn is_over(&self) -> bool {
        self.status().is_terminal()
    }
    pub fn status(&self) -> Status {
        if let Some((winner, line)) = self.calc() {
            Status::Won { winner, line }
        } else if self.cells.iter().all(Option::is_some) {
            Status::Draw
        } else {
            Status::InProgress
        }
    }
    pub fn attempt_move(&mut self, idx: usize) -> Result<Placement, InvalidMove> {
        if self.is_over() {
            debug!(idx, "move rejected, game over");
            return Err(InvalidMove::GameOver);
        }
        let mark = self.turn;
        match self.cells.get_mut(idx) {
            None => {
                debug!(idx, "move rejected, out of range");
                Err(InvalidMove::OutOfRange(idx))
            },
            Some(Some(_)) => {
                debug!(idx, "move rejected, occupied");
                Err(InvalidMove::Occupied(idx))
            },
            Some(cell @ &mut None) => {
                *cell = Some(mark);
                let status = self.status();
                match status {
                    Status::InProgress => self.turn = mark.opponent(),
                    Status::Won { winner, line } => info!(%winner, line = ?line.cells(), "game won"),
                    Status::Draw => info!("game drawn"),
                }
                debug!(idx, %mark, "move accepted");
                Ok(Placement { index: idx, mark, status })
            }
        }
    }
    pub fn reset(&mut self) {
        debug!(moves = self.moves_played(), "board reset");
        *self = Self::new();
    }
    fn calc(&self) -> Option<(Player, Line)> {
        WINNING_LINES.iter().enumerate().find_map(|(i, &[a, b, c])| {
            match (self.cells[a], self.cells[b], self.cells[c]) {
                (Some(x), Some(y), Some(z)) if x == y && y == z => Some((x, Line(i as u8))),
                _ => None
            }
        })
    }
    #[cfg(test)]
    pub(crate) fn from_cells(cells: [Option<Player>; 9], turn: Player) -> Self {
        Self { cells, turn }
    }
}
impl Deref for TicTacToe {
    type Target = [Option<Player>; 9];
    fn deref(&self) -> &Self::Target {
        &self.cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn play(moves: &[usize]) -> (TicTacToe, Placement) {
        let mut game = TicTacToe::new();
        let mut last = None;
        for &idx in moves {
            last = Some(game.attempt_move(idx).unwrap());
        }
        (game, last.unwrap())
    }

    #[test]
    fn new_game_is_empty_with_x_to_move() {
        let game = TicTacToe::new();
        assert!(game.iter().all(Option::is_none));
        assert_eq!(game.turn(), Player::X);
        assert_eq!(game.status(), Status::InProgress);
    }

    #[test]
    fn turn_alternates_on_accepted_moves() {
        let mut game = TicTacToe::new();
        let mut expected = Player::X;
        for idx in [4, 0, 8, 2, 1, 7] {
            assert_eq!(game.turn(), expected);
            let placed = game.attempt_move(idx).unwrap();
            assert_eq!(placed.mark, expected);
            assert_eq!(placed.index, idx);
            expected = expected.opponent();
        }
        assert_eq!(game.turn(), expected);
    }

    #[test]
    fn top_row_wins_for_x() {
        let (game, last) = play(&[0, 3, 1, 4, 2]);
        let line = match last.status {
            Status::Won { winner: Player::X, line } => line,
            other => panic!("expected X to win, got {other:?}"),
        };
        assert_eq!(line.cells(), [0, 1, 2]);
        assert_eq!(line.orientation(), 0);
        assert_eq!(last.index, 2);
        assert_eq!(last.mark, Player::X);
        assert_eq!(game.turn(), Player::X);
        assert_eq!(game.status(), last.status);
    }

    #[test]
    fn full_board_without_line_is_draw() {
        let (game, last) = play(&[0, 1, 2, 4, 3, 5, 7, 6, 8]);
        assert_eq!(last.status, Status::Draw);
        assert_eq!(game.moves_played(), 9);
        assert!(game.is_over());
    }

    #[test]
    fn winning_final_move_beats_draw() {
        // X completes the left column with the last free cell.
        let (_, last) = play(&[0, 1, 3, 4, 2, 5, 7, 8, 6]);
        assert!(matches!(last.status, Status::Won { winner: Player::X, line } if line.cells() == [0, 3, 6]));
    }

    #[test]
    fn occupied_cell_is_rejected_without_change() {
        let mut game = TicTacToe::new();
        game.attempt_move(0).unwrap();
        let before = game.clone();
        assert_eq!(game.attempt_move(0), Err(InvalidMove::Occupied(0)));
        assert!(game.same(&before));
        assert_eq!(game.turn(), Player::O);
    }

    #[test]
    fn out_of_range_is_rejected_without_change() {
        let mut game = TicTacToe::new();
        assert_eq!(game.attempt_move(9), Err(InvalidMove::OutOfRange(9)));
        assert!(game.same(&TicTacToe::new()));
        assert_eq!(game.turn(), Player::X);
    }

    #[test]
    fn moves_after_game_end_are_rejected() {
        let (mut game, _) = play(&[0, 3, 1, 4, 2]);
        let before = game.clone();
        assert_eq!(game.attempt_move(8), Err(InvalidMove::GameOver));
        assert!(game.same(&before));
    }

    #[test]
    fn reset_restores_initial_state() {
        let (mut game, _) = play(&[0, 3, 1, 4, 2]);
        game.reset();
        assert!(game.same(&TicTacToe::new()));
        assert_eq!(game.status(), Status::InProgress);

        let (mut game, _) = play(&[4, 0]);
        game.reset();
        assert_eq!(game.turn(), Player::X);
        assert_eq!(game.moves_played(), 0);
    }

    #[test]
    fn first_line_in_scan_order_is_reported() {
        use Player::*;
        let game = TicTacToe::from_cells(
            [Some(X), Some(X), Some(X), Some(X), Some(O), Some(O), Some(X), Some(O), None],
            O,
        );
        assert_eq!(game.status(), Status::Won { winner: X, line: Line(0) });
    }

    #[test]
    fn every_line_is_detected() {
        for (i, line) in WINNING_LINES.iter().enumerate() {
            let mut cells = [None; 9];
            for &c in line {
                cells[c] = Some(Player::O);
            }
            let game = TicTacToe::from_cells(cells, Player::X);
            assert_eq!(game.status(), Status::Won { winner: Player::O, line: Line(i as u8) });
        }
    }

    mod properties {
        use proptest::prelude::*;

        use super::*;

        fn moves() -> impl Strategy<Value = Vec<usize>> {
            prop::collection::vec(0usize..12, 0..30)
        }

        fn brute_status(game: &TicTacToe) -> Status {
            for (i, &[a, b, c]) in WINNING_LINES.iter().enumerate() {
                if let Some(p) = game[a] {
                    if game[b] == Some(p) && game[c] == Some(p) {
                        return Status::Won { winner: p, line: Line(i as u8) };
                    }
                }
            }
            if game.iter().all(Option::is_some) {
                Status::Draw
            } else {
                Status::InProgress
            }
        }

        proptest! {
            #[test]
            fn turn_alternates_from_x(moves in moves()) {
                let mut game = TicTacToe::new();
                let mut expected = Player::X;
                for idx in moves {
                    if let Ok(placed) = game.attempt_move(idx) {
                        prop_assert_eq!(placed.mark, expected);
                        prop_assert_eq!(placed.index, idx);
                        expected = expected.opponent();
                    }
                }
            }

            #[test]
            fn rejected_moves_change_nothing(moves in moves()) {
                let mut game = TicTacToe::new();
                for idx in moves {
                    let before = game.clone();
                    if game.attempt_move(idx).is_err() {
                        prop_assert!(game.same(&before));
                        prop_assert_eq!(game.turn(), before.turn());
                    } else {
                        prop_assert_eq!(game.moves_played(), before.moves_played() + 1);
                    }
                }
            }

            #[test]
            fn status_matches_line_scan(moves in moves()) {
                let mut game = TicTacToe::new();
                prop_assert_eq!(game.status(), brute_status(&game));
                for idx in moves {
                    let result = game.attempt_move(idx);
                    let status = game.status();
                    prop_assert_eq!(status, brute_status(&game));
                    if let Ok(placed) = result {
                        prop_assert_eq!(placed.status, status);
                    }
                    if status.is_terminal() {
                        prop_assert_eq!(game.attempt_move(idx % 9), Err(InvalidMove::GameOver));
                    }
                }
            }

            #[test]
            fn reset_from_any_state(moves in moves()) {
                let mut game = TicTacToe::new();
                for idx in moves {
                    let _ = game.attempt_move(idx);
                    let mut cleared = game.clone();
                    cleared.reset();
                    prop_assert!(cleared.same(&TicTacToe::new()));
                    prop_assert_eq!(cleared.status(), Status::InProgress);
                    prop_assert_eq!(cleared.turn(), Player::X);
                }
            }
        }
    }
}
