use serde::{Deserialize, Serialize};
use std::fmt;

/// Board edge length. The engine supports exactly one board, 11x11 Hnefatafl.
pub const BOARD_SIZE: usize = 11;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Player {
    Attacker,
    Defender,
}

impl Player {
    pub fn opposite(&self) -> Player {
        match self {
            Player::Attacker => Player::Defender,
            Player::Defender => Player::Attacker,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Piece {
    Attacker,
    Defender,
    King,
}

impl Piece {
    /// The side a piece fights for. The king belongs to the defenders.
    pub fn owner(&self) -> Player {
        match self {
            Piece::Attacker => Player::Attacker,
            Piece::Defender | Piece::King => Player::Defender,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Position { row, col }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    pub from: Position,
    pub to: Position,
}

impl Move {
    pub fn new(from: Position, to: Position) -> Self {
        Move { from, to }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Winner {
    Attackers,
    Defenders,
}

/// An 11x11 grid of cells. `None` is an empty cell.
///
/// Boards are values: `with_cell` and `move_piece` return a fresh board and
/// never touch the receiver, so snapshots held in an undo history stay
/// independent of the live position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    cells: [[Option<Piece>; BOARD_SIZE]; BOARD_SIZE],
}

impl Board {
    /// A board with every cell empty.
    pub fn empty() -> Board {
        Board {
            cells: [[None; BOARD_SIZE]; BOARD_SIZE],
        }
    }

    /// The canonical starting position: 24 attackers, 12 defenders, king in
    /// the center.
    pub fn initial() -> Board {
        let mut board = Board::empty();
        let center = BOARD_SIZE / 2;

        board.cells[center][center] = Some(Piece::King);

        // Defenders form a diamond around the king
        let defenders = [
            (center - 2, center),
            (center - 1, center - 1),
            (center - 1, center),
            (center - 1, center + 1),
            (center, center - 2),
            (center, center - 1),
            (center, center + 1),
            (center, center + 2),
            (center + 1, center - 1),
            (center + 1, center),
            (center + 1, center + 1),
            (center + 2, center),
        ];

        for &(r, c) in &defenders {
            board.cells[r][c] = Some(Piece::Defender);
        }

        // Attackers hold the edge midlines, six per side (T-shape)
        let attackers = [
            // Top
            (0, 3),
            (0, 4),
            (0, 5),
            (0, 6),
            (0, 7),
            (1, 5),
            // Bottom
            (10, 3),
            (10, 4),
            (10, 5),
            (10, 6),
            (10, 7),
            (9, 5),
            // Left
            (3, 0),
            (4, 0),
            (5, 0),
            (6, 0),
            (7, 0),
            (5, 1),
            // Right
            (3, 10),
            (4, 10),
            (5, 10),
            (6, 10),
            (7, 10),
            (5, 9),
        ];

        for &(r, c) in &attackers {
            board.cells[r][c] = Some(Piece::Attacker);
        }

        board
    }

    pub fn is_inside(&self, pos: Position) -> bool {
        pos.row < BOARD_SIZE && pos.col < BOARD_SIZE
    }

    /// True only for the four extreme corner cells.
    pub fn is_corner(&self, pos: Position) -> bool {
        (pos.row == 0 || pos.row == BOARD_SIZE - 1)
            && (pos.col == 0 || pos.col == BOARD_SIZE - 1)
    }

    /// The piece at `pos`, or `None` for an empty or out-of-bounds cell.
    pub fn get(&self, pos: Position) -> Option<Piece> {
        if self.is_inside(pos) {
            self.cells[pos.row][pos.col]
        } else {
            None
        }
    }

    /// A new board with the cell at `pos` replaced. Out-of-bounds positions
    /// leave the board unchanged.
    pub fn with_cell(&self, pos: Position, cell: Option<Piece>) -> Board {
        let mut next = self.clone();
        if self.is_inside(pos) {
            next.cells[pos.row][pos.col] = cell;
        }
        next
    }

    /// A new board with the piece at `from` relocated to `to` and the source
    /// cell cleared.
    pub fn move_piece(&self, from: Position, to: Position) -> Board {
        let mut next = self.clone();
        if self.is_inside(from) && self.is_inside(to) {
            next.cells[to.row][to.col] = next.cells[from.row][from.col];
            next.cells[from.row][from.col] = None;
        }
        next
    }

    /// Scan the board for the king.
    pub fn king_position(&self) -> Option<Position> {
        for row in 0..BOARD_SIZE {
            for col in 0..BOARD_SIZE {
                if self.cells[row][col] == Some(Piece::King) {
                    return Some(Position::new(row, col));
                }
            }
        }
        None
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "   ")?;
        for col in 0..BOARD_SIZE {
            write!(f, "{:2} ", col)?;
        }
        writeln!(f)?;

        for row in 0..BOARD_SIZE {
            write!(f, "{:2} ", row)?;
            for col in 0..BOARD_SIZE {
                let pos = Position::new(row, col);
                let c = match self.get(pos) {
                    Some(Piece::Attacker) => 'A',
                    Some(Piece::Defender) => 'D',
                    Some(Piece::King) => 'K',
                    None if self.is_corner(pos) => 'X',
                    None => '.',
                };
                write!(f, " {} ", c)?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

/// One immutable snapshot of a game in progress.
///
/// `selected` is only ever set to a cell owned by `current_turn`. Once
/// `winner` is set the snapshot is terminal and the engine refuses every
/// further mutation except a full reset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub board: Board,
    pub current_turn: Player,
    pub selected: Option<Position>,
    pub winner: Option<Winner>,
}

impl GameState {
    pub fn new(board: Board, current_turn: Player) -> Self {
        GameState {
            board,
            current_turn,
            selected: None,
            winner: None,
        }
    }

    pub fn is_game_over(&self) -> bool {
        self.winner.is_some()
    }
}

impl Default for GameState {
    fn default() -> Self {
        GameState::new(Board::initial(), Player::Attacker)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_board_has_canonical_piece_counts() {
        let board = Board::initial();

        let mut attackers = 0;
        let mut defenders = 0;
        let mut kings = 0;

        for row in 0..BOARD_SIZE {
            for col in 0..BOARD_SIZE {
                match board.get(Position::new(row, col)) {
                    Some(Piece::Attacker) => attackers += 1,
                    Some(Piece::Defender) => defenders += 1,
                    Some(Piece::King) => kings += 1,
                    None => {}
                }
            }
        }

        assert_eq!(attackers, 24);
        assert_eq!(defenders, 12);
        assert_eq!(kings, 1);
    }

    #[test]
    fn initial_board_places_key_pieces() {
        let board = Board::initial();

        assert_eq!(board.get(Position::new(5, 5)), Some(Piece::King));
        assert_eq!(board.king_position(), Some(Position::new(5, 5)));

        // Edge midlines belong to the attackers
        assert_eq!(board.get(Position::new(0, 5)), Some(Piece::Attacker));
        assert_eq!(board.get(Position::new(10, 5)), Some(Piece::Attacker));
        assert_eq!(board.get(Position::new(5, 0)), Some(Piece::Attacker));
        assert_eq!(board.get(Position::new(5, 10)), Some(Piece::Attacker));

        // Defender diamond
        assert_eq!(board.get(Position::new(4, 5)), Some(Piece::Defender));
        assert_eq!(board.get(Position::new(4, 4)), Some(Piece::Defender));
        assert_eq!(board.get(Position::new(3, 5)), Some(Piece::Defender));

        // Corners start empty
        assert_eq!(board.get(Position::new(0, 0)), None);
        assert_eq!(board.get(Position::new(10, 10)), None);
    }

    #[test]
    fn corner_identification() {
        let board = Board::empty();

        assert!(board.is_corner(Position::new(0, 0)));
        assert!(board.is_corner(Position::new(0, 10)));
        assert!(board.is_corner(Position::new(10, 0)));
        assert!(board.is_corner(Position::new(10, 10)));

        assert!(!board.is_corner(Position::new(0, 5)));
        assert!(!board.is_corner(Position::new(5, 5)));
        assert!(!board.is_corner(Position::new(1, 1)));
    }

    #[test]
    fn bounds_checks() {
        let board = Board::empty();

        assert!(board.is_inside(Position::new(0, 0)));
        assert!(board.is_inside(Position::new(10, 10)));
        assert!(!board.is_inside(Position::new(11, 0)));
        assert!(!board.is_inside(Position::new(0, 11)));

        assert_eq!(board.get(Position::new(11, 11)), None);
    }

    #[test]
    fn with_cell_leaves_receiver_untouched() {
        let board = Board::empty();
        let pos = Position::new(3, 4);

        let updated = board.with_cell(pos, Some(Piece::Defender));

        assert_eq!(board.get(pos), None);
        assert_eq!(updated.get(pos), Some(Piece::Defender));
    }

    #[test]
    fn with_cell_out_of_bounds_is_a_no_op() {
        let board = Board::initial();
        let updated = board.with_cell(Position::new(11, 5), Some(Piece::Attacker));

        assert_eq!(board, updated);
    }

    #[test]
    fn move_piece_clears_source_and_fills_target() {
        let from = Position::new(2, 2);
        let to = Position::new(2, 7);
        let board = Board::empty().with_cell(from, Some(Piece::King));

        let moved = board.move_piece(from, to);

        assert_eq!(moved.get(from), None);
        assert_eq!(moved.get(to), Some(Piece::King));

        // The source board still holds the king where it was
        assert_eq!(board.get(from), Some(Piece::King));
        assert_eq!(board.get(to), None);
    }

    #[test]
    fn piece_owners() {
        assert_eq!(Piece::Attacker.owner(), Player::Attacker);
        assert_eq!(Piece::Defender.owner(), Player::Defender);
        assert_eq!(Piece::King.owner(), Player::Defender);
    }

    #[test]
    fn opposite_is_involutive() {
        assert_eq!(Player::Attacker.opposite(), Player::Defender);
        assert_eq!(Player::Defender.opposite(), Player::Attacker);
        assert_eq!(Player::Attacker.opposite().opposite(), Player::Attacker);
    }

    #[test]
    fn king_position_on_empty_board_is_none() {
        assert_eq!(Board::empty().king_position(), None);
    }

    #[test]
    fn default_state_is_ready_to_play() {
        let state = GameState::default();

        assert_eq!(state.board, Board::initial());
        assert_eq!(state.current_turn, Player::Attacker);
        assert_eq!(state.selected, None);
        assert_eq!(state.winner, None);
        assert!(!state.is_game_over());
    }

    #[test]
    fn state_survives_json_transport() {
        let mut state = GameState::default();
        state.selected = Some(Position::new(0, 3));

        let json = serde_json::to_string(&state).unwrap();
        let restored: GameState = serde_json::from_str(&json).unwrap();

        assert_eq!(state, restored);
    }

    #[test]
    fn board_display_marks_corners_and_pieces() {
        let rendered = Board::initial().to_string();

        assert!(rendered.contains('K'));
        assert!(rendered.contains('A'));
        assert!(rendered.contains('D'));
        assert!(rendered.contains('X'));
    }
}
