use crate::game::{BOARD_SIZE, Board, GameState, Move, Piece, Player, Position, Winner};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GameError {
    #[error("Invalid move: {0}")]
    InvalidMove(String),
    #[error("Game already over")]
    GameOver,
    #[error("Not your turn")]
    NotYourTurn,
}

/// The rules engine. Owns the live [`GameState`] and an undo history of the
/// snapshots committed before each move.
///
/// Every operation is synchronous and total: illegal requests are rejected
/// up front and leave the current snapshot untouched. The engine does no
/// locking; a hosting application must serialize calls onto one thread.
pub struct GameEngine {
    state: GameState,
    history: Vec<GameState>,
}

impl GameEngine {
    /// An engine at the canonical starting position.
    pub fn new() -> Self {
        Self::with_state(GameState::default())
    }

    /// An engine starting from an arbitrary position, mainly for tests.
    pub fn with_state(initial: GameState) -> Self {
        GameEngine {
            state: initial,
            history: Vec::new(),
        }
    }

    /// The current snapshot.
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Reset to the starting position and forget the undo history.
    pub fn new_game(&mut self) {
        self.state = GameState::default();
        self.history.clear();
    }

    /// Select the piece at `pos` for the side to move.
    ///
    /// Selecting an empty cell, an enemy piece, or anything once the game is
    /// over clears the selection instead. The board and turn never change.
    pub fn select(&mut self, pos: Position) {
        if self.state.is_game_over() {
            self.state.selected = None;
            return;
        }

        let owned = self
            .state
            .board
            .get(pos)
            .is_some_and(|piece| piece.owner() == self.state.current_turn);

        self.state.selected = if owned { Some(pos) } else { None };
    }

    /// Every destination the piece at `from` can slide to.
    ///
    /// Pieces move like rooks: any distance along a rank or file, stopping
    /// before the first occupied cell. Only the king may land on a corner.
    /// The result is empty when `from` is out of bounds, not owned by the
    /// side to move, or the game is over.
    pub fn legal_moves(&self, from: Position) -> Vec<Position> {
        if self.state.is_game_over() {
            return Vec::new();
        }

        let board = &self.state.board;
        let Some(piece) = board.get(from) else {
            return Vec::new();
        };
        if piece.owner() != self.state.current_turn {
            return Vec::new();
        }

        let mut moves = Vec::new();
        let directions = [(0, 1), (0, -1), (1, 0), (-1, 0)];

        for &(dr, dc) in &directions {
            let mut r = from.row as i32;
            let mut c = from.col as i32;

            loop {
                r += dr;
                c += dc;

                if r < 0 || r >= BOARD_SIZE as i32 || c < 0 || c >= BOARD_SIZE as i32 {
                    break;
                }

                let to = Position::new(r as usize, c as usize);

                // No jumping over pieces
                if board.get(to).is_some() {
                    break;
                }

                // Corners admit the king only
                if board.is_corner(to) && piece != Piece::King {
                    break;
                }

                moves.push(to);
            }
        }

        moves
    }

    /// Move the currently selected piece to `to`.
    ///
    /// Returns false, changing nothing, when no piece is selected or the
    /// move is not legal. On success the move is committed: captures are
    /// resolved, a winner is detected, the turn passes, and the selection is
    /// cleared.
    pub fn move_selected(&mut self, to: Position) -> bool {
        let Some(from) = self.state.selected else {
            return false;
        };
        self.make_move(Move::new(from, to)).is_ok()
    }

    /// Checked move application, independent of the selection.
    ///
    /// Validation happens before any state is touched, so an `Err` means the
    /// snapshot is exactly as it was.
    pub fn make_move(&mut self, mv: Move) -> Result<(), GameError> {
        if self.state.is_game_over() {
            return Err(GameError::GameOver);
        }

        if let Some(piece) = self.state.board.get(mv.from) {
            if piece.owner() != self.state.current_turn {
                return Err(GameError::NotYourTurn);
            }
        }

        if !self.legal_moves(mv.from).contains(&mv.to) {
            return Err(GameError::InvalidMove(format!("Move {} is not legal", mv)));
        }

        // Snapshot the pre-move state, selection included, for undo
        self.history.push(self.state.clone());

        let mover = self.state.current_turn;
        let mut board = self.state.board.move_piece(mv.from, mv.to);
        board = resolve_captures(&board, mv.to, mover);
        let winner = detect_winner(&board);

        self.state.board = board;
        self.state.selected = None;
        self.state.winner = winner;

        // A game-ending move leaves the turn with the winner; the terminal
        // state blocks all further play anyway
        if winner.is_none() {
            self.state.current_turn = mover.opposite();
        }

        Ok(())
    }

    /// Whether `undo` would succeed. Undo is disabled once a winner exists.
    pub fn can_undo(&self) -> bool {
        !self.state.is_game_over() && !self.history.is_empty()
    }

    /// Restore the snapshot committed immediately before the last move.
    pub fn undo(&mut self) -> bool {
        if !self.can_undo() {
            return false;
        }
        if let Some(previous) = self.history.pop() {
            self.state = previous;
            true
        } else {
            false
        }
    }
}

impl Default for GameEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Custodian capture around the landing square.
///
/// In each orthogonal direction, an enemy piece directly adjacent to the
/// moved piece is removed when the mover also owns the piece one cell
/// beyond it. The king is immune to the sandwich. Directions are resolved
/// independently, so one landing can take up to three pieces, and the board
/// edge never stands in for a capturing piece.
fn resolve_captures(board: &Board, landing: Position, mover: Player) -> Board {
    let mut board = board.clone();
    let directions = [(0, 1), (0, -1), (1, 0), (-1, 0)];

    for &(dr, dc) in &directions {
        let adj_r = landing.row as i32 + dr;
        let adj_c = landing.col as i32 + dc;
        let beyond_r = landing.row as i32 + 2 * dr;
        let beyond_c = landing.col as i32 + 2 * dc;

        if adj_r < 0 || adj_r >= BOARD_SIZE as i32 || adj_c < 0 || adj_c >= BOARD_SIZE as i32 {
            continue;
        }
        if beyond_r < 0
            || beyond_r >= BOARD_SIZE as i32
            || beyond_c < 0
            || beyond_c >= BOARD_SIZE as i32
        {
            continue;
        }

        let adjacent = Position::new(adj_r as usize, adj_c as usize);
        let beyond = Position::new(beyond_r as usize, beyond_c as usize);

        let Some(victim) = board.get(adjacent) else {
            continue;
        };
        if victim == Piece::King || victim.owner() != mover.opposite() {
            continue;
        }

        let backstopped = board
            .get(beyond)
            .is_some_and(|piece| piece.owner() == mover);

        if backstopped {
            board = board.with_cell(adjacent, None);
        }
    }

    board
}

/// Win detection against the post-capture board.
///
/// Defenders win the moment the king stands on a corner. Attackers win when
/// the king has an attacker on all four orthogonal neighbors; an edge king
/// has at most three on-board neighbors and so can never be surrounded. A
/// missing king also counts as an attacker win, although no capture rule
/// here removes him.
fn detect_winner(board: &Board) -> Option<Winner> {
    let Some(king) = board.king_position() else {
        return Some(Winner::Attackers);
    };

    if board.is_corner(king) {
        return Some(Winner::Defenders);
    }

    if king_surrounded(board, king) {
        return Some(Winner::Attackers);
    }

    None
}

fn king_surrounded(board: &Board, king: Position) -> bool {
    let directions = [(0, 1), (0, -1), (1, 0), (-1, 0)];

    for &(dr, dc) in &directions {
        let r = king.row as i32 + dr;
        let c = king.col as i32 + dc;

        if r < 0 || r >= BOARD_SIZE as i32 || c < 0 || c >= BOARD_SIZE as i32 {
            return false;
        }

        if board.get(Position::new(r as usize, c as usize)) != Some(Piece::Attacker) {
            return false;
        }
    }

    true
}
