/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;

use anyhow::Result;
use tracing::debug;

use crate::{
    rules::{self, validate_coords, validate_move},
    Color, GameError, GameResult, GameStatus, Move, MoveError, MoveList, Piece, Search,
    SearchConfig, SearchResult, Square, State,
};

/// A move that was played, reported back to whoever asked for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MoveEvent {
    /// The move that was played.
    pub mv: Move,

    /// The side that played it.
    pub side: Color,

    /// The piece that moved.
    pub piece: Piece,

    /// The enemy piece removed from the destination, if any.
    pub captured: Option<Piece>,

    /// Where the game stands afterward, from the opponent's point of view.
    pub status: GameStatus,
}

impl fmt::Display for MoveEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} plays {} ({} {} -> {})",
            self.side,
            self.mv,
            self.piece.kind(),
            self.mv.from(),
            self.mv.to()
        )?;

        if let Some(captured) = self.captured {
            write!(f, ", capturing {captured:?}")?;
        }

        match self.status {
            GameStatus::Ongoing => Ok(()),
            status => write!(f, ": {status}"),
        }
    }
}

/// Coordinates a game between a human and the computer.
///
/// The engine exclusively owns the live [`State`]. Human moves are validated before they touch it,
/// and searches only ever receive a shared reference, exploring copies.
#[derive(Debug, Clone)]
pub struct Engine {
    /// The current state of the game.
    ///
    /// This is modified whenever moves are played or new positions are given,
    /// and is reset whenever the engine is told to start a new game.
    state: State,

    /// Configuration for the searches used to pick the computer's moves.
    config: SearchConfig,

    /// Every move played since the game (or position) was set up, in order.
    history: Vec<MoveEvent>,
}

impl Engine {
    /// Constructs a new [`Engine`] at the standard starting position, White to move.
    pub fn new(config: SearchConfig) -> Self {
        Self {
            state: State::standard(),
            config,
            history: Vec::new(),
        }
    }

    /// Constructs a new [`Engine`] from a FEN string.
    pub fn from_fen(fen: &str, config: SearchConfig) -> Result<Self> {
        let mut engine = Self::new(config);
        engine.set_state(State::from_fen(fen)?);
        Ok(engine)
    }

    /// Resets the game to the standard starting position and forgets the move history.
    pub fn new_game(&mut self) {
        self.set_state(State::standard());
    }

    /// Replaces the live game with `state` and forgets the move history.
    pub fn set_state(&mut self, state: State) {
        self.state = state;
        self.history.clear();
    }

    /// Validates the move between two coordinates, such as `"e2"` and `"e4"`, and plays it if it is legal.
    ///
    /// On failure, the game is left exactly as it was.
    ///
    /// # Example
    /// ```
    /// # use gambit::{Color, Engine};
    /// let mut engine = Engine::default();
    /// assert!(engine.apply_move("e2", "e4").is_ok());
    /// assert_eq!(engine.current_turn(), Color::Black);
    ///
    /// // White cannot move twice in a row
    /// assert!(engine.apply_move("d2", "d4").is_err());
    /// assert_eq!(engine.current_turn(), Color::Black);
    /// ```
    pub fn apply_move(&mut self, from: &str, to: &str) -> GameResult<MoveEvent> {
        let mv = validate_coords(&self.state, from, to)?;
        self.commit(mv)
    }

    /// Like [`Engine::apply_move`], but only reports whether the move was played.
    #[inline(always)]
    pub fn try_move(&mut self, from: &str, to: &str) -> bool {
        self.apply_move(from, to).is_ok()
    }

    /// Validates `mv` and plays it if it is legal.
    pub fn play(&mut self, mv: Move) -> GameResult<MoveEvent> {
        validate_move(&self.state, mv.from(), mv.to())?;
        self.commit(mv)
    }

    /// Searches the live game for the side to move's best move, without playing it.
    pub fn think(&self) -> GameResult<SearchResult> {
        Search::new(self.config).best_move(&self.state)
    }

    /// Searches the live game and plays the move found.
    ///
    /// Returns [`GameError::NoLegalMoves`] if the side to move is checkmated or stalemated.
    pub fn compute_and_apply_ai_move(&mut self) -> GameResult<MoveEvent> {
        let res = self.think()?;

        let mv = res.bestmove.ok_or(GameError::NoLegalMoves {
            side: self.state.turn(),
            status: self.status(),
        })?;

        self.play(mv)
    }

    /// Plays a move that has already been validated, recording it in the history.
    fn commit(&mut self, mv: Move) -> GameResult<MoveEvent> {
        let side = self.state.turn();
        let Some(piece) = self.state.board().piece_at(mv.from()) else {
            return Err(MoveError::EmptySource { square: mv.from() }.into());
        };

        let captured = self.state.apply(mv);
        let status = rules::status(&self.state);

        let event = MoveEvent {
            mv,
            side,
            piece,
            captured,
            status,
        };

        debug!(%mv, %side, captured = ?captured, %status, "move applied");
        self.history.push(event);

        Ok(event)
    }

    /// Fetches the [`Color`] whose turn it is.
    #[inline(always)]
    pub const fn current_turn(&self) -> Color {
        self.state.turn()
    }

    /// Renders the board rank by rank, White pieces in uppercase, Black pieces in lowercase, and `.` for empty squares.
    ///
    /// # Example
    /// ```
    /// # use gambit::Engine;
    /// let engine = Engine::default();
    /// assert!(engine.board_representation().starts_with("8| r n b q k b n r"));
    /// ```
    #[inline(always)]
    pub fn board_representation(&self) -> String {
        self.state.board().to_string()
    }

    /// Fetches a read-only view of the live game.
    #[inline(always)]
    pub const fn state(&self) -> &State {
        &self.state
    }

    /// Classifies the live game.
    #[inline(always)]
    pub fn status(&self) -> GameStatus {
        rules::status(&self.state)
    }

    /// Every legal move for the side to move.
    #[inline(always)]
    pub fn legal_moves(&self) -> MoveList {
        rules::legal_moves(&self.state)
    }

    /// Every legal move of the piece on `square`.
    #[inline(always)]
    pub fn legal_moves_from(&self, square: Square) -> MoveList {
        rules::legal_moves_from(&self.state, square)
    }

    /// Every move played since the game was set up.
    #[inline(always)]
    pub fn history(&self) -> &[MoveEvent] {
        &self.history
    }

    /// Depth the computer searches to.
    #[inline(always)]
    pub const fn depth(&self) -> usize {
        self.config.depth
    }

    /// Changes the depth the computer searches to.
    #[inline(always)]
    pub fn set_depth(&mut self, depth: usize) {
        self.config.depth = depth;
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(SearchConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PieceKind;

    fn engine_at(fen: &str) -> Engine {
        Engine::from_fen(fen, SearchConfig::with_depth(2)).unwrap()
    }

    #[test]
    fn test_opening_move() {
        let mut engine = Engine::default();
        let event = engine.apply_move("e2", "e4").unwrap();

        assert_eq!(event.mv, Move::new(Square::E2, Square::E4));
        assert_eq!(event.side, Color::White);
        assert_eq!(event.piece, Piece::WHITE_PAWN);
        assert_eq!(event.captured, None);
        assert_eq!(event.status, GameStatus::Ongoing);

        let board = engine.state().board();
        assert_eq!(board.piece_at(Square::E4), Some(Piece::WHITE_PAWN));
        assert_eq!(board.piece_at(Square::E2), None);
        assert_eq!(engine.current_turn(), Color::Black);
        assert_eq!(engine.history(), &[event]);
    }

    #[test]
    fn test_moving_opponents_piece_is_rejected() {
        let mut engine = Engine::default();
        let before = *engine.state();

        let err = engine.apply_move("e7", "e5").unwrap_err();
        assert!(matches!(
            err,
            GameError::InvalidMove(MoveError::NotYourTurn { .. })
        ));
        assert_eq!(*engine.state(), before);
        assert!(engine.history().is_empty());
    }

    #[test]
    fn test_turn_alternation() {
        let mut engine = Engine::default();
        let moves = [("e2", "e4"), ("e7", "e5"), ("g1", "f3"), ("b8", "c6")];

        for (i, (from, to)) in moves.into_iter().enumerate() {
            let turn = engine.current_turn();

            // A bad move never changes whose turn it is
            assert!(!engine.try_move(from, "h5"));
            assert_eq!(engine.current_turn(), turn);

            assert!(engine.try_move(from, to), "move {i}: {from}{to}");
            assert_eq!(engine.current_turn(), turn.opponent());
        }

        assert_eq!(engine.history().len(), 4);
    }

    #[test]
    fn test_rook_capture_removes_only_target() {
        let mut engine = engine_at("r3k3/p7/8/8/8/8/P7/R3K3 w");
        let pieces_before = engine.state().board().iter().count();

        let err = engine.apply_move("a1", "a8").unwrap_err();
        // The a2 pawn blocks the file
        assert!(matches!(
            err,
            GameError::InvalidMove(MoveError::IllegalGeometry { .. })
        ));
        assert_eq!(pieces_before, 6);

        let mut engine = engine_at("r3k3/8/8/8/8/8/8/R3K3 w");
        let event = engine.apply_move("a1", "a8").unwrap();
        assert_eq!(event.captured, Some(Piece::BLACK_ROOK));
        assert_eq!(
            engine.state().board().piece_at(Square::A8),
            Some(Piece::WHITE_ROOK)
        );
        assert_eq!(engine.state().board().iter().count(), 3);
    }

    #[test]
    fn test_out_of_bounds_input() {
        let mut engine = Engine::default();
        assert_eq!(
            engine.apply_move("e2", "e0"),
            Err(GameError::InvalidMove(MoveError::OutOfBounds {
                input: "e0".to_string()
            }))
        );
        assert_eq!(engine.current_turn(), Color::White);
    }

    #[test]
    fn test_ai_replies_with_legal_move() {
        let mut engine = engine_at(crate::FEN_STARTPOS);
        engine.apply_move("e2", "e4").unwrap();

        let before = *engine.state();
        let event = engine.compute_and_apply_ai_move().unwrap();
        assert_eq!(event.side, Color::Black);
        assert!(rules::is_valid_move(&before, event.mv.from(), event.mv.to()));
        assert_eq!(engine.current_turn(), Color::White);
        assert_eq!(engine.history().len(), 2);
    }

    #[test]
    fn test_thinking_does_not_change_the_game() {
        let engine = engine_at(crate::FEN_STARTPOS);
        let before = engine.board_representation();
        engine.think().unwrap();
        assert_eq!(engine.board_representation(), before);
    }

    #[test]
    fn test_checkmate_is_reported() {
        let mut engine = engine_at("4r2k/8/8/8/8/8/3P1P2/3RKR2 w");
        assert_eq!(
            engine.compute_and_apply_ai_move(),
            Err(GameError::NoLegalMoves {
                side: Color::White,
                status: GameStatus::Checkmate {
                    winner: Color::Black
                }
            })
        );
        assert!(engine.legal_moves().is_empty());
    }

    #[test]
    fn test_mating_move_event() {
        let mut engine = engine_at("6k1/5ppp/8/8/8/8/5PPP/R5K1 w");
        let event = engine.compute_and_apply_ai_move().unwrap();
        assert_eq!(event.mv, Move::new(Square::A1, Square::A8));
        assert_eq!(event.piece.kind(), PieceKind::Rook);
        assert_eq!(
            event.status,
            GameStatus::Checkmate {
                winner: Color::White
            }
        );
        assert!(event.to_string().ends_with("checkmate, White wins"));
    }

    #[test]
    fn test_new_game_resets() {
        let mut engine = Engine::default();
        engine.apply_move("d2", "d4").unwrap();
        engine.set_depth(3);
        engine.new_game();

        assert_eq!(*engine.state(), State::standard());
        assert!(engine.history().is_empty());
        assert_eq!(engine.depth(), 3);
    }

    #[test]
    fn test_unreachable_layouts_are_refused() {
        // Nine White Queens
        let fen = "Q2Q4/1Q4Q1/4Q3/2Q4R/Q4Q2/3Q4/1Q4Rp/1K1BBNNk w";
        assert!(Engine::from_fen(fen, SearchConfig::default()).is_err());
    }
}
