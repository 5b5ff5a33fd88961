/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Move legality: check-safety on top of per-piece move geometry.
//!
//! Everything here is a pure read of a [`State`]. Moves are tried on copies,
//! so validating (even repeatedly, even from inside a search) never changes the game.

use std::fmt;

use crate::{
    candidate_moves, is_attacked, Board, Color, Move, MoveError, MoveList, Square, State,
};

/// Where a game stands, from the point of view of the side to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameStatus {
    /// The side to move has at least one legal move and is not in check.
    Ongoing,

    /// The side to move is in check, but can get out of it.
    Check,

    /// The side to move is in check and has no legal moves.
    Checkmate { winner: Color },

    /// The side to move is not in check and has no legal moves. The game is drawn.
    Stalemate,
}

impl GameStatus {
    /// Returns `true` if no more moves can be played.
    #[inline(always)]
    pub const fn is_over(&self) -> bool {
        matches!(self, Self::Checkmate { .. } | Self::Stalemate)
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ongoing => write!(f, "ongoing"),
            Self::Check => write!(f, "check"),
            Self::Checkmate { winner } => write!(f, "checkmate, {winner} wins"),
            Self::Stalemate => write!(f, "stalemate"),
        }
    }
}

/// Reads a coordinate such as `"e4"`, reporting anything off the board as [`MoveError::OutOfBounds`].
///
/// # Example
/// ```
/// # use gambit::{rules::parse_square, MoveError, Square};
/// assert_eq!(parse_square("e4"), Ok(Square::E4));
/// assert!(matches!(parse_square("i9"), Err(MoveError::OutOfBounds { .. })));
/// ```
pub fn parse_square(input: &str) -> Result<Square, MoveError> {
    input
        .trim()
        .parse::<Square>()
        .map_err(|_| MoveError::OutOfBounds {
            input: input.to_string(),
        })
}

/// Checks whether moving the piece on `from` to `to` is legal in `state`.
///
/// The checks run in a fixed order and stop at the first failure:
/// 1. `from` must hold a piece.
/// 2. That piece must belong to the side to move.
/// 3. `to` must be one of the piece's [`candidate_moves`].
/// 4. After the move, the mover's King must not be attacked.
///
/// # Example
/// ```
/// # use gambit::{rules::validate_move, MoveError, Square, State};
/// let state = State::standard();
/// assert!(validate_move(&state, Square::E2, Square::E4).is_ok());
/// assert!(matches!(
///     validate_move(&state, Square::E7, Square::E5),
///     Err(MoveError::NotYourTurn { .. })
/// ));
/// ```
pub fn validate_move(state: &State, from: Square, to: Square) -> Result<(), MoveError> {
    let board = state.board();

    let piece = board
        .piece_at(from)
        .ok_or(MoveError::EmptySource { square: from })?;

    if piece.color() != state.turn() {
        return Err(MoveError::NotYourTurn {
            square: from,
            piece,
            turn: state.turn(),
        });
    }

    if !candidate_moves(piece, board, from).contains(&to) {
        return Err(if from != to && board.color_at(to) == Some(piece.color()) {
            MoveError::FriendlyCollision { from, to, piece }
        } else {
            MoveError::IllegalGeometry { from, to, piece }
        });
    }

    if leaves_king_attacked(state, Move::new(from, to)) {
        return Err(MoveError::LeavesKingInCheck { from, to, piece });
    }

    Ok(())
}

/// Parses both coordinates and validates the move between them.
///
/// Coordinates that are not squares on the board are reported as [`MoveError::OutOfBounds`].
pub fn validate_coords(state: &State, from: &str, to: &str) -> Result<Move, MoveError> {
    let from = parse_square(from)?;
    let to = parse_square(to)?;
    validate_move(state, from, to)?;
    Ok(Move::new(from, to))
}

/// Convenience wrapper for [`validate_move`].
#[inline(always)]
pub fn is_valid_move(state: &State, from: Square, to: Square) -> bool {
    validate_move(state, from, to).is_ok()
}

/// Returns `true` if `color`'s King stands on a square attacked by the opponent.
///
/// A board without a King of that color is never in check.
pub fn in_check(board: &Board, color: Color) -> bool {
    board
        .king_square(color)
        .is_some_and(|king| is_attacked(board, king, color.opponent()))
}

/// Returns `true` if the side to move is in check.
#[inline(always)]
pub fn is_in_check(state: &State) -> bool {
    in_check(state.board(), state.turn())
}

/// Plays `mv` on a copy and reports whether the mover's King is attacked afterward.
#[inline(always)]
fn leaves_king_attacked(state: &State, mv: Move) -> bool {
    let mover = state.turn();
    in_check(state.with_move_made(mv).board(), mover)
}

/// Generates every legal move for the side to move.
///
/// Moves are in enumeration order: own pieces in board scan order (`a1, b1, ..., h8`),
/// then each piece's destinations in [`candidate_moves`] order.
pub fn legal_moves(state: &State) -> MoveList {
    let mut moves = MoveList::new();

    for (from, _) in state.board().pieces(state.turn()) {
        moves.extend(legal_moves_from(state, from));
    }

    moves
}

/// Generates the legal moves of the piece on `from`, if it belongs to the side to move.
pub fn legal_moves_from(state: &State, from: Square) -> MoveList {
    let board = state.board();
    let mut moves = MoveList::new();

    let Some(piece) = board.piece_at(from) else {
        return moves;
    };
    if piece.color() != state.turn() {
        return moves;
    }

    for to in candidate_moves(piece, board, from) {
        let mv = Move::new(from, to);
        if !leaves_king_attacked(state, mv) {
            moves.push(mv);
        }
    }

    moves
}

/// Returns `true` if the side to move has at least one legal move.
///
/// Stops at the first legal move found.
pub fn has_legal_moves(state: &State) -> bool {
    let board = state.board();
    board.pieces(state.turn()).any(|(from, piece)| {
        candidate_moves(piece, board, from)
            .into_iter()
            .any(|to| !leaves_king_attacked(state, Move::new(from, to)))
    })
}

/// Classifies `state` by exhaustively checking for legal moves.
///
/// # Example
/// ```
/// # use gambit::{rules::status, Color, GameStatus, State};
/// // Back-rank mate
/// let state = State::from_fen("4r2k/8/8/8/8/8/3P1P2/3RKR2 w").unwrap();
/// assert_eq!(status(&state), GameStatus::Checkmate { winner: Color::Black });
/// ```
pub fn status(state: &State) -> GameStatus {
    match (is_in_check(state), has_legal_moves(state)) {
        (false, true) => GameStatus::Ongoing,
        (true, true) => GameStatus::Check,
        (true, false) => GameStatus::Checkmate {
            winner: state.turn().opponent(),
        },
        (false, false) => GameStatus::Stalemate,
    }
}

/// Recursively make all legal moves available until the supplied depth is reached, returning the total number of positions reachable.
///
/// Uses bulk counting at depth 1.
pub fn perft(state: &State, depth: usize) -> u64 {
    // Bulk counting; no need to recurse again just to apply a singular move and return 1.
    if depth == 1 {
        return legal_moves(state).len() as u64;
    } else if depth == 0 {
        return 1;
    }

    legal_moves(state).into_iter().fold(0, |nodes, mv| {
        nodes + perft(&state.with_move_made(mv), depth - 1)
    })
}

/// Splits a [`perft`] by root move, returning each legal move alongside the nodes reachable after it.
pub fn divide(state: &State, depth: usize) -> Vec<(Move, u64)> {
    legal_moves(state)
        .into_iter()
        .map(|mv| (mv, perft(&state.with_move_made(mv), depth.saturating_sub(1))))
        .collect()
}
