/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use thiserror::Error;

use crate::{Color, GameStatus, Piece, Square};

/// Why a move was rejected.
///
/// Every variant is recoverable: the game the move was tried on is left exactly as it was.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MoveError {
    /// A coordinate could not be read as a square on the board.
    #[error("{input:?} is not a square on the board")]
    OutOfBounds { input: String },

    /// There is nothing to move on the source square.
    #[error("there is no piece on {square}")]
    EmptySource { square: Square },

    /// The piece on the source square belongs to the player who is not on move.
    #[error("the {piece:?} on {square} cannot move: it is {turn}'s turn")]
    NotYourTurn {
        square: Square,
        piece: Piece,
        turn: Color,
    },

    /// The destination is occupied by a piece of the mover's own color.
    #[error("the {piece:?} on {from} cannot capture its own piece on {to}")]
    FriendlyCollision { from: Square, to: Square, piece: Piece },

    /// The piece cannot reach the destination by its movement rules.
    #[error("the {piece:?} on {from} cannot move to {to}")]
    IllegalGeometry { from: Square, to: Square, piece: Piece },

    /// The move would leave (or put) the mover's own King under attack.
    #[error("moving the {piece:?} from {from} to {to} would leave {color}'s king in check", color = .piece.color())]
    LeavesKingInCheck { from: Square, to: Square, piece: Piece },
}

/// Errors surfaced by the engine's game operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    /// The requested move was rejected; see [`MoveError`] for the reason.
    #[error(transparent)]
    InvalidMove(#[from] MoveError),

    /// The side to move has no legal moves.
    ///
    /// `status` is either [`GameStatus::Checkmate`] or [`GameStatus::Stalemate`].
    #[error("{side} has no legal moves: {status}")]
    NoLegalMoves { side: Color, status: GameStatus },
}

/// Result type alias for game operations.
pub type GameResult<T> = Result<T, GameError>;
