/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt, str::FromStr};

use anyhow::{bail, Context, Result};

use super::{Board, Color, Move, Piece, PieceKind};

/// A game in progress: a [`Board`] and the [`Color`] whose turn it is.
///
/// This is the unit of mutation for the live game, and the unit copied for every node of a search.
/// The turn flips exactly once for every move applied through [`State::apply`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct State {
    board: Board,
    turn: Color,
}

impl State {
    /// Creates a new [`State`] from a board and the side to move.
    #[inline(always)]
    pub const fn new(board: Board, turn: Color) -> Self {
        Self { board, turn }
    }

    /// The standard starting position, White to move.
    #[inline(always)]
    pub fn standard() -> Self {
        Self::default()
    }

    /// Constructs a [`State`] from a FEN string.
    ///
    /// Only the placement and side-to-move fields are read.
    /// If the side-to-move is omitted, White is assumed.
    /// Each side must have exactly one King.
    ///
    /// # Example
    /// ```
    /// # use gambit::{State, Color};
    /// let state = State::from_fen("4k3/8/8/8/8/8/8/4K3 b - - 0 1").unwrap();
    /// assert_eq!(state.turn(), Color::Black);
    /// ```
    pub fn from_fen(fen: &str) -> Result<Self> {
        let board = Board::from_fen(fen)?;
        for color in Color::all() {
            let kings = board.count(Piece::new(color, PieceKind::King));
            if kings != 1 {
                bail!("FEN must have exactly one {color} King. Got {kings}");
            }
        }

        let turn = match fen.split_ascii_whitespace().nth(1) {
            Some(stm) => Color::from_fen(stm).with_context(|| format!("Invalid FEN {fen:?}"))?,
            None => Color::White,
        };

        Ok(Self::new(board, turn))
    }

    /// Generates a FEN string for this [`State`].
    ///
    /// Castling, en passant, and move clocks are not tracked, so those fields are always `- - 0 1`.
    pub fn to_fen(&self) -> String {
        let stm = if self.turn.is_white() { 'w' } else { 'b' };
        format!("{} {stm} - - 0 1", self.board.to_fen())
    }

    /// Fetches the [`Board`] of this [`State`].
    #[inline(always)]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    /// Fetches the [`Color`] whose turn it is.
    #[inline(always)]
    pub const fn turn(&self) -> Color {
        self.turn
    }

    /// Flips the side to move without moving anything. Equivalent to a null move.
    #[inline(always)]
    pub fn toggle_turn(&mut self) {
        self.turn = self.turn.opponent();
    }

    /// Applies `mv` to the board and passes the turn to the opponent.
    ///
    /// Returns the captured piece, if any.
    /// No legality is checked here; see [`crate::rules::validate_move`].
    #[inline(always)]
    pub fn apply(&mut self, mv: Move) -> Option<Piece> {
        let captured = self.board.move_piece(mv.from(), mv.to());
        self.toggle_turn();
        captured
    }

    /// Copy-make: returns a new [`State`] with `mv` applied, leaving `self` untouched.
    #[inline(always)]
    pub fn with_move_made(&self, mv: Move) -> Self {
        let mut copied = *self;
        copied.apply(mv);
        copied
    }
}

impl FromStr for State {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_fen(s)
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n\n{} to move", self.board, self.turn)
    }
}

impl fmt::Debug for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_fen())
    }
}
