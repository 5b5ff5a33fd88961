/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt, str::FromStr};

use anyhow::{anyhow, bail, Result};

use super::Square;

/// Maximum possible number of moves in a given chess position.
///
/// Found [here](<https://www.chessprogramming.org/Chess_Position#cite_note-4>)
pub const MAX_NUM_MOVES: usize = 218;

/// Maximum number of destinations a single piece can have (a centralized Queen on an open board).
pub const MAX_PIECE_MOVES: usize = 27;

/// An alias for an [`arrayvec::ArrayVec`] containing at most [`MAX_NUM_MOVES`] moves.
pub type MoveList = arrayvec::ArrayVec<Move, MAX_NUM_MOVES>;

/// An alias for an [`arrayvec::ArrayVec`] holding the destinations of a single piece.
pub type SquareList = arrayvec::ArrayVec<Square, MAX_PIECE_MOVES>;

/// A move of a single piece from one square to another.
///
/// Captures are implied by the destination being occupied; there are no special moves.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Move {
    from: Square,
    to: Square,
}

impl Move {
    /// Creates a new [`Move`] from the given squares.
    ///
    /// # Example
    /// ```
    /// # use gambit::{Move, Square};
    /// let mv = Move::new(Square::E2, Square::E4);
    /// assert_eq!(mv.to_string(), "e2e4");
    /// ```
    #[inline(always)]
    pub const fn new(from: Square, to: Square) -> Self {
        Self { from, to }
    }

    /// Fetches the source [`Square`] of this [`Move`].
    #[inline(always)]
    pub const fn from(&self) -> Square {
        self.from
    }

    /// Fetches the destination [`Square`] of this [`Move`].
    #[inline(always)]
    pub const fn to(&self) -> Square {
        self.to
    }

    /// Parses a [`Move`] from coordinate notation, such as `"e2e4"` or `"e2 e4"`.
    ///
    /// This only checks the syntax. Use [`crate::rules::validate_move`] to check legality.
    ///
    /// # Example
    /// ```
    /// # use gambit::{Move, Square};
    /// let mv = Move::from_uci("g1f3").unwrap();
    /// assert_eq!(mv, Move::new(Square::G1, Square::F3));
    /// assert!(Move::from_uci("g1").is_err());
    /// ```
    pub fn from_uci(uci: &str) -> Result<Self> {
        let uci: String = uci.chars().filter(|c| !c.is_whitespace()).collect();
        if uci.len() != 4 {
            bail!("Move must be two squares, like \"e2e4\". Got {uci:?}");
        }

        let from = uci
            .get(0..2)
            .ok_or(anyhow!("Move str must contain a `from` square. Got {uci:?}"))?;
        let to = uci
            .get(2..4)
            .ok_or(anyhow!("Move str must contain a `to` square. Got {uci:?}"))?;

        Ok(Self::new(from.parse()?, to.parse()?))
    }
}

impl FromStr for Move {
    type Err = anyhow::Error;
    /// Wrapper for [`Move::from_uci`].
    #[inline(always)]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_uci(s)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}
