/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{
    fmt,
    ops::{Index, IndexMut},
    str::FromStr,
};

use anyhow::{bail, Result};

use super::Color;

/// Manhattan distance of a square from the center of the board.
///
/// Fetched from <https://www.chessprogramming.org/Center_Distance>
#[rustfmt::skip]
const CENTER_DIST_MANHATTAN: [u8; Square::COUNT] = [
  6, 5, 4, 3, 3, 4, 5, 6,
  5, 4, 3, 2, 2, 3, 4, 5,
  4, 3, 2, 1, 1, 2, 3, 4,
  3, 2, 1, 0, 0, 1, 2, 3,
  3, 2, 1, 0, 0, 1, 2, 3,
  4, 3, 2, 1, 1, 2, 3, 4,
  5, 4, 3, 2, 2, 3, 4, 5,
  6, 5, 4, 3, 3, 4, 5, 6
];

/// Represents a single square on an `8x8` chess board.
///
/// Squares are indexed with least-significant file mapping, so `square = file + rank * 8`:
/// ```text
/// 8| 56 57 58 59 60 61 62 63
/// 7| 48 49 50 51 52 53 54 55
/// 6| 40 41 42 43 44 45 46 47
/// 5| 32 33 34 35 36 37 38 39
/// 4| 24 25 26 27 28 29 30 31
/// 3| 16 17 18 19 20 21 22 23
/// 2|  8  9 10 11 12 13 14 15
/// 1|  0  1  2  3  4  5  6  7
///  +------------------------
///    a  b  c  d  e  f  g  h
/// ```
///
/// A [`Square`] can only ever hold an on-board coordinate.
/// Anything outside the board is rejected when the square is constructed.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[repr(transparent)]
pub struct Square(u8);

impl Square {
    pub const A1: Self = Self::new(0, 0);
    pub const A2: Self = Self::new(0, 1);
    pub const A3: Self = Self::new(0, 2);
    pub const A4: Self = Self::new(0, 3);
    pub const A5: Self = Self::new(0, 4);
    pub const A6: Self = Self::new(0, 5);
    pub const A7: Self = Self::new(0, 6);
    pub const A8: Self = Self::new(0, 7);

    pub const B1: Self = Self::new(1, 0);
    pub const B2: Self = Self::new(1, 1);
    pub const B3: Self = Self::new(1, 2);
    pub const B4: Self = Self::new(1, 3);
    pub const B5: Self = Self::new(1, 4);
    pub const B6: Self = Self::new(1, 5);
    pub const B7: Self = Self::new(1, 6);
    pub const B8: Self = Self::new(1, 7);

    pub const C1: Self = Self::new(2, 0);
    pub const C2: Self = Self::new(2, 1);
    pub const C3: Self = Self::new(2, 2);
    pub const C4: Self = Self::new(2, 3);
    pub const C5: Self = Self::new(2, 4);
    pub const C6: Self = Self::new(2, 5);
    pub const C7: Self = Self::new(2, 6);
    pub const C8: Self = Self::new(2, 7);

    pub const D1: Self = Self::new(3, 0);
    pub const D2: Self = Self::new(3, 1);
    pub const D3: Self = Self::new(3, 2);
    pub const D4: Self = Self::new(3, 3);
    pub const D5: Self = Self::new(3, 4);
    pub const D6: Self = Self::new(3, 5);
    pub const D7: Self = Self::new(3, 6);
    pub const D8: Self = Self::new(3, 7);

    pub const E1: Self = Self::new(4, 0);
    pub const E2: Self = Self::new(4, 1);
    pub const E3: Self = Self::new(4, 2);
    pub const E4: Self = Self::new(4, 3);
    pub const E5: Self = Self::new(4, 4);
    pub const E6: Self = Self::new(4, 5);
    pub const E7: Self = Self::new(4, 6);
    pub const E8: Self = Self::new(4, 7);

    pub const F1: Self = Self::new(5, 0);
    pub const F2: Self = Self::new(5, 1);
    pub const F3: Self = Self::new(5, 2);
    pub const F4: Self = Self::new(5, 3);
    pub const F5: Self = Self::new(5, 4);
    pub const F6: Self = Self::new(5, 5);
    pub const F7: Self = Self::new(5, 6);
    pub const F8: Self = Self::new(5, 7);

    pub const G1: Self = Self::new(6, 0);
    pub const G2: Self = Self::new(6, 1);
    pub const G3: Self = Self::new(6, 2);
    pub const G4: Self = Self::new(6, 3);
    pub const G5: Self = Self::new(6, 4);
    pub const G6: Self = Self::new(6, 5);
    pub const G7: Self = Self::new(6, 6);
    pub const G8: Self = Self::new(6, 7);

    pub const H1: Self = Self::new(7, 0);
    pub const H2: Self = Self::new(7, 1);
    pub const H3: Self = Self::new(7, 2);
    pub const H4: Self = Self::new(7, 3);
    pub const H5: Self = Self::new(7, 4);
    pub const H6: Self = Self::new(7, 5);
    pub const H7: Self = Self::new(7, 6);
    pub const H8: Self = Self::new(7, 7);
    pub const MIN: u8 = 0;
    pub const MAX: u8 = 63;
    pub const COUNT: usize = 64;

    /// Returns an iterator over all squares in scan order: `a1, b1, ..., h1, a2, ..., h8`.
    ///
    /// # Example
    /// ```
    /// # use gambit::Square;
    /// let mut iter = Square::iter();
    /// assert_eq!(iter.len(), 64);
    /// assert_eq!(iter.next().unwrap(), Square::A1);
    /// assert_eq!(iter.last().unwrap(), Square::H8);
    /// ```
    #[inline(always)]
    pub fn iter() -> impl ExactSizeIterator<Item = Self> + DoubleEndedIterator<Item = Self> {
        (Self::MIN..=Self::MAX).map(Self)
    }

    /// Creates a new [`Square`] from a file and rank, both in `[0, 7]`.
    ///
    /// Only used for constants; see [`Square::from_coords`] for a checked constructor.
    #[inline(always)]
    const fn new(file: u8, rank: u8) -> Self {
        Self(file | rank << 3)
    }

    /// Creates a new [`Square`] from a (possibly off-board) file and rank.
    ///
    /// Returns `None` if either coordinate lies outside `[0, 7]`.
    ///
    /// # Example
    /// ```
    /// # use gambit::Square;
    /// assert_eq!(Square::from_coords(2, 3), Some(Square::C4));
    /// assert_eq!(Square::from_coords(8, 0), None);
    /// assert_eq!(Square::from_coords(0, -1), None);
    /// ```
    #[inline(always)]
    pub const fn from_coords(file: i8, rank: i8) -> Option<Self> {
        if file >= 0 && file < 8 && rank >= 0 && rank < 8 {
            Some(Self::new(file as u8, rank as u8))
        } else {
            None
        }
    }

    /// Creates a new [`Square`] from the provided index value.
    ///
    /// The provided `index` must be `[0, 63]` or else an error is returned.
    #[inline(always)]
    pub fn from_index(index: usize) -> Result<Self> {
        if index > Self::MAX as usize {
            bail!(
                "Invalid index for Square: Must be between [{}, {}]. Got {index}",
                Self::MIN,
                Self::MAX
            );
        }
        Ok(Self(index as u8))
    }

    /// Creates a [`Square`] from a string in algebraic notation, such as `"e4"`.
    ///
    /// # Example
    /// ```
    /// # use gambit::Square;
    /// assert_eq!(Square::from_uci("e4").unwrap(), Square::E4);
    /// assert!(Square::from_uci("i9").is_err());
    /// ```
    pub fn from_uci(square: &str) -> Result<Self> {
        let mut chars = square.trim().chars();
        let (Some(file), Some(rank), None) = (chars.next(), chars.next(), chars.next()) else {
            bail!("Square must be a file and a rank, like \"e4\". Got {square:?}");
        };

        let file = file.to_ascii_lowercase();
        if !('a'..='h').contains(&file) {
            bail!("Invalid file {file:?} in square {square:?}: must be between [a, h]");
        }
        if !('1'..='8').contains(&rank) {
            bail!("Invalid rank {rank:?} in square {square:?}: must be between [1, 8]");
        }

        Ok(Self::new(file as u8 - b'a', rank as u8 - b'1'))
    }

    /// Converts this [`Square`] to algebraic notation, such as `"e4"`.
    #[inline(always)]
    pub fn to_uci(&self) -> String {
        format!("{}{}", self.file_char(), self.rank() + 1)
    }

    /// Fetches the file of this [`Square`], in `[0, 7]` where `0` is the a-file.
    #[inline(always)]
    pub const fn file(&self) -> u8 {
        self.0 & 0b0000_0111
    }

    /// Fetches the rank of this [`Square`], in `[0, 7]` where `0` is the first rank.
    #[inline(always)]
    pub const fn rank(&self) -> u8 {
        self.0 >> 3
    }

    /// Fetches the lowercase letter of this [`Square`]'s file.
    #[inline(always)]
    pub const fn file_char(&self) -> char {
        (b'a' + self.file()) as char
    }

    /// Fetches the inner index value of the [`Square`], casted to a [`usize`].
    ///
    /// Useful when using a [`Square`] to index into things.
    #[inline(always)]
    pub const fn index(&self) -> usize {
        self.0 as usize
    }

    /// Returns the square `df` files and `dr` ranks away from this one, if it is on the board.
    ///
    /// # Example
    /// ```
    /// # use gambit::Square;
    /// assert_eq!(Square::B1.offset(1, 2), Some(Square::C3));
    /// assert_eq!(Square::H8.offset(1, 0), None);
    /// ```
    #[inline(always)]
    pub const fn offset(&self, df: i8, dr: i8) -> Option<Self> {
        Self::from_coords(self.file() as i8 + df, self.rank() as i8 + dr)
    }

    /// Returns the rank of this square as seen from `color`'s side of the board.
    ///
    /// White's first rank and Black's eighth rank are both `0`.
    #[inline(always)]
    pub const fn relative_rank(&self, color: Color) -> u8 {
        match color {
            Color::White => self.rank(),
            Color::Black => 7 - self.rank(),
        }
    }

    /// Manhattan distance from this square to the four center squares.
    #[inline(always)]
    pub const fn center_distance(&self) -> u8 {
        CENTER_DIST_MANHATTAN[self.index()]
    }
}

impl FromStr for Square {
    type Err = anyhow::Error;
    /// Wrapper from [`Square::from_uci`].
    #[inline(always)]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_uci(s)
    }
}

impl TryFrom<&str> for Square {
    type Error = anyhow::Error;
    /// Wrapper from [`Square::from_uci`].
    #[inline(always)]
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::from_uci(value)
    }
}

impl TryFrom<usize> for Square {
    type Error = anyhow::Error;
    /// Wrapper from [`Square::from_index`].
    #[inline(always)]
    fn try_from(value: usize) -> Result<Self, Self::Error> {
        Self::from_index(value)
    }
}

impl<T> Index<Square> for [T; Square::COUNT] {
    type Output = T;
    /// A [`Square`] can be used to index into an array of 64 elements.
    #[inline(always)]
    fn index(&self, index: Square) -> &Self::Output {
        &self[index.index()]
    }
}

impl<T> IndexMut<Square> for [T; Square::COUNT] {
    /// A [`Square`] can be used to mutably index into an array of 64 elements.
    #[inline(always)]
    fn index_mut(&mut self, index: Square) -> &mut Self::Output {
        &mut self[index.index()]
    }
}

impl fmt::Display for Square {
    /// Calls [`Square::to_uci`].
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.to_uci().fmt(f)
    }
}

impl fmt::Debug for Square {
    /// Calls [`Square::to_uci`] and also displays the internal decimal value.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.to_uci(), self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_squares() {
        // Test the four corners
        assert_eq!(Square::from_coords(0, 0).unwrap().to_string(), "a1");
        assert_eq!(Square::from_coords(7, 0).unwrap().to_string(), "h1");
        assert_eq!(Square::from_coords(0, 7).unwrap().to_string(), "a8");
        assert_eq!(Square::from_coords(7, 7).unwrap().to_string(), "h8");

        // And some arbitrary location near the middle
        assert_eq!(Square::from_coords(3, 3).unwrap().to_string(), "d4");
        assert_eq!(Square::D4.index(), 27);
    }

    #[test]
    fn test_parsing() {
        assert_eq!(Square::try_from("a1").unwrap(), Square::A1);
        assert_eq!(Square::try_from(0usize).unwrap(), Square::A1);
        assert_eq!(Square::try_from("h8").unwrap(), Square::H8);
        assert_eq!(Square::try_from(63usize).unwrap(), Square::H8);
        assert_eq!(Square::try_from("D4").unwrap(), Square::D4);

        assert!(Square::try_from("a").is_err());
        assert!(Square::try_from("1").is_err());
        assert!(Square::try_from("").is_err());
        assert!(Square::try_from("a9").is_err());
        assert!(Square::try_from("i1").is_err());
        assert!(Square::try_from("a10").is_err());
        assert!(Square::try_from(64usize).is_err());
    }

    #[test]
    fn test_offsets() {
        assert_eq!(Square::E2.offset(0, 2), Some(Square::E4));
        assert_eq!(Square::A1.offset(-1, 0), None);
        assert_eq!(Square::H4.offset(1, 1), None);
        assert_eq!(Square::G1.offset(-1, 2), Some(Square::F3));
    }

    #[test]
    fn test_relative_rank() {
        assert_eq!(Square::E2.relative_rank(Color::White), 1);
        assert_eq!(Square::E7.relative_rank(Color::Black), 1);
        assert_eq!(Square::A8.relative_rank(Color::Black), 0);
    }

    #[test]
    fn test_indexing() {
        let mut board = [0; 64];
        board[Square::D5] = u8::MAX;
        assert_eq!(board[35], u8::MAX);
    }
}
