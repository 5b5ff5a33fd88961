/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt, str::FromStr};

use anyhow::{bail, Context, Result};

use super::{Color, Piece, PieceKind, Square};

/// FEN string for the standard starting position.
pub const FEN_STARTPOS: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w - - 0 1";

/// An `8x8` grid of optional pieces.
///
/// The board is a plain value: copying it yields a fully independent board,
/// so speculative moves made on a copy can never leak into the original.
/// It enforces nothing beyond "at most one piece per square"; legality is checked a layer up.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    squares: [Option<Piece>; Square::COUNT],
}

impl Board {
    /// Creates a new, empty [`Board`].
    #[inline(always)]
    pub const fn new() -> Self {
        Self {
            squares: [None; Square::COUNT],
        }
    }

    /// Creates a [`Board`] with the standard starting layout.
    pub fn standard() -> Self {
        use PieceKind::*;
        let back_rank = [Rook, Knight, Bishop, Queen, King, Bishop, Knight, Rook];

        let mut board = Self::new();
        for (file, kind) in back_rank.into_iter().enumerate() {
            let file = file as i8;
            for (color, back, front) in [(Color::White, 0, 1), (Color::Black, 7, 6)] {
                // Both coordinates are always on the board here
                if let Some(square) = Square::from_coords(file, back) {
                    board.place(Piece::new(color, kind), square);
                }
                if let Some(square) = Square::from_coords(file, front) {
                    board.place(Piece::new(color, Pawn), square);
                }
            }
        }

        board
    }

    /// Constructs a [`Board`] from the piece placement field of a FEN string.
    ///
    /// Any fields after the placement field are ignored.
    ///
    /// # Example
    /// ```
    /// # use gambit::{Board, Piece, Square};
    /// let board = Board::from_fen("4k3/8/8/8/8/8/8/R3K3").unwrap();
    /// assert_eq!(board.piece_at(Square::A1), Some(Piece::WHITE_ROOK));
    /// assert_eq!(board.piece_at(Square::E8), Some(Piece::BLACK_KING));
    /// ```
    pub fn from_fen(fen: &str) -> Result<Self> {
        let placements = fen
            .split_ascii_whitespace()
            .next()
            .context("FEN string must not be empty")?;

        let ranks = placements.split('/').collect::<Vec<_>>();
        if ranks.len() != 8 {
            bail!(
                "FEN placements must have 8 ranks separated by '/'. Got {}",
                ranks.len()
            );
        }

        let mut board = Self::new();

        // FEN lists rank 8 first
        for (rank_str, rank) in ranks.into_iter().zip((0..8).rev()) {
            let mut file = 0;
            for c in rank_str.chars() {
                if let Some(empty) = c.to_digit(10) {
                    file += empty as i8;
                } else {
                    let piece = Piece::from_char(c)
                        .with_context(|| format!("Invalid piece in FEN rank {rank_str:?}"))?;
                    let square = Square::from_coords(file, rank)
                        .with_context(|| format!("Too many files in FEN rank {rank_str:?}"))?;
                    board.place(piece, square);
                    file += 1;
                }
            }

            if file != 8 {
                bail!("FEN rank {rank_str:?} must span exactly 8 files. Got {file}");
            }
        }

        // Also keeps every position's move count within `MAX_NUM_MOVES`
        for color in Color::all() {
            for kind in PieceKind::all() {
                let count = board.count(Piece::new(color, kind));
                if count > kind.start_count() {
                    bail!(
                        "FEN has {count} {color} {kind} pieces, but at most {} can be on the board",
                        kind.start_count()
                    );
                }
            }
        }

        Ok(board)
    }

    /// Generates the piece placement field of a FEN string for this [`Board`].
    pub fn to_fen(&self) -> String {
        let mut placements = Vec::with_capacity(8);

        for rank in (0..8).rev() {
            let mut rank_str = String::with_capacity(8);
            let mut empty = 0;
            for file in 0..8 {
                match Square::from_coords(file, rank).and_then(|sq| self.piece_at(sq)) {
                    Some(piece) => {
                        if empty > 0 {
                            rank_str += &empty.to_string();
                            empty = 0;
                        }
                        rank_str.push(piece.char());
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                rank_str += &empty.to_string();
            }
            placements.push(rank_str);
        }

        placements.join("/")
    }

    /// Fetches the [`Piece`] at the provided [`Square`], if there is one.
    #[inline(always)]
    pub const fn piece_at(&self, square: Square) -> Option<Piece> {
        self.squares[square.index()]
    }

    /// Fetches the [`Color`] of the piece at the provided [`Square`], if there is one.
    #[inline(always)]
    pub fn color_at(&self, square: Square) -> Option<Color> {
        self.piece_at(square).map(|piece| piece.color())
    }

    /// Returns `true` if there is a piece at the provided [`Square`].
    #[inline(always)]
    pub const fn has(&self, square: Square) -> bool {
        self.squares[square.index()].is_some()
    }

    /// Places `piece` at `square`, returning whatever was there before.
    #[inline(always)]
    pub fn place(&mut self, piece: Piece, square: Square) -> Option<Piece> {
        self.squares[square].replace(piece)
    }

    /// Removes and returns the piece at `square`, if there is one.
    #[inline(always)]
    pub fn take(&mut self, square: Square) -> Option<Piece> {
        self.squares[square].take()
    }

    /// Relocates the piece at `from` to `to`, returning the piece that was captured on `to`, if any.
    ///
    /// No rules are checked. If `from` is empty, nothing happens and `None` is returned.
    ///
    /// # Example
    /// ```
    /// # use gambit::{Board, Piece, Square};
    /// let mut board = Board::from_fen("r7/8/8/8/8/8/8/R7").unwrap();
    /// let captured = board.move_piece(Square::A1, Square::A8);
    /// assert_eq!(captured, Some(Piece::BLACK_ROOK));
    /// assert_eq!(board.piece_at(Square::A8), Some(Piece::WHITE_ROOK));
    /// assert!(board.piece_at(Square::A1).is_none());
    /// ```
    #[inline(always)]
    pub fn move_piece(&mut self, from: Square, to: Square) -> Option<Piece> {
        let piece = self.take(from)?;
        self.place(piece, to)
    }

    /// Finds the square of `color`'s King, if it is on the board.
    pub fn king_square(&self, color: Color) -> Option<Square> {
        let king = Piece::new(color, PieceKind::King);
        self.iter()
            .find_map(|(square, piece)| (piece == king).then_some(square))
    }

    /// Iterates over every occupied square and its piece, in scan order (`a1, b1, ..., h8`).
    pub fn iter(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::iter().filter_map(|square| self.piece_at(square).map(|piece| (square, piece)))
    }

    /// Iterates over every square occupied by `color`, in scan order.
    pub fn pieces(&self, color: Color) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.iter().filter(move |(_, piece)| piece.color() == color)
    }

    /// Counts how many copies of `piece` are on the board.
    pub fn count(&self, piece: Piece) -> usize {
        self.squares.iter().filter(|&&p| p == Some(piece)).count()
    }
}

impl Default for Board {
    /// The standard starting layout.
    #[inline(always)]
    fn default() -> Self {
        Self::standard()
    }
}

impl FromStr for Board {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_fen(s)
    }
}

impl fmt::Display for Board {
    /// Rank-by-rank grid with rank labels on the left and file labels underneath.
    ///
    /// ```text
    /// 8| r n b q k b n r
    /// 7| p p p p p p p p
    /// 6| . . . . . . . .
    /// 5| . . . . . . . .
    /// 4| . . . . . . . .
    /// 3| . . . . . . . .
    /// 2| P P P P P P P P
    /// 1| R N B Q K B N R
    ///  +----------------
    ///    a b c d e f g h
    /// ```
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Allocate just enough capacity
        let mut board = String::with_capacity(198);

        for rank in (0..8).rev() {
            board += &format!("{}|", rank + 1);

            for file in 0..8 {
                let occupant = Square::from_coords(file, rank)
                    .and_then(|square| self.piece_at(square))
                    .map(|piece| piece.char())
                    .unwrap_or('.');

                board.push(' ');
                board.push(occupant);
            }

            board += "\n"
        }
        board += " +";
        for _ in 0..8 {
            board += "--";
        }
        board += "\n  ";
        for file in 'a'..='h' {
            board.push(' ');
            board.push(file);
        }

        write!(f, "{board}")
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_fen())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_layout() {
        let board = Board::default();
        assert_eq!(board.iter().count(), 32);
        assert_eq!(board.count(Piece::WHITE_PAWN), 8);
        assert_eq!(board.count(Piece::BLACK_PAWN), 8);
        assert_eq!(board.piece_at(Square::D1), Some(Piece::WHITE_QUEEN));
        assert_eq!(board.piece_at(Square::E8), Some(Piece::BLACK_KING));
        assert_eq!(board.king_square(Color::White), Some(Square::E1));
        assert_eq!(board.king_square(Color::Black), Some(Square::E8));
        assert_eq!(board, Board::from_fen(FEN_STARTPOS).unwrap());
    }

    #[test]
    fn test_fen_round_trip() {
        let placements = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R";
        assert_eq!(Board::from_fen(placements).unwrap().to_fen(), placements);
    }

    #[test]
    fn test_invalid_fens() {
        assert!(Board::from_fen("").is_err());
        assert!(Board::from_fen("8/8/8/8/8/8/8").is_err());
        assert!(Board::from_fen("9/8/8/8/8/8/8/8").is_err());
        assert!(Board::from_fen("7/8/8/8/8/8/8/8").is_err());
        assert!(Board::from_fen("ppppppppp/8/8/8/8/8/8/8").is_err());
        assert!(Board::from_fen("x7/8/8/8/8/8/8/8").is_err());
    }

    #[test]
    fn test_more_pieces_than_a_side_starts_with() {
        // Nine Queens cannot arise without promotion, and would have more moves than a `MoveList` holds
        assert!(Board::from_fen("Q2Q4/1Q4Q1/4Q3/2Q4R/Q4Q2/3Q4/1Q4Rp/1K1BBNNk").is_err());
        assert!(Board::from_fen("3QQ3/8/8/8/8/8/8/8").is_err());
        assert!(Board::from_fen("8/8/8/8/8/8/8/BBB5").is_err());
        assert!(Board::from_fen("8/8/p7/8/8/8/pppppppp/8").is_err());

        // Fewer pieces than the start are fine, and so are both sides at full strength
        assert!(Board::from_fen("8/8/8/8/8/8/8/2B5").is_ok());
        assert!(Board::from_fen(FEN_STARTPOS).is_ok());
    }

    #[test]
    fn test_copies_are_independent() {
        let original = Board::default();
        let mut copy = original;
        copy.move_piece(Square::E2, Square::E4);

        assert_eq!(original.piece_at(Square::E2), Some(Piece::WHITE_PAWN));
        assert!(original.piece_at(Square::E4).is_none());
        assert_eq!(copy.piece_at(Square::E4), Some(Piece::WHITE_PAWN));
    }

    #[test]
    fn test_move_from_empty_square() {
        let mut board = Board::default();
        let before = board;
        assert_eq!(board.move_piece(Square::E4, Square::E5), None);
        assert_eq!(board, before);
    }

    #[test]
    fn test_display() {
        let expected = "\
8| r n b q k b n r
7| p p p p p p p p
6| . . . . . . . .
5| . . . . . . . .
4| . . . . . . . .
3| . . . . . . . .
2| P P P P P P P P
1| R N B Q K B N R
 +----------------
   a b c d e f g h";
        assert_eq!(Board::default().to_string(), expected);
    }
}
