/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;

use crate::{attacks, is_attacked, Board, Color, Piece, PieceKind, Score, Square, State};

/// Penalty for a King that has left its home rank.
const KING_OFF_HOME_RANK: i32 = 30;

/// Penalty for each of the three squares in front of the King not holding a friendly Pawn.
const MISSING_SHIELD_PAWN: i32 = 10;

/// Penalty for each square next to the King that the opponent attacks.
const ATTACKED_KING_NEIGHBOUR: i32 = 5;

/// Bonus for each non-King piece defended by a friendly piece.
const DEFENDED_PIECE: i32 = 5;

/// Bonus per step closer to the center, for Knights, Bishops, and Queens.
const CENTRALIZATION: i32 = 4;

/// Bonus per rank a Pawn has advanced from its starting rank.
const PAWN_ADVANCEMENT: i32 = 5;

/// Bonus for a Pawn on one of the four center squares.
const CENTER_PAWN: i32 = 20;

/// Scores of each evaluation term, for one side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Terms {
    pub material: Score,
    pub king_safety: Score,
    pub protection: Score,
    pub positional: Score,
}

impl Terms {
    /// Sum of all terms.
    #[inline(always)]
    pub fn total(&self) -> Score {
        self.material + self.king_safety + self.protection + self.positional
    }
}

impl std::ops::Sub for Terms {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        Self {
            material: self.material - rhs.material,
            king_safety: self.king_safety - rhs.king_safety,
            protection: self.protection - rhs.protection,
            positional: self.positional - rhs.positional,
        }
    }
}

/// Encapsulates the logic of scoring a chess position.
///
/// Every term is computed for both sides and differenced, so an evaluation from White's
/// perspective is always the exact negation of the evaluation from Black's perspective.
///
/// During a negamax search, positions are evaluated from the side-to-move's perspective.
/// That is, if it is Black's turn, a "good" evaluation for Black will be a positive number.
#[derive(Debug, Clone, Copy)]
pub struct Evaluator<'a> {
    /// The state whose position to evaluate.
    state: &'a State,
}

impl<'a> Evaluator<'a> {
    /// Construct a new [`Evaluator`].
    #[inline(always)]
    pub fn new(state: &'a State) -> Self {
        Self { state }
    }

    /// Evaluate this position from the side-to-move's perspective.
    ///
    /// A positive/high number is good for the side-to-move, while a negative number is better for the opponent.
    /// A score of 0 is considered equal.
    #[inline(always)]
    pub fn eval(self) -> Score {
        self.eval_for(self.state.turn())
    }

    /// Evaluate this position from `color`'s perspective.
    ///
    /// A positive/high number is good for the `color`, while a negative number is better for the opponent.
    /// A score of 0 is considered equal.
    #[inline(always)]
    pub fn eval_for(&self, color: Color) -> Score {
        self.breakdown(color).total()
    }

    /// Computes every term from `color`'s perspective.
    pub fn breakdown(&self, color: Color) -> Terms {
        self.terms_of(color) - self.terms_of(color.opponent())
    }

    /// Computes the raw terms of `color`'s pieces, without looking at the opponent's.
    fn terms_of(&self, color: Color) -> Terms {
        let board = self.state.board();

        let mut terms = Terms {
            king_safety: king_safety(board, color),
            ..Default::default()
        };

        for (square, piece) in board.pieces(color) {
            terms.material += value_of(piece.kind());
            terms.positional += placement(piece, square);

            if !piece.is_king() && is_attacked(board, square, color) {
                terms.protection += DEFENDED_PIECE;
            }
        }

        terms
    }
}

impl fmt::Display for Evaluator<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let white = self.terms_of(Color::White);
        let black = self.terms_of(Color::Black);
        let net = white - black;

        let rows = [
            ("Material", white.material, black.material, net.material),
            ("King safety", white.king_safety, black.king_safety, net.king_safety),
            ("Protection", white.protection, black.protection, net.protection),
            ("Positional", white.positional, black.positional, net.positional),
            ("Total", white.total(), black.total(), net.total()),
        ];

        writeln!(f, "{:<12}|{:>8} |{:>8} |{:>8}", "Term", "White", "Black", "Net")?;
        writeln!(f, "{:-<12}+{:-<9}+{:-<9}+{:-<9}", "", "", "", "")?;
        for (name, w, b, n) in rows {
            writeln!(
                f,
                "{name:<12}|{:>8.2} |{:>8.2} |{:>+8.2}",
                w.pawns(),
                b.pawns(),
                n.pawns()
            )?;
        }

        let score = self.eval();
        let turn = self.state.turn();
        let winning_side = if score > Score::DRAW {
            Some(turn)
        } else if score < Score::DRAW {
            Some(turn.opponent())
        } else {
            None
        };

        writeln!(
            f,
            "\nWinning side: {}",
            winning_side.map(|c| c.name()).unwrap_or("N/A")
        )?;
        write!(f, "Score ({turn} to move): {score}")
    }
}

/// Scores `state` from `perspective`'s point of view. Higher is better for `perspective`.
///
/// # Example
/// ```
/// # use gambit::{eval::evaluate, Color, Score, State};
/// let state = State::standard();
/// assert_eq!(evaluate(&state, Color::White), Score::DRAW);
///
/// // White is a Queen up
/// let state = State::from_fen("4k3/8/8/8/8/8/8/3QK3 w").unwrap();
/// assert!(evaluate(&state, Color::White) > 0);
/// assert_eq!(evaluate(&state, Color::Black), -evaluate(&state, Color::White));
/// ```
#[inline(always)]
pub fn evaluate(state: &State, perspective: Color) -> Score {
    Evaluator::new(state).eval_for(perspective)
}

/// Returns a value of the provided `PieceKind`, in centipawns.
#[inline(always)]
pub const fn value_of(kind: PieceKind) -> i32 {
    match kind {
        PieceKind::Pawn => 100,
        PieceKind::Knight => 300,
        PieceKind::Bishop => 300,
        PieceKind::Rook => 500,
        PieceKind::Queen => 900,
        PieceKind::King => 0, // King is invaluable, but 0 is easier to work with in computations
    }
}

/// Bonus for where a piece stands.
#[inline(always)]
fn placement(piece: Piece, square: Square) -> i32 {
    // Center distance is in [0, 6]
    let centrality = 6 - square.center_distance() as i32;

    match piece.kind() {
        PieceKind::Knight | PieceKind::Bishop | PieceKind::Queen => centrality * CENTRALIZATION,
        PieceKind::Pawn => {
            let advanced = square.relative_rank(piece.color()) as i32 - 1;
            let center = if square.center_distance() == 0 {
                CENTER_PAWN
            } else {
                0
            };
            advanced * PAWN_ADVANCEMENT + center
        }
        PieceKind::Rook | PieceKind::King => 0,
    }
}

/// Penalties for an exposed King. Always zero or negative.
fn king_safety(board: &Board, color: Color) -> Score {
    let Some(king) = board.king_square(color) else {
        return Score::DRAW;
    };

    let mut penalty = 0;

    if king.relative_rank(color) != 0 {
        penalty += KING_OFF_HOME_RANK;
    }

    let shield = Piece::new(color, PieceKind::Pawn);
    for df in [-1, 0, 1] {
        if let Some(square) = king.offset(df, color.forward()) {
            if board.piece_at(square) != Some(shield) {
                penalty += MISSING_SHIELD_PAWN;
            }
        }
    }

    let neighbours = attacks(Piece::new(color, PieceKind::King), board, king);
    let opponent = color.opponent();
    penalty += neighbours
        .into_iter()
        .filter(|&square| is_attacked(board, square, opponent))
        .count() as i32
        * ATTACKED_KING_NEIGHBOUR;

    Score(-penalty)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval_fen(fen: &str, color: Color) -> Score {
        evaluate(&State::from_fen(fen).unwrap(), color)
    }

    #[test]
    fn test_startpos_is_balanced() {
        let state = State::standard();
        assert_eq!(Evaluator::new(&state).eval(), Score::DRAW);
        assert_eq!(
            Evaluator::new(&state).breakdown(Color::White),
            Terms::default()
        );
    }

    #[test]
    fn test_antisymmetry() {
        let fens = [
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b",
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w",
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w",
            "4k3/8/8/8/8/8/8/4K3 b",
        ];

        for fen in fens {
            assert_eq!(
                eval_fen(fen, Color::White),
                -eval_fen(fen, Color::Black),
                "evaluation is not antisymmetric for {fen}"
            );
        }
    }

    #[test]
    fn test_material_sign() {
        // White has an extra Rook
        let fen = "4k3/pppppppp/8/8/8/8/PPPPPPPP/R3K3 w";
        let breakdown = Evaluator::new(&State::from_fen(fen).unwrap()).breakdown(Color::White);
        assert_eq!(breakdown.material, Score(500));
        assert!(eval_fen(fen, Color::White) > 0);
        assert!(eval_fen(fen, Color::Black) < 0);
    }

    #[test]
    fn test_material_values() {
        assert_eq!(value_of(PieceKind::Pawn), 100);
        assert_eq!(value_of(PieceKind::Knight), value_of(PieceKind::Bishop));
        assert_eq!(value_of(PieceKind::Queen), 9 * value_of(PieceKind::Pawn));
        assert_eq!(value_of(PieceKind::King), 0);
    }

    #[test]
    fn test_exposed_king_is_penalized() {
        let home = State::from_fen("4k3/8/8/8/8/8/3PPP2/4K3 w").unwrap();
        let walked = State::from_fen("4k3/8/8/8/8/4K3/3PPP2/8 w").unwrap();

        let home = king_safety(home.board(), Color::White);
        let walked = king_safety(walked.board(), Color::White);
        assert_eq!(home, Score::DRAW);
        assert!(walked < home);
    }

    #[test]
    fn test_attacked_king_neighbourhood() {
        // Black rook on the second rank covers d2, e2 and f2
        let board = Board::from_fen("4k3/8/8/8/8/8/r7/4K3").unwrap();
        let safety = king_safety(&board, Color::White);
        assert_eq!(
            safety,
            Score(-(3 * MISSING_SHIELD_PAWN + 3 * ATTACKED_KING_NEIGHBOUR))
        );
    }

    #[test]
    fn test_defended_pieces() {
        let defended = State::from_fen("4k3/8/8/8/8/3N4/4P3/4K3 w").unwrap();
        let loose = State::from_fen("4k3/8/8/8/8/8/N3P3/4K3 w").unwrap();

        let defended = Evaluator::new(&defended).breakdown(Color::White);
        let loose = Evaluator::new(&loose).breakdown(Color::White);
        assert!(defended.protection > loose.protection);
    }

    #[test]
    fn test_centralization() {
        assert!(placement(Piece::WHITE_KNIGHT, Square::D4) > placement(Piece::WHITE_KNIGHT, Square::A1));
        assert!(placement(Piece::WHITE_PAWN, Square::E4) > placement(Piece::WHITE_PAWN, Square::E2));
        assert!(placement(Piece::BLACK_PAWN, Square::E5) > placement(Piece::BLACK_PAWN, Square::E7));
        assert_eq!(placement(Piece::WHITE_PAWN, Square::A2), 0);
    }

    #[test]
    fn test_display_breakdown() {
        let state = State::standard();
        let pretty = Evaluator::new(&state).to_string();
        assert!(pretty.contains("Material"));
        assert!(pretty.contains("Winning side: N/A"));
    }
}
