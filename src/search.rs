/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use tracing::{debug, trace};

use crate::{
    eval::evaluate,
    rules::{is_in_check, legal_moves, status},
    GameError, GameResult, Move, Score, State,
};

/// Maximum depth that can be searched
pub const MAX_DEPTH: usize = 255;

/// Depth used when none is configured.
pub const DEFAULT_DEPTH: usize = 4;

/// The result of a search, containing the best move found, score, and total nodes searched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SearchResult {
    /// Number of nodes searched.
    pub nodes: u64,

    /// Best move found during the search.
    pub bestmove: Option<Move>,

    /// Evaluation of the position after `bestmove` is made, from the mover's perspective.
    pub score: Score,

    /// Depth the search was run to.
    pub depth: usize,
}

impl Default for SearchResult {
    /// A default search result should initialize to a *very bad* value,
    /// since there isn't a move to play.
    #[inline(always)]
    fn default() -> Self {
        Self {
            nodes: 0,
            bestmove: None,
            score: -Score::INF,
            depth: 0,
        }
    }
}

/// Configuration variables for executing a [`Search`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    /// Depth to execute the search to, in plies.
    ///
    /// Always at least 1, so that a move is chosen, and at most [`MAX_DEPTH`].
    pub depth: usize,

    /// Whether to prune with an alpha-beta window.
    ///
    /// Turning this off runs plain minimax. Both choose the same move with the same score;
    /// pruning only changes how many nodes are visited.
    pub alpha_beta: bool,
}

impl SearchConfig {
    /// A pruned search to the provided depth.
    #[inline(always)]
    pub const fn with_depth(depth: usize) -> Self {
        Self {
            depth,
            alpha_beta: true,
        }
    }

    /// The depth that will actually be searched, clamped to `[1, MAX_DEPTH]`.
    #[inline(always)]
    pub fn effective_depth(&self) -> usize {
        self.depth.clamp(1, MAX_DEPTH)
    }
}

impl Default for SearchConfig {
    #[inline(always)]
    fn default() -> Self {
        Self::with_depth(DEFAULT_DEPTH)
    }
}

/// Executes a fixed-depth [negamax](https://www.chessprogramming.org/Negamax) search.
///
/// The search only ever reads the [`State`] it is given and explores copies of it,
/// so it cannot disturb a game in progress.
#[derive(Debug, Clone)]
pub struct Search {
    /// Configuration variables for this instance of the search.
    config: SearchConfig,

    /// Nodes visited so far.
    nodes: u64,
}

impl Search {
    /// Construct a new [`Search`] with the provided configuration.
    #[inline(always)]
    pub fn new(config: SearchConfig) -> Self {
        Self { config, nodes: 0 }
    }

    /// Searches `state` and returns the best move for the side to move.
    ///
    /// If several moves share the best score, the one generated first wins, so the same
    /// position and depth always produce the same move.
    ///
    /// Returns [`GameError::NoLegalMoves`] if the side to move is checkmated or stalemated.
    ///
    /// # Example
    /// ```
    /// # use gambit::{Search, SearchConfig, State};
    /// let state = State::standard();
    /// let res = Search::new(SearchConfig::with_depth(2)).best_move(&state).unwrap();
    /// assert!(res.bestmove.is_some());
    /// ```
    pub fn best_move(&mut self, state: &State) -> GameResult<SearchResult> {
        self.nodes = 1;
        let depth = self.config.effective_depth();

        let moves = legal_moves(state);
        if moves.is_empty() {
            return Err(GameError::NoLegalMoves {
                side: state.turn(),
                status: status(state),
            });
        }

        let mut alpha = -Score::INF;
        let beta = Score::INF;
        let mut res = SearchResult {
            depth,
            ..Default::default()
        };

        for mv in moves {
            let score = -self.negamax(&state.with_move_made(mv), depth - 1, 1, -beta, -alpha);
            trace!(%mv, %score, "root move");

            // Only a strictly better score replaces the current best, so the first of equals is kept
            if score > res.score {
                res.score = score;
                res.bestmove = Some(mv);
            }

            if self.config.alpha_beta {
                alpha = alpha.max(score);
            }
        }

        res.nodes = self.nodes;

        debug!(
            depth,
            nodes = res.nodes,
            score = %res.score,
            bestmove = ?res.bestmove,
            alpha_beta = self.config.alpha_beta,
            "search finished"
        );

        Ok(res)
    }

    /// Primary location of search logic.
    ///
    /// Returns the score of `state` from its side-to-move's perspective.
    /// With pruning enabled, a score at or below `alpha` (or at or above `beta`) is only a bound.
    fn negamax(
        &mut self,
        state: &State,
        depth: usize,
        ply: i32,
        mut alpha: Score,
        beta: Score,
    ) -> Score {
        self.nodes += 1;

        // If we've reached a terminal node, evaluate the position
        if depth == 0 {
            return evaluate(state, state.turn());
        }

        let moves = legal_moves(state);

        // If there are no legal moves, it's either mate or a draw.
        if moves.is_empty() {
            return if is_in_check(state) {
                // Prefer earlier mates
                -Score::MATE + ply
            } else {
                Score::DRAW
            };
        }

        // Start with a *really bad* initial score
        let mut best = -Score::INF;

        for mv in moves {
            // Copy-make the new position and recurse
            let child = state.with_move_made(mv);
            let score = -self.negamax(&child, depth - 1, ply + 1, -beta, -alpha);

            best = best.max(score);

            if self.config.alpha_beta {
                alpha = alpha.max(score);
                if alpha >= beta {
                    break;
                }
            }
        }

        best
    }
}

/// Searches `state` to `depth` plies with pruning, returning the chosen move.
///
/// # Example
/// ```
/// # use gambit::{search::best_move, Move, Square, State};
/// // Black's rook is free to take
/// let state = State::from_fen("r3k3/8/8/8/8/8/8/R3K3 w").unwrap();
/// assert_eq!(best_move(&state, 1).unwrap(), Move::new(Square::A1, Square::A8));
/// ```
pub fn best_move(state: &State, depth: usize) -> GameResult<Move> {
    let res = Search::new(SearchConfig::with_depth(depth)).best_move(state)?;

    // A successful search over a non-empty move list always records a move
    res.bestmove.ok_or(GameError::NoLegalMoves {
        side: state.turn(),
        status: status(state),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{rules::is_valid_move, Color, GameStatus, Square};

    fn search(fen: &str, depth: usize, alpha_beta: bool) -> SearchResult {
        let state = State::from_fen(fen).unwrap();
        Search::new(SearchConfig { depth, alpha_beta })
            .best_move(&state)
            .unwrap()
    }

    fn ensure_is_mate_in(fen: &str, depth: usize, moves: i32) {
        let res = search(fen, depth, true);
        assert!(
            res.score.is_mate(),
            "Search on {fen:?} at depth {depth} produced result that is not mate.\nResult: {res:#?}"
        );
        assert_eq!(res.score.moves_to_mate(), moves);
    }

    #[test]
    fn test_default_config() {
        let config = SearchConfig::default();
        assert_eq!(config.depth, 4);
        assert!(config.alpha_beta);
        assert_eq!(SearchConfig::with_depth(0).effective_depth(), 1);
    }

    #[test]
    fn test_mate_in_1() {
        let fen = "6k1/5ppp/8/8/8/8/5PPP/R5K1 w - - 0 1";
        ensure_is_mate_in(fen, 2, 1);
        ensure_is_mate_in(fen, 3, 1);

        let res = search(fen, 2, true);
        assert_eq!(res.bestmove, Some(Move::new(Square::A1, Square::A8)));
        assert_eq!(res.score, Score::MATE - 1);
    }

    #[test]
    fn test_takes_free_piece_at_depth_1() {
        // The King can step to a2 or b2, or take the undefended knight on b1
        let res = search("7k/8/8/8/8/8/8/Kn6 w - - 0 1", 1, true);
        assert_eq!(res.bestmove, Some(Move::new(Square::A1, Square::B1)));
        assert!(res.score > 0);
    }

    #[test]
    fn test_determinism() {
        let fen = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w";
        let first = search(fen, 2, true);
        let second = search(fen, 2, true);
        assert_eq!(first, second);
    }

    #[test]
    fn test_alpha_beta_matches_minimax() {
        let fens = [
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w",
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w",
            "r3k3/8/8/8/8/8/8/R3K3 b",
            "6k1/5ppp/8/8/8/8/5PPP/R5K1 w",
        ];

        for fen in fens {
            for depth in 1..=3 {
                let pruned = search(fen, depth, true);
                let minimax = search(fen, depth, false);

                assert_eq!(pruned.bestmove, minimax.bestmove, "{fen} at depth {depth}");
                assert_eq!(pruned.score, minimax.score, "{fen} at depth {depth}");
                assert!(pruned.nodes <= minimax.nodes, "{fen} at depth {depth}");
            }
        }

        let pruned = search(fens[0], 3, true);
        let minimax = search(fens[0], 3, false);
        assert!(pruned.nodes < minimax.nodes);
    }

    #[test]
    fn test_bestmove_is_legal() {
        let fens = [
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w",
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b",
            "4k3/8/8/8/8/8/8/r3K3 w",
        ];

        for fen in fens {
            let state = State::from_fen(fen).unwrap();
            let mv = best_move(&state, 2).unwrap();
            assert!(is_valid_move(&state, mv.from(), mv.to()), "{mv} on {fen}");
        }
    }

    #[test]
    fn test_search_does_not_touch_state() {
        let state = State::standard();
        let before = state.to_string();
        Search::new(SearchConfig::with_depth(3))
            .best_move(&state)
            .unwrap();
        assert_eq!(state.to_string(), before);
    }

    #[test]
    fn test_no_legal_moves() {
        let mated = State::from_fen("4r2k/8/8/8/8/8/3P1P2/3RKR2 w").unwrap();
        assert_eq!(
            Search::new(SearchConfig::default()).best_move(&mated),
            Err(GameError::NoLegalMoves {
                side: Color::White,
                status: GameStatus::Checkmate {
                    winner: Color::Black
                },
            })
        );

        let stalemated = State::from_fen("7k/5Q2/6K1/8/8/8/8/8 b").unwrap();
        assert_eq!(
            best_move(&stalemated, 2),
            Err(GameError::NoLegalMoves {
                side: Color::Black,
                status: GameStatus::Stalemate,
            })
        );
    }
}
