/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use gambit::{rules::perft, State};

fn test_perft_fen_nodes(depth: usize, fen: &str, expected: u64) {
    let state = State::from_fen(fen).unwrap();
    let res = perft(&state, depth);
    assert_eq!(res, expected, "PERFT({depth}) failed on {fen}");
}

// Counts are only compared at depths where castling, en passant, and promotion cannot occur yet.

#[cfg(test)]
mod startpos_perft {
    use crate::test_perft_fen_nodes;

    const FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w - - 0 1";

    #[test]
    fn test_startpos_perft_1() {
        test_perft_fen_nodes(1, FEN, 20);
    }
    #[test]
    fn test_startpos_perft_2() {
        test_perft_fen_nodes(2, FEN, 400);
    }
    #[test]
    fn test_startpos_perft_3() {
        test_perft_fen_nodes(3, FEN, 8902);
    }
    #[test]
    fn test_startpos_perft_4() {
        test_perft_fen_nodes(4, FEN, 197281);
    }
}

#[cfg(test)]
mod endgame_perft {
    use crate::test_perft_fen_nodes;

    // Position 3 from https://www.chessprogramming.org/Perft_Results
    const FEN: &str = "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1";

    #[test]
    fn test_endgame_perft_1() {
        test_perft_fen_nodes(1, FEN, 14);
    }
    #[test]
    fn test_endgame_perft_2() {
        test_perft_fen_nodes(2, FEN, 191);
    }
}
