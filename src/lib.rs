/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

/// Squares, pieces, moves, and the board they live on.
mod board;

/// Command-line arguments and the interactive console.
mod cli;

/// Coordinates a game between a human and the computer.
mod engine;

/// Errors reported by game operations.
mod error;

/// Evaluation of chess positions.
pub mod eval;

/// Move legality, check detection, and game status.
pub mod rules;

/// Centipawn scores.
mod score;

/// Main engine logic; all search related code.
pub mod search;

pub use board::*;
pub use cli::*;
pub use engine::*;
pub use error::*;
pub use eval::Evaluator;
pub use rules::GameStatus;
pub use score::*;
pub use search::{Search, SearchConfig, SearchResult, DEFAULT_DEPTH, MAX_DEPTH};
