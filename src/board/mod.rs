/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

/// Per-piece move geometry and attack detection.
mod movegen;

/// A single move from one square to another.
mod moves;

/// Colors, piece kinds, and pieces.
mod piece;

/// The `8x8` grid of pieces.
mod position;

/// Squares of the board and their coordinates.
mod square;

/// A board plus the side to move.
mod state;

pub use movegen::*;
pub use moves::*;
pub use piece::*;
pub use position::*;
pub use square::*;
pub use state::*;
