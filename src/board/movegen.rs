/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use super::{Board, Color, Piece, PieceKind, Square, SquareList};

/// Rook directions, in generation order: north, east, south, west.
const ORTHOGONAL: [(i8, i8); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];

/// Bishop directions, in generation order: north-east, south-east, south-west, north-west.
const DIAGONAL: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, -1), (-1, 1)];

/// Queen directions: every rook ray, then every bishop ray.
const QUEEN_RAYS: [(i8, i8); 8] = [
    ORTHOGONAL[0],
    ORTHOGONAL[1],
    ORTHOGONAL[2],
    ORTHOGONAL[3],
    DIAGONAL[0],
    DIAGONAL[1],
    DIAGONAL[2],
    DIAGONAL[3],
];

/// The eight L-shaped jumps of a Knight.
const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

/// The eight neighbours of a King.
const KING_OFFSETS: [(i8, i8); 8] = [
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];

/// Generates the candidate destinations of `piece` standing on `from`.
///
/// A candidate is any square the piece may reach by its own geometry and the blocking rules:
/// it is on the board, and it is either empty or holds an enemy piece (a capture).
/// Whether the move would leave the mover's own King in check is *not* considered here.
///
/// The order of the returned squares is fixed for a given board, which keeps search deterministic:
/// * Pawns: single push, double push, then captures toward the a-file before the h-file.
/// * Sliders: one ray at a time (orthogonal rays before diagonal ones for a Queen), nearest square first.
/// * Knights and Kings: a fixed clockwise order of offsets.
pub fn candidate_moves(piece: Piece, board: &Board, from: Square) -> SquareList {
    let mut moves = SquareList::new();
    let color = piece.color();

    match piece.kind() {
        PieceKind::Pawn => pawn_moves(board, from, color, &mut moves),
        PieceKind::Knight => leaper_moves(board, from, color, &KNIGHT_OFFSETS, &mut moves),
        PieceKind::Bishop => slider_moves(board, from, color, &DIAGONAL, &mut moves),
        PieceKind::Rook => slider_moves(board, from, color, &ORTHOGONAL, &mut moves),
        PieceKind::Queen => slider_moves(board, from, color, &QUEEN_RAYS, &mut moves),
        PieceKind::King => leaper_moves(board, from, color, &KING_OFFSETS, &mut moves),
    }

    moves
}

/// Generates every square `piece` on `from` attacks or defends.
///
/// Unlike [`candidate_moves`], squares holding friendly pieces are included (they are defended),
/// and a Pawn covers both forward diagonals whether or not anything stands there.
/// Pawn pushes are never included, since a push cannot capture.
pub fn attacks(piece: Piece, board: &Board, from: Square) -> SquareList {
    let mut attacked = SquareList::new();

    let leaps = |offsets: &[(i8, i8)], attacked: &mut SquareList| {
        attacked.extend(offsets.iter().filter_map(|&(df, dr)| from.offset(df, dr)));
    };

    match piece.kind() {
        PieceKind::Pawn => {
            let dr = piece.color().forward();
            leaps(&[(-1, dr), (1, dr)], &mut attacked);
        }
        PieceKind::Knight => leaps(&KNIGHT_OFFSETS, &mut attacked),
        PieceKind::King => leaps(&KING_OFFSETS, &mut attacked),
        kind => {
            let rays: &[(i8, i8)] = match kind {
                PieceKind::Bishop => &DIAGONAL,
                PieceKind::Rook => &ORTHOGONAL,
                _ => &QUEEN_RAYS,
            };

            for &(df, dr) in rays {
                let mut current = from;
                while let Some(to) = current.offset(df, dr) {
                    attacked.push(to);
                    if board.has(to) {
                        break;
                    }
                    current = to;
                }
            }
        }
    }

    attacked
}

/// Returns `true` if any piece of color `by` attacks `target`.
///
/// Scans outward from `target` instead of generating every enemy move.
/// When `target` holds a piece of `by`'s opponent (such as a King), this agrees exactly with
/// "some piece of `by` has `target` among its [`candidate_moves`]".
pub fn is_attacked(board: &Board, target: Square, by: Color) -> bool {
    let holds = |square: Option<Square>, kind: PieceKind| {
        square.and_then(|sq| board.piece_at(sq)) == Some(Piece::new(by, kind))
    };

    // A pawn of `by` attacks from one rank "behind" the target, relative to its direction of travel
    let behind = -by.forward();
    if holds(target.offset(-1, behind), PieceKind::Pawn)
        || holds(target.offset(1, behind), PieceKind::Pawn)
    {
        return true;
    }

    if KNIGHT_OFFSETS
        .iter()
        .any(|&(df, dr)| holds(target.offset(df, dr), PieceKind::Knight))
    {
        return true;
    }

    if KING_OFFSETS
        .iter()
        .any(|&(df, dr)| holds(target.offset(df, dr), PieceKind::King))
    {
        return true;
    }

    let slider_hits = |rays: &[(i8, i8)], kind: PieceKind| {
        rays.iter().any(|&(df, dr)| {
            let mut current = target;
            while let Some(next) = current.offset(df, dr) {
                if let Some(piece) = board.piece_at(next) {
                    return piece.color() == by
                        && (piece.kind() == kind || piece.kind() == PieceKind::Queen);
                }
                current = next;
            }
            false
        })
    };

    slider_hits(&ORTHOGONAL, PieceKind::Rook) || slider_hits(&DIAGONAL, PieceKind::Bishop)
}

/// Forward pushes from the pawn's starting rank may advance two squares, if both are empty.
/// Diagonal steps are only allowed onto enemy pieces.
fn pawn_moves(board: &Board, from: Square, color: Color, moves: &mut SquareList) {
    let dr = color.forward();

    if let Some(single) = from.offset(0, dr) {
        if !board.has(single) {
            moves.push(single);

            if from.relative_rank(color) == 1 {
                if let Some(double) = single.offset(0, dr) {
                    if !board.has(double) {
                        moves.push(double);
                    }
                }
            }
        }
    }

    for df in [-1, 1] {
        if let Some(to) = from.offset(df, dr) {
            if board.color_at(to) == Some(color.opponent()) {
                moves.push(to);
            }
        }
    }
}

fn leaper_moves(
    board: &Board,
    from: Square,
    color: Color,
    offsets: &[(i8, i8)],
    moves: &mut SquareList,
) {
    for &(df, dr) in offsets {
        if let Some(to) = from.offset(df, dr) {
            if board.color_at(to) != Some(color) {
                moves.push(to);
            }
        }
    }
}

fn slider_moves(
    board: &Board,
    from: Square,
    color: Color,
    rays: &[(i8, i8)],
    moves: &mut SquareList,
) {
    for &(df, dr) in rays {
        let mut current = from;
        while let Some(to) = current.offset(df, dr) {
            match board.color_at(to) {
                None => moves.push(to),
                Some(blocker) => {
                    // Captures end the ray; friendly pieces end it one square earlier
                    if blocker != color {
                        moves.push(to);
                    }
                    break;
                }
            }
            current = to;
        }
    }
}
