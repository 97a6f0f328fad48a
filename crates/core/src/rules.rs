//! Pseudo-legal move generation and attack detection.
//!
//! Destination squares are computed per piece kind without any notion of
//! check, pins or turn order. A move onto an occupied square is always a
//! capture of an enemy piece, because same-color destinations are filtered
//! out for every kind.

use crate::board::{Color, PieceId, PieceKind, Position, Square};

const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

const KING_OFFSETS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

const BISHOP_DIRS: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

const ROOK_DIRS: [(i8, i8); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

const QUEEN_DIRS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 1),
    (1, -1),
    (1, 1),
    (-1, 0),
    (1, 0),
    (0, -1),
    (0, 1),
];

/// All pseudo-legal destination squares for the piece `id`.
pub fn possible_moves(position: &Position, id: PieceId) -> Vec<Square> {
    let piece = position.piece(id);
    match piece.kind {
        PieceKind::Pawn => pawn_moves(position, id),
        PieceKind::Knight => step_moves(position, id, &KNIGHT_OFFSETS),
        PieceKind::King => step_moves(position, id, &KING_OFFSETS),
        PieceKind::Bishop => ray_moves(position, id, &BISHOP_DIRS),
        PieceKind::Rook => ray_moves(position, id, &ROOK_DIRS),
        PieceKind::Queen => ray_moves(position, id, &QUEEN_DIRS),
    }
}

fn pawn_moves(position: &Position, id: PieceId) -> Vec<Square> {
    let piece = position.piece(id);
    let dir = piece.color.pawn_direction();
    let mut moves = Vec::new();

    if let Some(one) = piece.square.offset(dir, 0) {
        if !position.is_occupied(one) {
            moves.push(one);

            // Double step from the starting row, both squares empty.
            if piece.square.row() == piece.color.pawn_start_row() {
                if let Some(two) = one.offset(dir, 0) {
                    if !position.is_occupied(two) {
                        moves.push(two);
                    }
                }
            }
        }
    }

    // Diagonal captures require an enemy occupant; no en passant.
    for dc in [-1, 1] {
        if let Some(diag) = piece.square.offset(dir, dc) {
            if let Some(other) = position.piece_at(diag) {
                if position.piece(other).color != piece.color {
                    moves.push(diag);
                }
            }
        }
    }

    moves
}

fn step_moves(position: &Position, id: PieceId, offsets: &[(i8, i8)]) -> Vec<Square> {
    let piece = position.piece(id);
    offsets
        .iter()
        .filter_map(|&(dr, dc)| piece.square.offset(dr, dc))
        .filter(|&to| match position.piece_at(to) {
            Some(other) => position.piece(other).color != piece.color,
            None => true,
        })
        .collect()
}

fn ray_moves(position: &Position, id: PieceId, dirs: &[(i8, i8)]) -> Vec<Square> {
    let piece = position.piece(id);
    let mut moves = Vec::new();

    for &(dr, dc) in dirs {
        let mut current = piece.square;
        while let Some(next) = current.offset(dr, dc) {
            match position.piece_at(next) {
                None => {
                    moves.push(next);
                    current = next;
                }
                Some(other) => {
                    // First occupied square ends the ray; enemy squares
                    // are included as the capture square.
                    if position.piece(other).color != piece.color {
                        moves.push(next);
                    }
                    break;
                }
            }
        }
    }

    moves
}

/// True iff any piece of `by` can move to `square`.
pub fn is_square_attacked(position: &Position, square: Square, by: Color) -> bool {
    position
        .ids()
        .filter(|&id| position.piece(id).color == by)
        .any(|id| possible_moves(position, id).contains(&square))
}

/// A cross-color attacking relationship, derived on demand and never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attack {
    pub attacker: PieceId,
    pub target: PieceId,
    pub from: Square,
    pub to: Square,
}

/// Every attack the piece `id` gives or receives.
///
/// Outgoing: each of the piece's moves landing on an occupied square.
/// Incoming: each enemy piece whose moves cover the piece's square.
/// Same-color occupation never yields an attack in either direction.
pub fn interactions(position: &Position, id: PieceId) -> Vec<Attack> {
    let piece = position.piece(id);
    let mut attacks = Vec::new();

    for to in possible_moves(position, id) {
        if let Some(target) = position.piece_at(to) {
            attacks.push(Attack {
                attacker: id,
                target,
                from: piece.square,
                to,
            });
        }
    }

    for other in position.ids() {
        if other == id || position.piece(other).color == piece.color {
            continue;
        }
        if possible_moves(position, other).contains(&piece.square) {
            attacks.push(Attack {
                attacker: other,
                target: id,
                from: position.piece(other).square,
                to: piece.square,
            });
        }
    }

    attacks
}

/// Number of attacker->target pairs across the whole position.
pub fn attack_count(position: &Position) -> usize {
    position
        .ids()
        .map(|id| {
            possible_moves(position, id)
                .into_iter()
                .filter(|&to| position.is_occupied(to))
                .count()
        })
        .sum()
}
