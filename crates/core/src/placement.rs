//! Structural placement rules, independent of piece movement.

use crate::board::{Piece, PieceKind};

/// True iff `candidate` may be added next to `existing`.
///
/// Four rules: kings are never adjacent, at most one king per color,
/// same-color bishops never share a square shade, and pawns stay off the
/// first and last rank. Only the snapshot passed in is consulted.
pub fn is_placement_valid(candidate: &Piece, existing: &[Piece]) -> bool {
    match candidate.kind {
        PieceKind::King => {
            for other in existing {
                if other.kind != PieceKind::King {
                    continue;
                }
                if other.square.is_adjacent(candidate.square) {
                    return false;
                }
                if other.color == candidate.color {
                    return false;
                }
            }
            true
        }
        PieceKind::Bishop => !existing.iter().any(|other| {
            other.kind == PieceKind::Bishop
                && other.color == candidate.color
                && other.square.is_light() == candidate.square.is_light()
        }),
        PieceKind::Pawn => candidate.square.row() != 0 && candidate.square.row() != 7,
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Color, Square};

    fn piece(color: Color, kind: PieceKind, row: u8, col: u8) -> Piece {
        Piece::new(color, kind, Square::new(row, col).unwrap())
    }

    #[test]
    fn test_adjacent_kings_rejected() {
        let white_king = piece(Color::White, PieceKind::King, 0, 0);
        let black_king = piece(Color::Black, PieceKind::King, 1, 1);
        assert!(!is_placement_valid(&black_king, &[white_king]));

        let far_king = piece(Color::Black, PieceKind::King, 3, 3);
        assert!(is_placement_valid(&far_king, &[white_king]));
    }

    #[test]
    fn test_one_king_per_color() {
        let first = piece(Color::White, PieceKind::King, 0, 0);
        let second = piece(Color::White, PieceKind::King, 5, 5);
        assert!(!is_placement_valid(&second, &[first]));
    }

    #[test]
    fn test_bishops_on_same_shade_rejected() {
        // (2, 1) and (4, 3) are both light squares.
        let placed = piece(Color::White, PieceKind::Bishop, 2, 1);
        let same_shade = piece(Color::White, PieceKind::Bishop, 4, 3);
        let dark = piece(Color::White, PieceKind::Bishop, 4, 4);
        assert!(!is_placement_valid(&same_shade, &[placed]));
        assert!(is_placement_valid(&dark, &[placed]));

        // Opposite colors may double up on a shade.
        let enemy = piece(Color::Black, PieceKind::Bishop, 4, 3);
        assert!(is_placement_valid(&enemy, &[placed]));
    }

    #[test]
    fn test_pawn_off_back_ranks() {
        assert!(!is_placement_valid(&piece(Color::White, PieceKind::Pawn, 0, 4), &[]));
        assert!(!is_placement_valid(&piece(Color::Black, PieceKind::Pawn, 7, 4), &[]));
        assert!(is_placement_valid(&piece(Color::White, PieceKind::Pawn, 6, 4), &[]));
    }

    #[test]
    fn test_other_kinds_unrestricted() {
        let rook = piece(Color::White, PieceKind::Rook, 0, 0);
        let queen = piece(Color::White, PieceKind::Queen, 7, 7);
        assert!(is_placement_valid(&rook, &[]));
        assert!(is_placement_valid(&queen, &[rook]));
    }
}
