//! Board model: a sparse arrangement of pieces on an 8x8 grid.
//!
//! Pure data and lookup. Occupancy and interaction invariants are enforced
//! by the generator before a position is emitted, never here.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Side a piece belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn opponent(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Color::White => "white",
            Color::Black => "black",
        }
    }

    /// Row delta of a pawn push. White pawns march toward row 0.
    pub(crate) fn pawn_direction(self) -> i8 {
        match self {
            Color::White => -1,
            Color::Black => 1,
        }
    }

    /// Row a pawn of this color may double-step from.
    pub(crate) fn pawn_start_row(self) -> u8 {
        match self {
            Color::White => 6,
            Color::Black => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    pub const ALL: [PieceKind; 6] = [
        PieceKind::Pawn,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::Pawn => "pawn",
            PieceKind::Knight => "knight",
            PieceKind::Bishop => "bishop",
            PieceKind::Rook => "rook",
            PieceKind::Queen => "queen",
            PieceKind::King => "king",
        }
    }
}

/// A board coordinate. Always on the board: the constructor and `offset`
/// are the only ways to produce one, and both reject out-of-range values.
/// Deserialization routes through the constructor as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawSquare")]
pub struct Square {
    row: u8,
    col: u8,
}

/// Unvalidated wire form of [`Square`].
#[derive(Deserialize)]
struct RawSquare {
    row: u8,
    col: u8,
}

impl TryFrom<RawSquare> for Square {
    type Error = String;

    fn try_from(raw: RawSquare) -> Result<Square, String> {
        Square::new(raw.row, raw.col)
            .ok_or_else(|| format!("square ({}, {}) is off the board", raw.row, raw.col))
    }
}

impl Square {
    pub fn new(row: u8, col: u8) -> Option<Square> {
        if row < 8 && col < 8 {
            Some(Square { row, col })
        } else {
            None
        }
    }

    pub fn row(self) -> u8 {
        self.row
    }

    pub fn col(self) -> u8 {
        self.col
    }

    /// The square at `(row + dr, col + dc)`, or `None` off the board.
    pub fn offset(self, dr: i8, dc: i8) -> Option<Square> {
        let row = self.row as i8 + dr;
        let col = self.col as i8 + dc;
        if (0..8).contains(&row) && (0..8).contains(&col) {
            Some(Square {
                row: row as u8,
                col: col as u8,
            })
        } else {
            None
        }
    }

    /// Light squares are the ones where `row + col` is odd.
    pub fn is_light(self) -> bool {
        (self.row + self.col) % 2 == 1
    }

    /// Chebyshev distance <= 1 (includes the square itself).
    pub fn is_adjacent(self, other: Square) -> bool {
        self.row.abs_diff(other.row) <= 1 && self.col.abs_diff(other.col) <= 1
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Row 0 is the top of the board, i.e. rank 8.
        write!(f, "{}{}", (b'a' + self.col) as char, 8 - self.row)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Piece {
    pub color: Color,
    pub kind: PieceKind,
    pub square: Square,
}

impl Piece {
    pub fn new(color: Color, kind: PieceKind, square: Square) -> Piece {
        Piece {
            color,
            kind,
            square,
        }
    }

    /// Unicode glyph for display by the session collaborator.
    pub fn symbol(&self) -> char {
        match (self.color, self.kind) {
            (Color::White, PieceKind::King) => '♔',
            (Color::White, PieceKind::Queen) => '♕',
            (Color::White, PieceKind::Rook) => '♖',
            (Color::White, PieceKind::Bishop) => '♗',
            (Color::White, PieceKind::Knight) => '♘',
            (Color::White, PieceKind::Pawn) => '♙',
            (Color::Black, PieceKind::King) => '♚',
            (Color::Black, PieceKind::Queen) => '♛',
            (Color::Black, PieceKind::Rook) => '♜',
            (Color::Black, PieceKind::Bishop) => '♝',
            (Color::Black, PieceKind::Knight) => '♞',
            (Color::Black, PieceKind::Pawn) => '♟',
        }
    }
}

/// Stable handle to a piece within one `Position`. A piece keeps its id
/// while it is relocated, so callers can tell "this piece moved" apart
/// from "a different piece occupies this square".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PieceId(usize);

/// An ordered collection of pieces.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pieces: Vec<Piece>,
}

impl Position {
    pub fn new() -> Position {
        Position { pieces: Vec::new() }
    }

    pub fn from_pieces(pieces: Vec<Piece>) -> Position {
        Position { pieces }
    }

    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    pub fn ids(&self) -> impl Iterator<Item = PieceId> {
        (0..self.pieces.len()).map(PieceId)
    }

    /// Ids of all pieces of one color, in board order.
    pub fn ids_of(&self, color: Color) -> Vec<PieceId> {
        self.ids()
            .filter(|&id| self.piece(id).color == color)
            .collect()
    }

    pub fn piece(&self, id: PieceId) -> &Piece {
        &self.pieces[id.0]
    }

    pub fn push(&mut self, piece: Piece) -> PieceId {
        self.pieces.push(piece);
        PieceId(self.pieces.len() - 1)
    }

    /// Removes the most recently pushed piece. Ids of earlier pieces stay valid.
    pub(crate) fn pop(&mut self) {
        self.pieces.pop();
    }

    /// Moves a piece to `to`, keeping its id.
    pub(crate) fn relocate(&mut self, id: PieceId, to: Square) {
        self.pieces[id.0].square = to;
    }

    pub fn piece_at(&self, square: Square) -> Option<PieceId> {
        self.ids().find(|&id| self.piece(id).square == square)
    }

    pub fn is_occupied(&self, square: Square) -> bool {
        self.piece_at(square).is_some()
    }
}
