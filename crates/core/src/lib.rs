//! Blindfold Chess Trainer Core Library
//!
//! Generates memory-training positions in which exactly one piece attacks
//! exactly one enemy piece, and advances them move-by-move while keeping
//! that invariant. Presentation, timing, scoring and persistence belong to
//! the surrounding application.

pub mod board;
pub mod drill;
pub mod error;
pub mod generator;
pub mod placement;
pub mod rules;

pub use board::{Color, Piece, PieceId, PieceKind, Position, Square};
pub use drill::{DrillMode, DrillSession, GuessOutcome};
pub use error::{Error, Result};
pub use generator::{Exercise, Generator, GeneratorConfig};
pub use placement::is_placement_valid;
pub use rules::{interactions, is_square_attacked, possible_moves, Attack};

/// Generates a fresh exercise with the default configuration and the
/// process rng. For deterministic generation, use [`Generator::generate`]
/// with a seeded rng.
pub fn generate_exercise(level: u32, side_to_move: Color) -> Exercise {
    let mut rng = rand::rng();
    Generator::new().generate(level, side_to_move, &mut rng)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_exercise() {
        let exercise = generate_exercise(2, Color::White);
        assert_eq!(exercise.position().len(), 3);
        assert!(exercise.verify());
    }
}
