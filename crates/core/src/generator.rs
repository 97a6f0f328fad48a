//! Constrained randomized position generation.
//!
//! Builds positions holding exactly one cross-color attack, designates the
//! attacking piece and its victim, and advances a position move-by-move
//! while preserving that invariant. The search is a bounded-attempt
//! rejection sampler: piece placements and trial moves are tried and
//! reverted until one satisfies the invariant or the attempt ceiling is hit.

use rand::seq::{IndexedRandom, SliceRandom};
use rand::Rng;
use serde::Serialize;
use tracing::{debug, warn};

use crate::board::{Color, Piece, PieceId, PieceKind, Position, Square};
use crate::error::{Error, Result};
use crate::placement::is_placement_valid;
use crate::rules::{attack_count, interactions, possible_moves};

/// Attempt ceilings for the bounded searches. The defaults match the sizes
/// the search space needs at the usual piece counts (level + 1 pieces).
#[derive(Debug, Clone, Copy)]
pub struct GeneratorConfig {
    /// Random (kind, color, square) samples allowed while scattering
    /// non-interacting pieces for one position.
    pub placement_attempts: u32,
    /// Whole scatter-then-strike cycles allowed before falling back to the
    /// fixed minimal layout.
    pub build_attempts: u32,
    /// Tentative relocations allowed when advancing an existing position.
    pub advance_attempts: u32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            placement_attempts: 500,
            build_attempts: 100,
            advance_attempts: 50,
        }
    }
}

/// A generated training position together with its designated pair: the
/// piece that just moved and the one piece it now attacks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Exercise {
    position: Position,
    active: PieceId,
    active_start: Square,
    target: PieceId,
}

impl Exercise {
    pub fn position(&self) -> &Position {
        &self.position
    }

    /// The piece whose move created the current attack.
    pub fn active(&self) -> &Piece {
        self.position.piece(self.active)
    }

    pub fn active_id(&self) -> PieceId {
        self.active
    }

    /// Where the active piece stood before its move, for replay/animation.
    pub fn active_start(&self) -> Square {
        self.active_start
    }

    /// The attacked piece the trainee has to find.
    pub fn target(&self) -> &Piece {
        self.position.piece(self.target)
    }

    pub fn target_id(&self) -> PieceId {
        self.target
    }

    pub fn target_square(&self) -> Square {
        self.target().square
    }

    pub fn is_target(&self, square: Square) -> bool {
        self.target_square() == square
    }

    /// Checks the emitted invariant: no shared squares, every placement
    /// rule intact, exactly one attack on the whole board, and that attack
    /// is active -> target.
    pub fn verify(&self) -> bool {
        let pieces = self.position.pieces();
        for (i, piece) in pieces.iter().enumerate() {
            if pieces[..i].iter().any(|other| other.square == piece.square) {
                return false;
            }
            if !is_placement_valid(piece, &pieces[..i]) {
                return false;
            }
        }
        attack_count(&self.position) == 1
            && possible_moves(&self.position, self.active).contains(&self.target_square())
    }
}

/// If the relocated piece `mover` attacks exactly one enemy piece and that
/// is the only attack anywhere on the board, returns the attacked piece.
///
/// The whole-board count matters: a relocation can expose the mover to an
/// enemy piece, or unblock a ray between two bystanders, and neither shows
/// up in the mover's own outgoing attacks.
fn single_attack_target(position: &Position, mover: PieceId) -> Option<PieceId> {
    let mut outgoing = possible_moves(position, mover)
        .into_iter()
        .filter_map(|to| position.piece_at(to));

    let target = outgoing.next()?;
    if outgoing.next().is_some() {
        return None;
    }
    if attack_count(position) != 1 {
        return None;
    }
    Some(target)
}

/// Safe filler squares for the fallback layout; none of them sees the
/// knight on (5,4) or the pawn on (6,6), whichever color lands there.
const FALLBACK_FILLERS: [(u8, u8); 3] = [(1, 0), (1, 7), (6, 0)];

#[derive(Debug, Clone, Default)]
pub struct Generator {
    config: GeneratorConfig,
}

impl Generator {
    pub fn new() -> Generator {
        Generator {
            config: GeneratorConfig::default(),
        }
    }

    pub fn with_config(config: GeneratorConfig) -> Generator {
        Generator { config }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Builds a fresh position with `level + 1` pieces and exactly one
    /// attack, given by a piece of `side_to_move`.
    ///
    /// Infallible: when the bounded search runs out, a fixed minimal layout
    /// that trivially satisfies the invariant is returned instead.
    pub fn generate(&self, level: u32, side_to_move: Color, rng: &mut impl Rng) -> Exercise {
        let piece_count = level as usize + 1;

        for attempt in 0..self.config.build_attempts {
            let Some(position) = self.scatter(piece_count, side_to_move, rng) else {
                continue;
            };
            if let Some(exercise) = self.strike(position, side_to_move, rng) {
                debug!(attempt, pieces = piece_count, "generated fresh exercise");
                return exercise;
            }
        }

        warn!(level, "fresh generation exhausted, using fallback layout");
        self.fallback(piece_count, side_to_move, rng)
    }

    /// Scatters `piece_count` pieces so that nothing attacks anything.
    /// The first piece gets `side`'s color, the rest are random.
    fn scatter(&self, piece_count: usize, side: Color, rng: &mut impl Rng) -> Option<Position> {
        let mut position = Position::new();
        let mut attempts = 0;

        while position.len() < piece_count && attempts < self.config.placement_attempts {
            attempts += 1;

            let kind = *PieceKind::ALL.choose(rng).unwrap();
            let color = if position.is_empty() {
                side
            } else if rng.random_bool(0.5) {
                Color::White
            } else {
                Color::Black
            };
            let square = random_square(rng);

            if position.is_occupied(square) {
                continue;
            }
            let candidate = Piece::new(color, kind, square);
            if !is_placement_valid(&candidate, position.pieces()) {
                continue;
            }

            let id = position.push(candidate);
            if !interactions(&position, id).is_empty() {
                position.pop();
            }
        }

        if position.len() == piece_count {
            Some(position)
        } else {
            debug!(placed = position.len(), attempts, "scatter ran out of attempts");
            None
        }
    }

    /// Moves one of `side`'s pieces to an empty square so that exactly one
    /// attack appears. Trial relocations are reverted on rejection.
    fn strike(&self, mut position: Position, side: Color, rng: &mut impl Rng) -> Option<Exercise> {
        let mut movers = position.ids_of(side);
        movers.shuffle(rng);

        for id in movers {
            let start = position.piece(id).square;
            for to in possible_moves(&position, id) {
                if position.is_occupied(to) {
                    continue;
                }
                position.relocate(id, to);
                if let Some(target) = single_attack_target(&position, id) {
                    return Some(Exercise {
                        position,
                        active: id,
                        active_start: start,
                        target,
                    });
                }
                position.relocate(id, start);
            }
        }

        None
    }

    /// Replaces the exercise with the next one: the just-found target piece
    /// becomes the mover and must end up attacking exactly one enemy piece,
    /// with no other attack anywhere on the board.
    ///
    /// On `SearchExhausted` the exercise is left untouched and the caller
    /// should regenerate from scratch.
    pub fn advance(&self, exercise: &mut Exercise, rng: &mut impl Rng) -> Result<()> {
        let mover = exercise.target;
        let start = exercise.position.piece(mover).square;

        let mut candidates: Vec<Square> = possible_moves(&exercise.position, mover)
            .into_iter()
            .filter(|&to| !exercise.position.is_occupied(to))
            .collect();
        candidates.shuffle(rng);

        let mut attempts = 0;
        for to in candidates {
            if attempts >= self.config.advance_attempts {
                break;
            }
            attempts += 1;

            exercise.position.relocate(mover, to);
            if let Some(target) = single_attack_target(&exercise.position, mover) {
                debug!(attempts, "advanced exercise");
                exercise.active = mover;
                exercise.active_start = start;
                exercise.target = target;
                return Ok(());
            }
            exercise.position.relocate(mover, start);
        }

        debug!(attempts, "advance search exhausted");
        Err(Error::SearchExhausted { attempts })
    }

    /// Hand-placed minimal layout: a knight of `side` that has just jumped
    /// (3,3) -> (5,4) to attack an enemy pawn on (6,6), padded with inert
    /// pawns toward the requested piece count.
    fn fallback(&self, piece_count: usize, side: Color, rng: &mut impl Rng) -> Exercise {
        let mut position = Position::new();

        let active = position.push(Piece::new(
            side,
            PieceKind::Knight,
            Square::new(5, 4).unwrap(),
        ));
        let target = position.push(Piece::new(
            side.opponent(),
            PieceKind::Pawn,
            Square::new(6, 6).unwrap(),
        ));

        let fillers = piece_count.saturating_sub(2).min(FALLBACK_FILLERS.len());
        for &(row, col) in &FALLBACK_FILLERS[..fillers] {
            let color = if rng.random_bool(0.5) {
                Color::White
            } else {
                Color::Black
            };
            position.push(Piece::new(
                color,
                PieceKind::Pawn,
                Square::new(row, col).unwrap(),
            ));
        }

        Exercise {
            position,
            active,
            active_start: Square::new(3, 3).unwrap(),
            target,
        }
    }
}

fn random_square(rng: &mut impl Rng) -> Square {
    // Both coordinates are sampled in range, so the constructor cannot fail.
    Square::new(rng.random_range(0..8), rng.random_range(0..8)).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sq(row: u8, col: u8) -> Square {
        Square::new(row, col).unwrap()
    }

    #[test]
    fn test_fresh_generation_holds_invariant() {
        let generator = Generator::new();
        let mut rng = StdRng::seed_from_u64(7);

        for level in 1..=6 {
            for _ in 0..20 {
                let exercise = generator.generate(level, Color::White, &mut rng);
                assert!(exercise.verify(), "level {level} produced a bad exercise");
                assert_eq!(exercise.active().color, Color::White);
                assert_ne!(exercise.target().color, Color::White);
            }
        }
    }

    #[test]
    fn test_level_one_always_terminates() {
        let generator = Generator::new();
        let mut rng = StdRng::seed_from_u64(42);

        for side in [Color::White, Color::Black] {
            for _ in 0..50 {
                let exercise = generator.generate(1, side, &mut rng);
                assert!(exercise.verify());
                assert_eq!(exercise.active().color, side);
            }
        }
    }

    #[test]
    fn test_generation_is_reproducible() {
        let generator = Generator::new();
        let a = generator.generate(4, Color::Black, &mut StdRng::seed_from_u64(99));
        let b = generator.generate(4, Color::Black, &mut StdRng::seed_from_u64(99));
        assert_eq!(a, b);
    }

    #[test]
    fn test_advance_preserves_invariant() {
        let generator = Generator::new();
        let mut rng = StdRng::seed_from_u64(3);

        let mut exercise = generator.generate(3, Color::White, &mut rng);
        for _ in 0..10 {
            let previous_target = exercise.target_id();
            match generator.advance(&mut exercise, &mut rng) {
                Ok(()) => {
                    assert!(exercise.verify());
                    assert_eq!(exercise.active_id(), previous_target);
                }
                Err(Error::SearchExhausted { .. }) => {
                    exercise = generator.generate(3, Color::White, &mut rng);
                }
            }
        }
    }

    #[test]
    fn test_failed_advance_leaves_exercise_untouched() {
        // The target pawn is boxed in: its push square is occupied by a
        // friendly rook and there is nothing to capture, so advance has no
        // candidate moves at all.
        let mut position = Position::new();
        let active = position.push(Piece::new(Color::White, PieceKind::Knight, sq(4, 4)));
        let target = position.push(Piece::new(Color::Black, PieceKind::Pawn, sq(6, 5)));
        position.push(Piece::new(Color::Black, PieceKind::Rook, sq(7, 5)));

        let mut exercise = Exercise {
            position,
            active,
            active_start: sq(5, 2),
            target,
        };
        assert!(exercise.verify());

        let generator = Generator::new();
        let before = exercise.clone();
        let result = generator.advance(&mut exercise, &mut StdRng::seed_from_u64(0));

        assert!(matches!(result, Err(Error::SearchExhausted { .. })));
        assert_eq!(exercise, before);
    }

    #[test]
    fn test_fallback_layout_is_valid() {
        // build_attempts = 0 forces the fallback path.
        let generator = Generator::with_config(GeneratorConfig {
            build_attempts: 0,
            ..GeneratorConfig::default()
        });
        let mut rng = StdRng::seed_from_u64(11);

        for side in [Color::White, Color::Black] {
            for level in 1..=8 {
                let exercise = generator.generate(level, side, &mut rng);
                assert!(exercise.verify());
                assert_eq!(exercise.active().kind, PieceKind::Knight);
                assert_eq!(exercise.active().square, sq(5, 4));
                assert_eq!(exercise.active_start(), sq(3, 3));
                assert_eq!(exercise.target_square(), sq(6, 6));
                assert!(exercise.position().len() <= level as usize + 1);
            }
        }
    }

    #[test]
    fn test_scatter_is_interaction_free() {
        let generator = Generator::new();
        let mut rng = StdRng::seed_from_u64(5);

        for _ in 0..20 {
            let position = generator
                .scatter(5, Color::White, &mut rng)
                .expect("scatter should succeed at small piece counts");
            assert_eq!(position.len(), 5);
            assert_eq!(attack_count(&position), 0);
        }
    }

    #[test]
    fn test_exercise_is_target() {
        let generator = Generator::new();
        let mut rng = StdRng::seed_from_u64(1);
        let exercise = generator.generate(2, Color::White, &mut rng);

        assert!(exercise.is_target(exercise.target_square()));
        assert!(!exercise.is_target(exercise.active().square));
    }
}
