//! Drill session: the reveal/hide/guess cycle around generated exercises.
//!
//! Owns the exercise between guesses and drives the generator; everything
//! presentational (timers, score arithmetic, messages, persistence) stays
//! with the caller.

use rand::Rng;

use crate::board::{Color, Square};
use crate::generator::{Exercise, Generator};

/// Guesses per level.
pub const MAX_MOVES: u32 = 20;
/// Wrong guesses before the session ends.
pub const MAX_ERRORS: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrillMode {
    /// The position is flashed briefly, then hidden.
    Blindfold,
    /// The position stays visible.
    Beginner,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuessOutcome {
    Correct,
    Incorrect,
    /// Twentieth correct guess; the level counter has been bumped.
    LevelComplete,
    /// Third wrong guess; the session is over.
    GameOver,
}

#[derive(Debug, Clone)]
pub struct GuessAttempt {
    pub square: Square,
    pub correct: bool,
}

pub struct DrillSession {
    generator: Generator,
    mode: DrillMode,
    level: u32,
    side_to_move: Color,
    exercise: Exercise,
    moves_made: u32,
    errors: u32,
    hint_used: bool,
    history: Vec<GuessAttempt>,
}

impl DrillSession {
    pub fn new(level: u32, mode: DrillMode, rng: &mut impl Rng) -> DrillSession {
        Self::with_generator(Generator::new(), level, mode, rng)
    }

    pub fn with_generator(
        generator: Generator,
        level: u32,
        mode: DrillMode,
        rng: &mut impl Rng,
    ) -> DrillSession {
        let exercise = generator.generate(level, Color::White, rng);
        DrillSession {
            generator,
            mode,
            level,
            side_to_move: Color::White,
            exercise,
            moves_made: 0,
            errors: 0,
            hint_used: false,
            history: Vec::new(),
        }
    }

    pub fn mode(&self) -> DrillMode {
        self.mode
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    pub fn exercise(&self) -> &Exercise {
        &self.exercise
    }

    pub fn moves_made(&self) -> u32 {
        self.moves_made
    }

    pub fn errors(&self) -> u32 {
        self.errors
    }

    pub fn is_game_over(&self) -> bool {
        self.errors >= MAX_ERRORS
    }

    /// How long the board should be shown before hiding, or `None` when it
    /// stays visible for the whole guess.
    pub fn reveal_ms(&self) -> Option<u64> {
        match self.mode {
            DrillMode::Blindfold => Some(2000),
            DrillMode::Beginner => None,
        }
    }

    /// True once the twentieth correct guess has been made; cleared by
    /// [`DrillSession::start_level`].
    pub fn is_level_complete(&self) -> bool {
        self.moves_made >= MAX_MOVES
    }

    /// Checks a guessed square against the target piece.
    ///
    /// A correct guess advances the exercise (falling back to fresh
    /// generation when the advance search is exhausted) and flips the side
    /// to move. The twentieth correct guess completes the level; the third
    /// wrong guess ends the session. Once either terminal state is reached,
    /// further guesses return it unchanged: nothing is recorded and the
    /// level does not move until `start_level`.
    pub fn guess(&mut self, square: Square, rng: &mut impl Rng) -> GuessOutcome {
        if self.is_game_over() {
            return GuessOutcome::GameOver;
        }
        if self.is_level_complete() {
            return GuessOutcome::LevelComplete;
        }

        let correct = self.exercise.is_target(square);
        self.history.push(GuessAttempt { square, correct });

        if !correct {
            self.errors += 1;
            if self.is_game_over() {
                return GuessOutcome::GameOver;
            }
            return GuessOutcome::Incorrect;
        }

        self.moves_made += 1;
        if self.moves_made >= MAX_MOVES {
            self.level += 1;
            return GuessOutcome::LevelComplete;
        }

        self.side_to_move = self.side_to_move.opponent();
        if self.generator.advance(&mut self.exercise, rng).is_err() {
            self.exercise = self
                .generator
                .generate(self.level, self.side_to_move, rng);
        }
        GuessOutcome::Correct
    }

    /// Reveals the target square. One hint per level.
    pub fn hint(&mut self) -> Option<Square> {
        if self.hint_used {
            return None;
        }
        self.hint_used = true;
        Some(self.exercise.target_square())
    }

    /// Starts a fresh level: new exercise, white to move, counters cleared.
    /// The guess history is kept across levels.
    pub fn start_level(&mut self, rng: &mut impl Rng) {
        self.moves_made = 0;
        self.errors = 0;
        self.hint_used = false;
        self.side_to_move = Color::White;
        self.exercise = self.generator.generate(self.level, Color::White, rng);
    }

    pub fn attempts(&self) -> usize {
        self.history.len()
    }

    pub fn correct_count(&self) -> usize {
        self.history.iter().filter(|a| a.correct).count()
    }

    pub fn accuracy(&self) -> f32 {
        if self.history.is_empty() {
            return 0.0;
        }
        (self.correct_count() as f32 / self.history.len() as f32) * 100.0
    }

    pub fn history(&self) -> &[GuessAttempt] {
        &self.history
    }
}
