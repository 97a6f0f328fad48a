//! Error types for blindfold-trainer-core

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// A bounded search found no configuration satisfying the single-attack
    /// invariant. Recoverable: regenerate from scratch.
    #[error("position search exhausted after {attempts} attempts")]
    SearchExhausted { attempts: u32 },
}

pub type Result<T> = std::result::Result<T, Error>;
