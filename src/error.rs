//! Errors raised by pitch, scale and pattern derivation
use thiserror::Error;

use crate::theory::Pitch;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TheoryError {
    #[error("unrecognized pitch class: {0:?}")]
    InvalidPitchClass(String),

    #[error("unknown mode: {0:?}")]
    UnknownMode(String),

    #[error("mode has no steps")]
    EmptyMode,

    #[error("scale walk reached index {index} in a sequence of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("cannot pick {requested} notes from {available} scale degrees")]
    InvalidNoteCount { requested: usize, available: usize },

    #[error("pitch {0} has no row in the grid")]
    PitchNotInGrid(Pitch),
}
