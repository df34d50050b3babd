//! Mode Master - a modal step sequencer library
//!
//! This library provides the pieces behind a 12x16 pitch/step grid:
//! - Chromatic sequences and scale degrees for a key, octave and mode
//! - Constrained random pattern generation over the scale degrees
//! - Grid state and a playback session for timing
//! - Audio output for testing
//! - MIDI output for production use

pub mod audio;
pub mod config;
pub mod error;
pub mod generator;
pub mod midi;
pub mod sequencer;
pub mod theory;

// Re-export commonly used types
pub use audio::AudioOutput;
pub use config::Settings;
pub use error::TheoryError;
pub use generator::{generate, GeneratedPattern};
pub use midi::{MidiError, MidiOutputDevice};
pub use sequencer::playback::{PlaybackEvent, PlaybackSession};
pub use sequencer::tempo::TempoDebouncer;
pub use sequencer::{Cell, Grid, Sequencer};
pub use theory::{build_chromatic, select_degrees, ChromaticSequence, Mode, Pitch, PitchClass, Step};
