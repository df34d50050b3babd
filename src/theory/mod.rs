//! Pitch theory - pitch classes, chromatic sequences and scale degrees
//!
//! Chromatic sequences are ascending: index 0 is the root in the chosen
//! octave and the classes below the root wrap into the next octave up.
use std::fmt;
use std::str::FromStr;

use crate::error::TheoryError;

pub mod mode;

pub use mode::{Mode, Step};

/// The 12 chromatic pitch classes in sharps notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PitchClass {
    C,
    CSharp,
    D,
    DSharp,
    E,
    F,
    FSharp,
    G,
    GSharp,
    A,
    ASharp,
    B,
}

impl PitchClass {
    pub const ALL: [PitchClass; 12] = [
        PitchClass::C,
        PitchClass::CSharp,
        PitchClass::D,
        PitchClass::DSharp,
        PitchClass::E,
        PitchClass::F,
        PitchClass::FSharp,
        PitchClass::G,
        PitchClass::GSharp,
        PitchClass::A,
        PitchClass::ASharp,
        PitchClass::B,
    ];

    /// Semitones above C.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            PitchClass::C => "C",
            PitchClass::CSharp => "C#",
            PitchClass::D => "D",
            PitchClass::DSharp => "D#",
            PitchClass::E => "E",
            PitchClass::F => "F",
            PitchClass::FSharp => "F#",
            PitchClass::G => "G",
            PitchClass::GSharp => "G#",
            PitchClass::A => "A",
            PitchClass::ASharp => "A#",
            PitchClass::B => "B",
        }
    }
}

impl fmt::Display for PitchClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PitchClass {
    type Err = TheoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PitchClass::ALL
            .into_iter()
            .find(|class| class.name() == s)
            .ok_or_else(|| TheoryError::InvalidPitchClass(s.to_string()))
    }
}

/// A pitch class in a specific octave, e.g. `C#4`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pitch {
    pub class: PitchClass,
    pub octave: i32,
}

impl Pitch {
    pub fn new(class: PitchClass, octave: i32) -> Self {
        Self { class, octave }
    }

    /// MIDI note number, with C4 = 60. `None` outside 0..=127.
    pub fn midi_note(self) -> Option<u8> {
        let note = (self.octave + 1) * 12 + self.class.index() as i32;
        u8::try_from(note).ok().filter(|n| *n <= 127)
    }
}

impl fmt::Display for Pitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.class, self.octave)
    }
}

/// Twelve consecutive pitches starting at a root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChromaticSequence {
    pitches: [Pitch; 12],
}

impl ChromaticSequence {
    pub const LEN: usize = 12;

    /// Build from a pitch-class name such as `"F#"`.
    pub fn from_names(root: &str, octave: i32) -> Result<Self, TheoryError> {
        let root = root.parse::<PitchClass>()?;
        Ok(build_chromatic(root, octave))
    }

    pub fn root(&self) -> Pitch {
        self.pitches[0]
    }

    pub fn pitches(&self) -> &[Pitch] {
        &self.pitches
    }

    pub fn get(&self, index: usize) -> Option<Pitch> {
        self.pitches.get(index).copied()
    }

    pub fn position(&self, pitch: Pitch) -> Option<usize> {
        self.pitches.iter().position(|p| *p == pitch)
    }

    pub fn len(&self) -> usize {
        self.pitches.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

/// Root and the following 11 classes. Classes before the root in C-based
/// order are placed in `octave + 1`.
pub fn build_chromatic(root: PitchClass, octave: i32) -> ChromaticSequence {
    let start = root.index();
    let pitches = std::array::from_fn(|i| {
        let class_index = start + i;
        if class_index < PitchClass::ALL.len() {
            Pitch::new(PitchClass::ALL[class_index], octave)
        } else {
            Pitch::new(PitchClass::ALL[class_index - PitchClass::ALL.len()], octave + 1)
        }
    });

    tracing::debug!(%root, octave, "built chromatic sequence");
    ChromaticSequence { pitches }
}

/// Walk the chromatic sequence with whole/half steps, recording the pitch
/// under the cursor before each advance.
pub fn select_degrees(
    chromatic: &ChromaticSequence,
    steps: &[Step],
) -> Result<Vec<Pitch>, TheoryError> {
    if steps.is_empty() {
        return Err(TheoryError::EmptyMode);
    }

    let mut cursor = 0;
    let mut degrees = Vec::with_capacity(steps.len());
    for step in steps {
        let pitch = chromatic.get(cursor).ok_or(TheoryError::IndexOutOfRange {
            index: cursor,
            len: chromatic.len(),
        })?;
        degrees.push(pitch);
        cursor += step.semitones();
    }

    Ok(degrees)
}
