//! The seven diatonic modes as whole/half step patterns
use std::fmt;
use std::str::FromStr;

use crate::error::TheoryError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Whole,
    Half,
}

impl Step {
    pub fn semitones(self) -> usize {
        match self {
            Step::Whole => 2,
            Step::Half => 1,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Step::Whole => "W",
            Step::Half => "H",
        }
    }
}

use Step::{Half as H, Whole as W};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    #[default]
    Ionian,
    Dorian,
    Phrygian,
    Lydian,
    Mixolydian,
    Aeolian,
    Locrian,
}

impl Mode {
    pub const ALL: [Mode; 7] = [
        Mode::Ionian,
        Mode::Dorian,
        Mode::Phrygian,
        Mode::Lydian,
        Mode::Mixolydian,
        Mode::Aeolian,
        Mode::Locrian,
    ];

    pub fn steps(self) -> &'static [Step; 7] {
        match self {
            Mode::Ionian => &[W, W, H, W, W, W, H],
            Mode::Dorian => &[W, H, W, W, W, H, W],
            Mode::Phrygian => &[H, W, W, W, H, W, W],
            Mode::Lydian => &[W, W, W, H, W, W, H],
            Mode::Mixolydian => &[W, W, H, W, W, H, W],
            Mode::Aeolian => &[W, H, W, W, H, W, W],
            Mode::Locrian => &[H, W, W, H, W, W, W],
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Mode::Ionian => "Ionian",
            Mode::Dorian => "Dorian",
            Mode::Phrygian => "Phrygian",
            Mode::Lydian => "Lydian",
            Mode::Mixolydian => "Mixolydian",
            Mode::Aeolian => "Aeolian",
            Mode::Locrian => "Locrian",
        }
    }

    /// Interval pattern as shown in the description panel, e.g. `W-W-H-W-W-W-H`.
    pub fn interval_label(self) -> String {
        self.steps()
            .iter()
            .map(|s| s.symbol())
            .collect::<Vec<_>>()
            .join("-")
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Mode {
    type Err = TheoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mode::ALL
            .into_iter()
            .find(|mode| mode.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| TheoryError::UnknownMode(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modes_are_rotations_of_ionian() {
        let ionian = Mode::Ionian.steps();
        for (shift, mode) in Mode::ALL.iter().enumerate() {
            let mut rotated = *ionian;
            rotated.rotate_left(shift);
            assert_eq!(&rotated, mode.steps(), "{mode}");
        }
    }

    #[test]
    fn test_modes_span_an_octave() {
        for mode in Mode::ALL {
            let total: usize = mode.steps().iter().map(|s| s.semitones()).sum();
            assert_eq!(total, 12, "{mode}");
        }
    }

    #[test]
    fn test_parse_mode() {
        assert_eq!("Dorian".parse::<Mode>(), Ok(Mode::Dorian));
        assert_eq!("locrian".parse::<Mode>(), Ok(Mode::Locrian));
        assert_eq!(
            "Major".parse::<Mode>(),
            Err(TheoryError::UnknownMode("Major".to_string()))
        );
    }

    #[test]
    fn test_interval_label() {
        assert_eq!(Mode::Ionian.interval_label(), "W-W-H-W-W-W-H");
        assert_eq!(Mode::Phrygian.interval_label(), "H-W-W-W-H-W-W");
    }
}
