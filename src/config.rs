//! Startup settings with optional environment overrides
use std::time::Duration;

use crate::theory::{Mode, PitchClass};

pub const STEP_COUNT: usize = 16;
pub const MIN_BPM: f32 = 40.0;
pub const MAX_BPM: f32 = 240.0;
pub const OCTAVES: std::ops::RangeInclusive<i32> = 1..=7;

/// Tempo within `MIN_BPM..=MAX_BPM`; NaN becomes `MIN_BPM`.
pub fn clamp_bpm(bpm: f32) -> f32 {
    if bpm.is_nan() {
        MIN_BPM
    } else {
        bpm.clamp(MIN_BPM, MAX_BPM)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub key: PitchClass,
    pub octave: i32,
    pub mode: Mode,
    pub bpm: f32,
    pub note_count: usize,
    pub step_count: usize,
    pub tempo_debounce: Duration,
    pub midi_client_name: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            key: PitchClass::C,
            octave: 4,
            mode: Mode::Ionian,
            bpm: 70.0,
            note_count: 7,
            step_count: STEP_COUNT,
            tempo_debounce: Duration::from_millis(250),
            midi_client_name: "Mode Master MIDI Output".to_string(),
        }
    }
}

impl Settings {
    /// Defaults, overridden by `MODE_MASTER_KEY`, `MODE_MASTER_OCTAVE`,
    /// `MODE_MASTER_MODE` and `MODE_MASTER_BPM` when present and valid.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut settings = Self::default();

        if let Some(raw) = lookup("MODE_MASTER_KEY") {
            match raw.parse() {
                Ok(key) => settings.key = key,
                Err(e) => tracing::warn!("ignoring MODE_MASTER_KEY: {}", e),
            }
        }

        if let Some(raw) = lookup("MODE_MASTER_OCTAVE") {
            match raw.parse::<i32>() {
                Ok(octave) if OCTAVES.contains(&octave) => settings.octave = octave,
                _ => tracing::warn!("ignoring MODE_MASTER_OCTAVE={:?}", raw),
            }
        }

        if let Some(raw) = lookup("MODE_MASTER_MODE") {
            match raw.parse() {
                Ok(mode) => settings.mode = mode,
                Err(e) => tracing::warn!("ignoring MODE_MASTER_MODE: {}", e),
            }
        }

        if let Some(raw) = lookup("MODE_MASTER_BPM") {
            match raw.parse::<f32>() {
                Ok(bpm) if (MIN_BPM..=MAX_BPM).contains(&bpm) => settings.bpm = bpm,
                _ => tracing::warn!("ignoring MODE_MASTER_BPM={:?}", raw),
            }
        }

        settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_clamp_bpm() {
        assert_eq!(clamp_bpm(120.0), 120.0);
        assert_eq!(clamp_bpm(0.0), MIN_BPM);
        assert_eq!(clamp_bpm(-30.0), MIN_BPM);
        assert_eq!(clamp_bpm(f32::NAN), MIN_BPM);
        assert_eq!(clamp_bpm(f32::INFINITY), MAX_BPM);
    }

    #[test]
    fn test_defaults_without_env() {
        assert_eq!(Settings::from_lookup(|_| None), Settings::default());
    }

    #[test]
    fn test_overrides() {
        let settings = Settings::from_lookup(lookup(&[
            ("MODE_MASTER_KEY", "F#"),
            ("MODE_MASTER_OCTAVE", "3"),
            ("MODE_MASTER_MODE", "Aeolian"),
            ("MODE_MASTER_BPM", "120"),
        ]));
        assert_eq!(settings.key, PitchClass::FSharp);
        assert_eq!(settings.octave, 3);
        assert_eq!(settings.mode, Mode::Aeolian);
        assert_eq!(settings.bpm, 120.0);
    }

    #[test]
    fn test_invalid_overrides_are_ignored() {
        let settings = Settings::from_lookup(lookup(&[
            ("MODE_MASTER_KEY", "Bb"),
            ("MODE_MASTER_OCTAVE", "12"),
            ("MODE_MASTER_MODE", "Blues"),
            ("MODE_MASTER_BPM", "fast"),
        ]));
        assert_eq!(settings, Settings::default());
    }
}
