//! Sequencer state - key, mode and the pitch/step grid
//!
//! Grid rows run high-to-low: row 0 is the top pitch of the chromatic
//! sequence and the last row is the root.
use std::sync::{Arc, Mutex, PoisonError};

use rand::Rng;

use crate::config::{clamp_bpm, Settings};
use crate::error::TheoryError;
use crate::generator::{self, GeneratedPattern};
use crate::theory::{build_chromatic, select_degrees, ChromaticSequence, Mode, Pitch, PitchClass};

pub mod playback;
pub mod tempo;

/// MIDI notes to sound on each step.
pub type PatternState = Arc<Mutex<Vec<Vec<u8>>>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub pitch: Pitch,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    columns: Vec<Vec<Cell>>,
}

impl Grid {
    pub fn new(chromatic: &ChromaticSequence, step_count: usize) -> Self {
        let column: Vec<Cell> = chromatic
            .pitches()
            .iter()
            .rev()
            .map(|&pitch| Cell {
                pitch,
                is_active: false,
            })
            .collect();

        Self {
            columns: vec![column; step_count],
        }
    }

    /// Fresh grid with one active cell per assigned step.
    pub fn from_pattern(
        chromatic: &ChromaticSequence,
        step_count: usize,
        pattern: &GeneratedPattern,
    ) -> Result<Self, TheoryError> {
        let mut grid = Self::new(chromatic, step_count);
        for &(step, pitch) in &pattern.steps {
            let row = grid.row_of(pitch).ok_or(TheoryError::PitchNotInGrid(pitch))?;
            if let Some(cell) = grid.columns.get_mut(step).and_then(|c| c.get_mut(row)) {
                cell.is_active = true;
            }
        }
        Ok(grid)
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn height(&self) -> usize {
        self.columns.first().map_or(0, Vec::len)
    }

    pub fn columns(&self) -> &[Vec<Cell>] {
        &self.columns
    }

    pub fn cell(&self, column: usize, row: usize) -> Option<&Cell> {
        self.columns.get(column).and_then(|c| c.get(row))
    }

    pub fn get(&self, column: usize, row: usize) -> bool {
        self.cell(column, row).is_some_and(|c| c.is_active)
    }

    pub fn row_of(&self, pitch: Pitch) -> Option<usize> {
        self.columns
            .first()
            .and_then(|c| c.iter().position(|cell| cell.pitch == pitch))
    }

    /// A copy with a single cell flipped. `None` if the cell does not exist.
    pub fn toggled(&self, column: usize, row: usize) -> Option<Self> {
        self.cell(column, row)?;
        let mut next = self.clone();
        let cell = &mut next.columns[column][row];
        cell.is_active = !cell.is_active;
        Some(next)
    }

    pub fn clear(&mut self) {
        for column in &mut self.columns {
            for cell in column {
                cell.is_active = false;
            }
        }
    }

    pub fn active_pitches(&self, column: usize) -> Vec<Pitch> {
        self.columns
            .get(column)
            .map(|c| c.iter().filter(|cell| cell.is_active).map(|cell| cell.pitch).collect())
            .unwrap_or_default()
    }

    pub fn playback_columns(&self) -> Vec<Vec<u8>> {
        (0..self.width())
            .map(|column| {
                self.active_pitches(column)
                    .into_iter()
                    .filter_map(Pitch::midi_note)
                    .collect()
            })
            .collect()
    }
}

pub struct Sequencer {
    key: PitchClass,
    octave: i32,
    mode: Mode,
    chromatic: ChromaticSequence,
    degrees: Vec<Pitch>,
    grid: Grid,
    pattern_state: PatternState,
    step_count: usize,
    note_count: usize,
    bpm: f32,
}

impl Sequencer {
    pub fn new(settings: &Settings) -> Result<Self, TheoryError> {
        let chromatic = build_chromatic(settings.key, settings.octave);
        let degrees = select_degrees(&chromatic, settings.mode.steps())?;
        let grid = Grid::new(&chromatic, settings.step_count);
        let pattern_state = Arc::new(Mutex::new(grid.playback_columns()));

        Ok(Self {
            key: settings.key,
            octave: settings.octave,
            mode: settings.mode,
            chromatic,
            degrees,
            grid,
            pattern_state,
            step_count: settings.step_count,
            note_count: settings.note_count.clamp(1, settings.mode.steps().len()),
            bpm: clamp_bpm(settings.bpm),
        })
    }

    pub fn key(&self) -> PitchClass {
        self.key
    }

    pub fn octave(&self) -> i32 {
        self.octave
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn chromatic(&self) -> &ChromaticSequence {
        &self.chromatic
    }

    pub fn degrees(&self) -> &[Pitch] {
        &self.degrees
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn pattern_state(&self) -> &PatternState {
        &self.pattern_state
    }

    pub fn set_key(&mut self, key: PitchClass) -> Result<(), TheoryError> {
        self.rebuild_pitches(key, self.octave)
    }

    pub fn set_octave(&mut self, octave: i32) -> Result<(), TheoryError> {
        self.rebuild_pitches(self.key, octave)
    }

    /// Keeps the grid; only the highlighted scale degrees change.
    pub fn set_mode(&mut self, mode: Mode) -> Result<(), TheoryError> {
        self.degrees = select_degrees(&self.chromatic, mode.steps())?;
        self.mode = mode;
        tracing::debug!(%mode, degrees = ?self.degrees, "mode changed");
        Ok(())
    }

    /// Nothing changes unless the new pitch set derives cleanly.
    fn rebuild_pitches(&mut self, key: PitchClass, octave: i32) -> Result<(), TheoryError> {
        let chromatic = build_chromatic(key, octave);
        let degrees = select_degrees(&chromatic, self.mode.steps())?;
        self.key = key;
        self.octave = octave;
        self.chromatic = chromatic;
        self.degrees = degrees;
        self.grid = Grid::new(&self.chromatic, self.step_count);
        self.update_pattern_state();
        Ok(())
    }

    pub fn is_on_mode(&self, pitch: Pitch) -> bool {
        self.degrees.contains(&pitch)
    }

    pub fn note_count(&self) -> usize {
        self.note_count
    }

    pub fn set_note_count(&mut self, note_count: usize) {
        self.note_count = note_count.clamp(1, self.degrees.len().max(1));
    }

    pub fn bpm(&self) -> f32 {
        self.bpm
    }

    pub fn set_bpm(&mut self, bpm: f32) {
        self.bpm = clamp_bpm(bpm);
    }

    pub fn toggle(&mut self, column: usize, row: usize) {
        if let Some(grid) = self.grid.toggled(column, row) {
            self.grid = grid;
            self.update_pattern_state();
        }
    }

    pub fn clear(&mut self) {
        self.grid.clear();
        self.update_pattern_state();
    }

    /// Replace the grid with a freshly generated pattern.
    pub fn generate<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<GeneratedPattern, TheoryError> {
        let pattern = generator::generate(&self.degrees, self.note_count, self.step_count, rng)?;
        self.grid = Grid::from_pattern(&self.chromatic, self.step_count, &pattern)?;
        self.update_pattern_state();
        Ok(pattern)
    }

    pub fn playback_columns(&self) -> Vec<Vec<u8>> {
        self.grid.playback_columns()
    }

    pub fn update_pattern_state(&mut self) {
        let mut shared = self
            .pattern_state
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        *shared = self.grid.playback_columns();
    }
}
