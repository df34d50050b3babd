//! Playback session - steps through the grid columns on a timer thread
//!
//! A session is created per press of Play and owned by the caller. Stopping
//! or dropping it ends the timer thread.
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::{Duration, Instant};

use super::PatternState;
use crate::config::clamp_bpm;

pub const NOTE_VELOCITY: u8 = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackEvent {
    StepAdvanced(usize),
    NoteOn(u8, u8), // note, velocity
    NoteOff(u8),    // note
}

/// One eighth note per step. Tempo is clamped to the supported range.
pub fn step_duration(bpm: f32) -> Duration {
    Duration::from_secs_f32(60.0 / clamp_bpm(bpm) / 2.0)
}

pub struct PlaybackSession {
    receiver: Receiver<PlaybackEvent>,
    is_running: Arc<Mutex<bool>>,
    bpm: Arc<Mutex<f32>>,
}

impl PlaybackSession {
    pub fn start(bpm: f32, pattern: PatternState) -> Self {
        let (sender, receiver) = channel();
        let is_running = Arc::new(Mutex::new(true));
        let bpm = Arc::new(Mutex::new(clamp_bpm(bpm)));

        tracing::info!(bpm = *lock(&bpm), "playback started");
        spawn_timer(sender, Arc::clone(&is_running), Arc::clone(&bpm), pattern);

        Self {
            receiver,
            is_running,
            bpm,
        }
    }

    pub fn set_bpm(&self, bpm: f32) {
        let bpm = clamp_bpm(bpm);
        *lock(&self.bpm) = bpm;
        tracing::debug!(bpm, "playback tempo changed");
    }

    pub fn bpm(&self) -> f32 {
        *lock(&self.bpm)
    }

    pub fn stop(&mut self) {
        let mut running = lock(&self.is_running);
        if *running {
            *running = false;
            tracing::info!("playback stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        *lock(&self.is_running)
    }

    pub fn poll_events(&self) -> Vec<PlaybackEvent> {
        self.receiver.try_iter().collect()
    }
}

impl Drop for PlaybackSession {
    fn drop(&mut self) {
        self.stop();
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn spawn_timer(
    sender: Sender<PlaybackEvent>,
    is_running: Arc<Mutex<bool>>,
    bpm: Arc<Mutex<f32>>,
    pattern: PatternState,
) {
    thread::spawn(move || {
        let mut current_step = 0;
        // first step sounds immediately
        let mut last_step_time: Option<Instant> = None;

        while *lock(&is_running) {
            let now = Instant::now();
            let step = step_duration(*lock(&bpm));

            if last_step_time.map_or(true, |t| now.duration_since(t) >= step) {
                let notes = {
                    let columns = lock(&pattern);
                    if columns.is_empty() {
                        Vec::new()
                    } else {
                        current_step %= columns.len();
                        columns[current_step].clone()
                    }
                };

                if sender.send(PlaybackEvent::StepAdvanced(current_step)).is_err() {
                    break;
                }

                let note_duration = step / 2;
                for note in notes {
                    let _ = sender.send(PlaybackEvent::NoteOn(note, NOTE_VELOCITY));

                    let sender_clone = sender.clone();
                    thread::spawn(move || {
                        thread::sleep(note_duration);
                        let _ = sender_clone.send(PlaybackEvent::NoteOff(note));
                    });
                }

                current_step += 1;
                last_step_time = Some(now);
            }

            thread::sleep(Duration::from_millis(1));
        }
    });
}
