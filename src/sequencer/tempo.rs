//! Coalesces rapid tempo changes (e.g. slider drags) into one update
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct TempoDebouncer {
    window: Duration,
    pending: Option<(f32, Instant)>,
}

impl TempoDebouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
        }
    }

    /// Record a new value; restarts the quiet window.
    pub fn submit(&mut self, bpm: f32, now: Instant) {
        self.pending = Some((bpm, now));
    }

    /// The latest value once no submit has happened for `window`.
    pub fn poll(&mut self, now: Instant) -> Option<f32> {
        match self.pending {
            Some((bpm, at)) if now.saturating_duration_since(at) >= self.window => {
                self.pending = None;
                Some(bpm)
            }
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_millis(200);

    #[test]
    fn test_last_value_wins() {
        let start = Instant::now();
        let mut debouncer = TempoDebouncer::new(WINDOW);
        debouncer.submit(80.0, start);
        debouncer.submit(90.0, start + Duration::from_millis(50));
        debouncer.submit(100.0, start + Duration::from_millis(100));

        assert_eq!(debouncer.poll(start + Duration::from_millis(250)), None);
        assert_eq!(debouncer.poll(start + Duration::from_millis(300)), Some(100.0));
        assert_eq!(debouncer.poll(start + Duration::from_millis(400)), None);
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn test_nothing_submitted() {
        let mut debouncer = TempoDebouncer::new(WINDOW);
        assert_eq!(debouncer.poll(Instant::now()), None);
    }
}
