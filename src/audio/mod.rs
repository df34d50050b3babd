//! Polyphonic sine output using cpal
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use std::sync::{Arc, Mutex, PoisonError};

const VOICE_GAIN: f32 = 0.15;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Voice {
    note: u8,
    frequency: f32,
    phase: f32,
}

type Voices = Arc<Mutex<Vec<Voice>>>;

pub struct AudioOutput {
    stream: Option<cpal::Stream>,
    voices: Voices,
}

impl AudioOutput {
    pub fn new() -> Option<Self> {
        let voices: Voices = Arc::new(Mutex::new(Vec::new()));
        let stream = Self::setup_audio_stream(Arc::clone(&voices))?;

        Some(Self {
            stream: Some(stream),
            voices,
        })
    }

    fn setup_audio_stream(voices: Voices) -> Option<cpal::Stream> {
        let host = cpal::default_host();
        let device = host.default_output_device()?;
        let config = device.default_output_config().ok()?;

        let sample_rate = config.sample_rate().0 as f32;
        let channels = config.channels() as usize;

        let stream = match config.sample_format() {
            cpal::SampleFormat::F32 => device.build_output_stream(
                &config.into(),
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    let mut voices = voices.lock().unwrap_or_else(PoisonError::into_inner);
                    for frame in data.chunks_mut(channels.max(1)) {
                        let value = mix(&mut voices, sample_rate);
                        for sample in frame.iter_mut() {
                            *sample = value;
                        }
                    }
                },
                |err| tracing::error!("audio stream error: {}", err),
                None,
            ),
            format => {
                tracing::warn!(?format, "unsupported sample format, audio disabled");
                return None;
            }
        };

        match stream {
            Ok(stream) => {
                if let Err(e) = stream.play() {
                    tracing::warn!("failed to start audio stream: {}", e);
                }
                Some(stream)
            }
            Err(e) => {
                tracing::warn!("failed to build audio stream: {}", e);
                None
            }
        }
    }

    pub fn note_on(&mut self, note: u8) {
        let mut voices = self.voices.lock().unwrap_or_else(PoisonError::into_inner);
        if !voices.iter().any(|v| v.note == note) {
            voices.push(Voice {
                note,
                frequency: midi_note_to_frequency(note),
                phase: 0.0,
            });
        }
    }

    pub fn note_off(&mut self, note: u8) {
        let mut voices = self.voices.lock().unwrap_or_else(PoisonError::into_inner);
        voices.retain(|v| v.note != note);
    }

    pub fn all_notes_off(&mut self) {
        self.voices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    pub fn active_notes(&self) -> Vec<u8> {
        self.voices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|v| v.note)
            .collect()
    }

    pub fn is_enabled(&self) -> bool {
        self.stream.is_some()
    }
}

impl Default for AudioOutput {
    fn default() -> Self {
        Self::new().unwrap_or_else(|| {
            tracing::warn!("no audio output device, running silent");
            Self {
                stream: None,
                voices: Arc::new(Mutex::new(Vec::new())),
            }
        })
    }
}

/// Next sample of all voices summed, advancing each phase.
fn mix(voices: &mut [Voice], sample_rate: f32) -> f32 {
    let mut value = 0.0;
    for voice in voices.iter_mut() {
        value += (voice.phase * 2.0 * std::f32::consts::PI).sin() * VOICE_GAIN;
        voice.phase += voice.frequency / sample_rate;
        if voice.phase >= 1.0 {
            voice.phase -= 1.0;
        }
    }
    value.clamp(-1.0, 1.0)
}

pub fn midi_note_to_frequency(note: u8) -> f32 {
    440.0 * 2.0_f32.powf((note as f32 - 69.0) / 12.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn silent() -> AudioOutput {
        AudioOutput {
            stream: None,
            voices: Arc::new(Mutex::new(Vec::new())),
        }
    }

    #[test]
    fn test_frequency() {
        assert_eq!(midi_note_to_frequency(69), 440.0);
        assert!((midi_note_to_frequency(60) - 261.63).abs() < 0.01);
    }

    #[test]
    fn test_voices_are_polyphonic() {
        let mut out = silent();
        out.note_on(60);
        out.note_on(64);
        out.note_on(60);
        assert_eq!(out.active_notes(), vec![60, 64]);

        out.note_off(60);
        assert_eq!(out.active_notes(), vec![64]);

        out.all_notes_off();
        assert!(out.active_notes().is_empty());
        assert!(!out.is_enabled());
    }

    #[test]
    fn test_mix_silence_and_phase_wrap() {
        assert_eq!(mix(&mut [], 44_100.0), 0.0);

        let mut voices = [Voice {
            note: 69,
            frequency: 440.0,
            phase: 0.0,
        }];
        for _ in 0..1000 {
            let v = mix(&mut voices, 44_100.0);
            assert!(v.abs() <= VOICE_GAIN + f32::EPSILON);
            assert!((0.0..1.0).contains(&voices[0].phase));
        }
    }
}
