//! MIDI output using midir
use midir::{MidiOutput, MidiOutputConnection};
use thiserror::Error;

const NOTE_ON: u8 = 0x90;
const NOTE_OFF: u8 = 0x80;

#[derive(Debug, Error)]
pub enum MidiError {
    #[error("failed to create MIDI output: {0}")]
    Init(#[from] midir::InitError),

    #[error("no MIDI port at index {0}")]
    InvalidPort(usize),

    #[error("failed to connect: {0}")]
    Connect(String),

    #[error("MIDI data byte out of range: {0}")]
    OutOfRange(u8),

    #[error("failed to send: {0}")]
    Send(#[from] midir::SendError),
}

pub struct MidiOutputDevice {
    client_name: String,
    connection: Option<MidiOutputConnection>,
}

impl MidiOutputDevice {
    pub fn new(client_name: impl Into<String>) -> Self {
        Self {
            client_name: client_name.into(),
            connection: None,
        }
    }

    pub fn available_ports(&self) -> Vec<String> {
        match MidiOutput::new(&self.client_name) {
            Ok(midi_out) => midi_out
                .ports()
                .iter()
                .filter_map(|p| midi_out.port_name(p).ok())
                .collect(),
            Err(e) => {
                tracing::warn!("cannot list MIDI ports: {}", e);
                vec![]
            }
        }
    }

    pub fn connect(&mut self, port_index: usize) -> Result<(), MidiError> {
        let midi_out = MidiOutput::new(&self.client_name)?;

        let ports = midi_out.ports();
        let port = ports.get(port_index).ok_or(MidiError::InvalidPort(port_index))?;
        let port_name = midi_out.port_name(port).unwrap_or_default();

        let connection = midi_out
            .connect(port, "mode-master")
            .map_err(|e| MidiError::Connect(e.to_string()))?;

        tracing::info!(port = %port_name, "MIDI output connected");
        self.connection = Some(connection);
        Ok(())
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    pub fn send_note_on(&mut self, note: u8, velocity: u8) -> Result<(), MidiError> {
        let message = note_on_message(note, velocity)?;
        if let Some(ref mut conn) = self.connection {
            conn.send(&message)?;
        }
        Ok(())
    }

    pub fn send_note_off(&mut self, note: u8) -> Result<(), MidiError> {
        let message = note_off_message(note)?;
        if let Some(ref mut conn) = self.connection {
            conn.send(&message)?;
        }
        Ok(())
    }

    pub fn disconnect(&mut self) {
        if let Some(conn) = self.connection.take() {
            let _ = conn.close();
            tracing::info!("MIDI output disconnected");
        }
    }
}

fn data_byte(value: u8) -> Result<u8, MidiError> {
    if value > 0x7f {
        return Err(MidiError::OutOfRange(value));
    }
    Ok(value)
}

fn note_on_message(note: u8, velocity: u8) -> Result<[u8; 3], MidiError> {
    Ok([NOTE_ON, data_byte(note)?, data_byte(velocity)?])
}

fn note_off_message(note: u8) -> Result<[u8; 3], MidiError> {
    Ok([NOTE_OFF, data_byte(note)?, 0])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(note_on_message(60, 100).unwrap(), [0x90, 60, 100]);
        assert_eq!(note_off_message(64).unwrap(), [0x80, 64, 0]);
        assert_eq!(note_on_message(127, 127).unwrap(), [0x90, 127, 127]);
    }

    #[test]
    fn test_out_of_range_bytes_are_rejected() {
        assert!(matches!(note_on_message(200, 100), Err(MidiError::OutOfRange(200))));
        assert!(matches!(note_on_message(60, 128), Err(MidiError::OutOfRange(128))));
        assert!(matches!(note_off_message(128), Err(MidiError::OutOfRange(128))));
    }

    #[test]
    fn test_unconnected_sends_are_noops() {
        let mut device = MidiOutputDevice::new("test");
        assert!(!device.is_connected());
        assert!(device.send_note_on(60, 100).is_ok());
        assert!(device.send_note_off(60).is_ok());
        assert!(matches!(device.send_note_on(200, 100), Err(MidiError::OutOfRange(200))));
        device.disconnect();
    }
}
