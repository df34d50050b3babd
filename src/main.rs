#[cfg(feature = "gui")]
use eframe::egui;

#[cfg(feature = "gui")]
use mode_master::{
    config::OCTAVES, AudioOutput, MidiOutputDevice, Mode, PitchClass, PlaybackEvent,
    PlaybackSession, Sequencer, Settings, TempoDebouncer,
};

#[cfg(feature = "gui")]
fn main() -> Result<(), eframe::Error> {
    init_tracing();

    let settings = Settings::from_env();
    let app = match SequencerApp::new(settings) {
        Ok(app) => app,
        Err(e) => {
            tracing::error!("invalid startup configuration: {}", e);
            std::process::exit(1);
        }
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 820.0])
            .with_title("Mode Master"),
        ..Default::default()
    };

    eframe::run_native("Mode Master", options, Box::new(|_cc| Ok(Box::new(app))))
}

#[cfg(not(feature = "gui"))]
fn main() {
    init_tracing();
    tracing::error!("This binary requires the 'gui' feature to be enabled");
    std::process::exit(1);
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}

#[cfg(feature = "gui")]
struct SequencerApp {
    sequencer: Sequencer,
    audio_output: AudioOutput,
    midi_output: MidiOutputDevice,
    playback: Option<PlaybackSession>,
    tempo: TempoDebouncer,

    // UI state
    available_midi_ports: Vec<String>,
    selected_port: Option<usize>,
    current_column: Option<usize>,
    slider_bpm: f32,
}

#[cfg(feature = "gui")]
impl SequencerApp {
    fn new(settings: Settings) -> Result<Self, mode_master::TheoryError> {
        let midi_output = MidiOutputDevice::new(settings.midi_client_name.clone());
        let available_midi_ports = midi_output.available_ports();
        let sequencer = Sequencer::new(&settings)?;

        Ok(Self {
            slider_bpm: sequencer.bpm(),
            sequencer,
            audio_output: AudioOutput::default(),
            midi_output,
            playback: None,
            tempo: TempoDebouncer::new(settings.tempo_debounce),
            available_midi_ports,
            selected_port: None,
            current_column: None,
        })
    }

    fn handle_playback_events(&mut self) {
        let Some(session) = &self.playback else {
            return;
        };

        for event in session.poll_events() {
            match event {
                PlaybackEvent::StepAdvanced(step) => {
                    self.current_column = Some(step);
                }
                PlaybackEvent::NoteOn(note, velocity) => {
                    self.audio_output.note_on(note);
                    if let Err(e) = self.midi_output.send_note_on(note, velocity) {
                        tracing::warn!("{}", e);
                    }
                }
                PlaybackEvent::NoteOff(note) => {
                    self.audio_output.note_off(note);
                    if let Err(e) = self.midi_output.send_note_off(note) {
                        tracing::warn!("{}", e);
                    }
                }
            }
        }
    }

    fn start_playback(&mut self) {
        self.playback = Some(PlaybackSession::start(
            self.sequencer.bpm(),
            self.sequencer.pattern_state().clone(),
        ));
    }

    fn stop_playback(&mut self) {
        if let Some(mut session) = self.playback.take() {
            session.stop();
        }
        self.current_column = None;
        self.audio_output.all_notes_off();
        for notes in self.sequencer.playback_columns() {
            for note in notes {
                let _ = self.midi_output.send_note_off(note);
            }
        }
    }

    fn is_playing(&self) -> bool {
        self.playback.as_ref().is_some_and(PlaybackSession::is_running)
    }

    fn apply_tempo(&mut self) {
        if let Some(bpm) = self.tempo.poll(std::time::Instant::now()) {
            self.sequencer.set_bpm(bpm);
            if let Some(session) = &self.playback {
                session.set_bpm(self.sequencer.bpm());
            }
        }
    }

    fn change_pitches(&mut self, change: impl FnOnce(&mut Sequencer) -> Result<(), mode_master::TheoryError>) {
        if self.is_playing() {
            self.stop_playback();
        }
        if let Err(e) = change(&mut self.sequencer) {
            tracing::warn!("{}", e);
        }
    }

    fn generate(&mut self) {
        if let Err(e) = self.sequencer.generate(&mut rand::rng()) {
            tracing::warn!("{}", e);
        }
    }

    fn controls(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let mut key = self.sequencer.key();
            ui.label("Key");
            egui::ComboBox::from_id_source("key")
                .selected_text(key.name())
                .show_ui(ui, |ui| {
                    for class in PitchClass::ALL {
                        ui.selectable_value(&mut key, class, class.name());
                    }
                });
            if key != self.sequencer.key() {
                self.change_pitches(|s| s.set_key(key));
            }

            let mut octave = self.sequencer.octave();
            ui.label("Octave");
            egui::ComboBox::from_id_source("octave")
                .selected_text(octave.to_string())
                .show_ui(ui, |ui| {
                    for o in OCTAVES {
                        ui.selectable_value(&mut octave, o, o.to_string());
                    }
                });
            if octave != self.sequencer.octave() {
                self.change_pitches(|s| s.set_octave(octave));
            }

            let mut mode = self.sequencer.mode();
            ui.label("Mode");
            egui::ComboBox::from_id_source("mode")
                .selected_text(mode.name())
                .show_ui(ui, |ui| {
                    for m in Mode::ALL {
                        ui.selectable_value(&mut mode, m, m.name());
                    }
                });
            if mode != self.sequencer.mode() {
                self.change_pitches(|s| s.set_mode(mode));
            }

            ui.add_space(20.0);

            ui.label("Notes:");
            let mut note_count = self.sequencer.note_count();
            let max_notes = self.sequencer.degrees().len().max(1);
            if ui
                .add(egui::Slider::new(&mut note_count, 1..=max_notes))
                .changed()
            {
                self.sequencer.set_note_count(note_count);
            }

            if ui.button("Generate").clicked() {
                self.generate();
            }
            if ui.button("Clear").clicked() {
                self.sequencer.clear();
            }
        });

        ui.add_space(10.0);

        // Transport controls
        ui.horizontal(|ui| {
            if self.is_playing() {
                if ui.button("⏸ Stop").clicked() {
                    self.stop_playback();
                }
            } else if ui.button("▶ Play").clicked() {
                self.start_playback();
            }

            ui.add_space(20.0);

            ui.label("BPM:");
            if ui
                .add(
                    egui::Slider::new(
                        &mut self.slider_bpm,
                        mode_master::config::MIN_BPM..=mode_master::config::MAX_BPM,
                    )
                    .step_by(1.0),
                )
                .changed()
            {
                self.tempo.submit(self.slider_bpm, std::time::Instant::now());
            }
        });
    }

    fn midi_selector(&mut self, ui: &mut egui::Ui) {
        let mut selected_port_changed = None;
        ui.horizontal(|ui| {
            ui.label("MIDI Output:");
            if self.available_midi_ports.is_empty() {
                ui.label("No MIDI ports available");
            } else {
                egui::ComboBox::from_id_source("midi")
                    .selected_text(
                        self.selected_port
                            .and_then(|i| self.available_midi_ports.get(i))
                            .map_or("Select port...", String::as_str),
                    )
                    .show_ui(ui, |ui| {
                        for (i, port_name) in self.available_midi_ports.iter().enumerate() {
                            if ui
                                .selectable_label(self.selected_port == Some(i), port_name)
                                .clicked()
                            {
                                selected_port_changed = Some(i);
                            }
                        }
                    });
            }
        });

        if let Some(port_idx) = selected_port_changed {
            match self.midi_output.connect(port_idx) {
                Ok(()) => self.selected_port = Some(port_idx),
                Err(e) => tracing::warn!("{}", e),
            }
        }
    }

    fn grid(&mut self, ui: &mut egui::Ui) {
        let mut clicked = None;

        ui.horizontal(|ui| {
            // Row labels, highlighted when the pitch belongs to the mode
            ui.vertical(|ui| {
                for cell in self.sequencer.grid().columns().first().into_iter().flatten() {
                    let text = egui::RichText::new(cell.pitch.to_string()).monospace();
                    let text = if self.sequencer.is_on_mode(cell.pitch) {
                        text.strong().color(egui::Color32::from_rgb(240, 200, 80))
                    } else {
                        text.weak()
                    };
                    ui.add_sized([48.0, 36.0], egui::Label::new(text));
                }
            });

            for (column_index, column) in self.sequencer.grid().columns().iter().enumerate() {
                let is_current = self.current_column == Some(column_index);
                ui.vertical(|ui| {
                    for (row_index, cell) in column.iter().enumerate() {
                        let fill = if cell.is_active {
                            egui::Color32::from_rgb(60, 60, 200)
                        } else if is_current {
                            egui::Color32::from_rgb(60, 110, 60)
                        } else {
                            egui::Color32::from_rgb(40, 40, 40)
                        };

                        let button = egui::Button::new(cell.pitch.to_string())
                            .min_size(egui::vec2(52.0, 36.0))
                            .fill(fill);

                        if ui.add(button).clicked() {
                            clicked = Some((column_index, row_index));
                        }
                    }
                });
            }
        });

        if let Some((column, row)) = clicked {
            self.sequencer.toggle(column, row);
        }
    }

    fn description(ui: &mut egui::Ui) {
        ui.label("Modes");
        for mode in Mode::ALL {
            ui.label(format!("{}: intervals {}", mode.name(), mode.interval_label()));
        }
    }
}

#[cfg(feature = "gui")]
impl eframe::App for SequencerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ctx.request_repaint();

        self.handle_playback_events();
        self.apply_tempo();

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Mode Master");
            ui.add_space(10.0);

            self.midi_selector(ui);
            ui.add_space(10.0);

            self.controls(ui);
            ui.add_space(20.0);

            self.grid(ui);

            ui.separator();
            ui.label("Click cells to enable/disable them, or Generate a pattern in the current mode");
            if !self.midi_output.is_connected() {
                ui.colored_label(
                    egui::Color32::YELLOW,
                    "⚠ No MIDI output connected - audio playback only",
                );
            }

            ui.separator();
            Self::description(ui);
        });
    }
}
