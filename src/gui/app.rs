use std::path::PathBuf;
use std::time::Instant;

use eframe::egui;
use tokio::sync::broadcast;

use crate::core::{Error, KeyMap, KeyMapStore, SettingsEditor};
use crate::gui::controls::{ControlsAction, ControlsOverlay};
use crate::gui::settings_dialog::{self, SettingsAction};
use crate::hotkeys::{self, KeyCommand};
use crate::video::{extractor, ExportEvent, ExportManager, PlaybackController};

const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mkv", "avi", "mov", "webm"];

pub struct EzyGrabApp {
    keymap: KeyMap,
    store: KeyMapStore,
    playback: PlaybackController,
    exporter: ExportManager,
    export_receiver: broadcast::Receiver<ExportEvent>,
    settings_editor: Option<SettingsEditor>,
    controls: ControlsOverlay,
    status_message: String,
    last_frame: Instant,
}

impl EzyGrabApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        video_file: Option<PathBuf>,
    ) -> anyhow::Result<Self> {
        let mut visuals = egui::Visuals::dark();
        visuals.override_text_color = Some(egui::Color32::WHITE);
        cc.egui_ctx.set_visuals(visuals);

        let store = KeyMapStore::new();
        let keymap = match store.load() {
            Ok(map) => map,
            Err(e @ Error::Config { .. }) => {
                log::warn!("Could not read settings: {}; continuing with defaults", e);
                KeyMap::default()
            }
            Err(e) => return Err(e.into()),
        };

        let (exporter, export_receiver) = ExportManager::new();

        let video_file = video_file.or_else(|| {
            rfd::FileDialog::new()
                .add_filter("video", VIDEO_EXTENSIONS)
                .pick_file()
        });
        let mut playback = PlaybackController::new();
        match video_file {
            Some(path) => playback.open(&path)?,
            None => anyhow::bail!("no video file selected"),
        }

        Ok(Self {
            keymap,
            store,
            playback,
            exporter,
            export_receiver,
            settings_editor: None,
            controls: ControlsOverlay::new(),
            status_message: String::new(),
            last_frame: Instant::now(),
        })
    }

    /// Key dispatch. Returns whether the press was ours.
    fn dispatch_key(&mut self, key: egui::Key) -> bool {
        match hotkeys::resolve(key, &self.keymap) {
            Some(KeyCommand::TogglePlayback) => {
                self.playback.toggle_playback();
                true
            }
            Some(KeyCommand::Grab(seconds)) => {
                self.request_grab(seconds);
                true
            }
            None => false,
        }
    }

    fn request_grab(&mut self, seconds: u32) {
        let Some(session) = self.playback.session() else {
            return;
        };
        let Some(request) = extractor::grab(&session, seconds) else {
            return;
        };

        let span = format!("{}s - {}s", request.start as u64, request.end as u64);
        match self.exporter.export(request) {
            Ok(_) => self.status_message = format!("Grabbing {}", span),
            Err(e) => self.status_message = format!("Grab failed: {}", e),
        }
    }

    fn drain_export_events(&mut self) {
        loop {
            match self.export_receiver.try_recv() {
                Ok(ExportEvent::Finished { id, output }) => {
                    log::debug!("Export {} acknowledged", id);
                    self.status_message = format!("Saved {}", output.display());
                }
                Ok(ExportEvent::Failed { id, output, reason }) => {
                    log::debug!("Export {} acknowledged", id);
                    self.status_message =
                        format!("Export of {} failed: {}", output.display(), reason);
                }
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                    log::warn!("Dropped {} export events", skipped);
                }
                Err(_) => break,
            }
        }
    }

    fn open_video_dialog(&mut self) {
        let picked = rfd::FileDialog::new()
            .add_filter("video", VIDEO_EXTENSIONS)
            .pick_file();
        if let Some(path) = picked {
            match self.playback.open(&path) {
                Ok(()) => self.status_message = format!("Opened {}", path.display()),
                Err(e) => {
                    log::error!("Could not open {}: {}", path.display(), e);
                    self.status_message = format!("Could not open {}: {}", path.display(), e);
                }
            }
        }
    }

    fn open_settings(&mut self) {
        self.playback.pause();
        self.settings_editor = Some(SettingsEditor::open(&self.keymap));
        self.controls.show_now();
    }

    fn commit_settings(&mut self) {
        let Some(editor) = self.settings_editor.take() else {
            return;
        };
        self.keymap = editor.into_staged();
        match self.store.save(&self.keymap) {
            Ok(()) => self.status_message = "Settings saved".to_owned(),
            Err(e) => {
                log::error!("Failed to save settings: {}", e);
                self.status_message = format!("Could not save settings: {}", e);
            }
        }
    }

    fn cancel_settings(&mut self) {
        self.settings_editor = None;
    }

    fn shortcut_legend(&self) -> String {
        self.keymap
            .iter()
            .map(|(key, seconds)| format!("{}: {}s", key, seconds))
            .collect::<Vec<_>>()
            .join("   ")
    }
}

impl eframe::App for EzyGrabApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let delta = self.last_frame.elapsed().as_secs_f64();
        self.last_frame = Instant::now();
        self.playback.update_time(delta);
        self.exporter.drain();
        self.drain_export_events();

        // The settings window owns the keyboard while it is open.
        if self.settings_editor.is_none() {
            let pressed: Vec<egui::Key> = ctx.input(|i| {
                i.events
                    .iter()
                    .filter_map(|event| match event {
                        egui::Event::Key {
                            key,
                            pressed: true,
                            repeat: false,
                            ..
                        } => Some(*key),
                        _ => None,
                    })
                    .collect()
            });
            for key in pressed {
                self.dispatch_key(key);
            }
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.centered_and_justified(|ui| {
                ui.vertical_centered(|ui| {
                    if let Some(path) = self.playback.video_path() {
                        ui.heading(
                            path.file_name()
                                .map(|name| name.to_string_lossy().into_owned())
                                .unwrap_or_else(|| path.display().to_string()),
                        );
                        ui.label(
                            egui::RichText::new(format!(
                                "{} / {}",
                                crate::gui::controls::format_time(self.playback.position()),
                                crate::gui::controls::format_time(self.playback.duration())
                            ))
                            .size(32.0),
                        );
                        ui.add_space(8.0);
                        ui.label(self.shortcut_legend());
                    }
                    if !self.status_message.is_empty() {
                        ui.add_space(12.0);
                        ui.label(&self.status_message);
                    }
                    let active = self.exporter.active_count();
                    if active > 0 {
                        ui.add_space(4.0);
                        ui.label(format!("{} export(s) in flight", active));
                    }
                });
            });
        });

        if let Some(action) = self.controls.ui(ctx, &mut self.playback) {
            match action {
                ControlsAction::OpenVideo => self.open_video_dialog(),
                ControlsAction::OpenSettings => self.open_settings(),
            }
        }

        if let Some(editor) = &mut self.settings_editor {
            match settings_dialog::settings_window(ctx, editor) {
                Some(SettingsAction::Save) => self.commit_settings(),
                Some(SettingsAction::Cancel) => self.cancel_settings(),
                None => {}
            }
        }

        // Keep the clock, fade animation, and export status moving even
        // without input events.
        ctx.request_repaint_after(std::time::Duration::from_millis(33));
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.exporter.shutdown();
    }
}
