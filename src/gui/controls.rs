use std::time::{Duration, Instant};

use eframe::egui;

use crate::video::PlaybackController;

/// Buttons on the overlay that the app has to act on itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlsAction {
    OpenVideo,
    OpenSettings,
}

/// Fading control bar over the video surface.
///
/// A single hide deadline models the idle timer: pointer motion (or an
/// explicit show) pushes the deadline out again, so at most one pending
/// hide exists at any time.
pub struct ControlsOverlay {
    hide_deadline: Instant,
}

impl ControlsOverlay {
    pub const IDLE_HIDE: Duration = Duration::from_secs(2);
    const FADE_SECONDS: f32 = 0.5;

    pub fn new() -> Self {
        ControlsOverlay {
            hide_deadline: Instant::now() + Self::IDLE_HIDE,
        }
    }

    /// Cancels the pending hide and schedules a fresh one.
    pub fn show_now(&mut self) {
        self.hide_deadline = Instant::now() + Self::IDLE_HIDE;
    }

    pub fn is_visible(&self) -> bool {
        Instant::now() < self.hide_deadline
    }

    pub fn ui(
        &mut self,
        ctx: &egui::Context,
        playback: &mut PlaybackController,
    ) -> Option<ControlsAction> {
        let pointer_moved = ctx.input(|i| i.pointer.delta() != egui::Vec2::ZERO);
        if pointer_moved {
            self.show_now();
        }

        let opacity = ctx.animate_bool_with_time(
            egui::Id::new("controls_fade"),
            self.is_visible(),
            Self::FADE_SECONDS,
        );
        if opacity <= 0.0 {
            return None;
        }

        let mut action = None;
        egui::Area::new(egui::Id::new("controls_overlay"))
            .anchor(egui::Align2::CENTER_BOTTOM, egui::vec2(0.0, -16.0))
            .show(ctx, |ui| {
                ui.set_opacity(opacity);
                egui::Frame::popup(&ctx.style()).show(ui, |ui| {
                    ui.horizontal(|ui| {
                        if ui.button("Open...").clicked() {
                            action = Some(ControlsAction::OpenVideo);
                        }

                        let play_label = if playback.is_playing() { "Pause" } else { "Play" };
                        if ui
                            .add_enabled(playback.has_video(), egui::Button::new(play_label))
                            .clicked()
                        {
                            playback.toggle_playback();
                        }

                        if playback.has_video() {
                            let mut position = playback.position();
                            let slider = egui::Slider::new(&mut position, 0.0..=playback.duration())
                                .show_value(false);
                            if ui.add(slider).changed() {
                                playback.seek_to(position);
                            }
                            ui.label(format!(
                                "{} / {}",
                                format_time(playback.position()),
                                format_time(playback.duration())
                            ));
                        }

                        if ui.button("Settings").clicked() {
                            action = Some(ControlsAction::OpenSettings);
                        }
                    });
                });
            });

        action
    }
}

impl Default for ControlsOverlay {
    fn default() -> Self {
        Self::new()
    }
}

pub fn format_time(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlay_starts_visible() {
        assert!(ControlsOverlay::new().is_visible());
    }

    #[test]
    fn test_overlay_hides_after_deadline_and_reshows() {
        let mut overlay = ControlsOverlay::new();
        overlay.hide_deadline = Instant::now() - Duration::from_millis(1);
        assert!(!overlay.is_visible());

        overlay.show_now();
        assert!(overlay.is_visible());
    }

    #[test]
    fn test_time_formatting() {
        assert_eq!(format_time(0.0), "0:00");
        assert_eq!(format_time(5.4), "0:05");
        assert_eq!(format_time(65.0), "1:05");
        assert_eq!(format_time(3600.0), "60:00");
        assert_eq!(format_time(-2.0), "0:00");
    }
}
