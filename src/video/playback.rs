use std::path::{Path, PathBuf};

use crate::video::probe;

/// Snapshot of the open video at grab time: absolute source path plus the
/// playback position the grab ends at.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoSession {
    pub source: PathBuf,
    pub position: f64,
}

/// Clock-driven playback position for the open video.
///
/// The actual decoding lives in external tooling; this tracks where in the
/// file the user currently is and whether the clock is running.
pub struct PlaybackController {
    video_path: Option<PathBuf>,
    current_time: f64,
    total_duration: f64,
    is_playing: bool,
}

impl PlaybackController {
    pub fn new() -> Self {
        PlaybackController {
            video_path: None,
            current_time: 0.0,
            total_duration: 0.0,
            is_playing: false,
        }
    }

    /// Probes the file and starts playback from the beginning.
    pub fn open(&mut self, path: &Path) -> anyhow::Result<()> {
        let duration = probe::probe_duration(path)?;
        let absolute = path.canonicalize()?;
        log::info!("Opened {} ({:.1}s)", absolute.display(), duration);

        self.video_path = Some(absolute);
        self.total_duration = duration;
        self.current_time = 0.0;
        self.is_playing = true;
        Ok(())
    }

    pub fn video_path(&self) -> Option<&Path> {
        self.video_path.as_deref()
    }

    pub fn has_video(&self) -> bool {
        self.video_path.is_some()
    }

    pub fn position(&self) -> f64 {
        self.current_time
    }

    pub fn duration(&self) -> f64 {
        self.total_duration
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn play(&mut self) {
        if self.has_video() {
            self.is_playing = true;
        }
    }

    pub fn pause(&mut self) {
        self.is_playing = false;
    }

    pub fn toggle_playback(&mut self) {
        if self.is_playing {
            self.pause();
        } else {
            self.play();
        }
    }

    pub fn seek_to(&mut self, time: f64) {
        self.current_time = time.clamp(0.0, self.total_duration);
    }

    /// Advances the clock while playing; pauses at end of stream.
    pub fn update_time(&mut self, delta_seconds: f64) {
        if self.is_playing {
            self.current_time += delta_seconds;
            if self.current_time >= self.total_duration {
                self.current_time = self.total_duration;
                self.is_playing = false;
            }
        }
    }

    pub fn session(&self) -> Option<VideoSession> {
        self.video_path.as_ref().map(|path| VideoSession {
            source: path.clone(),
            position: self.current_time,
        })
    }
}

impl Default for PlaybackController {
    fn default() -> Self {
        Self::new()
    }
}
