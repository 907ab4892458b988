use std::path::PathBuf;
use std::process::Command;
use std::thread::{self, JoinHandle};

use tokio::sync::broadcast;
use uuid::Uuid;

use crate::core::error::{Error, Result};
use crate::video::extractor::GrabRequest;

/// Outcome of a background export, broadcast back to the UI thread.
#[derive(Debug, Clone)]
pub enum ExportEvent {
    Finished { id: Uuid, output: PathBuf },
    Failed { id: Uuid, output: PathBuf, reason: String },
}

struct ExportJob {
    id: Uuid,
    handle: JoinHandle<()>,
}

/// Tracked set of in-flight subclip exports.
///
/// Each export runs ffmpeg in its own worker thread; the worker owns its
/// parameters, so nothing is shared across threads. At most
/// `MAX_CONCURRENT` ffmpeg processes run at once; further grabs are refused
/// until one drains.
pub struct ExportManager {
    jobs: Vec<ExportJob>,
    event_sender: broadcast::Sender<ExportEvent>,
}

impl ExportManager {
    pub const MAX_CONCURRENT: usize = 4;

    pub fn new() -> (Self, broadcast::Receiver<ExportEvent>) {
        let (event_sender, event_receiver) = broadcast::channel(32);
        (
            ExportManager {
                jobs: Vec::new(),
                event_sender,
            },
            event_receiver,
        )
    }

    /// Creates the output directory and dispatches the export to a worker
    /// thread. Returns the job id, or refuses when the concurrency cap is
    /// reached.
    pub fn export(&mut self, request: GrabRequest) -> Result<Uuid> {
        self.drain();
        if self.jobs.len() >= Self::MAX_CONCURRENT {
            return Err(Error::Busy {
                active: self.jobs.len(),
                max: Self::MAX_CONCURRENT,
            });
        }

        if let Some(dir) = request.output.parent() {
            std::fs::create_dir_all(dir)?;
        }

        let id = Uuid::new_v4();
        let output = request.output.clone();
        let sender = self.event_sender.clone();
        log::info!(
            "Export {} dispatched: {} [{:.3}s..{:.3}s] -> {}",
            id,
            request.source.display(),
            request.start,
            request.end,
            output.display()
        );

        let handle = thread::spawn(move || match write_subclip(&request) {
            Ok(()) => {
                log::info!("Export {} finished: {}", id, request.output.display());
                let _ = sender.send(ExportEvent::Finished {
                    id,
                    output: request.output.clone(),
                });
            }
            Err(e) => {
                log::error!("Export {} failed: {}", id, e);
                let _ = sender.send(ExportEvent::Failed {
                    id,
                    output: request.output.clone(),
                    reason: e.to_string(),
                });
            }
        });

        self.jobs.push(ExportJob { id, handle });
        Ok(id)
    }

    /// Reaps finished workers; returns how many are still running.
    pub fn drain(&mut self) -> usize {
        self.jobs.retain(|job| !job.handle.is_finished());
        self.jobs.len()
    }

    pub fn active_count(&self) -> usize {
        self.jobs.len()
    }

    /// Joins every outstanding worker so exiting cannot truncate an export
    /// that is still being written.
    pub fn shutdown(&mut self) {
        for job in self.jobs.drain(..) {
            log::info!("Waiting for export {} to finish...", job.id);
            if let Err(e) = job.handle.join() {
                log::error!("Export {} worker panicked: {:?}", job.id, e);
            }
        }
    }
}

/// Stream-copies the `[start, end]` range of the source into the output
/// file. `-y` overwrites an existing grab with the same end second.
fn write_subclip(request: &GrabRequest) -> anyhow::Result<()> {
    let start_time = format!("{:.3}", request.start);
    let duration = format!("{:.3}", request.end - request.start);

    let output = Command::new("ffmpeg")
        .arg("-i")
        .arg(&request.source)
        .arg("-ss")
        .arg(&start_time)
        .arg("-t")
        .arg(&duration)
        .arg("-c:v")
        .arg("copy")
        .arg("-y")
        .arg(&request.output)
        .output()?;

    if !output.status.success() {
        let error = String::from_utf8_lossy(&output.stderr);
        return Err(anyhow::anyhow!("FFmpeg error: {}", error));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    fn temp_grab_request() -> GrabRequest {
        let dir = std::env::temp_dir()
            .join(format!("ezy-grab-test-{}", Uuid::new_v4()))
            .join("missing.mp4_grabs");
        GrabRequest {
            source: PathBuf::from("/nonexistent/missing.mp4"),
            start: 0.0,
            end: 5.0,
            output: dir.join("5.mp4"),
        }
    }

    #[test]
    fn test_export_creates_output_directory_and_reports_back() {
        let (mut manager, mut events) = ExportManager::new();
        let request = temp_grab_request();
        let dir = request.output.parent().unwrap().to_path_buf();

        let id = manager.export(request).expect("dispatch failed");
        assert!(dir.is_dir());

        // The source does not exist, so the worker must report a failure
        // once joined; nothing may be silently dropped.
        manager.shutdown();
        match events.try_recv() {
            Ok(ExportEvent::Failed { id: failed_id, .. }) => assert_eq!(failed_id, id),
            other => panic!("expected a Failed event, got {:?}", other),
        }

        let _ = std::fs::remove_dir_all(dir.parent().unwrap());
    }

    #[test]
    fn test_export_refuses_beyond_concurrency_cap() {
        let (mut manager, _events) = ExportManager::new();

        // Fill the tracked set with workers parked on a channel.
        let (release, parked) = mpsc::channel::<()>();
        let parked = std::sync::Arc::new(std::sync::Mutex::new(parked));
        for _ in 0..ExportManager::MAX_CONCURRENT {
            let parked = parked.clone();
            manager.jobs.push(ExportJob {
                id: Uuid::new_v4(),
                handle: thread::spawn(move || {
                    let _ = parked.lock().unwrap().recv();
                }),
            });
        }

        let result = manager.export(temp_grab_request());
        assert!(matches!(result, Err(Error::Busy { active: 4, max: 4 })));

        drop(release);
        manager.shutdown();
    }

    #[test]
    fn test_drain_reaps_finished_workers() {
        let (mut manager, _events) = ExportManager::new();
        manager.jobs.push(ExportJob {
            id: Uuid::new_v4(),
            handle: thread::spawn(|| {}),
        });

        // The no-op worker exits immediately; drain must eventually reap it.
        while manager.drain() > 0 {
            thread::yield_now();
        }
        assert_eq!(manager.active_count(), 0);
    }
}
