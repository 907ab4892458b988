use std::path::{Path, PathBuf};

use crate::video::playback::VideoSession;

/// A fully resolved subclip export: source range plus target file.
/// Built per key press, handed straight to the export manager, never kept.
#[derive(Debug, Clone, PartialEq)]
pub struct GrabRequest {
    pub source: PathBuf,
    pub start: f64,
    pub end: f64,
    pub output: PathBuf,
}

/// Computes the clip range ending at the current position.
///
/// `start` is clamped to the beginning of the stream, so a grab early in the
/// video yields a shorter clip instead of a negative start. A zero duration
/// produces nothing.
pub fn grab(session: &VideoSession, duration_seconds: u32) -> Option<GrabRequest> {
    if duration_seconds == 0 {
        return None;
    }

    let end = session.position;
    let start = (end - f64::from(duration_seconds)).max(0.0);
    let output = output_dir(&session.source).join(format!("{}.mp4", end as u64));
    log::info!("Grabbing from {} to {}", start as u64, end as u64);

    Some(GrabRequest {
        source: session.source.clone(),
        start,
        end,
        output,
    })
}

/// Grabs land next to their source: `<video path>_grabs/`.
pub fn output_dir(source: &Path) -> PathBuf {
    let mut dir = source.as_os_str().to_os_string();
    dir.push("_grabs");
    PathBuf::from(dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_at(position: f64) -> VideoSession {
        VideoSession {
            source: PathBuf::from("/videos/match.mp4"),
            position,
        }
    }

    #[test]
    fn test_grab_range_ends_at_current_position() {
        let request = grab(&session_at(20.0), 16).expect("grab expected");
        assert_eq!(request.start, 4.0);
        assert_eq!(request.end, 20.0);
    }

    #[test]
    fn test_grab_clamps_start_to_stream_begin() {
        let request = grab(&session_at(5.0), 24).expect("grab expected");
        assert_eq!(request.start, 0.0);
        assert_eq!(request.end, 5.0);
    }

    #[test]
    fn test_grab_start_never_exceeds_end() {
        for (position, duration) in [(0.0, 1), (0.5, 30), (90.0, 8), (3600.0, 24)] {
            let request = grab(&session_at(position), duration).expect("grab expected");
            assert!(request.start <= request.end);
            assert!(request.start >= 0.0);
        }
    }

    #[test]
    fn test_zero_duration_grab_is_a_no_op() {
        assert_eq!(grab(&session_at(20.0), 0), None);
    }

    #[test]
    fn test_output_lands_in_grabs_dir_named_by_end_second() {
        let request = grab(&session_at(20.7), 16).expect("grab expected");
        assert_eq!(
            request.output,
            PathBuf::from("/videos/match.mp4_grabs/20.mp4")
        );
    }

    #[test]
    fn test_grabs_ending_in_same_second_share_a_name() {
        // Documented behavior: the later export overwrites the earlier one.
        let first = grab(&session_at(20.1), 8).expect("grab expected");
        let second = grab(&session_at(20.9), 16).expect("grab expected");
        assert_eq!(first.output, second.output);
    }
}
