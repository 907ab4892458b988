use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("malformed settings file {path}: {reason}")]
    Config { path: PathBuf, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("shortcut key '{0}' is already in use")]
    KeyConflict(char),

    #[error("{active} exports already in flight (max {max})")]
    Busy { active: usize, max: usize },
}
