use std::{io, path::PathBuf};

use tessel_scene::SceneError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IoError {
    #[error("failed to read {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to write {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },

    #[error("{}: {source}", path.display())]
    Scene { path: PathBuf, source: SceneError },
}
