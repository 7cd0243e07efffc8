use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum FileError {
    #[error("path {0} does not exist")]
    NotFound(PathBuf),

    #[error("path {0} is not a file")]
    NotAFile(PathBuf),

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, FileError>;
