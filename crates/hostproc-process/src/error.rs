//! Error types for guest process installation and reporting

use std::io;
use thiserror::Error;

/// Result type for hostproc-process operations
pub type Result<T> = std::result::Result<T, ProcessError>;

/// Errors at the fallible edges of the crate. Descriptor construction itself
/// never fails.
#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("global `{name}` is already installed and cannot be redefined")]
    AlreadyInstalled { name: String },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_already_installed_display() {
        let err = ProcessError::AlreadyInstalled {
            name: "process".to_string(),
        };
        assert!(err.to_string().contains("`process`"));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed");
        let err = ProcessError::from(io_err);
        assert!(err.to_string().contains("IO error"));
    }
}
