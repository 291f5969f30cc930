//! The errors emitted throughout shimcc

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The high-level error type, which is used by both lib.rs and main.rs
#[derive(Debug, Error)]
pub enum ShimError {
    /// An input file could not be opened or was not valid UTF-8
    #[error("could not read '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The file passed via `--output` could not be created
    #[error("could not create '{}': {source}", path.display())]
    Create {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// Writing to the output stream failed
    #[error("could not write output: {0}")]
    Write(#[from] io::Error),
}

impl ShimError {
    pub fn print(&self) {
        eprintln!("shimcc: {}", self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_message_names_path() {
        let err = ShimError::Read {
            path: PathBuf::from("missing.c"),
            source: io::Error::new(io::ErrorKind::NotFound, "No such file or directory"),
        };

        assert_eq!(
            err.to_string(),
            "could not read 'missing.c': No such file or directory"
        );
    }

    #[test]
    fn io_errors_become_write_errors() {
        let err: ShimError = io::Error::new(io::ErrorKind::BrokenPipe, "broken pipe").into();

        assert!(matches!(err, ShimError::Write(_)));
        assert_eq!(err.to_string(), "could not write output: broken pipe");
    }
}
