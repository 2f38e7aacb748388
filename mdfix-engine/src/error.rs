//! Error types for mdfix-engine.
//!
//! Per-file failures are recorded in the run report rather than propagated, so this
//! type mostly travels as the `message` of a failed outcome. Usage errors (exit code
//! 2) live in the CLI; everything here maps to exit code 1.

use camino::Utf8PathBuf;
use thiserror::Error;

/// A failure while processing one file of the corpus.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// The file could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        path: Utf8PathBuf,
        #[source]
        source: anyhow::Error,
    },

    /// The file's bytes are not valid UTF-8.
    #[error("{path} is not valid UTF-8")]
    NotUtf8 { path: Utf8PathBuf },

    /// The normalized text could not be written back.
    #[error("failed to write {path}: {source}")]
    Write {
        path: Utf8PathBuf,
        #[source]
        source: anyhow::Error,
    },
}

impl ProcessError {
    /// The file the failure is about.
    pub fn path(&self) -> &Utf8PathBuf {
        match self {
            ProcessError::Read { path, .. }
            | ProcessError::NotUtf8 { path }
            | ProcessError::Write { path, .. } => path,
        }
    }
}

/// Result type alias using ProcessError.
pub type ProcessResult<T> = Result<T, ProcessError>;

#[cfg(test)]
mod tests {
    use super::ProcessError;
    use camino::Utf8PathBuf;

    #[test]
    fn read_error_names_the_path() {
        let err = ProcessError::Read {
            path: Utf8PathBuf::from("docs/a.md"),
            source: anyhow::anyhow!("permission denied"),
        };
        let text = err.to_string();
        assert!(text.contains("docs/a.md"));
        assert!(text.contains("permission denied"));
    }

    #[test]
    fn utf8_error_names_the_path() {
        let err = ProcessError::NotUtf8 {
            path: Utf8PathBuf::from("docs/bin.md"),
        };
        assert!(err.to_string().contains("not valid UTF-8"));
    }
}
