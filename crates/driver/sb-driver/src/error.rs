//! Driver errors

use std::path::PathBuf;
use thiserror::Error;

/// Failures of the driver itself, as opposed to diagnostics in the program
#[derive(Error, Debug)]
pub enum DriverError {
    /// A configuration file could not be read
    #[error("failed to read '{}'", path.display())]
    Io {
        /// File being read
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Configuration text is not valid
    #[error("invalid compiler configuration")]
    Config(#[from] toml::de::Error),

    /// A stage reported errors and the remaining stages were skipped
    #[error("compilation stopped after {stage}")]
    Aborted {
        /// Stage that reported the errors
        stage: &'static str,
    },
}
