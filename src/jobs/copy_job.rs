use std::path::PathBuf;

use compio::fs;
use snafu::{ResultExt, Snafu};
use tracing::{debug, info};

use crate::ext::BestEffortPathExt;

/// A single pending content copy: one generated (empty) file paired with the
/// scratch file whose base name matched it.
#[derive(Debug, Clone)]
pub struct CopyJob {
    pub destination: String,
    pub scratch: PathBuf,
}

impl CopyJob {
    pub fn new(destination: impl Into<String>, scratch: impl Into<PathBuf>) -> Self {
        Self {
            destination: destination.into(),
            scratch: scratch.into(),
        }
    }

    /// Copies all bytes from the scratch file into the destination and
    /// returns the destination path on success.
    pub async fn run(self) -> Result<String, CopyError> {
        debug!(
            "Copying '{}' into '{}'",
            self.scratch.best_effort_path_display(),
            self.destination
        );

        let bytes = fs::read(&self.scratch).await.context(ReadScratchSnafu {
            scratch: self.scratch.best_effort_path_display(),
            destination: self.destination.clone(),
        })?;

        let written = fs::write(&self.destination, bytes).await;
        written.0.context(WriteDestinationSnafu {
            scratch: self.scratch.best_effort_path_display(),
            destination: self.destination.clone(),
        })?;

        info!(
            "Populated '{}' from '{}'",
            self.destination,
            self.scratch.best_effort_path_display()
        );
        Ok(self.destination)
    }
}

#[derive(Debug, Snafu)]
pub enum CopyError {
    #[snafu(display("Failed to read scratch file '{}' matched for '{}'", scratch, destination))]
    ReadScratchError {
        scratch: String,
        destination: String,
        source: std::io::Error,
    },
    #[snafu(display("Failed to write '{}' from scratch file '{}'", destination, scratch))]
    WriteDestinationError {
        scratch: String,
        destination: String,
        source: std::io::Error,
    },
    #[snafu(display("Copy into '{}' got cancelled", destination))]
    CanceledError {
        destination: String,
        source: futures_channel::oneshot::Canceled,
    },
}
