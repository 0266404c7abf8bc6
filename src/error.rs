//! # Error Types
//!
//! This module defines error types used throughout the smartparallel library.
//!
//! A read that hits its deadline without data is not an error: status
//! queries report it as an empty response.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Main error type for smartparallel operations
#[derive(Debug, Error)]
pub enum SmartParallelError {
    /// The printer never asserted CTS within the retry limit.
    ///
    /// The run was aborted; `lines_sent` lines were delivered before it.
    #[error("Printer not ready: timed out after {lines_sent} lines")]
    ChannelUnavailable {
        /// Lines fully delivered before the timeout
        lines_sent: usize,
    },

    /// Writing to the serial link failed.
    ///
    /// `line_index` is `None` when the failed write was a command frame.
    #[error("Write failed after {lines_sent} lines: {source}")]
    WriteFailure {
        /// Index of the display line being sent, if any
        line_index: Option<usize>,
        /// Lines fully delivered before the failure
        lines_sent: usize,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Reading a status response failed for a reason other than the deadline
    #[error("Read failed: {0}")]
    ReadFailure(#[source] io::Error),

    /// The input text file could not be read
    #[error("Failed to read {}: {source}", .path.display())]
    Source {
        /// File that was being read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Transport-level setup errors (device, GPIO)
    #[error("Transport error: {0}")]
    Transport(String),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_unavailable_message() {
        let err = SmartParallelError::ChannelUnavailable { lines_sent: 3 };
        assert_eq!(err.to_string(), "Printer not ready: timed out after 3 lines");
    }

    #[test]
    fn test_source_message_names_path() {
        let err = SmartParallelError::Source {
            path: PathBuf::from("/tmp/missing.txt"),
            source: io::Error::new(io::ErrorKind::NotFound, "not found"),
        };
        assert!(err.to_string().contains("/tmp/missing.txt"));
    }
}
