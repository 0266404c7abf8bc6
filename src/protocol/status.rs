//! # Commands and Status Queries
//!
//! A status query writes a [`CommandFrame`] carrying the status-request code
//! and then does a single bounded read. The response has no framing of its
//! own: whatever arrives before the read deadline is the response, and
//! nothing arriving at all is a valid (empty) answer.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::frame::{CommandFrame, DEFAULT_COMMAND_MARKER, DEFAULT_STATUS_CODE};
use crate::error::SmartParallelError;
use crate::transport::{Channel, is_deadline_error};

/// Capacity of the status response buffer (bytes)
pub const DEFAULT_READ_CAPACITY: usize = 256;

/// How long a status query waits for a response
pub const DEFAULT_READ_DEADLINE: Duration = Duration::from_millis(500);

/// Command framing and response-read settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CommandSettings {
    /// Byte announcing a command frame
    pub marker: u8,
    /// Status-request command code
    pub status_code: u8,
    /// Response read deadline in milliseconds
    pub read_deadline_ms: u64,
    /// Response buffer size in bytes
    pub read_capacity: usize,
}

impl CommandSettings {
    /// Response read deadline
    pub fn read_deadline(&self) -> Duration {
        Duration::from_millis(self.read_deadline_ms)
    }
}

impl Default for CommandSettings {
    fn default() -> Self {
        Self {
            marker: DEFAULT_COMMAND_MARKER,
            status_code: DEFAULT_STATUS_CODE,
            read_deadline_ms: DEFAULT_READ_DEADLINE.as_millis() as u64,
            read_capacity: DEFAULT_READ_CAPACITY,
        }
    }
}

/// Send a command frame with the configured marker.
///
/// ## Errors
///
/// [`SmartParallelError::WriteFailure`] if the frame can't be written.
pub fn send_command<C: Channel + ?Sized>(
    channel: &mut C,
    settings: &CommandSettings,
    code: u8,
) -> Result<(), SmartParallelError> {
    let frame = CommandFrame::new(settings.marker, code);
    tracing::debug!(marker = frame.marker, code = frame.code, "sending command");

    channel
        .write_bytes(&frame.to_bytes())
        .map_err(|source| SmartParallelError::WriteFailure {
            line_index: None,
            lines_sent: 0,
            source,
        })
}

/// # Query Printer Status
///
/// Sends the status-request command and returns the response text.
///
/// An empty string means the interface didn't answer before the deadline.
///
/// ## Example
///
/// ```
/// use smartparallel::protocol::{CommandSettings, query_status};
/// use smartparallel::transport::MockChannel;
///
/// let mut channel = MockChannel::new().respond(b"ONLINE");
/// let status = query_status(&mut channel, &CommandSettings::default())?;
/// assert_eq!(status, "ONLINE");
///
/// # Ok::<(), smartparallel::SmartParallelError>(())
/// ```
///
/// ## Errors
///
/// - [`SmartParallelError::WriteFailure`] if the command can't be written
/// - [`SmartParallelError::ReadFailure`] for read errors other than the
///   deadline passing
pub fn query_status<C: Channel + ?Sized>(
    channel: &mut C,
    settings: &CommandSettings,
) -> Result<String, SmartParallelError> {
    send_command(channel, settings, settings.status_code)?;

    let mut buf = vec![0u8; settings.read_capacity];
    let n = match channel.read_bytes(&mut buf, settings.read_deadline()) {
        Ok(n) => n,
        Err(e) if is_deadline_error(&e) => 0,
        Err(e) => return Err(SmartParallelError::ReadFailure(e)),
    };

    if n == 0 {
        tracing::debug!("no status response before deadline");
    }
    Ok(String::from_utf8_lossy(&buf[..n]).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::MockChannel;
    use std::io;

    #[test]
    fn test_writes_status_frame() {
        let mut channel = MockChannel::new();
        let settings = CommandSettings {
            marker: 0x1B,
            status_code: 0x3F,
            ..Default::default()
        };

        query_status(&mut channel, &settings).unwrap();
        assert_eq!(channel.frames(), &[vec![0x1Bu8, 0x3F, 0x00]]);
    }

    #[test]
    fn test_returns_response_text() {
        let mut channel = MockChannel::new().respond(b"READY 80");
        let status = query_status(&mut channel, &CommandSettings::default()).unwrap();
        assert_eq!(status, "READY 80");
    }

    #[test]
    fn test_no_bytes_is_empty_response() {
        let mut channel = MockChannel::new();
        let status = query_status(&mut channel, &CommandSettings::default()).unwrap();
        assert_eq!(status, "");
    }

    #[test]
    fn test_deadline_errors_are_empty_response() {
        for kind in [io::ErrorKind::TimedOut, io::ErrorKind::WouldBlock] {
            let mut channel = MockChannel::new().respond_err(kind);
            let status = query_status(&mut channel, &CommandSettings::default()).unwrap();
            assert!(status.is_empty());
        }
    }

    #[test]
    fn test_other_read_errors_surface() {
        let mut channel = MockChannel::new().respond_err(io::ErrorKind::BrokenPipe);
        let err = query_status(&mut channel, &CommandSettings::default()).unwrap_err();
        assert!(matches!(err, SmartParallelError::ReadFailure(_)));
    }

    #[test]
    fn test_response_bounded_by_capacity() {
        let mut channel = MockChannel::new().respond(&[b'x'; 64]);
        let settings = CommandSettings {
            read_capacity: 16,
            ..Default::default()
        };
        let status = query_status(&mut channel, &settings).unwrap();
        assert_eq!(status.len(), 16);
    }

    #[test]
    fn test_read_uses_configured_deadline() {
        let mut channel = MockChannel::new();
        let settings = CommandSettings {
            read_deadline_ms: 250,
            ..Default::default()
        };
        query_status(&mut channel, &settings).unwrap();
        assert_eq!(channel.deadlines(), &[Duration::from_millis(250)]);
    }

    #[test]
    fn test_write_failure_skips_read() {
        let mut channel = MockChannel::new().fail_write_at(0).respond(b"unused");
        let err = query_status(&mut channel, &CommandSettings::default()).unwrap_err();
        assert!(matches!(
            err,
            SmartParallelError::WriteFailure { line_index: None, .. }
        ));
        assert!(channel.deadlines().is_empty());
    }
}
