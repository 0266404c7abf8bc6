//! # Console Channel
//!
//! Dry-run channel: line frames are written as plain text to any
//! [`io::Write`] (usually stdout) instead of a printer.
//!
//! The channel answers the CTS handshake the way a real interface does, so
//! a dry run walks through exactly the same transmitter states as a real
//! print: it is ready, goes offline once after each frame, then is ready
//! again. Status queries never get a response.

use std::io::{self, Write};
use std::time::Duration;

use super::Channel;
use crate::protocol::frame::TERMINATOR;

/// Channel that prints line frames as text
pub struct ConsoleChannel<W: Write> {
    out: W,
    busy: bool,
}

impl ConsoleChannel<io::Stdout> {
    /// Console channel writing to stdout.
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> ConsoleChannel<W> {
    /// Console channel writing to `out`.
    pub fn new(out: W) -> Self {
        Self { out, busy: false }
    }

    /// Give back the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Channel for ConsoleChannel<W> {
    fn is_ready(&mut self) -> bool {
        !std::mem::take(&mut self.busy)
    }

    fn write_bytes(&mut self, data: &[u8]) -> io::Result<()> {
        let text = data.strip_suffix(&[TERMINATOR]).unwrap_or(data);
        self.out.write_all(text)?;
        self.out.flush()?;
        self.busy = true;
        Ok(())
    }

    fn read_bytes(&mut self, _buf: &mut [u8], _deadline: Duration) -> io::Result<usize> {
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::frame;

    #[test]
    fn test_frames_written_as_text() {
        let mut channel = ConsoleChannel::new(Vec::new());
        channel.write_bytes(&frame::line(b"one")).unwrap();
        channel.write_bytes(&frame::line(b"two")).unwrap();
        assert_eq!(channel.into_inner(), b"one\r\ntwo\r\n".to_vec());
    }

    #[test]
    fn test_handshake_cycle() {
        let mut channel = ConsoleChannel::new(Vec::new());
        assert!(channel.is_ready());
        channel.write_bytes(&frame::line(b"x")).unwrap();
        assert!(!channel.is_ready());
        assert!(channel.is_ready());
    }
}
