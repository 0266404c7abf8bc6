//! # Mock Channel
//!
//! A scripted [`Channel`] for exercising the transmitter and status queries
//! without hardware.
//!
//! ## Readiness
//!
//! Readiness samples are taken from a script first. Once the script runs
//! out, the mock behaves like a well-mannered printer interface: it reports
//! not-ready exactly once after each write (the interface accepted the frame
//! and went offline to print it) and otherwise reports its idle state.
//!
//! ```
//! use smartparallel::transport::{Channel, MockChannel};
//!
//! let mut channel = MockChannel::new().with_readiness([false, true]);
//! assert!(!channel.is_ready());
//! assert!(channel.is_ready());
//! assert_eq!(channel.polls(), 2);
//! ```

use std::collections::VecDeque;
use std::io;
use std::time::Duration;

use super::Channel;

/// Scripted channel recording everything written to it
#[derive(Debug)]
pub struct MockChannel {
    readiness: VecDeque<bool>,
    idle_ready: bool,
    busy: bool,
    polls: usize,
    frames: Vec<Vec<u8>>,
    fail_write_at: Option<usize>,
    write_calls: usize,
    responses: VecDeque<io::Result<Vec<u8>>>,
    deadlines: Vec<Duration>,
}

impl MockChannel {
    /// A channel that is ready whenever it isn't processing a frame.
    pub fn new() -> Self {
        Self {
            readiness: VecDeque::new(),
            idle_ready: true,
            busy: false,
            polls: 0,
            frames: Vec::new(),
            fail_write_at: None,
            write_calls: 0,
            responses: VecDeque::new(),
            deadlines: Vec::new(),
        }
    }

    /// A channel whose printer never becomes ready.
    pub fn never_ready() -> Self {
        Self {
            idle_ready: false,
            ..Self::new()
        }
    }

    /// Queue readiness samples returned before the default behavior applies.
    pub fn with_readiness<I: IntoIterator<Item = bool>>(mut self, samples: I) -> Self {
        self.readiness.extend(samples);
        self
    }

    /// Make the `n`-th write call (0-based) fail with a broken pipe.
    pub fn fail_write_at(mut self, n: usize) -> Self {
        self.fail_write_at = Some(n);
        self
    }

    /// Queue a successful read returning `bytes`.
    pub fn respond(mut self, bytes: &[u8]) -> Self {
        self.responses.push_back(Ok(bytes.to_vec()));
        self
    }

    /// Queue a failed read.
    pub fn respond_err(mut self, kind: io::ErrorKind) -> Self {
        self.responses
            .push_back(Err(io::Error::new(kind, "mock read failure")));
        self
    }

    /// Number of readiness samples taken so far
    pub fn polls(&self) -> usize {
        self.polls
    }

    /// Every successful write, in order
    pub fn frames(&self) -> &[Vec<u8>] {
        &self.frames
    }

    /// All successfully written bytes concatenated
    pub fn written(&self) -> Vec<u8> {
        self.frames.concat()
    }

    /// Number of write attempts, including failed ones
    pub fn write_calls(&self) -> usize {
        self.write_calls
    }

    /// Deadlines passed to each read
    pub fn deadlines(&self) -> &[Duration] {
        &self.deadlines
    }
}

impl Default for MockChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl Channel for MockChannel {
    fn is_ready(&mut self) -> bool {
        self.polls += 1;
        if let Some(sample) = self.readiness.pop_front() {
            return sample;
        }
        if self.busy {
            self.busy = false;
            return false;
        }
        self.idle_ready
    }

    fn write_bytes(&mut self, data: &[u8]) -> io::Result<()> {
        let call = self.write_calls;
        self.write_calls += 1;
        if self.fail_write_at == Some(call) {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "mock write failure"));
        }
        self.frames.push(data.to_vec());
        self.busy = true;
        Ok(())
    }

    fn read_bytes(&mut self, buf: &mut [u8], deadline: Duration) -> io::Result<usize> {
        self.deadlines.push(deadline);
        match self.responses.pop_front() {
            Some(Ok(bytes)) => {
                let n = bytes.len().min(buf.len());
                buf[..n].copy_from_slice(&bytes[..n]);
                Ok(n)
            }
            Some(Err(err)) => Err(err),
            None => Ok(0),
        }
    }
}
