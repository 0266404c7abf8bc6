//! Sleeping between readiness polls.

use std::thread;
use std::time::Duration;

/// Something that can wait for a while.
///
/// The transmitter sleeps through this trait so waits can be observed, or
/// skipped, without a wall clock.
pub trait Pause {
    /// Block for `duration`.
    fn pause(&mut self, duration: Duration);
}

/// Sleeps the current thread
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadPause;

impl Pause for ThreadPause {
    fn pause(&mut self, duration: Duration) {
        thread::sleep(duration);
    }
}

/// Records requested pauses without sleeping
#[derive(Debug, Clone, Default)]
pub struct RecordingPause {
    pauses: Vec<Duration>,
}

impl RecordingPause {
    /// Every requested pause, in order
    pub fn pauses(&self) -> &[Duration] {
        &self.pauses
    }

    /// Number of requested pauses
    pub fn count(&self) -> usize {
        self.pauses.len()
    }
}

impl Pause for RecordingPause {
    fn pause(&mut self, duration: Duration) {
        self.pauses.push(duration);
    }
}
