//! # Transmission Controller
//!
//! Sends display lines one at a time, gated by the CTS handshake.
//!
//! ## Per-Line State Machine
//!
//! ```text
//!            not ready, retries < limit
//!              (sleep retry_delay)
//!                  ┌─────┐
//!                  ▼     │
//!             ┌───────────┐  ready   ┌──────┐        ┌─────────────┐ not ready ┌──────┐
//!  line ────► │ WaitReady │ ───────► │ Send │ ─────► │ WaitOffline │ ────────► │ Done │ ──► next line
//!             └───────────┘          └──────┘        └─────────────┘           └──────┘
//!                  │                    │                  ▲    │
//!   retries = limit│         write error│                  └────┘ still ready
//!                  ▼                    ▼
//!             ┌──────────┐       WriteFailure
//!             │ TimedOut │       (run aborted)
//!             └──────────┘
//!            (run aborted)
//! ```
//!
//! - **WaitReady** is the only state with a timeout. Hitting the retry limit
//!   ends the whole run, not just the current line.
//! - **Send** writes the full line frame (text, CR LF, NUL) in one write.
//!   There is no resend: a failed write aborts the run.
//! - **WaitOffline** waits for the interface to drop CTS, which confirms it
//!   took the frame. It has no timeout; an interface that was ready always
//!   accepts the frame.

use std::hint;
use std::time::Duration;

use super::pause::{Pause, ThreadPause};
use crate::error::SmartParallelError;
use crate::protocol::frame;
use crate::text::DisplayLine;
use crate::transport::Channel;

/// Default number of not-ready polls before giving up
pub const DEFAULT_RETRY_LIMIT: u32 = 10;

/// Default delay between not-ready polls
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(500);

// ============================================================================
// SETTINGS, RESULT, EVENTS
// ============================================================================

/// Handshake timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransmitSettings {
    /// Not-ready polls allowed per line before the run times out.
    /// A limit of 0 behaves like 1.
    pub retry_limit: u32,
    /// Sleep between not-ready polls
    pub retry_delay: Duration,
    /// Sleep between polls while waiting for CTS to drop. Zero spins.
    pub offline_poll_interval: Duration,
}

impl Default for TransmitSettings {
    fn default() -> Self {
        Self {
            retry_limit: DEFAULT_RETRY_LIMIT,
            retry_delay: DEFAULT_RETRY_DELAY,
            offline_poll_interval: Duration::ZERO,
        }
    }
}

/// Outcome of a transmission run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransmissionResult {
    /// Lines fully delivered
    pub lines_sent: usize,
    /// Whether the run ended because the printer never became ready
    pub timed_out: bool,
    /// Index of the last line processed: the line that timed out, or the
    /// last line sent. `None` when there were no lines.
    pub last_line_index: Option<usize>,
}

impl TransmissionResult {
    /// Turn a timed-out run into [`SmartParallelError::ChannelUnavailable`].
    pub fn into_result(self) -> Result<Self, SmartParallelError> {
        if self.timed_out {
            Err(SmartParallelError::ChannelUnavailable {
                lines_sent: self.lines_sent,
            })
        } else {
            Ok(self)
        }
    }
}

/// Progress notifications from a transmission run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransmitEvent {
    /// CTS changed. Emitted once per transition, not per poll.
    ///
    /// The first sample a transmitter takes only sets the baseline and is
    /// not reported.
    ReadinessChanged {
        /// New readiness state
        ready: bool,
    },
    /// The printer wasn't ready; the transmitter will wait and poll again
    Retry {
        /// Line being waited on
        line_index: usize,
        /// Not-ready polls so far for this line
        attempt: u32,
    },
    /// A line was accepted by the printer
    LineSent {
        /// Index of the line
        line_index: usize,
    },
    /// The retry limit was reached; no further lines are sent
    TimedOut {
        /// Line that couldn't be sent
        line_index: usize,
        /// Lines delivered before the timeout
        lines_sent: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineState {
    WaitReady,
    Send,
    WaitOffline,
    Done,
    TimedOut,
}

type Observer = Box<dyn FnMut(&TransmitEvent)>;

// ============================================================================
// TRANSMITTER
// ============================================================================

/// # Transmitter
///
/// Owns a [`Channel`] for the duration of a run and drives the handshake.
///
/// ## Example
///
/// ```
/// use smartparallel::text::{reflow, WrapPolicy};
/// use smartparallel::transmit::{RecordingPause, TransmitSettings, Transmitter};
/// use smartparallel::transport::MockChannel;
///
/// let lines = reflow(&["first", "second"], 80, WrapPolicy::SplitOnSpace);
///
/// let mut transmitter = Transmitter::new(MockChannel::new(), TransmitSettings::default())
///     .with_pause(RecordingPause::default());
/// let result = transmitter.transmit(&lines)?;
///
/// assert_eq!(result.lines_sent, 2);
/// assert!(!result.timed_out);
///
/// # Ok::<(), smartparallel::SmartParallelError>(())
/// ```
pub struct Transmitter<C: Channel, P: Pause = ThreadPause> {
    channel: C,
    settings: TransmitSettings,
    pause: P,
    previous_ready: Option<bool>,
    observer: Option<Observer>,
}

impl<C: Channel> Transmitter<C> {
    /// Create a transmitter that sleeps the current thread between polls.
    pub fn new(channel: C, settings: TransmitSettings) -> Self {
        Self {
            channel,
            settings,
            pause: ThreadPause,
            previous_ready: None,
            observer: None,
        }
    }
}

impl<C: Channel, P: Pause> Transmitter<C, P> {
    /// Replace the way the transmitter sleeps.
    pub fn with_pause<Q: Pause>(self, pause: Q) -> Transmitter<C, Q> {
        Transmitter {
            channel: self.channel,
            settings: self.settings,
            pause,
            previous_ready: self.previous_ready,
            observer: self.observer,
        }
    }

    /// Register a callback for [`TransmitEvent`]s.
    pub fn on_event<F>(mut self, observer: F) -> Self
    where
        F: FnMut(&TransmitEvent) + 'static,
    {
        self.observer = Some(Box::new(observer));
        self
    }

    /// The channel
    pub fn channel(&self) -> &C {
        &self.channel
    }

    /// The pause implementation
    pub fn pause(&self) -> &P {
        &self.pause
    }

    /// Give back the channel.
    pub fn into_channel(self) -> C {
        self.channel
    }

    /// Send `lines` in order.
    ///
    /// A readiness timeout is not an error here: the result comes back with
    /// `timed_out` set. Use [`TransmissionResult::into_result`] to treat it
    /// as one.
    ///
    /// ## Errors
    ///
    /// [`SmartParallelError::WriteFailure`] if writing a line fails. The run
    /// stops at that line.
    pub fn transmit(
        &mut self,
        lines: &[DisplayLine],
    ) -> Result<TransmissionResult, SmartParallelError> {
        let retry_limit = self.settings.retry_limit.max(1);
        let mut result = TransmissionResult::default();
        let mut retries = 0u32;

        tracing::info!(lines = lines.len(), "sending to printer");

        for (index, line) in lines.iter().enumerate() {
            result.last_line_index = Some(index);
            let mut state = LineState::WaitReady;

            loop {
                state = match state {
                    LineState::WaitReady => {
                        if self.poll_ready() {
                            LineState::Send
                        } else {
                            retries += 1;
                            tracing::debug!(line = index, attempt = retries, "printer not ready");
                            self.emit(TransmitEvent::Retry {
                                line_index: index,
                                attempt: retries,
                            });
                            if retries >= retry_limit {
                                LineState::TimedOut
                            } else {
                                self.pause.pause(self.settings.retry_delay);
                                LineState::WaitReady
                            }
                        }
                    }
                    LineState::Send => {
                        self.send(line).map_err(|source| SmartParallelError::WriteFailure {
                            line_index: Some(index),
                            lines_sent: result.lines_sent,
                            source,
                        })?;
                        retries = 0;
                        LineState::WaitOffline
                    }
                    LineState::WaitOffline => {
                        if self.poll_ready() {
                            self.idle_offline();
                            LineState::WaitOffline
                        } else {
                            LineState::Done
                        }
                    }
                    LineState::Done => {
                        result.lines_sent += 1;
                        self.emit(TransmitEvent::LineSent { line_index: index });
                        break;
                    }
                    LineState::TimedOut => {
                        result.timed_out = true;
                        tracing::warn!(
                            line = index,
                            lines_sent = result.lines_sent,
                            "timed out waiting for printer"
                        );
                        self.emit(TransmitEvent::TimedOut {
                            line_index: index,
                            lines_sent: result.lines_sent,
                        });
                        return Ok(result);
                    }
                };
            }
        }

        tracing::info!(lines_sent = result.lines_sent, "sent all lines");
        Ok(result)
    }

    fn send(&mut self, line: &DisplayLine) -> std::io::Result<()> {
        tracing::trace!(line = %line, "sending line");
        self.channel.write_bytes(&frame::line(line.as_bytes()))
    }

    /// Sample CTS, reporting a change of state exactly once.
    fn poll_ready(&mut self) -> bool {
        let ready = self.channel.is_ready();
        match self.previous_ready.replace(ready) {
            Some(previous) if previous != ready => {
                tracing::debug!(ready, "printer readiness changed");
                self.emit(TransmitEvent::ReadinessChanged { ready });
            }
            Some(_) => {}
            None => tracing::debug!(ready, "initial printer readiness"),
        }
        ready
    }

    fn idle_offline(&mut self) {
        if self.settings.offline_poll_interval.is_zero() {
            hint::spin_loop();
        } else {
            self.pause.pause(self.settings.offline_poll_interval);
        }
    }

    fn emit(&mut self, event: TransmitEvent) {
        if let Some(observer) = self.observer.as_mut() {
            observer(&event);
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
