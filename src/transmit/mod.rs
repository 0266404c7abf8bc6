//! # Line Transmission
//!
//! Delivers reflowed lines to the printer interface, one handshake per line.
//!
//! - [`controller`]: the [`Transmitter`] state machine
//! - [`pause`]: how the transmitter sleeps between polls
//!
//! For a one-off run with default settings use [`transmit`].

pub mod controller;
pub mod pause;

use std::time::Duration;

pub use controller::{
    DEFAULT_RETRY_DELAY, DEFAULT_RETRY_LIMIT, TransmissionResult, TransmitEvent, TransmitSettings,
    Transmitter,
};
pub use pause::{Pause, RecordingPause, ThreadPause};

use crate::error::SmartParallelError;
use crate::text::DisplayLine;
use crate::transport::Channel;

/// Send `lines` over `channel`, polling up to `retry_limit` times per line
/// and sleeping `retry_delay` between polls.
///
/// See [`Transmitter::transmit`].
pub fn transmit<C: Channel>(
    lines: &[DisplayLine],
    channel: C,
    retry_limit: u32,
    retry_delay: Duration,
) -> Result<TransmissionResult, SmartParallelError> {
    let settings = TransmitSettings {
        retry_limit,
        retry_delay,
        ..TransmitSettings::default()
    };
    Transmitter::new(channel, settings).transmit(lines)
}
