//! # Printer Transport Layer
//!
//! This module provides the byte channels the transmitter talks to.
//!
//! A [`Channel`] combines three things: a readiness signal (the printer
//! interface's active-low CTS line), a byte writer and a byte reader with a
//! deadline.
//!
//! ## Available Channels
//!
//! - [`hardware`]: serial TTY + GPIO CTS pin (Linux)
//! - [`console`]: dry runs, writes text to any `io::Write`
//! - [`mock`]: scripted channel for tests
//!
//! The building blocks of the hardware channel are usable on their own:
//!
//! - [`serial`]: raw-mode serial TTY
//! - [`gpio`]: sysfs GPIO input for CTS

pub mod console;
pub mod gpio;
pub mod hardware;
pub mod mock;
pub mod serial;

use std::io;
use std::time::Duration;

pub use console::ConsoleChannel;
pub use gpio::CtsPin;
pub use hardware::HardwareChannel;
pub use mock::MockChannel;
pub use serial::SerialPort;

/// # Printer Channel
///
/// The link to the printer interface as seen by the transmitter.
///
/// One transmission run owns the channel for its whole duration.
pub trait Channel {
    /// Sample the readiness signal. `true` means the printer can take a line.
    fn is_ready(&mut self) -> bool;

    /// Write all of `data` to the link.
    fn write_bytes(&mut self, data: &[u8]) -> io::Result<()>;

    /// Read whatever arrives within `deadline` into `buf`.
    ///
    /// Returns the number of bytes read. A deadline that passes without data
    /// is reported as `Ok(0)` or as an error of kind
    /// [`io::ErrorKind::TimedOut`] / [`io::ErrorKind::WouldBlock`].
    fn read_bytes(&mut self, buf: &mut [u8], deadline: Duration) -> io::Result<usize>;
}

impl<C: Channel + ?Sized> Channel for &mut C {
    fn is_ready(&mut self) -> bool {
        (**self).is_ready()
    }

    fn write_bytes(&mut self, data: &[u8]) -> io::Result<()> {
        (**self).write_bytes(data)
    }

    fn read_bytes(&mut self, buf: &mut [u8], deadline: Duration) -> io::Result<usize> {
        (**self).read_bytes(buf, deadline)
    }
}

impl<C: Channel + ?Sized> Channel for Box<C> {
    fn is_ready(&mut self) -> bool {
        (**self).is_ready()
    }

    fn write_bytes(&mut self, data: &[u8]) -> io::Result<()> {
        (**self).write_bytes(data)
    }

    fn read_bytes(&mut self, buf: &mut [u8], deadline: Duration) -> io::Result<usize> {
        (**self).read_bytes(buf, deadline)
    }
}

/// Whether a read error only means the deadline passed without data
pub fn is_deadline_error(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock
    )
}
