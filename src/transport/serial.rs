//! # Serial TTY Transport
//!
//! Raw-mode access to the serial port the SmartParallel interface is wired
//! to (on a Raspberry Pi, the mini UART at `/dev/ttyS0`).
//!
//! ## TTY Configuration
//!
//! The device is opened in raw mode so text and framing bytes pass through
//! unmodified:
//!
//! - **No input processing**: IGNBRK, BRKINT, PARMRK, ISTRIP, INLCR, IGNCR,
//!   ICRNL, IXON, IXOFF, IXANY disabled
//! - **No output processing**: OPOST disabled (no LF → CR LF translation)
//! - **8N1**: CS8, no parity, one stop bit
//! - **No hardware flow control**: CRTSCTS disabled; CTS is sampled from a
//!   GPIO pin instead, see [`gpio`](super::gpio)
//! - **Non-canonical, no echo**: ICANON, ECHO, ECHONL, ISIG, IEXTEN disabled
//!
//! ## Reads
//!
//! Reads wait for data with `poll(2)`. When the deadline passes first the
//! read fails with [`io::ErrorKind::TimedOut`].

use std::fs::{File, OpenOptions};
use std::io::{self, Read, Write};
use std::os::unix::io::AsRawFd;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::error::SmartParallelError;

/// Default serial device
pub const DEFAULT_DEVICE: &str = "/dev/ttyS0";

/// Default baud rate of the SmartParallel interface
pub const DEFAULT_BAUD_RATE: u32 = 19200;

/// Baud rates [`SerialPort::open`] accepts
pub const SUPPORTED_BAUD_RATES: [u32; 8] = [1200, 2400, 4800, 9600, 19200, 38400, 57600, 115200];

/// # Serial Port
///
/// ## Example
///
/// ```no_run
/// use smartparallel::transport::SerialPort;
///
/// let mut port = SerialPort::open("/dev/ttyS0", 19200)?;
/// port.write_all(b"HELLO\r\n\0")?;
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct SerialPort {
    file: File,
    path: PathBuf,
}

impl SerialPort {
    /// Open and configure a serial device.
    ///
    /// ## Errors
    ///
    /// Returns an error if:
    /// - The baud rate isn't one of [`SUPPORTED_BAUD_RATES`]
    /// - The device doesn't exist
    /// - Permission denied (may need the dialout group)
    /// - TTY configuration fails
    pub fn open<P: AsRef<Path>>(device: P, baud_rate: u32) -> Result<Self, SmartParallelError> {
        let path = device.as_ref();

        let speed = baud_constant(baud_rate).ok_or_else(|| {
            SmartParallelError::Config(format!(
                "Unsupported baud rate {}. Use one of {:?}",
                baud_rate, SUPPORTED_BAUD_RATES
            ))
        })?;

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map_err(|e| {
                SmartParallelError::Transport(format!("Failed to open {}: {}", path.display(), e))
            })?;

        configure_tty_raw(file.as_raw_fd(), speed)?;
        tracing::info!(device = %path.display(), baud_rate, "serial port open");

        Ok(Self {
            file,
            path: path.to_path_buf(),
        })
    }

    /// Device path this port was opened from
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write all of `data` and flush.
    pub fn write_all(&mut self, data: &[u8]) -> io::Result<()> {
        self.file.write_all(data)?;
        self.file.flush()
    }

    /// Read whatever is available, waiting at most `deadline` for data.
    pub fn read_timeout(&mut self, buf: &mut [u8], deadline: Duration) -> io::Result<usize> {
        if !wait_readable(self.file.as_raw_fd(), deadline)? {
            return Err(io::Error::new(
                io::ErrorKind::TimedOut,
                "read deadline exceeded",
            ));
        }
        self.file.read(buf)
    }
}

/// Map a numeric baud rate to its termios speed constant.
fn baud_constant(baud_rate: u32) -> Option<libc::speed_t> {
    let speed = match baud_rate {
        1200 => libc::B1200,
        2400 => libc::B2400,
        4800 => libc::B4800,
        9600 => libc::B9600,
        19200 => libc::B19200,
        38400 => libc::B38400,
        57600 => libc::B57600,
        115200 => libc::B115200,
        _ => return None,
    };
    Some(speed)
}

/// Configure a file descriptor for raw 8N1 TTY mode at the given speed.
fn configure_tty_raw(fd: i32, speed: libc::speed_t) -> Result<(), SmartParallelError> {
    use std::mem::MaybeUninit;

    let mut termios = MaybeUninit::uninit();
    let result = unsafe { libc::tcgetattr(fd, termios.as_mut_ptr()) };
    if result != 0 {
        return Err(SmartParallelError::Transport(format!(
            "tcgetattr failed: {}",
            io::Error::last_os_error()
        )));
    }
    let mut termios = unsafe { termios.assume_init() };

    termios.c_iflag &= !(libc::IGNBRK
        | libc::BRKINT
        | libc::PARMRK
        | libc::ISTRIP
        | libc::INLCR
        | libc::IGNCR
        | libc::ICRNL
        | libc::IXON
        | libc::IXOFF
        | libc::IXANY);

    termios.c_oflag &= !libc::OPOST;

    termios.c_lflag &= !(libc::ECHO | libc::ECHONL | libc::ICANON | libc::ISIG | libc::IEXTEN);

    termios.c_cflag &= !(libc::CSIZE | libc::PARENB | libc::CSTOPB | libc::CRTSCTS);
    termios.c_cflag |= libc::CS8 | libc::CLOCAL | libc::CREAD;

    // Reads return immediately with what's buffered; poll() provides the deadline
    termios.c_cc[libc::VMIN] = 0;
    termios.c_cc[libc::VTIME] = 0;

    let result = unsafe {
        libc::cfsetispeed(&mut termios, speed) | libc::cfsetospeed(&mut termios, speed)
    };
    if result != 0 {
        return Err(SmartParallelError::Transport(format!(
            "cfsetspeed failed: {}",
            io::Error::last_os_error()
        )));
    }

    let result = unsafe { libc::tcsetattr(fd, libc::TCSANOW, &termios) };
    if result != 0 {
        return Err(SmartParallelError::Transport(format!(
            "tcsetattr failed: {}",
            io::Error::last_os_error()
        )));
    }

    Ok(())
}

/// Wait until `fd` is readable. Returns `false` if `deadline` passed first.
fn wait_readable(fd: i32, deadline: Duration) -> io::Result<bool> {
    let started = Instant::now();
    let mut pfd = libc::pollfd {
        fd,
        events: libc::POLLIN,
        revents: 0,
    };

    loop {
        // Interrupted polls resume with whatever is left of the deadline
        let timeout_ms = poll_timeout_ms(deadline.saturating_sub(started.elapsed()));
        let ready = unsafe { libc::poll(&mut pfd, 1, timeout_ms) };
        if ready < 0 {
            let err = io::Error::last_os_error();
            if err.kind() == io::ErrorKind::Interrupted {
                continue;
            }
            return Err(err);
        }
        return Ok(ready > 0);
    }
}

/// Milliseconds for `poll(2)`, rounded up so a sub-millisecond remainder
/// still waits instead of polling with zero.
fn poll_timeout_ms(remaining: Duration) -> libc::c_int {
    let ms = remaining.as_nanos().div_ceil(1_000_000);
    ms.min(libc::c_int::MAX as u128) as libc::c_int
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_device_path() {
        assert_eq!(DEFAULT_DEVICE, "/dev/ttyS0");
        assert_eq!(DEFAULT_BAUD_RATE, 19200);
    }

    #[test]
    fn test_supported_baud_rates_map() {
        for rate in SUPPORTED_BAUD_RATES {
            assert!(baud_constant(rate).is_some(), "{rate} should be supported");
        }
    }

    #[test]
    fn test_unsupported_baud_rate_rejected() {
        assert!(baud_constant(12345).is_none());
        match SerialPort::open("/dev/null", 12345) {
            Err(SmartParallelError::Config(msg)) => assert!(msg.contains("12345")),
            other => panic!("expected config error, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_missing_device_is_transport_error() {
        let result = SerialPort::open("/nonexistent/ttyS99", DEFAULT_BAUD_RATE);
        assert!(matches!(result, Err(SmartParallelError::Transport(_))));
    }

    #[test]
    fn test_wait_readable_times_out_on_silent_pipe() {
        let mut fds = [0i32; 2];
        assert_eq!(unsafe { libc::pipe(fds.as_mut_ptr()) }, 0);

        let readable = wait_readable(fds[0], Duration::from_millis(10)).unwrap();
        assert!(!readable);

        unsafe {
            libc::close(fds[0]);
            libc::close(fds[1]);
        }
    }

    #[test]
    fn test_wait_readable_stays_within_deadline() {
        let mut fds = [0i32; 2];
        assert_eq!(unsafe { libc::pipe(fds.as_mut_ptr()) }, 0);

        let started = Instant::now();
        assert!(!wait_readable(fds[0], Duration::from_millis(30)).unwrap());
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_millis(30));
        assert!(elapsed < Duration::from_secs(1), "waited {elapsed:?}");

        unsafe {
            libc::close(fds[0]);
            libc::close(fds[1]);
        }
    }

    #[test]
    fn test_poll_timeout_uses_remaining_time() {
        assert_eq!(poll_timeout_ms(Duration::ZERO), 0);
        assert_eq!(poll_timeout_ms(Duration::from_micros(1)), 1);
        assert_eq!(poll_timeout_ms(Duration::from_millis(500)), 500);
        assert_eq!(poll_timeout_ms(Duration::from_micros(1500)), 2);
        assert_eq!(poll_timeout_ms(Duration::MAX), libc::c_int::MAX);
    }

    // Note: configuring a real TTY requires hardware.
}
