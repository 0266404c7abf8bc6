//! # CTS Input via sysfs GPIO
//!
//! The SmartParallel interface pulls its CTS line low when it can accept a
//! line of text. The line is wired to a GPIO input (BCM pin 8 by default)
//! and sampled through the Linux sysfs GPIO interface.
//!
//! ## Setup
//!
//! The signal is active low and needs a pull-up, which sysfs can't
//! configure. On a Raspberry Pi set it at boot in `config.txt`:
//!
//! ```text
//! gpio=8=ip,pu
//! ```
//!
//! [`CtsPin::open`] exports the pin if necessary and sets it as an input.

use std::fs::{self, File};
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};

use crate::error::SmartParallelError;

/// Default GPIO pin for CTS
pub const DEFAULT_CTS_PIN: u32 = 8;

/// Root of the sysfs GPIO interface
pub const SYSFS_GPIO_ROOT: &str = "/sys/class/gpio";

/// How long to wait for the kernel to create a freshly exported pin
const EXPORT_TIMEOUT: Duration = Duration::from_secs(1);

/// # CTS Pin
///
/// An active-low GPIO input: value `0` means the printer is ready.
pub struct CtsPin {
    pin: u32,
    value: File,
}

impl CtsPin {
    /// Open a pin under `/sys/class/gpio`.
    pub fn open(pin: u32) -> Result<Self, SmartParallelError> {
        Self::open_at(SYSFS_GPIO_ROOT, pin)
    }

    /// Open a pin under an arbitrary sysfs-style root.
    ///
    /// ## Errors
    ///
    /// Returns [`SmartParallelError::Transport`] if the pin can't be
    /// exported, configured as an input or opened.
    pub fn open_at<P: AsRef<Path>>(root: P, pin: u32) -> Result<Self, SmartParallelError> {
        let root = root.as_ref();
        let dir = root.join(format!("gpio{}", pin));

        if !dir.exists() {
            export(root, pin, &dir)?;
        }

        fs::write(dir.join("direction"), "in").map_err(|e| {
            SmartParallelError::Transport(format!("Failed to set GPIO {} as input: {}", pin, e))
        })?;

        let value = File::open(dir.join("value")).map_err(|e| {
            SmartParallelError::Transport(format!("Failed to open GPIO {} value: {}", pin, e))
        })?;

        tracing::info!(pin, "CTS pin configured");
        Ok(Self { pin, value })
    }

    /// GPIO pin number
    pub fn pin(&self) -> u32 {
        self.pin
    }

    /// Sample the pin. `true` when CTS is asserted (line pulled low).
    pub fn is_asserted(&mut self) -> io::Result<bool> {
        let mut buf = [0u8; 2];
        self.value.seek(SeekFrom::Start(0))?;
        let n = self.value.read(&mut buf)?;

        match buf[..n].first() {
            Some(b'0') => Ok(true),
            Some(b'1') => Ok(false),
            _ => Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("unexpected GPIO {} value {:?}", self.pin, &buf[..n]),
            )),
        }
    }
}

/// Export `pin` and wait for its directory to appear.
fn export(root: &Path, pin: u32, dir: &Path) -> Result<(), SmartParallelError> {
    fs::write(root.join("export"), pin.to_string()).map_err(|e| {
        SmartParallelError::Transport(format!("Failed to export GPIO {}: {}", pin, e))
    })?;

    // The kernel creates the pin directory asynchronously
    let started = Instant::now();
    while !dir.exists() {
        if started.elapsed() >= EXPORT_TIMEOUT {
            return Err(SmartParallelError::Transport(format!(
                "GPIO {} was not created after export",
                pin
            )));
        }
        thread::sleep(Duration::from_millis(10));
    }

    tracing::debug!(pin, "exported GPIO pin");
    Ok(())
}
