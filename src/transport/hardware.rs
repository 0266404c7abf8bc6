//! # SmartParallel Hardware Channel
//!
//! The real printer link: text goes out over the serial port, readiness
//! comes in on the CTS GPIO pin.
//!
//! ```no_run
//! use smartparallel::transport::HardwareChannel;
//!
//! let channel = HardwareChannel::open("/dev/ttyS0", 19200, 8)?;
//!
//! # Ok::<(), smartparallel::SmartParallelError>(())
//! ```

use std::io;
use std::path::Path;
use std::time::Duration;

use super::{Channel, CtsPin, SerialPort};
use crate::error::SmartParallelError;

/// Serial port + CTS pin
pub struct HardwareChannel {
    port: SerialPort,
    cts: CtsPin,
}

impl HardwareChannel {
    /// Open the serial device and the CTS pin.
    pub fn open<P: AsRef<Path>>(
        device: P,
        baud_rate: u32,
        cts_pin: u32,
    ) -> Result<Self, SmartParallelError> {
        let cts = CtsPin::open(cts_pin)?;
        let port = SerialPort::open(device, baud_rate)?;
        Ok(Self::from_parts(port, cts))
    }

    /// Combine an already opened port and pin.
    pub fn from_parts(port: SerialPort, cts: CtsPin) -> Self {
        Self { port, cts }
    }
}

impl Channel for HardwareChannel {
    /// A pin that can't be read counts as not ready, so a persistent fault
    /// ends in the transmitter's readiness timeout.
    fn is_ready(&mut self) -> bool {
        match self.cts.is_asserted() {
            Ok(ready) => ready,
            Err(e) => {
                tracing::warn!(pin = self.cts.pin(), error = %e, "failed to sample CTS");
                false
            }
        }
    }

    fn write_bytes(&mut self, data: &[u8]) -> io::Result<()> {
        self.port.write_all(data)
    }

    fn read_bytes(&mut self, buf: &mut [u8], deadline: Duration) -> io::Result<usize> {
        self.port.read_timeout(buf, deadline)
    }
}
