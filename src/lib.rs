//! # SmartParallel - Text Printing over a CTS-Handshaked Serial Link
//!
//! SmartParallel is a serial-to-parallel printer interface. This library
//! prints plain text files through it. It provides:
//!
//! - **Reflow**: fitting text to 40, 80 or 132 columns
//! - **Transmission**: the per-line CTS handshake
//! - **Protocol**: line and command framing, status queries
//! - **Transport**: serial TTY, GPIO CTS input, dry-run and mock channels
//!
//! ## Quick Start
//!
//! ```no_run
//! use smartparallel::{
//!     printer::PrintConfig,
//!     text::{self, reflow},
//!     transmit::Transmitter,
//!     transport::HardwareChannel,
//! };
//!
//! let config = PrintConfig::default();
//!
//! // Load and reflow the text
//! let raw = text::read_lines("notes.txt")?;
//! let lines = reflow(&raw, config.columns.get(), config.wrap_policy);
//!
//! // Open the link and send
//! let channel = HardwareChannel::open(&config.device, config.baud_rate, config.cts_pin)?;
//! let result = Transmitter::new(channel, config.transmit_settings())
//!     .transmit(&lines)?
//!     .into_result()?;
//!
//! println!("Sent {} lines", result.lines_sent);
//!
//! # Ok::<(), smartparallel::error::SmartParallelError>(())
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`text`] | Line source and reflow |
//! | [`transmit`] | Handshake state machine |
//! | [`protocol`] | Wire framing and status queries |
//! | [`transport`] | Channels |
//! | [`printer`] | Configuration |
//! | [`error`] | Error types |

pub mod error;
pub mod printer;
pub mod protocol;
pub mod text;
pub mod transmit;
pub mod transport;

// Re-exports for convenience
pub use error::SmartParallelError;
pub use printer::PrintConfig;
pub use text::{ColumnWidth, DisplayLine, WrapPolicy, reflow};
pub use transmit::{TransmissionResult, Transmitter, transmit};
pub use transport::Channel;
