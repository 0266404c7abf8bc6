//! # SmartParallel Protocol Implementation
//!
//! Byte-level framing for the SmartParallel serial interface.
//!
//! ## Module Structure
//!
//! - [`frame`]: Line frames, command frames and framing constants
//! - [`status`]: Command sending and status queries
//!
//! ## Usage Example
//!
//! ```
//! use smartparallel::protocol::frame::{self, CommandFrame};
//!
//! let mut data = Vec::new();
//! data.extend(frame::line(b"Hello, printer"));
//! data.extend(CommandFrame::new(0x01, 0x10).to_bytes());
//!
//! assert_eq!(data.len(), 14 + 3 + 3);
//! ```

pub mod frame;
pub mod status;

pub use frame::{CommandFrame, LINE_END, TERMINATOR};
pub use status::{CommandSettings, query_status, send_command};
