//! # SmartParallel Wire Framing
//!
//! The SmartParallel interface receives text one line at a time over the
//! serial link and forwards it to the parallel printer.
//!
//! ## Line Frames
//!
//! Every payload line is sent as:
//!
//! ```text
//! ┌──────────────┬──────┬──────┬──────┐
//! │ line bytes   │  CR  │  LF  │ NUL  │
//! │ (≤ columns)  │ 0x0D │ 0x0A │ 0x00 │
//! └──────────────┴──────┴──────┴──────┘
//! ```
//!
//! CR LF ends the printed line; NUL marks the end of the transmission so the
//! interface knows it can start printing.
//!
//! ## Command Frames
//!
//! Control requests are a fixed 3-byte sequence:
//!
//! ```text
//! ┌────────┬──────┬──────┐
//! │ marker │ code │ NUL  │
//! └────────┴──────┴──────┘
//! ```
//!
//! The marker byte distinguishes a command from payload text. Marker and
//! command codes are peripheral-specific and come from configuration.

// ============================================================================
// FRAMING CONSTANTS
// ============================================================================

/// CR (Carriage Return)
pub const CR: u8 = 0x0D;

/// LF (Line Feed)
pub const LF: u8 = 0x0A;

/// NUL - end-of-transmission terminator
///
/// Closes every line frame and every command frame.
pub const TERMINATOR: u8 = 0x00;

/// Line terminator sent after each line's text
pub const LINE_END: [u8; 2] = [CR, LF];

/// Default command marker byte (SOH)
pub const DEFAULT_COMMAND_MARKER: u8 = 0x01;

/// Default status-request command code
pub const DEFAULT_STATUS_CODE: u8 = 0x10;

// ============================================================================
// LINE FRAMES
// ============================================================================

/// # Line Frame
///
/// Build the complete frame for one line of text.
///
/// ## Example
///
/// ```
/// use smartparallel::protocol::frame;
///
/// assert_eq!(frame::line(b"HI"), vec![b'H', b'I', 0x0D, 0x0A, 0x00]);
/// ```
pub fn line(text: &[u8]) -> Vec<u8> {
    let mut frame = Vec::with_capacity(text.len() + LINE_END.len() + 1);
    frame.extend_from_slice(text);
    frame.extend_from_slice(&LINE_END);
    frame.push(TERMINATOR);
    frame
}

// ============================================================================
// COMMAND FRAMES
// ============================================================================

/// # Command Frame
///
/// A control request for the interface, as opposed to payload text.
///
/// | Byte | Value |
/// |------|-------|
/// | 0 | marker |
/// | 1 | command code |
/// | 2 | NUL terminator |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandFrame {
    /// Byte announcing a command
    pub marker: u8,
    /// Command code
    pub code: u8,
}

impl CommandFrame {
    /// Create a command frame.
    pub const fn new(marker: u8, code: u8) -> Self {
        Self { marker, code }
    }

    /// Encode as the 3 bytes sent on the wire.
    ///
    /// ```
    /// use smartparallel::protocol::frame::CommandFrame;
    ///
    /// assert_eq!(CommandFrame::new(0x01, 0x10).to_bytes(), [0x01, 0x10, 0x00]);
    /// ```
    #[inline]
    pub const fn to_bytes(self) -> [u8; 3] {
        [self.marker, self.code, TERMINATOR]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_end_bytes() {
        assert_eq!(LINE_END, [0x0D, 0x0A]);
        assert_eq!(TERMINATOR, 0x00);
    }

    #[test]
    fn test_line_frame() {
        assert_eq!(line(b"abc"), vec![b'a', b'b', b'c', 0x0D, 0x0A, 0x00]);
    }

    #[test]
    fn test_empty_line_frame() {
        assert_eq!(line(b""), vec![0x0D, 0x0A, 0x00]);
    }

    #[test]
    fn test_command_frame_layout() {
        let frame = CommandFrame::new(0xAA, 0x42);
        assert_eq!(frame.to_bytes(), [0xAA, 0x42, 0x00]);
    }
}
