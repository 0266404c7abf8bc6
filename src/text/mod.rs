//! # Text Preparation
//!
//! Turns a text file into lines that fit the printer.
//!
//! - [`source`]: reads a file into raw lines
//! - [`reflow`]: fits raw lines to the column width under a [`WrapPolicy`]

pub mod reflow;
pub mod source;

pub use reflow::{
    BREAK_CHAR, ColumnWidth, DisplayLine, PrintMode, VALID_COLUMNS, WrapPolicy, reflow, reflow_line,
};
pub use source::{RawLine, lines_from_reader, read_lines};
