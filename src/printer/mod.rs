//! # Printer Module
//!
//! This module provides print job configuration.
//!
//! ## Modules
//!
//! - [`config`]: Layout, handshake and link settings

pub mod config;

pub use config::PrintConfig;
