//! Core traits for the serial transport seam.
//!
//! The probe engine talks to the port exclusively through these traits, so
//! real hardware and scripted mocks are interchangeable.

use super::error::PortError;
use crate::params::PortSettings;
use std::time::Duration;

/// An open serial connection used for a single probe attempt.
///
/// Closing is RAII: dropping the handle releases the port. There is no
/// explicit `close()`; drop is unconditional on every exit path and
/// trivially idempotent.
pub trait ProbePort: Send {
    /// Write bytes to the port, returning the number actually written.
    fn write_bytes(&mut self, data: &[u8]) -> Result<usize, PortError>;

    /// Read bytes into `buffer`, blocking up to the configured read timeout.
    ///
    /// Returns the number of bytes actually read; a timeout with nothing
    /// received is an error, the same as any other read failure.
    fn read_bytes(&mut self, buffer: &mut [u8]) -> Result<usize, PortError>;
}

/// Capability to open a serial connection with candidate settings.
///
/// One connection is opened per probe attempt and dropped before the next
/// attempt begins, so the device is never held by two attempts at once.
pub trait Transport {
    /// Open `device` configured with `settings` and the given read timeout.
    fn open(
        &self,
        device: &str,
        settings: &PortSettings,
        read_timeout: Duration,
    ) -> Result<Box<dyn ProbePort>, PortError>;
}
