//! Real serial transport over the `serialport` crate.

use super::error::PortError;
use super::traits::{ProbePort, Transport};
use crate::params::{DataBits, Parity, PortSettings, StopBits};
use std::io::{Read, Write};
use std::time::Duration;

impl From<DataBits> for serialport::DataBits {
    fn from(bits: DataBits) -> Self {
        match bits {
            DataBits::Seven => serialport::DataBits::Seven,
            DataBits::Eight => serialport::DataBits::Eight,
        }
    }
}

impl From<Parity> for serialport::Parity {
    fn from(parity: Parity) -> Self {
        match parity {
            Parity::None => serialport::Parity::None,
            Parity::Odd => serialport::Parity::Odd,
            Parity::Even => serialport::Parity::Even,
        }
    }
}

impl From<StopBits> for serialport::StopBits {
    fn from(bits: StopBits) -> Self {
        match bits {
            StopBits::One => serialport::StopBits::One,
            StopBits::Two => serialport::StopBits::Two,
        }
    }
}

/// Transport backed by the platform serial driver.
#[derive(Debug, Clone, Copy, Default)]
pub struct SerialTransport;

impl SerialTransport {
    pub fn new() -> Self {
        Self
    }
}

impl Transport for SerialTransport {
    fn open(
        &self,
        device: &str,
        settings: &PortSettings,
        read_timeout: Duration,
    ) -> Result<Box<dyn ProbePort>, PortError> {
        // Flow-control variants are out of scope; every open pins it to none.
        let port = serialport::new(device, settings.baud_rate)
            .data_bits(settings.data_bits.into())
            .parity(settings.parity.into())
            .stop_bits(settings.stop_bits.into())
            .flow_control(serialport::FlowControl::None)
            .timeout(read_timeout)
            .open()
            .map_err(|e| match e.kind() {
                serialport::ErrorKind::NoDevice => PortError::not_found(device),
                serialport::ErrorKind::InvalidInput => PortError::config(e.to_string()),
                _ => PortError::Serial(e),
            })?;

        Ok(Box::new(SyncProbePort { port }))
    }
}

/// An open connection wrapping `serialport::SerialPort`; dropped after each
/// probe attempt, which closes the underlying descriptor.
struct SyncProbePort {
    port: Box<dyn serialport::SerialPort>,
}

impl ProbePort for SyncProbePort {
    fn write_bytes(&mut self, data: &[u8]) -> Result<usize, PortError> {
        self.port.write(data).map_err(PortError::Io)
    }

    fn read_bytes(&mut self, buffer: &mut [u8]) -> Result<usize, PortError> {
        self.port.read(buffer).map_err(PortError::Io)
    }
}
