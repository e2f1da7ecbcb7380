//! `serialport`-backed implementation of the feeder HAL traits

use std::io::{self, ErrorKind, Write};

use feeder_hal::{Connector, DataBits, LinkConfig, Parity, SerialLink, StopBits};
use tracing::debug;

/// Opens real serial devices (TTYs, USB adapters, socat PTYs)
#[derive(Debug, Default, Clone, Copy)]
pub struct SerialConnector;

/// Errors on an open serial link
#[derive(Debug, thiserror::Error)]
pub enum LinkError {
    #[error("serial link already closed")]
    Closed,

    #[error("serial I/O failed")]
    Io(#[from] std::io::Error),
}

/// An open serial port
pub struct SerialPortLink {
    device: String,
    port: Option<Box<dyn serialport::SerialPort>>,
}

impl Connector for SerialConnector {
    type Link = SerialPortLink;
    type Error = serialport::Error;

    fn open(
        &mut self,
        device: &str,
        config: &LinkConfig,
    ) -> Result<SerialPortLink, serialport::Error> {
        let port = serialport::new(device, config.baudrate)
            .data_bits(to_serial_data_bits(config.data_bits))
            .parity(to_serial_parity(config.parity))
            .stop_bits(to_serial_stop_bits(config.stop_bits))
            .flow_control(serialport::FlowControl::None)
            .timeout(config.read_timeout)
            .open()?;

        debug!("Opened {} ({:?})", device, config);
        Ok(SerialPortLink {
            device: device.to_owned(),
            port: Some(port),
        })
    }
}

impl SerialPortLink {
    fn port(&mut self) -> Result<&mut Box<dyn serialport::SerialPort>, LinkError> {
        self.port.as_mut().ok_or(LinkError::Closed)
    }
}

impl SerialLink for SerialPortLink {
    type Error = LinkError;

    /// Write every byte, waiting as long as the receiver needs
    ///
    /// The port timeout only bounds each wait; a stalled reader never
    /// turns into a write fault.
    fn write_all(&mut self, data: &[u8]) -> Result<(), LinkError> {
        let port = self.port()?;
        let mut written = 0;
        while written < data.len() {
            match port.write(&data[written..]) {
                Ok(0) => return Err(io::Error::from(ErrorKind::WriteZero).into()),
                Ok(n) => written += n,
                Err(e) if is_retryable(&e) => continue,
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<(), LinkError> {
        let port = self.port()?;
        loop {
            match port.flush() {
                Ok(()) => return Ok(()),
                Err(e) if is_retryable(&e) => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }

    fn close(&mut self) -> Result<(), LinkError> {
        if self.port.take().is_some() {
            debug!("Released {}", self.device);
        }
        Ok(())
    }
}

fn is_retryable(err: &io::Error) -> bool {
    matches!(err.kind(), ErrorKind::TimedOut | ErrorKind::Interrupted)
}

fn to_serial_data_bits(bits: DataBits) -> serialport::DataBits {
    match bits {
        DataBits::Seven => serialport::DataBits::Seven,
        DataBits::Eight => serialport::DataBits::Eight,
    }
}

fn to_serial_parity(parity: Parity) -> serialport::Parity {
    match parity {
        Parity::None => serialport::Parity::None,
        Parity::Even => serialport::Parity::Even,
        Parity::Odd => serialport::Parity::Odd,
    }
}

fn to_serial_stop_bits(bits: StopBits) -> serialport::StopBits {
    match bits {
        StopBits::One => serialport::StopBits::One,
        StopBits::Two => serialport::StopBits::Two,
    }
}
