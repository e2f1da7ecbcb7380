//! UART serial communication abstractions
//!
//! The feeder only ever transmits. Reads are never issued, but the read
//! timeout is still part of the link configuration so implementations can
//! open the port with bounded blocking semantics.

use core::time::Duration;

/// Default read timeout applied when opening a link
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(1);

/// Default baud rate
pub const DEFAULT_BAUDRATE: u32 = 115_200;

/// An open serial link
///
/// Owned exclusively by one writer for its whole lifetime.
pub trait SerialLink {
    /// Error type for write, flush and close operations
    type Error;

    /// Write all of `data` as a single transmission
    ///
    /// Blocks until every byte has been handed to the transport or an
    /// error occurs.
    fn write_all(&mut self, data: &[u8]) -> Result<(), Self::Error>;

    /// Flush any buffered data
    fn flush(&mut self) -> Result<(), Self::Error>;

    /// Release the underlying device
    ///
    /// Called once on shutdown. Implementations must treat a second call
    /// as a no-op.
    fn close(&mut self) -> Result<(), Self::Error>;
}

/// Opens serial links by device path
pub trait Connector {
    /// Link type produced by a successful open
    type Link: SerialLink;

    /// Error type for open failures (bad path, permission denied, busy)
    type Error;

    /// Open `device` with the given configuration
    fn open(&mut self, device: &str, config: &LinkConfig) -> Result<Self::Link, Self::Error>;
}

/// Serial link configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkConfig {
    /// Baud rate in bits per second
    pub baudrate: u32,
    /// Number of data bits (typically 8)
    pub data_bits: DataBits,
    /// Parity mode
    pub parity: Parity,
    /// Number of stop bits
    pub stop_bits: StopBits,
    /// Read timeout handed to the transport on open
    pub read_timeout: Duration,
}

impl LinkConfig {
    /// 8N1 configuration at the given baud rate
    pub fn with_baudrate(baudrate: u32) -> Self {
        Self {
            baudrate,
            ..Self::default()
        }
    }
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            baudrate: DEFAULT_BAUDRATE,
            data_bits: DataBits::Eight,
            parity: Parity::None,
            stop_bits: StopBits::One,
            read_timeout: DEFAULT_READ_TIMEOUT,
        }
    }
}

/// Number of data bits per character
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataBits {
    Seven,
    Eight,
}

/// Parity mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parity {
    None,
    Even,
    Odd,
}

/// Number of stop bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopBits {
    One,
    Two,
}
