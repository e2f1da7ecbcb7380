//! Transmit loop
//!
//! Opens one serial link, then cycles through the catalog writing one
//! encoded frame per iteration until the stop token is cancelled.

pub mod cancel;
pub mod connection;
pub mod transmitter;

pub use cancel::StopToken;
pub use connection::Connection;
pub use transmitter::{RunSummary, TransmitConfig, TransmitError, Transmitter};

/// Boxed transport error carried by [`TransmitError`]
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;
