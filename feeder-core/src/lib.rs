//! Transport-agnostic core logic for the seriallcd payload feeder
//!
//! This crate contains everything that does not depend on a concrete
//! serial port:
//!
//! - Frame catalog (the rotating list of demo payloads)
//! - Transmit loop state machine
//! - Transmit loop, connection guard and cancellation token

#![deny(unsafe_code)]

pub mod catalog;
pub mod state;
pub mod transmit;

pub use catalog::{Catalog, CatalogError};
pub use state::{Event, State};
pub use transmit::{RunSummary, StopToken, TransmitConfig, TransmitError, Transmitter};
