//! Seriallcd Feeder Hardware Abstraction Layer
//!
//! This crate defines the serial transport traits the transmit loop is
//! written against. Implementations live elsewhere: the `feeder` binary
//! backs them with a real serial port, tests back them with scripted mocks.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  feeder-core (transmit loop)            │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  feeder-hal (this crate - traits)       │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │  serialport   │       │  test mocks   │
//! │ (feeder bin)  │       │               │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`uart::Connector`] - Acquire a link by device path
//! - [`uart::SerialLink`] - Write, flush and close an open link

#![no_std]
#![deny(unsafe_code)]

pub mod uart;

pub use uart::{Connector, DataBits, LinkConfig, Parity, SerialLink, StopBits};
