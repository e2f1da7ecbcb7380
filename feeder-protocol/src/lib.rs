//! Seriallcd Frame Protocol
//!
//! This crate defines the payload format the feeder writes to a seriallcd
//! display controller. The wire format is deliberately plain:
//!
//! ```text
//! ┌──────────────────────────────────────────────┬────┐
//! │ compact JSON object (UTF-8, no whitespace)   │ \n │
//! └──────────────────────────────────────────────┴────┘
//! ```
//!
//! Field names and values are opaque to the sender. The controller decides
//! what `line1`, `bar_value`, `ttl_ms` and friends mean; this crate only
//! keeps them in order and serializes them.

#![deny(unsafe_code)]

pub mod frame;
pub mod value;

pub use frame::{
    decode_line, encode_line, DecodeError, EncodeError, LineParser, FRAME_DELIMITER, MAX_LINE_LEN,
};
pub use value::{FrameDescriptor, JsonValue, UnsupportedValue, Value};
