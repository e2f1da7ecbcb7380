//! Frame encoding and decoding for the seriallcd line protocol.
//!
//! Frame format:
//! - PAYLOAD: a JSON object, compact (no whitespace between tokens), UTF-8
//! - DELIMITER (1 byte): `\n`
//!
//! There is no length prefix, checksum or acknowledgement. Text values are
//! passed through verbatim, so device-side markers such as `{0x00}` reach
//! the controller untouched.

use crate::value::FrameDescriptor;

/// Frame delimiter byte
pub const FRAME_DELIMITER: u8 = b'\n';

/// Maximum accepted line length when reassembling frames, delimiter excluded
pub const MAX_LINE_LEN: usize = 4096;

/// Errors that can occur while encoding a frame
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    /// Serializer rejected the descriptor
    #[error("failed to serialize frame")]
    Serialize(#[source] serde_json::Error),
}

/// Errors that can occur while decoding a frame
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// Line is not valid JSON, or not a JSON object
    #[error("invalid frame JSON")]
    InvalidJson(#[source] serde_json::Error),
    /// Line exceeded [`MAX_LINE_LEN`] and was dropped
    #[error("frame exceeds maximum line length")]
    LineTooLong,
}

/// Encode a frame as one compact JSON line, delimiter included
pub fn encode_line(frame: &FrameDescriptor) -> Result<Vec<u8>, EncodeError> {
    let mut buffer = Vec::with_capacity(128);
    serde_json::to_writer(&mut buffer, frame).map_err(EncodeError::Serialize)?;
    buffer.push(FRAME_DELIMITER);
    Ok(buffer)
}

/// Decode a single line into a frame
///
/// A trailing `\n` or `\r\n` is accepted and ignored.
pub fn decode_line(line: &[u8]) -> Result<FrameDescriptor, DecodeError> {
    let line = line.strip_suffix(&[FRAME_DELIMITER]).unwrap_or(line);
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    serde_json::from_slice(line).map_err(DecodeError::InvalidJson)
}

/// Reassembles newline-delimited frames from a byte stream
#[derive(Debug, Clone, Default)]
pub struct LineParser {
    buffer: Vec<u8>,
    discarding: bool,
}

impl LineParser {
    /// Create a new line parser
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset the parser state
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.discarding = false;
    }

    /// Feed a single byte to the parser
    ///
    /// Returns `Ok(Some(frame))` when a complete valid frame is parsed,
    /// `Ok(None)` when more bytes are needed, or `Err` when a completed line
    /// is malformed or oversized. Empty lines are skipped.
    pub fn feed(&mut self, byte: u8) -> Result<Option<FrameDescriptor>, DecodeError> {
        if byte != FRAME_DELIMITER {
            if self.discarding {
                return Ok(None);
            }
            if self.buffer.len() == MAX_LINE_LEN {
                self.buffer.clear();
                self.discarding = true;
                return Err(DecodeError::LineTooLong);
            }
            self.buffer.push(byte);
            return Ok(None);
        }

        if self.discarding {
            // Resynchronised on the delimiter after an oversized line
            self.discarding = false;
            return Ok(None);
        }

        let line = core::mem::take(&mut self.buffer);
        if line.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        decode_line(&line).map(Some)
    }

    /// Feed multiple bytes to the parser
    ///
    /// Returns every complete frame found, in order. Stops at the first
    /// malformed line; bytes after it are not consumed.
    pub fn feed_bytes(&mut self, bytes: &[u8]) -> Result<Vec<FrameDescriptor>, DecodeError> {
        let mut frames = Vec::new();
        for &byte in bytes {
            if let Some(frame) = self.feed(byte)? {
                frames.push(frame);
            }
        }
        Ok(frames)
    }

    /// Number of bytes buffered for the current, incomplete line
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }
}
