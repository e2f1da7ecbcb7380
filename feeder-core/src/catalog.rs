//! Frame catalog
//!
//! An immutable, ordered, non-empty list of frame descriptors. Frames are
//! selected cyclically: the frame for cursor `n` is `frames[n % len]`.

use feeder_protocol::FrameDescriptor;

/// Catalog construction errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    /// No frames were supplied
    #[error("frame catalog is empty")]
    Empty,
}

/// Ordered, non-empty frame list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    frames: Vec<FrameDescriptor>,
}

impl Catalog {
    /// Build a catalog from an ordered list of frames
    pub fn new(frames: Vec<FrameDescriptor>) -> Result<Self, CatalogError> {
        if frames.is_empty() {
            return Err(CatalogError::Empty);
        }
        Ok(Self { frames })
    }

    /// Number of frames, always at least one
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Always false; present for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Catalog position selected by `cursor`
    pub fn index_for(&self, cursor: u64) -> usize {
        // len fits in u64 and the remainder is < len, so both casts are lossless
        (cursor % self.frames.len() as u64) as usize
    }

    /// Frame selected by `cursor`
    pub fn frame_at(&self, cursor: u64) -> &FrameDescriptor {
        &self.frames[self.index_for(cursor)]
    }

    pub fn frames(&self) -> &[FrameDescriptor] {
        &self.frames
    }
}

/// The built-in demo catalog
///
/// Each entry exercises one controller feature, in this order:
/// 1. Two-line text with glyph markers and scrolling
/// 2. Progress bar
/// 3. Blinking alert with a time-to-live
/// 4. Backlight off
/// 5. Clear and test pattern
pub fn builtin() -> Catalog {
    let frames = vec![
        FrameDescriptor::new()
            .with("line1", "HELLO PI | {0x00}{0x01} | Scroll demo for a long line")
            .with("line2", "IP 192.168.0.99 | Uptime 12:34:56")
            .with("scroll_speed_ms", 200)
            .with("page_timeout_ms", 50000),
        FrameDescriptor::new()
            .with("line1", "CPU LOAD")
            .with("bar_value", 730)
            .with("bar_max", 1000)
            .with("page_timeout_ms", 10000),
        FrameDescriptor::new()
            .with("line1", "ALERT: Temp")
            .with("line2", "85C HOT!")
            .with("blink", true)
            .with("ttl_ms", 8000),
        FrameDescriptor::new()
            .with("line1", "Backlight OFF demo")
            .with("line2", "It should go dark")
            .with("backlight", false)
            .with("page_timeout_ms", 4000),
        FrameDescriptor::new()
            .with("line1", "Clear + Test Pattern")
            .with("line2", "Ensure wiring is OK")
            .with("page_timeout_ms", 4000),
    ];
    Catalog { frames }
}
