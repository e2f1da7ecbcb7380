//! Scoped ownership of an open serial link
//!
//! The guard releases the link exactly once: either through an explicit
//! [`Connection::close`] or, failing that, when it is dropped.

use feeder_hal::SerialLink;

/// Exclusive owner of an open link
pub struct Connection<L: SerialLink> {
    link: L,
    closed: bool,
}

impl<L: SerialLink> Connection<L> {
    pub fn new(link: L) -> Self {
        Self {
            link,
            closed: false,
        }
    }

    /// Write one encoded frame as a single transmission, then flush
    pub fn send(&mut self, bytes: &[u8]) -> Result<(), L::Error> {
        self.link.write_all(bytes)?;
        self.link.flush()
    }

    /// Release the link
    ///
    /// Only the first call reaches the link; later calls return `Ok(())`.
    pub fn close(&mut self) -> Result<(), L::Error> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.link.close()
    }
}

impl<L: SerialLink> Drop for Connection<L> {
    fn drop(&mut self) {
        if !self.closed {
            self.closed = true;
            if self.link.close().is_err() {
                tracing::warn!("Failed to close serial link during drop");
            }
        }
    }
}
