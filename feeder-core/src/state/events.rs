//! Events that trigger state transitions

/// Events that can trigger state transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Connection lifecycle
    /// Serial link acquired
    Connected,
    /// Serial link could not be acquired
    OpenFailed,

    // Loop body
    /// Started transmitting the next frame
    Send,
    /// Frame written and flushed
    Sent,
    /// Inter-frame delay elapsed
    Wake,

    // Termination
    /// External interrupt observed
    Interrupted,
    /// Unrecoverable write, flush or encode failure
    Fault,
}
