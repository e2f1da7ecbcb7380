//! State machine definition
//!
//! ```text
//! INIT ──Connected──► CONNECTED ──Send──► SENDING ◄──Wake── WAITING
//!   │                     │                  │ └────Sent────►  │
//!   └─OpenFailed──────────┴─Interrupted/Fault┴─────────────────┴──► CLOSED
//! ```

use super::events::Event;

/// Transmit loop states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// Nothing acquired yet
    Init,
    /// Link open, no frame sent yet
    Connected,
    /// Writing a frame
    Sending,
    /// Sleeping out the inter-frame delay
    Waiting,
    /// Link released (or never acquired); terminal
    Closed,
}

impl State {
    /// Check if this is the terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, State::Closed)
    }

    /// Process an event and return the next state
    ///
    /// Events that do not apply to the current state leave it unchanged.
    pub fn transition(self, event: Event) -> Self {
        use State::*;

        match (self, event) {
            // Closed absorbs everything
            (Closed, _) => Closed,

            // Termination from any live state
            (_, Event::Interrupted) | (_, Event::Fault) => Closed,

            (Init, Event::Connected) => Connected,
            (Init, Event::OpenFailed) => Closed,

            (Connected, Event::Send) => Sending,
            (Sending, Event::Sent) => Waiting,
            (Waiting, Event::Wake) => Sending,

            (state, _) => state,
        }
    }
}
