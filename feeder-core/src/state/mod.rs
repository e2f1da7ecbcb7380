//! Transmit loop state machine

pub mod events;
pub mod machine;

pub use events::Event;
pub use machine::State;
