use feeder_core::TransmitError;

use crate::config::ConfigError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to install interrupt handler")]
    Signals(#[source] std::io::Error),

    #[error(transparent)]
    Transmit(#[from] TransmitError),
}

/// Render an error and all of its sources on one line
pub fn report(err: &dyn std::error::Error) -> String {
    let mut rendered = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        rendered.push_str(": ");
        rendered.push_str(&cause.to_string());
        source = cause.source();
    }
    rendered
}
