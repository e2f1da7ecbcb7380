//! Seriallcd Feeder
//!
//! Feeds a rotating set of JSON payloads into a seriallcd display
//! controller over a serial device. Handy with a socat PTY pair: one end
//! for seriallcd `--device`, the other for this tool.
//!
//! ```text
//! socat -d -d pty,raw,echo=0 pty,raw,echo=0
//! seriallcd-feeder --device /dev/pts/3 --baud 115200
//! ```

use std::process::ExitCode;

use clap::Parser;
use feeder_core::{catalog, RunSummary, StopToken, TransmitConfig, Transmitter};
use feeder_hal::LinkConfig;
use tracing::{debug, error, info};

mod cli;
mod config;
mod error;
mod logging;
mod signals;
mod transport;

use crate::cli::Cli;
use crate::error::Error;
use crate::transport::SerialConnector;

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::setup(cli.verbosity.clone());

    match run(cli) {
        Ok(summary) => {
            info!("Stopped after sending {} frames", summary.frames_sent);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", error::report(&e));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<RunSummary, Error> {
    let catalog = match &cli.catalog {
        Some(path) => config::load_catalog(path)?,
        None => catalog::builtin(),
    };

    let stop = StopToken::new();
    signals::install(stop.clone()).map_err(Error::Signals)?;

    let transmit_config = TransmitConfig {
        device: cli.device,
        link: LinkConfig::with_baudrate(cli.baud),
        delay: cli.delay,
    };
    let mut transmitter = Transmitter::new(SerialConnector, catalog, transmit_config)?;

    let result = transmitter.run(&stop);
    debug!(
        "Transmitter finished in {:?} after {} frames",
        transmitter.state(),
        transmitter.cursor()
    );
    Ok(result?)
}
