//! Interrupt wiring
//!
//! SIGINT and SIGTERM are the loop's only planned exit. A helper thread
//! turns them into a cancel on the transmit loop's stop token.

use std::io;
use std::thread;

use feeder_core::StopToken;
use signal_hook::consts::{SIGINT, SIGTERM};
use signal_hook::iterator::Signals;
use tracing::{debug, warn};

/// Cancel `stop` when SIGINT or SIGTERM arrives
pub fn install(stop: StopToken) -> io::Result<()> {
    let mut signals = Signals::new([SIGINT, SIGTERM])?;

    thread::Builder::new()
        .name("signals".into())
        .spawn(move || {
            for signal in signals.forever() {
                if stop.is_cancelled() {
                    debug!("Signal {} ignored, already stopping", signal);
                    continue;
                }
                warn!("Received signal {}, stopping after the current frame", signal);
                stop.cancel();
            }
        })?;

    debug!("Interrupt handler installed");
    Ok(())
}
