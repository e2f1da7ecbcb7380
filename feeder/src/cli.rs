use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

/// Send sample payloads to seriallcd
#[derive(Debug, Parser)]
#[command(name = "seriallcd-feeder", version, about)]
pub struct Cli {
    #[command(flatten)]
    pub verbosity: clap_verbosity_flag::Verbosity<clap_verbosity_flag::InfoLevel>,

    /// Serial device path (e.g. /dev/ttyAMA0 or a PTY from socat)
    #[arg(long, value_parser = parse_device)]
    pub device: String,

    /// Baud rate
    #[arg(long, default_value_t = 115_200, value_parser = clap::value_parser!(u32).range(1..))]
    pub baud: u32,

    /// Seconds to wait between frames
    #[arg(long, default_value = "4.0", value_parser = parse_delay)]
    pub delay: Duration,

    /// TOML file of `[[frame]]` tables to send instead of the built-in catalog
    #[arg(long)]
    pub catalog: Option<PathBuf>,
}

fn parse_device(s: &str) -> Result<String, String> {
    if s.trim().is_empty() {
        return Err("device path must not be empty".to_owned());
    }
    Ok(s.to_owned())
}

fn parse_delay(s: &str) -> Result<Duration, String> {
    let secs: f64 = s
        .parse()
        .map_err(|_| format!("'{s}' is not a number of seconds"))?;
    if !secs.is_finite() || secs < 0.0 {
        return Err(format!("delay must be a non-negative number of seconds, got {s}"));
    }
    Duration::try_from_secs_f64(secs).map_err(|e| e.to_string())
}
