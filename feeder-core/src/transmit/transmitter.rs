//! Cyclic frame transmitter

use std::time::Duration;

use feeder_hal::{Connector, LinkConfig, SerialLink};
use feeder_protocol::{encode_line, EncodeError};
use tracing::{debug, info, trace, warn};

use super::cancel::StopToken;
use super::connection::Connection;
use super::BoxError;
use crate::catalog::Catalog;
use crate::state::{Event, State};

/// Default pause between frames
pub const DEFAULT_DELAY: Duration = Duration::from_secs(4);

/// Transmit loop configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransmitConfig {
    /// Serial device to open
    pub device: String,
    /// Link parameters handed to the connector
    pub link: LinkConfig,
    /// Pause after each frame; zero sends back-to-back
    pub delay: Duration,
}

impl TransmitConfig {
    /// Configuration with default link settings and delay
    pub fn new(device: impl Into<String>) -> Self {
        Self {
            device: device.into(),
            link: LinkConfig::default(),
            delay: DEFAULT_DELAY,
        }
    }
}

/// Fatal transmit loop errors
#[derive(Debug, thiserror::Error)]
pub enum TransmitError {
    /// Rejected before any connection attempt
    #[error("serial device path must not be empty")]
    EmptyDevice,

    /// Device could not be opened
    #[error("failed to open serial device {device}")]
    Connection {
        device: String,
        #[source]
        source: BoxError,
    },

    /// Write or flush failed after a successful open
    #[error("failed to write frame {index} at cursor {cursor}")]
    Write {
        cursor: u64,
        index: usize,
        #[source]
        source: BoxError,
    },

    /// `run` called again after the link was already released
    #[error("transmitter already finished")]
    AlreadyFinished,

    #[error(transparent)]
    Encode(#[from] EncodeError),
}

/// Outcome of an interrupted run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Frames written and flushed successfully
    pub frames_sent: u64,
}

/// Sends catalog frames over one serial link until stopped
pub struct Transmitter<C> {
    connector: C,
    catalog: Catalog,
    config: TransmitConfig,
    state: State,
    cursor: u64,
}

impl<C> Transmitter<C>
where
    C: Connector,
    C::Error: Into<BoxError>,
    <C::Link as SerialLink>::Error: Into<BoxError>,
{
    /// Create a transmitter
    ///
    /// Validates the configuration without touching the device.
    pub fn new(
        connector: C,
        catalog: Catalog,
        config: TransmitConfig,
    ) -> Result<Self, TransmitError> {
        if config.device.trim().is_empty() {
            return Err(TransmitError::EmptyDevice);
        }
        Ok(Self {
            connector,
            catalog,
            config,
            state: State::Init,
            cursor: 0,
        })
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// Frames sent so far
    pub fn cursor(&self) -> u64 {
        self.cursor
    }

    /// Run until `stop` is cancelled or a fault occurs
    ///
    /// The link is released exactly once before returning, on every path
    /// that acquired it. A transmitter runs at most once.
    pub fn run(&mut self, stop: &StopToken) -> Result<RunSummary, TransmitError> {
        if self.state.is_terminal() {
            return Err(TransmitError::AlreadyFinished);
        }

        info!(
            "Opening {} at {} baud ({} frames, {:?} delay)",
            self.config.device,
            self.config.link.baudrate,
            self.catalog.len(),
            self.config.delay
        );

        let link = match self.connector.open(&self.config.device, &self.config.link) {
            Ok(link) => link,
            Err(e) => {
                self.advance(Event::OpenFailed);
                return Err(TransmitError::Connection {
                    device: self.config.device.clone(),
                    source: e.into(),
                });
            }
        };
        self.advance(Event::Connected);
        info!("Connected to {}", self.config.device);

        let mut connection = Connection::new(link);
        let outcome = self.pump(&mut connection, stop);

        match &outcome {
            Ok(()) => {
                info!("Interrupted after {} frames", self.cursor);
                self.advance(Event::Interrupted);
            }
            Err(_) => {
                warn!("Transmit fault after {} frames, closing", self.cursor);
                self.advance(Event::Fault);
            }
        }

        if let Err(e) = connection.close() {
            let e: BoxError = e.into();
            warn!("Failed to close {}: {}", self.config.device, e);
        }
        info!("Closed {}", self.config.device);

        outcome.map(|()| RunSummary {
            frames_sent: self.cursor,
        })
    }

    /// Loop body; returns `Ok` only when interrupted
    fn pump(
        &mut self,
        connection: &mut Connection<C::Link>,
        stop: &StopToken,
    ) -> Result<(), TransmitError> {
        loop {
            if stop.is_cancelled() {
                return Ok(());
            }

            self.advance(Event::Send);
            let cursor = self.cursor;
            let index = self.catalog.index_for(cursor);
            let bytes = encode_line(self.catalog.frame_at(cursor))?;

            connection
                .send(&bytes)
                .map_err(|e| TransmitError::Write {
                    cursor,
                    index,
                    source: e.into(),
                })?;

            debug!("Sent frame {} ({} bytes)", index, bytes.len());
            self.cursor += 1;
            self.advance(Event::Sent);

            if self.config.delay.is_zero() {
                if stop.is_cancelled() {
                    return Ok(());
                }
            } else if stop.wait_timeout(self.config.delay) {
                return Ok(());
            }
            self.advance(Event::Wake);
        }
    }

    fn advance(&mut self, event: Event) {
        let next = self.state.transition(event);
        if next != self.state {
            trace!("{:?} --{:?}--> {:?}", self.state, event, next);
        }
        self.state = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use feeder_protocol::{decode_line, FrameDescriptor};
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::thread;
    use std::time::Instant;

    #[derive(Debug, thiserror::Error)]
    #[error("mock transport failure")]
    struct MockError;

    #[derive(Debug, Default)]
    struct Log {
        opens: usize,
        write_attempts: usize,
        writes: Vec<Vec<u8>>,
        flushes: usize,
        closes: usize,
        last_config: Option<(String, LinkConfig)>,
    }

    #[derive(Default)]
    struct MockConnector {
        log: Rc<RefCell<Log>>,
        fail_open: bool,
        /// 1-based write attempt that fails
        fail_on_write: Option<usize>,
        /// Cancel this token once this many writes have succeeded
        cancel_after: Option<(usize, StopToken)>,
    }

    struct MockLink {
        log: Rc<RefCell<Log>>,
        fail_on_write: Option<usize>,
        cancel_after: Option<(usize, StopToken)>,
    }

    impl Connector for MockConnector {
        type Link = MockLink;
        type Error = MockError;

        fn open(&mut self, device: &str, config: &LinkConfig) -> Result<MockLink, MockError> {
            let mut log = self.log.borrow_mut();
            log.opens += 1;
            log.last_config = Some((device.to_owned(), *config));
            if self.fail_open {
                return Err(MockError);
            }
            Ok(MockLink {
                log: self.log.clone(),
                fail_on_write: self.fail_on_write,
                cancel_after: self.cancel_after.clone(),
            })
        }
    }

    impl SerialLink for MockLink {
        type Error = MockError;

        fn write_all(&mut self, data: &[u8]) -> Result<(), MockError> {
            let mut log = self.log.borrow_mut();
            log.write_attempts += 1;
            if self.fail_on_write == Some(log.write_attempts) {
                return Err(MockError);
            }
            log.writes.push(data.to_vec());
            if let Some((after, token)) = &self.cancel_after {
                if log.writes.len() == *after {
                    token.cancel();
                }
            }
            Ok(())
        }

        fn flush(&mut self) -> Result<(), MockError> {
            self.log.borrow_mut().flushes += 1;
            Ok(())
        }

        fn close(&mut self) -> Result<(), MockError> {
            self.log.borrow_mut().closes += 1;
            Ok(())
        }
    }

    fn config(delay: Duration) -> TransmitConfig {
        TransmitConfig {
            delay,
            ..TransmitConfig::new("/dev/ttyUSB0")
        }
    }

    fn transmitter(connector: MockConnector, delay: Duration) -> Transmitter<MockConnector> {
        Transmitter::new(connector, crate::catalog::builtin(), config(delay)).unwrap()
    }

    #[test]
    fn test_empty_device_rejected_before_open() {
        let connector = MockConnector::default();
        let log = connector.log.clone();
        let result = Transmitter::new(
            connector,
            crate::catalog::builtin(),
            TransmitConfig::new("  "),
        );

        assert!(matches!(result, Err(TransmitError::EmptyDevice)));
        assert_eq!(log.borrow().opens, 0);
    }

    #[test]
    fn test_open_failure_makes_no_writes() {
        let connector = MockConnector {
            fail_open: true,
            ..Default::default()
        };
        let log = connector.log.clone();
        let mut tx = transmitter(connector, Duration::ZERO);

        let result = tx.run(&StopToken::new());

        assert!(matches!(result, Err(TransmitError::Connection { .. })));
        assert_eq!(tx.state(), State::Closed);
        let log = log.borrow();
        assert_eq!(log.opens, 1);
        assert_eq!(log.write_attempts, 0);
        assert_eq!(log.closes, 0);
    }

    #[test]
    fn test_opens_with_requested_link_config() {
        let stop = StopToken::new();
        let connector = MockConnector {
            cancel_after: Some((1, stop.clone())),
            ..Default::default()
        };
        let log = connector.log.clone();
        let mut cfg = config(Duration::ZERO);
        cfg.link = LinkConfig::with_baudrate(9600);
        let mut tx = Transmitter::new(connector, crate::catalog::builtin(), cfg).unwrap();

        tx.run(&stop).unwrap();

        let log = log.borrow();
        let (device, link) = log.last_config.clone().unwrap();
        assert_eq!(device, "/dev/ttyUSB0");
        assert_eq!(link.baudrate, 9600);
        assert_eq!(link.read_timeout, Duration::from_secs(1));
    }

    #[test]
    fn test_write_failure_on_third_frame() {
        let connector = MockConnector {
            fail_on_write: Some(3),
            ..Default::default()
        };
        let log = connector.log.clone();
        let mut tx = transmitter(connector, Duration::ZERO);

        let result = tx.run(&StopToken::new());

        match result {
            Err(TransmitError::Write { cursor, index, .. }) => {
                assert_eq!(cursor, 2);
                assert_eq!(index, 2);
            }
            other => panic!("expected write fault, got {other:?}"),
        }
        assert_eq!(tx.state(), State::Closed);
        assert_eq!(tx.cursor(), 2);
        let log = log.borrow();
        assert_eq!(log.writes.len(), 2);
        assert_eq!(log.flushes, 2);
        assert_eq!(log.closes, 1);
    }

    #[test]
    fn test_cycles_through_catalog() {
        let stop = StopToken::new();
        let connector = MockConnector {
            cancel_after: Some((7, stop.clone())),
            ..Default::default()
        };
        let log = connector.log.clone();
        let mut tx = transmitter(connector, Duration::ZERO);

        let summary = tx.run(&stop).unwrap();

        assert_eq!(summary, RunSummary { frames_sent: 7 });
        assert_eq!(tx.state(), State::Closed);
        let log = log.borrow();
        assert_eq!(log.closes, 1);
        assert_eq!(log.flushes, 7);
        assert_eq!(
            log.writes[0],
            b"{\"line1\":\"HELLO PI | {0x00}{0x01} | Scroll demo for a long line\",\"line2\":\"IP 192.168.0.99 | Uptime 12:34:56\",\"scroll_speed_ms\":200,\"page_timeout_ms\":50000}\n"
        );
        assert_eq!(log.writes[5], log.writes[0]);
        assert_eq!(log.writes[6], log.writes[1]);

        let catalog = crate::catalog::builtin();
        for (cursor, bytes) in log.writes.iter().enumerate() {
            let frame: FrameDescriptor = decode_line(bytes).unwrap();
            assert_eq!(&frame, catalog.frame_at(cursor as u64));
            assert_eq!(bytes.iter().filter(|&&b| b == b'\n').count(), 1);
        }
    }

    #[test]
    fn test_cancelled_before_start_sends_nothing() {
        let connector = MockConnector::default();
        let log = connector.log.clone();
        let mut tx = transmitter(connector, Duration::ZERO);
        let stop = StopToken::new();
        stop.cancel();

        let summary = tx.run(&stop).unwrap();

        assert_eq!(summary.frames_sent, 0);
        let log = log.borrow();
        assert_eq!(log.opens, 1);
        assert!(log.writes.is_empty());
        assert_eq!(log.closes, 1);
    }

    #[test]
    fn test_delay_paces_frames() {
        let stop = StopToken::new();
        let connector = MockConnector {
            cancel_after: Some((3, stop.clone())),
            ..Default::default()
        };
        let mut tx = transmitter(connector, Duration::from_millis(25));

        let start = Instant::now();
        let summary = tx.run(&stop).unwrap();

        assert_eq!(summary.frames_sent, 3);
        // Two full delays between three frames; the third wait is cut short
        assert!(start.elapsed() >= Duration::from_millis(50));
    }

    #[test]
    fn test_second_run_is_rejected() {
        let stop = StopToken::new();
        let connector = MockConnector {
            cancel_after: Some((1, stop.clone())),
            ..Default::default()
        };
        let log = connector.log.clone();
        let mut tx = transmitter(connector, Duration::ZERO);

        tx.run(&stop).unwrap();
        let again = tx.run(&StopToken::new());

        assert!(matches!(again, Err(TransmitError::AlreadyFinished)));
        let log = log.borrow();
        assert_eq!(log.opens, 1);
        assert_eq!(log.closes, 1);
        assert_eq!(log.writes.len(), 1);
    }

    #[test]
    fn test_interrupt_during_wait() {
        let stop = StopToken::new();
        let connector = MockConnector::default();
        let log = connector.log.clone();
        let mut tx = transmitter(connector, Duration::from_secs(30));

        let canceller = stop.clone();
        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(50));
            canceller.cancel();
        });

        let start = Instant::now();
        let summary = tx.run(&stop).unwrap();
        handle.join().unwrap();

        assert!(start.elapsed() < Duration::from_secs(10));
        assert_eq!(summary.frames_sent, 1);
        assert_eq!(log.borrow().closes, 1);
        assert_eq!(tx.state(), State::Closed);
    }
}
