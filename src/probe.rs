//! The probe engine.
//!
//! Walks the parameter space in order, runs one attempt per tuple
//! (open → settle → optional write → timed read → classify → close), and
//! short-circuits on the first configuration that yields any bytes.

use crate::params::{ParameterSpace, PortSettings};
use crate::port::Transport;
use crate::progress::ProgressReporter;
use std::time::Duration;
use tracing::{debug, info};

/// Maximum bytes read per attempt.
pub const READ_LIMIT: usize = 100;

/// Fixed timing budget for each attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeTiming {
    /// Wait after a successful open, before any I/O; some devices need time
    /// to stabilize after a port reconfiguration.
    pub settle: Duration,
    /// Wait after writing the probe command, giving the device time to
    /// respond before the read.
    pub post_write: Duration,
    /// Blocking read timeout.
    pub read_timeout: Duration,
}

impl Default for ProbeTiming {
    fn default() -> Self {
        Self {
            settle: Duration::from_millis(500),
            post_write: Duration::from_millis(200),
            read_timeout: Duration::from_secs(1),
        }
    }
}

impl ProbeTiming {
    /// All delays zeroed; for tests and transports that answer immediately.
    pub fn immediate() -> Self {
        Self {
            settle: Duration::ZERO,
            post_write: Duration::ZERO,
            read_timeout: Duration::ZERO,
        }
    }
}

/// Result of a single attempt. `Success` iff the read returned at least one
/// byte; every failure mode (open rejected, write error, read error, empty
/// read) collapses into `Failure` and is never retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    Success(Vec<u8>),
    Failure,
}

/// The matching configuration and whatever the device sent back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResult {
    pub settings: PortSettings,
    pub data: Vec<u8>,
}

impl ProbeResult {
    /// Render the received bytes as text.
    ///
    /// Never fails: printable ASCII and the usual whitespace pass through,
    /// everything else becomes U+FFFD.
    pub fn rendered(&self) -> String {
        render_printable(&self.data)
    }
}

/// Terminal outcome of a full run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// A configuration produced data; nothing after it was attempted.
    Found(ProbeResult),
    /// All 360 tuples were tried without a single response byte.
    Exhausted,
}

/// Drives the enumeration against a caller-supplied transport.
pub struct ProbeEngine<T: Transport> {
    transport: T,
    timing: ProbeTiming,
}

impl<T: Transport> ProbeEngine<T> {
    pub fn new(transport: T, timing: ProbeTiming) -> Self {
        Self { transport, timing }
    }

    /// Probe every configuration in enumeration order until one responds.
    ///
    /// `command`, when present, is written to the device after the settle
    /// delay of each attempt. The reporter is observational only; it is told
    /// the attempt index after every attempt and sees the bar completed when
    /// a match cuts the run short.
    pub fn run(
        &self,
        device: &str,
        command: Option<&[u8]>,
        reporter: &mut dyn ProgressReporter,
    ) -> ProbeOutcome {
        let space = ParameterSpace::new();
        let total = space.size();
        reporter.init(total);

        for (index, settings) in space.enumerate().enumerate() {
            let outcome = self.attempt(device, &settings, command);
            reporter.progress(index + 1, total);

            if let AttemptOutcome::Success(data) = outcome {
                reporter.progress(total, total);
                info!(%settings, bytes = data.len(), "configuration responded");
                return ProbeOutcome::Found(ProbeResult { settings, data });
            }
        }

        info!(attempts = total, "parameter space exhausted without a response");
        ProbeOutcome::Exhausted
    }

    /// One attempt against one tuple. Every error path returns `Failure`;
    /// the connection is dropped (closed) on all of them.
    fn attempt(
        &self,
        device: &str,
        settings: &PortSettings,
        command: Option<&[u8]>,
    ) -> AttemptOutcome {
        debug!(%settings, "probing");

        let mut port = match self.transport.open(device, settings, self.timing.read_timeout) {
            Ok(port) => port,
            Err(e) => {
                debug!(%settings, error = %e, "open failed");
                return AttemptOutcome::Failure;
            }
        };

        std::thread::sleep(self.timing.settle);

        if let Some(command) = command {
            if let Err(e) = port.write_bytes(command) {
                debug!(%settings, error = %e, "write failed");
                return AttemptOutcome::Failure;
            }
            std::thread::sleep(self.timing.post_write);
        }

        let mut buffer = [0u8; READ_LIMIT];
        match port.read_bytes(&mut buffer) {
            Ok(n) if n > 0 => AttemptOutcome::Success(buffer[..n].to_vec()),
            Ok(_) => AttemptOutcome::Failure,
            Err(e) => {
                debug!(%settings, error = %e, "read failed");
                AttemptOutcome::Failure
            }
        }
    }
}

/// Decode bytes for display, replacing anything outside printable 7-bit
/// text (plus CR/LF/tab) with U+FFFD.
pub fn render_printable(data: &[u8]) -> String {
    data.iter()
        .map(|&b| match b {
            0x20..=0x7e => b as char,
            b'\r' | b'\n' | b'\t' => b as char,
            _ => char::REPLACEMENT_CHARACTER,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{DataBits, Parity, StopBits};
    use crate::port::{MockBehavior, MockTransport};
    use crate::progress::SilentProgress;
    use pretty_assertions::assert_eq;

    fn target() -> PortSettings {
        PortSettings {
            baud_rate: 9600,
            data_bits: DataBits::Eight,
            parity: Parity::None,
            stop_bits: StopBits::One,
        }
    }

    #[test]
    fn test_single_byte_read_is_success() {
        let mock = MockTransport::new().respond_to(target(), b"\x00");
        let engine = ProbeEngine::new(mock, ProbeTiming::immediate());
        let outcome = engine.attempt("/dev/mock", &target(), None);
        assert_eq!(outcome, AttemptOutcome::Success(vec![0x00]));
    }

    #[test]
    fn test_empty_read_is_failure() {
        let mock = MockTransport::new();
        let engine = ProbeEngine::new(mock, ProbeTiming::immediate());
        let outcome = engine.attempt("/dev/mock", &target(), None);
        assert_eq!(outcome, AttemptOutcome::Failure);
    }

    #[test]
    fn test_open_failure_is_failure() {
        let mock = MockTransport::new().with_default(MockBehavior::FailOpen);
        let engine = ProbeEngine::new(mock, ProbeTiming::immediate());
        let outcome = engine.attempt("/dev/mock", &target(), None);
        assert_eq!(outcome, AttemptOutcome::Failure);
    }

    #[test]
    fn test_write_failure_is_failure() {
        let mock = MockTransport::new().with_default(MockBehavior::FailWrite);
        let engine = ProbeEngine::new(mock, ProbeTiming::immediate());
        let outcome = engine.attempt("/dev/mock", &target(), Some(b"ATI\r"));
        assert_eq!(outcome, AttemptOutcome::Failure);
    }

    #[test]
    fn test_read_error_is_failure() {
        let mock = MockTransport::new().with_default(MockBehavior::FailRead);
        let engine = ProbeEngine::new(mock, ProbeTiming::immediate());
        let outcome = engine.attempt("/dev/mock", &target(), None);
        assert_eq!(outcome, AttemptOutcome::Failure);
    }

    #[test]
    fn test_no_write_without_command() {
        let mock = MockTransport::new();
        let engine = ProbeEngine::new(mock.clone(), ProbeTiming::immediate());
        engine.attempt("/dev/mock", &target(), None);
        assert!(mock.writes().is_empty());
    }

    #[test]
    fn test_response_truncated_to_read_limit() {
        let big = vec![b'A'; READ_LIMIT + 50];
        let mock = MockTransport::new().respond_to(target(), &big);
        let engine = ProbeEngine::new(mock, ProbeTiming::immediate());
        match engine.attempt("/dev/mock", &target(), None) {
            AttemptOutcome::Success(data) => assert_eq!(data.len(), READ_LIMIT),
            AttemptOutcome::Failure => panic!("expected success"),
        }
    }

    #[test]
    fn test_render_printable_passthrough() {
        assert_eq!(render_printable(b"OK\r\n"), "OK\r\n");
    }

    #[test]
    fn test_render_printable_replaces_binary() {
        let rendered = render_printable(&[0x00, b'H', b'i', 0xff]);
        assert_eq!(rendered, "\u{fffd}Hi\u{fffd}");
    }

    #[test]
    fn test_run_without_match_is_exhausted() {
        let mock = MockTransport::new();
        let engine = ProbeEngine::new(mock, ProbeTiming::immediate());
        let outcome = engine.run("/dev/mock", None, &mut SilentProgress);
        assert_eq!(outcome, ProbeOutcome::Exhausted);
    }
}
