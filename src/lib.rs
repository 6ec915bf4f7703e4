//! baudbuster
//!
//! Discovers unknown UART link parameters by brute force: every combination
//! of standard baud rate, data bits, parity, and stop bits is tried against
//! the device until one yields a response.
//!
//! # Modules
//!
//! - `params`: the ordered, finite configuration universe
//! - `port`: serial transport abstraction (real and mock)
//! - `probe`: the enumeration-and-probe engine
//! - `progress`: injectable progress reporting

pub mod params;
pub mod port;
pub mod probe;
pub mod progress;

// Re-export commonly used types for convenience
pub use params::{DataBits, ParameterSpace, Parity, PortSettings, StopBits, STANDARD_BAUD_RATES};
pub use port::{MockBehavior, MockEvent, MockTransport, PortError, ProbePort, SerialTransport, Transport};
pub use probe::{
    render_printable, AttemptOutcome, ProbeEngine, ProbeOutcome, ProbeResult, ProbeTiming,
    READ_LIMIT,
};
pub use progress::{ConsoleProgress, ProgressReporter, SilentProgress};
