//! Serial transport abstraction.
//!
//! The probe engine depends only on the traits here, so real hardware and
//! scripted mocks are interchangeable.

pub mod error;
pub mod mock;
pub mod sync_port;
pub mod traits;

pub use error::PortError;
pub use mock::{MockBehavior, MockEvent, MockTransport};
pub use sync_port::SerialTransport;
pub use traits::{ProbePort, Transport};
