//! Mock transport for testing the probe engine without hardware.
//!
//! Behaviors are scripted per settings predicate, and every open/write/read
//! is recorded in a shared event log so tests can assert on attempt ordering.

use super::error::PortError;
use super::traits::{ProbePort, Transport};
use crate::params::PortSettings;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// What the mock does for an attempt whose settings matched a rule.
#[derive(Debug, Clone)]
pub enum MockBehavior {
    /// Open succeeds and the first read returns these bytes.
    Respond(Vec<u8>),
    /// Open succeeds but reads return zero bytes.
    Silent,
    /// Open fails.
    FailOpen,
    /// Open succeeds but writes fail.
    FailWrite,
    /// Open succeeds but reads fail with a timeout error.
    FailRead,
}

/// One recorded interaction with the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockEvent {
    Open { settings: PortSettings, ok: bool },
    Write { settings: PortSettings, data: Vec<u8> },
    Read { settings: PortSettings },
}

type Predicate = Box<dyn Fn(&PortSettings) -> bool + Send + Sync>;

struct MockState {
    rules: Vec<(Predicate, MockBehavior)>,
    default: MockBehavior,
    events: Vec<MockEvent>,
}

/// Scripted transport; clones share state, so tests keep a handle for
/// inspection while the engine owns another.
#[derive(Clone)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTransport {
    /// Create a mock whose default behavior is `Silent`.
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState {
                rules: Vec::new(),
                default: MockBehavior::Silent,
                events: Vec::new(),
            })),
        }
    }

    /// Set the behavior used when no rule matches.
    pub fn with_default(self, behavior: MockBehavior) -> Self {
        self.state.lock().unwrap().default = behavior;
        self
    }

    /// Apply `behavior` to every attempt whose settings satisfy `predicate`.
    ///
    /// Rules are checked in insertion order; the first match wins.
    pub fn when(
        self,
        predicate: impl Fn(&PortSettings) -> bool + Send + Sync + 'static,
        behavior: MockBehavior,
    ) -> Self {
        self.state
            .lock()
            .unwrap()
            .rules
            .push((Box::new(predicate), behavior));
        self
    }

    /// Respond with `data` for exactly `settings`.
    pub fn respond_to(self, settings: PortSettings, data: &[u8]) -> Self {
        let data = data.to_vec();
        self.when(move |s| *s == settings, MockBehavior::Respond(data))
    }

    /// Full event log so far.
    pub fn events(&self) -> Vec<MockEvent> {
        self.state.lock().unwrap().events.clone()
    }

    /// Settings of every open attempt, successful or not, in order.
    pub fn open_attempts(&self) -> Vec<PortSettings> {
        self.state
            .lock()
            .unwrap()
            .events
            .iter()
            .filter_map(|e| match e {
                MockEvent::Open { settings, .. } => Some(*settings),
                _ => None,
            })
            .collect()
    }

    /// All writes as (settings, data) pairs, in order.
    pub fn writes(&self) -> Vec<(PortSettings, Vec<u8>)> {
        self.state
            .lock()
            .unwrap()
            .events
            .iter()
            .filter_map(|e| match e {
                MockEvent::Write { settings, data } => Some((*settings, data.clone())),
                _ => None,
            })
            .collect()
    }

    fn behavior_for(&self, settings: &PortSettings) -> MockBehavior {
        let state = self.state.lock().unwrap();
        state
            .rules
            .iter()
            .find(|(predicate, _)| predicate(settings))
            .map(|(_, behavior)| behavior.clone())
            .unwrap_or_else(|| state.default.clone())
    }

    fn record(&self, event: MockEvent) {
        self.state.lock().unwrap().events.push(event);
    }
}

impl Transport for MockTransport {
    fn open(
        &self,
        device: &str,
        settings: &PortSettings,
        _read_timeout: Duration,
    ) -> Result<Box<dyn ProbePort>, PortError> {
        let behavior = self.behavior_for(settings);
        let ok = !matches!(behavior, MockBehavior::FailOpen);
        self.record(MockEvent::Open {
            settings: *settings,
            ok,
        });

        if !ok {
            return Err(PortError::not_found(device));
        }

        Ok(Box::new(MockProbePort {
            settings: *settings,
            behavior,
            transport: self.clone(),
            responded: false,
        }))
    }
}

struct MockProbePort {
    settings: PortSettings,
    behavior: MockBehavior,
    transport: MockTransport,
    responded: bool,
}

impl ProbePort for MockProbePort {
    fn write_bytes(&mut self, data: &[u8]) -> Result<usize, PortError> {
        self.transport.record(MockEvent::Write {
            settings: self.settings,
            data: data.to_vec(),
        });

        match self.behavior {
            MockBehavior::FailWrite => Err(PortError::Io(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "mock write failure",
            ))),
            _ => Ok(data.len()),
        }
    }

    fn read_bytes(&mut self, buffer: &mut [u8]) -> Result<usize, PortError> {
        self.transport.record(MockEvent::Read {
            settings: self.settings,
        });

        match &self.behavior {
            MockBehavior::Respond(data) if !self.responded => {
                self.responded = true;
                let n = data.len().min(buffer.len());
                buffer[..n].copy_from_slice(&data[..n]);
                Ok(n)
            }
            MockBehavior::FailRead => Err(PortError::timeout(Duration::from_secs(1))),
            _ => Ok(0),
        }
    }
}
