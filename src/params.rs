//! The UART parameter space.
//!
//! Defines the finite set of configuration tuples the probe engine walks
//! through, and the deterministic order in which it walks them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Standard baud rates to test, ascending from slowest to fastest.
///
/// Slow rates come first because legacy devices (the usual reason to reach
/// for this tool) tend to sit at the low end of the range.
pub const STANDARD_BAUD_RATES: &[u32] = &[
    50, 75, 110, 134, 150, 200, 300, 600, 1200, 1800, 2400, 4800, 9600, 19200, 38400, 57600,
    115200, 230400, 460800, 500_000, 576_000, 921_600, 1_000_000, 1_152_000, 1_500_000, 2_000_000,
    2_500_000, 3_000_000, 3_500_000, 4_000_000,
];

/// Number of data bits per character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataBits {
    Seven,
    Eight,
}

/// Parity checking modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Parity {
    None,
    Odd,
    Even,
}

/// Number of stop bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopBits {
    One,
    Two,
}

const ALL_DATA_BITS: &[DataBits] = &[DataBits::Seven, DataBits::Eight];
const ALL_PARITIES: &[Parity] = &[Parity::None, Parity::Odd, Parity::Even];
const ALL_STOP_BITS: &[StopBits] = &[StopBits::One, StopBits::Two];

impl fmt::Display for DataBits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataBits::Seven => write!(f, "7"),
            DataBits::Eight => write!(f, "8"),
        }
    }
}

impl fmt::Display for Parity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Parity::None => write!(f, "N"),
            Parity::Odd => write!(f, "O"),
            Parity::Even => write!(f, "E"),
        }
    }
}

impl fmt::Display for StopBits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopBits::One => write!(f, "1"),
            StopBits::Two => write!(f, "2"),
        }
    }
}

/// One candidate UART configuration.
///
/// Plain value type with structural equality; produced only by
/// [`ParameterSpace::enumerate`] and consumed read-only by the probe engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortSettings {
    /// Baud rate (bits per second).
    pub baud_rate: u32,
    /// Number of data bits (7 or 8).
    pub data_bits: DataBits,
    /// Parity checking mode.
    pub parity: Parity,
    /// Number of stop bits.
    pub stop_bits: StopBits,
}

impl fmt::Display for PortSettings {
    /// Renders the conventional short form, e.g. `9600 8N1`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}{}{}",
            self.baud_rate, self.data_bits, self.parity, self.stop_bits
        )
    }
}

/// The ordered, finite universe of configurations to try.
///
/// Constructed once, immutable, and cheap to copy. Enumeration is the
/// Cartesian product of the four dimension lists in the fixed nesting order
/// baud → data bits → parity → stop bits (outer to inner), so every run
/// probes the same sequence.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParameterSpace;

impl ParameterSpace {
    pub fn new() -> Self {
        Self
    }

    /// Total number of tuples in the space (30 × 2 × 3 × 2 = 360).
    pub fn size(&self) -> usize {
        STANDARD_BAUD_RATES.len() * ALL_DATA_BITS.len() * ALL_PARITIES.len() * ALL_STOP_BITS.len()
    }

    /// Lazily yields every tuple in the fixed nested order.
    ///
    /// Restartable: each call produces an identical sequence.
    pub fn enumerate(&self) -> impl Iterator<Item = PortSettings> {
        STANDARD_BAUD_RATES.iter().flat_map(|&baud_rate| {
            ALL_DATA_BITS.iter().flat_map(move |&data_bits| {
                ALL_PARITIES.iter().flat_map(move |&parity| {
                    ALL_STOP_BITS.iter().map(move |&stop_bits| PortSettings {
                        baud_rate,
                        data_bits,
                        parity,
                        stop_bits,
                    })
                })
            })
        })
    }
}
