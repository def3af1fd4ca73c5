//! Line identity and cached state types

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Identifier of one controllable digital line (the GPIO number)
pub type LineId = u8;

/// Highest line id the registry will accept (RP2040 user GPIO bank)
pub const MAX_LINE_ID: LineId = 29;

/// Direction of a line, fixed for the lifetime of its registry entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Direction {
    /// Read-only line, observed via edge capture
    Input,
    /// Driven line, writable through the command façade
    Output,
}

impl Direction {
    /// Wire tag used by every transport ("in" / "out")
    pub fn tag(&self) -> &'static str {
        match self {
            Direction::Input => "in",
            Direction::Output => "out",
        }
    }
}

/// One registry entry: a controllable line and its last-known value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LineEntry {
    /// Line identifier, unique within the registry
    pub line: LineId,
    /// Direction, fixed at registry build time
    pub direction: Direction,
    /// Cached value, mutated only through the cache-write paths
    pub value: bool,
}

/// One allow-list element handed to registry initialization
///
/// `level` is the line's current hardware level, read by the caller before
/// init; outputs are driven to `level` when the registry is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LineConfig {
    pub line: LineId,
    pub direction: Direction,
    pub level: bool,
}

impl LineConfig {
    /// Output line starting low
    pub const fn output(line: LineId) -> Self {
        Self {
            line,
            direction: Direction::Output,
            level: false,
        }
    }

    /// Input line with a known current level
    pub const fn input(line: LineId, level: bool) -> Self {
        Self {
            line,
            direction: Direction::Input,
            level,
        }
    }
}
