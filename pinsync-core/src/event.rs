//! Change events flowing from capture/command contexts to the dispatcher
//!
//! An event is constructed at the moment a transition is detected (edge
//! capture) or a command succeeds (façade), consumed exactly once by the
//! dispatcher, and not retained afterward.

use crate::line::{Direction, LineId};

/// Why a change event was emitted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChangeReason {
    /// Initial snapshot emitted once per entry when the registry starts
    Boot,
    /// Hardware-detected transition on an input line
    HardwareEdge,
    /// Successful `set` through the command façade
    CommandSet,
}

impl ChangeReason {
    /// Wire tag pushed to transports ("boot" / "edge" / "set")
    pub fn tag(&self) -> &'static str {
        match self {
            ChangeReason::Boot => "boot",
            ChangeReason::HardwareEdge => "edge",
            ChangeReason::CommandSet => "set",
        }
    }
}

/// Which channel or subsystem caused a state change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChangeOrigin {
    Unknown,
    /// Wireless network transport (HTTP/WebSocket)
    Network,
    /// Local serial console
    SerialConsole,
    /// Short-range radio link (BLE)
    ShortRangeRadio,
    /// On-device source (boot snapshot, hardware edge)
    Local,
}

/// One observed or commanded transition
///
/// Always refers to a line present in the registry at emission time, except
/// for raw edge submissions which the dispatcher validates before fan-out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChangeEvent {
    pub line: LineId,
    pub value: bool,
    pub direction: Direction,
    pub reason: ChangeReason,
    pub origin: ChangeOrigin,
}
