//! Seams between the core and its collaborators
//!
//! `LineDriver` is implemented by the board layer for physical output
//! writes; `ChangeListener` is implemented by each transport that wants
//! change events. The core never depends on transport or board types.

use crate::event::ChangeEvent;
use crate::line::LineId;

/// Errors from the physical line driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DriverError {
    /// The driver has no pin for this line
    InvalidLine,
    /// The underlying peripheral write failed
    Io,
}

/// Physical access to output lines
///
/// Input lines are owned by the board's edge-capture context and reach the
/// core only through `IoHub::submit_edge`, so the driver seam covers
/// outputs. Implementations must not block for longer than a register write.
pub trait LineDriver {
    /// Configure a line as an output driven to `initial`
    fn configure_output(&mut self, line: LineId, initial: bool) -> Result<(), DriverError>;

    /// Drive an output line to `value`
    fn write(&mut self, line: LineId, value: bool) -> Result<(), DriverError>;
}

/// Observer of change events, one registration per transport
///
/// Invoked by the dispatcher task with no lock held. Implementations must
/// not block: hand the event to a channel and return.
pub trait ChangeListener: Sync {
    fn on_change(&self, event: &ChangeEvent);
}
