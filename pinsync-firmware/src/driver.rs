//! RP2040 GPIO output driver
//!
//! Owns the output pins handed over at startup and performs the actual
//! level writes on behalf of the hub. Input pins never pass through here;
//! those are owned by the edge capture tasks.

use embassy_rp::gpio::{AnyPin, Level, Output};
use heapless::Vec;

use pinsync_core::{DriverError, LineDriver, LineId, MAX_LINES};

/// Output pin table, filled once during startup
pub struct RpLineDriver {
    outputs: Vec<(LineId, Output<'static>), MAX_LINES>,
}

impl RpLineDriver {
    pub const fn new() -> Self {
        Self {
            outputs: Vec::new(),
        }
    }

    /// Hand one claimed pin to the driver
    ///
    /// The pin starts low; the hub seeds the configured level when it
    /// registers the line.
    pub fn attach_output(&mut self, line: LineId, pin: AnyPin) -> Result<(), DriverError> {
        let output = Output::new(pin, Level::Low);
        self.outputs
            .push((line, output))
            .map_err(|_| DriverError::InvalidLine)
    }

    fn find(&mut self, line: LineId) -> Result<&mut Output<'static>, DriverError> {
        self.outputs
            .iter_mut()
            .find(|(id, _)| *id == line)
            .map(|(_, out)| out)
            .ok_or(DriverError::InvalidLine)
    }
}

impl LineDriver for RpLineDriver {
    fn configure_output(&mut self, line: LineId, initial: bool) -> Result<(), DriverError> {
        self.write(line, initial)
    }

    fn write(&mut self, line: LineId, value: bool) -> Result<(), DriverError> {
        let out = self.find(line)?;
        out.set_level(if value { Level::High } else { Level::Low });
        Ok(())
    }
}
