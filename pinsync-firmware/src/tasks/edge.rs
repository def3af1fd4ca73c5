//! Input edge capture tasks
//!
//! One task instance per watched input line. The task owns its pin and
//! sleeps on the GPIO interrupt; on each edge it samples the level and
//! hands it to the hub without touching any lock.

use defmt::*;
use embassy_rp::gpio::Input;

use pinsync_core::LineId;

use crate::channels::HUB;

/// Upper bound on concurrently watched input lines
pub const MAX_INPUT_TASKS: usize = 8;

#[embassy_executor::task(pool_size = MAX_INPUT_TASKS)]
pub async fn edge_task(line: LineId, mut pin: Input<'static>) {
    info!("Edge capture task started for line {}", line);

    loop {
        pin.wait_for_any_edge().await;
        HUB.submit_edge(line, pin.is_high());
    }
}
