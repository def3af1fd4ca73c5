//! Event dispatcher task
//!
//! The single consumer of the hub's change event queue. Every cache write
//! for boot and edge events, and all listener fan-out, happens on this
//! task's context rather than in interrupt handlers.

use defmt::*;

use crate::channels::HUB;

#[embassy_executor::task]
pub async fn dispatcher_task() {
    info!("Event dispatcher task started");
    HUB.run().await
}
