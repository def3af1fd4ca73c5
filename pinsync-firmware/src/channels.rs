//! Shared hub instance and inter-task channels
//!
//! All cross-task communication goes through the statics defined here.

use alloc::string::String;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;

use pinsync_core::IoHub;

use crate::driver::RpLineDriver;

/// Capacity of the console push channel
pub const CONSOLE_EVENT_CHANNEL_SIZE: usize = 8;

/// The one hub instance shared by every task and transport
pub static HUB: IoHub<CriticalSectionRawMutex, RpLineDriver> = IoHub::new();

/// Change events already encoded for the console, dropped when full
pub static CONSOLE_EVENTS: Channel<CriticalSectionRawMutex, String, CONSOLE_EVENT_CHANNEL_SIZE> =
    Channel::new();
