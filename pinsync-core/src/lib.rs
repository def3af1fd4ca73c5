//! Board-agnostic I/O state synchronization core
//!
//! This crate keeps a single consistent view of a small fixed set of digital
//! I/O lines while several independent control channels (network, radio link,
//! serial console) observe and mutate them concurrently:
//!
//! - Line registry: validated allow-list of controllable lines, fixed at init
//! - State cache: last-known value per line, guarded by one blocking mutex
//! - Command façade: synchronous `get`/`set` used uniformly by all transports
//! - Event dispatcher: single consumer of the bounded change-event queue,
//!   fans every event out to all registered listeners
//! - Edge capture entry point: lock-free, non-blocking producer side for
//!   interrupt-context input transitions
//!
//! The crate is `no_std` and generic over the `embassy-sync` raw mutex; on
//! the target and in host tests alike the hub runs under a critical-section
//! mutex (the std critical-section implementation backs the host tests).

#![no_std]
#![deny(unsafe_code)]

pub mod error;
pub mod event;
pub mod hub;
pub mod line;
pub mod registry;
pub mod traits;

pub use error::Error;
pub use event::{ChangeEvent, ChangeOrigin, ChangeReason};
pub use hub::{IoHub, EVENT_QUEUE_DEPTH, MAX_LISTENERS};
pub use line::{Direction, LineConfig, LineEntry, LineId, MAX_LINE_ID};
pub use registry::{build_registry, MAX_LINES};
pub use traits::{ChangeListener, DriverError, LineDriver};
