//! The I/O hub: state cache, command façade, event queue, dispatcher,
//! and listener registry
//!
//! One `IoHub` instance lives in a `static` for the process lifetime. All
//! cache mutations are serialized through a single blocking mutex; the lock
//! is held only for table lookups and value writes, never across a physical
//! hardware call or a listener callback.
//!
//! Event flow:
//!
//! ```text
//! edge capture --try_send--> queue --> dispatcher --> cache --> listeners
//! facade set   --try_send--> queue --> dispatcher -------------> listeners
//!                  (cache written synchronously by the facade)
//! ```
//!
//! The capture side never blocks, allocates, or takes the lock; its only
//! synchronization point is the bounded queue. Under sustained overload the
//! queue drops edge events (best-effort delivery).

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::channel::Channel;
use heapless::Vec;

use crate::error::Error;
use crate::event::{ChangeEvent, ChangeOrigin, ChangeReason};
use crate::line::{Direction, LineConfig, LineEntry, LineId};
use crate::registry::{build_registry, MAX_LINES};
use crate::traits::{ChangeListener, LineDriver};

/// Fixed bound on listener registrations (one per transport, with headroom)
pub const MAX_LISTENERS: usize = 8;

/// Depth of the bounded change-event queue
pub const EVENT_QUEUE_DEPTH: usize = 32;

/// Lock-protected table state: entries plus listener registrations
struct Inner {
    entries: Vec<LineEntry, MAX_LINES>,
    listeners: Vec<&'static dyn ChangeListener, MAX_LISTENERS>,
    started: bool,
}

impl Inner {
    const fn new() -> Self {
        Self {
            entries: Vec::new(),
            listeners: Vec::new(),
            started: false,
        }
    }

    fn find(&self, line: LineId) -> Option<&LineEntry> {
        self.entries.iter().find(|e| e.line == line)
    }

    fn find_mut(&mut self, line: LineId) -> Option<&mut LineEntry> {
        self.entries.iter_mut().find(|e| e.line == line)
    }
}

/// I/O state synchronization hub
///
/// Generic over the embassy-sync raw mutex and the physical output driver;
/// both the target and host tests run it under a critical-section mutex.
pub struct IoHub<M: RawMutex, D: LineDriver> {
    inner: Mutex<M, RefCell<Inner>>,
    driver: Mutex<M, RefCell<Option<D>>>,
    queue: Channel<M, ChangeEvent, EVENT_QUEUE_DEPTH>,
}

impl<M: RawMutex, D: LineDriver> IoHub<M, D> {
    /// Create an empty, unstarted hub (suitable for a `static`)
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(Inner::new())),
            driver: Mutex::new(RefCell::new(None)),
            queue: Channel::new(),
        }
    }

    /// Build the registry and start the hub
    ///
    /// Validates the allow-list, drives every surviving output line to its
    /// initial level, seeds the cache from the supplied levels, and enqueues
    /// one `Boot` event per entry. A driver failure here is fatal to startup
    /// and propagates unchanged.
    ///
    /// Idempotent: a second call returns the existing entry count without
    /// touching hardware.
    ///
    /// Returns the number of registered entries.
    pub fn init(
        &self,
        mut driver: D,
        allow: &[LineConfig],
        reserved: &[LineId],
    ) -> Result<usize, Error> {
        let already = self.inner.lock(|inner| {
            let inner = inner.borrow();
            if inner.started {
                Some(inner.entries.len())
            } else {
                None
            }
        });
        if let Some(count) = already {
            return Ok(count);
        }

        let entries = build_registry(allow, reserved)?;

        for entry in entries.iter().filter(|e| e.direction == Direction::Output) {
            driver.configure_output(entry.line, entry.value)?;
        }

        self.driver.lock(|slot| {
            slot.borrow_mut().replace(driver);
        });

        let count = entries.len();
        self.inner.lock(|inner| {
            let mut inner = inner.borrow_mut();
            inner.entries = entries;
            inner.started = true;
        });

        // Boot snapshot: one event per entry, delivered once the dispatcher runs
        for entry in self.entries() {
            let _ = self.queue.try_send(ChangeEvent {
                line: entry.line,
                value: entry.value,
                direction: entry.direction,
                reason: ChangeReason::Boot,
                origin: ChangeOrigin::Local,
            });
        }

        Ok(count)
    }

    /// Ordered snapshot of all registry entries
    ///
    /// Copies the table under the lock; the returned values are decoupled
    /// from later cache writes.
    pub fn entries(&self) -> Vec<LineEntry, MAX_LINES> {
        self.inner.lock(|inner| inner.borrow().entries.clone())
    }

    /// Read the cached value of a line (no hardware access)
    pub fn get(&self, line: LineId) -> Result<bool, Error> {
        self.inner.lock(|inner| {
            let inner = inner.borrow();
            if !inner.started {
                return Err(Error::NotReady);
            }
            inner.find(line).map(|e| e.value).ok_or(Error::NotFound)
        })
    }

    /// Write an output line and broadcast the change
    ///
    /// Validates under the lock, performs the physical write with the lock
    /// released, and only on write success stores the value and enqueues a
    /// `CommandSet` event tagged with `origin`. On hardware failure the
    /// cache is left unchanged.
    pub fn set(&self, line: LineId, value: bool, origin: ChangeOrigin) -> Result<(), Error> {
        let direction = self.inner.lock(|inner| {
            let inner = inner.borrow();
            if !inner.started {
                return Err(Error::NotReady);
            }
            let entry = inner.find(line).ok_or(Error::NotFound)?;
            if entry.direction != Direction::Output {
                return Err(Error::NotOutput);
            }
            Ok(entry.direction)
        })?;

        // Physical write outside the cache lock
        self.driver.lock(|slot| {
            let mut slot = slot.borrow_mut();
            let driver = slot.as_mut().ok_or(Error::NotReady)?;
            driver.write(line, value).map_err(Error::from)
        })?;

        self.inner.lock(|inner| {
            if let Some(entry) = inner.borrow_mut().find_mut(line) {
                entry.value = value;
            }
        });

        // Best-effort enqueue, matching the capture path
        let _ = self.queue.try_send(ChangeEvent {
            line,
            value,
            direction,
            reason: ChangeReason::CommandSet,
            origin,
        });
        Ok(())
    }

    /// Register a change listener for the process lifetime
    ///
    /// Registrations are additive; exceeding the fixed bound fails with
    /// `Error::Full`, which signals a transport configuration error rather
    /// than a condition to retry.
    pub fn add_listener(&self, listener: &'static dyn ChangeListener) -> Result<(), Error> {
        self.inner.lock(|inner| {
            inner
                .borrow_mut()
                .listeners
                .push(listener)
                .map_err(|_| Error::Full)
        })
    }

    /// Submit a hardware-detected input transition
    ///
    /// Safe to call from interrupt context: takes no lock, never blocks,
    /// never allocates. If the queue is full the event is dropped silently;
    /// no interrupt-safe escalation path exists.
    ///
    /// Membership, direction, and duplicate suppression are checked by the
    /// dispatcher after dequeue.
    pub fn submit_edge(&self, line: LineId, level: bool) {
        let _ = self.queue.try_send(ChangeEvent {
            line,
            value: level,
            direction: Direction::Input,
            reason: ChangeReason::HardwareEdge,
            origin: ChangeOrigin::Local,
        });
    }

    /// Dispatcher loop: sole consumer of the change-event queue
    ///
    /// Blocks until an event is available, applies it to the cache, and fans
    /// it out to every registered listener. This is the hub's only
    /// indefinitely-blocking point.
    pub async fn run(&self) -> ! {
        loop {
            let event = self.queue.receive().await;
            self.dispatch(event);
        }
    }

    /// Drain one queued event through the dispatch path
    ///
    /// Non-blocking variant of the `run` loop body for host tests and
    /// cooperative polling. Returns false when the queue is empty.
    pub fn service(&self) -> bool {
        match self.queue.try_receive() {
            Ok(event) => {
                self.dispatch(event);
                true
            }
            Err(_) => false,
        }
    }

    /// Apply one event to the cache, then notify listeners outside the lock
    ///
    /// Update-cache-then-notify ordering guarantees a listener never sees a
    /// notification for a state the cache does not yet reflect.
    fn dispatch(&self, event: ChangeEvent) {
        let Some(event) = self.apply(event) else {
            return;
        };

        let listeners = self.inner.lock(|inner| inner.borrow().listeners.clone());
        for listener in listeners {
            listener.on_change(&event);
        }
    }

    /// Cache bookkeeping for one dequeued event
    ///
    /// Hardware-originated events are validated here: unknown lines and
    /// edges reported for non-input lines are discarded, and an edge whose
    /// level matches the cache is suppressed as a duplicate. Command and
    /// boot events pass through; their cache writes already happened.
    fn apply(&self, mut event: ChangeEvent) -> Option<ChangeEvent> {
        self.inner.lock(|inner| {
            let mut inner = inner.borrow_mut();
            let entry = inner.find_mut(event.line)?;
            if event.reason == ChangeReason::HardwareEdge {
                if entry.direction != Direction::Input {
                    return None;
                }
                if entry.value == event.value {
                    return None;
                }
                entry.value = event.value;
                event.direction = entry.direction;
            }
            Some(event)
        })
    }
}
