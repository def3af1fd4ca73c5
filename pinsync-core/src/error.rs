//! Core error types
//!
//! Every failure is returned synchronously to the caller; the façade never
//! retries. A failed operation leaves the cache in its prior, valid state.

use crate::traits::DriverError;

/// Errors surfaced by the registry, façade, and listener registry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Operation attempted before the registry was initialized
    NotReady,
    /// Allow-list produced an empty registry; the system cannot start
    NoEntries,
    /// Line id is not in the registry
    NotFound,
    /// Write attempted on an input line
    NotOutput,
    /// Malformed request from a transport
    BadArgument,
    /// Underlying physical read/write failed
    Hardware,
    /// Allocation or fixed-capacity overflow during serialization
    NoMemory,
    /// Listener registry at capacity
    Full,
    /// Unrecognized command verb
    NotSupported,
}

impl Error {
    /// Stable error code used in transport replies
    pub fn code(&self) -> &'static str {
        match self {
            Error::NotReady => "NOT_READY",
            Error::NoEntries => "NO_ENTRIES",
            Error::NotFound => "NOT_FOUND",
            Error::NotOutput => "NOT_OUTPUT",
            Error::BadArgument => "BAD_ARG",
            Error::Hardware => "FAIL",
            Error::NoMemory => "NO_MEM",
            Error::Full => "FULL",
            Error::NotSupported => "NOT_SUPPORTED",
        }
    }
}

impl From<DriverError> for Error {
    fn from(_: DriverError) -> Self {
        Error::Hardware
    }
}
