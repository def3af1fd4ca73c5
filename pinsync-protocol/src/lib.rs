//! Common command vocabulary for Pinsync control channels
//!
//! Every transport (HTTP/WebSocket JSON, radio-link JSON, serial console
//! text) parses its framing into the same typed [`Command`], executes it
//! against the core façade with [`execute`], and renders the resulting
//! [`Reply`] back into its own framing. Change events pushed by the
//! dispatcher are encoded here as well, so all channels speak one dialect.
//!
//! The JSON shapes accept both long and single-letter key aliases
//! (`"type"`/`"t"`, `"pin"`/`"p"`, `"value"`/`"v"`) for compact radio-link
//! frames.

#![no_std]
#![deny(unsafe_code)]

extern crate alloc;

pub mod command;
pub mod json;
pub mod text;

pub use command::{execute, Command, Reply};
pub use json::{encode_event, encode_reply, encode_state, parse_request, Request};
pub use text::{parse_console, write_console_reply};
