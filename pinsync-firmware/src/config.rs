//! Embedded board configuration
//!
//! The line allow-list ships as lines.json compiled into the binary.
//! build.rs validates the file at compile time, so parsing here only
//! fails if the two ever disagree on the schema.

use alloc::vec::Vec;

use serde::Deserialize;

use pinsync_core::{Direction, LineId};

/// One allow-list entry
#[derive(Debug, Deserialize)]
pub struct LineSpec {
    pub pin: LineId,
    pub direction: Direction,
}

/// Top-level embedded configuration
#[derive(Debug, Deserialize)]
pub struct BoardConfig {
    /// Pins that must never be registered (console UART, board LED)
    #[serde(default)]
    pub reserved: Vec<LineId>,
    pub lines: Vec<LineSpec>,
}

pub fn parse_config(text: &str) -> Result<BoardConfig, serde_json::Error> {
    serde_json::from_str(text)
}
