//! Serial console task
//!
//! Line-buffered command console over UART0. Accepts the compact text
//! vocabulary (`line list` / `line get <pin>` / `line set <pin> <0|1>`)
//! and interleaves JSON change event pushes between replies.

use core::fmt::Write as _;

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_rp::uart::{BufferedUartRx, BufferedUartTx};
use embedded_io_async::{Read, Write};

use pinsync_core::{ChangeEvent, ChangeListener, ChangeOrigin};
use pinsync_protocol::json::encode_event;
use pinsync_protocol::{execute, parse_console, write_console_reply, Reply};

use crate::channels::{CONSOLE_EVENTS, HUB};

/// Read chunk size for the UART
const RX_CHUNK: usize = 64;

/// Longest accepted input line
const LINE_MAX: usize = 128;

/// Reply buffer, sized for a full `line list` of 32 rows
const REPLY_MAX: usize = 1024;

/// Forwards dispatcher change events to the console as JSON push frames
pub struct ConsoleNotifier;

impl ChangeListener for ConsoleNotifier {
    fn on_change(&self, event: &ChangeEvent) {
        // A slow console must not stall the dispatcher
        if CONSOLE_EVENTS.try_send(encode_event(event)).is_err() {
            warn!("Console event channel full, dropping push");
        }
    }
}

pub static CONSOLE_NOTIFIER: ConsoleNotifier = ConsoleNotifier;

#[embassy_executor::task]
pub async fn console_task(mut tx: BufferedUartTx, mut rx: BufferedUartRx) {
    info!("Console task started");

    let mut buf = [0u8; RX_CHUNK];
    let mut line: heapless::Vec<u8, LINE_MAX> = heapless::Vec::new();

    loop {
        match select(rx.read(&mut buf), CONSOLE_EVENTS.receive()).await {
            Either::First(Ok(n)) if n > 0 => {
                for &byte in &buf[..n] {
                    if byte == b'\r' || byte == b'\n' {
                        if !line.is_empty() {
                            handle_line(&line, &mut tx).await;
                            line.clear();
                        }
                    } else if line.push(byte).is_err() {
                        // Oversized input; discard and resync at the next newline
                        warn!("Console line too long, discarding");
                        line.clear();
                    }
                }
            }
            Either::First(Ok(_)) => {}
            Either::First(Err(e)) => {
                warn!("Console read error: {:?}", e);
            }
            Either::Second(event) => {
                if tx.write_all(event.as_bytes()).await.is_err()
                    || tx.write_all(b"\r\n").await.is_err()
                {
                    warn!("Console write error, push dropped");
                }
            }
        }
    }
}

async fn handle_line(raw: &[u8], tx: &mut BufferedUartTx) {
    let Ok(text) = core::str::from_utf8(raw) else {
        let _ = tx.write_all(b"ERR BAD_ARG\r\n").await;
        return;
    };

    let reply = match parse_console(text) {
        Ok(command) => execute(&HUB, &command, ChangeOrigin::SerialConsole),
        Err(err) => Reply::Failed(err),
    };

    let mut out: heapless::String<REPLY_MAX> = heapless::String::new();
    if write_console_reply(&reply, &mut out).is_err() {
        out.clear();
        let _ = out.write_str("ERR NO_MEM\n");
    }
    if tx.write_all(out.as_bytes()).await.is_err() {
        warn!("Console write error, reply dropped");
    }
}
