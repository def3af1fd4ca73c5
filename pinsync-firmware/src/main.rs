//! Pinsync - GPIO state synchronization firmware
//!
//! Main firmware binary for RP2040-based boards. Keeps a mutex-protected
//! cache of pin state, funnels every change (commands, boot seeding,
//! hardware edges) through a single dispatcher task, and exposes the
//! common get/set/list vocabulary over a serial console.

#![no_std]
#![no_main]

extern crate alloc;

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{AnyPin, Input, Pull};
use embassy_rp::peripherals::UART0;
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use embedded_alloc::LlffHeap as Heap;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use pinsync_core::{Direction, LineConfig, LineId, MAX_LINES};

use crate::channels::HUB;
use crate::driver::RpLineDriver;

mod channels;
mod config;
mod driver;
mod tasks;

// Heap allocator for JSON parsing and encoding
#[global_allocator]
static HEAP: Heap = Heap::empty();

// Heap size: 16KB
const HEAP_SIZE: usize = 16 * 1024;

/// Embedded line allow-list (compiled into firmware)
/// Edit lines.json and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../lines.json");

/// GPIO bank size on the RP2040
const GPIO_COUNT: usize = 30;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Pinsync firmware starting...");

    // Initialize heap allocator
    init_heap();

    // Initialize RP2040 peripherals
    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    // Parse the embedded allow-list. build.rs validated it already, so a
    // failure here means the firmware schema and lines.json disagree, and
    // running without any registered lines is not useful.
    let board = match config::parse_config(EMBEDDED_CONFIG) {
        Ok(board) => board,
        Err(_) => core::panic!("embedded lines.json failed to parse"),
    };

    // Every GPIO that can be claimed by the allow-list. Pins 0/1 stay with
    // the console UART and never enter the pool.
    let mut pin_pool: [Option<AnyPin>; GPIO_COUNT] = [
        None,
        None,
        Some(AnyPin::from(p.PIN_2)),
        Some(AnyPin::from(p.PIN_3)),
        Some(AnyPin::from(p.PIN_4)),
        Some(AnyPin::from(p.PIN_5)),
        Some(AnyPin::from(p.PIN_6)),
        Some(AnyPin::from(p.PIN_7)),
        Some(AnyPin::from(p.PIN_8)),
        Some(AnyPin::from(p.PIN_9)),
        Some(AnyPin::from(p.PIN_10)),
        Some(AnyPin::from(p.PIN_11)),
        Some(AnyPin::from(p.PIN_12)),
        Some(AnyPin::from(p.PIN_13)),
        Some(AnyPin::from(p.PIN_14)),
        Some(AnyPin::from(p.PIN_15)),
        Some(AnyPin::from(p.PIN_16)),
        Some(AnyPin::from(p.PIN_17)),
        Some(AnyPin::from(p.PIN_18)),
        Some(AnyPin::from(p.PIN_19)),
        Some(AnyPin::from(p.PIN_20)),
        Some(AnyPin::from(p.PIN_21)),
        Some(AnyPin::from(p.PIN_22)),
        Some(AnyPin::from(p.PIN_23)),
        Some(AnyPin::from(p.PIN_24)),
        Some(AnyPin::from(p.PIN_25)),
        Some(AnyPin::from(p.PIN_26)),
        Some(AnyPin::from(p.PIN_27)),
        Some(AnyPin::from(p.PIN_28)),
        Some(AnyPin::from(p.PIN_29)),
    ];

    let mut driver = RpLineDriver::new();
    let mut allow: heapless::Vec<LineConfig, MAX_LINES> = heapless::Vec::new();
    let mut inputs: heapless::Vec<(LineId, Input<'static>), { tasks::MAX_INPUT_TASKS }> =
        heapless::Vec::new();

    for spec in &board.lines {
        // Reserved pins are skipped here so no hardware gets configured;
        // the registry rejects them independently.
        if board.reserved.contains(&spec.pin) {
            warn!("Line {} is reserved, skipping", spec.pin);
            continue;
        }
        let Some(pin) = claim(&mut pin_pool, spec.pin) else {
            warn!("Line {} has no free pin, skipping", spec.pin);
            continue;
        };
        match spec.direction {
            Direction::Output => {
                if driver.attach_output(spec.pin, pin).is_err() {
                    warn!("Output table full, skipping line {}", spec.pin);
                    continue;
                }
                let _ = allow.push(LineConfig::output(spec.pin));
            }
            Direction::Input => {
                let input = Input::new(pin, Pull::Up);
                // Sample the live level now so the cache starts truthful
                let level = input.is_high();
                if inputs.push((spec.pin, input)).is_err() {
                    warn!("Input table full, skipping line {}", spec.pin);
                    continue;
                }
                let _ = allow.push(LineConfig::input(spec.pin, level));
            }
        }
    }

    let count = match HUB.init(driver, &allow, &board.reserved) {
        Ok(count) => count,
        Err(_) => core::panic!("no usable lines in embedded configuration"),
    };
    info!("I/O hub initialized with {} lines", count);

    if HUB.add_listener(&tasks::CONSOLE_NOTIFIER).is_err() {
        warn!("Listener table full, console pushes disabled");
    }

    // Setup UART0 for the serial console (GPIO0 TX, GPIO1 RX)
    let uart_config = UartConfig::default(); // 115200 baud default

    let tx_buf = TX_BUF.init([0u8; 256]);
    let rx_buf = RX_BUF.init([0u8; 256]);

    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart_config);
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (tx, rx) = uart.split();

    info!("Console UART initialized");

    // Spawn tasks
    spawner.spawn(tasks::dispatcher_task()).unwrap();
    for (line, pin) in inputs {
        spawner.spawn(tasks::edge_task(line, pin)).unwrap();
    }
    spawner.spawn(tasks::console_task(tx, rx)).unwrap();

    info!("All tasks spawned, firmware running");

    // Main task has nothing else to do - all work happens in spawned tasks
    loop {
        embassy_time::Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}

fn claim(pool: &mut [Option<AnyPin>; GPIO_COUNT], line: LineId) -> Option<AnyPin> {
    pool.get_mut(line as usize)?.take()
}

/// Initialize the heap allocator
fn init_heap() {
    use core::mem::MaybeUninit;
    static mut HEAP_MEM: [MaybeUninit<u8>; HEAP_SIZE] = [MaybeUninit::uninit(); HEAP_SIZE];
    #[allow(static_mut_refs)]
    unsafe {
        HEAP.init(HEAP_MEM.as_ptr() as usize, HEAP_SIZE)
    }
}
