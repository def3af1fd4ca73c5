//! Embassy async tasks
//!
//! Each task is spawned once from main; edge capture uses a small pool
//! with one instance per watched input line.

pub mod console;
pub mod dispatcher;
pub mod edge;

pub use console::{console_task, ConsoleNotifier, CONSOLE_NOTIFIER};
pub use dispatcher::dispatcher_task;
pub use edge::{edge_task, MAX_INPUT_TASKS};
