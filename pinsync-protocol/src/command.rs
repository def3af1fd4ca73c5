//! Typed commands and their execution against the core façade

use embassy_sync::blocking_mutex::raw::RawMutex;

use pinsync_core::{
    ChangeOrigin, Error, IoHub, LineDriver, LineEntry, LineId, MAX_LINES,
};

/// One operation from the common command vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Drive an output line
    Set { line: LineId, value: bool },
    /// Read a line's cached value
    Get { line: LineId },
    /// Snapshot of every registered line
    List,
    /// Usage summary (console transport)
    Help,
}

/// Transport-neutral outcome of a command
///
/// Transports render this into their own framing; the caller is responsible
/// for echoing its correlation identifier alongside.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Successful `set`, echoing id and value
    Updated { line: LineId, value: bool },
    /// Successful `get`
    Value { line: LineId, value: bool },
    /// Successful `list`
    State(heapless::Vec<LineEntry, MAX_LINES>),
    /// Command vocabulary summary, rendered by the transport
    Usage,
    /// Any failure, carrying the core error for code mapping
    Failed(Error),
}

/// Translate one command into façade calls
///
/// This is the single path from vocabulary to core shared by every
/// transport; errors are captured in the reply, never propagated, so the
/// transport always has something to send back.
pub fn execute<M: RawMutex, D: LineDriver>(
    hub: &IoHub<M, D>,
    command: &Command,
    origin: ChangeOrigin,
) -> Reply {
    match *command {
        Command::Set { line, value } => match hub.set(line, value, origin) {
            Ok(()) => Reply::Updated { line, value },
            Err(err) => Reply::Failed(err),
        },
        Command::Get { line } => match hub.get(line) {
            Ok(value) => Reply::Value { line, value },
            Err(err) => Reply::Failed(err),
        },
        Command::List => Reply::State(hub.entries()),
        Command::Help => Reply::Usage,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
    use pinsync_core::{Direction, DriverError, LineConfig};

    struct NullDriver;

    impl LineDriver for NullDriver {
        fn configure_output(&mut self, _line: LineId, _initial: bool) -> Result<(), DriverError> {
            Ok(())
        }

        fn write(&mut self, _line: LineId, _value: bool) -> Result<(), DriverError> {
            Ok(())
        }
    }

    fn started_hub() -> IoHub<CriticalSectionRawMutex, NullDriver> {
        let hub = IoHub::new();
        let allow = [
            LineConfig::output(18),
            LineConfig::output(19),
            LineConfig::input(10, false),
        ];
        hub.init(NullDriver, &allow, &[]).unwrap();
        while hub.service() {}
        hub
    }

    #[test]
    fn test_set_then_get() {
        let hub = started_hub();
        let reply = execute(
            &hub,
            &Command::Set {
                line: 18,
                value: true,
            },
            ChangeOrigin::Network,
        );
        assert_eq!(
            reply,
            Reply::Updated {
                line: 18,
                value: true
            }
        );

        let reply = execute(&hub, &Command::Get { line: 18 }, ChangeOrigin::Network);
        assert_eq!(
            reply,
            Reply::Value {
                line: 18,
                value: true
            }
        );
    }

    #[test]
    fn test_set_on_input_fails_in_reply() {
        let hub = started_hub();
        let reply = execute(
            &hub,
            &Command::Set {
                line: 10,
                value: true,
            },
            ChangeOrigin::Network,
        );
        assert_eq!(reply, Reply::Failed(Error::NotOutput));
    }

    #[test]
    fn test_unknown_line() {
        let hub = started_hub();
        let reply = execute(&hub, &Command::Get { line: 7 }, ChangeOrigin::SerialConsole);
        assert_eq!(reply, Reply::Failed(Error::NotFound));
    }

    #[test]
    fn test_help_needs_no_hub_state() {
        // Usage must be answerable even before init
        let hub: IoHub<CriticalSectionRawMutex, NullDriver> = IoHub::new();
        let reply = execute(&hub, &Command::Help, ChangeOrigin::SerialConsole);
        assert_eq!(reply, Reply::Usage);
    }

    #[test]
    fn test_list_snapshot() {
        let hub = started_hub();
        let Reply::State(entries) = execute(&hub, &Command::List, ChangeOrigin::Network) else {
            panic!("expected state reply");
        };
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].line, 18);
        assert_eq!(entries[2].direction, Direction::Input);
    }
}
