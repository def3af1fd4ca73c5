//! Compact text framing for the serial console channel
//!
//! Console commands:
//!
//! ```text
//! line list
//! line get <pin>
//! line set <pin> <0|1>
//! help
//! ```
//!
//! Replies are single lines: `LINE<n>=<v>`, `OK`, `ERR <CODE>`, or one
//! `LINE<n> dir=<d> value=<v>` row per entry for `list`.

use core::fmt::Write;

use pinsync_core::{Error, LineId};

use crate::command::{Command, Reply};

/// Parse one console input line into a command
///
/// An unknown verb or subcommand fails with `NotSupported`; malformed
/// arguments fail with `BadArgument`.
pub fn parse_console(input: &str) -> Result<Command, Error> {
    let mut words = input.split_whitespace();
    let verb = words.next().ok_or(Error::BadArgument)?;
    if verb == "help" {
        if words.next().is_some() {
            return Err(Error::BadArgument);
        }
        return Ok(Command::Help);
    }
    if verb != "line" {
        return Err(Error::NotSupported);
    }

    let sub = words.next().ok_or(Error::BadArgument)?;
    let command = match sub {
        "list" => Command::List,
        "get" => Command::Get {
            line: parse_id(words.next())?,
        },
        "set" => {
            let line = parse_id(words.next())?;
            let value = match words.next() {
                Some("0") => false,
                Some("1") => true,
                _ => return Err(Error::BadArgument),
            };
            Command::Set { line, value }
        }
        _ => return Err(Error::NotSupported),
    };

    // Trailing junk is a malformed request, not a different command
    if words.next().is_some() {
        return Err(Error::BadArgument);
    }
    Ok(command)
}

fn parse_id(word: Option<&str>) -> Result<LineId, Error> {
    word.ok_or(Error::BadArgument)?
        .parse()
        .map_err(|_| Error::BadArgument)
}

/// Render a reply in the console's compact form
///
/// A formatting overflow (fixed-capacity output buffer exhausted) surfaces
/// as `NoMemory` so the console can report a serialization failure.
pub fn write_console_reply(reply: &Reply, out: &mut impl Write) -> Result<(), Error> {
    let rendered = match reply {
        Reply::Updated { .. } => writeln!(out, "OK"),
        Reply::Value { line, value } => writeln!(out, "LINE{}={}", line, *value as u8),
        Reply::State(entries) => {
            for e in entries {
                if writeln!(
                    out,
                    "LINE{} dir={} value={}",
                    e.line,
                    e.direction.tag(),
                    e.value as u8
                )
                .is_err()
                {
                    return Err(Error::NoMemory);
                }
            }
            Ok(())
        }
        Reply::Usage => {
            for usage in ["line list", "line get <pin>", "line set <pin> <0|1>", "help"] {
                if writeln!(out, "{}", usage).is_err() {
                    return Err(Error::NoMemory);
                }
            }
            Ok(())
        }
        Reply::Failed(err) => writeln!(out, "ERR {}", err.code()),
    };
    rendered.map_err(|_| Error::NoMemory)
}

#[cfg(test)]
mod tests {
    use super::*;
    use heapless::String;
    use pinsync_core::{Direction, LineEntry};

    fn render(reply: &Reply) -> String<256> {
        let mut out = String::new();
        write_console_reply(reply, &mut out).unwrap();
        out
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse_console("line list"), Ok(Command::List));
        assert_eq!(parse_console("line get 10"), Ok(Command::Get { line: 10 }));
        assert_eq!(
            parse_console("line set 18 1"),
            Ok(Command::Set {
                line: 18,
                value: true
            })
        );
        assert_eq!(
            parse_console("  line   set 18 0 "),
            Ok(Command::Set {
                line: 18,
                value: false
            })
        );
        assert_eq!(parse_console("help"), Ok(Command::Help));
        assert_eq!(parse_console("help me"), Err(Error::BadArgument));
    }

    #[test]
    fn test_parse_rejects_unknown_verbs() {
        assert_eq!(parse_console("reboot"), Err(Error::NotSupported));
        assert_eq!(parse_console("line frobnicate"), Err(Error::NotSupported));
    }

    #[test]
    fn test_parse_rejects_malformed_arguments() {
        assert_eq!(parse_console(""), Err(Error::BadArgument));
        assert_eq!(parse_console("line get"), Err(Error::BadArgument));
        assert_eq!(parse_console("line get abc"), Err(Error::BadArgument));
        assert_eq!(parse_console("line set 18"), Err(Error::BadArgument));
        assert_eq!(parse_console("line set 18 2"), Err(Error::BadArgument));
        assert_eq!(parse_console("line set 18 1 extra"), Err(Error::BadArgument));
    }

    #[test]
    fn test_render_replies() {
        assert_eq!(
            render(&Reply::Updated {
                line: 18,
                value: true
            })
            .as_str(),
            "OK\n"
        );
        assert_eq!(
            render(&Reply::Value {
                line: 18,
                value: true
            })
            .as_str(),
            "LINE18=1\n"
        );
        assert_eq!(
            render(&Reply::Failed(Error::NotFound)).as_str(),
            "ERR NOT_FOUND\n"
        );
    }

    #[test]
    fn test_render_usage() {
        assert_eq!(
            render(&Reply::Usage).as_str(),
            "line list\nline get <pin>\nline set <pin> <0|1>\nhelp\n"
        );
    }

    #[test]
    fn test_render_state() {
        let mut entries: heapless::Vec<LineEntry, 32> = heapless::Vec::new();
        entries
            .push(LineEntry {
                line: 18,
                direction: Direction::Output,
                value: true,
            })
            .unwrap();
        entries
            .push(LineEntry {
                line: 10,
                direction: Direction::Input,
                value: false,
            })
            .unwrap();
        assert_eq!(
            render(&Reply::State(entries)).as_str(),
            "LINE18 dir=out value=1\nLINE10 dir=in value=0\n"
        );
    }

    #[test]
    fn test_overflow_is_no_memory() {
        let mut out: String<4> = String::new();
        let reply = Reply::Value {
            line: 18,
            value: true,
        };
        assert_eq!(write_console_reply(&reply, &mut out), Err(Error::NoMemory));
    }

    mod props {
        use super::*;
        use core::fmt::Write as _;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn any_input_parses_or_fails_cleanly(input in ".{0,64}") {
                let _ = parse_console(&input);
            }

            #[test]
            fn rendered_set_parses_back(line in proptest::num::u8::ANY, value in any::<bool>()) {
                let mut text: String<32> = String::new();
                write!(text, "line set {} {}", line, value as u8).unwrap();
                prop_assert_eq!(
                    parse_console(&text),
                    Ok(Command::Set { line, value })
                );
            }
        }
    }
}
