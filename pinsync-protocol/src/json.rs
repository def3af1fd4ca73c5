//! JSON framing for the network and radio-link channels
//!
//! Requests accept long, single-letter, and `gpio_*` verb aliases so the
//! radio link can send compact frames and older clients keep working.
//! Replies carry `"type":"resp"` / `"type":"err"` / `"type":"state"`, and
//! dispatcher pushes use `"type":"line_changed"`. Every reply echoes the
//! caller-supplied correlation `id` when present.

use alloc::string::String;

use serde::Deserialize;
use serde_json::json;

use pinsync_core::{ChangeEvent, Error, LineEntry, LineId};

use crate::command::{Command, Reply};

/// A parsed request: the command plus its correlation identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Request {
    pub command: Command,
    pub id: Option<i64>,
}

#[derive(Deserialize)]
struct RawRequest<'a> {
    #[serde(rename = "type", alias = "t", borrow)]
    kind: Option<&'a str>,
    #[serde(default, alias = "p")]
    pin: Option<LineId>,
    #[serde(default, alias = "v")]
    value: Option<i64>,
    #[serde(default)]
    id: Option<i64>,
}

/// Parse one JSON request frame
///
/// Malformed JSON or missing fields fail with `BadArgument`; an unknown
/// command verb fails with `NotSupported`. The correlation id is recovered
/// where possible so the error reply can still echo it.
pub fn parse_request(text: &str) -> Result<Request, (Error, Option<i64>)> {
    let raw: RawRequest =
        serde_json::from_str(text).map_err(|_| (Error::BadArgument, None))?;

    let kind = raw.kind.ok_or((Error::BadArgument, raw.id))?;
    let command = match kind {
        "set" | "s" | "gpio_set" => {
            let line = raw.pin.ok_or((Error::BadArgument, raw.id))?;
            let value = raw.value.ok_or((Error::BadArgument, raw.id))?;
            if value < 0 {
                return Err((Error::BadArgument, raw.id));
            }
            Command::Set {
                line,
                value: value != 0,
            }
        }
        "get" | "g" | "gpio_get" => {
            let line = raw.pin.ok_or((Error::BadArgument, raw.id))?;
            Command::Get { line }
        }
        "list" | "l" | "gpio_list" | "state" => Command::List,
        _ => return Err((Error::NotSupported, raw.id)),
    };

    Ok(Request {
        command,
        id: raw.id,
    })
}

fn bit(value: bool) -> u8 {
    value as u8
}

/// Frame sent when serializing a reply itself fails
const NO_MEM_FRAME: &str = r#"{"type":"err","code":"NO_MEM"}"#;

/// Serialize a finished body, mapping serialization failure to `NO_MEM`
///
/// `serde_json::Value` bodies only fail to serialize when allocation does.
fn finish(body: &serde_json::Value) -> String {
    match serde_json::to_string(body) {
        Ok(text) => text,
        Err(_) => String::from(NO_MEM_FRAME),
    }
}

/// Encode a command reply, echoing the correlation id when present
pub fn encode_reply(reply: &Reply, id: Option<i64>) -> String {
    let mut body = match reply {
        Reply::Updated { line, value } | Reply::Value { line, value } => json!({
            "type": "resp",
            "pin": line,
            "value": bit(*value),
        }),
        Reply::State(entries) => state_body(entries),
        Reply::Usage => json!({
            "type": "resp",
        }),
        Reply::Failed(err) => json!({
            "type": "err",
            "code": err.code(),
        }),
    };
    if let Some(id) = id {
        body["id"] = json!(id);
    }
    finish(&body)
}

/// Encode a full-state snapshot (also pushed to newly connected clients)
pub fn encode_state(entries: &[LineEntry]) -> String {
    finish(&state_body(entries))
}

fn state_body(entries: &[LineEntry]) -> serde_json::Value {
    let lines: alloc::vec::Vec<serde_json::Value> = entries
        .iter()
        .map(|e| {
            json!({
                "pin": e.line,
                "dir": e.direction.tag(),
                "value": bit(e.value),
            })
        })
        .collect();
    json!({
        "type": "state",
        "lines": lines,
    })
}

/// Encode one dispatcher change event for push channels
pub fn encode_event(event: &ChangeEvent) -> String {
    let body = json!({
        "type": "line_changed",
        "pin": event.line,
        "value": bit(event.value),
        "dir": event.direction.tag(),
        "reason": event.reason.tag(),
    });
    finish(&body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pinsync_core::{ChangeOrigin, ChangeReason, Direction};

    #[test]
    fn test_parse_set_long_keys() {
        let req = parse_request(r#"{"type":"set","pin":18,"value":1,"id":7}"#).unwrap();
        assert_eq!(
            req.command,
            Command::Set {
                line: 18,
                value: true
            }
        );
        assert_eq!(req.id, Some(7));
    }

    #[test]
    fn test_parse_set_short_keys() {
        let req = parse_request(r#"{"t":"s","p":19,"v":0}"#).unwrap();
        assert_eq!(
            req.command,
            Command::Set {
                line: 19,
                value: false
            }
        );
        assert_eq!(req.id, None);
    }

    #[test]
    fn test_parse_get_and_list() {
        let req = parse_request(r#"{"type":"get","pin":10}"#).unwrap();
        assert_eq!(req.command, Command::Get { line: 10 });

        for text in [
            r#"{"type":"list"}"#,
            r#"{"t":"l"}"#,
            r#"{"type":"state"}"#,
        ] {
            assert_eq!(parse_request(text).unwrap().command, Command::List);
        }
    }

    #[test]
    fn test_parse_gpio_verb_aliases() {
        let req = parse_request(r#"{"type":"gpio_set","pin":18,"value":1}"#).unwrap();
        assert_eq!(
            req.command,
            Command::Set {
                line: 18,
                value: true
            }
        );

        let req = parse_request(r#"{"type":"gpio_get","pin":10,"id":4}"#).unwrap();
        assert_eq!(req.command, Command::Get { line: 10 });
        assert_eq!(req.id, Some(4));

        let req = parse_request(r#"{"type":"gpio_list"}"#).unwrap();
        assert_eq!(req.command, Command::List);
    }

    #[test]
    fn test_parse_failures() {
        // Not JSON at all
        assert_eq!(parse_request("nonsense"), Err((Error::BadArgument, None)));
        // Missing verb, id still recovered
        assert_eq!(
            parse_request(r#"{"pin":18,"id":3}"#),
            Err((Error::BadArgument, Some(3)))
        );
        // set without value
        assert_eq!(
            parse_request(r#"{"type":"set","pin":18}"#),
            Err((Error::BadArgument, None))
        );
        // Negative value
        assert_eq!(
            parse_request(r#"{"type":"set","pin":18,"value":-1}"#),
            Err((Error::BadArgument, None))
        );
        // Unknown verb
        assert_eq!(
            parse_request(r#"{"type":"reboot","id":9}"#),
            Err((Error::NotSupported, Some(9)))
        );
    }

    #[test]
    fn test_encode_replies() {
        let reply = Reply::Updated {
            line: 18,
            value: true,
        };
        assert_eq!(
            encode_reply(&reply, Some(7)),
            r#"{"id":7,"pin":18,"type":"resp","value":1}"#
        );

        // get replies share the "resp" discriminant with set replies
        let reply = Reply::Value {
            line: 10,
            value: false,
        };
        assert_eq!(
            encode_reply(&reply, None),
            r#"{"pin":10,"type":"resp","value":0}"#
        );

        let reply = Reply::Failed(Error::NotFound);
        assert_eq!(
            encode_reply(&reply, None),
            r#"{"code":"NOT_FOUND","type":"err"}"#
        );
    }

    #[test]
    fn test_serialization_failure_frame_is_well_formed() {
        let frame: serde_json::Value = serde_json::from_str(NO_MEM_FRAME).unwrap();
        assert_eq!(frame["type"], "err");
        assert_eq!(frame["code"], Error::NoMemory.code());
    }

    #[test]
    fn test_encode_state() {
        let entries = [
            LineEntry {
                line: 18,
                direction: Direction::Output,
                value: true,
            },
            LineEntry {
                line: 10,
                direction: Direction::Input,
                value: false,
            },
        ];
        assert_eq!(
            encode_state(&entries),
            r#"{"lines":[{"dir":"out","pin":18,"value":1},{"dir":"in","pin":10,"value":0}],"type":"state"}"#
        );
    }

    #[test]
    fn test_encode_event() {
        let event = ChangeEvent {
            line: 10,
            value: true,
            direction: Direction::Input,
            reason: ChangeReason::HardwareEdge,
            origin: ChangeOrigin::Local,
        };
        assert_eq!(
            encode_event(&event),
            r#"{"dir":"in","pin":10,"reason":"edge","type":"line_changed","value":1}"#
        );
    }
}
