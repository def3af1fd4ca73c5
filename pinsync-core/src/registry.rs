//! Line registry construction
//!
//! Builds the fixed set of controllable lines from a configuration-supplied
//! allow-list. Entries that are out of range, reserved for other peripherals,
//! duplicated, or in excess of capacity are skipped silently; the registry's
//! size and membership never change after this.

use heapless::Vec;

use crate::error::Error;
use crate::line::{LineConfig, LineEntry, LineId, MAX_LINE_ID};

/// Fixed capacity of the registry table
pub const MAX_LINES: usize = 32;

/// Check whether a line id is inside the valid numeric range
fn is_valid(line: LineId) -> bool {
    line <= MAX_LINE_ID
}

/// Build the registry table from an allow-list
///
/// `reserved` names lines that are hard-wired to other peripherals (status
/// LED, debug UART) and must never be exposed, regardless of the allow-list.
///
/// Fails with `Error::NoEntries` if nothing survives validation: the system
/// cannot usefully start with zero controllable lines.
pub fn build_registry(
    allow: &[LineConfig],
    reserved: &[LineId],
) -> Result<Vec<LineEntry, MAX_LINES>, Error> {
    let mut entries: Vec<LineEntry, MAX_LINES> = Vec::new();

    for cfg in allow {
        if !is_valid(cfg.line) || reserved.contains(&cfg.line) {
            continue;
        }
        if entries.iter().any(|e| e.line == cfg.line) {
            continue;
        }
        let entry = LineEntry {
            line: cfg.line,
            direction: cfg.direction,
            value: cfg.level,
        };
        if entries.push(entry).is_err() {
            // Table full; remaining allow-list entries are dropped
            break;
        }
    }

    if entries.is_empty() {
        return Err(Error::NoEntries);
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::line::Direction;

    #[test]
    fn test_builds_in_allow_list_order() {
        let allow = [
            LineConfig::output(18),
            LineConfig::output(19),
            LineConfig::input(10, false),
        ];
        let entries = build_registry(&allow, &[]).unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].line, 18);
        assert_eq!(entries[1].line, 19);
        assert_eq!(entries[2].line, 10);
        assert_eq!(entries[2].direction, Direction::Input);
    }

    #[test]
    fn test_skips_out_of_range() {
        let allow = [LineConfig::output(30), LineConfig::output(18)];
        let entries = build_registry(&allow, &[]).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].line, 18);
    }

    #[test]
    fn test_skips_reserved() {
        let allow = [LineConfig::output(25), LineConfig::output(18)];
        let entries = build_registry(&allow, &[25]).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].line, 18);
    }

    #[test]
    fn test_skips_duplicates_keeping_first() {
        let allow = [
            LineConfig::output(18),
            LineConfig::input(18, true),
            LineConfig::output(19),
        ];
        let entries = build_registry(&allow, &[]).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].direction, Direction::Output);
    }

    #[test]
    fn test_initial_levels_seed_cache() {
        let allow = [LineConfig::input(10, true), LineConfig::output(18)];
        let entries = build_registry(&allow, &[]).unwrap();
        assert!(entries[0].value);
        assert!(!entries[1].value);
    }

    #[test]
    fn test_empty_result_is_an_error() {
        assert_eq!(build_registry(&[], &[]), Err(Error::NoEntries));

        let allow = [LineConfig::output(25)];
        assert_eq!(build_registry(&allow, &[25]), Err(Error::NoEntries));
    }

    #[test]
    fn test_capacity_cap() {
        // 0..=29 valid ids plus duplicates; table must never exceed MAX_LINES
        let mut allow: heapless::Vec<LineConfig, 64> = heapless::Vec::new();
        for line in 0..=MAX_LINE_ID {
            allow.push(LineConfig::output(line)).unwrap();
            allow.push(LineConfig::output(line)).unwrap();
        }
        let entries = build_registry(&allow, &[]).unwrap();
        assert_eq!(entries.len(), 30);
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        prop_compose! {
            fn arb_config()(
                line in 0u8..64,
                output in any::<bool>(),
                level in any::<bool>(),
            ) -> LineConfig {
                LineConfig {
                    line,
                    direction: if output { Direction::Output } else { Direction::Input },
                    level,
                }
            }
        }

        proptest! {
            #[test]
            fn registry_ids_are_unique_valid_and_unreserved(
                allow in proptest::collection::vec(arb_config(), 0..80),
                reserved in proptest::collection::vec(0u8..64, 0..4),
            ) {
                match build_registry(&allow, &reserved) {
                    Ok(entries) => {
                        for (i, e) in entries.iter().enumerate() {
                            prop_assert!(e.line <= MAX_LINE_ID);
                            prop_assert!(!reserved.contains(&e.line));
                            prop_assert!(!entries[..i].iter().any(|p| p.line == e.line));
                        }
                    }
                    Err(err) => prop_assert_eq!(err, Error::NoEntries),
                }
            }
        }
    }
}
