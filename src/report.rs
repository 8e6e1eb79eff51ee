//! Run-log reconciliation: turn the append-only log into report tables.
//!
//! The log format is the contract between the upload run and this pass, so
//! the parser lives apart from the writer and recognizes exactly two line
//! shapes. Anything else (skip notes, banners, lines from older tooling) is
//! ignored rather than treated as corruption.

use std::path::Path;

use anyhow::{Context, Result};

use crate::collection::CollectionType;

/// One reconcilable outcome recovered from the log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogEvent {
    Success {
        kind: CollectionType,
        id: u64,
        handle: String,
    },
    Failure {
        row: usize,
        title: String,
        message: String,
    },
}

/// Parse one log line into an event, or `None` if it matches neither shape.
///
/// Accepts both bare lines and lines carrying the durable log's
/// `[timestamp] ` prefix:
///
/// - `Created {custom|smart}: id={digits} handle={token}`
/// - `Row {digits} "{title}": ERROR -> {message}`
pub fn parse_line(line: &str) -> Option<LogEvent> {
    let line = strip_timestamp(line);
    parse_success(line).or_else(|| parse_failure(line))
}

/// Collect every reconcilable event from the full log text, in log order.
pub fn collect_events(log_text: &str) -> Vec<LogEvent> {
    log_text.lines().filter_map(parse_line).collect()
}

/// Totals written by [`write_reports`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportCounts {
    pub successes: usize,
    pub errors: usize,
}

/// Split events into the two report CSVs.
///
/// Successes get `type,id,handle`; errors get `row,title,error`. The csv
/// writer quotes fields with commas or quotes and doubles embedded quotes.
pub fn write_reports(
    events: &[LogEvent],
    success_path: &Path,
    error_path: &Path,
) -> Result<ReportCounts> {
    let mut successes = csv::Writer::from_path(success_path)
        .with_context(|| format!("cannot write {}", success_path.display()))?;
    let mut errors = csv::Writer::from_path(error_path)
        .with_context(|| format!("cannot write {}", error_path.display()))?;

    successes.write_record(["type", "id", "handle"])?;
    errors.write_record(["row", "title", "error"])?;

    let mut counts = ReportCounts {
        successes: 0,
        errors: 0,
    };
    for event in events {
        match event {
            LogEvent::Success { kind, id, handle } => {
                successes.write_record([kind.to_string(), id.to_string(), handle.clone()])?;
                counts.successes += 1;
            }
            LogEvent::Failure {
                row,
                title,
                message,
            } => {
                errors.write_record([row.to_string(), title.clone(), message.clone()])?;
                counts.errors += 1;
            }
        }
    }
    successes.flush()?;
    errors.flush()?;
    Ok(counts)
}

fn strip_timestamp(line: &str) -> &str {
    if line.starts_with('[')
        && let Some(end) = line.find("] ")
    {
        return &line[end + 2..];
    }
    line
}

/// Mandatory whitespace: `None` when the input does not start with any.
fn skip_ws(s: &str) -> Option<&str> {
    let trimmed = s.trim_start();
    if trimmed.len() == s.len() { None } else { Some(trimmed) }
}

/// Leading decimal digits and the rest, `None` when there are none.
fn take_digits(s: &str) -> Option<(&str, &str)> {
    let end = s
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(s.len());
    if end == 0 { None } else { Some(s.split_at(end)) }
}

fn parse_success(line: &str) -> Option<LogEvent> {
    let rest = line.strip_prefix("Created")?;
    let rest = skip_ws(rest)?;
    let (kind, rest) = if let Some(r) = rest.strip_prefix("custom:") {
        (CollectionType::Custom, r)
    } else if let Some(r) = rest.strip_prefix("smart:") {
        (CollectionType::Smart, r)
    } else {
        return None;
    };
    let rest = skip_ws(rest)?;
    let rest = rest.strip_prefix("id=")?;
    let (digits, rest) = take_digits(rest)?;
    let id: u64 = digits.parse().ok()?;
    let rest = skip_ws(rest)?;
    let rest = rest.strip_prefix("handle=")?;
    let handle: String = rest.chars().take_while(|c| !c.is_whitespace()).collect();
    if handle.is_empty() {
        return None;
    }
    Some(LogEvent::Success { kind, id, handle })
}

fn parse_failure(line: &str) -> Option<LogEvent> {
    let rest = line.strip_prefix("Row")?;
    let rest = skip_ws(rest)?;
    let (digits, rest) = take_digits(rest)?;
    let row: usize = digits.parse().ok()?;
    let rest = skip_ws(rest)?;
    let rest = rest.strip_prefix('"')?;
    let (title, rest) = rest.split_once('"')?;
    let rest = rest.strip_prefix(':')?;
    let rest = skip_ws(rest)?;
    let rest = rest.strip_prefix("ERROR")?;
    let rest = skip_ws(rest)?;
    let rest = rest.strip_prefix("->")?;
    let rest = skip_ws(rest)?;
    Some(LogEvent::Failure {
        row,
        title: title.to_string(),
        message: rest.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_success_line() {
        let event = parse_line("Created custom: id=42 handle=widgets").unwrap();
        assert_eq!(
            event,
            LogEvent::Success {
                kind: CollectionType::Custom,
                id: 42,
                handle: "widgets".into(),
            }
        );
    }

    #[test]
    fn parses_timestamp_prefixed_lines() {
        let event =
            parse_line("[2025-03-01T10:15:30.000Z] Created smart: id=7 handle=on-sale").unwrap();
        assert_eq!(
            event,
            LogEvent::Success {
                kind: CollectionType::Smart,
                id: 7,
                handle: "on-sale".into(),
            }
        );
    }

    #[test]
    fn parses_failure_line() {
        let line = "[2025-03-01T10:15:31.000Z] Row 3 \"Sale, 50% off\": ERROR -> API returned status 422: handle taken";
        let event = parse_line(line).unwrap();
        assert_eq!(
            event,
            LogEvent::Failure {
                row: 3,
                title: "Sale, 50% off".into(),
                message: "API returned status 422: handle taken".into(),
            }
        );
    }

    #[test]
    fn ignores_everything_else() {
        assert_eq!(parse_line(""), None);
        assert_eq!(parse_line("Row 4: skipped (missing title)"), None);
        assert_eq!(parse_line("Created banana: id=1 handle=x"), None);
        assert_eq!(parse_line("Created custom: id=abc handle=x"), None);
        assert_eq!(parse_line("Unexpected response: {\"ok\":true}"), None);
        assert_eq!(parse_line("[2025-03-01T10:00:00.000Z] run started"), None);
    }

    #[test]
    fn round_trip_one_success_one_failure() {
        let log = "[2025-03-01T10:00:00.000Z] Created custom: id=42 handle=widgets\n\
                   [2025-03-01T10:00:01.000Z] Row 2 \"Gadgets\": ERROR -> Failed after 5 retries: https://x/custom_collections.json\n\
                   [2025-03-01T10:00:02.000Z] Row 3: skipped (missing title)\n";
        let events = collect_events(log);
        assert_eq!(events.len(), 2);

        let dir = tempfile::tempdir().unwrap();
        let success_path = dir.path().join("successes.csv");
        let error_path = dir.path().join("errors.csv");
        let counts = write_reports(&events, &success_path, &error_path).unwrap();
        assert_eq!(counts, ReportCounts { successes: 1, errors: 1 });

        let successes = std::fs::read_to_string(&success_path).unwrap();
        assert_eq!(successes, "type,id,handle\ncustom,42,widgets\n");

        let errors = std::fs::read_to_string(&error_path).unwrap();
        let mut lines = errors.lines();
        assert_eq!(lines.next(), Some("row,title,error"));
        assert_eq!(
            lines.next(),
            Some("2,Gadgets,Failed after 5 retries: https://x/custom_collections.json")
        );
    }

    #[test]
    fn report_quotes_commas_and_doubles_quotes() {
        let events = vec![LogEvent::Failure {
            row: 9,
            title: "Sale, 50% off".into(),
            message: "said \"no\", twice".into(),
        }];

        let dir = tempfile::tempdir().unwrap();
        let success_path = dir.path().join("successes.csv");
        let error_path = dir.path().join("errors.csv");
        write_reports(&events, &success_path, &error_path).unwrap();

        let errors = std::fs::read_to_string(&error_path).unwrap();
        assert!(errors.contains("\"Sale, 50% off\""));
        assert!(errors.contains("\"said \"\"no\"\", twice\""));
    }

    #[test]
    fn success_handle_stops_at_whitespace() {
        let event = parse_line("Created custom: id=5 handle=two-words trailing").unwrap();
        match event {
            LogEvent::Success { handle, .. } => assert_eq!(handle, "two-words"),
            other => panic!("unexpected event {other:?}"),
        }
    }
}
