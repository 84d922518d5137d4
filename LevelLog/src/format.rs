// src/format.rs
// Renders one log line: ts | LEVEL prefix[ | Thread ID: n][ | Process ID: n] | message
use crate::proto::FIELD_SEP;
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local};
use std::fmt::Write;

/// Renders `now` with a strftime pattern. A pattern chrono cannot parse yields "".
pub fn render_timestamp(now: &DateTime<Local>, pattern: &str) -> String {
    let items: Vec<Item<'_>> = StrftimeItems::new(pattern).collect();
    if items.iter().any(|i| matches!(i, Item::Error)) {
        return String::new();
    }
    let mut out = String::with_capacity(32);
    if write!(out, "{}", now.format_with_items(items.iter())).is_err() {
        out.clear();
    }
    out
}

/// Thread/process identifiers captured once per message so both sinks agree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Annotations {
    pub thread_id: Option<String>,
    pub process_id: Option<u32>,
}

impl Annotations {
    pub fn capture(include_thread_id: bool, include_process_id: bool) -> Self {
        Self {
            thread_id: include_thread_id.then(current_thread_id),
            process_id: include_process_id.then(std::process::id),
        }
    }
}

/// Numeric part of the current `ThreadId`.
pub fn current_thread_id() -> String {
    thread_id_digits(&format!("{:?}", std::thread::current().id()))
}

// ThreadId's Debug output ("ThreadId(N)") is not a stable format; anything else
// is returned verbatim.
fn thread_id_digits(raw: &str) -> String {
    raw.strip_prefix("ThreadId(")
        .and_then(|s| s.strip_suffix(')'))
        .unwrap_or(raw)
        .to_string()
}

pub fn render_line(
    timestamp: &str,
    level_label: &str,
    prefix: &str,
    ann: &Annotations,
    message: &str,
) -> String {
    let mut line = String::with_capacity(64 + prefix.len() + message.len());
    line.push_str(timestamp);
    line.push_str(FIELD_SEP);
    line.push_str(level_label);
    line.push(' ');
    line.push_str(prefix);
    if let Some(tid) = &ann.thread_id {
        line.push_str(FIELD_SEP);
        line.push_str("Thread ID: ");
        line.push_str(tid);
    }
    if let Some(pid) = ann.process_id {
        let _ = write!(line, "{FIELD_SEP}Process ID: {pid}");
    }
    line.push_str(FIELD_SEP);
    line.push_str(message);
    line
}
