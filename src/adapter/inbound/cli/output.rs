//! Terminal output for the CLI handlers.
//!
//! Human output is indented, colored text. With `--json` each line on stdout
//! is an object `{"type": ..., "payload": ...}` so runs can be scripted and
//! parsed; `--quiet` keeps only warnings, errors and JSON. Tracing logs go to
//! stderr and never mix with this output.

use std::fmt::Display;
use std::path::PathBuf;
use std::sync::{OnceLock, RwLock};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use serde::Serialize;
use serde_json::{json, Value};

use crate::port::outbound::store::UpsertCounts;

/// Global output flags, set once from the parsed command line.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputConfig {
    pub json: bool,
    pub quiet: bool,
}

impl OutputConfig {
    #[must_use]
    pub const fn new(json: bool, quiet: bool) -> Self {
        Self { json, quiet }
    }
}

static OUTPUT: OnceLock<RwLock<OutputConfig>> = OnceLock::new();

fn current() -> OutputConfig {
    let cell = OUTPUT.get_or_init(RwLock::default);
    match cell.read() {
        Ok(config) => *config,
        Err(poisoned) => *poisoned.into_inner(),
    }
}

/// Apply the global flags. Call once, before any handler runs.
pub fn configure(config: OutputConfig) {
    let cell = OUTPUT.get_or_init(RwLock::default);
    match cell.write() {
        Ok(mut slot) => *slot = config,
        Err(poisoned) => *poisoned.into_inner() = config,
    }
}

#[must_use]
pub fn is_json() -> bool {
    current().json
}

#[must_use]
pub fn is_quiet() -> bool {
    current().quiet
}

/// How a line is rendered and whether `--quiet` hides it.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Kind {
    Field,
    Success,
    Warning,
    Hint,
    Section,
    Lines,
}

impl Kind {
    const fn tag(self) -> &'static str {
        match self {
            Self::Field => "field",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Hint => "hint",
            Self::Section => "section",
            Self::Lines => "lines",
        }
    }

    const fn survives_quiet(self) -> bool {
        matches!(self, Self::Warning)
    }
}

fn json_line(tag: &str, payload: Value) -> String {
    json!({ "type": tag, "payload": payload }).to_string()
}

/// Single exit point for stdout lines. `human` is only built when needed.
fn emit(kind: Kind, payload: impl FnOnce() -> Value, human: impl FnOnce() -> String) {
    let config = current();
    if config.json {
        println!("{}", json_line(kind.tag(), payload()));
    } else if !config.quiet || kind.survives_quiet() {
        println!("{}", human());
    }
}

/// Program name and version.
pub fn header(version: &str) {
    let config = current();
    if config.json || config.quiet {
        return;
    }
    println!("{} {}", "rugby-ingest".bold(), version.dimmed());
    println!();
}

/// A labeled value.
pub fn field(label: &str, value: impl Display) {
    let value = value.to_string();
    emit(
        Kind::Field,
        || json!({ "label": label, "value": value }),
        || format!("  {:<12} {}", label.dimmed(), value),
    );
}

pub fn success(message: &str) {
    emit(
        Kind::Success,
        || json!({ "message": message }),
        || format!("  {} {}", "✓".green(), message),
    );
}

pub fn warning(message: &str) {
    emit(
        Kind::Warning,
        || json!({ "message": message }),
        || format!("  {} {}", "⚠".yellow(), message),
    );
}

/// Follow-up suggestion, e.g. the command to run next.
pub fn hint(message: &str) {
    emit(
        Kind::Hint,
        || json!({ "message": message }),
        || format!("  {}: {}", "hint".cyan().dimmed(), message.dimmed()),
    );
}

pub fn section(title: &str) {
    emit(
        Kind::Section,
        || json!({ "title": title }),
        || format!("\n{}", title.bold()),
    );
}

/// A pre-rendered block such as a table, indented line by line.
pub fn lines(content: &str) {
    emit(
        Kind::Lines,
        || json!({ "content": content }),
        || {
            content
                .lines()
                .map(|line| format!("  {line}"))
                .collect::<Vec<_>>()
                .join("\n")
        },
    );
}

/// Errors go to stderr in every mode.
pub fn error(message: &str) {
    if is_json() {
        eprintln!("{}", json_line("error", json!({ "message": message })));
    } else {
        eprintln!("  {} {}", "×".red(), message);
    }
}

/// A command's report as one `result` line; the command name is merged into
/// the payload.
pub fn result<T: Serialize>(command: &str, report: &T) {
    let payload = match serde_json::to_value(report) {
        Ok(Value::Object(mut map)) => {
            map.insert("command".into(), json!(command));
            Value::Object(map)
        }
        Ok(other) => json!({ "command": command, "result": other }),
        Err(e) => json!({ "command": command, "error": e.to_string() }),
    };
    println!("{}", json_line("result", payload));
}

/// Inserted, updated and skipped totals of an ingest run, then any CSV files.
pub fn upsert_counts<'a>(counts: &UpsertCounts, csv: impl IntoIterator<Item = &'a PathBuf>) {
    field("Inserted", counts.inserted);
    field("Updated", counts.updated);
    if counts.skipped > 0 {
        field("Skipped", counts.skipped);
    } else {
        field("Skipped", muted(0));
    }
    for path in csv {
        field("CSV", path.display());
    }
}

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Spinner on stderr; hidden in JSON or quiet mode.
#[must_use]
pub fn spinner(message: &str) -> ProgressBar {
    let config = current();
    let pb = if config.json || config.quiet {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner()
            .tick_strings(TICKS)
            .template("  {spinner:.cyan} {msg}")
        {
            pb.set_style(style);
        }
        pb.enable_steady_tick(Duration::from_millis(80));
        pb
    };
    pb.set_message(message.to_string());
    pb
}

pub fn spinner_success(pb: &ProgressBar, message: &str) {
    if pb.is_hidden() {
        pb.finish_and_clear();
    } else {
        pb.finish_with_message(format!("{} {}", "✓".green(), message));
    }
}

pub fn spinner_fail(pb: &ProgressBar, message: &str) {
    if pb.is_hidden() {
        pb.finish_and_clear();
    } else {
        pb.finish_with_message(format!("{} {}", "×".red(), message));
    }
}

/// Dimmed text; plain in JSON mode.
#[must_use]
pub fn muted(value: impl Display) -> String {
    let value = value.to_string();
    if is_json() {
        value
    } else {
        value.dimmed().to_string()
    }
}

/// Points difference with an explicit `+`, colored by sign outside JSON mode.
#[must_use]
pub fn signed(value: i32) -> String {
    let text = if value > 0 {
        format!("+{value}")
    } else {
        value.to_string()
    };
    match value.signum() {
        _ if is_json() => text,
        1 => text.green().to_string(),
        -1 => text.red().to_string(),
        _ => text,
    }
}
