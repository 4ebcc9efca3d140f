//! Pure derivation of what a history row shows from its inputs and the
//! current [`LogSnapshot`]. No side effects; the UI layer only maps the
//! result onto markup.

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use dbs_api_types::{LogLevel, LogMessage};
use serde_json::Value;

use crate::config::LabelConfig;
use crate::controller::LogSnapshot;
use crate::task_data;

/// Sections of a row, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    StackTrace,
    TaskData,
    ExecutionLogs,
}

/// Presentation tier of a log level. Carries no meaning beyond styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warn,
    Normal,
}

impl Severity {
    /// Tiers by the level token, ignoring case. `WARNING` counts as warn.
    pub fn of(level: &LogLevel) -> Self {
        match level {
            LogLevel::Error => Severity::Error,
            LogLevel::Warn => Severity::Warn,
            LogLevel::Other(token) if token.eq_ignore_ascii_case("error") => Severity::Error,
            LogLevel::Other(token)
                if token.eq_ignore_ascii_case("warn") || token.eq_ignore_ascii_case("warning") =>
            {
                Severity::Warn
            }
            _ => Severity::Normal,
        }
    }
}

/// One formatted log message: `[<timestamp>] <LEVEL> - <message>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    pub timestamp: String,
    pub level: String,
    pub severity: Severity,
    pub message: String,
}

impl From<&LogMessage> for LogLine {
    fn from(msg: &LogMessage) -> Self {
        Self {
            timestamp: format_timestamp(&msg.time_logged),
            level: msg.log_level.as_str().to_string(),
            severity: Severity::of(&msg.log_level),
            message: msg.log_message.clone(),
        }
    }
}

impl fmt::Display for LogLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} - {}", self.timestamp, self.level, self.message)
    }
}

/// ISO-8601 in UTC with millisecond precision, e.g. `2024-03-01T12:00:00.000Z`.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Body of the execution-logs section. Exactly one applies at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogBody {
    Loading,
    /// Never empty.
    Populated(Vec<LogLine>),
    Empty,
}

impl LogBody {
    pub fn from_snapshot(snapshot: &LogSnapshot) -> Self {
        if snapshot.loading {
            LogBody::Loading
        } else if snapshot.messages.is_empty() {
            LogBody::Empty
        } else {
            LogBody::Populated(snapshot.messages.iter().map(LogLine::from).collect())
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryRowView {
    pub stack_trace: Option<String>,
    pub task_data: Option<Value>,
    pub logs: LogBody,
}

impl HistoryRowView {
    pub fn derive(
        stack_trace: Option<&str>,
        task_data: Option<&Value>,
        snapshot: &LogSnapshot,
    ) -> Self {
        Self {
            stack_trace: stack_trace
                .filter(|trace| !trace.is_empty())
                .map(str::to_string),
            task_data: task_data.filter(|data| !data.is_null()).cloned(),
            logs: LogBody::from_snapshot(snapshot),
        }
    }

    /// Present sections in display order. The execution-logs section is
    /// always last and always present.
    pub fn sections(&self) -> Vec<Section> {
        let mut sections = Vec::with_capacity(3);
        if self.stack_trace.is_some() {
            sections.push(Section::StackTrace);
        }
        if self.task_data.is_some() {
            sections.push(Section::TaskData);
        }
        sections.push(Section::ExecutionLogs);
        sections
    }

    /// Plain-text rendering of the row, e.g. for copying to the clipboard.
    pub fn render_text(&self, labels: &LabelConfig) -> String {
        let mut out = Vec::new();
        for section in self.sections() {
            match section {
                Section::StackTrace => {
                    out.push(labels.stack_trace.clone());
                    out.push(self.stack_trace.clone().unwrap_or_default());
                    out.push(SEPARATOR.to_string());
                }
                Section::TaskData => {
                    out.push(labels.task_data.clone());
                    if let Some(data) = &self.task_data {
                        let tree = task_data::build_tree(data);
                        out.extend(
                            task_data::render_lines(&tree)
                                .into_iter()
                                .map(|line| format!("  {line}")),
                        );
                    }
                    out.push(SEPARATOR.to_string());
                }
                Section::ExecutionLogs => {
                    out.push(labels.execution_logs.clone());
                    match &self.logs {
                        LogBody::Loading => out.push(labels.loading.clone()),
                        LogBody::Populated(lines) => {
                            out.extend(lines.iter().map(LogLine::to_string))
                        }
                        LogBody::Empty => out.push(labels.no_logs.clone()),
                    }
                }
            }
        }
        out.join("\n")
    }
}

const SEPARATOR: &str = "---";
