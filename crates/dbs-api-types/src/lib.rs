//! Shared API types for the db-scheduler history views.
//!
//! These mirror the JSON the scheduler backend returns for execution log
//! messages, plus the identity triple used to request them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ── Log level ──

/// Severity token attached to a log message.
///
/// Only the exact upper-case tokens map to the named variants. Anything else,
/// including `"warning"` or `"Info"`, is kept verbatim in [`LogLevel::Other`]
/// so the token is displayed as received.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    Other(String),
}

impl LogLevel {
    pub fn as_str(&self) -> &str {
        match self {
            LogLevel::Trace => "TRACE",
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
            LogLevel::Other(token) => token,
        }
    }
}

impl From<String> for LogLevel {
    fn from(token: String) -> Self {
        match token.as_str() {
            "TRACE" => LogLevel::Trace,
            "DEBUG" => LogLevel::Debug,
            "INFO" => LogLevel::Info,
            "WARN" => LogLevel::Warn,
            "ERROR" => LogLevel::Error,
            _ => LogLevel::Other(token),
        }
    }
}

impl From<&str> for LogLevel {
    fn from(token: &str) -> Self {
        LogLevel::from(token.to_string())
    }
}

impl From<LogLevel> for String {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Other(token) => token,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Log message ──

/// One execution log line as returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogMessage {
    #[serde(deserialize_with = "time_logged::deserialize")]
    pub time_logged: DateTime<Utc>,
    pub log_level: LogLevel,
    #[serde(default)]
    pub log_message: String,
}

impl LogMessage {
    pub fn new(
        time_logged: DateTime<Utc>,
        log_level: impl Into<LogLevel>,
        log_message: impl Into<String>,
    ) -> Self {
        Self {
            time_logged,
            log_level: log_level.into(),
            log_message: log_message.into(),
        }
    }
}

/// `timeLogged` arrives as integer epoch milliseconds, as decimal epoch
/// seconds (Jackson's `Instant` form, e.g. `1709294400.123`), or as an ISO
/// date-time string. Zone-less strings are taken as UTC. Decimal seconds are
/// kept to millisecond precision.
mod time_logged {
    use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
    use serde::{de, Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawTimestamp {
        Millis(i64),
        Seconds(f64),
        Text(String),
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match RawTimestamp::deserialize(deserializer)? {
            RawTimestamp::Millis(ms) => Utc
                .timestamp_millis_opt(ms)
                .single()
                .ok_or_else(|| de::Error::custom(format!("timeLogged out of range: {ms}"))),
            RawTimestamp::Seconds(secs) => from_decimal_seconds(secs).map_err(de::Error::custom),
            RawTimestamp::Text(text) => parse_text(&text).map_err(de::Error::custom),
        }
    }

    fn from_decimal_seconds(secs: f64) -> Result<DateTime<Utc>, String> {
        let millis = (secs * 1000.0).round();
        if !millis.is_finite() || millis.abs() > i64::MAX as f64 {
            return Err(format!("timeLogged out of range: {secs}"));
        }
        Utc.timestamp_millis_opt(millis as i64)
            .single()
            .ok_or_else(|| format!("timeLogged out of range: {secs}"))
    }

    fn parse_text(text: &str) -> Result<DateTime<Utc>, String> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
            return Ok(dt.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
            .map(|naive| naive.and_utc())
            .map_err(|e| format!("invalid timeLogged {text:?}: {e}"))
    }
}

// ── Execution identity ──

/// The (task name, task instance, execution time) triple that identifies
/// which execution's logs to fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionKey {
    #[serde(default)]
    pub task_name: String,
    #[serde(default)]
    pub task_instance: String,
    #[serde(default)]
    pub execution_time: String,
}

impl ExecutionKey {
    pub fn new(
        task_name: impl Into<String>,
        task_instance: impl Into<String>,
        execution_time: impl Into<String>,
    ) -> Self {
        Self {
            task_name: task_name.into(),
            task_instance: task_instance.into(),
            execution_time: execution_time.into(),
        }
    }

    /// Build a key from possibly-absent parts; absent parts become empty.
    pub fn from_parts(
        task_name: Option<&str>,
        task_instance: Option<&str>,
        execution_time: Option<&str>,
    ) -> Self {
        Self::new(
            task_name.unwrap_or_default(),
            task_instance.unwrap_or_default(),
            execution_time.unwrap_or_default(),
        )
    }

    /// True when every part is present, i.e. logs can be requested.
    pub fn is_complete(&self) -> bool {
        !self.task_name.is_empty()
            && !self.task_instance.is_empty()
            && !self.execution_time.is_empty()
    }
}
