use dbs_api_types::ExecutionKey;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Settings for the history row: where logs come from and how sections are
/// labelled. Every field has a default, so a partial TOML document is fine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct HistoryViewConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub labels: LabelConfig,
}

impl HistoryViewConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let cfg: HistoryViewConfig =
            toml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        self.validate()?;
        toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.api.validate()?;
        self.labels.validate()?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Section structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_log_messages_path")]
    pub log_messages_path: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            log_messages_path: default_log_messages_path(),
        }
    }
}

impl ApiConfig {
    /// Full URL for one execution's log messages.
    pub fn log_messages_url(&self, key: &ExecutionKey) -> String {
        format!(
            "{}{}?taskName={}&taskInstance={}&executionTime={}",
            self.base_url.trim_end_matches('/'),
            self.log_messages_path,
            urlencoding::encode(&key.task_name),
            urlencoding::encode(&key.task_instance),
            urlencoding::encode(&key.execution_time),
        )
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let host = self
            .base_url
            .strip_prefix("http://")
            .or_else(|| self.base_url.strip_prefix("https://"))
            .and_then(|rest| rest.split(['/', '?', '#']).next())
            .unwrap_or_default();
        if host.is_empty() {
            return Err(ConfigError::Validation(format!(
                "api.base_url must be an http(s) URL with a host, got {:?}",
                self.base_url
            )));
        }
        if !self.log_messages_path.starts_with('/') {
            return Err(ConfigError::Validation(format!(
                "api.log_messages_path must start with '/', got {:?}",
                self.log_messages_path
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelConfig {
    #[serde(default = "default_stack_trace_label")]
    pub stack_trace: String,
    #[serde(default = "default_task_data_label")]
    pub task_data: String,
    #[serde(default = "default_execution_logs_label")]
    pub execution_logs: String,
    #[serde(default = "default_loading_label")]
    pub loading: String,
    #[serde(default = "default_no_logs_label")]
    pub no_logs: String,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            stack_trace: default_stack_trace_label(),
            task_data: default_task_data_label(),
            execution_logs: default_execution_logs_label(),
            loading: default_loading_label(),
            no_logs: default_no_logs_label(),
        }
    }
}

impl LabelConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        let labels = [
            ("stack_trace", &self.stack_trace),
            ("task_data", &self.task_data),
            ("execution_logs", &self.execution_logs),
            ("loading", &self.loading),
            ("no_logs", &self.no_logs),
        ];
        for (name, value) in labels {
            if value.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "labels.{name} must not be empty"
                )));
            }
        }
        Ok(())
    }
}

fn default_base_url() -> String {
    "http://localhost:8081".to_string()
}

fn default_log_messages_path() -> String {
    "/db-scheduler-api/logs/messages".to_string()
}

fn default_stack_trace_label() -> String {
    "Stacktrace".to_string()
}

fn default_task_data_label() -> String {
    "Taskdata".to_string()
}

fn default_execution_logs_label() -> String {
    "Execution Logs".to_string()
}

fn default_loading_label() -> String {
    "Loading execution logs...".to_string()
}

fn default_no_logs_label() -> String {
    "No execution logs found.".to_string()
}
