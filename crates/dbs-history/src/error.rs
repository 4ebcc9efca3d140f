use thiserror::Error;

/// Why a log fetch did not produce messages.
///
/// The lifecycle controller absorbs every variant: a failed fetch displays
/// exactly like a fetch that returned no messages.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("network: {0}")]
    Network(String),
    #[error("unexpected HTTP status {0}")]
    Status(u16),
    #[error("decode: {0}")]
    Decode(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("parse: {0}")]
    Parse(String),
    #[error("serialize: {0}")]
    Serialize(String),
    #[error("validation: {0}")]
    Validation(String),
}
