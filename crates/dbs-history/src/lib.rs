//! Core of the task-execution history row: the log-fetch lifecycle and the
//! pure derivation of what the row shows.
//!
//! Nothing here depends on a UI framework. Hosts hand the controller a
//! [`LogFetcher`](fetcher::LogFetcher) and a snapshot sink, spawn the cycle
//! futures it returns, and feed snapshots into [`view::HistoryRowView::derive`].

pub mod config;
pub mod controller;
pub mod cycle;
pub mod error;
pub mod fetcher;
pub mod task_data;
pub mod view;

pub use dbs_api_types::{ExecutionKey, LogLevel, LogMessage};
