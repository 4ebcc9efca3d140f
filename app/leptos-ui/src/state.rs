use dbs_history::config::HistoryViewConfig;
use leptos::prelude::*;

/// Shared settings for every history row under this context.
#[derive(Clone)]
pub struct ViewState {
    pub config: HistoryViewConfig,
}

pub fn provide_view_config(config: HistoryViewConfig) {
    provide_context(ViewState { config });
}

/// Settings from context, or defaults when no ancestor provided any.
pub fn use_view_config() -> HistoryViewConfig {
    use_context::<ViewState>()
        .map(|state| state.config)
        .unwrap_or_default()
}

/// Parse a TOML config, falling back to defaults with a console warning.
pub fn config_from_toml(text: &str) -> HistoryViewConfig {
    match HistoryViewConfig::from_toml_str(text) {
        Ok(config) => config,
        Err(e) => {
            web_sys::console::warn_1(
                &format!("Invalid history view config, using defaults: {e}").into(),
            );
            HistoryViewConfig::default()
        }
    }
}
