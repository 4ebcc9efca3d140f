use leptos::prelude::*;

pub mod api;
pub mod components;
pub mod state;

use components::log_accordion_item::LogAccordionItem;
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
}

/// Mount one history row at the end of the page body, for hosts that are not
/// themselves Leptos apps. `task_data_json` must be a JSON document when
/// given; `config_toml` overrides the default view config.
#[wasm_bindgen]
pub fn mount_history_row(
    stack_trace: Option<String>,
    task_data_json: Option<String>,
    task_name: String,
    task_instance: String,
    execution_time: String,
    config_toml: Option<String>,
) {
    let task_data = task_data_json.and_then(|raw| {
        match serde_json::from_str::<serde_json::Value>(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                web_sys::console::warn_1(&format!("Ignoring malformed task data: {e}").into());
                None
            }
        }
    });
    let config = config_toml
        .as_deref()
        .map(state::config_from_toml)
        .unwrap_or_default();

    leptos::mount::mount_to_body(move || {
        state::provide_view_config(config);
        view! {
            <LogAccordionItem
                stack_trace=stack_trace
                task_data=task_data
                task_name=task_name
                task_instance=task_instance
                execution_time=execution_time
            />
        }
    });
}
