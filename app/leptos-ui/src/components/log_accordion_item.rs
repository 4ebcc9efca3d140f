use std::cell::RefCell;
use std::rc::Rc;

use dbs_api_types::ExecutionKey;
use dbs_history::controller::{LogCycleController, LogSnapshot};
use dbs_history::fetcher::LogFetcher;
use dbs_history::view::{HistoryRowView, LogBody, LogLine, Severity};
use leptos::prelude::*;
use send_wrapper::SendWrapper;
use serde_json::Value;
use wasm_bindgen_futures::spawn_local;

use crate::api::HttpLogFetcher;
use crate::components::spinner::Spinner;
use crate::components::task_data_tree::TaskDataTree;
use crate::state::use_view_config;

fn level_class(severity: Severity) -> &'static str {
    match severity {
        Severity::Error => "log-level log-level-error",
        Severity::Warn => "log-level log-level-warn",
        Severity::Normal => "log-level log-level-info",
    }
}

/// Expanded panel of one execution in the history list: stack trace, task
/// data and the execution's log messages, fetched when the panel mounts and
/// again whenever the execution identity changes.
#[component]
pub fn LogAccordionItem(
    #[prop(optional, into)] stack_trace: MaybeProp<String>,
    #[prop(optional, into)] task_data: MaybeProp<Value>,
    #[prop(into)] task_name: Signal<String>,
    #[prop(into)] task_instance: Signal<String>,
    #[prop(into)] execution_time: Signal<String>,
    /// Overrides the HTTP fetcher built from the context config.
    #[prop(optional)]
    fetcher: Option<Rc<dyn LogFetcher>>,
) -> impl IntoView {
    let config = use_view_config();
    let fetcher: Rc<dyn LogFetcher> =
        fetcher.unwrap_or_else(|| Rc::new(HttpLogFetcher::new(config.api.clone())));

    let (snapshot, set_snapshot) = signal(LogSnapshot::default());
    let controller = Rc::new(RefCell::new(LogCycleController::new(
        fetcher,
        move |next| set_snapshot.set(next),
    )));

    // Re-key on every identity change; the controller skips unchanged keys.
    // Rc is not Send+Sync; SendWrapper is fine because WASM is single-threaded.
    let effect_controller = SendWrapper::new(Rc::clone(&controller));
    Effect::new(move |_| {
        let key = ExecutionKey::new(task_name.get(), task_instance.get(), execution_time.get());
        let cycle = effect_controller.borrow_mut().set_key(key);
        if let Some(cycle) = cycle {
            spawn_local(cycle);
        }
    });

    let cleanup_controller = SendWrapper::new(controller);
    on_cleanup(move || cleanup_controller.borrow_mut().unmount());

    let row = Memo::new(move |_| {
        let stack_trace = stack_trace.get();
        let task_data = task_data.get();
        snapshot.with(|snap| {
            HistoryRowView::derive(stack_trace.as_deref(), task_data.as_ref(), snap)
        })
    });

    let labels = config.labels;
    let stack_trace_label = labels.stack_trace;
    let task_data_label = labels.task_data;
    let loading_label = labels.loading;
    let no_logs_label = labels.no_logs;

    view! {
        <div class="log-accordion-panel">
            <div class="log-accordion-body">
                {move || {
                    row.with(|r| r.stack_trace.clone())
                        .map(|trace| {
                            view! {
                                <p class="log-section-label">{stack_trace_label.clone()}</p>
                                <pre class="log-stack-trace">{trace}</pre>
                                <hr class="log-section-divider" />
                            }
                        })
                }}
                {move || {
                    row.with(|r| r.task_data.clone())
                        .map(|data| {
                            view! {
                                <p class="log-section-label">{task_data_label.clone()}</p>
                                <TaskDataTree data=data />
                                <hr class="log-section-divider" />
                            }
                        })
                }}
                <p class="log-section-label">{labels.execution_logs}</p>
                {move || match row.with(|r| r.logs.clone()) {
                    LogBody::Loading => {
                        let label = loading_label.clone();
                        view! { <Spinner size="sm" label=label /> }.into_any()
                    }
                    LogBody::Populated(lines) => {
                        view! {
                            <div class="log-lines">
                                {lines
                                    .into_iter()
                                    .map(|line| view! { <LogLineRow line=line /> })
                                    .collect_view()}
                            </div>
                        }
                            .into_any()
                    }
                    LogBody::Empty => {
                        view! { <p class="log-empty">{no_logs_label.clone()}</p> }.into_any()
                    }
                }}
            </div>
        </div>
    }
}

#[component]
fn LogLineRow(line: LogLine) -> impl IntoView {
    let level_cls = level_class(line.severity);
    view! {
        <p class="log-line">
            <span class="log-timestamp">{format!("[{}]", line.timestamp)}</span>
            " "
            <span class=level_cls>{line.level}</span>
            {format!(" - {}", line.message)}
        </p>
    }
}
