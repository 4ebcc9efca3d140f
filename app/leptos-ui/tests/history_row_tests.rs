// =============================================================================
// history_row_tests.rs - browser tests for the execution-log accordion panel
//
// Mounts LogAccordionItem with in-memory fetchers and inspects the DOM.
//
// Run with:
//   cd app/leptos-ui && wasm-pack test --headless --chrome
// =============================================================================
#![cfg(target_arch = "wasm32")]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use chrono::{TimeZone, Utc};
use dbs_api_types::{ExecutionKey, LogMessage};
use dbs_history::error::FetchError;
use dbs_history::fetcher::{FetchResult, LogFetcher};
use dbs_leptos_ui::components::log_accordion_item::LogAccordionItem;
use futures::channel::oneshot;
use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn container() -> web_sys::HtmlElement {
    let document = web_sys::window().unwrap().document().unwrap();
    let el = document.create_element("div").unwrap();
    document.body().unwrap().append_child(&el).unwrap();
    el.unchecked_into()
}

fn boom() -> LogMessage {
    LogMessage::new(
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
        "ERROR",
        "boom",
    )
}

/// Let effects and spawned cycles run.
async fn settle() {
    for _ in 0..3 {
        TimeoutFuture::new(0).await;
    }
}

/// Pending fetches by task instance, answered by the test.
type Gates = Rc<RefCell<Vec<(String, oneshot::Sender<FetchResult>)>>>;

fn gated_fetcher() -> (Gates, Rc<dyn LogFetcher>) {
    let gates: Gates = Rc::default();
    let fetcher_gates = Rc::clone(&gates);
    let fetcher: Rc<dyn LogFetcher> = Rc::new(move |key: &ExecutionKey| {
        let (tx, rx) = oneshot::channel();
        fetcher_gates
            .borrow_mut()
            .push((key.task_instance.clone(), tx));
        async move {
            rx.await
                .unwrap_or_else(|_| Err(FetchError::Network("gate dropped".to_string())))
        }
    });
    (gates, fetcher)
}

fn open_gate(gates: &Gates, instance: &str, result: FetchResult) {
    let at = gates
        .borrow()
        .iter()
        .position(|(pending, _)| pending == instance)
        .expect("fetch for instance");
    let (_, tx) = gates.borrow_mut().remove(at);
    let _ = tx.send(result);
}

fn logged(text: &str) -> LogMessage {
    LogMessage::new(
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
        "INFO",
        text,
    )
}

fn text_of(el: &web_sys::HtmlElement) -> String {
    el.text_content().unwrap_or_default()
}

fn mount_row(
    root: &web_sys::HtmlElement,
    stack_trace: Option<String>,
    task_instance: &str,
    fetcher: Rc<dyn LogFetcher>,
) {
    let task_name = "send-report".to_string();
    let task_instance = task_instance.to_string();
    let execution_time = "2024-03-01T12:00:00Z".to_string();
    leptos::mount::mount_to(root.clone(), move || {
        view! {
            <LogAccordionItem
                stack_trace=stack_trace
                task_name=task_name
                task_instance=task_instance
                execution_time=execution_time
                fetcher=fetcher
            />
        }
    })
    .forget();
}

#[wasm_bindgen_test]
async fn shows_stack_trace_and_one_log_line() {
    let fetcher: Rc<dyn LogFetcher> =
        Rc::new(|_: &ExecutionKey| async { Ok::<_, FetchError>(vec![boom()]) });
    let root = container();
    mount_row(&root, Some("E1".to_string()), "42", fetcher);
    settle().await;

    let text = text_of(&root);
    assert!(text.contains("Stacktrace"));
    assert!(text.contains("E1"));
    assert!(!text.contains("Taskdata"));
    assert_eq!(text.matches("[2024-03-01T12:00:00.000Z] ERROR - boom").count(), 1);
    assert!(root.query_selector(".log-level-error").unwrap().is_some());
}

#[wasm_bindgen_test]
async fn failed_fetch_shows_placeholder() {
    let fetcher: Rc<dyn LogFetcher> = Rc::new(|_: &ExecutionKey| async {
        Err::<Vec<LogMessage>, _>(FetchError::Status(502))
    });
    let root = container();
    mount_row(&root, None, "42", fetcher);
    settle().await;

    assert!(text_of(&root).contains("No execution logs found."));
    assert!(root.query_selector(".spinner-container").unwrap().is_none());
}

#[wasm_bindgen_test]
async fn incomplete_key_never_fetches() {
    let calls = Rc::new(Cell::new(0usize));
    let fetcher_calls = Rc::clone(&calls);
    let fetcher: Rc<dyn LogFetcher> = Rc::new(move |_: &ExecutionKey| {
        fetcher_calls.set(fetcher_calls.get() + 1);
        async { Ok::<_, FetchError>(vec![boom()]) }
    });
    let root = container();
    mount_row(&root, None, "", fetcher);
    settle().await;

    assert_eq!(calls.get(), 0);
    assert!(text_of(&root).contains("No execution logs found."));
}

#[wasm_bindgen_test]
async fn pending_fetch_shows_spinner() {
    let fetcher: Rc<dyn LogFetcher> = Rc::new(|_: &ExecutionKey| {
        futures::future::pending::<Result<Vec<LogMessage>, FetchError>>()
    });
    let root = container();
    mount_row(&root, None, "42", fetcher);
    settle().await;

    assert!(root.query_selector(".spinner-container").unwrap().is_some());
    assert!(!text_of(&root).contains("No execution logs found."));
}

#[wasm_bindgen_test]
async fn changing_instance_mid_fetch_shows_only_the_new_logs() {
    let (gates, fetcher) = gated_fetcher();
    let task_instance = RwSignal::new("a".to_string());
    let task_name = "send-report".to_string();
    let execution_time = "2024-03-01T12:00:00Z".to_string();
    let root = container();
    leptos::mount::mount_to(root.clone(), move || {
        view! {
            <LogAccordionItem
                task_name=task_name
                task_instance=task_instance
                execution_time=execution_time
                fetcher=fetcher
            />
        }
    })
    .forget();
    settle().await;
    assert_eq!(gates.borrow().len(), 1);

    task_instance.set("b".to_string());
    settle().await;
    assert_eq!(gates.borrow().len(), 2);
    assert!(root.query_selector(".spinner-container").unwrap().is_some());

    open_gate(&gates, "b", Ok(vec![logged("from b")]));
    settle().await;
    open_gate(&gates, "a", Ok(vec![logged("from a")]));
    settle().await;

    let text = text_of(&root);
    assert!(text.contains("INFO - from b"));
    assert!(!text.contains("from a"));
}

#[wasm_bindgen_test]
async fn unmounting_mid_fetch_leaves_nothing_behind() {
    let (gates, fetcher) = gated_fetcher();
    let task_name = "send-report".to_string();
    let task_instance = "42".to_string();
    let execution_time = "2024-03-01T12:00:00Z".to_string();
    let root = container();
    let handle = leptos::mount::mount_to(root.clone(), move || {
        view! {
            <LogAccordionItem
                task_name=task_name
                task_instance=task_instance
                execution_time=execution_time
                fetcher=fetcher
            />
        }
    });
    settle().await;
    assert!(root.query_selector(".spinner-container").unwrap().is_some());

    drop(handle);
    settle().await;
    assert!(root.query_selector(".log-accordion-panel").unwrap().is_none());

    open_gate(&gates, "42", Ok(vec![logged("late")]));
    settle().await;
    assert!(!text_of(&root).contains("late"));
    assert!(root.query_selector(".log-accordion-panel").unwrap().is_none());
}
