use dbs_history::task_data::{build_tree, DataNode, DataValue};
use leptos::prelude::*;
use serde_json::Value;

/// Nested key/value rendering of a task's data payload.
#[component]
pub fn TaskDataTree(data: Value) -> impl IntoView {
    let nodes = build_tree(&data);
    view! { <div class="task-data-tree">{render_nodes(nodes)}</div> }
}

// Boxed so the recursion has a nameable type.
fn render_nodes(nodes: Vec<DataNode>) -> AnyView {
    view! {
        <ul class="task-data-list">
            {nodes.into_iter().map(render_node).collect_view()}
        </ul>
    }
    .into_any()
}

fn render_node(node: DataNode) -> AnyView {
    let key = node
        .key
        .map(|k| view! { <span class="task-data-key">{format!("{k}: ")}</span> });
    match node.value {
        DataValue::Leaf(text) => view! {
            <li class="task-data-leaf">
                {key}
                <span class="task-data-value">{text}</span>
            </li>
        }
        .into_any(),
        DataValue::Branch(children) => view! {
            <li class="task-data-branch">
                {key}
                {render_nodes(children)}
            </li>
        }
        .into_any(),
    }
}
