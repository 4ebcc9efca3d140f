//! Tree form of the free-form task data attached to an execution.

use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub struct DataNode {
    /// Object key, `[i]` for array elements, `None` for a bare top-level scalar.
    pub key: Option<String>,
    pub value: DataValue,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DataValue {
    Leaf(String),
    Branch(Vec<DataNode>),
}

/// Flatten arbitrary JSON into keyed nodes. Objects keep serde_json's key
/// order, arrays are keyed by index. Empty containers become `{}` / `[]` leaves.
pub fn build_tree(value: &Value) -> Vec<DataNode> {
    match value {
        Value::Object(map) => map
            .iter()
            .map(|(key, child)| node(Some(key.clone()), child))
            .collect(),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(idx, child)| node(Some(format!("[{idx}]")), child))
            .collect(),
        scalar => vec![node(None, scalar)],
    }
}

fn node(key: Option<String>, value: &Value) -> DataNode {
    let value = match value {
        Value::Object(map) if map.is_empty() => DataValue::Leaf("{}".to_string()),
        Value::Array(items) if items.is_empty() => DataValue::Leaf("[]".to_string()),
        Value::Object(_) | Value::Array(_) => DataValue::Branch(build_tree(value)),
        Value::String(text) => DataValue::Leaf(text.clone()),
        other => DataValue::Leaf(other.to_string()),
    };
    DataNode { key, value }
}

/// Plain-text lines for a tree, two spaces of indent per level.
pub fn render_lines(nodes: &[DataNode]) -> Vec<String> {
    let mut lines = Vec::new();
    push_lines(nodes, 0, &mut lines);
    lines
}

fn push_lines(nodes: &[DataNode], depth: usize, out: &mut Vec<String>) {
    let indent = "  ".repeat(depth);
    for node in nodes {
        match (&node.key, &node.value) {
            (Some(key), DataValue::Leaf(text)) => out.push(format!("{indent}{key}: {text}")),
            (None, DataValue::Leaf(text)) => out.push(format!("{indent}{text}")),
            (key, DataValue::Branch(children)) => {
                out.push(format!("{indent}{}:", key.as_deref().unwrap_or("-")));
                push_lines(children, depth + 1, out);
            }
        }
    }
}
