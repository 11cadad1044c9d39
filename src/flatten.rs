//! Deep conversion between foreign structures and [`Node`] trees.
//!
//! Every composite level becomes a [`Table`]: arrays are keyed by position,
//! objects by name (canonical integer names are read as positions, so
//! `{"0": a, "1": b}` and `[a, b]` end up identical). Scalar leaves pass
//! through untouched. Nothing here decides map vs list; that is left to
//! [`crate::classify`] at walk time.
use serde::Serialize;
use serde_json::{Map, Value};
use crate::error::Result;
use crate::node::{Key, Node, Scalar, Table};

impl Node {
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Null => Node::Scalar(Scalar::Null),
            Value::Bool(b) => Node::Scalar(Scalar::Bool(b)),
            Value::Number(n) => Node::Scalar(Scalar::Number(n)),
            Value::String(s) => Node::Scalar(Scalar::String(s)),
            Value::Array(items) => Node::Table(Table::list(items.into_iter().map(Node::from_json))),
            Value::Object(map) => Node::Table(
                map.into_iter()
                    .map(|(name, value)| (Key::from(name), Node::from_json(value)))
                    .collect(),
            ),
        }
    }

    /// List-like tables render as arrays, everything else as objects with
    /// stringified keys. An empty table renders as `[]`.
    pub fn into_json(self) -> Value {
        match self {
            Node::Scalar(Scalar::Null) => Value::Null,
            Node::Scalar(Scalar::Bool(b)) => Value::Bool(b),
            Node::Scalar(Scalar::Number(n)) => Value::Number(n),
            Node::Scalar(Scalar::String(s)) => Value::String(s),
            Node::Table(table) if table.is_empty() => Value::Array(Vec::new()),
            Node::Table(table) if !table.is_map_like() => {
                Value::Array(table.into_iter().map(|(_, node)| node.into_json()).collect())
            }
            Node::Table(table) => {
                let mut map = Map::with_capacity(table.len());
                for (key, node) in table {
                    map.insert(key.to_string(), node.into_json());
                }
                Value::Object(map)
            }
        }
    }
}

impl From<Value> for Node {
    fn from(value: Value) -> Self { Node::from_json(value) }
}

impl From<Node> for Value {
    fn from(node: Node) -> Self { node.into_json() }
}

/// Flatten any serializable value into a tree.
pub fn to_node<T: Serialize + ?Sized>(value: &T) -> Result<Node> {
    Ok(Node::from_json(serde_json::to_value(value)?))
}
