//! Classify nested key/value trees into map-like and list-like nodes, and
//! rewrite them with a visitor that can keep, replace, or delete every
//! map-like node it is shown.
//!
//! ```
//! use json_rewrite::{walk, Node, Visit};
//! use serde_json::json;
//!
//! let tree = Node::from_json(json!({"a": {"drop": true}, "b": [{"drop": false}]}));
//! let out = walk(tree, |node, _path| {
//!     if node.get(&"drop".into()) == Some(&Node::from(true)) {
//!         Visit::Delete
//!     } else {
//!         Visit::descend(node)
//!     }
//! })
//! .unwrap();
//! assert_eq!(Node::Table(out).into_json(), json!({"b": [{"drop": false}]}));
//! ```
pub mod classify;
pub mod error;
pub mod flatten;
pub mod jq_exec;
pub mod node;
pub mod path;
pub mod path_de;
pub mod path_walk;
pub mod rewrite;
pub mod rules;

pub use classify::{is_map_like, survey, Shape, ShapeEntry};
pub use error::{Error, Result};
pub use flatten::to_node;
pub use node::{Key, Node, Scalar, Table};
pub use path::Path;
pub use path_de::from_node;
pub use path_walk::{try_walk_path, walk_path};
pub use rewrite::{try_walk, try_walk_table, walk, walk_table, Visit};
