//! Map-like vs list-like classification.
//!
//! Never cached: the answer is recomputed from the key set on each call, so a
//! list with a removed element reads as map-like afterwards.
use std::fmt;
use crate::node::{Key, Node, Table};
use crate::path::Path;

/// `false` for scalars; for tables see [`table_is_map_like`].
pub fn is_map_like(node: &Node) -> bool {
    match node {
        Node::Table(table) => table_is_map_like(table),
        Node::Scalar(_) => false,
    }
}

/// A table is list-like only when its keys, in stored order, are exactly
/// `0, 1, …, len-1`.
///
/// An empty table is map-like. That mirrors the long-standing behavior callers
/// depend on and is pinned by tests.
pub fn table_is_map_like(table: &Table) -> bool {
    if table.is_empty() {
        return true;
    }
    !table
        .keys()
        .enumerate()
        .all(|(position, key)| matches!(key, Key::Index(index) if *index == position as i64))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Scalar,
    Map,
    List,
}

impl Shape {
    pub fn of(node: &Node) -> Self {
        match node {
            Node::Scalar(_) => Shape::Scalar,
            Node::Table(table) if table_is_map_like(table) => Shape::Map,
            Node::Table(_) => Shape::List,
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Shape::Scalar => "scalar",
            Shape::Map => "map",
            Shape::List => "list",
        })
    }
}

/// One composite node found by [`survey`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeEntry {
    pub path: Path,
    pub shape: Shape,
    pub len: usize,
}

/// Depth-first, key-ordered listing of every table in the tree, root first.
pub fn survey(root: &Node) -> Vec<ShapeEntry> {
    fn go(node: &Node, path: &mut Path, out: &mut Vec<ShapeEntry>) {
        let Node::Table(table) = node else { return };
        out.push(ShapeEntry { path: path.clone(), shape: Shape::of(node), len: table.len() });
        for (key, child) in table {
            path.push(key.clone());
            go(child, path, out);
            path.pop();
        }
    }
    let mut out = Vec::new();
    go(root, &mut Path::new(), &mut out);
    out
}
