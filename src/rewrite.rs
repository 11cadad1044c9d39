//! Recursive walk-and-substitute over map-like nodes.
//!
//! The visitor sees every map-like table below the root, depth-first in
//! stored key order, together with the exact key path leading to it. List-like
//! tables are walked through without being shown to the visitor, so map-like
//! nodes nested in lists are still reached.
//!
//! There is no cycle detection. Owned trees cannot alias, but a very deep
//! tree can still exhaust the stack; bounding depth is up to the caller.
use std::convert::Infallible;
use tracing::{debug, trace};
use crate::error::{Error, Result};
use crate::node::{Node, Table};
use crate::path::Path;

/// What the visitor wants done with the node it was handed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Visit {
    /// Keep this node. A table is walked (it, not the original, gets its
    /// map-like descendants visited); a scalar is stored as is.
    Keep(Node),
    /// Remove the key from its parent, along with everything below it.
    Delete,
    /// Store this node without walking into it.
    ReplaceRaw(Node),
}

impl Visit {
    /// Keep the visited table and continue into it.
    pub fn descend(table: Table) -> Self { Visit::Keep(Node::Table(table)) }
}

/// Per-key decision after classification and the visitor have had their say.
enum Step {
    Descend(Table),
    Store(Node),
    Remove,
}

impl From<Visit> for Step {
    fn from(visit: Visit) -> Self {
        match visit {
            Visit::Keep(Node::Table(table)) => Step::Descend(table),
            Visit::Keep(node) | Visit::ReplaceRaw(node) => Step::Store(node),
            Visit::Delete => Step::Remove,
        }
    }
}

#[derive(Debug, Default)]
struct Counters {
    visited: usize,
    stored: usize,
    deleted: usize,
}

// ————————————————————————————————————————————————————————————————————————————
// ENTRY POINTS
// ————————————————————————————————————————————————————————————————————————————

/// Walk `tree`, calling `visitor` on every map-like node below the root.
///
/// Fails with [`Error::NotComposite`] when the root is a scalar.
pub fn walk<F>(tree: Node, mut visitor: F) -> Result<Table>
where
    F: FnMut(Table, &Path) -> Visit,
{
    try_walk(tree, |node, path| Ok::<_, Error>(visitor(node, path)))
}

/// [`walk`] for a root that is already known to be a table.
pub fn walk_table<F>(tree: Table, mut visitor: F) -> Table
where
    F: FnMut(Table, &Path) -> Visit,
{
    match try_walk_table(tree, |node, path| Ok::<_, Infallible>(visitor(node, path))) {
        Ok(table) => table,
        Err(never) => match never {},
    }
}

/// [`walk`] with a fallible visitor. The first visitor error aborts the walk
/// and is returned as is; nothing of the partial result survives.
pub fn try_walk<F, E>(tree: Node, visitor: F) -> Result<Table, E>
where
    F: FnMut(Table, &Path) -> Result<Visit, E>,
    E: From<Error>,
{
    match tree {
        Node::Table(table) => try_walk_table(table, visitor),
        Node::Scalar(scalar) => Err(Error::NotComposite { found: scalar.kind_name() }.into()),
    }
}

pub fn try_walk_table<F, E>(tree: Table, mut visitor: F) -> Result<Table, E>
where
    F: FnMut(Table, &Path) -> Result<Visit, E>,
{
    let mut path = Path::new();
    let mut counters = Counters::default();
    debug!(keys = tree.len(), "walk started");
    let out = walk_level(tree, &mut visitor, &mut path, &mut counters)?;
    debug!(
        visited = counters.visited,
        stored = counters.stored,
        deleted = counters.deleted,
        "walk finished"
    );
    Ok(out)
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNALS
// ————————————————————————————————————————————————————————————————————————————

fn walk_level<F, E>(
    table: Table,
    visitor: &mut F,
    path: &mut Path,
    counters: &mut Counters,
) -> Result<Table, E>
where
    F: FnMut(Table, &Path) -> Result<Visit, E>,
{
    let mut out = Table::with_capacity(table.len());
    for (key, child) in table {
        path.push(key.clone());
        let rewritten = rewrite_child(child, visitor, path, counters);
        path.pop();
        if let Some(node) = rewritten? {
            out.insert(key, node);
        }
    }
    Ok(out)
}

/// `None` means the key is dropped from the parent.
fn rewrite_child<F, E>(
    child: Node,
    visitor: &mut F,
    path: &mut Path,
    counters: &mut Counters,
) -> Result<Option<Node>, E>
where
    F: FnMut(Table, &Path) -> Result<Visit, E>,
{
    let table = match child {
        Node::Table(table) => table,
        scalar => return Ok(Some(scalar)),
    };

    let step = if table.is_map_like() {
        counters.visited += 1;
        trace!(path = %path, keys = table.len(), "visiting map-like node");
        Step::from(visitor(table, &*path)?)
    } else {
        Step::Descend(table)
    };

    match step {
        Step::Descend(table) => Ok(Some(Node::Table(walk_level(table, visitor, path, counters)?))),
        Step::Store(node) => {
            counters.stored += 1;
            Ok(Some(node))
        }
        Step::Remove => {
            counters.deleted += 1;
            trace!(path = %path, "node deleted");
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{Key, Scalar};
    use serde_json::json;

    fn tree(value: serde_json::Value) -> Node { Node::from_json(value) }

    fn render(table: Table) -> serde_json::Value { Node::Table(table).into_json() }

    #[test]
    fn scalar_root_is_rejected() {
        let err = walk(Node::from(3), |t, _| Visit::descend(t)).unwrap_err();
        assert!(matches!(err, Error::NotComposite { found: "number" }));
    }

    #[test]
    fn root_itself_is_never_visited() {
        let mut seen = Vec::new();
        walk(tree(json!({"a": 1})), |t, p| {
            seen.push(p.to_string());
            Visit::descend(t)
        })
        .unwrap();
        assert!(seen.is_empty());
    }

    #[test]
    fn paths_are_the_ancestor_chain() {
        let mut seen = Vec::new();
        walk(tree(json!({"a": {"b": {"c": 1}}})), |t, p| {
            seen.push(p.keys().to_vec());
            Visit::descend(t)
        })
        .unwrap();
        assert_eq!(
            seen,
            vec![
                vec![Key::from("a")],
                vec![Key::from("a"), Key::from("b")],
            ]
        );
    }

    #[test]
    fn multiplies_direct_children_in_maps_and_lists() {
        let input = tree(json!({"x": {"y": 1, "z": 2}, "list": [{"k": 1}, {"k": 2}]}));
        let mut seen = Vec::new();
        let out = walk(input, |mut t, p| {
            seen.push(p.to_string());
            for (_, child) in t.iter_mut() {
                let scaled = match child {
                    Node::Scalar(Scalar::Number(n)) => n.as_i64().map(|i| i * 10),
                    _ => None,
                };
                if let Some(value) = scaled {
                    *child = Node::from(value);
                }
            }
            Visit::descend(t)
        })
        .unwrap();
        assert_eq!(seen, vec!["/x", "/list/0", "/list/1"]);
        assert_eq!(
            render(out),
            json!({"x": {"y": 10, "z": 20}, "list": [{"k": 10}, {"k": 20}]})
        );
    }

    #[test]
    fn delete_removes_key_structurally() {
        let out = walk(tree(json!({"keep": 1, "gone": {"a": 1}, "l": [{"a": 1}, 5]})), |_, _| {
            Visit::Delete
        })
        .unwrap();
        // the hole left at index 0 turns the list into a map
        assert_eq!(render(out), json!({"keep": 1, "l": {"1": 5}}));
    }

    #[test]
    fn deleted_subtree_is_not_visited() {
        let mut count = 0;
        walk(tree(json!({"a": {"b": {"c": {}}}})), |_, _| {
            count += 1;
            Visit::Delete
        })
        .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn keep_walks_the_returned_table_not_the_original() {
        let mut seen = Vec::new();
        let out = walk(tree(json!({"a": {"old": {"x": 1}}})), |t, p| {
            seen.push(p.to_string());
            if p.len() == 1 {
                Visit::Keep(tree(json!({"new": {"y": 2}})))
            } else {
                Visit::descend(t)
            }
        })
        .unwrap();
        assert_eq!(seen, vec!["/a", "/a/new"]);
        assert_eq!(render(out), json!({"a": {"new": {"y": 2}}}));
    }

    #[test]
    fn replace_raw_stops_descent() {
        let mut seen = Vec::new();
        let out = walk(tree(json!({"a": {"b": {"c": 1}}})), |t, p| {
            seen.push(p.to_string());
            Visit::ReplaceRaw(Node::Table(t))
        })
        .unwrap();
        assert_eq!(seen, vec!["/a"]);
        assert_eq!(render(out), json!({"a": {"b": {"c": 1}}}));
    }

    #[test]
    fn scalar_replacement_is_stored_as_is() {
        let out = walk(tree(json!({"a": {"b": 1}, "c": [{"d": 2}]})), |_, _| Visit::Keep(Node::from("x")))
            .unwrap();
        assert_eq!(render(out), json!({"a": "x", "c": ["x"]}));
    }

    #[test]
    fn empty_tables_are_visited_as_maps() {
        let mut seen = Vec::new();
        walk(tree(json!({"a": [], "b": {}})), |t, p| {
            seen.push(p.to_string());
            Visit::descend(t)
        })
        .unwrap();
        assert_eq!(seen, vec!["/a", "/b"]);
    }

    #[test]
    fn visitor_error_aborts_the_walk() {
        let mut count = 0;
        let result: Result<Table, Error> = try_walk(tree(json!({"a": {}, "b": {}, "c": {}})), |_, p| {
            count += 1;
            if p.to_string() == "/b" {
                Err(Error::Jq("boom".into()))
            } else {
                Ok(Visit::Delete)
            }
        });
        assert!(matches!(result, Err(Error::Jq(_))));
        assert_eq!(count, 2);
    }

    #[test]
    fn walk_table_needs_no_error_handling() {
        let input = Table::list([tree(json!({"a": 1}))]);
        let out = walk_table(input, |_, _| Visit::Delete);
        assert!(out.is_empty());
    }
}
