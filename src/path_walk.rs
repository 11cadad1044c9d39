//! Transform the nodes along one explicit key path.
use tracing::debug;
use crate::error::{Error, Result};
use crate::node::{Key, Node, Table};
use crate::path::Path;

/// Apply `transform` to each node on `path`, root side first, writing every
/// result back into its parent. Siblings are never touched.
///
/// The step after `path[i]` descends into the *transformed* node, so a
/// transform may reshape what the next key is looked up in. An empty path
/// returns the tree unchanged.
pub fn walk_path<F>(tree: Table, path: &[Key], mut transform: F) -> Result<Table>
where
    F: FnMut(Node) -> Node,
{
    try_walk_path(tree, path, |node| Ok::<_, Error>(transform(node)))
}

/// [`walk_path`] with a fallible transform.
///
/// Fails with [`Error::MissingKey`] when a key is absent at its step and with
/// [`Error::NotCompositeAt`] when a step would have to descend into a scalar.
pub fn try_walk_path<F, E>(mut tree: Table, path: &[Key], mut transform: F) -> Result<Table, E>
where
    F: FnMut(Node) -> Result<Node, E>,
    E: From<Error>,
{
    if !path.is_empty() {
        step(&mut tree, path, 0, &mut transform)?;
    }
    Ok(tree)
}

fn step<F, E>(table: &mut Table, path: &[Key], depth: usize, transform: &mut F) -> Result<(), E>
where
    F: FnMut(Node) -> Result<Node, E>,
    E: From<Error>,
{
    let key = &path[depth];
    let slot = table.get_mut(key).ok_or_else(|| Error::MissingKey {
        path: Path::from(&path[..depth]),
        key: key.clone(),
    })?;

    let mut node = transform(std::mem::take(slot))?;
    debug!(path = %Path::from(&path[..=depth]), kind = node.kind_name(), "path step transformed");

    if depth + 1 < path.len() {
        match node.as_table_mut() {
            Some(child) => step(child, path, depth + 1, transform)?,
            None => return Err(Error::NotCompositeAt { path: Path::from(&path[..=depth]) }.into()),
        }
    }
    *slot = node;
    Ok(())
}
