//! Rule-driven visitor used by the `rewrite` command.
//!
//! Rules are tried in a fixed order on each map-like node: path drops, child
//! key drops, literal replacements, then the jq visit filter. The first rule
//! that applies decides; a node no rule touches is kept and walked into.
use regex::Regex;
use serde_json::Value;
use tracing::debug;
use crate::error::{Error, Result};
use crate::jq_exec::JqFilter;
use crate::node::{Key, Node, Table};
use crate::path::Path;
use crate::rewrite::Visit;

#[derive(Debug, Default)]
pub struct RuleSet {
    drop_paths: Vec<Regex>,
    drop_key_with: Vec<Key>,
    replacements: Vec<(Regex, Node)>,
    visit: Option<JqFilter>,
}

impl RuleSet {
    pub fn new() -> Self { Self::default() }

    /// Delete nodes whose rendered path (`/a/0/b`) matches.
    pub fn drop_path(mut self, pattern: &str) -> Result<Self, regex::Error> {
        self.drop_paths.push(Regex::new(pattern)?);
        Ok(self)
    }

    /// Delete nodes holding a direct child under `key`.
    pub fn drop_key_with(mut self, key: impl Into<Key>) -> Self {
        self.drop_key_with.push(key.into());
        self
    }

    /// Replace nodes whose rendered path matches with `node`, without
    /// walking into it.
    pub fn replace(mut self, pattern: &str, node: Node) -> Result<Self, regex::Error> {
        self.replacements.push((Regex::new(pattern)?, node));
        Ok(self)
    }

    /// Let a jq program decide: `null` deletes, a composite is kept and
    /// walked, any other scalar replaces the node, no output keeps it as is.
    pub fn visit_with(mut self, filter: JqFilter) -> Self {
        self.visit = Some(filter);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.drop_paths.is_empty()
            && self.drop_key_with.is_empty()
            && self.replacements.is_empty()
            && self.visit.is_none()
    }

    pub fn apply(&self, node: Table, path: &Path) -> Result<Visit> {
        let rendered = path.to_string();

        if let Some(rx) = self.drop_paths.iter().find(|rx| rx.is_match(&rendered)) {
            debug!(path = %rendered, rule = rx.as_str(), "dropped by path");
            return Ok(Visit::Delete);
        }
        if let Some(key) = self.drop_key_with.iter().find(|key| node.contains_key(key)) {
            debug!(path = %rendered, %key, "dropped by child key");
            return Ok(Visit::Delete);
        }
        if let Some((rx, replacement)) = self.replacements.iter().find(|(rx, _)| rx.is_match(&rendered)) {
            debug!(path = %rendered, rule = rx.as_str(), "replaced");
            return Ok(Visit::ReplaceRaw(replacement.clone()));
        }
        match &self.visit {
            Some(filter) => visit_with_jq(filter, node),
            None => Ok(Visit::descend(node)),
        }
    }
}

fn visit_with_jq(filter: &JqFilter, node: Table) -> Result<Visit> {
    let input = Node::Table(node.clone()).into_json();
    Ok(match filter.run_first(&input)? {
        None => Visit::ReplaceRaw(Node::Table(node)),
        Some(Value::Null) => Visit::Delete,
        Some(value @ (Value::Array(_) | Value::Object(_))) => Visit::Keep(Node::from_json(value)),
        Some(scalar) => Visit::ReplaceRaw(Node::from_json(scalar)),
    })
}

/// Parse a `REGEX=JSON` replacement argument. The split is at the first `=`.
pub fn parse_replacement(arg: &str) -> Result<(String, Node)> {
    let (pattern, literal) = arg
        .split_once('=')
        .ok_or_else(|| Error::InvalidRule(format!("expected REGEX=JSON, got `{arg}`")))?;
    let value: Value = serde_json::from_str(literal)?;
    Ok((pattern.to_owned(), Node::from_json(value)))
}
