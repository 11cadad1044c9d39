//! Uniform tree representation: scalars plus one ordered, key-addressed table.
//!
//! There is no separate list type. A table whose keys are `0, 1, …, n-1` in
//! order *behaves* as a list, and that is decided by [`crate::classify`] every
//! time a node is looked at.
use std::borrow::Cow;
use std::fmt;
use indexmap::IndexMap;
use serde_json::Number;

// ————————————————————————————————————————————————————————————————————————————
// KEYS
// ————————————————————————————————————————————————————————————————————————————

/// A table key: either a position or a name.
///
/// A `Name` that spells a canonical integer is never stored as is: tables and
/// paths turn it into the matching `Index`, so `Name("0")` and `Index(0)`
/// always address the same entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    Index(i64),
    Name(String),
}

impl Key {
    /// Build a key from text. Canonical integers (`"0"`, `"42"`, `"-3"`)
    /// become [`Key::Index`]; anything else (`"07"`, `"+1"`, `"-0"`) stays a name.
    pub fn parse(text: &str) -> Self {
        match canonical_index(text) {
            Some(index) => Key::Index(index),
            None => Key::Name(text.to_owned()),
        }
    }

    /// Turn a `Name` holding a canonical integer into an `Index`.
    pub fn normalize(self) -> Self {
        match self {
            Key::Name(name) => Key::from(name),
            index => index,
        }
    }

    /// Lookup form of [`Key::normalize`]; borrows unless a rewrite is needed.
    pub(crate) fn canonical(&self) -> Cow<'_, Key> {
        match self {
            Key::Name(name) => match canonical_index(name) {
                Some(index) => Cow::Owned(Key::Index(index)),
                None => Cow::Borrowed(self),
            },
            Key::Index(_) => Cow::Borrowed(self),
        }
    }

    pub fn as_index(&self) -> Option<i64> {
        match self {
            Key::Index(index) => Some(*index),
            Key::Name(_) => None,
        }
    }

    pub fn as_name(&self) -> Option<&str> {
        match self {
            Key::Index(_) => None,
            Key::Name(name) => Some(name),
        }
    }
}

fn canonical_index(text: &str) -> Option<i64> {
    let digits = text.strip_prefix('-').unwrap_or(text);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    // leading zeros and negative zero are not canonical
    if (digits.len() > 1 && digits.starts_with('0')) || text == "-0" {
        return None;
    }
    text.parse().ok()
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Index(index) => write!(f, "{index}"),
            Key::Name(name) => f.write_str(name),
        }
    }
}

impl From<&str> for Key {
    fn from(text: &str) -> Self { Key::parse(text) }
}

impl From<String> for Key {
    fn from(text: String) -> Self {
        match canonical_index(&text) {
            Some(index) => Key::Index(index),
            None => Key::Name(text),
        }
    }
}

impl From<i64> for Key {
    fn from(index: i64) -> Self { Key::Index(index) }
}

impl From<usize> for Key {
    fn from(index: usize) -> Self { Key::Index(index as i64) }
}

// ————————————————————————————————————————————————————————————————————————————
// SCALARS
// ————————————————————————————————————————————————————————————————————————————

/// Leaf value. Never inspected by the rewriter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
}

impl Scalar {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Scalar::Null => "null",
            Scalar::Bool(_) => "bool",
            Scalar::Number(_) => "number",
            Scalar::String(_) => "string",
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// TABLES
// ————————————————————————————————————————————————————————————————————————————

/// Ordered key → node collection. Keys are unique; insertion order is kept.
///
/// Equality is order-sensitive: `[a, b]` and `{1: b, 0: a}` are different
/// tables (and classify differently).
#[derive(Debug, Clone, Default)]
pub struct Table {
    entries: IndexMap<Key, Node>,
}

impl Table {
    pub fn new() -> Self { Self::default() }

    pub fn with_capacity(capacity: usize) -> Self {
        Self { entries: IndexMap::with_capacity(capacity) }
    }

    /// Index-keyed table from a sequence of nodes.
    pub fn list<I>(items: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Node>,
    {
        items
            .into_iter()
            .enumerate()
            .map(|(index, item)| (Key::from(index), item.into()))
            .collect()
    }

    pub fn len(&self) -> usize { self.entries.len() }

    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    /// Insert or overwrite. An overwritten key keeps its original position.
    pub fn insert(&mut self, key: impl Into<Key>, node: impl Into<Node>) -> Option<Node> {
        self.entries.insert(key.into().normalize(), node.into())
    }

    pub fn get(&self, key: &Key) -> Option<&Node> { self.entries.get(&*key.canonical()) }

    pub fn get_mut(&mut self, key: &Key) -> Option<&mut Node> { self.entries.get_mut(&*key.canonical()) }

    pub fn contains_key(&self, key: &Key) -> bool { self.entries.contains_key(&*key.canonical()) }

    /// Remove a key without renumbering the keys after it.
    pub fn remove(&mut self, key: &Key) -> Option<Node> { self.entries.shift_remove(&*key.canonical()) }

    pub fn keys(&self) -> impl Iterator<Item = &Key> { self.entries.keys() }

    pub fn values(&self) -> impl Iterator<Item = &Node> { self.entries.values() }

    pub fn iter(&self) -> indexmap::map::Iter<'_, Key, Node> { self.entries.iter() }

    pub fn iter_mut(&mut self) -> indexmap::map::IterMut<'_, Key, Node> { self.entries.iter_mut() }

    pub fn is_map_like(&self) -> bool { crate::classify::table_is_map_like(self) }
}

impl PartialEq for Table {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}

impl Eq for Table {}

impl<K: Into<Key>> FromIterator<(K, Node)> for Table {
    fn from_iter<T: IntoIterator<Item = (K, Node)>>(iter: T) -> Self {
        Self { entries: iter.into_iter().map(|(k, v)| (k.into().normalize(), v)).collect() }
    }
}

impl IntoIterator for Table {
    type Item = (Key, Node);
    type IntoIter = indexmap::map::IntoIter<Key, Node>;
    fn into_iter(self) -> Self::IntoIter { self.entries.into_iter() }
}

impl<'a> IntoIterator for &'a Table {
    type Item = (&'a Key, &'a Node);
    type IntoIter = indexmap::map::Iter<'a, Key, Node>;
    fn into_iter(self) -> Self::IntoIter { self.entries.iter() }
}

// ————————————————————————————————————————————————————————————————————————————
// NODES
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Scalar(Scalar),
    Table(Table),
}

impl Node {
    pub fn null() -> Self { Node::Scalar(Scalar::Null) }

    pub fn is_composite(&self) -> bool { matches!(self, Node::Table(_)) }

    pub fn is_map_like(&self) -> bool { crate::classify::is_map_like(self) }

    pub fn as_table(&self) -> Option<&Table> {
        match self {
            Node::Table(table) => Some(table),
            Node::Scalar(_) => None,
        }
    }

    pub fn as_table_mut(&mut self) -> Option<&mut Table> {
        match self {
            Node::Table(table) => Some(table),
            Node::Scalar(_) => None,
        }
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Node::Scalar(scalar) => Some(scalar),
            Node::Table(_) => None,
        }
    }

    /// Short name of the node's kind, for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Node::Scalar(scalar) => scalar.kind_name(),
            Node::Table(_) => "table",
        }
    }
}

impl Default for Node {
    fn default() -> Self { Node::null() }
}

impl From<Table> for Node {
    fn from(table: Table) -> Self { Node::Table(table) }
}

impl From<Scalar> for Node {
    fn from(scalar: Scalar) -> Self { Node::Scalar(scalar) }
}

impl From<bool> for Node {
    fn from(value: bool) -> Self { Node::Scalar(Scalar::Bool(value)) }
}

impl From<i64> for Node {
    fn from(value: i64) -> Self { Node::Scalar(Scalar::Number(value.into())) }
}

impl From<f64> for Node {
    /// Non-finite floats have no JSON number form and become null.
    fn from(value: f64) -> Self {
        match Number::from_f64(value) {
            Some(number) => Node::Scalar(Scalar::Number(number)),
            None => Node::null(),
        }
    }
}

impl From<&str> for Node {
    fn from(value: &str) -> Self { Node::Scalar(Scalar::String(value.to_owned())) }
}

impl From<String> for Node {
    fn from(value: String) -> Self { Node::Scalar(Scalar::String(value)) }
}
