//! Key paths from the tree root.
use std::fmt;
use std::ops::Deref;
use crate::node::Key;

/// Ordered ancestor keys locating a node. The empty path is the root.
///
/// Renders as a slash-separated pointer (`/a/0/b`, root is `/`). `~` and `/`
/// inside names are escaped as `~0` and `~1`, same as JSON Pointer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Path(Vec<Key>);

impl Path {
    pub fn new() -> Self { Self::default() }

    /// Parse the rendered form. Empty segments are skipped, so `""`, `"/"` and
    /// `"//"` all denote the root.
    pub fn parse(text: &str) -> Self {
        text.split('/')
            .filter(|segment| !segment.is_empty())
            .map(|segment| Key::parse(&segment.replace("~1", "/").replace("~0", "~")))
            .collect()
    }

    pub fn push(&mut self, key: Key) { self.0.push(key.normalize()) }

    pub fn pop(&mut self) -> Option<Key> { self.0.pop() }

    pub fn keys(&self) -> &[Key] { &self.0 }

    pub fn into_keys(self) -> Vec<Key> { self.0 }
}

impl Deref for Path {
    type Target = [Key];
    fn deref(&self) -> &[Key] { &self.0 }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("/");
        }
        for key in &self.0 {
            match key {
                Key::Index(index) => write!(f, "/{index}")?,
                Key::Name(name) => write!(f, "/{}", name.replace('~', "~0").replace('/', "~1"))?,
            }
        }
        Ok(())
    }
}

impl From<Vec<Key>> for Path {
    fn from(keys: Vec<Key>) -> Self { keys.into_iter().collect() }
}

impl From<&[Key]> for Path {
    fn from(keys: &[Key]) -> Self { keys.iter().cloned().collect() }
}

impl FromIterator<Key> for Path {
    fn from_iter<T: IntoIterator<Item = Key>>(iter: T) -> Self {
        Self(iter.into_iter().map(Key::normalize).collect())
    }
}
