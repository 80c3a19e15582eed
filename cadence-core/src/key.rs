//! Keys identifying stages and tasks.
//!
//! A [`Key`] is an opaque, comparable identifier. Tasks and stages are
//! referenced by key rather than by direct links, which sidesteps dangling
//! references when items are removed out of order: a constraint on a key
//! that no longer exists simply stops contributing to the order until the
//! key is registered again.

use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

/// Identifier for a stage or task.
///
/// Keys compare and hash by string value, so the same logical key created
/// independently in different modules is equal (e.g. a shared default
/// stage name). Cloning is cheap: the backing string is shared.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Key(Arc<str>);

impl Key {
    /// Create a key from any string-like value.
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(Arc::from(name.as_ref()))
    }

    /// The key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Key {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Key {
    fn from(name: String) -> Self {
        Self(Arc::from(name))
    }
}

impl From<&Key> for Key {
    fn from(key: &Key) -> Self {
        key.clone()
    }
}

// Lets `IndexMap<Key, _>` be queried with plain `&str`.
impl Borrow<str> for Key {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Key {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
