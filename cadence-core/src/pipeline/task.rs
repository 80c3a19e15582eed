//! Task representation.
//!
//! A task binds a key to a callback and carries its dependency
//! constraints. Tasks are owned exclusively by their stage; user code
//! manipulates them through the stage's API.

use std::fmt;

use smallvec::SmallVec;

use crate::error::TaskError;
use crate::key::Key;
use crate::order::Schedulable;

/// A task callback, invoked with the frame delta time in seconds.
pub type TaskFn = Box<dyn FnMut(f64) -> Result<(), TaskError>>;

/// Options for registering a task.
///
/// # Example
///
/// ```rust
/// use cadence_core::pipeline::TaskOptions;
///
/// let opts = TaskOptions::new().after(["physics"]).before(["render"]);
/// ```
#[derive(Debug, Default)]
pub struct TaskOptions {
    pub(crate) after: Vec<Key>,
    pub(crate) before: Vec<Key>,
    pub(crate) disabled: bool,
}

impl TaskOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require the listed tasks to run before this one.
    pub fn after<I, K>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<Key>,
    {
        self.after = keys.into_iter().map(Into::into).collect();
        self
    }

    /// Require this task to run before the listed ones.
    pub fn before<I, K>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<Key>,
    {
        self.before = keys.into_iter().map(Into::into).collect();
        self
    }

    /// Register the task disabled; it stays in the dependency graph but
    /// is skipped during execution until enabled.
    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }
}

/// A named unit of work within a stage.
pub(crate) struct Task {
    key: Key,
    callback: TaskFn,
    enabled: bool,
    after: SmallVec<[Key; 2]>,
    before: SmallVec<[Key; 2]>,
}

impl Task {
    pub(crate) fn new(key: Key, callback: TaskFn, options: TaskOptions) -> Self {
        Self {
            key,
            callback,
            enabled: !options.disabled,
            after: SmallVec::from_vec(options.after),
            before: SmallVec::from_vec(options.before),
        }
    }

    pub(crate) fn enabled(&self) -> bool {
        self.enabled
    }

    /// O(1); the task stays in the dependency graph either way, so no
    /// order recomputation is needed.
    pub(crate) fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Replace both constraint sets.
    pub(crate) fn set_dependencies(&mut self, after: Vec<Key>, before: Vec<Key>) {
        self.after = SmallVec::from_vec(after);
        self.before = SmallVec::from_vec(before);
    }

    /// Invoke the callback with the frame delta time.
    pub(crate) fn run(&mut self, delta: f64) -> Result<(), TaskError> {
        (self.callback)(delta)
    }
}

impl Schedulable for Task {
    fn key(&self) -> &Key {
        &self.key
    }

    fn after(&self) -> &[Key] {
        &self.after
    }

    fn before(&self) -> &[Key] {
        &self.before
    }
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("key", &self.key)
            .field("enabled", &self.enabled)
            .field("after", &self.after)
            .field("before", &self.before)
            .finish_non_exhaustive()
    }
}
