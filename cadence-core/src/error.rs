//! Error types for the scheduling engine.
//!
//! Two failure channels exist and they deliberately do not mix:
//!
//! - [`ScheduleError`] covers structural problems (duplicate keys, cyclic
//!   dependency graphs). These are returned from registration calls and
//!   order resolution.
//! - [`TaskError`] is whatever a task callback returns on failure. Task
//!   failures are caught at the per-task boundary and collected into the
//!   frame report; they never abort a frame.

use thiserror::Error;

use crate::key::Key;

/// Error produced by a task callback.
///
/// Boxed so task bodies can fail with any error type.
pub type TaskError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Structural scheduling errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    /// A task or stage was registered under a key that already exists in
    /// its owning collection.
    #[error("key '{0}' is already registered")]
    DuplicateKey(Key),

    /// The dependency graph contains a cycle. The named key participates
    /// in the cycle. The previously resolved order is retained.
    #[error("cyclic dependency involving '{0}'")]
    CyclicDependency(Key),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_name_the_offending_key() {
        let err = ScheduleError::DuplicateKey(Key::new("render"));
        assert_eq!(err.to_string(), "key 'render' is already registered");

        let err = ScheduleError::CyclicDependency(Key::new("a"));
        assert_eq!(err.to_string(), "cyclic dependency involving 'a'");
    }
}
