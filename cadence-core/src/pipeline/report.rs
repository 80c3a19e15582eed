//! Per-frame outcome reporting.
//!
//! Non-fatal failures (a task callback erroring, a stage skipped because
//! its task graph is cyclic) never abort a frame. They are collected into
//! a [`FrameReport`] that [`Scheduler::run_frame`] hands back to the
//! frame driver, which can log, surface, or ignore them.
//!
//! [`Scheduler::run_frame`]: super::Scheduler::run_frame

use crate::error::{ScheduleError, TaskError};
use crate::key::Key;

/// A task callback that failed during the frame.
#[derive(Debug)]
pub struct TaskFailure {
    /// Stage the task belongs to.
    pub stage: Key,
    /// The failing task.
    pub task: Key,
    /// The error the callback returned.
    pub error: TaskError,
}

/// A stage whose tasks did not run this frame because its task order
/// could not be resolved.
#[derive(Debug)]
pub struct SkippedStage {
    /// The skipped stage.
    pub stage: Key,
    /// Why resolution failed.
    pub error: ScheduleError,
}

/// Everything that went wrong during one frame.
#[derive(Debug, Default)]
pub struct FrameReport {
    /// Task callbacks that returned an error. Execution continued with
    /// the next task in each case.
    pub failures: Vec<TaskFailure>,
    /// Stages skipped for this frame (task-level dependency cycle).
    pub skipped: Vec<SkippedStage>,
}

impl FrameReport {
    /// `true` if every stage ran and every task callback succeeded.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty() && self.skipped.is_empty()
    }
}
