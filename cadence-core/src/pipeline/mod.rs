//! Frame Pipeline
//!
//! This module implements the execution model: tasks grouped into stages,
//! stages grouped into a scheduler, driven once per frame.
//!
//! # Concepts
//!
//! ## Tasks
//!
//! A Task is the smallest schedulable unit: a named callback invoked with
//! the frame delta time. Tasks declare `before`/`after` constraints
//! against sibling tasks in the same stage and can be disabled without
//! leaving the dependency graph.
//!
//! ## Stages
//!
//! A Stage is an ordered phase of the frame pipeline. It owns its tasks,
//! derives their execution order lazily from the constraint graph, and
//! optionally wraps execution in a [`Gate`] that decides whether the
//! tasks run at all this frame.
//!
//! ## Scheduler
//!
//! The Scheduler owns the stages, orders them the same way a stage orders
//! its tasks, and exposes [`Scheduler::run_frame`] — the single entry
//! point the external frame driver calls once per frame.
//!
//! # Execution discipline
//!
//! Execution is synchronous and single-threaded. Resolved orders are
//! treated as immutable snapshots for the duration of one pass: structural
//! mutations only set a dirty flag and take effect on the next
//! recomputation. A failing task callback is caught at the per-task
//! boundary and recorded in the [`FrameReport`]; it never aborts the
//! frame.

mod report;
mod scheduler;
mod stage;
mod task;

pub use report::{FrameReport, SkippedStage, TaskFailure};
pub use scheduler::Scheduler;
pub use stage::{Gate, RunTasks, Stage, StageOptions};
pub use task::{TaskFn, TaskOptions};
