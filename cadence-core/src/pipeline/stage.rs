//! Stage: an ordered phase of the frame pipeline.
//!
//! A stage owns a collection of tasks, derives their execution order
//! lazily from the dependency constraints, and executes them once per
//! frame when its scheduler reaches it. An optional [`Gate`] wraps
//! execution so the stage can skip its tasks entirely on frames where
//! they are not needed.

use std::fmt;

use indexmap::IndexMap;
use smallvec::SmallVec;
use tracing::{debug, error, warn};

use crate::error::ScheduleError;
use crate::key::Key;
use crate::order::{resolve, Schedulable};

use super::report::{FrameReport, TaskFailure};
use super::task::{Task, TaskFn, TaskOptions};

/// Capability handed to a [`Gate`].
///
/// Each invocation executes the stage's enabled tasks in resolved order
/// against the current frame's snapshot. The gate decides whether and
/// when to invoke it; not invoking it skips the stage's tasks for this
/// frame.
pub trait RunTasks {
    fn run_tasks(&mut self);
}

/// Decides whether a stage's tasks run this frame.
///
/// Implemented automatically for closures:
///
/// ```rust
/// use cadence_core::pipeline::{RunTasks, StageOptions};
///
/// let opts = StageOptions::new().gate(|_dt: f64, tasks: &mut dyn RunTasks| {
///     // run unconditionally; a real gate would consult external state
///     tasks.run_tasks();
/// });
/// ```
pub trait Gate {
    fn run(&mut self, delta: f64, tasks: &mut dyn RunTasks);
}

impl<F> Gate for F
where
    F: FnMut(f64, &mut dyn RunTasks),
{
    fn run(&mut self, delta: f64, tasks: &mut dyn RunTasks) {
        self(delta, tasks)
    }
}

/// Options for registering a stage.
#[derive(Default)]
pub struct StageOptions {
    pub(crate) after: Vec<Key>,
    pub(crate) before: Vec<Key>,
    pub(crate) gate: Option<Box<dyn Gate>>,
}

impl StageOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require the listed stages to run before this one.
    pub fn after<I, K>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<Key>,
    {
        self.after = keys.into_iter().map(Into::into).collect();
        self
    }

    /// Require this stage to run before the listed ones.
    pub fn before<I, K>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<Key>,
    {
        self.before = keys.into_iter().map(Into::into).collect();
        self
    }

    /// Wrap the stage's execution in a gate.
    pub fn gate(mut self, gate: impl Gate + 'static) -> Self {
        self.gate = Some(Box::new(gate));
        self
    }
}

impl fmt::Debug for StageOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StageOptions")
            .field("after", &self.after)
            .field("before", &self.before)
            .field("gated", &self.gate.is_some())
            .finish()
    }
}

/// An ordered phase of the frame pipeline.
///
/// Owned exclusively by its [`Scheduler`](super::Scheduler); obtained
/// through [`Scheduler::stage_mut`](super::Scheduler::stage_mut).
pub struct Stage {
    key: Key,
    tasks: IndexMap<Key, Task>,
    /// Last successfully resolved task order. Retained across failed
    /// resolutions so a cycle never leaves the stage without a valid
    /// (if stale) order.
    order: Vec<Key>,
    dirty: bool,
    after: SmallVec<[Key; 2]>,
    before: SmallVec<[Key; 2]>,
    gate: Option<Box<dyn Gate>>,
}

impl Stage {
    pub(crate) fn new(key: Key, options: StageOptions) -> Self {
        Self {
            key,
            tasks: IndexMap::new(),
            order: Vec::new(),
            dirty: false,
            after: SmallVec::from_vec(options.after),
            before: SmallVec::from_vec(options.before),
            gate: options.gate,
        }
    }

    pub fn key(&self) -> &Key {
        &self.key
    }

    /// Register a task under this stage.
    ///
    /// Fails with [`ScheduleError::DuplicateKey`] if the key already
    /// exists here. Marks the cached task order dirty.
    pub fn add_task(
        &mut self,
        key: impl Into<Key>,
        callback: TaskFn,
        options: TaskOptions,
    ) -> Result<(), ScheduleError> {
        let key = key.into();
        if self.tasks.contains_key(key.as_str()) {
            return Err(ScheduleError::DuplicateKey(key));
        }

        debug!(stage = %self.key, task = %key, "registering task");
        self.tasks
            .insert(key.clone(), Task::new(key, callback, options));
        self.dirty = true;
        Ok(())
    }

    /// Unregister a task. Returns `false` (and logs) if the key is not
    /// registered, so removing twice is a harmless no-op.
    pub fn remove_task(&mut self, key: &str) -> bool {
        // shift_remove keeps the surviving tasks' registration order,
        // which the stable tie-break depends on.
        if self.tasks.shift_remove(key).is_some() {
            debug!(stage = %self.key, task = %key, "removing task");
            self.dirty = true;
            true
        } else {
            warn!(stage = %self.key, task = %key, "remove for unknown task; ignoring");
            false
        }
    }

    /// Enable or disable a task. Returns `false` if the key is unknown.
    ///
    /// A disabled task is skipped during execution but keeps its place in
    /// the dependency graph, so its neighbors stay ordered around it.
    /// This is O(1) and does not invalidate the cached order.
    pub fn set_task_enabled(&mut self, key: &str, enabled: bool) -> bool {
        match self.tasks.get_mut(key) {
            Some(task) => {
                task.set_enabled(enabled);
                true
            }
            None => {
                warn!(stage = %self.key, task = %key, "enable toggle for unknown task; ignoring");
                false
            }
        }
    }

    /// Replace a task's constraint sets. Returns `false` if the key is
    /// unknown. Marks the cached task order dirty.
    pub fn set_task_dependencies<I, J, K, L>(&mut self, key: &str, after: I, before: J) -> bool
    where
        I: IntoIterator<Item = K>,
        K: Into<Key>,
        J: IntoIterator<Item = L>,
        L: Into<Key>,
    {
        match self.tasks.get_mut(key) {
            Some(task) => {
                task.set_dependencies(
                    after.into_iter().map(Into::into).collect(),
                    before.into_iter().map(Into::into).collect(),
                );
                self.dirty = true;
                true
            }
            None => {
                warn!(stage = %self.key, task = %key, "dependency update for unknown task; ignoring");
                false
            }
        }
    }

    pub fn has_task(&self, key: &str) -> bool {
        self.tasks.contains_key(key)
    }

    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    /// The resolved task execution order, recomputing it if stale.
    ///
    /// On a cyclic graph this fails and the previously valid order stays
    /// cached (and stale: the stage remains dirty and retries next time).
    pub fn task_order(&mut self) -> Result<&[Key], ScheduleError> {
        self.refresh_order()?;
        Ok(&self.order)
    }

    fn refresh_order(&mut self) -> Result<(), ScheduleError> {
        if self.dirty {
            self.order = resolve(&self.tasks)?;
            self.dirty = false;
            debug!(stage = %self.key, tasks = self.order.len(), "task order recomputed");
        }
        Ok(())
    }

    /// Execute the stage for one frame.
    ///
    /// Errors only on a task-level dependency cycle; the scheduler skips
    /// the stage for this frame and records it. Task callback failures
    /// are caught per task and recorded in the report.
    pub(crate) fn run(
        &mut self,
        delta: f64,
        report: &mut FrameReport,
    ) -> Result<(), ScheduleError> {
        self.refresh_order()?;

        // Snapshot of the resolved order for this pass: structural
        // mutations made during the frame take effect on the next
        // recomputation, never mid-pass.
        let order = self.order.clone();

        match self.gate.take() {
            Some(mut gate) => {
                let mut tasks = StageTasks {
                    stage: &self.key,
                    order: &order,
                    tasks: &mut self.tasks,
                    report,
                    delta,
                };
                gate.run(delta, &mut tasks);
                self.gate = Some(gate);
            }
            None => {
                let mut tasks = StageTasks {
                    stage: &self.key,
                    order: &order,
                    tasks: &mut self.tasks,
                    report,
                    delta,
                };
                tasks.run_tasks();
            }
        }

        Ok(())
    }

    pub(crate) fn set_dependencies(&mut self, after: Vec<Key>, before: Vec<Key>) {
        self.after = SmallVec::from_vec(after);
        self.before = SmallVec::from_vec(before);
    }
}

impl Schedulable for Stage {
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

impl fmt::Debug for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stage")
            .field("key", &self.key)
            .field("tasks", &self.tasks.len())
            .field("dirty", &self.dirty)
            .field("gated", &self.gate.is_some())
            .finish()
    }
}

/// The concrete [`RunTasks`] capability for one stage execution pass.
struct StageTasks<'a> {
    stage: &'a Key,
    order: &'a [Key],
    tasks: &'a mut IndexMap<Key, Task>,
    report: &'a mut FrameReport,
    delta: f64,
}

impl RunTasks for StageTasks<'_> {
    fn run_tasks(&mut self) {
        for key in self.order {
            let Some(task) = self.tasks.get_mut(key.as_str()) else {
                // The snapshot may name a task removed since resolution.
                continue;
            };
            if !task.enabled() {
                continue;
            }
            if let Err(err) = task.run(self.delta) {
                error!(
                    stage = %self.stage,
                    task = %key,
                    error = %err,
                    "task callback failed; continuing with next task"
                );
                self.report.failures.push(TaskFailure {
                    stage: self.stage.clone(),
                    task: key.clone(),
                    error: err,
                });
            }
        }
    }
}
