//! The frame scheduler.
//!
//! One scheduler instance lives per application root. It owns the stages,
//! maintains their resolved execution order behind a dirty flag, and
//! drives one full frame at a time when the external frame driver calls
//! [`Scheduler::run_frame`].

use indexmap::IndexMap;
use tracing::{debug, trace, warn};

use crate::error::ScheduleError;
use crate::key::Key;
use crate::order::resolve;

use super::report::{FrameReport, SkippedStage};
use super::stage::{Stage, StageOptions};

/// Ordered collection of stages driven once per frame.
pub struct Scheduler {
    stages: IndexMap<Key, Stage>,
    /// Last successfully resolved stage order.
    order: Vec<Key>,
    dirty: bool,
    /// Frames driven so far; diagnostic only.
    frame: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            stages: IndexMap::new(),
            order: Vec::new(),
            dirty: false,
            frame: 0,
        }
    }

    /// Register a stage.
    ///
    /// Fails with [`ScheduleError::DuplicateKey`] if the key already
    /// exists. Marks the cached stage order dirty.
    pub fn add_stage(
        &mut self,
        key: impl Into<Key>,
        options: StageOptions,
    ) -> Result<(), ScheduleError> {
        let key = key.into();
        if self.stages.contains_key(key.as_str()) {
            return Err(ScheduleError::DuplicateKey(key));
        }

        debug!(stage = %key, "registering stage");
        self.stages.insert(key.clone(), Stage::new(key, options));
        self.dirty = true;
        Ok(())
    }

    /// Unregister a stage and all its tasks. Returns `false` (and logs)
    /// if the key is not registered.
    pub fn remove_stage(&mut self, key: &str) -> bool {
        // shift_remove keeps the surviving stages' registration order.
        if self.stages.shift_remove(key).is_some() {
            debug!(stage = %key, "removing stage");
            self.dirty = true;
            true
        } else {
            warn!(stage = %key, "remove for unknown stage; ignoring");
            false
        }
    }

    /// Replace a stage's constraint sets. Returns `false` if the key is
    /// unknown. Marks the cached stage order dirty.
    pub fn set_stage_dependencies<I, J, K, L>(&mut self, key: &str, after: I, before: J) -> bool
    where
        I: IntoIterator<Item = K>,
        K: Into<Key>,
        J: IntoIterator<Item = L>,
        L: Into<Key>,
    {
        match self.stages.get_mut(key) {
            Some(stage) => {
                stage.set_dependencies(
                    after.into_iter().map(Into::into).collect(),
                    before.into_iter().map(Into::into).collect(),
                );
                self.dirty = true;
                true
            }
            None => {
                warn!(stage = %key, "dependency update for unknown stage; ignoring");
                false
            }
        }
    }

    pub fn stage(&self, key: &str) -> Option<&Stage> {
        self.stages.get(key)
    }

    pub fn stage_mut(&mut self, key: &str) -> Option<&mut Stage> {
        self.stages.get_mut(key)
    }

    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    /// Number of frames driven so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// The resolved stage execution order, recomputing it if stale.
    pub fn stage_order(&mut self) -> Result<&[Key], ScheduleError> {
        self.refresh_order()?;
        Ok(&self.order)
    }

    /// Drive one full frame: every stage in resolved order, every enabled
    /// task within each stage, synchronously.
    ///
    /// A cycle among the stages is fatal to the frame: nothing runs, the
    /// error is returned, and the previously valid stage order stays
    /// cached. Per-stage and per-task failures are isolated and recorded
    /// in the returned [`FrameReport`].
    pub fn run_frame(&mut self, delta: f64) -> Result<FrameReport, ScheduleError> {
        self.refresh_order()?;

        self.frame += 1;
        trace!(frame = self.frame, delta, "frame start");

        let mut report = FrameReport::default();

        // Snapshot: stage mutations during the frame apply next frame.
        let order = self.order.clone();
        for key in &order {
            let Some(stage) = self.stages.get_mut(key.as_str()) else {
                continue;
            };
            if let Err(err) = stage.run(delta, &mut report) {
                warn!(stage = %key, error = %err, "stage skipped this frame");
                report.skipped.push(SkippedStage {
                    stage: key.clone(),
                    error: err,
                });
            }
        }

        Ok(report)
    }

    fn refresh_order(&mut self) -> Result<(), ScheduleError> {
        if self.dirty {
            self.order = resolve(&self.stages)?;
            self.dirty = false;
            debug!(stages = self.order.len(), "stage order recomputed");
        }
        Ok(())
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::TaskOptions;
    use parking_lot::Mutex;
    use std::sync::Arc;

    type Trace = Arc<Mutex<Vec<&'static str>>>;

    fn tracing_task(trace: &Trace, label: &'static str) -> crate::pipeline::TaskFn {
        let trace = trace.clone();
        Box::new(move |_| {
            trace.lock().push(label);
            Ok(())
        })
    }

    fn order_of(scheduler: &mut Scheduler) -> Vec<String> {
        scheduler
            .stage_order()
            .unwrap()
            .iter()
            .map(|k| k.to_string())
            .collect()
    }

    #[test]
    fn duplicate_stage_key_is_rejected() {
        let mut scheduler = Scheduler::new();
        scheduler.add_stage("s", StageOptions::new()).unwrap();

        let err = scheduler.add_stage("s", StageOptions::new()).unwrap_err();
        assert_eq!(err, ScheduleError::DuplicateKey(Key::new("s")));
    }

    #[test]
    fn stale_stage_removal_is_a_noop() {
        let mut scheduler = Scheduler::new();
        scheduler.add_stage("s", StageOptions::new()).unwrap();

        assert!(scheduler.remove_stage("s"));
        assert!(!scheduler.remove_stage("s"));
    }

    #[test]
    fn stage_order_respects_constraints_and_registration_order() {
        let mut scheduler = Scheduler::new();
        scheduler
            .add_stage("render", StageOptions::new().after(["update"]))
            .unwrap();
        scheduler.add_stage("input", StageOptions::new()).unwrap();
        scheduler
            .add_stage("update", StageOptions::new().after(["input"]))
            .unwrap();

        assert_eq!(order_of(&mut scheduler), ["input", "update", "render"]);
    }

    #[test]
    fn run_frame_executes_stages_and_tasks_in_resolved_order() {
        let trace: Trace = Arc::new(Mutex::new(Vec::new()));

        let mut scheduler = Scheduler::new();
        scheduler
            .add_stage("second", StageOptions::new().after(["first"]))
            .unwrap();
        scheduler.add_stage("first", StageOptions::new()).unwrap();

        let stage = scheduler.stage_mut("second").unwrap();
        stage
            .add_task("s2", tracing_task(&trace, "second:s2"), TaskOptions::new())
            .unwrap();

        let stage = scheduler.stage_mut("first").unwrap();
        stage
            .add_task("b", tracing_task(&trace, "first:b"), TaskOptions::new().after(["a"]))
            .unwrap();
        stage
            .add_task("a", tracing_task(&trace, "first:a"), TaskOptions::new())
            .unwrap();

        let report = scheduler.run_frame(0.016).unwrap();
        assert!(report.is_clean());
        assert_eq!(*trace.lock(), ["first:a", "first:b", "second:s2"]);
    }

    #[test]
    fn stage_cycle_is_fatal_to_the_frame() {
        let trace: Trace = Arc::new(Mutex::new(Vec::new()));

        let mut scheduler = Scheduler::new();
        scheduler.add_stage("a", StageOptions::new()).unwrap();
        scheduler.add_stage("b", StageOptions::new()).unwrap();
        scheduler
            .stage_mut("a")
            .unwrap()
            .add_task("t", tracing_task(&trace, "a:t"), TaskOptions::new())
            .unwrap();

        scheduler.run_frame(0.016).unwrap();
        assert_eq!(trace.lock().len(), 1);

        // a after b, b after a: the whole frame must be skipped.
        assert!(scheduler.set_stage_dependencies("a", ["b"], Vec::<Key>::new()));
        assert!(scheduler.set_stage_dependencies("b", ["a"], Vec::<Key>::new()));
        assert!(matches!(
            scheduler.run_frame(0.016),
            Err(ScheduleError::CyclicDependency(_))
        ));
        assert_eq!(trace.lock().len(), 1);

        // Breaking the cycle recovers the pipeline.
        assert!(scheduler.set_stage_dependencies("b", Vec::<Key>::new(), Vec::<Key>::new()));
        scheduler.run_frame(0.016).unwrap();
        assert_eq!(trace.lock().len(), 2);
    }

    #[test]
    fn task_cycle_skips_only_the_affected_stage() {
        let trace: Trace = Arc::new(Mutex::new(Vec::new()));

        let mut scheduler = Scheduler::new();
        scheduler.add_stage("broken", StageOptions::new()).unwrap();
        scheduler.add_stage("healthy", StageOptions::new()).unwrap();

        let stage = scheduler.stage_mut("broken").unwrap();
        stage
            .add_task("x", tracing_task(&trace, "x"), TaskOptions::new().after(["y"]))
            .unwrap();
        stage
            .add_task("y", tracing_task(&trace, "y"), TaskOptions::new().after(["x"]))
            .unwrap();

        scheduler
            .stage_mut("healthy")
            .unwrap()
            .add_task("t", tracing_task(&trace, "healthy:t"), TaskOptions::new())
            .unwrap();

        let report = scheduler.run_frame(0.016).unwrap();
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].stage, Key::new("broken"));
        assert_eq!(*trace.lock(), ["healthy:t"]);
    }

    #[test]
    fn unknown_stage_reference_activates_on_registration() {
        let mut scheduler = Scheduler::new();
        scheduler
            .add_stage("render", StageOptions::new().after(["update"]))
            .unwrap();
        assert_eq!(order_of(&mut scheduler), ["render"]);

        scheduler.add_stage("update", StageOptions::new()).unwrap();
        assert_eq!(order_of(&mut scheduler), ["update", "render"]);
    }

    #[test]
    fn frame_counter_advances_only_on_executed_frames() {
        let mut scheduler = Scheduler::new();
        scheduler.add_stage("s", StageOptions::new()).unwrap();

        assert_eq!(scheduler.frame(), 0);
        scheduler.run_frame(0.016).unwrap();
        scheduler.run_frame(0.016).unwrap();
        assert_eq!(scheduler.frame(), 2);
    }
}
