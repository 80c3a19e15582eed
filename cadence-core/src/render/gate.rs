//! The render gate and the default pipeline stages.

use tracing::trace;

use crate::error::ScheduleError;
use crate::pipeline::{Gate, RunTasks, Scheduler, StageOptions};

use super::invalidation::Invalidation;

/// Key of the default update stage (simulation, animation, layout).
pub const UPDATE_STAGE: &str = "update";

/// Key of the default gated render stage.
pub const RENDER_STAGE: &str = "render";

/// Stage gate that runs render-class tasks only when a render is due.
///
/// The decision comes entirely from the shared [`Invalidation`] flags;
/// the scheduler itself stays free of render-specific knowledge.
pub struct RenderGate {
    invalidation: Invalidation,
}

impl RenderGate {
    pub fn new(invalidation: Invalidation) -> Self {
        Self { invalidation }
    }
}

impl Gate for RenderGate {
    fn run(&mut self, _delta: f64, tasks: &mut dyn RunTasks) {
        if self.invalidation.should_render() {
            tasks.run_tasks();
        } else {
            trace!("no render due this frame; skipping render tasks");
        }
    }
}

/// Install the long-lived default stages: `update`, then a `render`
/// stage gated on the given invalidation handle.
///
/// Components register their tasks against these shared keys.
pub fn install_default_stages(
    scheduler: &mut Scheduler,
    invalidation: Invalidation,
) -> Result<(), ScheduleError> {
    scheduler.add_stage(UPDATE_STAGE, StageOptions::new())?;
    scheduler.add_stage(
        RENDER_STAGE,
        StageOptions::new()
            .after([UPDATE_STAGE])
            .gate(RenderGate::new(invalidation)),
    )?;
    Ok(())
}
