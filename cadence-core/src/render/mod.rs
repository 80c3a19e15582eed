//! Render Gating
//!
//! This module connects the generic stage gate mechanism to demand-driven
//! rendering: render-class tasks should only execute on frames where
//! something actually changed (or when the application asks for
//! continuous or manual rendering).
//!
//! # How it works
//!
//! The application and the render stage share an [`Invalidation`] handle:
//! a small set of per-frame flags (frame invalidated, active hold count,
//! manual advance requested) plus the configured [`RenderMode`]. Anything
//! that changes visual state calls [`Invalidation::invalidate`]; the
//! [`RenderGate`] reads the combined decision at execution time and runs
//! the stage's tasks only when a render is due. The external frame driver
//! resets the one-shot flags *after* the frame completes, so the decision
//! is stable for the whole frame and independent of stage ordering.

mod gate;
mod invalidation;

pub use gate::{install_default_stages, RenderGate, RENDER_STAGE, UPDATE_STAGE};
pub use invalidation::{Invalidation, InvalidationHold, RenderMode};
