//! Frame invalidation state shared between the application and the
//! render gate.

use std::sync::Arc;

use parking_lot::Mutex;

/// When render-class tasks execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    /// Render every frame.
    #[default]
    Always,
    /// Render only on frames where something was invalidated or a hold
    /// is active.
    OnDemand,
    /// Render only when an advance was explicitly requested.
    Manual,
}

#[derive(Debug, Default)]
struct State {
    mode: RenderMode,
    /// Something changed this frame; one-shot, reset by `end_frame`.
    invalidated: bool,
    /// Active holds keeping rendering continuous (animations, gestures).
    holds: usize,
    /// Manual-mode advance request; one-shot, reset by `end_frame`.
    advance_requested: bool,
}

/// Shared handle to the per-frame invalidation flags.
///
/// Clones share the same underlying state; hand one clone to the render
/// gate and keep another wherever visual state is mutated.
#[derive(Debug, Clone, Default)]
pub struct Invalidation {
    inner: Arc<Mutex<State>>,
}

impl Invalidation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> RenderMode {
        self.inner.lock().mode
    }

    pub fn set_mode(&self, mode: RenderMode) {
        self.inner.lock().mode = mode;
    }

    /// Mark the current frame as needing a render.
    pub fn invalidate(&self) {
        self.inner.lock().invalidated = true;
    }

    /// Request that the next frame renders, in [`RenderMode::Manual`].
    pub fn request_advance(&self) {
        self.inner.lock().advance_requested = true;
    }

    /// Keep rendering active for as long as the returned guard lives.
    ///
    /// Used for continuous effects such as animations: in
    /// [`RenderMode::OnDemand`], any live hold forces a render every
    /// frame without per-frame invalidation calls.
    pub fn hold(&self) -> InvalidationHold {
        self.inner.lock().holds += 1;
        InvalidationHold {
            inner: Arc::clone(&self.inner),
        }
    }

    /// Number of currently active holds.
    pub fn hold_count(&self) -> usize {
        self.inner.lock().holds
    }

    /// Whether render-class tasks should execute this frame.
    pub fn should_render(&self) -> bool {
        let state = self.inner.lock();
        match state.mode {
            RenderMode::Always => true,
            RenderMode::OnDemand => state.invalidated || state.holds > 0,
            RenderMode::Manual => state.advance_requested,
        }
    }

    /// Reset the one-shot flags.
    ///
    /// Called by the external frame driver after the frame completes —
    /// never by the gate itself — so the render decision stays stable for
    /// the duration of one frame. Holds persist.
    pub fn end_frame(&self) {
        let mut state = self.inner.lock();
        state.invalidated = false;
        state.advance_requested = false;
    }
}

/// Guard returned by [`Invalidation::hold`]; dropping it releases the
/// hold.
#[derive(Debug)]
pub struct InvalidationHold {
    inner: Arc<Mutex<State>>,
}

impl Drop for InvalidationHold {
    fn drop(&mut self) {
        let mut state = self.inner.lock();
        state.holds = state.holds.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn always_mode_renders_every_frame() {
        let inv = Invalidation::new();
        assert_eq!(inv.mode(), RenderMode::Always);
        assert!(inv.should_render());

        inv.end_frame();
        assert!(inv.should_render());
    }

    #[test]
    fn on_demand_mode_requires_invalidation() {
        let inv = Invalidation::new();
        inv.set_mode(RenderMode::OnDemand);
        assert!(!inv.should_render());

        inv.invalidate();
        assert!(inv.should_render());

        inv.end_frame();
        assert!(!inv.should_render());
    }

    #[test]
    fn holds_force_rendering_until_released() {
        let inv = Invalidation::new();
        inv.set_mode(RenderMode::OnDemand);

        let outer = inv.hold();
        let inner = inv.hold();
        assert_eq!(inv.hold_count(), 2);
        assert!(inv.should_render());

        drop(inner);
        inv.end_frame();
        assert!(inv.should_render());

        drop(outer);
        assert_eq!(inv.hold_count(), 0);
        assert!(!inv.should_render());
    }

    #[test]
    fn manual_mode_renders_only_on_request() {
        let inv = Invalidation::new();
        inv.set_mode(RenderMode::Manual);
        assert!(!inv.should_render());

        // Invalidation alone is not enough in manual mode.
        inv.invalidate();
        assert!(!inv.should_render());

        inv.request_advance();
        assert!(inv.should_render());

        inv.end_frame();
        assert!(!inv.should_render());
    }

    #[test]
    fn clones_share_state() {
        let inv = Invalidation::new();
        let other = inv.clone();

        inv.set_mode(RenderMode::OnDemand);
        other.invalidate();
        assert!(inv.should_render());
    }
}
