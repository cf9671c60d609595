use std::time::Duration;

use super::super::constants::{EXIT_DURATION, EXIT_END_SCALE};
use super::super::scene::{Scene, VisualHandle};
use super::{FrameContext, FrameTask, TaskStatus, ease_out_quad, progress};

/// Unstaggered fade and shrink of cards parked in the exit layer. The cards
/// are dropped from the layer once the batch completes.
pub(in crate::app) struct ExitAnimation {
    started_at: Duration,
    handles: Vec<VisualHandle>,
}

impl ExitAnimation {
    pub(super) fn new(started_at: Duration, handles: Vec<VisualHandle>) -> Self {
        Self {
            started_at,
            handles,
        }
    }
}

impl FrameTask for ExitAnimation {
    fn poll(&mut self, scene: &mut Scene, frame: &FrameContext<'_>) -> TaskStatus {
        let t = progress(frame.now.saturating_sub(self.started_at), EXIT_DURATION);
        let eased = ease_out_quad(t);

        for &handle in &self.handles {
            if let Some(visual) = scene.exiting_mut(handle) {
                visual.opacity = 1.0 - eased;
                visual.scale = EXIT_END_SCALE + (1.0 - EXIT_END_SCALE) * (1.0 - eased);
            }
        }

        if t < 1.0 {
            return TaskStatus::Running;
        }

        scene.remove_exiting(&self.handles);
        TaskStatus::Finished
    }
}
