mod enter;
mod exit;

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use eframe::egui::Pos2;

use crate::hierarchy::NodeId;

use self::enter::EntranceAnimation;
use self::exit::ExitAnimation;
use super::scene::{Scene, VisualHandle};

fn ease_out_cubic(t: f32) -> f32 {
    1.0 - (1.0 - t).powi(3)
}

fn ease_out_quad(t: f32) -> f32 {
    1.0 - (1.0 - t).powi(2)
}

/// Fraction of `duration` covered by `elapsed`, clamped to [0, 1].
fn progress(elapsed: Duration, duration: Duration) -> f32 {
    (elapsed.as_secs_f32() / duration.as_secs_f32()).clamp(0.0, 1.0)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(in crate::app) enum TaskStatus {
    Running,
    Finished,
}

/// Read-only view of the visualization state handed to tasks on each tick.
pub(in crate::app) struct FrameContext<'a> {
    pub(in crate::app) now: Duration,
    pub(in crate::app) positions: &'a HashMap<NodeId, Pos2>,
    pub(in crate::app) parents: &'a HashMap<NodeId, NodeId>,
    pub(in crate::app) depths: &'a HashMap<NodeId, usize>,
}

/// A time-driven animation polled once per frame until it reports `Finished`.
pub(in crate::app) trait FrameTask {
    fn poll(&mut self, scene: &mut Scene, frame: &FrameContext<'_>) -> TaskStatus;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(in crate::app) struct TickReport {
    pub(in crate::app) entrance_finished: bool,
    pub(in crate::app) exits_finished: usize,
}

/// Cooperative scheduler for the entrance task (at most one in flight) and
/// any number of concurrent exit batches.
#[derive(Default)]
pub(in crate::app) struct AnimationScheduler {
    entrance: Option<EntranceAnimation>,
    exits: Vec<ExitAnimation>,
}

impl AnimationScheduler {
    pub(in crate::app) fn entrance_in_flight(&self) -> bool {
        self.entrance.is_some()
    }

    pub(in crate::app) fn is_idle(&self) -> bool {
        self.entrance.is_none() && self.exits.is_empty()
    }

    pub(in crate::app) fn active_exit_batches(&self) -> usize {
        self.exits.len()
    }

    /// Starts an entrance for `order` unless one is already running.
    pub(in crate::app) fn try_start_entrance(
        &mut self,
        started_at: Duration,
        order: &[NodeId],
        targets: &HashMap<NodeId, Pos2>,
        scene: &mut Scene,
        parents: &HashMap<NodeId, NodeId>,
    ) -> bool {
        if self.entrance.is_some() {
            tracing::debug!(
                requested = order.len(),
                "entrance already running; new nodes snap to target"
            );
            return false;
        }

        let task = EntranceAnimation::begin(started_at, order, targets, scene, parents);
        tracing::debug!(animated = task.len(), "entrance started");
        self.entrance = Some(task);
        true
    }

    /// Narrows the running entrance to `owned`; cards outside it are no
    /// longer touched by the task.
    pub(in crate::app) fn retain_entering(&mut self, owned: &HashSet<NodeId>) {
        if let Some(entrance) = self.entrance.as_mut() {
            entrance.retain(owned);
        }
    }

    pub(in crate::app) fn start_exit(&mut self, started_at: Duration, handles: Vec<VisualHandle>) {
        tracing::debug!(exiting = handles.len(), "exit started");
        self.exits.push(ExitAnimation::new(started_at, handles));
    }

    pub(in crate::app) fn tick(
        &mut self,
        scene: &mut Scene,
        frame: &FrameContext<'_>,
    ) -> TickReport {
        let mut report = TickReport::default();

        if let Some(entrance) = self.entrance.as_mut()
            && entrance.poll(scene, frame) == TaskStatus::Finished
        {
            self.entrance = None;
            report.entrance_finished = true;
            tracing::debug!("entrance finished");
        }

        let before = self.exits.len();
        self.exits
            .retain_mut(|exit| exit.poll(scene, frame) == TaskStatus::Running);
        report.exits_finished = before - self.exits.len();

        report
    }
}
