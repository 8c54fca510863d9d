use crate::entities::BodyId;

/// Deferred mutation the scheduler fires once its delay elapses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferredAction {
    ClearJumpPadCooldown,
    ClearInvulnerability,
    ReenablePortal,
}

#[derive(Debug, Clone)]
struct Task {
    body: BodyId,
    action: DeferredAction,
    remaining_secs: f32,
}

/// Tick-driven table of deferred actions keyed by (body, action).
///
/// Scheduling a key that is already pending restarts its delay instead of
/// queueing a duplicate, so a debounce window cannot fire twice.
#[derive(Debug, Default)]
pub struct Scheduler {
    tasks: Vec<Task>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, body: BodyId, action: DeferredAction, delay_secs: f32) {
        if let Some(task) = self
            .tasks
            .iter_mut()
            .find(|t| t.body == body && t.action == action)
        {
            task.remaining_secs = delay_secs;
            return;
        }
        self.tasks.push(Task {
            body,
            action,
            remaining_secs: delay_secs,
        });
    }

    /// Advance all pending tasks by `dt`, returning the ones that fired.
    pub fn tick(&mut self, dt: f32) -> Vec<(BodyId, DeferredAction)> {
        let mut fired = Vec::new();
        for task in &mut self.tasks {
            task.remaining_secs -= dt;
        }
        self.tasks.retain(|task| {
            if task.remaining_secs <= 0.0 {
                fired.push((task.body, task.action));
                false
            } else {
                true
            }
        });
        fired
    }

    /// Drop every pending task without firing it.
    pub fn cancel_all(&mut self) {
        self.tasks.clear();
    }

    pub fn pending(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_pending(&self, body: BodyId, action: DeferredAction) -> bool {
        self.tasks
            .iter()
            .any(|t| t.body == body && t.action == action)
    }
}
