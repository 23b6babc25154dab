//! Deferred task scheduling.
//!
//! Many mutation requests issued within one control-flow turn are coalesced
//! into a single pending batch. The host steps the scheduler once per tick
//! after the synchronous call stack has unwound; tasks queued during a drain
//! land in a fresh batch and run on the next tick, so no task executes twice
//! and no drain recurses into itself.
//!
//! Each canvas owns its scheduler instance. There is no process-wide queue
//! and no timer; tests drive ticks explicitly.

use tracing::trace;

/// A coalescing FIFO task queue drained one batch per tick.
///
/// `schedule` is idempotent per task identity: re-queueing a task that
/// compares equal to one already pending is a no-op.
#[derive(Debug)]
pub struct Scheduler<T> {
    queue: Vec<T>,
    armed: bool,
}

impl<T: PartialEq> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            queue: Vec::new(),
            armed: false,
        }
    }

    /// Queue `task` for the next drain.
    ///
    /// The first call of a turn arms the pending batch; later calls in the
    /// same turn append to it. Returns `false` when an equal task was
    /// already pending and the call was deduplicated.
    pub fn schedule(&mut self, task: T) -> bool {
        if self.queue.contains(&task) {
            trace!("schedule: task already pending, coalesced");
            return false;
        }
        self.queue.push(task);
        self.armed = true;
        true
    }

    /// Whether a batch is armed and waiting to be drained.
    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Number of tasks in the pending batch.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Capture and clear the pending batch, disarming the scheduler.
    ///
    /// Tasks scheduled while the caller works through the returned batch
    /// populate a fresh queue and re-arm the scheduler for the next tick.
    /// Returns an empty batch when nothing is armed.
    pub fn take_batch(&mut self) -> Vec<T> {
        if !self.armed {
            return Vec::new();
        }
        self.armed = false;
        std::mem::take(&mut self.queue)
    }
}

impl<T: PartialEq> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}
