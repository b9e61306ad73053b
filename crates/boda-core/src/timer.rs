//! Timers owned by a flow instance.
//!
//! A flow that needs deferred or repeating work spawns it through its own
//! [`ScheduledTasks`]. Cancelling the set, or dropping it together with the
//! flow, aborts everything still pending, so nothing fires after teardown.

use std::future::Future;

use tokio::task::JoinHandle;

/// A set of background tasks aborted together.
#[derive(Debug, Default)]
pub struct ScheduledTasks {
    handles: Vec<JoinHandle<()>>,
}

impl ScheduledTasks {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawns `task` immediately.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn<F>(&mut self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.prune();
        self.handles.push(tokio::spawn(task));
    }

    /// Aborts every pending task.
    pub fn cancel_all(&mut self) {
        for handle in self.handles.drain(..) {
            handle.abort();
        }
    }

    /// Number of tasks that have not finished yet.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.handles.iter().filter(|h| !h.is_finished()).count()
    }

    fn prune(&mut self) {
        self.handles.retain(|h| !h.is_finished());
    }
}

impl Drop for ScheduledTasks {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
