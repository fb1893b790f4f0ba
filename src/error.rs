use std::io;

use thiserror::Error;

use crate::coordinator::Phase;
use crate::queue::Task;

/// Everything that can stop a pool sort before the input is fully ordered.
#[derive(Debug, Error)]
pub enum SortError {
    /// Rejected before any worker thread was started.
    #[error("invalid sort configuration: {reason}")]
    InvalidConfig { reason: String },

    /// The task queue was full when a worker tried to hand back a sub-range. The sort is abandoned,
    /// `task` is the range that could not be enqueued and was left unsorted.
    #[error("task queue capacity {capacity} exceeded while enqueueing range {task}")]
    CapacityExceeded { task: Task, capacity: usize },

    /// A task was handed to a coordinator that has already finished or been aborted.
    #[error("coordinator is {phase:?}, no more tasks are accepted")]
    NotRunning { phase: Phase },

    /// The OS refused to start a worker thread.
    #[error("failed to spawn sort worker thread")]
    Spawn(#[source] io::Error),
}

impl SortError {
    pub(crate) fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }
}
