use std::thread;
use std::time::Duration;

use log::{trace, warn};

use crate::coordinator::Coordinator;
use crate::partition::partition_with_run;
use crate::serial;
use crate::shared::SharedSlice;

/// Body of one pool thread. Pulls tasks until the coordinator reports that the sort is finished or
/// aborted, and returns how many tasks this worker resolved.
///
/// Ranges of at most `serial_threshold` elements are sorted right here instead of being split
/// into more tasks.
pub(crate) fn run<T, F>(
    id: usize,
    coordinator: &Coordinator,
    v: &SharedSlice<'_, T>,
    is_less: &F,
    serial_threshold: Option<usize>,
    resolve_delay: Option<Duration>,
) -> usize
where
    F: Fn(&T, &T) -> bool,
{
    // If `is_less` panics the task stays in flight forever, the other workers and the orchestrator
    // would wait on it indefinitely without this.
    let _guard = AbandonOnUnwind { id, coordinator };

    trace!("sort worker {id} started");

    let mut is_less = is_less;
    let mut resolved = 0;

    while let Some(task) = coordinator.dequeue() {
        // SAFETY: The coordinator hands out each task exactly once, and tasks alive at the same
        // time never overlap, children only cover the range of their parent minus the placed pivots.
        let range = unsafe { v.range_mut(task) };

        if serial_threshold.is_some_and(|threshold| task.len() <= threshold) {
            serial::quicksort(range, &mut is_less);
            coordinator.resolve(None);
            resolved += 1;
            continue;
        }

        let placed = partition_with_run(range, &mut is_less);
        let placed = task.left() + placed.start..task.left() + placed.end;

        if let Some(delay) = resolve_delay {
            thread::sleep(delay);
        }

        coordinator.resolve(task.split_around(placed).into_iter().flatten());
        resolved += 1;
    }

    trace!("sort worker {id} exiting after {resolved} tasks");

    resolved
}

struct AbandonOnUnwind<'a> {
    id: usize,
    coordinator: &'a Coordinator,
}

impl Drop for AbandonOnUnwind<'_> {
    fn drop(&mut self) {
        if thread::panicking() {
            warn!("sort worker {} panicked, abandoning sort", self.id);
            self.coordinator.abandon();
        }
    }
}
