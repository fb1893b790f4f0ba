//! Shared task queue plus termination detection for one sort invocation.
//!
//! The queue and the in-flight counter live behind a single mutex. Global completion is
//! `in_flight == 0 && queue.is_empty()`, and because a worker enqueues the children of its task and
//! gives up the task inside the same critical section, the queue can never be observed empty while
//! a resolved task still owes children.

use log::{debug, warn};
use parking_lot::{Condvar, Mutex};

use crate::error::SortError;
use crate::queue::{Task, TaskQueue};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    Running,
    /// Every range was sorted. Terminal.
    Done,
    /// The sort was given up, either because of a recorded failure or because a worker panicked.
    /// Terminal.
    Aborted,
}

/// Snapshot of the bookkeeping, mostly useful for diagnostics and tests.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Counters {
    pub queued: usize,
    pub in_flight: usize,
    pub tasks_processed: usize,
    pub peak_queued: usize,
}

#[derive(Debug)]
struct State {
    queue: TaskQueue,
    in_flight: usize,
    phase: Phase,
    failure: Option<SortError>,
    tasks_processed: usize,
    peak_queued: usize,
}

impl State {
    fn push(&mut self, task: Task) -> Result<(), SortError> {
        self.queue.push(task)?;
        self.peak_queued = self.peak_queued.max(self.queue.len());
        Ok(())
    }

    fn counters(&self) -> Counters {
        Counters {
            queued: self.queue.len(),
            in_flight: self.in_flight,
            tasks_processed: self.tasks_processed,
            peak_queued: self.peak_queued,
        }
    }

    fn shut_down(&mut self, failure: Option<SortError>) {
        if self.phase != Phase::Running {
            return;
        }

        self.phase = Phase::Aborted;
        self.failure = failure;
        self.queue.clear();
    }
}

pub struct Coordinator {
    state: Mutex<State>,
    // Waited on by workers, predicate: `!queue.is_empty() || phase != Running`.
    work: Condvar,
    // Waited on by the orchestrator, predicate: `phase != Running`.
    settled: Condvar,
}

impl Coordinator {
    /// Fails with [`SortError::InvalidConfig`] for a `queue_capacity` of zero.
    pub fn new(queue_capacity: usize) -> Result<Self, SortError> {
        Ok(Self {
            state: Mutex::new(State {
                queue: TaskQueue::new(queue_capacity)?,
                in_flight: 0,
                phase: Phase::Running,
                failure: None,
                tasks_processed: 0,
                peak_queued: 0,
            }),
            work: Condvar::new(),
            settled: Condvar::new(),
        })
    }

    /// Enqueues the initial task, before or after the workers have been started.
    pub fn seed(&self, task: Task) -> Result<(), SortError> {
        let mut state = self.state.lock();
        if state.phase != Phase::Running {
            return Err(SortError::NotRunning { phase: state.phase });
        }

        state.push(task)?;
        self.work.notify_one();

        Ok(())
    }

    /// Blocks until a task is available and hands it out, marking it in-flight in the same critical
    /// section. Returns `None` once the sort is finished or aborted.
    pub fn dequeue(&self) -> Option<Task> {
        let mut state = self.state.lock();

        loop {
            if state.phase != Phase::Running {
                return None;
            }

            if let Some(task) = state.queue.pop() {
                state.in_flight += 1;
                return Some(task);
            }

            // Spurious wakeups just go around the loop again.
            self.work.wait(&mut state);
        }
    }

    /// Gives up one in-flight task after enqueueing its `children`, then checks for global
    /// completion. All of it happens as one transaction under the lock.
    ///
    /// If a child does not fit into the queue the whole sort is aborted and the failure is
    /// recorded, the calling worker will see `None` on its next `dequeue`.
    pub fn resolve(&self, children: impl IntoIterator<Item = Task>) {
        let mut state = self.state.lock();

        debug_assert!(state.in_flight > 0, "resolve without a matching dequeue");
        state.in_flight -= 1;

        if state.phase != Phase::Running {
            // Aborted while this task was being partitioned, its children don't matter anymore.
            return;
        }

        state.tasks_processed += 1;

        for child in children {
            if let Err(err) = state.push(child) {
                warn!("{err}, aborting sort");
                state.shut_down(Some(err));
                drop(state);
                self.wake_all();
                return;
            }

            self.work.notify_one();
        }

        if state.in_flight == 0 && state.queue.is_empty() {
            state.phase = Phase::Done;
            debug!(
                "all ranges sorted after {} tasks, peak queue depth {}",
                state.tasks_processed, state.peak_queued
            );
            drop(state);
            self.wake_all();
        }
    }

    /// Aborts the sort with `failure`. Only the first failure is kept, and a finished sort stays
    /// finished.
    pub fn fail(&self, failure: SortError) {
        self.state.lock().shut_down(Some(failure));
        self.wake_all();
    }

    /// Aborts the sort without recording a failure, used when a worker is unwinding.
    pub fn abandon(&self) {
        self.state.lock().shut_down(None);
        self.wake_all();
    }

    /// Blocks until the sort has either finished or been aborted.
    pub fn wait(&self) -> Phase {
        let mut state = self.state.lock();
        while state.phase == Phase::Running {
            self.settled.wait(&mut state);
        }

        state.phase
    }

    pub fn phase(&self) -> Phase {
        self.state.lock().phase
    }

    pub fn counters(&self) -> Counters {
        self.state.lock().counters()
    }

    /// Consumes the coordinator once all workers are gone, yielding the final counters or the
    /// recorded failure.
    pub fn into_result(self) -> Result<Counters, SortError> {
        let mut state = self.state.into_inner();

        match state.failure.take() {
            Some(err) => Err(err),
            None => Ok(state.counters()),
        }
    }

    fn wake_all(&self) {
        self.work.notify_all();
        self.settled.notify_all();
    }
}
