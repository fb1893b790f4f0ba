use std::fmt;
use std::ops::Range;

use crate::error::SortError;

/// An inclusive index range `[left, right]` of the shared array that still has to be sorted.
///
/// Tasks are only ever created for ranges holding at least two elements, a range of length one or
/// zero is already sorted and never materializes as a task.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Task {
    left: usize,
    right: usize,
}

impl Task {
    /// Returns the task for `[left, right]` if that range needs sorting, i.e. `left < right`.
    #[inline]
    pub fn non_trivial(left: usize, right: usize) -> Option<Self> {
        (left < right).then_some(Self { left, right })
    }

    /// The task covering a whole array of `len` elements, `None` for `len <= 1`.
    #[inline]
    pub fn whole(len: usize) -> Option<Self> {
        Self::non_trivial(0, len.checked_sub(1)?)
    }

    #[inline]
    pub fn left(&self) -> usize {
        self.left
    }

    #[inline]
    pub fn right(&self) -> usize {
        self.right
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.right - self.left + 1
    }

    /// The sub-ranges left and right of the final pivot position `pivot`, each only if it still
    /// needs sorting.
    #[inline]
    pub fn split(&self, pivot: usize) -> [Option<Task>; 2] {
        self.split_around(pivot..pivot + 1)
    }

    /// Like [`Task::split`], for a non-empty run `placed` of absolute indices that is already in its
    /// final position.
    pub fn split_around(&self, placed: Range<usize>) -> [Option<Task>; 2] {
        debug_assert!(self.left <= placed.start && placed.start < placed.end);
        debug_assert!(placed.end <= self.right + 1);

        let below = placed
            .start
            .checked_sub(1)
            .and_then(|end| Self::non_trivial(self.left, end));
        let above = Self::non_trivial(placed.end, self.right);

        [below, above]
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.left, self.right)
    }
}

/// Fixed-capacity FIFO ring buffer of pending tasks.
///
/// Not synchronized on its own, see [`crate::coordinator::Coordinator`] which owns one behind the
/// same lock as the in-flight counter. Storage grows on demand up to `capacity`, so a generous
/// capacity costs nothing until it is actually used.
#[derive(Debug)]
pub struct TaskQueue {
    slots: Vec<Task>,
    front: usize,
    rear: usize,
    count: usize,
    capacity: usize,
}

impl TaskQueue {
    /// Creates an empty queue, a `capacity` of zero is rejected as [`SortError::InvalidConfig`].
    pub fn new(capacity: usize) -> Result<Self, SortError> {
        if capacity == 0 {
            return Err(SortError::invalid_config(
                "task queue capacity must be at least 1",
            ));
        }

        Ok(Self {
            slots: Vec::new(),
            front: 0,
            rear: 0,
            count: 0,
            capacity,
        })
    }

    /// Appends `task` at the rear. A full queue is an error, the task is handed back inside it and
    /// never silently dropped.
    pub fn push(&mut self, task: Task) -> Result<(), SortError> {
        if self.count == self.capacity {
            return Err(SortError::CapacityExceeded {
                task,
                capacity: self.capacity,
            });
        }

        // Until the buffer has been fully grown `rear` never wraps and always equals `slots.len()`.
        if self.rear == self.slots.len() {
            self.slots.push(task);
        } else {
            self.slots[self.rear] = task;
        }

        self.rear = (self.rear + 1) % self.capacity;
        self.count += 1;

        Ok(())
    }

    /// Removes and returns the task at the front.
    pub fn pop(&mut self) -> Option<Task> {
        if self.count == 0 {
            return None;
        }

        let task = self.slots[self.front];
        self.front = (self.front + 1) % self.capacity;
        self.count -= 1;

        Some(task)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.count == self.capacity
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drops every pending task.
    pub fn clear(&mut self) {
        self.front = 0;
        self.rear = 0;
        self.count = 0;
        self.slots.clear();
    }
}
