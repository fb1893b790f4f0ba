use std::marker::PhantomData;

use crate::queue::Task;

/// The caller's slice, viewed by every worker at once.
///
/// No lock guards the elements. Exclusivity comes from the tasks themselves: a range is only ever
/// split into disjoint children, never merged or handed out twice, so at any point in time the
/// ranges held by workers are non-overlapping.
pub(crate) struct SharedSlice<'a, T> {
    base: *mut T,
    len: usize,
    _marker: PhantomData<&'a mut [T]>,
}

// SAFETY: Workers only access disjoint ranges, see `range_mut`. Handing `&mut T` to another thread
// requires `T: Send`, which is exactly what moving the `&mut [T]` into the pool would require.
unsafe impl<T: Send> Send for SharedSlice<'_, T> {}
unsafe impl<T: Send> Sync for SharedSlice<'_, T> {}

impl<'a, T> SharedSlice<'a, T> {
    pub fn new(v: &'a mut [T]) -> Self {
        Self {
            base: v.as_mut_ptr(),
            len: v.len(),
            _marker: PhantomData,
        }
    }

    /// Mutable access to the elements covered by `task`.
    ///
    /// # Safety
    ///
    /// The caller must be the sole holder of `task`, and no other live slice returned by this
    /// function may overlap with it.
    #[allow(clippy::mut_from_ref)]
    pub unsafe fn range_mut(&self, task: Task) -> &'a mut [T] {
        assert!(task.right() < self.len, "task {task} out of bounds for len {}", self.len);

        // SAFETY: In-bounds per the assert above, exclusivity is upheld by the caller.
        unsafe { std::slice::from_raw_parts_mut(self.base.add(task.left()), task.len()) }
    }
}
