//! Single-threaded quicksort over the same partition as the pool sort. Serves as the baseline the
//! parallel version is measured against.

use std::cmp::Ordering;

use crate::partition::{is_less_from, partition_with_run};

pub fn sort<T: Ord>(v: &mut [T]) {
    quicksort(v, &mut |a: &T, b: &T| a.lt(b));
}

pub fn sort_by<T, F>(v: &mut [T], compare: F)
where
    F: Fn(&T, &T) -> Ordering,
{
    quicksort(v, &mut is_less_from(&compare));
}

/// Recurses into the shorter side and loops on the longer one, so the stack depth stays
/// logarithmic even when every partition is maximally unbalanced.
pub(crate) fn quicksort<T, F>(mut v: &mut [T], is_less: &mut F)
where
    F: FnMut(&T, &T) -> bool,
{
    while v.len() > 1 {
        let placed = partition_with_run(v, is_less);

        let (left, right) = v.split_at_mut(placed.start);
        let right = &mut right[placed.len()..];

        if left.len() < right.len() {
            quicksort(left, is_less);
            v = right;
        } else {
            quicksort(right, is_less);
            v = left;
        }
    }
}
