//! Single pass in-place partition around a median-of-three pivot.
//!
//! These functions only ever see the sub-slice belonging to one task, indices are relative to that
//! sub-slice. They never allocate and the only mutation they perform is swapping.

use std::cmp::Ordering;
use std::ops::Range;

/// Returns the index of the median of `v[0]`, `v[mid]` and `v[len - 1]` where
/// `mid = (len - 1) / 2`.
///
/// For equal candidates any of them may be returned. Panics if `v` is empty.
pub fn median_of_three<T, F>(v: &[T], is_less: &mut F) -> usize
where
    F: FnMut(&T, &T) -> bool,
{
    let a = 0;
    let c = v.len() - 1;
    let b = c / 2;

    let x = is_less(&v[a], &v[b]);
    let y = is_less(&v[a], &v[c]);
    if x == y {
        // `v[a]` is either the smallest or the largest of the three, so the median is the other
        // candidate that lies between `v[b]` and `v[c]`.
        let z = is_less(&v[b], &v[c]);
        if z ^ x {
            c
        } else {
            b
        }
    } else {
        a
    }
}

/// Re-arranges `v` so that every element that compares true for `is_less(elem, pivot)` precedes the
/// pivot and every other element follows it. Returns the final position of the pivot.
///
/// The pivot is picked with [`median_of_three`] and moved to the end before a single forward scan.
/// Elements equal to the pivot end up on its right. `v` must hold at least one element.
///
/// If `is_less` does not implement a total order the resulting order is unspecified, but `v` keeps
/// all of its original elements. Same is true if `is_less` panics.
pub fn partition_by<T, F>(v: &mut [T], is_less: &mut F) -> usize
where
    F: FnMut(&T, &T) -> bool,
{
    let len = v.len();
    assert!(len > 0, "cannot partition an empty range");

    let pivot_pos = median_of_three(v, is_less);
    v.swap(pivot_pos, len - 1);

    // Splitting off the pivot guarantees that it can't alias with the scanned elements, so the scan
    // needs no copy of the pivot value.
    let (rest, pivot) = v.split_at_mut(len - 1);
    let pivot = &pivot[0];

    let mut num_lt = 0;
    for i in 0..rest.len() {
        if is_less(&rest[i], pivot) {
            rest.swap(num_lt, i);
            num_lt += 1;
        }
    }

    // Place the pivot between the two partitions.
    v.swap(num_lt, len - 1);

    num_lt
}

/// [`partition_by`], followed by a second scan if the pivot turned out to be the smallest element of
/// `v`. That scan gathers every element equal to the pivot right behind it.
///
/// Returns the range of `v` that holds the pivot and its equal elements, which is in its final
/// place. Outside of that case the range is just the pivot. Without the second scan, a run of `n`
/// equal elements peels off one element per partition, `n` partitions of quadratic total cost.
pub fn partition_with_run<T, F>(v: &mut [T], is_less: &mut F) -> Range<usize>
where
    F: FnMut(&T, &T) -> bool,
{
    let mid = partition_by(v, is_less);
    if mid != 0 {
        return mid..mid + 1;
    }

    // Nothing is less than the pivot, so everything `!is_less(pivot, elem)` is equal to it.
    let (pivot, rest) = v.split_at_mut(1);
    let pivot = &pivot[0];

    let mut num_eq = 0;
    for i in 0..rest.len() {
        if !is_less(pivot, &rest[i]) {
            rest.swap(num_eq, i);
            num_eq += 1;
        }
    }

    0..num_eq + 1
}

/// [`partition_by`] using the natural order of `T`.
#[inline]
pub fn partition<T: Ord>(v: &mut [T]) -> usize {
    partition_by(v, &mut |a: &T, b: &T| a.lt(b))
}

/// Adapts a three-way comparison into the `is_less` form the partition works with.
#[inline]
pub fn is_less_from<T, F>(compare: &F) -> impl Fn(&T, &T) -> bool + '_
where
    F: Fn(&T, &T) -> Ordering,
{
    move |a: &T, b: &T| compare(a, b) == Ordering::Less
}
