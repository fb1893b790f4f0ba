/// A sort implementation under test. Implementations may sort on several threads, so elements must
/// be `Send` and comparators `Sync`.
pub trait Sort {
    fn name() -> String;

    fn sort<T>(arr: &mut [T])
    where
        T: Ord + Send;

    fn sort_by<T, F>(arr: &mut [T], compare: F)
    where
        T: Send,
        F: Fn(&T, &T) -> std::cmp::Ordering + Sync;
}

pub mod patterns;
