use crate::events::EventBatch;
use crate::store::EventStore;
use crate::time_index::TimeIndex;

/// Exact `[idx_start, idx_end)` bounds of `[t_start_us, t_end_us)` within a
/// coarse timestamp sub-array.
///
/// Semantics:
/// - `idx_start` is the first offset with `t >= t_start_us` (sub-array length
///   if none). When the sub-array's first timestamp already exceeds
///   `t_start_us` the whole sub-array is in-window (`idx_start = 0`); this
///   conservative lower bound may admit events slightly before the window
///   start and is deliberately not tightened.
/// - `idx_end` is one past the last offset with `t < t_end_us`, found by
///   scanning from the end (0 if none).
///
/// Kept separate from the coarse lookup so each step is testable on its own.
pub fn narrow_window(t_us: &[i64], t_start_us: i64, t_end_us: i64) -> (usize, usize) {
    let idx_start = match t_us.first() {
        Some(&t0) if t0 > t_start_us => 0,
        _ => t_us
            .iter()
            .position(|&t| t >= t_start_us)
            .unwrap_or(t_us.len()),
    };
    let idx_end = t_us
        .iter()
        .rposition(|&t| t < t_end_us)
        .map_or(0, |i| i + 1);
    (idx_start, idx_end)
}

/// Extracts microsecond windows from a time-indexed event store.
///
/// Lookup is two-phase: the coarse millisecond index gives a conservative
/// offset range in O(1), then a bounded linear scan over that range finds the
/// exact window boundaries. Returned timestamps are rebased by the fixed
/// per-sequence offset so they are relative, not absolute.
#[derive(Debug)]
pub struct EventSlicer<S: EventStore> {
    store: S,
    index: TimeIndex,
    t_offset: i64,
}

impl<S: EventStore> EventSlicer<S> {
    pub fn new(store: S, index: TimeIndex, t_offset: i64) -> Self {
        Self {
            store,
            index,
            t_offset,
        }
    }

    /// Events within `[t_start_us, t_end_us)`, timestamps rebased.
    ///
    /// Returns `None` when either boundary millisecond falls past the index
    /// table. That is the normal end-of-stream condition, not an error, and
    /// callers must not treat it as fatal. A window that resolves in the index
    /// but contains no events yields an empty batch.
    ///
    /// Panics if `t_start_us >= t_end_us`.
    pub fn get_events(&self, t_start_us: i64, t_end_us: i64) -> Option<EventBatch> {
        assert!(
            t_start_us < t_end_us,
            "window start {} must precede window end {}",
            t_start_us,
            t_end_us
        );

        let (lo, hi) = self.index.coarse_range(t_start_us, t_end_us)?;
        let hi = hi.min(self.store.total_count());
        if lo >= hi {
            return Some(EventBatch::default());
        }

        let coarse_t = self.store.read_timestamps(lo, hi);
        let (a, b) = narrow_window(&coarse_t, t_start_us, t_end_us);
        if a >= b {
            return Some(EventBatch::default());
        }

        let mut batch = self.store.read_batch(lo + a, lo + b);
        for t in &mut batch.t {
            *t -= self.t_offset;
        }
        Some(batch)
    }

    /// Fixed rebase offset subtracted from every returned timestamp.
    #[inline]
    pub fn t_offset(&self) -> i64 {
        self.t_offset
    }

    #[inline]
    pub fn index(&self) -> &TimeIndex {
        &self.index
    }

    #[inline]
    pub fn store(&self) -> &S {
        &self.store
    }
}
