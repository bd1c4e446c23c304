/// Microseconds per coarse index bucket.
pub const US_PER_MS: i64 = 1000;

fn lower_bound(times: &[i64], target: i64) -> usize {
    // First index i where times[i] >= target
    match times.binary_search_by(|probe| {
        if *probe < target {
            std::cmp::Ordering::Less
        } else {
            std::cmp::Ordering::Greater
        }
    }) {
        Ok(_) => unreachable!("binary_search_by with custom comparator should not return Ok"),
        Err(idx) => idx,
    }
}

/// Coarse millisecond index over a sorted timestamp array.
///
/// Bucket `ms` stores the offset of the first event with `t >= ms * 1000`.
/// Offsets are monotonic; a millisecond with no events shares its offset with
/// the following bucket. Built once per sequence, O(1) per lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeIndex {
    ms_to_idx: Vec<usize>,
}

impl TimeIndex {
    /// Adopt a precomputed millisecond table as stored alongside the event log.
    pub fn from_table(table: &[u64]) -> Self {
        Self {
            ms_to_idx: table.iter().map(|&v| v as usize).collect(),
        }
    }

    /// Build the table from the full sorted timestamp array (microseconds).
    ///
    /// The table covers buckets `0..=floor(t_last / 1000) + 1`, so a window
    /// ending within the last recorded millisecond still resolves; the final
    /// bucket maps past the last event. Empty input yields an empty table.
    pub fn from_timestamps(t_us: &[i64]) -> Self {
        let Some(&t_last) = t_us.last() else {
            return Self { ms_to_idx: Vec::new() };
        };
        let n_buckets = (t_last / US_PER_MS) as usize + 2;
        let mut ms_to_idx = Vec::with_capacity(n_buckets);
        for ms in 0..n_buckets {
            ms_to_idx.push(lower_bound(t_us, ms as i64 * US_PER_MS));
        }
        Self { ms_to_idx }
    }

    /// Number of millisecond buckets in the table.
    #[inline]
    pub fn len(&self) -> usize {
        self.ms_to_idx.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ms_to_idx.is_empty()
    }

    /// Offset of the first event at or after millisecond `ms`.
    ///
    /// Returns `None` iff `ms` is negative or at/past the table length. Within
    /// range the lookup never fails; buckets covering empty milliseconds
    /// return the same offset as their successors.
    #[inline]
    pub fn ms_to_idx(&self, ms: i64) -> Option<usize> {
        if ms < 0 {
            return None;
        }
        self.ms_to_idx.get(ms as usize).copied()
    }

    /// Conservative event-offset range covering `[t_start_us, t_end_us)`.
    ///
    /// Looks up the millisecond window `[floor(t_start/1000), ceil(t_end/1000)]`.
    /// Returns `None` when either boundary falls past the table, which signals
    /// end of the indexed range rather than an error.
    pub fn coarse_range(&self, t_start_us: i64, t_end_us: i64) -> Option<(usize, usize)> {
        let ms_lo = t_start_us.div_euclid(US_PER_MS);
        let ms_hi = t_end_us.div_euclid(US_PER_MS)
            + if t_end_us.rem_euclid(US_PER_MS) != 0 { 1 } else { 0 };
        let lo = self.ms_to_idx(ms_lo)?;
        let hi = self.ms_to_idx(ms_hi)?;
        Some((lo, hi))
    }
}
