use crate::error::SliceError;

/// Owned columnar event batch.
///
/// Invariants:
/// - All columns have identical length N
/// - t is non-decreasing (microseconds, duplicates allowed)
/// - p values are conventionally in {-1, 1}
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventBatch {
    /// Timestamps in microseconds
    pub t: Vec<i64>,
    /// X-coordinates (column)
    pub x: Vec<u16>,
    /// Y-coordinates (row)
    pub y: Vec<u16>,
    /// Polarities: expected values -1/1. Kernels map non-positive values to -1.0.
    pub p: Vec<i8>,
}

impl EventBatch {
    pub fn with_capacity(n: usize) -> Self {
        Self {
            t: Vec::with_capacity(n),
            x: Vec::with_capacity(n),
            y: Vec::with_capacity(n),
            p: Vec::with_capacity(n),
        }
    }

    /// Number of events in this batch.
    #[inline]
    pub fn len(&self) -> usize {
        self.t.len()
    }

    /// Whether the batch is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn push(&mut self, t: i64, x: u16, y: u16, p: i8) {
        self.t.push(t);
        self.x.push(x);
        self.y.push(y);
        self.p.push(p);
    }

    /// Validate column lengths and optional monotonicity of timestamps.
    ///
    /// Checks:
    /// - All columns share the same length
    /// - t is non-decreasing if `check_monotonic` is true
    pub fn validate(&self, check_monotonic: bool) -> Result<(), SliceError> {
        let n = self.t.len();
        if self.x.len() != n || self.y.len() != n || self.p.len() != n {
            return Err(SliceError::ColumnMismatch {
                t: n,
                x: self.x.len(),
                y: self.y.len(),
                p: self.p.len(),
            });
        }
        if check_monotonic && n > 1 {
            for i in 1..n {
                if self.t[i] < self.t[i - 1] {
                    return Err(SliceError::NonMonotonicTimestamps {
                        index: i,
                        previous: self.t[i - 1],
                        current: self.t[i],
                    });
                }
            }
        }
        Ok(())
    }

    /// Returns whether t is globally non-decreasing.
    #[inline]
    pub fn is_monotonic_non_decreasing(&self) -> bool {
        self.t.windows(2).all(|w| w[0] <= w[1])
    }
}
