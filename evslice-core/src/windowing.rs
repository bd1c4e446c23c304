use serde::{Deserialize, Serialize};

/// Half-open microsecond time interval `[start_us, end_us)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Window {
    pub start_us: i64,
    pub end_us: i64,
}

impl Window {
    #[inline]
    pub fn duration_us(&self) -> i64 {
        self.end_us - self.start_us
    }
}

/// Windowing parameters over a sequence's target timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowingConfig {
    /// Length of each event window in microseconds.
    pub delta_t_us: i64,
    /// A gap between consecutive targets above this marks a recording cut.
    pub gap_threshold_us: i64,
    /// Per-step cap on target spacing for recurrent runs; a run whose mean
    /// step exceeds this straddles a cut and is not a valid starting point.
    pub max_step_us: i64,
}

impl Default for WindowingConfig {
    fn default() -> Self {
        Self {
            delta_t_us: 100_000,
            gap_threshold_us: 150_000,
            max_step_us: 150_000,
        }
    }
}

/// Position of a step relative to the recording structure.
///
/// Boundaries are emitted as data (the `new_sequence` flag), never as
/// control flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceState {
    /// Step 0; nothing precedes it.
    BeforeFirst,
    /// Target follows its predecessor within the gap threshold.
    InSequence,
    /// The gap from the previous target exceeds the threshold (recording cut).
    SequenceBoundary,
}

/// Maps dataset step indices onto event time windows.
///
/// Each monotonic target timestamp anchors the end of one window of
/// `delta_t_us` microseconds. Recurrent consumers take a fixed-length run of
/// consecutive windows ending at successive targets; runs that straddle a
/// recording cut are rejected rather than silently spanning the gap.
#[derive(Debug, Clone)]
pub struct WindowPlan {
    targets: Vec<i64>,
    config: WindowingConfig,
}

impl WindowPlan {
    /// Panics if the targets are not non-decreasing or `delta_t_us <= 0`.
    pub fn new(targets: Vec<i64>, config: WindowingConfig) -> Self {
        assert!(config.delta_t_us > 0, "delta_t_us must be positive");
        assert!(
            targets.windows(2).all(|w| w[0] <= w[1]),
            "target timestamps must be non-decreasing"
        );
        Self { targets, config }
    }

    /// Number of steps (one per target timestamp).
    #[inline]
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    #[inline]
    pub fn config(&self) -> &WindowingConfig {
        &self.config
    }

    #[inline]
    pub fn targets(&self) -> &[i64] {
        &self.targets
    }

    /// The single window ending at target `index`.
    ///
    /// Panics if `index` is out of range.
    pub fn window_at(&self, index: usize) -> Window {
        let end_us = self.targets[index];
        Window {
            start_us: end_us - self.config.delta_t_us,
            end_us,
        }
    }

    /// Where step `index` sits relative to recording cuts.
    pub fn state_at(&self, index: usize) -> SequenceState {
        if index == 0 {
            return SequenceState::BeforeFirst;
        }
        let gap = self.targets[index] - self.targets[index - 1];
        if gap > self.config.gap_threshold_us {
            SequenceState::SequenceBoundary
        } else {
            SequenceState::InSequence
        }
    }

    /// True exactly at step 0 and at the first step after a recording cut.
    #[inline]
    pub fn is_new_sequence(&self, index: usize) -> bool {
        !matches!(self.state_at(index), SequenceState::InSequence)
    }

    /// Whether a recurrent run of `run_len` windows may start at `index`.
    ///
    /// The run must fit within the targets and the spanned targets must stay
    /// under `max_step_us` per step; a larger span means the run crosses a
    /// recording cut.
    pub fn is_valid_start(&self, index: usize, run_len: usize) -> bool {
        if run_len == 0 || index + run_len > self.targets.len() {
            return false;
        }
        if run_len == 1 {
            return true;
        }
        let span = self.targets[index + run_len - 1] - self.targets[index];
        span <= self.config.max_step_us * (run_len - 1) as i64
    }

    /// `run_len` consecutive windows ending at targets `index..index+run_len`.
    ///
    /// Returns `None` when `index` is not a valid starting point. With targets
    /// spaced exactly `delta_t_us` apart the returned windows tile the
    /// interval (`w[k].end_us == w[k+1].start_us`).
    pub fn windows_at(&self, index: usize, run_len: usize) -> Option<Vec<Window>> {
        if !self.is_valid_start(index, run_len) {
            return None;
        }
        Some((index..index + run_len).map(|i| self.window_at(i)).collect())
    }
}
