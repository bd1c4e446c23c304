//! Thin-waist interfaces over the opaque collaborators.
//!
//! The core never touches the on-disk log or calibration formats; it consumes
//! them through these minimal contracts:
//! - EventStore: random-access, time-indexed event log (read-only handle)
//! - FlowProvider: optional ground-truth flow lookup by step index
//!
//! Notes
//! - Event columns use a fixed schema: (t: i64 microseconds, x: u16, y: u16, p: i8)
//! - Stores must be time-sorted (non-decreasing t)
//! - This module intentionally has no file-format dependency; decoders live elsewhere.

use crate::error::SliceError;
use crate::events::EventBatch;
use crate::time_index::TimeIndex;

/// Random-access, time-indexed event store.
///
/// Contract:
/// - Offsets are positions in the time-sorted event array, `0..total_count()`
/// - `read_*` takes half-open `[lo, hi)` ranges with `lo <= hi <= total_count()`
/// - Reads are pure: repeated reads of the same range return identical data
pub trait EventStore {
    /// Total number of events in the log.
    fn total_count(&self) -> usize;

    /// Precomputed coarse millisecond table carried by the log format, if any.
    ///
    /// When present it is adopted verbatim; otherwise the index is rebuilt
    /// from the full timestamp array at sequence open.
    fn ms_to_idx_table(&self) -> Option<&[u64]>;

    /// Bulk read of the timestamp column over `[lo, hi)`.
    fn read_timestamps(&self, lo: usize, hi: usize) -> Vec<i64>;

    /// Bulk read of all four columns over `[lo, hi)`.
    fn read_batch(&self, lo: usize, hi: usize) -> EventBatch;
}

/// In-memory columnar event store.
///
/// Backs tests, benchmarks, and callers that already hold full columns
/// (e.g. bindings fed whole arrays). Construction validates the schema.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    events: EventBatch,
    ms_to_idx: Option<Vec<u64>>,
}

impl MemoryStore {
    /// Build a store from full columns. Timestamps must be non-decreasing.
    pub fn from_columns(
        t: Vec<i64>,
        x: Vec<u16>,
        y: Vec<u16>,
        p: Vec<i8>,
    ) -> Result<Self, SliceError> {
        let events = EventBatch { t, x, y, p };
        events.validate(true)?;
        Ok(Self {
            events,
            ms_to_idx: None,
        })
    }

    /// Attach a precomputed millisecond table, as a real log file would carry.
    pub fn with_ms_to_idx(mut self, table: Vec<u64>) -> Self {
        self.ms_to_idx = Some(table);
        self
    }

    /// Derive the millisecond table from the stored timestamps and attach it.
    pub fn with_derived_ms_to_idx(mut self) -> Self {
        let index = TimeIndex::from_timestamps(&self.events.t);
        let table: Vec<u64> = (0..index.len())
            .map(|ms| index.ms_to_idx(ms as i64).unwrap_or(0) as u64)
            .collect();
        self.ms_to_idx = Some(table);
        self
    }
}

impl EventStore for MemoryStore {
    fn total_count(&self) -> usize {
        self.events.len()
    }

    fn ms_to_idx_table(&self) -> Option<&[u64]> {
        self.ms_to_idx.as_deref()
    }

    fn read_timestamps(&self, lo: usize, hi: usize) -> Vec<i64> {
        assert!(lo <= hi && hi <= self.events.len(), "read range out of bounds");
        self.events.t[lo..hi].to_vec()
    }

    fn read_batch(&self, lo: usize, hi: usize) -> EventBatch {
        assert!(lo <= hi && hi <= self.events.len(), "read range out of bounds");
        EventBatch {
            t: self.events.t[lo..hi].to_vec(),
            x: self.events.x[lo..hi].to_vec(),
            y: self.events.y[lo..hi].to_vec(),
            p: self.events.p[lo..hi].to_vec(),
        }
    }
}

/// Dense ground-truth flow field with a per-pixel validity mask.
///
/// `flow` is (2, H, W) flattened in row-major (C-order): channel 0 holds the
/// x-displacement, channel 1 the y-displacement.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowSample {
    pub flow: Vec<f32>,
    pub valid: Vec<bool>,
    pub height: usize,
    pub width: usize,
}

/// Optional ground-truth collaborator, located purely by step index.
pub trait FlowProvider {
    /// Number of ground-truth samples available.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Ground truth for step `index`, `None` when no sample exists there.
    fn flow_at(&self, index: usize) -> Option<FlowSample>;
}
