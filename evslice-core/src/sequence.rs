use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::SliceError;
use crate::kernels::voxel_grid::{to_voxel_grid, VoxelGrid};
use crate::rectify::RectifyMap;
use crate::slicer::EventSlicer;
use crate::store::EventStore;
use crate::time_index::TimeIndex;
use crate::windowing::{WindowPlan, WindowingConfig};

/// Per-sequence representation parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceConfig {
    /// Sensor width in pixels.
    pub width: usize,
    /// Sensor height in pixels.
    pub height: usize,
    /// Temporal channels per voxel grid.
    pub num_bins: usize,
    /// Whether grids are normalized (per-channel non-zero mean 0 / std 1).
    pub normalize: bool,
    pub windowing: WindowingConfig,
}

impl Default for SequenceConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            num_bins: 4,
            normalize: false,
            windowing: WindowingConfig::default(),
        }
    }
}

/// One opened recording: the read-only time index and rectify map plus the
/// window plan over its target timestamps.
///
/// All per-query state lives in the returned batches and grids, so a
/// `Sequence` may serve queries from one worker thread while other workers
/// drive their own sequences; nothing is shared across instances.
#[derive(Debug)]
pub struct Sequence<S: EventStore> {
    slicer: EventSlicer<S>,
    rectify: RectifyMap,
    plan: WindowPlan,
    config: SequenceConfig,
}

impl<S: EventStore> Sequence<S> {
    /// One-time bulk load of the sequence.
    ///
    /// Adopts the store's precomputed millisecond table when it carries one,
    /// otherwise builds the index from the full timestamp array. The rebase
    /// offset is fixed here to the first recorded event's timestamp, so all
    /// returned batches carry recording-relative time. Blocking at open is
    /// acceptable; none of this work is repeated per query.
    pub fn open(
        store: S,
        rectify: RectifyMap,
        targets: Vec<i64>,
        config: SequenceConfig,
    ) -> Result<Self, SliceError> {
        if rectify.width() != config.width || rectify.height() != config.height {
            return Err(SliceError::DimensionMismatch {
                map_width: rectify.width(),
                map_height: rectify.height(),
                width: config.width,
                height: config.height,
            });
        }

        let n = store.total_count();
        let index = match store.ms_to_idx_table() {
            Some(table) => TimeIndex::from_table(table),
            None => TimeIndex::from_timestamps(&store.read_timestamps(0, n)),
        };
        let t_offset = if n > 0 { store.read_timestamps(0, 1)[0] } else { 0 };

        debug!(
            events = n,
            index_buckets = index.len(),
            t_offset,
            steps = targets.len(),
            "opened event sequence"
        );

        Ok(Self {
            slicer: EventSlicer::new(store, index, t_offset),
            rectify,
            plan: WindowPlan::new(targets, config.windowing),
            config,
        })
    }

    /// Slice, rectify, and voxelize one absolute-time window.
    ///
    /// `Ok(None)` when the window falls past the indexed range; repeated calls
    /// with the same window return identical grids (the source is read-only).
    pub fn query(&self, t_start_us: i64, t_end_us: i64) -> Result<Option<VoxelGrid>, SliceError> {
        let Some(batch) = self.slicer.get_events(t_start_us, t_end_us) else {
            return Ok(None);
        };
        let (rx, ry) = self.rectify.rectify(&batch.x, &batch.y);
        let grid = to_voxel_grid(
            &rx,
            &ry,
            &batch.t,
            &batch.p,
            self.config.width,
            self.config.height,
            self.config.num_bins,
            None,
            self.config.normalize,
        )?;
        Ok(Some(grid))
    }

    /// Voxel grids for a run of `run_len` consecutive windows ending at
    /// successive targets from `step`, plus the new-sequence flag for `step`.
    ///
    /// `Ok(None)` when `step` is not a valid starting point (run straddles a
    /// recording cut or exceeds the targets) or when any window falls past
    /// the indexed range. Partial runs are never returned.
    pub fn query_windowed(
        &self,
        step: usize,
        run_len: usize,
    ) -> Result<Option<(Vec<VoxelGrid>, bool)>, SliceError> {
        let Some(windows) = self.plan.windows_at(step, run_len) else {
            return Ok(None);
        };
        let mut grids = Vec::with_capacity(windows.len());
        for w in &windows {
            match self.query(w.start_us, w.end_us)? {
                Some(grid) => grids.push(grid),
                None => return Ok(None),
            }
        }
        Ok(Some((grids, self.plan.is_new_sequence(step))))
    }

    /// Number of steps in the window plan.
    #[inline]
    pub fn len(&self) -> usize {
        self.plan.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.plan.is_empty()
    }

    #[inline]
    pub fn plan(&self) -> &WindowPlan {
        &self.plan
    }

    #[inline]
    pub fn config(&self) -> &SequenceConfig {
        &self.config
    }

    #[inline]
    pub fn slicer(&self) -> &EventSlicer<S> {
        &self.slicer
    }

    #[inline]
    pub fn rectify_map(&self) -> &RectifyMap {
        &self.rectify
    }
}
