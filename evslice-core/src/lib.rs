/*!
Core CPU kernels for evslice: microsecond window slicing over time-indexed
event logs, lens rectification, and voxel-grid accumulation.
*/

pub mod error;
pub mod events;
pub mod kernels;
pub mod rectify;
pub mod sequence;
pub mod slicer;
pub mod store;
pub mod time_index;
pub mod windowing;

pub use error::SliceError;
pub use events::EventBatch;
pub use kernels::voxel_grid::VoxelGrid;
pub use rectify::RectifyMap;
pub use sequence::{Sequence, SequenceConfig};
pub use slicer::EventSlicer;
pub use store::{EventStore, MemoryStore};
pub use time_index::TimeIndex;
pub use windowing::{Window, WindowPlan, WindowingConfig};
