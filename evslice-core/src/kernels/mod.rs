pub mod count_image;
pub mod voxel_grid;

pub use voxel_grid::VoxelGrid;
