use crate::kernels::voxel_grid::VoxelGrid;

/// Per-polarity event count image.
///
/// Accumulates +1 per event into a 2-channel (H, W) grid: channel 0 counts
/// positive events, channel 1 negative events. Unlike the voxel kernel this
/// path masks coordinates outside [0, W) x [0, H) instead of erroring, so it
/// tolerates rectified coordinates pushed off-sensor near the image border.
///
/// `normalize` applies the shared per-channel non-zero normalization.
///
/// Panics if the coordinate and polarity columns disagree in length, or a
/// sensor dimension is zero.
pub fn to_count_image(
    xs: &[f32],
    ys: &[f32],
    ps: &[i8],
    width: usize,
    height: usize,
    normalize: bool,
) -> VoxelGrid {
    assert!(
        xs.len() == ys.len() && xs.len() == ps.len(),
        "event columns must have identical lengths"
    );

    let mut grid = VoxelGrid::zeros(2, height, width);
    for i in 0..xs.len() {
        let x = xs[i];
        let y = ys[i];
        // Mask out-of-bounds coordinates (also drops NaN).
        if !(x >= 0.0 && y >= 0.0 && x < width as f32 && y < height as f32) {
            continue;
        }
        let channel = if ps[i] > 0 { 0 } else { 1 };
        grid.add(channel, x as usize, y as usize, 1.0);
    }

    if normalize {
        grid.normalize();
    }
    grid
}
