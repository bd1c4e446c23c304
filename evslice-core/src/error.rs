use thiserror::Error;

/// Errors surfaced by the slicing and accumulation kernels.
///
/// Absence of data is not an error: window queries that fall past the indexed
/// range return `None`. These variants cover malformed inputs and corrupt
/// collaborator data, which must abort the operation rather than produce a
/// truncated result.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SliceError {
    #[error("event columns must have identical lengths (t={t}, x={x}, y={y}, p={p})")]
    ColumnMismatch { t: usize, x: usize, y: usize, p: usize },

    #[error("timestamps must be non-decreasing (t[{index}] = {current} after {previous})")]
    NonMonotonicTimestamps {
        index: usize,
        previous: i64,
        current: i64,
    },

    #[error("rectified coordinate ({x}, {y}) outside image extent {width}x{height}")]
    InvalidBounds {
        x: f32,
        y: f32,
        width: usize,
        height: usize,
    },

    #[error("rectify map holds {len} floats, expected {expected} for {width}x{height}x2")]
    RectifyMapShape {
        len: usize,
        expected: usize,
        width: usize,
        height: usize,
    },

    #[error("rectify map is {map_width}x{map_height} but the sequence is configured as {width}x{height}")]
    DimensionMismatch {
        map_width: usize,
        map_height: usize,
        width: usize,
        height: usize,
    },
}
