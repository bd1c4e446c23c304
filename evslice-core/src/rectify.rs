use crate::error::SliceError;

/// Dense per-pixel lens-rectification table.
///
/// Stores corrected (x, y) float coordinates for every raw pixel, flattened
/// (H, W, 2) in row-major (C-order). Loaded once per sequence and immutable
/// afterwards, so concurrent read-only sharing needs no locking.
#[derive(Debug, Clone, PartialEq)]
pub struct RectifyMap {
    map: Vec<f32>,
    width: usize,
    height: usize,
}

impl RectifyMap {
    /// Adopt a flat (H, W, 2) table as produced by the calibration loader.
    pub fn from_flat(map: Vec<f32>, width: usize, height: usize) -> Result<Self, SliceError> {
        let expected = height
            .checked_mul(width)
            .and_then(|hw| hw.checked_mul(2))
            .unwrap_or(usize::MAX);
        if map.len() != expected {
            return Err(SliceError::RectifyMapShape {
                len: map.len(),
                expected,
                width,
                height,
            });
        }
        Ok(Self { map, width, height })
    }

    /// Identity table: every pixel maps to its own coordinates.
    pub fn identity(width: usize, height: usize) -> Self {
        let mut map = Vec::with_capacity(height * width * 2);
        for y in 0..height {
            for x in 0..width {
                map.push(x as f32);
                map.push(y as f32);
            }
        }
        Self { map, width, height }
    }

    #[inline]
    fn offset(&self, x: usize, y: usize) -> usize {
        (y * self.width + x) * 2
    }

    /// Corrected coordinates for a single raw pixel.
    ///
    /// Precondition: `x < width`, `y < height`.
    #[inline]
    pub fn lookup(&self, x: u16, y: u16) -> (f32, f32) {
        let xi = x as usize;
        let yi = y as usize;
        debug_assert!(
            xi < self.width && yi < self.height,
            "raw coordinate ({}, {}) out of bounds ({}x{})",
            xi,
            yi,
            self.width,
            self.height
        );
        let off = self.offset(xi, yi);
        (self.map[off], self.map[off + 1])
    }

    /// Corrected coordinates for parallel coordinate columns.
    ///
    /// Pure lookup, O(n). Precondition: columns have equal length and all
    /// coordinates are within the sensor extent.
    pub fn rectify(&self, xs: &[u16], ys: &[u16]) -> (Vec<f32>, Vec<f32>) {
        assert_eq!(xs.len(), ys.len(), "coordinate columns must have equal length");
        let mut out_x = Vec::with_capacity(xs.len());
        let mut out_y = Vec::with_capacity(ys.len());
        for (&x, &y) in xs.iter().zip(ys.iter()) {
            let (rx, ry) = self.lookup(x, y);
            out_x.push(rx);
            out_y.push(ry);
        }
        (out_x, out_y)
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }
}
