//! evslice_python: PyO3 bindings for the evslice core kernels.
//!
//! Exposes NumPy-compatible functions:
//! - slice_events -> tuple of (t: i64, x: u16, y: u16, p: i8) or None past the index
//! - rectify -> tuple of (x: f32, y: f32)
//! - voxel_grid -> f32 array shape (B,H,W)
//! - count_image -> f32 array shape (2,H,W)
//!
//! Inputs: t(i64 microseconds), x(u16), y(u16), p(i8) as 1D NumPy arrays with
//! equal lengths; t must be non-decreasing where a function slices by time.

use numpy::{ndarray, PyArray1, PyArray3, PyReadonlyArray1};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use evslice_core::kernels::count_image::to_count_image;
use evslice_core::kernels::voxel_grid::to_voxel_grid;
use evslice_core::rectify::RectifyMap;
use evslice_core::slicer::EventSlicer;
use evslice_core::store::{EventStore, MemoryStore};
use evslice_core::time_index::TimeIndex;

fn build_store<'py>(
    t: PyReadonlyArray1<'py, i64>,
    x: PyReadonlyArray1<'py, u16>,
    y: PyReadonlyArray1<'py, u16>,
    p: PyReadonlyArray1<'py, i8>,
) -> PyResult<MemoryStore> {
    let ts = t.as_slice()?;
    let xs = x.as_slice()?;
    let ys = y.as_slice()?;
    let ps = p.as_slice()?;
    MemoryStore::from_columns(ts.to_vec(), xs.to_vec(), ys.to_vec(), ps.to_vec())
        .map_err(|e| PyValueError::new_err(e.to_string()))
}

#[pyfunction(text_signature = "(t, x, y, p, t_start_us, t_end_us, ms_to_idx=None, /)")]
#[pyo3(name = "slice_events", signature = (t, x, y, p, t_start_us, t_end_us, ms_to_idx=None))]
/// Slice the event columns to the half-open window [t_start_us, t_end_us),
/// rebasing timestamps by the first event's timestamp.
/// Returns (t, x, y, p) NumPy arrays, or None when the window falls past the
/// indexed range.
#[allow(clippy::too_many_arguments)]
fn slice_events_py<'py>(
    py: Python<'py>,
    t: PyReadonlyArray1<'py, i64>,
    x: PyReadonlyArray1<'py, u16>,
    y: PyReadonlyArray1<'py, u16>,
    p: PyReadonlyArray1<'py, i8>,
    t_start_us: i64,
    t_end_us: i64,
    ms_to_idx: Option<PyReadonlyArray1<'py, u64>>,
) -> PyResult<
    Option<(
        Py<PyArray1<i64>>,
        Py<PyArray1<u16>>,
        Py<PyArray1<u16>>,
        Py<PyArray1<i8>>,
    )>,
> {
    if t_start_us >= t_end_us {
        return Err(PyValueError::new_err(
            "t_start_us must be strictly less than t_end_us.",
        ));
    }

    let store = build_store(t, x, y, p)?;
    let n = store.total_count();
    let index = match &ms_to_idx {
        Some(table) => TimeIndex::from_table(table.as_slice()?),
        None => TimeIndex::from_timestamps(&store.read_timestamps(0, n)),
    };
    let t_offset = if n > 0 { store.read_timestamps(0, 1)[0] } else { 0 };
    let slicer = EventSlicer::new(store, index, t_offset);

    let Some(batch) = slicer.get_events(t_start_us, t_end_us) else {
        return Ok(None);
    };

    let t_arr = PyArray1::from_vec(py, batch.t).to_owned();
    let x_arr = PyArray1::from_vec(py, batch.x).to_owned();
    let y_arr = PyArray1::from_vec(py, batch.y).to_owned();
    let p_arr = PyArray1::from_vec(py, batch.p).to_owned();
    Ok(Some((t_arr, x_arr, y_arr, p_arr)))
}

#[pyfunction(text_signature = "(x, y, rectify_map, sensor_w, sensor_h, /)")]
#[pyo3(name = "rectify")]
/// Map raw pixel coordinates through a flat (H, W, 2) rectification table.
/// Returns corrected (x: f32, y: f32) NumPy arrays.
fn rectify_py<'py>(
    py: Python<'py>,
    x: PyReadonlyArray1<'py, u16>,
    y: PyReadonlyArray1<'py, u16>,
    rectify_map: PyReadonlyArray1<'py, f32>,
    sensor_w: usize,
    sensor_h: usize,
) -> PyResult<(Py<PyArray1<f32>>, Py<PyArray1<f32>>)> {
    let xs = x.as_slice()?;
    let ys = y.as_slice()?;
    if xs.len() != ys.len() {
        return Err(PyValueError::new_err(
            "Input arrays x and y must have equal length.",
        ));
    }
    for (&xv, &yv) in xs.iter().zip(ys.iter()) {
        if (xv as usize) >= sensor_w || (yv as usize) >= sensor_h {
            return Err(PyValueError::new_err(format!(
                "Raw coordinate ({}, {}) outside sensor extent {}x{}.",
                xv, yv, sensor_w, sensor_h
            )));
        }
    }

    let map = RectifyMap::from_flat(rectify_map.as_slice()?.to_vec(), sensor_w, sensor_h)
        .map_err(|e| PyValueError::new_err(e.to_string()))?;
    let (rx, ry) = map.rectify(xs, ys);

    let x_arr = PyArray1::from_vec(py, rx).to_owned();
    let y_arr = PyArray1::from_vec(py, ry).to_owned();
    Ok((x_arr, y_arr))
}

#[pyfunction(
    text_signature = "(x, y, t, p, sensor_w, sensor_h, num_bins, normalize=False, /)"
)]
#[pyo3(name = "voxel_grid", signature = (x, y, t, p, sensor_w, sensor_h, num_bins, normalize=false))]
/// Build a voxel grid with bilinear interpolation over time from rectified
/// coordinates. Returns a NumPy f32 array with shape (B, H, W) in C-order.
#[allow(clippy::too_many_arguments)]
fn voxel_grid_py<'py>(
    py: Python<'py>,
    x: PyReadonlyArray1<'py, f32>,
    y: PyReadonlyArray1<'py, f32>,
    t: PyReadonlyArray1<'py, i64>,
    p: PyReadonlyArray1<'py, i8>,
    sensor_w: usize,
    sensor_h: usize,
    num_bins: usize,
    normalize: bool,
) -> PyResult<Py<PyArray3<f32>>> {
    if num_bins == 0 {
        return Err(PyValueError::new_err("num_bins must be at least 1."));
    }
    let grid = to_voxel_grid(
        x.as_slice()?,
        y.as_slice()?,
        t.as_slice()?,
        p.as_slice()?,
        sensor_w,
        sensor_h,
        num_bins,
        None,
        normalize,
    )
    .map_err(|e| PyValueError::new_err(e.to_string()))?;

    let shape = (num_bins, sensor_h, sensor_w);
    let arr = ndarray::Array3::from_shape_vec(shape, grid.into_vec())
        .map_err(|_| PyValueError::new_err("Failed to reshape voxel grid into (B,H,W)."))?;
    Ok(PyArray3::from_owned_array(py, arr).to_owned())
}

#[pyfunction(text_signature = "(x, y, p, sensor_w, sensor_h, normalize=False, /)")]
#[pyo3(name = "count_image", signature = (x, y, p, sensor_w, sensor_h, normalize=false))]
/// Per-polarity event count image; out-of-bounds coordinates are masked.
/// Returns a NumPy f32 array with shape (2, H, W) in C-order.
fn count_image_py<'py>(
    py: Python<'py>,
    x: PyReadonlyArray1<'py, f32>,
    y: PyReadonlyArray1<'py, f32>,
    p: PyReadonlyArray1<'py, i8>,
    sensor_w: usize,
    sensor_h: usize,
    normalize: bool,
) -> PyResult<Py<PyArray3<f32>>> {
    let xs = x.as_slice()?;
    let ys = y.as_slice()?;
    let ps = p.as_slice()?;
    if xs.len() != ys.len() || xs.len() != ps.len() {
        return Err(PyValueError::new_err(
            "Input arrays x, y, p must have equal length.",
        ));
    }

    let grid = to_count_image(xs, ys, ps, sensor_w, sensor_h, normalize);

    let shape = (2, sensor_h, sensor_w);
    let arr = ndarray::Array3::from_shape_vec(shape, grid.into_vec())
        .map_err(|_| PyValueError::new_err("Failed to reshape count image into (2,H,W)."))?;
    Ok(PyArray3::from_owned_array(py, arr).to_owned())
}

#[pymodule]
fn evslice_python(_py: Python<'_>, m: &PyModule) -> PyResult<()> {
    m.add("__doc__", "Python bindings for the evslice core kernels.")?;
    m.add_function(wrap_pyfunction!(slice_events_py, m)?)?;
    m.add_function(wrap_pyfunction!(rectify_py, m)?)?;
    m.add_function(wrap_pyfunction!(voxel_grid_py, m)?)?;
    m.add_function(wrap_pyfunction!(count_image_py, m)?)?;
    Ok(())
}
