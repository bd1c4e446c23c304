use evslice_core::error::SliceError;
use evslice_core::kernels::voxel_grid::to_voxel_grid;

use rand::seq::SliceRandom;
use rand::SeedableRng;

fn approx_eq(a: f32, b: f32, eps: f32) -> bool {
    (a - b).abs() <= eps
}

#[test]
fn empty_events_returns_zeroed_grid_of_correct_shape() {
    let grid = to_voxel_grid(&[], &[], &[], &[], 4, 3, 5, None, false).unwrap();
    assert_eq!(grid.as_slice().len(), 5 * 3 * 4);
    assert!(grid.as_slice().iter().all(|&v| v == 0.0));
}

#[test]
fn bilinear_split_lands_in_adjacent_bins() {
    // Window [100, 200], 5 bins: tau = 4 * (t - 100) / 100.
    // t=135 -> tau=1.4 -> 0.6 into bin 1, 0.4 into bin 2.
    // t=175 (p=-1) -> tau=3.0 -> -1.0 entirely into bin 3.
    let grid = to_voxel_grid(
        &[1.0, 1.0],
        &[2.0, 2.0],
        &[135, 175],
        &[1, -1],
        4,
        3,
        5,
        Some((100, 200)),
        false,
    )
    .unwrap();

    assert!(approx_eq(grid.value_at(1, 1, 2), 0.6, 1e-6));
    assert!(approx_eq(grid.value_at(2, 1, 2), 0.4, 1e-6));
    assert!(approx_eq(grid.value_at(3, 1, 2), -1.0, 1e-6));
    assert!(approx_eq(grid.value_at(0, 1, 2), 0.0, 1e-6));
    assert!(approx_eq(grid.value_at(4, 1, 2), 0.0, 1e-6));
    // Unrelated pixel stays zero.
    assert!(approx_eq(grid.value_at(1, 3, 0), 0.0, 1e-6));
}

#[test]
fn batch_extrema_define_the_window_when_bounds_are_absent() {
    // min/max are taken over the whole column, so the first/last positions
    // do not matter.
    let grid = to_voxel_grid(
        &[0.0, 1.0, 2.0],
        &[0.0, 0.0, 0.0],
        &[150, 100, 200],
        &[1, 1, 1],
        4,
        1,
        3,
        None,
        false,
    )
    .unwrap();

    // t=100 -> tau=0, t=150 -> tau=1, t=200 -> tau=2.
    assert!(approx_eq(grid.value_at(0, 1, 0), 1.0, 1e-6));
    assert!(approx_eq(grid.value_at(1, 0, 0), 1.0, 1e-6));
    assert!(approx_eq(grid.value_at(2, 2, 0), 1.0, 1e-6));
}

#[test]
fn single_bin_equals_polarity_weighted_histogram() {
    let xs = [0.0f32, 1.0, 1.0, 2.0];
    let ys = [0.0f32, 0.0, 0.0, 1.0];
    let ts = [10i64, 20, 30, 40];
    let ps = [1i8, 1, -1, 1];

    let grid = to_voxel_grid(&xs, &ys, &ts, &ps, 3, 2, 1, None, false).unwrap();

    assert!(approx_eq(grid.value_at(0, 0, 0), 1.0, 1e-6));
    // +1 and -1 at (1, 0) cancel.
    assert!(approx_eq(grid.value_at(0, 1, 0), 0.0, 1e-6));
    assert!(approx_eq(grid.value_at(0, 2, 1), 1.0, 1e-6));
}

#[test]
fn opposite_polarities_in_one_bin_cancel() {
    // Both events hit tau=2.0 exactly: full weight in bin 2, opposite signs.
    let grid = to_voxel_grid(
        &[1.0, 1.0],
        &[1.0, 1.0],
        &[150, 150],
        &[1, -1],
        4,
        4,
        5,
        Some((100, 200)),
        false,
    )
    .unwrap();
    assert!(grid.as_slice().iter().all(|&v| v.abs() < 1e-6));
}

#[test]
fn accumulation_is_order_independent() {
    let n = 500usize;
    let mut events: Vec<(f32, f32, i64, i8)> = (0..n)
        .map(|i| {
            (
                (i % 7) as f32,
                ((i / 7) % 5) as f32,
                (i as i64) * 13 % 10_000,
                if i % 3 == 0 { -1 } else { 1 },
            )
        })
        .collect();

    let build = |evs: &[(f32, f32, i64, i8)]| {
        let xs: Vec<f32> = evs.iter().map(|e| e.0).collect();
        let ys: Vec<f32> = evs.iter().map(|e| e.1).collect();
        let ts: Vec<i64> = evs.iter().map(|e| e.2).collect();
        let ps: Vec<i8> = evs.iter().map(|e| e.3).collect();
        to_voxel_grid(&xs, &ys, &ts, &ps, 7, 5, 4, None, false).unwrap()
    };

    let reference = build(&events);
    let mut rng = rand::rngs::StdRng::seed_from_u64(0xE1CE);
    events.shuffle(&mut rng);
    let shuffled = build(&events);

    for (a, b) in reference.as_slice().iter().zip(shuffled.as_slice()) {
        assert!(approx_eq(*a, *b, 1e-4), "grids diverge: {} vs {}", a, b);
    }
}

#[test]
fn total_mass_equals_polarity_sum() {
    let xs = [0.0f32, 1.0, 2.0, 3.0, 1.0];
    let ys = [0.0f32, 1.0, 2.0, 0.0, 1.0];
    let ts = [0i64, 25, 50, 75, 100];
    let ps = [1i8, -1, 1, 1, -1];

    let grid = to_voxel_grid(&xs, &ys, &ts, &ps, 4, 3, 6, None, false).unwrap();
    let total: f32 = grid.as_slice().iter().sum();
    let expected: f32 = ps.iter().map(|&p| if p > 0 { 1.0 } else { -1.0 }).sum();
    assert!(approx_eq(total, expected, 1e-5));
}

#[test]
fn zero_time_span_accumulates_into_the_first_bin() {
    let grid = to_voxel_grid(
        &[0.0, 1.0],
        &[0.0, 0.0],
        &[500, 500],
        &[1, 1],
        2,
        1,
        4,
        None,
        false,
    )
    .unwrap();
    assert!(approx_eq(grid.value_at(0, 0, 0), 1.0, 1e-6));
    assert!(approx_eq(grid.value_at(0, 1, 0), 1.0, 1e-6));
    for bin in 1..4 {
        assert!(approx_eq(grid.value_at(bin, 0, 0), 0.0, 1e-6));
        assert!(approx_eq(grid.value_at(bin, 1, 0), 0.0, 1e-6));
    }
}

#[test]
fn out_of_bounds_coordinate_is_an_error() {
    let err = to_voxel_grid(&[4.0], &[0.0], &[100], &[1], 4, 3, 2, None, false).unwrap_err();
    match err {
        SliceError::InvalidBounds { x, width, .. } => {
            assert_eq!(x, 4.0);
            assert_eq!(width, 4);
        }
        other => panic!("expected InvalidBounds, got {:?}", other),
    }

    let err = to_voxel_grid(&[0.0], &[-0.5], &[100], &[1], 4, 3, 2, None, false).unwrap_err();
    assert!(matches!(err, SliceError::InvalidBounds { .. }));
}

#[test]
fn mismatched_columns_are_an_error() {
    let err = to_voxel_grid(&[0.0, 1.0], &[0.0], &[100], &[1], 4, 3, 2, None, false).unwrap_err();
    assert!(matches!(err, SliceError::ColumnMismatch { .. }));
}

#[test]
fn normalization_gives_zero_mean_unit_std_over_nonzero_entries() {
    // Channel 0 ends with counts 2.0 at (0,0) and 4.0 at (1,0).
    let xs = [0.0f32, 0.0, 1.0, 1.0, 1.0, 1.0];
    let ys = [0.0f32; 6];
    let ts = [50i64; 6];
    let ps = [1i8; 6];

    let grid = to_voxel_grid(&xs, &ys, &ts, &ps, 3, 2, 1, None, true).unwrap();

    // mean 3, std 1 over {2, 4} -> {-1, +1}; zeros untouched.
    assert!(approx_eq(grid.value_at(0, 0, 0), -1.0, 1e-5));
    assert!(approx_eq(grid.value_at(0, 1, 0), 1.0, 1e-5));
    assert!(approx_eq(grid.value_at(0, 2, 0), 0.0, 1e-6));

    let nonzero: Vec<f32> = grid
        .as_slice()
        .iter()
        .copied()
        .filter(|v| *v != 0.0)
        .collect();
    let mean: f32 = nonzero.iter().sum::<f32>() / nonzero.len() as f32;
    assert!(approx_eq(mean, 0.0, 1e-5));
}

#[test]
fn normalization_with_zero_std_subtracts_the_mean_only() {
    // A single non-zero entry has std 0; it collapses to 0 after the shift.
    let grid = to_voxel_grid(&[0.0], &[0.0], &[100], &[1], 2, 2, 1, None, true).unwrap();
    assert!(approx_eq(grid.value_at(0, 0, 0), 0.0, 1e-6));
}

#[test]
fn last_bin_keeps_full_weight_at_the_window_end() {
    // tau = num_bins - 1 exactly: frac 0, nothing spills past the last bin.
    let grid = to_voxel_grid(
        &[0.0],
        &[0.0],
        &[200],
        &[1],
        2,
        2,
        5,
        Some((100, 200)),
        false,
    )
    .unwrap();
    assert!(approx_eq(grid.value_at(4, 0, 0), 1.0, 1e-6));
}
