use evslice_core::error::SliceError;
use evslice_core::rectify::RectifyMap;

#[test]
fn identity_map_returns_raw_coordinates() {
    let map = RectifyMap::identity(4, 3);
    assert_eq!(map.lookup(0, 0), (0.0, 0.0));
    assert_eq!(map.lookup(3, 2), (3.0, 2.0));

    let (xs, ys) = map.rectify(&[0, 1, 3], &[2, 0, 1]);
    assert_eq!(xs, vec![0.0, 1.0, 3.0]);
    assert_eq!(ys, vec![2.0, 0.0, 1.0]);
}

#[test]
fn flat_table_is_indexed_row_major() {
    // 2x2 sensor, each pixel shifted by (+0.5, -0.25).
    let mut flat = Vec::new();
    for y in 0..2 {
        for x in 0..2 {
            flat.push(x as f32 + 0.5);
            flat.push(y as f32 - 0.25);
        }
    }
    let map = RectifyMap::from_flat(flat, 2, 2).expect("shape matches");

    assert_eq!(map.lookup(0, 0), (0.5, -0.25));
    assert_eq!(map.lookup(1, 0), (1.5, -0.25));
    assert_eq!(map.lookup(0, 1), (0.5, 0.75));
    assert_eq!(map.lookup(1, 1), (1.5, 0.75));
}

#[test]
fn wrong_table_length_is_rejected() {
    let err = RectifyMap::from_flat(vec![0.0; 7], 2, 2).unwrap_err();
    assert_eq!(
        err,
        SliceError::RectifyMapShape {
            len: 7,
            expected: 8,
            width: 2,
            height: 2,
        }
    );
}

#[test]
fn rectify_is_pure_and_order_preserving() {
    let map = RectifyMap::identity(8, 8);
    let xs = [3u16, 1, 7, 3];
    let ys = [0u16, 5, 2, 0];

    let (ax, ay) = map.rectify(&xs, &ys);
    let (bx, by) = map.rectify(&xs, &ys);
    assert_eq!(ax, bx);
    assert_eq!(ay, by);
    // Duplicate input pixels produce duplicate outputs in place.
    assert_eq!(ax[0], ax[3]);
    assert_eq!(ay[0], ay[3]);
}

#[test]
#[should_panic(expected = "equal length")]
fn mismatched_columns_panic() {
    let map = RectifyMap::identity(4, 4);
    let _ = map.rectify(&[0, 1], &[0]);
}
