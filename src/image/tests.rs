// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use approx::assert_abs_diff_eq;
use ndarray::prelude::*;

use super::*;
use crate::gridding::convolve_and_grid_one;

#[test]
fn test_extract_center_whole_array() {
    // An array of side 2s+1 is returned unchanged.
    let s = 3;
    let a = Array2::from_shape_fn((2 * s + 1, 2 * s + 1), |(i, j)| i * 10 + j);
    let e = extract_center(a.view(), s).unwrap();
    assert_eq!(e, a);
}

#[test]
fn test_extract_center_even_array() {
    let a = Array2::from_shape_fn((6, 6), |(i, j)| i * 10 + j);
    let e = extract_center(a.view(), 1).unwrap();
    assert_eq!(e, array![[22, 23, 24], [32, 33, 34], [42, 43, 44]]);

    let e = extract_center(a.view(), 0).unwrap();
    assert_eq!(e, array![[33]]);
}

#[test]
fn test_extract_center_too_large() {
    let a = Array2::<f64>::zeros((6, 6));
    // The centre is at 3; 3 + 3 is outside the array.
    let result = extract_center(a.view(), 3);
    assert_eq!(
        result,
        Err(ImageError::ExtractTooLarge {
            half_size: 3,
            shape: (6, 6)
        })
    );
}

#[test]
fn test_divide_ignoring_zero_all_zero() {
    let a = Array2::from_shape_fn((3, 4), |(i, j)| c64::new(i as f64, j as f64 - 1.0));
    let zeros = Array2::zeros((3, 4));
    let result = divide_ignoring_zero(a.view(), zeros.view()).unwrap();
    assert_eq!(result, a);
}

#[test]
fn test_divide_ignoring_zero_mixed() {
    let a = array![
        [c64::new(2.0, 4.0), c64::new(3.0, 0.0)],
        [c64::new(5.0, 5.0), c64::new(-1.0, 1.0)]
    ];
    let w = array![[2.0, 0.0], [0.5, 0.0]];
    let result = divide_ignoring_zero(a.view(), w.view()).unwrap();
    assert_eq!(result[(0, 0)], c64::new(1.0, 2.0));
    assert_eq!(result[(0, 1)], c64::new(3.0, 0.0));
    assert_eq!(result[(1, 0)], c64::new(10.0, 10.0));
    assert_eq!(result[(1, 1)], c64::new(-1.0, 1.0));
}

#[test]
fn test_divide_ignoring_zero_shape_mismatch() {
    let a = Array2::<c64>::zeros((3, 4));
    let w = Array2::<f64>::zeros((4, 3));
    assert_eq!(
        divide_ignoring_zero(a.view(), w.view()),
        Err(ImageError::ShapeMismatch {
            numerator: (3, 4),
            denominator: (4, 3)
        })
    );
}

#[test]
fn test_invert_centre_sample_is_flat() {
    // A single unit-amplitude sample at the grid centre is the DC component
    // only.
    let n = 16;
    let mut grid = Array2::<c64>::zeros((n, n));
    let mut weights = Array2::<f64>::zeros((n, n));
    let kernel = array![[c64::new(1.0, 0.0)]];
    convolve_and_grid_one(
        grid.view_mut(),
        weights.view_mut(),
        (n / 2, n / 2),
        kernel.view(),
        c64::new(1.0, 0.0),
    )
    .unwrap();
    assert_eq!(grid[(n / 2, n / 2)], c64::new(1.0, 0.0));
    assert_eq!(weights.sum(), 1.0);

    let image = invert(grid.view(), weights.view()).unwrap();
    let expected = 1.0 / (n * n) as f64;
    for pixel in image.iter() {
        assert_abs_diff_eq!(pixel.norm(), expected, epsilon = 1e-15);
        assert_abs_diff_eq!(pixel.im, 0.0, epsilon = 1e-15);
    }
}

#[test]
fn test_invert_normalises_by_weight() {
    let n = 8;
    let mut grid = Array2::<c64>::zeros((n, n));
    let mut weights = Array2::<f64>::zeros((n, n));
    grid[(n / 2, n / 2)] = c64::new(3.0, 0.0);
    weights[(n / 2, n / 2)] = 3.0;
    let image = invert(grid.view(), weights.view()).unwrap();
    assert_abs_diff_eq!(image[(0, 0)].re, 1.0 / (n * n) as f64, epsilon = 1e-15);
}

#[test]
fn test_dirty_image_phase_gradient_peak() {
    // A linear phase across the grid puts the peak off centre.
    let n = 32;
    let k = 5;
    let mut grid = Array2::<c64>::zeros((n, n));
    let mut weights = Array2::<f64>::zeros((n, n));
    for i in 0..n {
        for j in 0..n {
            let u = i as f64 - (n / 2) as f64;
            grid[(i, j)] = crate::math::cexp(-crate::constants::TAU * u * k as f64 / n as f64);
            weights[(i, j)] = 1.0;
        }
    }
    let image = dirty_image(grid.view(), weights.view()).unwrap();
    let (pixel, value) = find_peak(image.view()).unwrap();
    assert_eq!(pixel, (n / 2 + k, n / 2));
    assert_abs_diff_eq!(value.norm(), 1.0, epsilon = 1e-12);
}

#[test]
fn test_find_peak() {
    let a = array![
        [c64::new(1.0, 0.0), c64::new(0.0, -3.0)],
        [c64::new(2.0, 2.0), c64::new(0.0, 0.0)]
    ];
    let (pixel, value) = find_peak(a.view()).unwrap();
    assert_eq!(pixel, (0, 1));
    assert_eq!(value, c64::new(0.0, -3.0));

    let empty = Array2::<c64>::zeros((0, 0));
    assert!(find_peak(empty.view()).is_none());
}
