// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Accumulating visibility samples onto a regular grid.
//!
//! Sample positions are normalised, i.e. the grid spans [-1, 1) in both u and
//! v. Every function here validates all of its samples before writing to the
//! grid, so an error never leaves a partially-gridded result behind.

mod error;

pub use error::GridError;

use ndarray::{prelude::*, Zip};

use crate::c64;

/// Map normalised sample positions (the first two columns of `positions`) to
/// pixel indices of a grid with the given shape. The index along an axis of
/// size `n` is `floor((1 + p) * n / 2)`; indices outside `[0, n)` are an error.
pub fn map_to_indices(
    positions: ArrayView2<f64>,
    grid_shape: (usize, usize),
) -> Result<Vec<(usize, usize)>, GridError> {
    if positions.ncols() < 2 {
        return Err(GridError::TooFewColumns(positions.ncols()));
    }

    positions
        .outer_iter()
        .enumerate()
        .map(|(i_sample, p)| {
            let x = pixel_index(p[0], grid_shape.0);
            let y = pixel_index(p[1], grid_shape.1);
            match (x, y) {
                (Some(x), Some(y)) => Ok((x, y)),
                _ => Err(GridError::IndexOutOfBounds {
                    sample: i_sample,
                    position: [p[0], p[1]],
                    index: [
                        unchecked_pixel_index(p[0], grid_shape.0),
                        unchecked_pixel_index(p[1], grid_shape.1),
                    ],
                    grid_shape,
                }),
            }
        })
        .collect()
}

#[inline]
fn unchecked_pixel_index(p: f64, n: usize) -> f64 {
    ((1.0 + p) * n as f64 / 2.0).floor()
}

#[inline]
fn pixel_index(p: f64, n: usize) -> Option<usize> {
    let i = unchecked_pixel_index(p, n);
    // NaNs fail this test too.
    if i >= 0.0 && i < n as f64 {
        Some(i as usize)
    } else {
        None
    }
}

/// Grid samples without convolution: each value is added to the pixel its
/// position maps to, and that pixel's weight is incremented by 1. Samples
/// mapping to the same pixel accumulate (natural weighting).
pub fn grid_points(
    mut grid: ArrayViewMut2<c64>,
    mut weights: ArrayViewMut2<f64>,
    positions: ArrayView2<f64>,
    values: ArrayView1<c64>,
) -> Result<(), GridError> {
    check_inputs(grid.dim(), weights.dim(), positions, values)?;
    let pixels = map_to_indices(positions, grid.dim())?;
    for (pixel, &value) in pixels.into_iter().zip(values.iter()) {
        grid[pixel] += value;
        weights[pixel] += 1.0;
    }
    Ok(())
}

/// Take samples from `array` at the pixels the positions map to; the inverse
/// of [`grid_points`].
pub fn sample_points(
    array: ArrayView2<c64>,
    positions: ArrayView2<f64>,
) -> Result<Array1<c64>, GridError> {
    let pixels = map_to_indices(positions, array.dim())?;
    Ok(pixels.into_iter().map(|pixel| array[pixel]).collect())
}

/// Add `kernel * value` to the grid, centred on `pixel`, and increment the
/// weight of `pixel` (only). The kernel's centre is `kernel.dim() / 2`, so its
/// footprint starts at `pixel - kernel.dim() / 2`.
pub fn convolve_and_grid_one(
    grid: ArrayViewMut2<c64>,
    mut weights: ArrayViewMut2<f64>,
    pixel: (usize, usize),
    kernel: ArrayView2<c64>,
    value: c64,
) -> Result<(), GridError> {
    if grid.dim() != weights.dim() {
        return Err(GridError::WeightsShapeMismatch {
            grid: grid.dim(),
            weights: weights.dim(),
        });
    }
    if kernel.is_empty() {
        return Err(GridError::EmptyKernel);
    }
    let (start, end) = kernel_footprint(pixel, kernel.dim(), grid.dim())?;
    stamp(grid, start, end, kernel, value);
    weights[pixel] += 1.0;
    Ok(())
}

/// Grid samples after convolving them with `kernel`. See
/// [`convolve_and_grid_one`].
pub fn convolve_and_grid(
    mut grid: ArrayViewMut2<c64>,
    mut weights: ArrayViewMut2<f64>,
    positions: ArrayView2<f64>,
    values: ArrayView1<c64>,
    kernel: ArrayView2<c64>,
) -> Result<(), GridError> {
    check_inputs(grid.dim(), weights.dim(), positions, values)?;
    if kernel.is_empty() {
        return Err(GridError::EmptyKernel);
    }

    let pixels = map_to_indices(positions, grid.dim())?;
    let footprints = pixels
        .iter()
        .map(|&pixel| kernel_footprint(pixel, kernel.dim(), grid.dim()))
        .collect::<Result<Vec<_>, _>>()?;

    for ((pixel, (start, end)), &value) in pixels.into_iter().zip(footprints).zip(values.iter()) {
        stamp(grid.view_mut(), start, end, kernel, value);
        weights[pixel] += 1.0;
    }
    Ok(())
}

/// Check that a kernel with shape `kernel_shape`, centred on each sample's
/// pixel, fits on a grid with shape `grid_shape`. Nothing is gridded.
pub fn check_kernel_fits(
    positions: ArrayView2<f64>,
    grid_shape: (usize, usize),
    kernel_shape: (usize, usize),
) -> Result<(), GridError> {
    if kernel_shape.0 == 0 || kernel_shape.1 == 0 {
        return Err(GridError::EmptyKernel);
    }
    for pixel in map_to_indices(positions, grid_shape)? {
        kernel_footprint(pixel, kernel_shape, grid_shape)?;
    }
    Ok(())
}

fn check_inputs(
    grid_shape: (usize, usize),
    weights_shape: (usize, usize),
    positions: ArrayView2<f64>,
    values: ArrayView1<c64>,
) -> Result<(), GridError> {
    if grid_shape != weights_shape {
        return Err(GridError::WeightsShapeMismatch {
            grid: grid_shape,
            weights: weights_shape,
        });
    }
    if positions.nrows() != values.len() {
        return Err(GridError::SampleCountMismatch {
            positions: positions.nrows(),
            values: values.len(),
        });
    }
    Ok(())
}

/// The (inclusive, exclusive) pixel corners covered by a kernel centred on
/// `pixel`.
fn kernel_footprint(
    pixel: (usize, usize),
    kernel_shape: (usize, usize),
    grid_shape: (usize, usize),
) -> Result<((usize, usize), (usize, usize)), GridError> {
    let err = || GridError::KernelOutOfBounds {
        pixel,
        kernel_shape,
        grid_shape,
    };
    let start_0 = pixel.0.checked_sub(kernel_shape.0 / 2).ok_or_else(err)?;
    let start_1 = pixel.1.checked_sub(kernel_shape.1 / 2).ok_or_else(err)?;
    let end_0 = start_0 + kernel_shape.0;
    let end_1 = start_1 + kernel_shape.1;
    if end_0 > grid_shape.0 || end_1 > grid_shape.1 {
        return Err(err());
    }
    Ok(((start_0, start_1), (end_0, end_1)))
}

fn stamp(
    mut grid: ArrayViewMut2<c64>,
    start: (usize, usize),
    end: (usize, usize),
    kernel: ArrayView2<c64>,
    value: c64,
) {
    Zip::from(grid.slice_mut(s![start.0..end.0, start.1..end.1]))
        .and(kernel)
        .for_each(|g, &k| *g += k * value);
}
