// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Turning gridded visibilities into images.

mod error;
#[cfg(test)]
mod tests;

pub use error::ImageError;

use log::trace;
use ndarray::{prelude::*, Zip};
use num_traits::Zero;

use crate::{
    c64,
    fft::{fftshift, ifft2, ifftshift},
};

/// Extract the square section of side `2 * half_size + 1` from the middle of
/// `array`. The middle is at `shape / 2` (integer division) on each axis.
pub fn extract_center<T: Clone>(
    array: ArrayView2<T>,
    half_size: usize,
) -> Result<Array2<T>, ImageError> {
    let (n0, n1) = array.dim();
    let (c0, c1) = (n0 / 2, n1 / 2);
    if c0 < half_size || c1 < half_size || c0 + half_size >= n0 || c1 + half_size >= n1 {
        return Err(ImageError::ExtractTooLarge {
            half_size,
            shape: (n0, n1),
        });
    }

    Ok(array
        .slice(s![
            c0 - half_size..c0 + half_size + 1,
            c1 - half_size..c1 + half_size + 1
        ])
        .to_owned())
}

/// Divide `numerator` by `denominator` element-wise, except where the
/// denominator is exactly zero; those elements are copied from the numerator
/// unchanged.
pub fn divide_ignoring_zero(
    numerator: ArrayView2<c64>,
    denominator: ArrayView2<f64>,
) -> Result<Array2<c64>, ImageError> {
    if numerator.dim() != denominator.dim() {
        return Err(ImageError::ShapeMismatch {
            numerator: numerator.dim(),
            denominator: denominator.dim(),
        });
    }

    let mut out = numerator.to_owned();
    Zip::from(&mut out).and(denominator).for_each(|n, &d| {
        if !d.is_zero() {
            *n /= d;
        }
    });
    Ok(out)
}

/// Normalise the grid by its weights, then inverse transform it. The grid's
/// zero frequency is expected at its centre; the zero frequency of the image
/// is at index (0, 0).
pub fn invert(grid: ArrayView2<c64>, weights: ArrayView2<f64>) -> Result<Array2<c64>, ImageError> {
    trace!("Inverting a {:?} grid", grid.dim());
    let normalised = divide_ignoring_zero(grid, weights)?;
    Ok(ifft2(ifftshift(normalised.view()).view()))
}

/// [`invert`] the grid and centre the result, so that the phase centre lands
/// on pixel `(n0 / 2, n1 / 2)`. Pixel `(i, j)` is then at direction cosines
/// `((i - n0 / 2) * 2 * T2 / n0, (j - n1 / 2) * 2 * T2 / n1)` for a field
/// half width `T2`.
pub fn dirty_image(
    grid: ArrayView2<c64>,
    weights: ArrayView2<f64>,
) -> Result<Array2<c64>, ImageError> {
    let image = invert(grid, weights)?;
    Ok(fftshift(image.view()))
}

/// Find the pixel with the largest magnitude. `None` if the image is empty.
pub fn find_peak(image: ArrayView2<c64>) -> Option<((usize, usize), c64)> {
    image
        .indexed_iter()
        .fold(None, |best: Option<((usize, usize), c64)>, (pixel, &value)| {
            match best {
                Some((_, b)) if b.norm() >= value.norm() => best,
                _ => Some((pixel, value)),
            }
        })
}
