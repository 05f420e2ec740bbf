// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Two-dimensional Fourier transforms and their zero-frequency shifts.
//!
//! The conventions are numpy's: the forward transform is unnormalised, the
//! inverse is normalised by the number of elements, and the zero frequency of
//! an unshifted array is at index 0.


use ndarray::prelude::*;
use ndrustfft::{ndfft, ndifft, FftHandler};

use crate::c64;

/// Forward 2D FFT.
pub fn fft2(a: ArrayView2<c64>) -> Array2<c64> {
    let (n0, n1) = a.dim();
    let mut handler_0 = FftHandler::<f64>::new(n0);
    let mut handler_1 = FftHandler::<f64>::new(n1);
    let mut temp = Array2::zeros((n0, n1));
    let mut out = Array2::zeros((n0, n1));
    ndfft(&a, &mut temp, &mut handler_1, 1);
    ndfft(&temp, &mut out, &mut handler_0, 0);
    out
}

/// Inverse 2D FFT, normalised by `1 / (n0 * n1)`.
pub fn ifft2(a: ArrayView2<c64>) -> Array2<c64> {
    let (n0, n1) = a.dim();
    let mut handler_0 = FftHandler::<f64>::new(n0);
    let mut handler_1 = FftHandler::<f64>::new(n1);
    let mut temp = Array2::zeros((n0, n1));
    let mut out = Array2::zeros((n0, n1));
    ndifft(&a, &mut temp, &mut handler_1, 1);
    ndifft(&temp, &mut out, &mut handler_0, 0);
    out
}

/// Move the zero-frequency element to the centre (index `n / 2` along each
/// axis).
pub fn fftshift<T: Clone>(a: ArrayView2<T>) -> Array2<T> {
    let (n0, n1) = a.dim();
    roll(a, n0 / 2, n1 / 2)
}

/// Undo [`fftshift`]. The two only differ for odd-sized axes.
pub fn ifftshift<T: Clone>(a: ArrayView2<T>) -> Array2<T> {
    let (n0, n1) = a.dim();
    roll(a, n0 - n0 / 2, n1 - n1 / 2)
}

/// Cyclically shift the elements of `a` by `k0` along axis 0 and `k1` along
/// axis 1, i.e. `out[(i + k0) % n0, (j + k1) % n1] = a[i, j]`.
fn roll<T: Clone>(a: ArrayView2<T>, k0: usize, k1: usize) -> Array2<T> {
    let (n0, n1) = a.dim();
    if n0 == 0 || n1 == 0 {
        return a.to_owned();
    }
    Array2::from_shape_fn((n0, n1), |(i, j)| {
        a[((i + n0 - k0 % n0) % n0, (j + n1 - k1 % n1) % n1)].clone()
    })
}
