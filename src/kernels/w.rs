// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! w-term phase screens and the convolution kernels made from them.

use log::trace;
use ndarray::prelude::*;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

use super::KernelError;
use crate::{
    c64,
    constants::TAU,
    fft::{fft2, fftshift},
    image::extract_center,
    math::{cexp, one_minus_n},
    mesh::full_grid,
};

/// What to do with phase-screen pixels beyond the horizon, i.e. where
/// r^2 = l^2 + m^2 > 1.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Display, EnumIter, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum WScreenPolicy {
    /// Use r^2 = 1 for these pixels.
    #[default]
    Clamp,

    /// Refuse to make the screen.
    Fail,
}

/// The w phase screen `exp(2πi w (1 - sqrt(1 - r^2)))` over an array with
/// shape `shape`. The array spans [-`field_half_width`, `field_half_width`]
/// radians on both axes.
pub fn w_phase_screen(
    shape: (usize, usize),
    field_half_width: f64,
    w: f64,
    policy: WScreenPolicy,
) -> Result<Array2<c64>, KernelError> {
    if shape.0 == 0 || shape.1 == 0 {
        return Err(KernelError::EmptyShape(shape));
    }
    if !field_half_width.is_finite() || field_half_width <= 0.0 {
        return Err(KernelError::InvalidFieldHalfWidth(field_half_width));
    }
    if !w.is_finite() {
        return Err(KernelError::NonFiniteW(w));
    }

    let (x, y) = full_grid(shape);
    let mut r2 = (x * field_half_width).mapv_into(|l| l * l);
    r2 += &(y * field_half_width).mapv_into(|m| m * m);

    match policy {
        WScreenPolicy::Clamp => r2.mapv_inplace(|r2| r2.min(1.0)),
        WScreenPolicy::Fail => {
            if let Some((pixel, &r2)) = r2.indexed_iter().find(|(_, &r2)| r2 > 1.0) {
                return Err(KernelError::WScreenDomain { pixel, r2 });
            }
        }
    }

    Ok(r2.mapv(|r2| cexp(TAU * w * one_minus_n(r2))))
}

/// The w convolution kernel for a `grid_size` x `grid_size` grid. The phase
/// screen is Fourier transformed, the zero frequency is moved to the middle,
/// and the result is scaled by `1 / grid_size^2` (so that w = 0 gives a unit
/// delta) before being cropped to `2 * kernel_half_size + 1` pixels on a side.
pub fn w_kernel(
    grid_size: usize,
    field_half_width: f64,
    w: f64,
    kernel_half_size: usize,
    policy: WScreenPolicy,
) -> Result<Array2<c64>, KernelError> {
    trace!("Making a w kernel for w = {w}");
    let screen = w_phase_screen((grid_size, grid_size), field_half_width, w, policy)?;
    let mut kernel = fftshift(fft2(screen.view()).view());
    let norm = 1.0 / (grid_size * grid_size) as f64;
    kernel.mapv_inplace(|k| k * norm);
    Ok(extract_center(kernel.view(), kernel_half_size)?)
}
