// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Visibilities, and the operations applied to them before gridding.
//!
//! Sample positions are (u, v, w) rows of a 2D array; sample values are the
//! matching complex visibilities.

mod error;
mod simulate;
#[cfg(test)]
mod tests;
mod visibilities;

pub use error::VisError;
pub use simulate::{simulate_visibilities, PointSource};
pub use visibilities::Visibilities;

use log::trace;
use ndarray::{prelude::*, Zip};

use crate::{c64, constants::TAU, math::cexp};

fn check_samples(positions: ArrayView2<f64>, values: ArrayView1<c64>) -> Result<(), VisError> {
    if positions.ncols() < 3 {
        return Err(VisError::TooFewColumns(positions.ncols()));
    }
    if positions.nrows() != values.len() {
        return Err(VisError::SampleCountMismatch {
            positions: positions.nrows(),
            values: values.len(),
        });
    }
    Ok(())
}

/// The `n` direction cosine for `l` and `m`.
pub(crate) fn lm_to_n(l: f64, m: f64) -> Result<f64, VisError> {
    let r2 = l * l + m * m;
    if r2.is_nan() || r2 > 1.0 {
        return Err(VisError::DirectionCosineDomain { l, m });
    }
    Ok((1.0 - r2).sqrt())
}

/// Rotate visibilities to the direction (l, m): each value is multiplied by
/// `exp(2πi (u l + v m + w sqrt(1 - l^2 - m^2)))`.
pub fn rotate_phase(
    positions: ArrayView2<f64>,
    l: f64,
    m: f64,
    values: ArrayView1<c64>,
) -> Result<Array1<c64>, VisError> {
    check_samples(positions, values)?;
    let n = lm_to_n(l, m)?;
    trace!("Rotating {} visibilities to (l, m) = ({l}, {m})", values.len());

    let mut rotated = values.to_owned();
    Zip::from(&mut rotated)
        .and(positions.rows())
        .par_for_each(|value, uvw| {
            *value *= cexp(TAU * (uvw[0] * l + uvw[1] * m + uvw[2] * n));
        });
    Ok(rotated)
}

/// Rotate visibilities to the zero-w plane. This is [`rotate_phase`] with
/// l = m = 0.
pub fn rotate_to_zero_w(
    positions: ArrayView2<f64>,
    values: ArrayView1<c64>,
) -> Result<Array1<c64>, VisError> {
    rotate_phase(positions, 0.0, 0.0, values)
}

/// The order that sorts samples by ascending w. Samples with equal w keep their
/// original order.
pub fn w_sort_order(positions: ArrayView2<f64>) -> Result<Vec<usize>, VisError> {
    if positions.ncols() < 3 {
        return Err(VisError::TooFewColumns(positions.ncols()));
    }
    let ws = positions.column(2);
    let mut order: Vec<usize> = (0..positions.nrows()).collect();
    order.sort_by(|&a, &b| ws[a].total_cmp(&ws[b]));
    Ok(order)
}

/// Sort samples by ascending w (stably).
pub fn sort_by_w(
    positions: ArrayView2<f64>,
    values: ArrayView1<c64>,
) -> Result<(Array2<f64>, Array1<c64>), VisError> {
    check_samples(positions, values)?;
    let order = w_sort_order(positions)?;
    Ok((
        positions.select(Axis(0), &order),
        values.select(Axis(0), &order),
    ))
}
