// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Separable anti-aliasing convolution functions (see VLA Scientific Memoranda
//! 129, 131 and 132).

use log::debug;
use ndarray::prelude::*;

use super::{prolate_spheroidal_angular, KernelError};
use crate::{constants::AA_AXIS_EPSILON, mesh::axis_grid};

/// Evaluate the anti-aliasing function over an array with shape
/// `support_shape`. Along each axis, the prolate spheroidal angular function
/// S_mm(c, x) with m = `half_support` and c = `bandwidth` is evaluated just
/// inside [-1, 1]; the 2D function is the outer product of the two axes.
pub fn anti_aliasing_function(
    support_shape: (usize, usize),
    half_support: u32,
    bandwidth: f64,
) -> Result<Array2<f64>, KernelError> {
    if support_shape.0 == 0 || support_shape.1 == 0 {
        return Err(KernelError::EmptyShape(support_shape));
    }
    debug!(
        "Anti-aliasing function: shape {support_shape:?}, half support {half_support}, bandwidth {bandwidth}"
    );

    let shape = [support_shape.0, support_shape.1];
    let sx = prolate_spheroidal_angular(
        half_support,
        half_support,
        bandwidth,
        axis_grid(&shape, 0, AA_AXIS_EPSILON)?.view(),
    )?;
    let sy = prolate_spheroidal_angular(
        half_support,
        half_support,
        bandwidth,
        axis_grid(&shape, 1, AA_AXIS_EPSILON)?.view(),
    )?;

    Ok(Array2::from_shape_fn(support_shape, |(i, j)| sx[i] * sy[j]))
}
