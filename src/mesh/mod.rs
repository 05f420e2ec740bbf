// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Normalised coordinate meshes. Every axis is mapped linearly onto [-1, 1].


use ndarray::prelude::*;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MeshError {
    #[error("Asked for axis {axis}, but the shape {shape:?} only has {} axes", shape.len())]
    InvalidAxis { axis: usize, shape: Vec<usize> },
}

/// Get the normalised (x, y) coordinates of every cell of an array with the
/// given shape. x varies along axis 0 and y along axis 1; both span -1 to 1
/// inclusive.
pub fn full_grid(shape: (usize, usize)) -> (Array2<f64>, Array2<f64>) {
    let xs = Array1::linspace(-1.0, 1.0, shape.0);
    let ys = Array1::linspace(-1.0, 1.0, shape.1);
    let x = Array2::from_shape_fn(shape, |(i, _)| xs[i]);
    let y = Array2::from_shape_fn(shape, |(_, j)| ys[j]);
    (x, y)
}

/// A 1D array spanning the `axis`th axis of `shape` with values from
/// `-1 + epsilon` to `1 - epsilon`.
pub fn axis_grid(shape: &[usize], axis: usize, epsilon: f64) -> Result<Array1<f64>, MeshError> {
    let len = *shape.get(axis).ok_or_else(|| MeshError::InvalidAxis {
        axis,
        shape: shape.to_vec(),
    })?;
    Ok(Array1::linspace(-1.0 + epsilon, 1.0 - epsilon, len))
}
