// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GridError {
    #[error("The grid has shape {grid:?}, but its weights have shape {weights:?}")]
    WeightsShapeMismatch {
        grid: (usize, usize),
        weights: (usize, usize),
    },

    #[error("There are {positions} sample positions but {values} sample values")]
    SampleCountMismatch { positions: usize, values: usize },

    #[error("Sample positions need at least 2 columns (u, v), but only {0} were given")]
    TooFewColumns(usize),

    #[error("Sample {sample} at normalised position ({}, {}) maps to pixel ({}, {}), which is outside the {}x{} grid", position[0], position[1], index[0], index[1], grid_shape.0, grid_shape.1)]
    IndexOutOfBounds {
        sample: usize,
        position: [f64; 2],
        index: [f64; 2],
        grid_shape: (usize, usize),
    },

    #[error("A {}x{} kernel centred on pixel ({}, {}) doesn't fit on the {}x{} grid", kernel_shape.0, kernel_shape.1, pixel.0, pixel.1, grid_shape.0, grid_shape.1)]
    KernelOutOfBounds {
        pixel: (usize, usize),
        kernel_shape: (usize, usize),
        grid_shape: (usize, usize),
    },

    #[error("The convolution kernel is empty")]
    EmptyKernel,
}
