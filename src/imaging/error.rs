// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Errors associated with imaging.

use thiserror::Error;

use crate::{gridding::GridError, image::ImageError, kernels::KernelError, vis::VisError};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ImagingError {
    #[error("There are no visibility samples to image")]
    NoSamples,

    #[error("The grid size 4 * {field_half_width} * {grid_half_width} = {size} isn't a positive, even number of pixels")]
    InvalidGridSize {
        field_half_width: f64,
        grid_half_width: f64,
        size: f64,
    },

    #[error(transparent)]
    Grid(#[from] GridError),

    #[error(transparent)]
    Kernel(#[from] KernelError),

    #[error(transparent)]
    Vis(#[from] VisError),

    #[error(transparent)]
    Image(#[from] ImageError),
}
