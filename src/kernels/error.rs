// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Errors associated with convolution kernels.

use thiserror::Error;

use crate::{image::ImageError, mesh::MeshError};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum KernelError {
    #[error("Pixel ({}, {}) of the w phase screen has r^2 = {r2} (> 1); it is outside the sky", pixel.0, pixel.1)]
    WScreenDomain { pixel: (usize, usize), r2: f64 },

    #[error("The field half width must be a positive, finite number of radians, but got {0}")]
    InvalidFieldHalfWidth(f64),

    #[error("The w value used for a w kernel must be finite, but got {0}")]
    NonFiniteW(f64),

    #[error("Kernels can't be made with an empty shape {0:?}")]
    EmptyShape((usize, usize)),

    #[error(transparent)]
    Spheroidal(#[from] SpheroidalError),

    #[error(transparent)]
    Mesh(#[from] MeshError),

    #[error(transparent)]
    Image(#[from] ImageError),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SpheroidalError {
    #[error("The degree n ({n}) of a spheroidal function can't be less than its order m ({m})")]
    DegreeBelowOrder { m: u32, n: u32 },

    #[error("The spheroidal bandwidth parameter c must be finite and non-negative, but got {0}")]
    InvalidBandwidth(f64),

    #[error("Angular spheroidal functions are defined on [-1, 1], but got x = {0}")]
    OutOfDomain(f64),

    #[error("The Legendre expansion of S_{m}{n}(c = {c}) did not converge")]
    NoConvergence { m: u32, n: u32, c: f64 },

    #[error("S_{m}{n}(c = {c}, x = {x}) is not finite")]
    NotFinite { m: u32, n: u32, c: f64, x: f64 },
}
