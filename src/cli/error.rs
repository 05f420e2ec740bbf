// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Error type for all hyperimage-related errors. This should be the *only*
//! error enum that is publicly visible.

use thiserror::Error;

use super::{image::ImageArgsError, vis_simulate::VisSimulateArgsError};
use crate::{
    imaging::ImagingError,
    params::{VisReadError, VisSimulateError},
    vis::VisError,
};

/// The *only* publicly visible error from hyperimage.
#[derive(Error, Debug)]
pub enum HyperimageError {
    /// An error related to imaging (gridding, kernels, inversion).
    #[error("{0}")]
    Imaging(String),

    /// An error related to vis-simulate.
    #[error("{0}")]
    VisSimulate(String),

    /// An error related to reading visibilities.
    #[error("{0}")]
    VisRead(String),

    /// An error related to writing visibilities.
    #[error("{0}")]
    VisWrite(String),

    /// An error related to argument files.
    #[error("{0}")]
    ArgFile(String),

    /// A generic error that can't be clarified further with documentation,
    /// e.g. IO errors.
    #[error("{0}")]
    Generic(String),
}

impl From<ImagingError> for HyperimageError {
    fn from(e: ImagingError) -> Self {
        Self::Imaging(e.to_string())
    }
}

impl From<ImageArgsError> for HyperimageError {
    fn from(e: ImageArgsError) -> Self {
        match e {
            ImageArgsError::NoVis
            | ImageArgsError::VisDoesntExist(_)
            | ImageArgsError::VisNotJson(_) => Self::VisRead(e.to_string()),
            _ => Self::Imaging(e.to_string()),
        }
    }
}

impl From<VisSimulateArgsError> for HyperimageError {
    fn from(e: VisSimulateArgsError) -> Self {
        Self::VisSimulate(e.to_string())
    }
}

impl From<VisSimulateError> for HyperimageError {
    fn from(e: VisSimulateError) -> Self {
        match e {
            VisSimulateError::Vis(_) => Self::VisSimulate(e.to_string()),
            VisSimulateError::Json(_) | VisSimulateError::IO(_) => Self::VisWrite(e.to_string()),
        }
    }
}

impl From<VisReadError> for HyperimageError {
    fn from(e: VisReadError) -> Self {
        Self::VisRead(e.to_string())
    }
}

impl From<VisError> for HyperimageError {
    fn from(e: VisError) -> Self {
        Self::VisRead(e.to_string())
    }
}

impl From<std::io::Error> for HyperimageError {
    fn from(e: std::io::Error) -> Self {
        Self::Generic(e.to_string())
    }
}
