// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Errors associated with visibilities.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum VisError {
    #[error("Direction cosines (l, m) = ({l}, {m}) are not on the sky; l^2 + m^2 must be at most 1")]
    DirectionCosineDomain { l: f64, m: f64 },

    #[error("Sample positions need 3 columns (u, v, w), but only {0} were given")]
    TooFewColumns(usize),

    #[error("There are {positions} sample positions but {values} sample values")]
    SampleCountMismatch { positions: usize, values: usize },

    #[error("Expected {expected} {what}, but got {got}")]
    ShapeMismatch {
        what: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("There are no visibilities")]
    Empty,

    #[error("Can't combine visibilities with different frequencies")]
    FreqMismatch,

    #[error("Can't combine visibilities with different phase centres ({0} and {1})")]
    DirectionMismatch(String, String),
}
