// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImageError {
    #[error("The numerator has shape {numerator:?}, but the denominator has shape {denominator:?}")]
    ShapeMismatch {
        numerator: (usize, usize),
        denominator: (usize, usize),
    },

    #[error("Can't extract a section of half size {half_size} from the middle of an array with shape {shape:?}")]
    ExtractTooLarge {
        half_size: usize,
        shape: (usize, usize),
    },
}
