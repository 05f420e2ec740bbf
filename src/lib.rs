// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Gridding and w-projection imaging of radio-interferometer visibilities.

Irregularly-sampled visibilities are accumulated onto a regular uv grid
(alongside a coverage grid), and the normalised grid is inverse-Fourier
transformed into a dirty image. The w term of non-coplanar baselines is
approximated by sorting the samples in w, slicing them into ranges and
convolving each range with its own w kernel.
 */

pub mod constants;
pub mod coord;
pub mod fft;
pub mod gridding;
pub mod image;
pub mod imaging;
pub mod kernels;
pub(crate) mod math;
pub mod mesh;
pub mod vis;

pub(crate) mod cli;
mod params;

pub use cli::{HyperimageError, Hyperimage};
pub use imaging::{ImagingError, ImagingMethod, ImagingParams, WProjection};

use crossbeam_utils::atomic::AtomicCell;

/// Complex double-precision numbers. All visibilities, grids and kernels use
/// this type.
#[allow(non_camel_case_types)]
pub type c64 = num_complex::Complex<f64>;

lazy_static::lazy_static! {
    /// Are progress bars being drawn? This should only ever be enabled by CLI
    /// code.
    static ref PROGRESS_BARS: AtomicCell<bool> = AtomicCell::new(false);
}
