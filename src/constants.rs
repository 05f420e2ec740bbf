// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Useful constants.

All constants *must* be double precision.
 */

pub use std::f64::consts::{PI, TAU};

/// Speed of light \[metres/second\]
pub const VEL_C: f64 = 299_792_458.0;

/// Half of the width of the imaged field \[radians\]
pub const DEFAULT_FIELD_HALF_WIDTH: f64 = 0.1;

/// The number of samples gridded with each w kernel.
pub const DEFAULT_W_SLICE_SIZE: usize = 2000;

/// The half size of the cropped w kernel. The kernel is `2 * half + 1` pixels
/// on a side.
pub const DEFAULT_W_KERNEL_HALF_SIZE: usize = 15;

/// The half support (also the order of the prolate spheroidal function) of the
/// anti-aliasing kernel.
pub const DEFAULT_AA_HALF_SUPPORT: u32 = 3;

/// The bandwidth parameter c of the anti-aliasing kernel.
pub const DEFAULT_AA_BANDWIDTH: f64 = 3.0 * PI;

/// Distance kept from the endpoints of [-1, 1] when evaluating the
/// anti-aliasing function; the spheroidal functions are singular there.
pub const AA_AXIS_EPSILON: f64 = 1e-10;

/// `4 * field_half_width * grid_half_width` may differ from a whole number of
/// pixels by at most this fraction of it.
pub const GRID_SIZE_TOLERANCE: f64 = 1e-9;

/// Frequencies of two visibility sets are considered equal when they differ by
/// less than this \[Hz\].
pub const FREQ_MATCH_TOLERANCE_HZ: f64 = 1.0;

/// Phase centres of two visibility sets are considered equal when their RAs and
/// Decs each differ by less than this \[radians\].
pub const DIRECTION_MATCH_TOLERANCE_RAD: f64 = 1e-10;

/// The MWA's latitude on Earth \[radians\]. Simulated arrays are placed here
/// unless told otherwise.
pub const MWA_LAT_RAD: f64 = -0.4660608448386394;
/// The MWA's latitude on Earth \[degrees\]
pub const MWA_LAT_DEG: f64 = -26.703319405555554;

/// Antennas along each arm of a Y-shaped array are placed at distances
/// proportional to `(k / num_per_arm)^Y_ARRAY_SPACING_POWER`, like the VLA.
pub const Y_ARRAY_SPACING_POWER: f64 = 1.716;
