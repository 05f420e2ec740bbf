// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Super module for all coordinate types.

mod enh;
mod hadec;
mod radec;
mod uvw;
mod xyz;

// Re-exports.
pub use enh::ENH;
pub use hadec::HADec;
pub use radec::RADec;
pub use uvw::UVW;
pub use xyz::{xyzs_to_cross_uvws, y_shaped_array, XyzBaseline, XyzGeodetic};
