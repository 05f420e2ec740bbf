// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Handle UVW coordinates.
 */

use serde::{Deserialize, Serialize};

use super::{HADec, XyzBaseline};

/// The (u,v,w) coordinates of a baseline. There are no units (i.e. these are
/// dimensionless); they may be metres or wavelengths depending on context.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct UVW {
    /// u coordinate
    pub u: f64,
    /// v coordinate
    pub v: f64,
    /// w coordinate
    pub w: f64,
}

impl UVW {
    /// Convert an [`XyzBaseline`] to [`UVW`], given the phase centre.
    ///
    /// This is Equation 4.1 of: Interferometry and Synthesis in Radio
    /// Astronomy, Third Edition, Section 4: Geometrical Relationships,
    /// Polarimetry, and the Measurement Equation.
    pub fn from_xyz(xyz: XyzBaseline, phase_centre: HADec) -> UVW {
        let (s_ha, c_ha) = phase_centre.ha.sin_cos();
        let (s_dec, c_dec) = phase_centre.dec.sin_cos();
        UVW::from_xyz_inner(xyz, s_ha, c_ha, s_dec, c_dec)
    }

    /// Convert an [`XyzBaseline`] to [`UVW`]. This is just like
    /// [`UVW::from_xyz`], but with the sines and cosines of the phase centre
    /// precomputed.
    pub(super) fn from_xyz_inner(
        xyz: XyzBaseline,
        s_ha: f64,
        c_ha: f64,
        s_dec: f64,
        c_dec: f64,
    ) -> UVW {
        UVW {
            u: s_ha * xyz.x + c_ha * xyz.y,
            v: -s_dec * c_ha * xyz.x + s_dec * s_ha * xyz.y + c_dec * xyz.z,
            w: c_dec * c_ha * xyz.x - c_dec * s_ha * xyz.y + s_dec * xyz.z,
        }
    }

    pub fn to_array(self) -> [f64; 3] {
        [self.u, self.v, self.w]
    }
}

impl From<[f64; 3]> for UVW {
    fn from([u, v, w]: [f64; 3]) -> UVW {
        UVW { u, v, w }
    }
}

impl std::ops::Sub for UVW {
    type Output = UVW;

    fn sub(self, rhs: UVW) -> UVW {
        UVW {
            u: self.u - rhs.u,
            v: self.v - rhs.v,
            w: self.w - rhs.w,
        }
    }
}

impl std::ops::Mul<f64> for UVW {
    type Output = UVW;

    fn mul(self, rhs: f64) -> UVW {
        UVW {
            u: self.u * rhs,
            v: self.v * rhs,
            w: self.w * rhs,
        }
    }
}

impl std::ops::Div<f64> for UVW {
    type Output = UVW;

    fn div(self, rhs: f64) -> UVW {
        UVW {
            u: self.u / rhs,
            v: self.v / rhs,
            w: self.w / rhs,
        }
    }
}
