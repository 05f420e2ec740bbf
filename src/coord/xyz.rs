// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Handle (x,y,z) coordinates of an antenna (a.k.a. tile or station).
//!
//! This coordinate system is discussed at length in Interferometry and
//! Synthesis in Radio Astronomy, Third Edition, Section 4: Geometrical
//! Relationships, Polarimetry, and the Measurement Equation.

use serde::{Deserialize, Serialize};

use super::{HADec, ENH, UVW};
use crate::constants::{TAU, Y_ARRAY_SPACING_POWER};

/// The geodetic (x,y,z) coordinates of an antenna (a.k.a. tile or station). All
/// units are in metres.
///
/// This coordinate system is discussed at length in Interferometry and
/// Synthesis in Radio Astronomy, Third Edition, Section 4: Geometrical
/// Relationships, Polarimetry, and the Measurement Equation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct XyzGeodetic {
    /// x-coordinate \[meters\]
    pub x: f64,
    /// y-coordinate \[meters\]
    pub y: f64,
    /// z-coordinate \[meters\]
    pub z: f64,
}

/// The (x,y,z) coordinates of a baseline. All units are in metres.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct XyzBaseline {
    /// x-coordinate \[meters\]
    pub x: f64,
    /// y-coordinate \[meters\]
    pub y: f64,
    /// z-coordinate \[meters\]
    pub z: f64,
}

impl std::ops::Sub<XyzGeodetic> for XyzGeodetic {
    type Output = XyzBaseline;

    fn sub(self, rhs: Self) -> XyzBaseline {
        XyzBaseline {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
            z: self.z - rhs.z,
        }
    }
}

/// For each pair of antennas, calculate a baseline [`UVW`]. The baseline
/// between antennas `i` and `j` (with `i < j`) is `antenna i - antenna j`, and
/// baselines are ordered by `i` and then `j`. Auto-correlations are not
/// included.
pub fn xyzs_to_cross_uvws(xyzs: &[XyzGeodetic], phase_centre: HADec) -> Vec<UVW> {
    let (s_ha, c_ha) = phase_centre.ha.sin_cos();
    let (s_dec, c_dec) = phase_centre.dec.sin_cos();

    // Get a UVW for each antenna.
    let antenna_uvws: Vec<UVW> = xyzs
        .iter()
        .map(|&xyz| {
            let bl = XyzBaseline {
                x: xyz.x,
                y: xyz.y,
                z: xyz.z,
            };
            UVW::from_xyz_inner(bl, s_ha, c_ha, s_dec, c_dec)
        })
        .collect();

    // Take the difference of every pair of UVWs.
    let num_antennas = xyzs.len();
    let num_baselines = (num_antennas * num_antennas.saturating_sub(1)) / 2;
    let mut bl_uvws = Vec::with_capacity(num_baselines);
    for (i, &antenna_1) in antenna_uvws.iter().enumerate() {
        for &antenna_2 in &antenna_uvws[i + 1..] {
            bl_uvws.push(antenna_1 - antenna_2);
        }
    }
    bl_uvws
}

/// Lay out a Y-shaped array on flat ground at the given latitude \[radians\].
/// The three arms point north, 120° and 240° east of north, and each holds
/// `num_per_arm` antennas out to `arm_length` metres from the array centre.
/// Antennas are ordered arm by arm, innermost first.
pub fn y_shaped_array(num_per_arm: usize, arm_length: f64, latitude: f64) -> Vec<XyzGeodetic> {
    let mut xyzs = Vec::with_capacity(3 * num_per_arm);
    for arm in 0..3 {
        let (s_az, c_az) = (TAU * arm as f64 / 3.0).sin_cos();
        for k in 1..=num_per_arm {
            let distance = arm_length * (k as f64 / num_per_arm as f64).powf(Y_ARRAY_SPACING_POWER);
            let enh = ENH {
                e: distance * s_az,
                n: distance * c_az,
                h: 0.0,
            };
            xyzs.push(enh.to_xyz(latitude));
        }
    }
    xyzs
}
