// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Handle East, North and Height coordinates of antennas.
*/

use super::XyzGeodetic;

/// East, North and Height coordinates of an antenna. All units are in metres.
#[derive(Clone, Copy, Debug, PartialEq)]
#[allow(clippy::upper_case_acronyms)]
pub struct ENH {
    /// East \[metres\]
    pub e: f64,
    /// North \[metres\]
    pub n: f64,
    /// Height \[metres\]
    pub h: f64,
}

impl ENH {
    /// Convert coords in local topocentric East, North, Height units to 'local'
    /// XYZ units. Local means Z points north, X points through the equator from
    /// the geocenter along the local meridian and Y is East. Latitude is
    /// geodetic, in radians.
    ///
    /// Taken from the third edition of Interferometry and Synthesis in Radio
    /// Astronomy, chapter 4: Geometrical Relationships, Polarimetry, and the
    /// Measurement Equation.
    pub fn to_xyz(self, latitude: f64) -> XyzGeodetic {
        let (s_lat, c_lat) = latitude.sin_cos();
        XyzGeodetic {
            x: -self.n * s_lat + self.h * c_lat,
            y: self.e,
            z: self.n * c_lat + self.h * s_lat,
        }
    }
}
