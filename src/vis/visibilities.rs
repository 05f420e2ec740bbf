// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! A table of visibilities for one phase centre and one set of frequencies.

use itertools::izip;
use log::debug;
use ndarray::prelude::*;
use serde::{Deserialize, Serialize};
use vec1::Vec1;

use super::VisError;
use crate::{
    c64,
    constants::{DIRECTION_MATCH_TOLERANCE_RAD, FREQ_MATCH_TOLERANCE_HZ, VEL_C},
    coord::{RADec, UVW},
};

/// Visibilities observed with a single phase centre and a single set of
/// frequencies. Each row is one baseline at one time, and each column is a
/// frequency channel. All lengths are validated when the table is made, so a
/// table is never inconsistent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "VisibilitiesFile", into = "VisibilitiesFile")]
pub struct Visibilities {
    /// Baseline coordinates \[metres\]
    uvws: Vec<UVW>,
    /// \[seconds\]
    times: Vec<f64>,
    antenna1: Vec<usize>,
    antenna2: Vec<usize>,
    /// Shape is (rows, channels).
    vis: Array2<c64>,
    /// Shape is (rows, channels).
    weights: Array2<f64>,
    /// \[Hz\]
    freqs: Vec1<f64>,
    phase_centre: RADec,
}

impl Visibilities {
    /// Make a new table. Every per-row input must have the same number of rows
    /// (at least one), and `vis` and `weights` need a column for each
    /// frequency.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        uvws: Vec<UVW>,
        times: Vec<f64>,
        antenna1: Vec<usize>,
        antenna2: Vec<usize>,
        vis: Array2<c64>,
        weights: Array2<f64>,
        freqs: Vec1<f64>,
        phase_centre: RADec,
    ) -> Result<Visibilities, VisError> {
        let num_rows = times.len();
        if num_rows == 0 {
            return Err(VisError::Empty);
        }
        let check = |what, got| {
            if got == num_rows {
                Ok(())
            } else {
                Err(VisError::ShapeMismatch {
                    what,
                    expected: num_rows,
                    got,
                })
            }
        };
        check("rows of UVWs", uvws.len())?;
        check("rows of antenna1", antenna1.len())?;
        check("rows of antenna2", antenna2.len())?;
        check("rows of visibilities", vis.nrows())?;
        check("rows of weights", weights.nrows())?;

        let num_chans = freqs.len();
        for (what, got) in [
            ("visibility channels", vis.ncols()),
            ("weight channels", weights.ncols()),
        ] {
            if got != num_chans {
                return Err(VisError::ShapeMismatch {
                    what,
                    expected: num_chans,
                    got,
                });
            }
        }

        Ok(Visibilities {
            uvws,
            times,
            antenna1,
            antenna2,
            vis,
            weights,
            freqs,
            phase_centre,
        })
    }

    /// Combine two tables, with the rows of `other` after those of `self`. The
    /// tables must have the same frequencies and phase centre (both to within a
    /// tolerance).
    pub fn add(&self, other: &Visibilities) -> Result<Visibilities, VisError> {
        if self.freqs.len() != other.freqs.len()
            || self
                .freqs
                .iter()
                .zip(other.freqs.iter())
                .any(|(a, b)| (a - b).abs() >= FREQ_MATCH_TOLERANCE_HZ)
        {
            return Err(VisError::FreqMismatch);
        }
        if (self.phase_centre.ra - other.phase_centre.ra).abs() >= DIRECTION_MATCH_TOLERANCE_RAD
            || (self.phase_centre.dec - other.phase_centre.dec).abs()
                >= DIRECTION_MATCH_TOLERANCE_RAD
        {
            return Err(VisError::DirectionMismatch(
                self.phase_centre.to_string(),
                other.phase_centre.to_string(),
            ));
        }
        debug!(
            "Adding tables with {} rows and {} rows",
            self.num_rows(),
            other.num_rows()
        );

        let r1 = self.num_rows();
        let shape = (r1 + other.num_rows(), self.num_chans());
        let vis = Array2::from_shape_fn(shape, |(i, j)| {
            if i < r1 {
                self.vis[(i, j)]
            } else {
                other.vis[(i - r1, j)]
            }
        });
        let weights = Array2::from_shape_fn(shape, |(i, j)| {
            if i < r1 {
                self.weights[(i, j)]
            } else {
                other.weights[(i - r1, j)]
            }
        });

        Visibilities::new(
            [self.uvws.as_slice(), other.uvws.as_slice()].concat(),
            [self.times.as_slice(), other.times.as_slice()].concat(),
            [self.antenna1.as_slice(), other.antenna1.as_slice()].concat(),
            [self.antenna2.as_slice(), other.antenna2.as_slice()].concat(),
            vis,
            weights,
            self.freqs.clone(),
            self.phase_centre,
        )
    }

    /// Flatten the table into gridding samples, one for each row and channel
    /// (channels vary fastest). Positions are (u, v, w) in wavelengths.
    pub fn samples(&self) -> (Array2<f64>, Array1<c64>) {
        let num_samples = self.num_rows() * self.num_chans();
        let mut positions = Array2::zeros((num_samples, 3));
        let mut values = Array1::zeros(num_samples);

        let samples = positions
            .outer_iter_mut()
            .zip(values.iter_mut())
            .zip(self.vis.iter());
        let uvws_lambda = self.uvws.iter().flat_map(|&uvw| {
            self.freqs
                .iter()
                .map(move |&freq| (uvw * freq / VEL_C).to_array())
        });
        for (((mut position, value), vis), uvw) in samples.zip(uvws_lambda) {
            position.assign(&ArrayView1::from(&uvw));
            *value = *vis;
        }
        (positions, values)
    }

    /// As [`Visibilities::samples`], but flagged samples (those with a weight
    /// that isn't positive) are left out.
    pub fn unflagged_samples(&self) -> (Array2<f64>, Array1<c64>) {
        let (positions, values) = self.samples();
        let keep: Vec<usize> = self
            .weights
            .iter()
            .enumerate()
            .filter(|(_, &w)| w > 0.0)
            .map(|(i, _)| i)
            .collect();
        if keep.len() < values.len() {
            debug!(
                "Ignoring {} flagged samples",
                values.len() - keep.len()
            );
        }
        (
            positions.select(Axis(0), &keep),
            values.select(Axis(0), &keep),
        )
    }

    pub fn num_rows(&self) -> usize {
        self.times.len()
    }

    pub fn num_chans(&self) -> usize {
        self.freqs.len()
    }

    pub fn uvws(&self) -> &[UVW] {
        &self.uvws
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    pub fn antenna1(&self) -> &[usize] {
        &self.antenna1
    }

    pub fn antenna2(&self) -> &[usize] {
        &self.antenna2
    }

    pub fn vis(&self) -> ArrayView2<c64> {
        self.vis.view()
    }

    pub fn weights(&self) -> ArrayView2<f64> {
        self.weights.view()
    }

    pub fn freqs(&self) -> &Vec1<f64> {
        &self.freqs
    }

    pub fn phase_centre(&self) -> RADec {
        self.phase_centre
    }
}

/// How [`Visibilities`] are (de)serialised; one entry per row, with the phase
/// centre in radians and complex numbers as `[re, im]` pairs.
#[derive(Serialize, Deserialize)]
struct VisibilitiesFile {
    phase_centre: PhaseCentreRadians,
    freqs: Vec1<f64>,
    rows: Vec<VisibilitiesRow>,
}

#[derive(Serialize, Deserialize)]
struct PhaseCentreRadians {
    ra: f64,
    dec: f64,
}

#[derive(Serialize, Deserialize)]
struct VisibilitiesRow {
    uvw: [f64; 3],
    time: f64,
    antenna1: usize,
    antenna2: usize,
    vis: Vec<[f64; 2]>,
    weights: Vec<f64>,
}

impl From<Visibilities> for VisibilitiesFile {
    fn from(v: Visibilities) -> VisibilitiesFile {
        let rows = izip!(
            v.uvws.iter(),
            v.times.iter(),
            v.antenna1.iter(),
            v.antenna2.iter(),
            v.vis.outer_iter(),
            v.weights.outer_iter()
        )
        .map(
            |(uvw, &time, &antenna1, &antenna2, vis, weights)| VisibilitiesRow {
                uvw: uvw.to_array(),
                time,
                antenna1,
                antenna2,
                vis: vis.iter().map(|v| [v.re, v.im]).collect(),
                weights: weights.to_vec(),
            },
        )
        .collect();

        VisibilitiesFile {
            phase_centre: PhaseCentreRadians {
                ra: v.phase_centre.ra,
                dec: v.phase_centre.dec,
            },
            freqs: v.freqs,
            rows,
        }
    }
}

impl TryFrom<VisibilitiesFile> for Visibilities {
    type Error = VisError;

    fn try_from(file: VisibilitiesFile) -> Result<Visibilities, VisError> {
        let num_rows = file.rows.len();
        let num_chans = file.freqs.len();
        let mut uvws = Vec::with_capacity(num_rows);
        let mut times = Vec::with_capacity(num_rows);
        let mut antenna1 = Vec::with_capacity(num_rows);
        let mut antenna2 = Vec::with_capacity(num_rows);
        let mut vis = Array2::zeros((num_rows, num_chans));
        let mut weights = Array2::zeros((num_rows, num_chans));

        for (i_row, row) in file.rows.into_iter().enumerate() {
            for (what, got) in [
                ("visibility channels", row.vis.len()),
                ("weight channels", row.weights.len()),
            ] {
                if got != num_chans {
                    return Err(VisError::ShapeMismatch {
                        what,
                        expected: num_chans,
                        got,
                    });
                }
            }
            uvws.push(UVW::from(row.uvw));
            times.push(row.time);
            antenna1.push(row.antenna1);
            antenna2.push(row.antenna2);
            vis.row_mut(i_row)
                .iter_mut()
                .zip(row.vis)
                .for_each(|(v, [re, im])| *v = c64::new(re, im));
            weights
                .row_mut(i_row)
                .assign(&ArrayView1::from(row.weights.as_slice()));
        }

        Visibilities::new(
            uvws,
            times,
            antenna1,
            antenna2,
            vis,
            weights,
            file.freqs,
            RADec::new(file.phase_centre.ra, file.phase_centre.dec),
        )
    }
}
