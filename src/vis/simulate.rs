// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Simulating the visibilities of point sources.

use log::debug;
use ndarray::prelude::*;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use vec1::Vec1;

use super::{lm_to_n, VisError, Visibilities};
use crate::{
    c64,
    constants::{PI, TAU, VEL_C},
    coord::{xyzs_to_cross_uvws, HADec, RADec, XyzGeodetic, UVW},
    math::cexp,
};

/// A point source with flux density `flux` at direction cosines (l, m)
/// relative to the phase centre.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointSource {
    pub l: f64,
    pub m: f64,
    pub flux: f64,
}

/// Observe `sources` with antennas at `xyzs`, once for each hour angle
/// \[radians\] in `hour_angles`. Each visibility is
/// `Σ flux exp(-2πi (u l + v m + w sqrt(1 - l^2 - m^2)))`, with (u, v, w) in
/// wavelengths. Rows are ordered by time and then baseline; all weights are 1.
pub fn simulate_visibilities(
    xyzs: &[XyzGeodetic],
    hour_angles: &[f64],
    phase_centre: RADec,
    freqs: Vec1<f64>,
    sources: &[PointSource],
) -> Result<Visibilities, VisError> {
    // (l, m, n) for each source.
    let lmns = sources
        .iter()
        .map(|s| lm_to_n(s.l, s.m).map(|n| (s.l, s.m, n, s.flux)))
        .collect::<Result<Vec<_>, _>>()?;

    let mut uvws: Vec<UVW> = vec![];
    let mut times = vec![];
    let mut antenna1 = vec![];
    let mut antenna2 = vec![];
    for &ha in hour_angles {
        let hadec = HADec::new(ha, phase_centre.dec);
        uvws.extend(xyzs_to_cross_uvws(xyzs, hadec));
        for i in 0..xyzs.len() {
            for j in i + 1..xyzs.len() {
                antenna1.push(i);
                antenna2.push(j);
                times.push(ha * 43200.0 / PI);
            }
        }
    }
    debug!(
        "Simulating {} sources over {} rows and {} channels",
        sources.len(),
        uvws.len(),
        freqs.len()
    );

    let mut vis = Array2::<c64>::zeros((uvws.len(), freqs.len()));
    vis.axis_iter_mut(Axis(0))
        .into_par_iter()
        .zip(uvws.par_iter())
        .for_each(|(mut vis_row, &uvw)| {
            vis_row
                .iter_mut()
                .zip(freqs.iter())
                .for_each(|(vis, &freq)| {
                    let UVW { u, v, w } = uvw * freq / VEL_C;
                    *vis = lmns
                        .iter()
                        .map(|&(l, m, n, flux)| flux * cexp(-TAU * (u * l + v * m + w * n)))
                        .sum();
                });
        });
    let weights = Array2::ones(vis.dim());

    Visibilities::new(
        uvws,
        times,
        antenna1,
        antenna2,
        vis,
        weights,
        freqs,
        phase_centre,
    )
}
