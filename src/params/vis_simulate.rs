// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Simulate the visibilities of point sources and write them out.

use std::path::PathBuf;

use log::info;
use thiserror::Error;
use vec1::Vec1;

use super::write_visibilities;
use crate::{
    coord::{RADec, XyzGeodetic},
    vis::{simulate_visibilities, PointSource, VisError},
};

/// Parameters needed to simulate visibilities.
pub(crate) struct VisSimulateParams {
    /// The positions of the antennas.
    pub(crate) xyzs: Vec<XyzGeodetic>,

    /// The hour angles of the phase centre at each timestep \[radians\].
    pub(crate) hour_angles: Vec1<f64>,

    pub(crate) phase_centre: RADec,

    /// \[Hz\]
    pub(crate) freqs: Vec1<f64>,

    pub(crate) sources: Vec1<PointSource>,

    pub(crate) output: PathBuf,
}

impl VisSimulateParams {
    pub(crate) fn run(&self) -> Result<(), VisSimulateError> {
        let VisSimulateParams {
            xyzs,
            hour_angles,
            phase_centre,
            freqs,
            sources,
            output,
        } = self;

        let vis = simulate_visibilities(xyzs, hour_angles, *phase_centre, freqs.clone(), sources)?;
        write_visibilities(output, &vis)?;
        info!(
            "Wrote {} rows x {} channels of visibilities to {}",
            vis.num_rows(),
            vis.num_chans(),
            output.display()
        );
        Ok(())
    }
}

#[derive(Error, Debug)]
pub(crate) enum VisSimulateError {
    #[error(transparent)]
    Vis(#[from] VisError),

    #[error("Couldn't encode visibilities as JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    IO(#[from] std::io::Error),
}
