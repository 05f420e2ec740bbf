// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Parameters for `hyperimage` subcommands.
//!
//! The code here is kind of "mirroring" the code within the `cli` module; the
//! idea is that `cli` is unparsed, user-facing code, whereas parameters have
//! been parsed and are ready to be used directly.

mod image;
mod vis_simulate;

pub(crate) use image::{ImageParams, ImageSummary};
pub(crate) use vis_simulate::{VisSimulateError, VisSimulateParams};

use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

use log::debug;
use thiserror::Error;

use crate::vis::Visibilities;

#[derive(Error, Debug)]
pub(crate) enum VisReadError {
    #[error("Couldn't open visibility file '{}': {err}", path.display())]
    Open { path: PathBuf, err: std::io::Error },

    #[error("Couldn't read visibilities from '{}': {err}", path.display())]
    Decode {
        path: PathBuf,
        err: serde_json::Error,
    },
}

/// Read JSON visibilities. All of the validation done by
/// [`Visibilities::new`] is done here too.
pub(crate) fn read_visibilities(path: &Path) -> Result<Visibilities, VisReadError> {
    debug!("Reading visibilities from {}", path.display());
    let f = File::open(path).map_err(|err| VisReadError::Open {
        path: path.to_path_buf(),
        err,
    })?;
    serde_json::from_reader(BufReader::new(f)).map_err(|err| VisReadError::Decode {
        path: path.to_path_buf(),
        err,
    })
}

/// Write visibilities as JSON.
pub(crate) fn write_visibilities(path: &Path, vis: &Visibilities) -> Result<(), VisSimulateError> {
    debug!("Writing visibilities to {}", path.display());
    let mut f = BufWriter::new(File::create(path)?);
    serde_json::to_writer(&mut f, vis)?;
    f.flush()?;
    Ok(())
}
