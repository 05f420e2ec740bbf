// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Integration tests.
//!
//! Some help for laying out these tests was taken from:
//! https://matklad.github.io/2021/02/27/delete-cargo-integration-tests.html

mod image;
mod no_stderr;
mod vis_simulate;

use std::{
    fs::File,
    path::{Path, PathBuf},
    process::Output,
    str::from_utf8,
};

use assert_cmd::{output::OutputError, Command};

fn hyperimage() -> Command {
    Command::cargo_bin("hyperimage").unwrap()
}

fn get_cmd_output(result: Result<Output, OutputError>) -> (String, String) {
    let output = match result {
        Ok(o) => o,
        Err(o) => o.as_output().unwrap().clone(),
    };
    (
        from_utf8(&output.stdout).unwrap().to_string(),
        from_utf8(&output.stderr).unwrap().to_string(),
    )
}

fn make_file_in_dir<T: AsRef<Path>, U: AsRef<Path>>(filename: T, dir: U) -> (PathBuf, File) {
    let path = dir.as_ref().join(filename);
    let f = File::create(&path).expect("couldn't make file");
    (path, f)
}

/// Simulate a unit point source at (l, m) = (0.02, 0.01) observed at the
/// zenith by the default Y-shaped array, and return the path to the
/// visibilities. Imaged with a field half width of 0.1 radians and a grid
/// half width of 200 wavelengths, the peak lands on pixel (48, 44).
fn simulate_zenith_vis(dir: &Path) -> PathBuf {
    let vis = dir.join("vis.json");
    #[rustfmt::skip]
    let cmd = hyperimage()
        .args([
            "vis-simulate",
            "--sources", "0.02,0.01,1",
            "--output", &vis.display().to_string(),
            "--no-progress-bars",
        ])
        .ok();
    assert!(cmd.is_ok(), "vis-simulate failed: {}", get_cmd_output(cmd).1);
    assert!(vis.exists());
    vis
}
