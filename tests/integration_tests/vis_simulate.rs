// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Tests against the "vis-simulate" command-line interface.

use std::{fs::File, io::BufReader};

use approx::assert_abs_diff_eq;
use mwa_hyperimage::vis::Visibilities;
use tempfile::TempDir;

use crate::{get_cmd_output, hyperimage, simulate_zenith_vis};

fn read(path: &std::path::Path) -> Visibilities {
    serde_json::from_reader(BufReader::new(File::open(path).unwrap())).unwrap()
}

#[test]
fn test_simulate_defaults() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let vis = read(&simulate_zenith_vis(tmp_dir.path()));
    // 24 antennas make 276 baselines.
    assert_eq!(vis.num_rows(), 276);
    assert_eq!(vis.num_chans(), 1);
    assert_abs_diff_eq!(vis.freqs()[0], 150e6);
    assert!(vis.weights().iter().all(|&w| w == 1.0));
    // At the zenith, w is (close to) zero.
    assert!(vis.uvws().iter().all(|uvw| uvw.w.abs() < 1e-9));
}

#[test]
fn test_simulate_more_timesteps_and_channels() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let output = tmp_dir.path().join("vis.json");
    #[rustfmt::skip]
    let cmd = hyperimage()
        .args([
            "simulate-vis",
            "--num-antennas-per-arm", "4",
            "--num-timesteps", "3",
            "--num-fine-channels", "4",
            "--freq-res", "40",
            "--sources", "0,0,1", "0.05,-0.02,0.5",
            "--output", &output.display().to_string(),
            "--no-progress-bars",
        ])
        .ok();
    assert!(cmd.is_ok(), "{}", get_cmd_output(cmd).1);

    let vis = read(&output);
    // 12 antennas make 66 baselines.
    assert_eq!(vis.num_rows(), 3 * 66);
    assert_eq!(vis.num_chans(), 4);
    assert_abs_diff_eq!(vis.freqs()[0], 149.94e6, epsilon = 1e-3);
    assert_abs_diff_eq!(vis.freqs()[3], 150.06e6, epsilon = 1e-3);
}

#[test]
fn test_simulate_dry_run() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let output = tmp_dir.path().join("vis.json");
    let cmd = hyperimage()
        .args(["vis-simulate", "--output", &output.display().to_string(), "--dry-run"])
        .ok();
    let (stdout, _) = get_cmd_output(cmd);
    assert!(stdout.contains("Dry run -- exiting now."), "{stdout}");
    assert!(!output.exists());
}

#[test]
fn test_simulate_bad_source() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let output = tmp_dir.path().join("vis.json");
    let cmd = hyperimage()
        .args([
            "vis-simulate",
            "--sources",
            "0.1,0.2",
            "--output",
            &output.display().to_string(),
        ])
        .ok();
    assert!(cmd.is_err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.starts_with("Error: "), "{stderr}");
    assert!(stderr.contains("0.1,0.2"), "{stderr}");
    assert!(!output.exists());
}
