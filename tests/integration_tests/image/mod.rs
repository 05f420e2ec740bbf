// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Tests against the "image" command-line interface.

mod arg_files;

use std::fs::File;

use approx::assert_abs_diff_eq;
use serde_json::Value;
use tempfile::TempDir;

use crate::{get_cmd_output, hyperimage, simulate_zenith_vis};

#[test]
fn test_image_methods_find_the_source() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let vis = simulate_zenith_vis(tmp_dir.path());

    for method in ["simple", "anti-aliased", "w-projection"] {
        #[rustfmt::skip]
        let cmd = hyperimage()
            .args([
                "image",
                "--vis", &vis.display().to_string(),
                "--method", method,
                "--field-half-width", "0.1",
                "--grid-half-width", "200",
                "--no-progress-bars",
            ])
            .ok();
        assert!(cmd.is_ok(), "{method}: {}", get_cmd_output(cmd).1);
        let (stdout, _) = get_cmd_output(cmd);
        assert!(stdout.contains("80x80"), "{method}: {stdout}");
        assert!(stdout.contains("Peak pixel: (48, 44)"), "{method}: {stdout}");
        assert!(stdout.contains("hyperimage image complete."), "{stdout}");
    }
}

#[test]
fn test_image_summary_file() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let vis = simulate_zenith_vis(tmp_dir.path());
    let summary = tmp_dir.path().join("summary.json");

    #[rustfmt::skip]
    let cmd = hyperimage()
        .args([
            "image",
            "--vis", &vis.display().to_string(),
            "--field-half-width", "0.1",
            "--grid-half-width", "200",
            "-o", &summary.display().to_string(),
            "--no-progress-bars",
        ])
        .ok();
    assert!(cmd.is_ok(), "{}", get_cmd_output(cmd).1);

    let summary: Value = serde_json::from_reader(File::open(&summary).unwrap()).unwrap();
    // w-projection is the default method.
    assert_eq!(summary["num_w_slices"], 1);
    assert_eq!(summary["grid_size"], 80);
    assert_eq!(summary["num_samples"], 276);
    assert_eq!(summary["peak_pixel"], serde_json::json!([48, 44]));
    assert_abs_diff_eq!(
        summary["peak_lm"][0].as_f64().unwrap(),
        0.02,
        epsilon = 1e-12
    );
    assert_abs_diff_eq!(
        summary["peak_lm"][1].as_f64().unwrap(),
        0.01,
        epsilon = 1e-12
    );
}

#[test]
fn test_image_picks_a_grid() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let vis = simulate_zenith_vis(tmp_dir.path());

    #[rustfmt::skip]
    let cmd = hyperimage()
        .args([
            "image",
            "--vis", &vis.display().to_string(),
            "--method", "simple",
            "--field-half-width", "0.1",
            "--no-progress-bars",
        ])
        .ok();
    assert!(cmd.is_ok(), "{}", get_cmd_output(cmd).1);
    let (stdout, _) = get_cmd_output(cmd);
    assert!(stdout.contains("40x40"), "{stdout}");
    assert!(stdout.contains("Peak pixel: (24, 22)"), "{stdout}");
}

#[test]
fn test_image_warns_about_unused_args() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let vis = simulate_zenith_vis(tmp_dir.path());

    #[rustfmt::skip]
    let cmd = hyperimage()
        .args([
            "image",
            "--vis", &vis.display().to_string(),
            "--method", "simple",
            "--w-slice-size", "10",
            "--dry-run",
        ])
        .ok();
    assert!(cmd.is_ok(), "{}", get_cmd_output(cmd).1);
    let (stdout, _) = get_cmd_output(cmd);
    assert!(
        stdout.contains("w-projection arguments are ignored by the simple method"),
        "{stdout}"
    );
    assert!(stdout.contains("Dry run -- exiting now."), "{stdout}");
    assert!(!stdout.contains("Peak pixel"), "{stdout}");
}

#[test]
fn test_image_kernel_off_the_grid() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let vis = simulate_zenith_vis(tmp_dir.path());

    // Samples reach the edge of a grid this small; 31x31 kernels can't fit.
    #[rustfmt::skip]
    let cmd = hyperimage()
        .args([
            "image",
            "--vis", &vis.display().to_string(),
            "--field-half-width", "0.1",
            "--grid-half-width", "100",
            "--no-progress-bars",
        ])
        .ok();
    assert!(cmd.is_err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.starts_with("Error: "), "{stderr}");
}

#[test]
fn test_image_vis_errors() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");

    let cmd = hyperimage().args(["image", "--no-progress-bars"]).ok();
    assert!(cmd.is_err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(
        stderr.contains("No visibility files were supplied"),
        "{stderr}"
    );

    let missing = tmp_dir.path().join("missing.json");
    let cmd = hyperimage()
        .args(["image", "--vis", &missing.display().to_string()])
        .ok();
    assert!(cmd.is_err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.contains("doesn't exist"), "{stderr}");
}

#[test]
fn test_image_bad_method() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let vis = simulate_zenith_vis(tmp_dir.path());

    let cmd = hyperimage()
        .args([
            "image",
            "--vis",
            &vis.display().to_string(),
            "--method",
            "clean",
        ])
        .ok();
    assert!(cmd.is_err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(
        stderr.contains("Valid choices are: simple, anti-aliased, w-projection"),
        "{stderr}"
    );
}
