// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! This module tests the "image" command-line interface with toml and json
//! argument files.

use std::io::Write;

use indoc::formatdoc;
use tempfile::tempdir;

use crate::{get_cmd_output, hyperimage, make_file_in_dir, simulate_zenith_vis};

#[test]
fn arg_file_toml() {
    let temp_dir = tempdir().expect("Couldn't make tempdir");
    let vis = simulate_zenith_vis(temp_dir.path());

    let (toml, mut toml_file) = make_file_in_dir("image.toml", temp_dir.path());
    write!(
        toml_file,
        "{}",
        formatdoc! {r#"
            [image]
            vis = ["{}"]
            method = "simple"
            field_half_width = 0.1
            grid_half_width = 200.0
        "#, vis.display()}
    )
    .unwrap();
    toml_file.flush().unwrap();

    let cmd = hyperimage()
        .arg("image")
        .arg(toml.display().to_string())
        .arg("--no-progress-bars")
        .ok();
    assert!(cmd.is_ok(), "{}", get_cmd_output(cmd).1);
    let (stdout, _) = get_cmd_output(cmd);
    assert!(stdout.contains("Peak pixel: (48, 44)"), "{stdout}");
}

#[test]
fn arg_file_json_with_cli_override() {
    let temp_dir = tempdir().expect("Couldn't make tempdir");
    let vis = simulate_zenith_vis(temp_dir.path());

    let (json, mut json_file) = make_file_in_dir("image.json", temp_dir.path());
    write!(
        json_file,
        "{}",
        formatdoc! {r#"
            {{
                "image": {{
                    "vis": ["{}"],
                    "method": "simple",
                    "field_half_width": 0.1,
                    "grid_half_width": 200.0
                }}
            }}
        "#, vis.display()}
    )
    .unwrap();
    json_file.flush().unwrap();

    // The command line wins over the file.
    let cmd = hyperimage()
        .arg("image")
        .arg(json.display().to_string())
        .args(["--method", "anti-aliased", "--no-progress-bars"])
        .ok();
    assert!(cmd.is_ok(), "{}", get_cmd_output(cmd).1);
    let (stdout, _) = get_cmd_output(cmd);
    assert!(stdout.contains("Imaging with method anti-aliased"), "{stdout}");
    assert!(stdout.contains("Peak pixel: (48, 44)"), "{stdout}");
}

#[test]
fn save_toml_then_reuse() {
    let temp_dir = tempdir().expect("Couldn't make tempdir");
    let vis = simulate_zenith_vis(temp_dir.path());
    let saved = temp_dir.path().join("saved.toml");

    #[rustfmt::skip]
    let cmd = hyperimage()
        .args([
            "image",
            "--vis", &vis.display().to_string(),
            "--method", "simple",
            "--field-half-width", "0.1",
            "--grid-half-width", "200",
            "--save-toml", &saved.display().to_string(),
            "--dry-run",
        ])
        .ok();
    assert!(cmd.is_ok(), "{}", get_cmd_output(cmd).1);
    assert!(saved.exists());

    let cmd = hyperimage()
        .arg("image")
        .arg(saved.display().to_string())
        .arg("--no-progress-bars")
        .ok();
    assert!(cmd.is_ok(), "{}", get_cmd_output(cmd).1);
    let (stdout, _) = get_cmd_output(cmd);
    assert!(stdout.contains("Peak pixel: (48, 44)"), "{stdout}");
}

#[test]
fn arg_file_bad_extension() {
    let temp_dir = tempdir().expect("Couldn't make tempdir");
    let (yaml, mut yaml_file) = make_file_in_dir("image.yaml", temp_dir.path());
    writeln!(yaml_file, "image: {{}}").unwrap();

    let cmd = hyperimage()
        .arg("image")
        .arg(yaml.display().to_string())
        .ok();
    assert!(cmd.is_err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.contains("recognised file extension"), "{stderr}");
}
