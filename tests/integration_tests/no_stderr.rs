// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Tests to ensure there is no stderr output for successful commands.

use tempfile::TempDir;

use crate::{get_cmd_output, hyperimage, simulate_zenith_vis};

#[test]
fn test_image_no_stderr() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let vis = simulate_zenith_vis(tmp_dir.path());

    for method in ["simple", "anti-aliased", "w-projection"] {
        #[rustfmt::skip]
        let cmd = hyperimage()
            .args([
                "image",
                "--vis", &vis.display().to_string(),
                "--method", method,
                "--no-progress-bars",
            ])
            .ok();
        assert!(
            cmd.is_ok(),
            "image failed on simple test data: {}",
            cmd.err().unwrap()
        );
        let (_, stderr) = get_cmd_output(cmd);
        assert!(stderr.is_empty(), "stderr wasn't empty: {stderr}");
    }
}
