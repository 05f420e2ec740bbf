// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Grid visibilities, make a dirty image and report on it.


use std::{
    fs::File,
    io::{BufWriter, Write},
    num::NonZeroUsize,
    path::PathBuf,
};

use clap::Parser;
use console::style;
use log::{debug, info, trace};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::common::{display_warnings, parse_choice, InfoPrinter, Warn, ARG_FILE_HELP};
use crate::{
    constants::{
        DEFAULT_AA_BANDWIDTH, DEFAULT_AA_HALF_SUPPORT, DEFAULT_FIELD_HALF_WIDTH,
        DEFAULT_W_KERNEL_HALF_SIZE, DEFAULT_W_SLICE_SIZE,
    },
    imaging::{AntiAliasingParams, ImagingMethod, ImagingParams},
    kernels::WScreenPolicy,
    params::{read_visibilities, ImageParams, ImageSummary},
    vis::Visibilities,
    HyperimageError,
};

lazy_static::lazy_static! {
    static ref METHOD_HELP: String =
        format!("The imaging method. Valid methods are: simple, anti-aliased, w-projection. Default: {}", ImagingMethod::default());

    static ref FIELD_HALF_WIDTH_HELP: String =
        format!("Half of the width of the imaged field [radians]. Default: {DEFAULT_FIELD_HALF_WIDTH}");

    static ref W_SLICE_SIZE_HELP: String =
        format!("The number of samples gridded with each w kernel. Default: {DEFAULT_W_SLICE_SIZE}");

    static ref KERNEL_HALF_SIZE_HELP: String =
        format!("w kernels are cropped to 2 * this + 1 pixels on a side. Default: {DEFAULT_W_KERNEL_HALF_SIZE}");

    static ref W_SCREEN_POLICY_HELP: String =
        format!("What to do with w phase-screen pixels beyond the horizon. Valid policies are: clamp, fail. Default: {}", WScreenPolicy::default());

    static ref AA_HALF_SUPPORT_HELP: String =
        format!("The half support of the anti-aliasing kernel. Default: {DEFAULT_AA_HALF_SUPPORT}");

    static ref AA_BANDWIDTH_HELP: String =
        format!("The bandwidth parameter of the anti-aliasing kernel. Default: {DEFAULT_AA_BANDWIDTH}");
}

#[derive(Parser, Debug, Clone, Default, Serialize, Deserialize)]
pub(super) struct ImageCliArgs {
    /// Paths to JSON visibility files. If there's more than one, they must
    /// share frequencies and a phase centre.
    #[clap(long, multiple_values(true), help_heading = "INPUT FILES")]
    pub(super) vis: Option<Vec<PathBuf>>,

    #[clap(short, long, help = METHOD_HELP.as_str(), help_heading = "IMAGING")]
    pub(super) method: Option<String>,

    #[clap(long, help = FIELD_HALF_WIDTH_HELP.as_str(), help_heading = "IMAGING")]
    pub(super) field_half_width: Option<f64>,

    /// Half of the width of the uv grid [wavelengths]. If this isn't given,
    /// the smallest grid that holds every sample and its kernel is used.
    #[clap(long, help_heading = "IMAGING")]
    pub(super) grid_half_width: Option<f64>,

    #[clap(long, help = W_SLICE_SIZE_HELP.as_str(), help_heading = "W-PROJECTION")]
    pub(super) w_slice_size: Option<usize>,

    #[clap(long, help = KERNEL_HALF_SIZE_HELP.as_str(), help_heading = "W-PROJECTION")]
    pub(super) kernel_half_size: Option<usize>,

    #[clap(long, help = W_SCREEN_POLICY_HELP.as_str(), help_heading = "W-PROJECTION")]
    pub(super) w_screen_policy: Option<String>,

    #[clap(long, help = AA_HALF_SUPPORT_HELP.as_str(), help_heading = "ANTI-ALIASING")]
    pub(super) aa_half_support: Option<u32>,

    #[clap(long, help = AA_BANDWIDTH_HELP.as_str(), help_heading = "ANTI-ALIASING")]
    pub(super) aa_bandwidth: Option<f64>,

    /// Write a JSON summary of the image (grid size, coverage and the peak) to
    /// this file.
    #[clap(short, long, help_heading = "OUTPUT FILES")]
    pub(super) output_summary: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone, Default, Serialize, Deserialize)]
pub(super) struct ImageArgs {
    #[clap(name = "ARGUMENTS_FILE", help = ARG_FILE_HELP.as_str(), parse(from_os_str))]
    pub(super) args_file: Option<PathBuf>,

    #[clap(flatten)]
    #[serde(rename = "image")]
    #[serde(default)]
    pub(super) image_args: ImageCliArgs,
}

impl ImageArgs {
    /// Both command-line and file arguments overlap in terms of what is
    /// available; this function consolidates everything that was specified into
    /// a single struct. Where applicable, it will prefer CLI parameters over
    /// those in the file.
    pub(super) fn merge(self) -> Result<ImageArgs, HyperimageError> {
        debug!("Merging command-line arguments with the argument file");

        let cli_args = self;

        if let Some(arg_file) = cli_args.args_file {
            // Ensure all of the file args are accounted for by pattern
            // matching.
            let ImageArgs {
                args_file: _,
                image_args,
            } = unpack_arg_file!(arg_file);

            Ok(ImageArgs {
                args_file: None,
                image_args: cli_args.image_args.merge(image_args),
            })
        } else {
            Ok(cli_args)
        }
    }

    fn parse(self) -> Result<(ImageParams, Option<PathBuf>), HyperimageError> {
        debug!("{:#?}", self);

        let ImageArgs {
            args_file: _,
            image_args:
                ImageCliArgs {
                    vis,
                    method,
                    field_half_width,
                    grid_half_width,
                    w_slice_size,
                    kernel_half_size,
                    w_screen_policy,
                    aa_half_support,
                    aa_bandwidth,
                    output_summary,
                },
        } = self;

        let method: ImagingMethod =
            parse_choice(method.as_deref(), "imaging method").map_err(ImageArgsError::Method)?;
        let w_screen_policy: WScreenPolicy =
            parse_choice(w_screen_policy.as_deref(), "w-screen policy")
                .map_err(ImageArgsError::WScreenPolicy)?;

        if method != ImagingMethod::WProjection
            && (w_slice_size.is_some()
                || kernel_half_size.is_some()
                || w_screen_policy != WScreenPolicy::default())
        {
            format!("w-projection arguments are ignored by the {method} method").warn();
        }
        if method != ImagingMethod::AntiAliased
            && (aa_half_support.is_some() || aa_bandwidth.is_some())
        {
            format!("Anti-aliasing arguments are ignored by the {method} method").warn();
        }

        let vis = read_all_vis(vis)?;
        let (positions, values) = vis.unflagged_samples();
        if values.is_empty() {
            return Err(ImageArgsError::NoUnflaggedSamples.into());
        }

        let field_half_width = field_half_width.unwrap_or(DEFAULT_FIELD_HALF_WIDTH);
        if !field_half_width.is_finite() || field_half_width <= 0.0 {
            return Err(ImageArgsError::InvalidFieldHalfWidth(field_half_width).into());
        }
        let w_slice_size = NonZeroUsize::new(w_slice_size.unwrap_or(DEFAULT_W_SLICE_SIZE))
            .ok_or(ImageArgsError::ZeroWSliceSize)?;
        let kernel_half_size = kernel_half_size.unwrap_or(DEFAULT_W_KERNEL_HALF_SIZE);
        let anti_aliasing = AntiAliasingParams {
            half_support: aa_half_support.unwrap_or(DEFAULT_AA_HALF_SUPPORT),
            bandwidth: aa_bandwidth.unwrap_or(DEFAULT_AA_BANDWIDTH),
        };

        let grid_half_width = match grid_half_width {
            Some(l2) => {
                if !l2.is_finite() || l2 <= 0.0 {
                    return Err(ImageArgsError::InvalidGridHalfWidth(l2).into());
                }
                l2
            }
            None => {
                let max_uv = positions
                    .outer_iter()
                    .map(|p| p[0].abs().max(p[1].abs()))
                    .fold(0.0, f64::max);
                let kernel_half_size = match method {
                    ImagingMethod::Simple => 0,
                    ImagingMethod::AntiAliased => anti_aliasing.half_support as usize,
                    ImagingMethod::WProjection => kernel_half_size,
                };
                fitting_grid_half_width(max_uv, field_half_width, kernel_half_size)
            }
        };

        let imaging = ImagingParams {
            field_half_width,
            grid_half_width,
            w_slice_size,
            kernel_half_size,
            w_screen_policy,
            anti_aliasing,
        };
        let grid_size = imaging.grid_size()?;

        let mut vis_printer = InfoPrinter::new("Visibilities".into());
        vis_printer.push_block(vec![
            format!("{} rows, {} channels", vis.num_rows(), vis.num_chans()).into(),
            format!(
                "{} unflagged samples (of {})",
                values.len(),
                vis.num_rows() * vis.num_chans()
            )
            .into(),
        ]);
        vis_printer.push_line(
            format!(
                "Phase centre: {:>8.4}° {:>8.4}°",
                vis.phase_centre().ra.to_degrees(),
                vis.phase_centre().dec.to_degrees()
            )
            .into(),
        );
        vis_printer.display();

        let mut imaging_printer = InfoPrinter::new(format!("Imaging with method {method}").into());
        imaging_printer.push_block(vec![
            style("Field half width    Grid half width    Grid size")
                .bold()
                .to_string()
                .into(),
            format!(
                "{field_half_width:>10.4} rad    {grid_half_width:>12.3} λ    {grid_size}x{grid_size}"
            )
            .into(),
        ]);
        match method {
            ImagingMethod::Simple => (),
            ImagingMethod::AntiAliased => imaging_printer.push_line(
                format!(
                    "Anti-aliasing half support {}, bandwidth {:.4}",
                    anti_aliasing.half_support, anti_aliasing.bandwidth
                )
                .into(),
            ),
            ImagingMethod::WProjection => imaging_printer.push_block(vec![
                format!("{w_slice_size} samples per w slice").into(),
                format!(
                    "{0}x{0} w kernels, w-screen policy {w_screen_policy}",
                    2 * kernel_half_size + 1
                )
                .into(),
            ]),
        }
        imaging_printer.display();

        display_warnings();

        Ok((
            ImageParams {
                vis,
                method,
                imaging,
            },
            output_summary,
        ))
    }

    pub(super) fn run(self, dry_run: bool) -> Result<(), HyperimageError> {
        debug!("Converting arguments into parameters");
        trace!("{:#?}", self);
        let (params, output_summary) = self.parse()?;

        if dry_run {
            info!("Dry run -- exiting now.");
            return Ok(());
        }

        let summary = params.run()?;
        display_summary(&summary);
        if let Some(output) = output_summary {
            let mut f = BufWriter::new(File::create(&output)?);
            serde_json::to_writer_pretty(&mut f, &SummaryFile::from(&summary)).map_err(|e| {
                HyperimageError::Generic(format!("Couldn't write the summary: {e}"))
            })?;
            f.flush()?;
            info!("Wrote the image summary to {}", output.display());
        }
        Ok(())
    }
}

/// Read and combine all of the visibility files.
fn read_all_vis(paths: Option<Vec<PathBuf>>) -> Result<Visibilities, HyperimageError> {
    let paths = paths.unwrap_or_default();
    let mut vis: Option<Visibilities> = None;
    for path in paths {
        if !path.exists() {
            return Err(ImageArgsError::VisDoesntExist(path).into());
        }
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("json"))
            .unwrap_or(false);
        if !is_json {
            return Err(ImageArgsError::VisNotJson(path).into());
        }
        let this = read_visibilities(&path)?;
        vis = Some(match vis {
            None => this,
            Some(v) => v.add(&this)?,
        });
    }
    vis.ok_or_else(|| ImageArgsError::NoVis.into())
}

/// The smallest grid half width \[wavelengths\] for which samples with
/// |u|, |v| <= `max_uv` and kernels of half size `kernel_half_size` fit on
/// the grid, with a pixel to spare on each side. The resulting grid size is
/// even.
fn fitting_grid_half_width(max_uv: f64, field_half_width: f64, kernel_half_size: usize) -> f64 {
    let half_grid_size =
        (2.0 * field_half_width * max_uv).ceil() as usize + kernel_half_size + 2;
    (2 * half_grid_size) as f64 / (4.0 * field_half_width)
}

fn display_summary(summary: &ImageSummary) {
    let ImageSummary {
        grid_size,
        num_samples,
        num_w_slices,
        num_covered_cells,
        peak_pixel,
        peak_lm,
        peak,
    } = summary;

    let mut printer = InfoPrinter::new("Dirty image".into());
    let mut block = vec![format!("Gridded {num_samples} samples").into()];
    if let Some(n) = num_w_slices {
        block.push(format!("in {n} w slices").into());
    }
    printer.push_block(block);
    printer.push_line(
        format!(
            "Coverage: {num_covered_cells} of {} cells",
            grid_size * grid_size
        )
        .into(),
    );
    printer.push_block(vec![
        format!("Peak pixel: ({}, {})", peak_pixel.0, peak_pixel.1).into(),
        format!("Peak (l, m): ({:.6}, {:.6})", peak_lm.0, peak_lm.1).into(),
        format!("Peak amplitude: {:.6e}", peak.norm()).into(),
    ]);
    printer.display();
}

/// How an [`ImageSummary`] is written out.
#[derive(Debug, Serialize, Deserialize)]
pub(super) struct SummaryFile {
    pub(super) grid_size: usize,
    pub(super) num_samples: usize,
    pub(super) num_w_slices: Option<usize>,
    pub(super) num_covered_cells: usize,
    pub(super) peak_pixel: [usize; 2],
    pub(super) peak_lm: [f64; 2],
    pub(super) peak_amplitude: f64,
}

impl From<&ImageSummary> for SummaryFile {
    fn from(s: &ImageSummary) -> Self {
        SummaryFile {
            grid_size: s.grid_size,
            num_samples: s.num_samples,
            num_w_slices: s.num_w_slices,
            num_covered_cells: s.num_covered_cells,
            peak_pixel: [s.peak_pixel.0, s.peak_pixel.1],
            peak_lm: [s.peak_lm.0, s.peak_lm.1],
            peak_amplitude: s.peak.norm(),
        }
    }
}

#[derive(Error, Debug)]
pub(super) enum ImageArgsError {
    #[error("No visibility files were supplied")]
    NoVis,

    #[error("Visibility file '{}' doesn't exist", .0.display())]
    VisDoesntExist(PathBuf),

    #[error("Visibility file '{}' isn't a .json file", .0.display())]
    VisNotJson(PathBuf),

    #[error("Every visibility is flagged; there's nothing to image")]
    NoUnflaggedSamples,

    #[error("{0}")]
    Method(String),

    #[error("{0}")]
    WScreenPolicy(String),

    #[error("The field half width must be a positive number of radians, not {0}")]
    InvalidFieldHalfWidth(f64),

    #[error("The grid half width must be a positive number of wavelengths, not {0}")]
    InvalidGridHalfWidth(f64),

    #[error("The w slice size cannot be 0")]
    ZeroWSliceSize,
}

impl ImageCliArgs {
    fn merge(self, other: Self) -> Self {
        Self {
            vis: self.vis.or(other.vis),
            method: self.method.or(other.method),
            field_half_width: self.field_half_width.or(other.field_half_width),
            grid_half_width: self.grid_half_width.or(other.grid_half_width),
            w_slice_size: self.w_slice_size.or(other.w_slice_size),
            kernel_half_size: self.kernel_half_size.or(other.kernel_half_size),
            w_screen_policy: self.w_screen_policy.or(other.w_screen_policy),
            aa_half_support: self.aa_half_support.or(other.aa_half_support),
            aa_bandwidth: self.aa_bandwidth.or(other.aa_bandwidth),
            output_summary: self.output_summary.or(other.output_summary),
        }
    }
}
