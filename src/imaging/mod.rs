// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Imaging pipelines: visibility samples in, gridded visibilities and
//! coverage out.
//!
//! Every pipeline rotates the visibilities to the zero-w plane and grids the
//! samples' (u, v) scaled by `1 / grid_half_width`. The grid has
//! `N = 4 * field_half_width * grid_half_width` pixels on a side.

mod error;

pub use error::ImagingError;

use std::{num::NonZeroUsize, ops::Range};

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use log::{debug, trace};
use ndarray::prelude::*;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};
use vec1::Vec1;

use crate::{
    c64,
    constants::{
        DEFAULT_AA_BANDWIDTH, DEFAULT_AA_HALF_SUPPORT, DEFAULT_W_KERNEL_HALF_SIZE,
        DEFAULT_W_SLICE_SIZE, GRID_SIZE_TOLERANCE,
    },
    gridding::{check_kernel_fits, convolve_and_grid, grid_points},
    kernels::{anti_aliasing_function, w_kernel, WScreenPolicy},
    math::mean,
    vis::{rotate_to_zero_w, sort_by_w},
    PROGRESS_BARS,
};

/// The ways visibilities can be imaged.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Display, EnumIter, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ImagingMethod {
    /// Point gridding; no convolution at all.
    Simple,

    /// Convolutional gridding with the prolate spheroidal anti-aliasing
    /// function.
    AntiAliased,

    /// w-projection: samples are sorted by w and sliced, and each slice is
    /// gridded with its own w kernel.
    #[default]
    WProjection,
}

/// Parameters of the anti-aliasing function.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AntiAliasingParams {
    /// The kernel is `2 * half_support + 1` pixels on a side. This is also the
    /// order and degree of the spheroidal function.
    pub half_support: u32,

    /// The bandwidth parameter c of the spheroidal function.
    pub bandwidth: f64,
}

impl Default for AntiAliasingParams {
    fn default() -> Self {
        Self {
            half_support: DEFAULT_AA_HALF_SUPPORT,
            bandwidth: DEFAULT_AA_BANDWIDTH,
        }
    }
}

/// Everything needed to grid visibilities.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImagingParams {
    /// Half of the width of the imaged field \[radians\]. (T2)
    pub field_half_width: f64,

    /// Half of the width of the uv grid \[wavelengths\]. (L2)
    pub grid_half_width: f64,

    /// The number of samples in each w slice.
    pub w_slice_size: NonZeroUsize,

    /// w kernels are cropped to `2 * kernel_half_size + 1` pixels on a side.
    pub kernel_half_size: usize,

    pub w_screen_policy: WScreenPolicy,

    pub anti_aliasing: AntiAliasingParams,
}

impl ImagingParams {
    /// New parameters with defaults for everything but the field and grid
    /// sizes.
    pub fn new(field_half_width: f64, grid_half_width: f64) -> ImagingParams {
        ImagingParams {
            field_half_width,
            grid_half_width,
            w_slice_size: NonZeroUsize::new(DEFAULT_W_SLICE_SIZE)
                .unwrap_or(NonZeroUsize::MIN),
            kernel_half_size: DEFAULT_W_KERNEL_HALF_SIZE,
            w_screen_policy: WScreenPolicy::default(),
            anti_aliasing: AntiAliasingParams::default(),
        }
    }

    /// The number of pixels on each side of the grid (and image). This is
    /// `4 * field_half_width * grid_half_width`, which must be a positive, even
    /// number (up to floating-point error).
    pub fn grid_size(&self) -> Result<usize, ImagingError> {
        let size = 4.0 * self.field_half_width * self.grid_half_width;
        let rounded = size.round();
        if !rounded.is_finite()
            || rounded < 2.0
            || rounded % 2.0 != 0.0
            || (size - rounded).abs() > GRID_SIZE_TOLERANCE * rounded
        {
            return Err(ImagingError::InvalidGridSize {
                field_half_width: self.field_half_width,
                grid_half_width: self.grid_half_width,
                size,
            });
        }
        Ok(rounded as usize)
    }

    /// The direction cosines (l, m) of a pixel of a centred (dirty) image with
    /// `grid_size` pixels on a side.
    pub fn pixel_to_lm(&self, pixel: (usize, usize), grid_size: usize) -> (f64, f64) {
        let scale = 2.0 * self.field_half_width / grid_size as f64;
        let half = (grid_size / 2) as f64;
        (
            (pixel.0 as f64 - half) * scale,
            (pixel.1 as f64 - half) * scale,
        )
    }

    /// Normalised (u, v) gridding positions for (u, v, w) samples in
    /// wavelengths.
    fn scale_positions(&self, positions: ArrayView2<f64>) -> Array2<f64> {
        let uv = positions.slice(s![.., ..2.min(positions.ncols())]);
        uv.mapv(|p| p / self.grid_half_width)
    }
}

/// The results of w-projection imaging.
#[derive(Debug, Clone)]
pub struct WProjection {
    pub grid: Array2<c64>,
    pub weights: Array2<f64>,
    /// The kernel used for each w slice, in slice (ascending w) order.
    pub kernels: Vec1<Array2<c64>>,
}

fn check_samples(
    params: &ImagingParams,
    positions: ArrayView2<f64>,
    values: ArrayView1<c64>,
) -> Result<usize, ImagingError> {
    if positions.nrows() == 0 || values.is_empty() {
        return Err(ImagingError::NoSamples);
    }
    params.grid_size()
}

/// Image without convolution: the zero-w rotated samples are point-gridded.
/// Returns the grid and its weights.
pub fn image_simple(
    params: &ImagingParams,
    positions: ArrayView2<f64>,
    values: ArrayView1<c64>,
) -> Result<(Array2<c64>, Array2<f64>), ImagingError> {
    let n = check_samples(params, positions, values)?;
    debug!("Simple imaging of {} samples on a {n}x{n} grid", values.len());

    let rotated = rotate_to_zero_w(positions, values)?;
    let scaled = params.scale_positions(positions);
    let mut grid = Array2::zeros((n, n));
    let mut weights = Array2::zeros((n, n));
    grid_points(
        grid.view_mut(),
        weights.view_mut(),
        scaled.view(),
        rotated.view(),
    )?;
    Ok((grid, weights))
}

/// Image with the anti-aliasing function as the convolution kernel. Returns
/// the grid and its weights.
pub fn image_anti_aliased(
    params: &ImagingParams,
    positions: ArrayView2<f64>,
    values: ArrayView1<c64>,
) -> Result<(Array2<c64>, Array2<f64>), ImagingError> {
    let n = check_samples(params, positions, values)?;
    let AntiAliasingParams {
        half_support,
        bandwidth,
    } = params.anti_aliasing;
    debug!(
        "Anti-aliased imaging of {} samples on a {n}x{n} grid",
        values.len()
    );

    let support = 2 * half_support as usize + 1;
    let kernel =
        anti_aliasing_function((support, support), half_support, bandwidth)?.mapv(c64::from);
    let rotated = rotate_to_zero_w(positions, values)?;
    let scaled = params.scale_positions(positions);
    let mut grid = Array2::zeros((n, n));
    let mut weights = Array2::zeros((n, n));
    convolve_and_grid(
        grid.view_mut(),
        weights.view_mut(),
        scaled.view(),
        rotated.view(),
        kernel.view(),
    )?;
    Ok((grid, weights))
}

/// Split `num_samples` samples into contiguous ranges of `slice_size`. The last
/// range holds whatever is left over, so it may be smaller than the others.
pub fn partition_w_slices(num_samples: usize, slice_size: NonZeroUsize) -> Vec<Range<usize>> {
    let slice_size = slice_size.get();
    (0..num_samples)
        .step_by(slice_size)
        .map(|start| start..(start + slice_size).min(num_samples))
        .collect()
}

/// w-projection imaging. The samples are sorted by w, rotated to the zero-w
/// plane and split into slices of `params.w_slice_size`. The samples of each
/// slice are gridded with a w kernel made for the slice's mean w.
pub fn image_w_projection(
    params: &ImagingParams,
    positions: ArrayView2<f64>,
    values: ArrayView1<c64>,
) -> Result<WProjection, ImagingError> {
    let n = check_samples(params, positions, values)?;
    let (positions, values) = sort_by_w(positions, values)?;
    let rotated = rotate_to_zero_w(positions.view(), values.view())?;
    let scaled = params.scale_positions(positions.view());

    // Nothing is gridded unless every sample can be.
    let kernel_side = 2 * params.kernel_half_size + 1;
    check_kernel_fits(scaled.view(), (n, n), (kernel_side, kernel_side))?;

    let slices = partition_w_slices(values.len(), params.w_slice_size);
    let mean_ws = slices
        .iter()
        .map(|slice| {
            let ws = positions.slice(s![slice.clone(), 2]);
            mean(ws.iter().copied()).ok_or(ImagingError::NoSamples)
        })
        .collect::<Result<Vec<f64>, _>>()?;

    // Slices are in ascending w order, so slices with the same mean w are
    // next to each other. Each distinct w gets one kernel.
    let mut distinct_ws: Vec<f64> = Vec::with_capacity(mean_ws.len());
    let mut kernel_indices = Vec::with_capacity(mean_ws.len());
    for &w in &mean_ws {
        if distinct_ws.last().map(|d| d.to_bits()) != Some(w.to_bits()) {
            distinct_ws.push(w);
        }
        kernel_indices.push(distinct_ws.len() - 1);
    }
    debug!(
        "w-projection imaging of {} samples on a {n}x{n} grid: {} w slices, {} distinct kernels",
        values.len(),
        slices.len(),
        distinct_ws.len()
    );

    let distinct_kernels = distinct_ws
        .par_iter()
        .map(|&w| {
            w_kernel(
                n,
                params.field_half_width,
                w,
                params.kernel_half_size,
                params.w_screen_policy,
            )
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut grid = Array2::zeros((n, n));
    let mut weights = Array2::zeros((n, n));
    let progress = make_progress_bar(slices.len(), "Gridding w slices");
    for ((slice, &w), &i_kernel) in slices.iter().zip(mean_ws.iter()).zip(kernel_indices.iter()) {
        trace!("w slice {slice:?}: mean w = {w}");
        convolve_and_grid(
            grid.view_mut(),
            weights.view_mut(),
            scaled.slice(s![slice.clone(), ..]),
            rotated.slice(s![slice.clone()]),
            distinct_kernels[i_kernel].view(),
        )?;
        progress.inc(1);
    }
    progress.abandon_with_message("Finished gridding");

    let kernels = kernel_indices
        .iter()
        .map(|&i| distinct_kernels[i].clone())
        .collect::<Vec<_>>();
    let kernels = Vec1::try_from_vec(kernels).map_err(|_| ImagingError::NoSamples)?;
    Ok(WProjection {
        grid,
        weights,
        kernels,
    })
}

fn make_progress_bar(len: usize, message: &'static str) -> ProgressBar {
    ProgressBar::with_draw_target(
        Some(len as _),
        if PROGRESS_BARS.load() {
            ProgressDrawTarget::stdout()
        } else {
            ProgressDrawTarget::hidden()
        },
    )
    .with_style(
        ProgressStyle::default_bar()
            .template("{msg}: [{wide_bar:.blue}] {pos:3}/{len:3} ({elapsed_precise}<{eta_precise})")
            .unwrap()
            .progress_chars("=> "),
    )
    .with_position(0)
    .with_message(message)
}
