// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Image visibilities and summarise the dirty image.

use log::debug;

use crate::{
    c64,
    image::{dirty_image, find_peak},
    imaging::{
        image_anti_aliased, image_simple, image_w_projection, ImagingError, ImagingMethod,
        ImagingParams, WProjection,
    },
    vis::Visibilities,
};

/// Parameters needed to image visibilities.
pub(crate) struct ImageParams {
    pub(crate) vis: Visibilities,

    pub(crate) method: ImagingMethod,

    pub(crate) imaging: ImagingParams,
}

/// What came out of imaging.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ImageSummary {
    pub(crate) grid_size: usize,

    pub(crate) num_samples: usize,

    /// Only w-projection has slices.
    pub(crate) num_w_slices: Option<usize>,

    /// The number of grid cells with a nonzero weight.
    pub(crate) num_covered_cells: usize,

    pub(crate) peak_pixel: (usize, usize),

    /// The (l, m) of the peak pixel.
    pub(crate) peak_lm: (f64, f64),

    pub(crate) peak: c64,
}

impl ImageParams {
    pub(crate) fn run(&self) -> Result<ImageSummary, ImagingError> {
        let ImageParams {
            vis,
            method,
            imaging,
        } = self;

        let grid_size = imaging.grid_size()?;
        let (positions, values) = vis.unflagged_samples();
        debug!(
            "Imaging {} samples with method {method} on a {grid_size}x{grid_size} grid",
            values.len()
        );

        let (grid, weights, num_w_slices) = match method {
            ImagingMethod::Simple => {
                let (grid, weights) = image_simple(imaging, positions.view(), values.view())?;
                (grid, weights, None)
            }
            ImagingMethod::AntiAliased => {
                let (grid, weights) =
                    image_anti_aliased(imaging, positions.view(), values.view())?;
                (grid, weights, None)
            }
            ImagingMethod::WProjection => {
                let WProjection {
                    grid,
                    weights,
                    kernels,
                } = image_w_projection(imaging, positions.view(), values.view())?;
                (grid, weights, Some(kernels.len()))
            }
        };

        let image = dirty_image(grid.view(), weights.view())?;
        let (peak_pixel, peak) = find_peak(image.view()).ok_or(ImagingError::NoSamples)?;
        Ok(ImageSummary {
            grid_size,
            num_samples: values.len(),
            num_w_slices,
            num_covered_cells: weights.iter().filter(|&&w| w != 0.0).count(),
            peak_pixel,
            peak_lm: imaging.pixel_to_lm(peak_pixel, grid_size),
            peak,
        })
    }
}
