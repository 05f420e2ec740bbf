// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Simulate the visibilities of point sources observed by a Y-shaped array.


use std::path::PathBuf;

use clap::Parser;
use console::style;
use log::{debug, info, trace};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use vec1::Vec1;

use super::common::{display_warnings, InfoPrinter, Warn, ARG_FILE_HELP};
use crate::{
    constants::{MWA_LAT_DEG, TAU},
    coord::{y_shaped_array, RADec},
    params::VisSimulateParams,
    vis::PointSource,
    HyperimageError,
};

const DEFAULT_OUTPUT_VIS_FILENAME: &str = "hyperimage_vis.json";
const DEFAULT_NUM_ANTENNAS_PER_ARM: usize = 8;
const DEFAULT_ARM_LENGTH_M: f64 = 100.0;
const DEFAULT_MIDDLE_FREQ_MHZ: f64 = 150.0;
const DEFAULT_NUM_FINE_CHANNELS: usize = 1;
const DEFAULT_FREQ_RES_KHZ: f64 = 80.0;
const DEFAULT_NUM_TIMESTEPS: usize = 1;
const DEFAULT_TIME_RES_SECONDS: f64 = 8.0;
const DEFAULT_SOURCE: &str = "0,0,1";

lazy_static::lazy_static! {
    static ref NUM_ANTENNAS_PER_ARM_HELP: String =
        format!("The number of antennas on each arm of the array. Default: {DEFAULT_NUM_ANTENNAS_PER_ARM}");

    static ref ARM_LENGTH_HELP: String =
        format!("The length of each arm of the array [metres]. Default: {DEFAULT_ARM_LENGTH_M}");

    static ref LATITUDE_HELP: String =
        format!("The latitude of the array [degrees]. Default (MWA): {MWA_LAT_DEG}");

    static ref DEC_HELP: String =
        format!("The phase centre declination [degrees]. Default: the array latitude, i.e. the zenith at transit ({MWA_LAT_DEG} for the MWA)");

    static ref MIDDLE_FREQ_HELP: String =
        format!("The centroid frequency of the simulation [MHz]. Default: {DEFAULT_MIDDLE_FREQ_MHZ}");

    static ref NUM_FINE_CHANNELS_HELP: String =
        format!("The total number of fine channels. Default: {DEFAULT_NUM_FINE_CHANNELS}");

    static ref FREQ_RES_HELP: String =
        format!("The fine-channel resolution [kHz]. Default: {DEFAULT_FREQ_RES_KHZ}");

    static ref NUM_TIMESTEPS_HELP: String =
        format!("The number of timesteps, centred on transit. Default: {DEFAULT_NUM_TIMESTEPS}");

    static ref TIME_RES_HELP: String =
        format!("The time resolution [seconds]. Default: {DEFAULT_TIME_RES_SECONDS}");

    static ref SOURCES_HELP: String =
        format!("Point sources to simulate, each as \"l,m,flux\" with (l, m) direction cosines relative to the phase centre and the flux density in Jy. Sources starting with a minus sign need an equals sign, e.g. --sources=-0.1,0,1. Default: {DEFAULT_SOURCE}");

    static ref OUTPUT_HELP: String =
        format!("Path to the output JSON visibility file. Default: {DEFAULT_OUTPUT_VIS_FILENAME}");
}

#[derive(Parser, Debug, Clone, Default, Serialize, Deserialize)]
pub(super) struct VisSimulateCliArgs {
    #[clap(long, help = NUM_ANTENNAS_PER_ARM_HELP.as_str(), help_heading = "ARRAY")]
    pub(super) num_antennas_per_arm: Option<usize>,

    #[clap(long, help = ARM_LENGTH_HELP.as_str(), help_heading = "ARRAY")]
    pub(super) arm_length: Option<f64>,

    #[clap(long, help = LATITUDE_HELP.as_str(), help_heading = "ARRAY", allow_hyphen_values = true)]
    pub(super) latitude: Option<f64>,

    /// The phase centre right ascension [degrees]. Default: 0
    #[clap(short, long, help_heading = "OBSERVATION PARAMETERS")]
    pub(super) ra: Option<f64>,

    #[clap(short, long, help = DEC_HELP.as_str(), help_heading = "OBSERVATION PARAMETERS", allow_hyphen_values = true)]
    pub(super) dec: Option<f64>,

    #[clap(long, help = MIDDLE_FREQ_HELP.as_str(), help_heading = "OBSERVATION PARAMETERS")]
    pub(super) middle_freq: Option<f64>,

    #[clap(
        short = 'c',
        long,
        help = NUM_FINE_CHANNELS_HELP.as_str(),
        help_heading = "OBSERVATION PARAMETERS"
    )]
    pub(super) num_fine_channels: Option<usize>,

    #[clap(
        short,
        long,
        help = FREQ_RES_HELP.as_str(),
        help_heading = "OBSERVATION PARAMETERS"
    )]
    pub(super) freq_res: Option<f64>,

    #[clap(
        short = 't',
        long,
        help = NUM_TIMESTEPS_HELP.as_str(),
        help_heading = "OBSERVATION PARAMETERS"
    )]
    pub(super) num_timesteps: Option<usize>,

    #[clap(long, help = TIME_RES_HELP.as_str(), help_heading = "OBSERVATION PARAMETERS")]
    pub(super) time_res: Option<f64>,

    #[clap(
        short,
        long,
        multiple_values(true),
        help = SOURCES_HELP.as_str(),
        help_heading = "SKY MODEL"
    )]
    pub(super) sources: Option<Vec<String>>,

    #[clap(short, long, help = OUTPUT_HELP.as_str(), help_heading = "OUTPUT FILES")]
    pub(super) output: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone, Default, Serialize, Deserialize)]
pub(super) struct VisSimulateArgs {
    #[clap(name = "ARGUMENTS_FILE", help = ARG_FILE_HELP.as_str(), parse(from_os_str))]
    pub(super) args_file: Option<PathBuf>,

    #[clap(flatten)]
    #[serde(rename = "vis-simulate")]
    #[serde(default)]
    pub(super) simulate_args: VisSimulateCliArgs,
}

impl VisSimulateArgs {
    /// Both command-line and file arguments overlap in terms of what is
    /// available; this function consolidates everything that was specified into
    /// a single struct. Where applicable, it will prefer CLI parameters over
    /// those in the file.
    ///
    /// This function should only ever merge arguments, and not try to make
    /// sense of them.
    pub(super) fn merge(self) -> Result<VisSimulateArgs, HyperimageError> {
        debug!("Merging command-line arguments with the argument file");

        let cli_args = self;

        if let Some(arg_file) = cli_args.args_file {
            let VisSimulateArgs {
                args_file: _,
                simulate_args,
            } = unpack_arg_file!(arg_file);

            Ok(VisSimulateArgs {
                args_file: None,
                simulate_args: cli_args.simulate_args.merge(simulate_args),
            })
        } else {
            Ok(cli_args)
        }
    }

    fn parse(self) -> Result<VisSimulateParams, HyperimageError> {
        debug!("{:#?}", self);

        // Expose all the struct fields to ensure they're all used.
        let VisSimulateArgs {
            args_file: _,
            simulate_args:
                VisSimulateCliArgs {
                    num_antennas_per_arm,
                    arm_length,
                    latitude,
                    ra,
                    dec,
                    middle_freq,
                    num_fine_channels,
                    freq_res,
                    num_timesteps,
                    time_res,
                    sources,
                    output,
                },
        } = self;

        let latitude = latitude.unwrap_or(MWA_LAT_DEG);
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(VisSimulateArgsError::LatitudeInvalid(latitude).into());
        }
        let ra = ra.unwrap_or(0.0);
        if !(0.0..=360.0).contains(&ra) {
            return Err(VisSimulateArgsError::RaInvalid.into());
        }
        let dec = dec.unwrap_or(latitude);
        if !(-90.0..=90.0).contains(&dec) {
            return Err(VisSimulateArgsError::DecInvalid.into());
        }
        let phase_centre = RADec::new_degrees(ra, dec);

        let num_antennas_per_arm = num_antennas_per_arm.unwrap_or(DEFAULT_NUM_ANTENNAS_PER_ARM);
        if num_antennas_per_arm == 0 {
            return Err(VisSimulateArgsError::ZeroAntennas.into());
        }
        let arm_length = arm_length.unwrap_or(DEFAULT_ARM_LENGTH_M);
        if !arm_length.is_finite() || arm_length <= 0.0 {
            return Err(VisSimulateArgsError::ArmLengthInvalid(arm_length).into());
        }
        let xyzs = y_shaped_array(num_antennas_per_arm, arm_length, latitude.to_radians());

        let mut array_printer = InfoPrinter::new("Array".into());
        array_printer.push_block(vec![
            format!(
                "Y-shaped, {} antennas ({num_antennas_per_arm} per arm)",
                xyzs.len()
            )
            .into(),
            format!("Arm length: {arm_length} m").into(),
        ]);
        array_printer.push_line(format!("Latitude: {latitude:.4}°").into());
        array_printer.display();

        // Hour angles are centred on transit.
        let time_res = time_res.unwrap_or(DEFAULT_TIME_RES_SECONDS);
        let num_timesteps = num_timesteps.unwrap_or(DEFAULT_NUM_TIMESTEPS);
        let hour_angles = (0..num_timesteps)
            .map(|i| (i as f64 - (num_timesteps as f64 - 1.0) / 2.0) * time_res * TAU / 86400.0)
            .collect::<Vec<_>>();
        let hour_angles =
            Vec1::try_from_vec(hour_angles).map_err(|_| VisSimulateArgsError::ZeroTimeSteps)?;

        let mut time_printer = InfoPrinter::new("Time info".into());
        time_printer.push_block(vec![
            format!("{num_timesteps} timesteps at {time_res} s resolution").into(),
            format!(
                "Hour angles: {:.6}° to {:.6}°",
                hour_angles.first().to_degrees(),
                hour_angles.last().to_degrees()
            )
            .into(),
        ]);
        time_printer.display();

        // Get the fine channel frequencies.
        let freq_res = freq_res.unwrap_or(DEFAULT_FREQ_RES_KHZ);
        let num_fine_channels = num_fine_channels.unwrap_or(DEFAULT_NUM_FINE_CHANNELS);
        if freq_res < f64::EPSILON {
            return Err(VisSimulateArgsError::FineChansWidthTooSmall.into());
        }
        let middle_freq = middle_freq.unwrap_or(DEFAULT_MIDDLE_FREQ_MHZ) * 1e6; // MHz -> Hz
        let freq_res = freq_res * 1e3; // kHz -> Hz
        let freqs = {
            let half_num_fine_chans = (num_fine_channels as f64 - 1.0) / 2.0;
            let freqs = (0..num_fine_channels)
                .map(|i| middle_freq + (i as f64 - half_num_fine_chans) * freq_res)
                .collect::<Vec<_>>();
            Vec1::try_from_vec(freqs).map_err(|_| VisSimulateArgsError::FineChansZero)?
        };
        if *freqs.first() <= 0.0 {
            return Err(VisSimulateArgsError::NonPositiveFreq(*freqs.first()).into());
        }

        let mut chan_printer = InfoPrinter::new("Channel info".into());
        chan_printer.push_line(format!("Resolution: {:.2} kHz", freq_res / 1e3).into());
        chan_printer.push_block(vec![
            format!("Number of fine channels: {num_fine_channels}").into(),
            format!("First fine-channel: {:.3} MHz", *freqs.first() / 1e6).into(),
            format!("Last fine-channel:  {:.3} MHz", *freqs.last() / 1e6).into(),
        ]);
        chan_printer.display();

        let sources = sources
            .unwrap_or_else(|| vec![DEFAULT_SOURCE.to_string()])
            .iter()
            .map(|s| parse_source(s))
            .collect::<Result<Vec<_>, _>>()?;
        let sources = Vec1::try_from_vec(sources).map_err(|_| VisSimulateArgsError::NoSources)?;

        let mut sky_printer = InfoPrinter::new("Sky model".into());
        let mut block = vec![style("       l          m     flux (Jy)").bold().to_string().into()];
        for s in sources.iter() {
            block.push(format!("{:>8.5}   {:>8.5}   {:>8.3}", s.l, s.m, s.flux).into());
        }
        sky_printer.push_block(block);
        sky_printer.display();

        let output = output.unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_VIS_FILENAME));
        let is_json = output
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("json"))
            .unwrap_or(false);
        if !is_json {
            format!(
                "Visibilities are always written as JSON, but '{}' doesn't end in .json",
                output.display()
            )
            .warn();
        }
        info!("Simulated visibilities will be written to {}", output.display());

        display_warnings();

        Ok(VisSimulateParams {
            xyzs,
            hour_angles,
            phase_centre,
            freqs,
            sources,
            output,
        })
    }

    pub(super) fn run(self, dry_run: bool) -> Result<(), HyperimageError> {
        debug!("Converting arguments into parameters");
        trace!("{:#?}", self);
        let params = self.parse()?;

        if dry_run {
            info!("Dry run -- exiting now.");
            return Ok(());
        }

        params.run()?;
        Ok(())
    }
}

/// Parse a point source from "l,m,flux". The direction must be above the
/// horizon.
fn parse_source(s: &str) -> Result<PointSource, VisSimulateArgsError> {
    let bad = || VisSimulateArgsError::BadSource(s.to_string());
    let values = s
        .split(',')
        .map(|v| v.trim().parse::<f64>().map_err(|_| bad()))
        .collect::<Result<Vec<_>, _>>()?;
    match values.as_slice() {
        &[l, m, flux] if l.is_finite() && m.is_finite() && flux.is_finite() => {
            if l * l + m * m > 1.0 {
                return Err(VisSimulateArgsError::SourceBelowHorizon { l, m });
            }
            Ok(PointSource { l, m, flux })
        }
        _ => Err(bad()),
    }
}

#[derive(Error, Debug)]
pub(super) enum VisSimulateArgsError {
    #[error("Right Ascension was not within 0 to 360!")]
    RaInvalid,

    #[error("Declination was not within -90 to 90!")]
    DecInvalid,

    #[error("The array latitude {0}° is not within -90 to 90!")]
    LatitudeInvalid(f64),

    #[error("The number of antennas per arm cannot be 0!")]
    ZeroAntennas,

    #[error("The arm length must be a positive number of metres, not {0}")]
    ArmLengthInvalid(f64),

    #[error("Number of fine channels cannot be 0!")]
    FineChansZero,

    #[error("The fine channel resolution cannot be 0 or negative!")]
    FineChansWidthTooSmall,

    #[error("The lowest fine channel frequency ({0} Hz) isn't positive!")]
    NonPositiveFreq(f64),

    #[error("Number of timesteps cannot be 0!")]
    ZeroTimeSteps,

    #[error("Couldn't parse the point source '{0}'; expected \"l,m,flux\"")]
    BadSource(String),

    #[error("The point source at (l, m) = ({l}, {m}) is below the horizon")]
    SourceBelowHorizon { l: f64, m: f64 },

    #[error("No point sources were given")]
    NoSources,
}

impl VisSimulateCliArgs {
    fn merge(self, other: Self) -> Self {
        Self {
            num_antennas_per_arm: self.num_antennas_per_arm.or(other.num_antennas_per_arm),
            arm_length: self.arm_length.or(other.arm_length),
            latitude: self.latitude.or(other.latitude),
            ra: self.ra.or(other.ra),
            dec: self.dec.or(other.dec),
            middle_freq: self.middle_freq.or(other.middle_freq),
            num_fine_channels: self.num_fine_channels.or(other.num_fine_channels),
            freq_res: self.freq_res.or(other.freq_res),
            num_timesteps: self.num_timesteps.or(other.num_timesteps),
            time_res: self.time_res.or(other.time_res),
            sources: self.sources.or(other.sources),
            output: self.output.or(other.output),
        }
    }
}
