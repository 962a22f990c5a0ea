// Copyright 2025 Dustin McAfee
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The two HAP test-asset recipes.
//!
//! # RGB Cycle
//!
//! For each rate: schedule `ceil(rate * duration)` frames cycling red, green,
//! blue, copy them into `_work/frames_<label>/`, and encode
//! `<prefix><label>.mov` with the HAP codec at that exact rate.
//!
//! # HAP Alpha
//!
//! Draw the hue/alpha gradient to `_work/source.png`, encode it as a one-frame
//! HAP Alpha movie, then decode that movie's first frame back to a PNG so tests
//! can compare what the codec actually preserved.
//!
//! Both recipes work inside `<out_dir>/_work`, which is removed when the recipe
//! returns, whether it succeeded or not.

use std::path::PathBuf;

use crate::error::Result;
use crate::ffmpeg::Ffmpeg;
use crate::pixel::{synthesize, validate_dimensions};
use crate::rate::{RationalRate, STANDARD_RATES};
use crate::raster::encode;
use crate::schedule::{frame_file_name, schedule, write_palette_sources};
use crate::scratch::ScratchDir;

/// Name of the scratch directory created under each output directory.
pub const WORK_DIR_NAME: &str = "_work";

/// Settings for [`generate_rgb_cycle`].
#[derive(Debug, Clone, PartialEq)]
pub struct RgbCycleOptions {
    /// Directory receiving the movies.
    pub out_dir: PathBuf,
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Length of every movie in seconds.
    pub duration_secs: f64,
    /// Movie file name prefix; the rate label and `.mov` are appended.
    pub file_prefix: String,
    /// Rates to generate, one movie each.
    pub rates: Vec<RationalRate>,
}

impl Default for RgbCycleOptions {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from("Assets/StreamingAssets/RGBCycle"),
            width: 256,
            height: 256,
            duration_secs: 3.0,
            file_prefix: "RGBCycle".to_string(),
            rates: STANDARD_RATES.to_vec(),
        }
    }
}

impl RgbCycleOptions {
    /// Output movie path for `rate`, e.g. `RGBCycle24000-1001.mov`.
    #[must_use]
    pub fn movie_path(&self, rate: RationalRate) -> PathBuf {
        self.out_dir
            .join(format!("{}{}.mov", self.file_prefix, rate.label()))
    }
}

/// Builds one RGB cycle movie per configured rate.
///
/// Returns the movie paths in rate order.
///
/// # Errors
///
/// Fails on the first invalid setting, I/O error or ffmpeg failure; movies
/// finished before the failure are left in place.
pub fn generate_rgb_cycle(opts: &RgbCycleOptions, ffmpeg: &Ffmpeg) -> Result<Vec<PathBuf>> {
    validate_dimensions(opts.width, opts.height)?;
    // Reject a bad duration before touching the filesystem.
    for &rate in &opts.rates {
        rate.frame_count(opts.duration_secs)?;
    }
    ffmpeg.ensure_available()?;

    let work = ScratchDir::create(opts.out_dir.join(WORK_DIR_NAME))?;
    let sources = work.join("png");
    write_palette_sources(&sources, opts.width, opts.height)?;

    let mut movies = Vec::with_capacity(opts.rates.len());
    for &rate in &opts.rates {
        let frames_dir = work.join(format!("frames_{}", rate.label()));
        let sequence = schedule(opts.duration_secs, rate)?;
        sequence.materialize(&sources, &frames_dir)?;

        let movie = opts.movie_path(rate);
        ffmpeg.encode_sequence(&frames_dir, rate, &movie)?;
        movies.push(movie);
    }

    log::info!(
        "wrote {} RGB cycle movies to {}",
        movies.len(),
        opts.out_dir.display()
    );
    Ok(movies)
}

/// Settings for [`generate_hap_alpha`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HapAlphaOptions {
    /// Directory receiving the movie and the extracted frame.
    pub out_dir: PathBuf,
    /// Width and height of the square gradient.
    pub size: u32,
    /// Movie file name.
    pub movie_name: String,
    /// Extracted frame file name.
    pub frame_name: String,
}

impl Default for HapAlphaOptions {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from("Assets/StreamingAssets/HapAlpha"),
            size: 256,
            movie_name: "HapAlpha.mov".to_string(),
            frame_name: frame_file_name(1),
        }
    }
}

/// Files produced by [`generate_hap_alpha`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HapAlphaOutputs {
    /// The one-frame HAP Alpha movie.
    pub movie: PathBuf,
    /// Its first frame decoded back to PNG.
    pub frame: PathBuf,
}

/// Builds the HAP Alpha movie and its decoded reference frame.
///
/// # Errors
///
/// Fails on an invalid size, I/O error or ffmpeg failure.
pub fn generate_hap_alpha(opts: &HapAlphaOptions, ffmpeg: &Ffmpeg) -> Result<HapAlphaOutputs> {
    validate_dimensions(opts.size, opts.size)?;
    ffmpeg.ensure_available()?;

    let work = ScratchDir::create(opts.out_dir.join(WORK_DIR_NAME))?;
    let source = work.join("source.png");
    encode(&synthesize(opts.size, opts.size)?)?.write_atomic(&source)?;

    let outputs = HapAlphaOutputs {
        movie: opts.out_dir.join(&opts.movie_name),
        frame: opts.out_dir.join(&opts.frame_name),
    };
    ffmpeg.encode_hap_alpha(&source, &outputs.movie)?;
    ffmpeg.extract_first_frame(&outputs.movie, &outputs.frame)?;

    log::info!("wrote HAP alpha assets to {}", opts.out_dir.display());
    Ok(outputs)
}
