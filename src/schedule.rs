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

//! RGB cycle frame scheduling.
//!
//! A sequence of `ceil(rate * duration)` frames is laid out as numbered copies
//! of three solid source images, cycling red, green, blue:
//!
//! ```text
//! 000001.png <- red.png
//! 000002.png <- green.png
//! 000003.png <- blue.png
//! 000004.png <- red.png
//! ...
//! ```
//!
//! Frame numbers start at 1 and are contiguous, zero-padded to six digits so
//! the external encoder can read them through a `%06d.png` pattern.

use std::path::Path;

use crate::error::{AssetError, Result};
use crate::pixel::PixelBuffer;
use crate::rate::RationalRate;
use crate::raster;
use crate::scratch;

/// Digits in a frame file number.
pub const FRAME_NUMBER_WIDTH: usize = 6;

/// Largest frame number that still fits in [`FRAME_NUMBER_WIDTH`] digits.
#[allow(clippy::cast_possible_truncation)] // FRAME_NUMBER_WIDTH is a small constant
pub const MAX_FRAME_COUNT: u32 = 10u32.pow(FRAME_NUMBER_WIDTH as u32) - 1;

/// The source image a frame is copied from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaletteSlot {
    /// Opaque `FF0000`.
    Red,
    /// Opaque `00FF00`.
    Green,
    /// Opaque `0000FF`.
    Blue,
}

/// Cycle order of the palette.
pub const PALETTE: [PaletteSlot; 3] = [PaletteSlot::Red, PaletteSlot::Green, PaletteSlot::Blue];

impl PaletteSlot {
    /// Slot used by 1-based frame `number`: `(number - 1) mod 3`.
    #[must_use]
    pub fn for_frame(number: u32) -> Self {
        PALETTE[(number.saturating_sub(1) % 3) as usize]
    }

    /// Lowercase color name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Green => "green",
            Self::Blue => "blue",
        }
    }

    /// Source file name inside the sources directory.
    #[must_use]
    pub fn file_name(self) -> String {
        format!("{}.png", self.name())
    }

    /// RGBA8 fill color.
    #[must_use]
    pub fn rgba(self) -> [u8; 4] {
        match self {
            Self::Red => [0xFF, 0x00, 0x00, 0xFF],
            Self::Green => [0x00, 0xFF, 0x00, 0xFF],
            Self::Blue => [0x00, 0x00, 0xFF, 0xFF],
        }
    }
}

/// Output file name for 1-based frame `number`, e.g. `000042.png`.
#[must_use]
pub fn frame_file_name(number: u32) -> String {
    format!("{number:0width$}.png", width = FRAME_NUMBER_WIDTH)
}

/// One entry of a [`FrameSequence`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledFrame {
    /// 1-based frame number.
    pub number: u32,
    /// Source image for this frame.
    pub slot: PaletteSlot,
}

impl ScheduledFrame {
    /// Output file name for this frame.
    #[must_use]
    pub fn file_name(&self) -> String {
        frame_file_name(self.number)
    }
}

/// Ordered frames for one rate and duration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameSequence {
    rate: RationalRate,
    frames: Vec<ScheduledFrame>,
}

/// Plans `rate.frame_count(duration_secs)` frames cycling through [`PALETTE`].
///
/// # Errors
///
/// Returns [`AssetError::InvalidDuration`] for a non-positive or non-finite duration
/// and [`AssetError::TooManyFrames`] when the count exceeds [`MAX_FRAME_COUNT`].
pub fn schedule(duration_secs: f64, rate: RationalRate) -> Result<FrameSequence> {
    let count = rate.frame_count(duration_secs)?;
    let frames = (1..=count)
        .map(|number| ScheduledFrame {
            number,
            slot: PaletteSlot::for_frame(number),
        })
        .collect();

    log::debug!("scheduled {count} frames for {duration_secs}s at {rate} fps");
    Ok(FrameSequence { rate, frames })
}

impl FrameSequence {
    /// Rate the sequence was planned for.
    #[must_use]
    pub fn rate(&self) -> RationalRate {
        self.rate
    }

    /// Frames in playback order.
    #[must_use]
    pub fn frames(&self) -> &[ScheduledFrame] {
        &self.frames
    }

    /// Number of frames.
    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Returns `true` if there are no frames. Never the case for a scheduled sequence.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Copies each frame's source from `sources_dir` into `frames_dir`.
    ///
    /// `frames_dir` is emptied first, so frames from an earlier, longer run
    /// never survive. If a copy fails, `frames_dir` is removed before the error
    /// is returned.
    ///
    /// # Errors
    ///
    /// Returns [`AssetError::Io`] if the directory cannot be reset or a copy fails.
    pub fn materialize(&self, sources_dir: &Path, frames_dir: &Path) -> Result<()> {
        scratch::reset_dir(frames_dir)?;

        if let Err(e) = self.copy_frames(sources_dir, frames_dir) {
            if let Err(cleanup) = scratch::remove_dir(frames_dir) {
                log::warn!("failed to clean up partial frames: {cleanup}");
            }
            return Err(e);
        }

        log::info!(
            "materialized {} frames at {} fps in {}",
            self.frames.len(),
            self.rate,
            frames_dir.display()
        );
        Ok(())
    }

    fn copy_frames(&self, sources_dir: &Path, frames_dir: &Path) -> Result<()> {
        for frame in &self.frames {
            let src = sources_dir.join(frame.slot.file_name());
            let dst = frames_dir.join(frame.file_name());
            std::fs::copy(&src, &dst).map_err(|e| AssetError::io(&src, e))?;
        }
        Ok(())
    }
}

/// Writes `red.png`, `green.png` and `blue.png` of the given size into `dir`.
///
/// # Errors
///
/// Returns [`AssetError::InvalidDimensions`] for a zero size, or the encoder
/// or I/O error for the first source that fails.
pub fn write_palette_sources(dir: &Path, width: u32, height: u32) -> Result<()> {
    for slot in PALETTE {
        let buffer = PixelBuffer::solid(width, height, slot.rgba())?;
        raster::encode(&buffer)?.write_atomic(dir.join(slot.file_name()))?;
    }
    Ok(())
}
