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

//! RGBA8 pixel buffers and the procedural images drawn into them.
//!
//! # Generators
//!
//! - **Hue/alpha gradient:** hue sweeps left to right across the full HSV
//!   circle (red at both edges), alpha ramps from 0 at the top row to 255 at
//!   the bottom row. Used as the HAP alpha reference image.
//! - **Solid fill:** a single opaque color. Used for the red/green/blue frames
//!   of the RGB cycle sequence.
//!
//! Both are pure functions of their inputs and produce byte-identical output
//! on every platform.

use crate::error::{AssetError, Result};

/// Bytes per RGBA8 sample.
pub const BYTES_PER_PIXEL: usize = 4;

/// Largest width or height a PNG header can carry.
pub const MAX_DIMENSION: u32 = i32::MAX as u32;

/// A row-major, top-to-bottom grid of RGBA8 samples with no row padding.
///
/// The constructors guarantee `width >= 1`, `height >= 1` and
/// `data.len() == width * height * 4`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

/// Validates dimensions and returns the byte length of a buffer of that size.
fn checked_len(width: u32, height: u32) -> Result<usize> {
    let invalid = AssetError::InvalidDimensions { width, height };
    if width == 0 || height == 0 || width > MAX_DIMENSION || height > MAX_DIMENSION {
        return Err(invalid);
    }
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(BYTES_PER_PIXEL))
        .ok_or(invalid)
}

/// Checks that `width` x `height` is a representable RGBA8 PNG size.
///
/// # Errors
///
/// Returns [`AssetError::InvalidDimensions`] if either dimension is zero or too large.
pub fn validate_dimensions(width: u32, height: u32) -> Result<()> {
    checked_len(width, height).map(|_| ())
}

impl PixelBuffer {
    /// Creates a fully transparent black buffer.
    ///
    /// # Errors
    ///
    /// Returns [`AssetError::InvalidDimensions`] if either dimension is zero or too large.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let len = checked_len(width, height)?;
        Ok(Self {
            width,
            height,
            data: vec![0; len],
        })
    }

    /// Wraps existing RGBA8 data.
    ///
    /// # Errors
    ///
    /// Returns [`AssetError::InvalidDimensions`] for bad dimensions and
    /// [`AssetError::BufferSizeMismatch`] if `data` is not exactly `width * height * 4` bytes.
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let expected = checked_len(width, height)?;
        if data.len() != expected {
            return Err(AssetError::BufferSizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Creates a buffer where every sample is `rgba`.
    ///
    /// # Errors
    ///
    /// Returns [`AssetError::InvalidDimensions`] if either dimension is zero or too large.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Result<Self> {
        let mut buffer = Self::new(width, height)?;
        for sample in buffer.data.chunks_exact_mut(BYTES_PER_PIXEL) {
            sample.copy_from_slice(&rgba);
        }
        Ok(buffer)
    }

    /// Width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Bytes in one row (`width * 4`).
    #[must_use]
    pub fn stride(&self) -> usize {
        self.width as usize * BYTES_PER_PIXEL
    }

    /// All samples, row-major.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Consumes the buffer and returns its samples.
    #[must_use]
    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }

    /// Iterates rows top to bottom, each `stride()` bytes long.
    pub fn rows(&self) -> impl ExactSizeIterator<Item = &[u8]> {
        self.data.chunks_exact(self.stride())
    }

    /// Returns the sample at (`x`, `y`), or `None` outside the buffer.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = y as usize * self.stride() + x as usize * BYTES_PER_PIXEL;
        let mut rgba = [0u8; 4];
        rgba.copy_from_slice(&self.data[offset..offset + BYTES_PER_PIXEL]);
        Some(rgba)
    }

    fn put_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        let offset = y as usize * self.stride() + x as usize * BYTES_PER_PIXEL;
        self.data[offset..offset + BYTES_PER_PIXEL].copy_from_slice(&rgba);
    }
}

/// Converts HSV in `[0, 1]` to linear RGB in `[0, 1]` with the 6-sector piecewise rule.
///
/// A hue of exactly 1.0 lands in sector 0 with no fractional part, i.e. the
/// same color as hue 0.
#[must_use]
#[allow(clippy::cast_possible_truncation)] // floor of hue * 6 is a small integer
pub fn hsv_to_rgb(h: f64, s: f64, v: f64) -> (f64, f64, f64) {
    let scaled = h * 6.0;
    let whole = scaled.floor();
    let f = scaled - whole;
    let p = v * (1.0 - s);
    let q = v * (1.0 - f * s);
    let t = v * (1.0 - (1.0 - f) * s);

    match (whole as i64).rem_euclid(6) {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    }
}

/// Quantizes a `[0, 1]` channel to 8 bits, rounding half up.
#[inline]
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // clamped to 0..=255 first
pub fn quantize(value: f64) -> u8 {
    (value * 255.0 + 0.5).floor().clamp(0.0, 255.0) as u8
}

/// Position of `index` along an axis of `len` samples, 0 at the first and 1
/// at the last. A single-sample axis sits at 0.
#[inline]
fn axis_fraction(index: u32, len: u32) -> f64 {
    if len <= 1 {
        0.0
    } else {
        f64::from(index) / f64::from(len - 1)
    }
}

/// Draws the hue/alpha gradient.
///
/// Hue runs `x / (width - 1)` at full saturation and value; alpha runs
/// `y / (height - 1)`. A one-pixel-wide or one-pixel-tall image uses 0 for the
/// degenerate axis.
///
/// # Errors
///
/// Returns [`AssetError::InvalidDimensions`] before any drawing if either
/// dimension is zero or too large.
pub fn synthesize(width: u32, height: u32) -> Result<PixelBuffer> {
    let mut buffer = PixelBuffer::new(width, height)?;

    // Hue depends only on x, so convert each column once.
    let columns: Vec<[u8; 3]> = (0..width)
        .map(|x| {
            let (r, g, b) = hsv_to_rgb(axis_fraction(x, width), 1.0, 1.0);
            [quantize(r), quantize(g), quantize(b)]
        })
        .collect();

    for y in 0..height {
        let alpha = quantize(axis_fraction(y, height));
        for (x, rgb) in (0..width).zip(&columns) {
            buffer.put_pixel(x, y, [rgb[0], rgb[1], rgb[2], alpha]);
        }
    }

    log::debug!("synthesized {width}x{height} hue/alpha gradient");
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_dimensions_are_rejected() {
        assert!(matches!(
            synthesize(0, 10),
            Err(AssetError::InvalidDimensions { width: 0, height: 10 })
        ));
        assert!(matches!(
            synthesize(10, 0),
            Err(AssetError::InvalidDimensions { width: 10, height: 0 })
        ));
        assert!(PixelBuffer::new(0, 0).is_err());
    }

    #[test]
    fn oversized_dimensions_are_rejected() {
        assert!(matches!(
            PixelBuffer::new(MAX_DIMENSION + 1, 1),
            Err(AssetError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn from_rgba_checks_length() {
        let err = PixelBuffer::from_rgba(2, 2, vec![0; 15]).unwrap_err();
        assert!(matches!(
            err,
            AssetError::BufferSizeMismatch {
                expected: 16,
                actual: 15
            }
        ));
        assert!(PixelBuffer::from_rgba(2, 2, vec![0; 16]).is_ok());
    }

    #[test]
    fn hsv_primary_and_secondary_hues() {
        assert_eq!(hsv_to_rgb(0.0, 1.0, 1.0), (1.0, 0.0, 0.0));
        assert_eq!(hsv_to_rgb(1.0, 1.0, 1.0), (1.0, 0.0, 0.0));
        assert_eq!(hsv_to_rgb(0.5, 1.0, 1.0), (0.0, 1.0, 1.0));

        let (r, g, b) = hsv_to_rgb(2.0 / 3.0, 1.0, 1.0);
        assert_eq!((quantize(r), quantize(g), quantize(b)), (0, 0, 255));
    }

    #[test]
    fn hsv_zero_saturation_is_grey() {
        assert_eq!(hsv_to_rgb(0.3, 0.0, 0.5), (0.5, 0.5, 0.5));
    }

    #[test]
    fn quantize_rounds_half_up() {
        assert_eq!(quantize(0.0), 0);
        assert_eq!(quantize(1.0), 255);
        assert_eq!(quantize(0.5), 128); // 127.5 + 0.5
        assert_eq!(quantize(1.0 / 255.0 * 0.49), 0);
    }

    #[test]
    fn single_pixel_is_transparent_red() {
        let buffer = synthesize(1, 1).unwrap();
        assert_eq!(buffer.as_bytes(), &[255, 0, 0, 0]);
    }

    #[test]
    fn gradient_corners() {
        let buffer = synthesize(7, 3).unwrap();
        assert_eq!(buffer.as_bytes().len(), 7 * 3 * 4);

        // Hue steps of 1/6 hit each sector boundary exactly.
        let top: Vec<[u8; 4]> = (0..7).map(|x| buffer.pixel(x, 0).unwrap()).collect();
        assert_eq!(
            top,
            vec![
                [255, 0, 0, 0],
                [255, 255, 0, 0],
                [0, 255, 0, 0],
                [0, 255, 255, 0],
                [0, 0, 255, 0],
                [255, 0, 255, 0],
                [255, 0, 0, 0],
            ]
        );
        assert_eq!(buffer.pixel(3, 1).unwrap()[3], 128);
        assert_eq!(buffer.pixel(6, 2).unwrap(), [255, 0, 0, 255]);
        assert_eq!(buffer.pixel(7, 0), None);
    }

    #[test]
    fn single_row_and_column_use_zero_fraction() {
        let row = synthesize(5, 1).unwrap();
        assert!(row.rows().all(|r| r.chunks_exact(4).all(|px| px[3] == 0)));

        let column = synthesize(1, 5).unwrap();
        for y in 0..5 {
            let px = column.pixel(0, y).unwrap();
            assert_eq!(&px[..3], &[255, 0, 0]);
        }
        assert_eq!(column.pixel(0, 4).unwrap()[3], 255);
    }

    #[test]
    fn synthesis_is_deterministic() {
        assert_eq!(synthesize(33, 17).unwrap(), synthesize(33, 17).unwrap());
    }

    #[test]
    fn solid_fill() {
        let buffer = PixelBuffer::solid(3, 2, [0, 255, 0, 255]).unwrap();
        assert_eq!(buffer.rows().len(), 2);
        assert!(buffer
            .as_bytes()
            .chunks_exact(4)
            .all(|px| px == [0, 255, 0, 255]));
    }
}
