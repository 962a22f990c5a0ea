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

//! Exact rational frame rates.
//!
//! Broadcast rates such as 23.976 are really `24000/1001`. Keeping them as an
//! integer ratio all the way to the frame-count ceiling avoids the drift a
//! rounded float would introduce.

use std::fmt;
use std::str::FromStr;

use crate::error::{AssetError, Result};
use crate::schedule::MAX_FRAME_COUNT;

/// A frames-per-second value `num / den`, both non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RationalRate {
    num: u32,
    den: u32,
}

/// The rates every RGB cycle asset set is generated for.
pub const STANDARD_RATES: [RationalRate; 8] = [
    RationalRate { num: 24, den: 1 },
    RationalRate { num: 24000, den: 1001 },
    RationalRate { num: 25, den: 1 },
    RationalRate { num: 30, den: 1 },
    RationalRate { num: 30000, den: 1001 },
    RationalRate { num: 50, den: 1 },
    RationalRate { num: 60, den: 1 },
    RationalRate { num: 60000, den: 1001 },
];

impl RationalRate {
    /// Creates `num / den` frames per second.
    ///
    /// # Errors
    ///
    /// Returns [`AssetError::InvalidRate`] if either part is zero.
    pub fn new(num: u32, den: u32) -> Result<Self> {
        if num == 0 || den == 0 {
            return Err(AssetError::InvalidRate(format!("{num}/{den}")));
        }
        Ok(Self { num, den })
    }

    /// Creates a whole-number rate.
    ///
    /// # Errors
    ///
    /// Returns [`AssetError::InvalidRate`] for zero.
    pub fn integer(fps: u32) -> Result<Self> {
        Self::new(fps, 1)
    }

    /// Numerator (frames).
    #[must_use]
    pub fn num(self) -> u32 {
        self.num
    }

    /// Denominator (seconds).
    #[must_use]
    pub fn den(self) -> u32 {
        self.den
    }

    /// Approximate value for display and logging only.
    #[must_use]
    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// Filesystem-safe form of the rate: `24`, `24000-1001`.
    #[must_use]
    pub fn label(self) -> String {
        self.to_string().replace('/', "-")
    }

    /// Number of frames needed to cover `duration_secs`, rounded up, at least 1.
    ///
    /// `num * duration` is formed first. When that product is integral the
    /// ceiling division by `den` is done in integers; otherwise the single
    /// float division happens right before the ceiling.
    ///
    /// # Errors
    ///
    /// Returns [`AssetError::InvalidDuration`] if the duration is not finite and
    /// positive, and [`AssetError::TooManyFrames`] if the count would need more
    /// than six-digit frame numbers.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )] // product is finite, positive and range-checked before each cast
    pub fn frame_count(self, duration_secs: f64) -> Result<u32> {
        if !duration_secs.is_finite() || duration_secs <= 0.0 {
            return Err(AssetError::InvalidDuration(duration_secs));
        }

        let product = f64::from(self.num) * duration_secs;
        let den = f64::from(self.den);
        let frames = if product.fract() == 0.0 && product < u64::MAX as f64 {
            (product as u64).div_ceil(u64::from(self.den)) as f64
        } else {
            (product / den).ceil()
        };

        if frames > f64::from(MAX_FRAME_COUNT) {
            return Err(AssetError::TooManyFrames {
                count: frames as u64,
                max: MAX_FRAME_COUNT,
            });
        }
        Ok((frames as u32).max(1))
    }
}

impl fmt::Display for RationalRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.den == 1 {
            write!(f, "{}", self.num)
        } else {
            write!(f, "{}/{}", self.num, self.den)
        }
    }
}

impl FromStr for RationalRate {
    type Err = AssetError;

    /// Parses `"24"` or `"24000/1001"`.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || AssetError::InvalidRate(s.to_string());
        let parse = |part: &str| part.trim().parse::<u32>().map_err(|_| invalid());

        let parsed = match s.split_once('/') {
            Some((num, den)) => Self::new(parse(num)?, parse(den)?),
            None => Self::integer(parse(s)?),
        };
        parsed.map_err(|_| invalid())
    }
}
