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

//! Deterministic test assets for HAP video codec test suites.
//!
//! # Components
//!
//! - [`pixel`]: RGBA8 buffers and the hue/alpha gradient generator.
//! - [`raster`]: a self-contained RGBA8 PNG writer (chunk framing, CRC-32,
//!   zlib-compressed scanlines) with atomic file output.
//! - [`rate`] and [`schedule`]: exact rational frame rates and the red/green/blue
//!   frame cycle laid out as `%06d.png` files.
//! - [`ffmpeg`]: the external encoder invocations that turn those inputs into
//!   HAP movies.
//! - [`jobs`]: the RGB cycle and HAP alpha recipes used by the binaries.
//!
//! # Example
//!
//! ```no_run
//! use hap_test_assets::{encode, synthesize};
//!
//! let image = encode(&synthesize(256, 256)?)?;
//! image.write_atomic("gradient.png")?;
//! # Ok::<(), hap_test_assets::AssetError>(())
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]

pub mod error;
pub mod ffmpeg;
pub mod jobs;
pub mod pixel;
pub mod rate;
pub mod raster;
pub mod schedule;
pub mod scratch;

pub use error::{AssetError, Result};
pub use ffmpeg::Ffmpeg;
pub use pixel::{synthesize, PixelBuffer};
pub use rate::RationalRate;
pub use raster::{encode, Chunk, EncodedImage};
pub use schedule::{schedule, FrameSequence, PaletteSlot};
