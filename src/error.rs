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

//! Error types shared by every asset generator in the crate.
//!
//! None of these errors are retried internally. Each one aborts the current
//! operation and is handed back to the immediate caller.

use std::path::{Path, PathBuf};

/// Convenience result type used across the crate.
pub type Result<T> = std::result::Result<T, AssetError>;

/// Failure kinds for synthesis, encoding, scheduling and external tool runs.
#[derive(thiserror::Error, Debug)]
pub enum AssetError {
    /// Width or height is zero or exceeds the PNG limit of `2^31 - 1`.
    #[error("invalid image dimensions {width}x{height}")]
    InvalidDimensions {
        /// Requested width in pixels.
        width: u32,
        /// Requested height in pixels.
        height: u32,
    },

    /// A caller-supplied RGBA buffer does not hold exactly `width * height * 4` bytes.
    #[error("pixel buffer size mismatch: got {actual} bytes, expected {expected} bytes")]
    BufferSizeMismatch {
        /// Byte count implied by the dimensions.
        expected: usize,
        /// Byte count actually supplied.
        actual: usize,
    },

    /// A frame rate with a zero numerator/denominator or unparseable text.
    #[error("invalid frame rate: {0}")]
    InvalidRate(String),

    /// A duration that is not a finite, positive number of seconds.
    #[error("invalid duration: {0} seconds")]
    InvalidDuration(f64),

    /// A sequence longer than fixed-width frame numbers can name.
    #[error("{count} frames exceed the limit of {max}")]
    TooManyFrames {
        /// Frames the duration and rate call for.
        count: u64,
        /// Largest supported frame count.
        max: u32,
    },

    /// An encoded chunk payload longer than a PNG length field allows.
    #[error("PNG chunk payload of {len} bytes exceeds the limit of {max} bytes")]
    ChunkTooLarge {
        /// Payload length in bytes.
        len: usize,
        /// Largest length a chunk may declare.
        max: usize,
    },

    /// The zlib stream rejected the scanline data.
    #[error("compression failed: {0}")]
    Compression(#[source] std::io::Error),

    /// Reading, writing, copying or deleting a file or directory failed.
    #[error("i/o error on '{}': {source}", .path.display())]
    Io {
        /// File or directory the operation targeted.
        path: PathBuf,
        /// Underlying OS error.
        #[source]
        source: std::io::Error,
    },

    /// An external tool could not be found or started.
    #[error("{program} is required but could not be run: {reason}")]
    ToolNotFound {
        /// Program name or path.
        program: String,
        /// Why the launch failed.
        reason: String,
    },

    /// An external tool ran and exited unsuccessfully.
    #[error("{program} failed while {step} (exit code {})", describe_code(.code))]
    ExternalProcess {
        /// Program name or path.
        program: String,
        /// What the invocation was doing, e.g. "encoding RGBCycle24.mov".
        step: String,
        /// Exit code as reported by the OS; `None` when terminated by a signal.
        code: Option<i32>,
    },
}

fn describe_code(code: &Option<i32>) -> String {
    code.map_or_else(|| "none".to_string(), |c| c.to_string())
}

impl AssetError {
    /// Build an [`AssetError::Io`] for `path`.
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Process exit code a binary should terminate with for this error.
    ///
    /// External tool failures propagate the tool's own exit code unchanged.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ExternalProcess {
                code: Some(code), ..
            } => *code,
            _ => 1,
        }
    }
}
