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

//! Invocations of the system `ffmpeg` binary.
//!
//! All HAP encoding is delegated to ffmpeg. This module only assembles the
//! argument lists, runs the process with inherited stdio, and turns a non-zero
//! exit into [`AssetError::ExternalProcess`] carrying the exit code unchanged.

use std::ffi::{OsStr, OsString};
use std::path::Path;
use std::process::{Command, Stdio};

use crate::error::{AssetError, Result};
use crate::rate::RationalRate;
use crate::schedule::FRAME_NUMBER_WIDTH;

/// Environment variable that overrides the ffmpeg executable.
pub const FFMPEG_ENV: &str = "HAP_FFMPEG";

/// Input pattern matching the numbered frame files, e.g. `%06d.png`.
#[must_use]
pub fn frame_pattern() -> String {
    format!("%0{FRAME_NUMBER_WIDTH}d.png")
}

/// Handle on an ffmpeg executable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ffmpeg {
    program: OsString,
}

impl Default for Ffmpeg {
    fn default() -> Self {
        Self::with_program("ffmpeg")
    }
}

impl Ffmpeg {
    /// Uses `program` (a name on `PATH` or a full path).
    pub fn with_program(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Uses `$HAP_FFMPEG` when set and non-empty, otherwise `ffmpeg`.
    #[must_use]
    pub fn from_env() -> Self {
        match std::env::var_os(FFMPEG_ENV) {
            Some(program) if !program.is_empty() => Self::with_program(program),
            _ => Self::default(),
        }
    }

    /// The executable this handle runs.
    #[must_use]
    pub fn program(&self) -> &OsStr {
        &self.program
    }

    fn program_name(&self) -> String {
        self.program.to_string_lossy().into_owned()
    }

    /// Checks that `<program> -version` runs and succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`AssetError::ToolNotFound`] otherwise.
    pub fn ensure_available(&self) -> Result<()> {
        let status = Command::new(&self.program)
            .arg("-version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|e| AssetError::ToolNotFound {
                program: self.program_name(),
                reason: e.to_string(),
            })?;
        if !status.success() {
            return Err(AssetError::ToolNotFound {
                program: self.program_name(),
                reason: format!("-version exited with {status}"),
            });
        }
        Ok(())
    }

    /// Runs the program with `args`, waiting for it to exit.
    ///
    /// # Errors
    ///
    /// Returns [`AssetError::ToolNotFound`] if the process cannot be spawned and
    /// [`AssetError::ExternalProcess`] if it exits unsuccessfully.
    pub fn run<I, S>(&self, step: &str, args: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut cmd = Command::new(&self.program);
        cmd.args(args);
        log::debug!("{step}: {cmd:?}");

        let status = cmd.status().map_err(|e| AssetError::ToolNotFound {
            program: self.program_name(),
            reason: e.to_string(),
        })?;
        if !status.success() {
            return Err(AssetError::ExternalProcess {
                program: self.program_name(),
                step: step.to_string(),
                code: status.code(),
            });
        }
        Ok(())
    }

    /// Encodes the numbered PNGs in `frames_dir` into a HAP movie at `rate`.
    ///
    /// # Errors
    ///
    /// See [`Ffmpeg::run`]; also [`AssetError::Io`] if the output directory
    /// cannot be created.
    pub fn encode_sequence(
        &self,
        frames_dir: &Path,
        rate: RationalRate,
        output: &Path,
    ) -> Result<()> {
        ensure_parent_dir(output)?;
        self.run(
            &format!("encoding {}", output.display()),
            sequence_args(frames_dir, rate, output),
        )?;
        log::info!("encoded {} at {rate} fps", output.display());
        Ok(())
    }

    /// Encodes the single image `source` into a one-frame HAP Alpha movie.
    ///
    /// # Errors
    ///
    /// See [`Ffmpeg::encode_sequence`].
    pub fn encode_hap_alpha(&self, source: &Path, output: &Path) -> Result<()> {
        ensure_parent_dir(output)?;
        self.run(
            &format!("encoding {}", output.display()),
            hap_alpha_args(source, output),
        )?;
        log::info!("encoded {}", output.display());
        Ok(())
    }

    /// Decodes the first frame of `movie` back to an RGBA PNG at `output`.
    ///
    /// # Errors
    ///
    /// See [`Ffmpeg::encode_sequence`].
    pub fn extract_first_frame(&self, movie: &Path, output: &Path) -> Result<()> {
        ensure_parent_dir(output)?;
        self.run(
            &format!("extracting {}", output.display()),
            extract_frame_args(movie, output),
        )?;
        log::info!("extracted {}", output.display());
        Ok(())
    }
}

/// `-y -framerate <rate> -i <frames>/%06d.png -c:v hap -pix_fmt rgba <output>`
#[must_use]
pub fn sequence_args(frames_dir: &Path, rate: RationalRate, output: &Path) -> Vec<OsString> {
    let mut args: Vec<OsString> = ["-y", "-framerate"].iter().map(OsString::from).collect();
    args.push(rate.to_string().into());
    args.push("-i".into());
    args.push(frames_dir.join(frame_pattern()).into_os_string());
    args.extend(
        ["-c:v", "hap", "-pix_fmt", "rgba"]
            .iter()
            .map(OsString::from),
    );
    args.push(output.as_os_str().to_os_string());
    args
}

/// `-y -i <source> -frames:v 1 -c:v hap -format hap_alpha -pix_fmt rgba <output>`
#[must_use]
pub fn hap_alpha_args(source: &Path, output: &Path) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec!["-y".into(), "-i".into(), source.as_os_str().into()];
    args.extend(
        [
            "-frames:v",
            "1",
            "-c:v",
            "hap",
            "-format",
            "hap_alpha",
            "-pix_fmt",
            "rgba",
        ]
        .iter()
        .map(OsString::from),
    );
    args.push(output.as_os_str().to_os_string());
    args
}

/// `-y -i <movie> -frames:v 1 -update 1 -pix_fmt rgba -color_range pc <output>`
#[must_use]
pub fn extract_frame_args(movie: &Path, output: &Path) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec!["-y".into(), "-i".into(), movie.as_os_str().into()];
    args.extend(
        [
            "-frames:v",
            "1",
            "-update",
            "1",
            "-pix_fmt",
            "rgba",
            "-color_range",
            "pc",
        ]
        .iter()
        .map(OsString::from),
    );
    args.push(output.as_os_str().to_os_string());
    args
}

/// Ensure the parent directory of `path` exists.
fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| AssetError::io(parent, e))?;
        }
    }
    Ok(())
}
