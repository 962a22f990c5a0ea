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

//! Disposable working directories.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{AssetError, Result};

/// Empties `dir`, creating it (and its parents) if needed.
///
/// # Errors
///
/// Returns [`AssetError::Io`] if the old contents cannot be removed or the
/// directory cannot be created.
pub fn reset_dir(dir: &Path) -> Result<()> {
    match std::fs::remove_dir_all(dir) {
        Ok(()) => log::debug!("cleared {}", dir.display()),
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => return Err(AssetError::io(dir, e)),
    }
    std::fs::create_dir_all(dir).map_err(|e| AssetError::io(dir, e))
}

/// Removes `dir` and everything under it; a missing directory is not an error.
///
/// # Errors
///
/// Returns [`AssetError::Io`] if removal fails.
pub fn remove_dir(dir: &Path) -> Result<()> {
    match std::fs::remove_dir_all(dir) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(AssetError::io(dir, e)),
    }
}

/// A directory at a fixed path that exists for the lifetime of the guard.
///
/// Anything already at the path (e.g. left behind by a killed run) is wiped
/// on creation, and the whole tree is removed on drop, including when the
/// owner bails out early with `?`.
#[derive(Debug)]
pub struct ScratchDir {
    path: PathBuf,
}

impl ScratchDir {
    /// Wipes and recreates `path`.
    ///
    /// # Errors
    ///
    /// Returns [`AssetError::Io`] if the directory cannot be reset.
    pub fn create(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        reset_dir(&path)?;
        Ok(Self { path })
    }

    /// Location of the directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `path().join(name)`.
    #[must_use]
    pub fn join(&self, name: impl AsRef<Path>) -> PathBuf {
        self.path.join(name)
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        if let Err(e) = remove_dir(&self.path) {
            log::warn!("failed to remove scratch directory: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_dir_empties_existing_contents() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("frames");
        std::fs::create_dir_all(dir.join("sub")).unwrap();
        std::fs::write(dir.join("stale.png"), b"x").unwrap();

        reset_dir(&dir).unwrap();

        assert!(dir.is_dir());
        assert_eq!(std::fs::read_dir(&dir).unwrap().count(), 0);
    }

    #[test]
    fn scratch_dir_is_removed_on_drop() {
        let root = tempfile::tempdir().unwrap();
        let path = root.path().join("_work");
        {
            let scratch = ScratchDir::create(&path).unwrap();
            std::fs::write(scratch.join("source.png"), b"x").unwrap();
            assert!(path.join("source.png").exists());
        }
        assert!(!path.exists());
    }

    #[test]
    fn scratch_dir_is_removed_on_early_return() {
        fn fails(path: &Path) -> Result<()> {
            let scratch = ScratchDir::create(path)?;
            std::fs::write(scratch.join("partial.png"), b"x")
                .map_err(|e| AssetError::io(scratch.path(), e))?;
            Err(AssetError::InvalidRate("boom".to_string()))
        }

        let root = tempfile::tempdir().unwrap();
        let path = root.path().join("_work");
        assert!(fails(&path).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn remove_missing_dir_is_ok() {
        let root = tempfile::tempdir().unwrap();
        assert!(remove_dir(&root.path().join("nope")).is_ok());
    }
}
