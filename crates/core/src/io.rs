//! Font file I/O and input discovery.

use std::{
    fs::{create_dir_all, read, write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use glob::glob;
use log::debug;

use crate::{config::INPUT_PATTERN, variant::Variant};

/// A font file handle for I/O operations.
#[derive(Debug, Clone)]
pub struct FontFile {
    path: PathBuf,
}

impl FontFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Fail unless the path names an existing regular file.
    pub fn ensure_exists(&self) -> Result<()> {
        if !self.path.is_file() {
            bail!("File not found: {}", self.path.display());
        }
        Ok(())
    }

    /// Fail if the file exists and `force` is not set.
    pub fn ensure_writable(&self, force: bool) -> Result<()> {
        if self.path.exists() && !force {
            bail!("Output already exists: {} (use --force to overwrite)", self.path.display());
        }
        Ok(())
    }

    /// Read font data from the file.
    pub fn read(&self) -> Result<Vec<u8>> {
        read(&self.path).with_context(|| format!("Failed to read font: {}", self.path.display()))
    }

    /// Write font data to the file, creating its directory first.
    pub fn write(&self, data: impl AsRef<[u8]>) -> Result<()> {
        self.ensure_parent_dir()?;
        write(&self.path, data)
            .with_context(|| format!("Failed to write font: {}", self.path.display()))
    }

    /// Create parent directory if it doesn't exist.
    pub fn ensure_parent_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        Ok(())
    }
}

impl AsRef<Path> for FontFile {
    fn as_ref(&self) -> &Path {
        &self.path
    }
}

/// Find fonts matching a glob pattern in a directory.
pub fn glob_fonts(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let pattern = dir.join(pattern);
    let pattern_str = pattern.to_str().context("Invalid pattern path")?;
    let mut fonts: Vec<PathBuf> = glob(pattern_str)
        .with_context(|| format!("Failed to glob pattern: {pattern_str}"))?
        .filter_map(Result::ok)
        .collect();
    fonts.sort();
    Ok(fonts)
}

/// Whether `path` looks like a variant written by an earlier run,
/// e.g. `Foo-bold.ttf`.
pub fn is_generated_variant(path: &Path) -> bool {
    let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
        return false;
    };
    Variant::ALL.iter().any(|variant| {
        stem.strip_suffix(variant.file_suffix())
            .is_some_and(|rest| rest.len() > 1 && rest.ends_with('-'))
    })
}

/// Expand directories to the `.ttf` files they contain; files pass through.
///
/// Generated variants found in a directory are skipped, so running twice
/// over the same directory does not restyle its own output.
pub fn expand_inputs(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut expanded = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let (generated, fonts): (Vec<_>, Vec<_>) = glob_fonts(input, INPUT_PATTERN)?
                .into_iter()
                .partition(|font| is_generated_variant(font));
            for font in &generated {
                debug!("Skipping generated variant: {}", font.display());
            }
            if fonts.is_empty() {
                bail!("No fonts matching {INPUT_PATTERN} in {}", input.display());
            }
            expanded.extend(fonts);
        } else {
            expanded.push(input.clone());
        }
    }
    Ok(expanded)
}
