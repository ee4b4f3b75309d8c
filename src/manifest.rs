//! Manifest Builder - Contents.json
//!
//! One record per catalog row, in catalog order. Assembly is decoupled from
//! rasterization: it never fails and, unless told otherwise, never skips.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::catalog::{Catalog, Idiom, SizeSpec};
use crate::descriptor::split_descriptor;
use crate::naming::FilenamePolicy;

pub const MANIFEST_FILENAME: &str = "Contents.json";
pub const MANIFEST_AUTHOR: &str = "xcode";
pub const MANIFEST_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Failed to write manifest {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Field order is the on-disk key order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRecord {
    pub filename: String,
    pub idiom: Idiom,
    pub scale: String,
    pub size: String,
}

impl ImageRecord {
    pub fn from_spec(spec: &SizeSpec, filename: String) -> Self {
        let parts = split_descriptor(spec.descriptor, spec.dimension);
        Self {
            filename,
            idiom: spec.idiom,
            scale: parts.scale,
            size: parts.size,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestInfo {
    pub author: String,
    pub version: u32,
}

impl Default for ManifestInfo {
    fn default() -> Self {
        Self {
            author: MANIFEST_AUTHOR.to_string(),
            version: MANIFEST_VERSION,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub images: Vec<ImageRecord>,
    pub info: ManifestInfo,
}

impl Manifest {
    /// Two-space indented, `images` before `info`
    pub fn to_json_pretty(&self) -> Result<String, ManifestError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn write_to(&self, path: &Path) -> Result<(), ManifestError> {
        let mut json = self.to_json_pretty()?;
        json.push('\n');
        fs::write(path, json).map_err(|source| ManifestError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// What to do with rows whose rasterization failed
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FailedEntryPolicy {
    /// List the row anyway, as if the file had been produced
    #[default]
    Record,
    /// Leave the row out of the manifest
    Omit,
}

pub fn build_manifest<F>(catalog: &Catalog, filename: F) -> Manifest
where
    F: Fn(&SizeSpec) -> String,
{
    build_manifest_filtered(catalog, filename, |_, _| true)
}

/// Manifest as it would be written if every row succeeded
pub fn preview_manifest(catalog: &Catalog, filenames: FilenamePolicy) -> Manifest {
    build_manifest(catalog, |spec| filenames.filename(spec))
}

/// `keep` receives the catalog index and row
pub fn build_manifest_filtered<F, K>(catalog: &Catalog, filename: F, keep: K) -> Manifest
where
    F: Fn(&SizeSpec) -> String,
    K: Fn(usize, &SizeSpec) -> bool,
{
    let images = catalog
        .iter()
        .enumerate()
        .filter(|(index, spec)| keep(*index, *spec))
        .map(|(_, spec)| ImageRecord::from_spec(spec, filename(spec)))
        .collect();

    Manifest {
        images,
        info: ManifestInfo::default(),
    }
}
