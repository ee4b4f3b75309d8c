//! Generator Configuration
//!
//! Loaded from an optional JSON file; command-line flags override it.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::manifest::FailedEntryPolicy;
use crate::naming::FilenamePolicy;
use crate::rasterizer::BackendChoice;

pub const DEFAULT_SOURCE: &str = "logo.svg";
pub const DEFAULT_OUTPUT_DIR: &str = "Assets.xcassets/AppIcon.appiconset";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct GeneratorConfig {
    #[serde(default = "default_source")]
    pub source: PathBuf,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default)]
    pub backend: BackendChoice,
    #[serde(default)]
    pub filenames: FilenamePolicy,
    #[serde(default)]
    pub failed_entries: FailedEntryPolicy,
    /// Read back every written PNG and check its pixel size
    #[serde(default = "default_true")]
    pub verify_outputs: bool,
    /// Per-entry failures and validation errors fail the run
    #[serde(default)]
    pub strict: bool,
}

fn default_source() -> PathBuf { PathBuf::from(DEFAULT_SOURCE) }
fn default_output_dir() -> PathBuf { PathBuf::from(DEFAULT_OUTPUT_DIR) }
fn default_true() -> bool { true }

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            source: default_source(),
            output_dir: default_output_dir(),
            backend: BackendChoice::default(),
            filenames: FilenamePolicy::default(),
            failed_entries: FailedEntryPolicy::default(),
            verify_outputs: true,
            strict: false,
        }
    }
}

impl GeneratorConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.output_dir.join(crate::manifest::MANIFEST_FILENAME)
    }
}
