//! Generation Pipeline - Single Entry Point
//!
//! Catalog rows are processed one at a time, in order. A failed row is
//! logged and skipped; it never aborts the run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::catalog::{Catalog, Idiom, IOS_APP_ICON};
use crate::config::GeneratorConfig;
use crate::hashing::{compute_input_hash, compute_manifest_hash, file_sha256};
use crate::manifest::{build_manifest_filtered, preview_manifest, FailedEntryPolicy, Manifest, ManifestError};
use crate::rasterizer::{self, ExternalTool, Rasterizer};
use crate::validation::{ValidationInput, ValidationResult, Validator, ViolationSeverity};
use crate::ENGINE_VERSION;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("No SVG converter found: {0}")]
    NoRasterizer(String),

    #[error("Source not found: {0}")]
    SourceNotFound(PathBuf),

    #[error("Failed to read source {path}: {source}")]
    SourceRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to create output directory {path}: {source}")]
    OutputDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Manifest error: {0}")]
    Manifest(#[from] ManifestError),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum EntryStatus {
    Written,
    Failed { reason: String },
}

/// What happened to one catalog row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryOutcome {
    pub index: usize,
    pub dimension: u32,
    pub idiom: Idiom,
    pub filename: String,
    pub status: EntryStatus,
    pub sha256: Option<String>,
}

impl EntryOutcome {
    pub fn is_written(&self) -> bool {
        self.status == EntryStatus::Written
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationReport {
    pub id: String,
    pub engine_version: String,
    pub catalog: String,
    pub catalog_version: u32,
    pub backend: String,
    pub created_at: DateTime<Utc>,
    pub source: PathBuf,
    pub output_dir: PathBuf,
    pub manifest_path: PathBuf,
    pub input_hash: String,
    pub manifest_hash: String,
    pub manifest: Manifest,
    pub entries: Vec<EntryOutcome>,
    pub validation: ValidationResult,
}

impl GenerationReport {
    pub fn written_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_written()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.entries.len() - self.written_count()
    }

    /// Per-entry failures only count against the run when `strict`
    pub fn passes(&self, strict: bool) -> bool {
        !strict || (self.failed_count() == 0 && self.validation.valid)
    }
}

/// The generation pipeline - one rasterizer, one catalog, one output set
pub struct IconSetPipeline {
    config: GeneratorConfig,
    catalog: Catalog,
    rasterizer: Box<dyn Rasterizer>,
    validator: Validator,
}

impl IconSetPipeline {
    pub fn new(config: GeneratorConfig, rasterizer: Box<dyn Rasterizer>) -> Self {
        Self {
            config,
            catalog: IOS_APP_ICON,
            rasterizer,
            validator: Validator::new(),
        }
    }

    /// Pick the backend named by `config.backend`
    pub fn from_config(config: GeneratorConfig) -> Result<Self, PipelineError> {
        let candidates = rasterizer::candidates(config.backend);
        Self::from_candidates(config, candidates)
    }

    /// Inject the first available of `candidates`
    pub fn from_candidates(
        config: GeneratorConfig,
        candidates: Vec<Box<dyn Rasterizer>>,
    ) -> Result<Self, PipelineError> {
        let rasterizer = rasterizer::select_first_available(candidates).ok_or_else(|| {
            let hints: Vec<_> = ExternalTool::ALL
                .iter()
                .map(|t| format!("{} ({})", t.program(), t.install_hint()))
                .collect();
            PipelineError::NoRasterizer(format!(
                "backend {} unavailable; install one of: {}",
                config.backend.as_str(),
                hints.join(", ")
            ))
        })?;
        Ok(Self::new(config, rasterizer))
    }

    pub fn with_catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn backend_name(&self) -> &'static str {
        self.rasterizer.name()
    }

    /// Rasterize every row, write the manifest, verify the output
    #[tracing::instrument(skip(self), fields(backend = self.rasterizer.name()))]
    pub fn generate(&self) -> Result<GenerationReport, PipelineError> {
        let source = &self.config.source;
        let output_dir = &self.config.output_dir;
        let policy = self.config.filenames;

        if !source.is_file() {
            return Err(PipelineError::SourceNotFound(source.clone()));
        }
        let source_hash = file_sha256(source).map_err(|e| PipelineError::SourceRead {
            path: source.clone(),
            source: e,
        })?;

        fs::create_dir_all(output_dir).map_err(|e| PipelineError::OutputDir {
            path: output_dir.clone(),
            source: e,
        })?;

        info!(source = %source.display(), output_dir = %output_dir.display(), "generating app icons");

        let lint = Validator::catalog_only().validate(&ValidationInput {
            catalog: &self.catalog,
            filenames: policy,
            output_dir,
            outcomes: &[],
        });
        for v in lint.warnings() {
            warn!(rule = %v.rule, "{}", v.message);
        }

        let mut entries = Vec::with_capacity(self.catalog.len());
        for (index, spec) in self.catalog.iter().enumerate() {
            let filename = policy.filename(spec);
            let target = output_dir.join(&filename);
            info!(%filename, dimension = spec.dimension, idiom = %spec.idiom, "rasterizing");

            let status = match self.rasterizer.rasterize(source, spec.dimension, &target) {
                Ok(()) => EntryStatus::Written,
                Err(e) => {
                    warn!(%filename, error = %e, "rasterization failed");
                    EntryStatus::Failed { reason: e.to_string() }
                }
            };

            let sha256 = match status {
                EntryStatus::Written => file_sha256(&target).ok(),
                EntryStatus::Failed { .. } => None,
            };

            entries.push(EntryOutcome {
                index,
                dimension: spec.dimension,
                idiom: spec.idiom,
                filename,
                status,
                sha256,
            });
        }

        let manifest = match self.config.failed_entries {
            FailedEntryPolicy::Record => preview_manifest(&self.catalog, policy),
            FailedEntryPolicy::Omit => build_manifest_filtered(
                &self.catalog,
                |spec| policy.filename(spec),
                |index, _| entries[index].is_written(),
            ),
        };

        let manifest_path = self.config.manifest_path();
        manifest.write_to(&manifest_path)?;
        info!(path = %manifest_path.display(), images = manifest.images.len(), "wrote manifest");

        let validation = if self.config.verify_outputs {
            self.validator.validate(&ValidationInput {
                catalog: &self.catalog,
                filenames: policy,
                output_dir,
                outcomes: &entries,
            })
        } else {
            lint
        };
        for v in validation.violations.iter().filter(|v| v.severity == ViolationSeverity::Error) {
            warn!(rule = %v.rule, "{}", v.message);
        }

        let input_hash = compute_input_hash(
            self.catalog.name,
            self.catalog.version,
            &serde_json::json!({
                "source": source_hash,
                "filenames": policy,
                "failedEntries": self.config.failed_entries,
            }),
            ENGINE_VERSION,
        )?;
        let manifest_hash = compute_manifest_hash(&manifest)?;

        let report = GenerationReport {
            id: Uuid::new_v4().to_string(),
            engine_version: ENGINE_VERSION.to_string(),
            catalog: self.catalog.name.to_string(),
            catalog_version: self.catalog.version,
            backend: self.rasterizer.name().to_string(),
            created_at: Utc::now(),
            source: source.clone(),
            output_dir: output_dir.clone(),
            manifest_path,
            input_hash,
            manifest_hash,
            manifest,
            entries,
            validation,
        };

        info!(
            written = report.written_count(),
            failed = report.failed_count(),
            "generated {} app icons",
            report.manifest.images.len()
        );

        Ok(report)
    }
}
