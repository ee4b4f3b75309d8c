//! App Icon Set Generator
//!
//! Rasterizes one SVG logo into every size the iOS `AppIcon.appiconset`
//! requires and writes the matching `Contents.json`.
//!
//! # Behavior worth knowing
//! 1. Filenames depend on pixel size alone by default, so rows that share a
//!    size share a file. `FilenamePolicy::Disambiguated` gives each row its own.
//! 2. Failed rows are still listed in the manifest by default.
//!    `FailedEntryPolicy::Omit` leaves them out.
//! 3. Per-row failures never abort the run.

pub mod catalog;
pub mod descriptor;
pub mod naming;
pub mod manifest;
pub mod rasterizer;
pub mod validation;
pub mod hashing;
pub mod config;
pub mod pipeline;

pub use catalog::{Catalog, Idiom, SizeSpec, IOS_APP_ICON};
pub use descriptor::{split_descriptor, SizeScale};
pub use naming::{derive_filename, FilenamePolicy};
pub use manifest::{build_manifest, build_manifest_filtered, preview_manifest, FailedEntryPolicy, ImageRecord, Manifest, ManifestError, ManifestInfo};
pub use rasterizer::{BackendChoice, CommandRasterizer, ExternalTool, RasterizeError, Rasterizer, ResvgRasterizer};
pub use validation::{ValidationResult, ValidationRule, ValidationViolation, ViolationSeverity};
pub use hashing::{compute_manifest_hash, compute_input_hash, canonical_json};
pub use config::{ConfigError, GeneratorConfig};
pub use pipeline::{EntryOutcome, EntryStatus, GenerationReport, IconSetPipeline, PipelineError};

pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");
