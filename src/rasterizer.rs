//! Rasterizer Capability - SVG to PNG at a fixed pixel size
//!
//! The pipeline only sees `dyn Rasterizer`. External converters are checked at
//! startup and the first available one is injected; the built-in resvg
//! renderer is used only when asked for by name.

use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

use resvg::{tiny_skia, usvg};

#[derive(Debug, Error)]
pub enum RasterizeError {
    #[error("Failed to launch {tool}: {source}")]
    Spawn {
        tool: &'static str,
        source: std::io::Error,
    },

    #[error("{tool} exited with {code}: {stderr}")]
    Exited {
        tool: &'static str,
        code: String,
        stderr: String,
    },

    #[error("{tool} reported success but wrote no file at {path}")]
    MissingOutput { tool: &'static str, path: PathBuf },

    #[error("Invalid SVG: {0}")]
    InvalidSvg(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Writes a `dimension` x `dimension` PNG of `source` to `target`
pub trait Rasterizer {
    fn name(&self) -> &'static str;
    fn is_available(&self) -> bool;
    fn rasterize(&self, source: &Path, dimension: u32, target: &Path) -> Result<(), RasterizeError>;
}

/// Command-line converters, in auto-detection order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExternalTool {
    RsvgConvert,
    Inkscape,
    Cairosvg,
}

impl ExternalTool {
    pub const ALL: [ExternalTool; 3] = [
        ExternalTool::RsvgConvert,
        ExternalTool::Inkscape,
        ExternalTool::Cairosvg,
    ];

    pub fn program(&self) -> &'static str {
        match self {
            ExternalTool::RsvgConvert => "rsvg-convert",
            ExternalTool::Inkscape => "inkscape",
            ExternalTool::Cairosvg => "cairosvg",
        }
    }

    pub fn install_hint(&self) -> &'static str {
        match self {
            ExternalTool::RsvgConvert => "brew install librsvg",
            ExternalTool::Inkscape => "brew install inkscape",
            ExternalTool::Cairosvg => "pip install cairosvg",
        }
    }

    pub fn args(&self, source: &Path, dimension: u32, target: &Path) -> Vec<OsString> {
        let n = dimension.to_string();
        match self {
            ExternalTool::RsvgConvert => vec![
                "-w".into(),
                n.clone().into(),
                "-h".into(),
                n.into(),
                "-o".into(),
                target.into(),
                source.into(),
            ],
            ExternalTool::Inkscape => {
                let mut filename = OsString::from("--export-filename=");
                filename.push(target);
                vec![
                    filename,
                    format!("--export-width={}", n).into(),
                    format!("--export-height={}", n).into(),
                    source.into(),
                ]
            }
            ExternalTool::Cairosvg => vec![
                source.into(),
                "-o".into(),
                target.into(),
                "--output-width".into(),
                n.clone().into(),
                "--output-height".into(),
                n.into(),
            ],
        }
    }
}

/// Shells out to one external converter
#[derive(Debug, Clone)]
pub struct CommandRasterizer {
    tool: ExternalTool,
    program: PathBuf,
}

impl CommandRasterizer {
    pub fn new(tool: ExternalTool) -> Self {
        Self {
            tool,
            program: PathBuf::from(tool.program()),
        }
    }

    /// Run `program` with `tool`'s argument convention
    pub fn with_program(tool: ExternalTool, program: impl Into<PathBuf>) -> Self {
        Self {
            tool,
            program: program.into(),
        }
    }
}

impl Rasterizer for CommandRasterizer {
    fn name(&self) -> &'static str {
        self.tool.program()
    }

    fn is_available(&self) -> bool {
        Command::new(&self.program)
            .arg("--version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }

    fn rasterize(&self, source: &Path, dimension: u32, target: &Path) -> Result<(), RasterizeError> {
        // a leftover file must not pass for this run's output
        match fs::remove_file(target) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        let args = self.tool.args(source, dimension, target);
        debug!(program = %self.program.display(), ?args, "invoking converter");

        let output = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| RasterizeError::Spawn {
                tool: self.name(),
                source,
            })?;

        if !output.status.success() {
            return Err(RasterizeError::Exited {
                tool: self.name(),
                code: output
                    .status
                    .code()
                    .map_or_else(|| "signal".to_string(), |c| format!("status {}", c)),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        if !target.exists() {
            return Err(RasterizeError::MissingOutput {
                tool: self.name(),
                path: target.to_path_buf(),
            });
        }

        Ok(())
    }
}

/// In-process renderer backed by resvg
pub struct ResvgRasterizer {
    fontdb: Arc<usvg::fontdb::Database>,
}

impl ResvgRasterizer {
    pub const NAME: &'static str = "resvg";

    pub fn new() -> Self {
        let mut fontdb = usvg::fontdb::Database::new();
        fontdb.load_system_fonts();
        Self {
            fontdb: Arc::new(fontdb),
        }
    }
}

impl Default for ResvgRasterizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Rasterizer for ResvgRasterizer {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn is_available(&self) -> bool {
        true
    }

    fn rasterize(&self, source: &Path, dimension: u32, target: &Path) -> Result<(), RasterizeError> {
        let data = fs::read(source)?;

        let mut opt = usvg::Options::default();
        opt.resources_dir = source.parent().map(Path::to_path_buf);
        opt.fontdb = Arc::clone(&self.fontdb);

        let tree = usvg::Tree::from_data(&data, &opt)
            .map_err(|e| RasterizeError::InvalidSvg(e.to_string()))?;

        let mut pixmap = tiny_skia::Pixmap::new(dimension, dimension)
            .ok_or_else(|| RasterizeError::Render(format!("cannot allocate {0}x{0} pixmap", dimension)))?;

        let size = tree.size();
        let transform = tiny_skia::Transform::from_scale(
            dimension as f32 / size.width(),
            dimension as f32 / size.height(),
        );
        resvg::render(&tree, transform, &mut pixmap.as_mut());

        pixmap
            .save_png(target)
            .map_err(|e| RasterizeError::Render(e.to_string()))
    }
}

/// Which backend to use
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum BackendChoice {
    /// First available external converter
    #[default]
    Auto,
    RsvgConvert,
    Inkscape,
    Cairosvg,
    /// Built-in renderer, no external tool needed
    Resvg,
}

impl BackendChoice {
    /// Spelling used on the command line and in config files
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendChoice::Auto => "auto",
            BackendChoice::RsvgConvert => "rsvg-convert",
            BackendChoice::Inkscape => "inkscape",
            BackendChoice::Cairosvg => "cairosvg",
            BackendChoice::Resvg => "resvg",
        }
    }
}

/// Availability of one backend on this host
#[derive(Debug, Clone, Serialize)]
pub struct BackendStatus {
    pub name: &'static str,
    pub available: bool,
    pub builtin: bool,
    pub install_hint: Option<&'static str>,
}

/// External converters in auto-detection order
pub fn external_candidates() -> Vec<Box<dyn Rasterizer>> {
    ExternalTool::ALL
        .iter()
        .map(|tool| Box::new(CommandRasterizer::new(*tool)) as Box<dyn Rasterizer>)
        .collect()
}

pub fn select_first_available(candidates: Vec<Box<dyn Rasterizer>>) -> Option<Box<dyn Rasterizer>> {
    candidates.into_iter().find(|r| {
        let available = r.is_available();
        debug!(backend = r.name(), available, "checked rasterizer");
        available
    })
}

/// Backends a choice may resolve to, in detection order
pub fn candidates(choice: BackendChoice) -> Vec<Box<dyn Rasterizer>> {
    let explicit = |tool: ExternalTool| vec![Box::new(CommandRasterizer::new(tool)) as Box<dyn Rasterizer>];

    match choice {
        BackendChoice::Auto => external_candidates(),
        BackendChoice::RsvgConvert => explicit(ExternalTool::RsvgConvert),
        BackendChoice::Inkscape => explicit(ExternalTool::Inkscape),
        BackendChoice::Cairosvg => explicit(ExternalTool::Cairosvg),
        BackendChoice::Resvg => vec![Box::new(ResvgRasterizer::new())],
    }
}

pub fn backend_statuses() -> Vec<BackendStatus> {
    let mut statuses: Vec<_> = ExternalTool::ALL
        .iter()
        .map(|tool| BackendStatus {
            name: tool.program(),
            available: CommandRasterizer::new(*tool).is_available(),
            builtin: false,
            install_hint: Some(tool.install_hint()),
        })
        .collect();

    statuses.push(BackendStatus {
        name: ResvgRasterizer::NAME,
        available: true,
        builtin: true,
        install_hint: None,
    });

    statuses
}
