//! App Icon Set CLI
//!
//! Commands: catalog, backends, manifest, generate
//! Outputs JSON to stdout, progress to stderr
//! Returns 1 on setup/IO failure, 2 on a failed strict run

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::Level;

use appiconset::{
    preview_manifest, rasterizer, BackendChoice, FailedEntryPolicy, FilenamePolicy,
    GeneratorConfig, IconSetPipeline, IOS_APP_ICON,
};

#[derive(Parser)]
#[command(name = "appiconset-cli", version)]
#[command(about = "App Icon Set CLI - rasterize an SVG into the iOS AppIcon set")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to a JSON config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the size catalog
    Catalog,

    /// Show which rasterizer backends are installed
    Backends,

    /// Print the manifest without rasterizing anything
    Manifest(ManifestArgs),

    /// Rasterize all sizes and write Contents.json
    Generate(GenerateArgs),
}

#[derive(Args)]
struct ManifestArgs {
    /// Output filename scheme
    #[arg(long, value_enum)]
    filenames: Option<FilenamePolicy>,
}

#[derive(Args)]
struct GenerateArgs {
    /// Source SVG
    #[arg(short, long)]
    source: Option<PathBuf>,

    /// AppIcon.appiconset directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Rasterizer backend
    #[arg(short, long, value_enum)]
    backend: Option<BackendChoice>,

    /// Output filename scheme
    #[arg(long, value_enum)]
    filenames: Option<FilenamePolicy>,

    /// Whether failed sizes stay in the manifest
    #[arg(long, value_enum)]
    failed_entries: Option<FailedEntryPolicy>,

    /// Skip reading back the written PNGs
    #[arg(long)]
    no_verify: bool,

    /// Exit 2 if any size failed or verification found errors
    #[arg(long)]
    strict: bool,
}

impl GenerateArgs {
    fn apply(self, config: &mut GeneratorConfig) {
        if let Some(source) = self.source {
            config.source = source;
        }
        if let Some(output_dir) = self.output_dir {
            config.output_dir = output_dir;
        }
        if let Some(backend) = self.backend {
            config.backend = backend;
        }
        if let Some(filenames) = self.filenames {
            config.filenames = filenames;
        }
        if let Some(failed_entries) = self.failed_entries {
            config.failed_entries = failed_entries;
        }
        if self.no_verify {
            config.verify_outputs = false;
        }
        if self.strict {
            config.strict = true;
        }
    }
}

fn print_json(value: &impl Serialize) -> ExitCode {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!(r#"{{"error": "Failed to serialize output: {}"}}"#, e);
            ExitCode::FAILURE
        }
    }
}

fn print_error(error: impl std::fmt::Display) -> ExitCode {
    let output = serde_json::json!({
        "success": false,
        "error": error.to_string(),
    });
    println!("{}", output);
    ExitCode::FAILURE
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .with_target(false)
        .init();

    let mut config = match &cli.config {
        Some(path) => match GeneratorConfig::load(path) {
            Ok(c) => c,
            Err(e) => return print_error(e),
        },
        None => GeneratorConfig::default(),
    };

    match cli.command {
        Commands::Catalog => print_json(&IOS_APP_ICON),

        Commands::Backends => print_json(&rasterizer::backend_statuses()),

        Commands::Manifest(args) => {
            let policy = args.filenames.unwrap_or(config.filenames);
            print_json(&preview_manifest(&IOS_APP_ICON, policy))
        }

        Commands::Generate(args) => {
            args.apply(&mut config);
            let strict = config.strict;

            let pipeline = match IconSetPipeline::from_config(config) {
                Ok(p) => p,
                Err(e) => return print_error(e),
            };

            match pipeline.generate() {
                Ok(report) => {
                    let passes = report.passes(strict);
                    let output = serde_json::json!({
                        "success": passes,
                        "report": report,
                    });
                    let code = print_json(&output);
                    if passes {
                        code
                    } else {
                        ExitCode::from(2)
                    }
                }
                Err(e) => print_error(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_accepts_filenames_only() {
        let cli = Cli::try_parse_from(["appiconset-cli", "manifest", "--filenames", "disambiguated"]).unwrap();
        match cli.command {
            Commands::Manifest(args) => assert_eq!(args.filenames, Some(FilenamePolicy::Disambiguated)),
            _ => panic!("expected manifest command"),
        }

        for flag in ["--backend", "--source", "--output-dir", "--failed-entries"] {
            let result = Cli::try_parse_from(["appiconset-cli", "manifest", flag, "x"]);
            assert!(result.is_err(), "{} should be rejected", flag);
        }
        for flag in ["--strict", "--no-verify"] {
            assert!(Cli::try_parse_from(["appiconset-cli", "manifest", flag]).is_err());
        }
    }

    #[test]
    fn test_generate_flags_override_config() {
        let cli = Cli::try_parse_from([
            "appiconset-cli", "generate", "--backend", "resvg", "--failed-entries", "omit", "--strict",
        ])
        .unwrap();
        let mut config = GeneratorConfig::default();
        match cli.command {
            Commands::Generate(args) => args.apply(&mut config),
            _ => panic!("expected generate command"),
        }
        assert_eq!(config.backend, BackendChoice::Resvg);
        assert_eq!(config.failed_entries, FailedEntryPolicy::Omit);
        assert!(config.strict);
        assert!(config.verify_outputs);
    }
}
