//! dexmend CLI — validate and repair optimized-dex cache directories.
//!
//! Provides `dexmend sweep` for running the validate/repair cycle over
//! every archive in a cache directory, and `dexmend check` for validating
//! a single archive's optimized artifact.

#![warn(missing_docs)]

mod check;
mod config;
mod sweep;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};

/// dexmend — optimized-dex cache validation and repair.
#[derive(Parser, Debug)]
#[command(name = "dexmend", version, about = "Optimized-dex cache repair")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to a custom `dexmend.toml` configuration file.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate every archive's optimized artifact in a cache directory.
    Sweep(SweepArgs),
    /// Validate a single archive's optimized artifact.
    Check(CheckArgs),
}

/// Arguments for the `dexmend sweep` subcommand.
#[derive(Parser, Debug)]
pub struct SweepArgs {
    /// Cache directory to sweep. Falls back to `cache.dir` from
    /// `dexmend.toml` when omitted.
    pub dir: Option<PathBuf>,

    /// Extension of candidate archive files (without the leading dot).
    #[arg(long)]
    pub archive_suffix: Option<String>,

    /// Output format for the sweep report.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Arguments for the `dexmend check` subcommand.
#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Source archive whose optimized artifact should be validated.
    pub archive: PathBuf,

    /// Cache directory holding the optimized artifact.
    #[arg(short, long)]
    pub cache_dir: PathBuf,

    /// Probe only; leave a rejected artifact in place.
    #[arg(long)]
    pub dry_run: bool,
}

/// Sweep report output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable terminal output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Optional path to a custom config file.
    pub config: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    let global = GlobalArgs {
        quiet: cli.quiet,
        config: cli.config,
    };

    let result = match cli.command {
        Command::Sweep(ref args) => sweep::run(args, &global),
        Command::Check(ref args) => check::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn parse_sweep_default() {
        let cli = Cli::parse_from(["dexmend", "sweep"]);
        match cli.command {
            Command::Sweep(ref args) => {
                assert!(args.dir.is_none());
                assert!(args.archive_suffix.is_none());
                assert_eq!(args.format, ReportFormat::Text);
            }
            _ => panic!("expected Sweep command"),
        }
    }

    #[test]
    fn parse_sweep_with_args() {
        let cli = Cli::parse_from([
            "dexmend",
            "sweep",
            "/data/code_cache/secondary-dexes",
            "--archive-suffix",
            "jar",
            "--format",
            "json",
        ]);
        match cli.command {
            Command::Sweep(ref args) => {
                assert_eq!(
                    args.dir.as_deref(),
                    Some(std::path::Path::new("/data/code_cache/secondary-dexes"))
                );
                assert_eq!(args.archive_suffix.as_deref(), Some("jar"));
                assert_eq!(args.format, ReportFormat::Json);
            }
            _ => panic!("expected Sweep command"),
        }
    }

    #[test]
    fn parse_check() {
        let cli = Cli::parse_from([
            "dexmend",
            "check",
            "/data/app.apk.classes2.zip",
            "--cache-dir",
            "/cache",
        ]);
        match cli.command {
            Command::Check(ref args) => {
                assert_eq!(
                    args.archive.as_path(),
                    std::path::Path::new("/data/app.apk.classes2.zip")
                );
                assert_eq!(args.cache_dir.as_path(), std::path::Path::new("/cache"));
                assert!(!args.dry_run);
            }
            _ => panic!("expected Check command"),
        }
    }

    #[test]
    fn parse_check_dry_run() {
        let cli = Cli::parse_from([
            "dexmend",
            "check",
            "app.zip",
            "--cache-dir",
            "/cache",
            "--dry-run",
        ]);
        match cli.command {
            Command::Check(ref args) => assert!(args.dry_run),
            _ => panic!("expected Check command"),
        }
    }

    #[test]
    fn parse_global_flags() {
        let cli = Cli::parse_from(["dexmend", "--quiet", "--config", "custom.toml", "sweep"]);
        assert!(cli.quiet);
        assert_eq!(cli.config.as_deref(), Some("custom.toml"));
    }
}
