//! `dexmend sweep` — validate every archive in a cache directory.

use dexmend_cache::{CacheLog, CacheSweeper, CacheValidator, NullLog, OdexChecker, StderrLog};

use crate::config;
use crate::{GlobalArgs, ReportFormat, SweepArgs};

/// Runs the `dexmend sweep` command.
///
/// Resolves the cache directory and archive suffix from arguments and
/// configuration, sweeps the directory through the structural odex
/// checker, and renders the report. Returns exit code 0 when every
/// artifact was valid and 1 when anything needed repair.
pub fn run(args: &SweepArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let cfg = config::load(global.config.as_deref())?;

    let dir = args
        .dir
        .clone()
        .or_else(|| cfg.cache.dir.clone())
        .ok_or("no cache directory given; pass one or set cache.dir in dexmend.toml")?;
    let suffix = args
        .archive_suffix
        .clone()
        .or(cfg.cache.archive_suffix)
        .unwrap_or_else(|| dexmend_cache::ARCHIVE_SUFFIX.to_string());

    let log: Box<dyn CacheLog> = if global.quiet {
        Box::new(NullLog)
    } else {
        Box::new(StderrLog)
    };
    let checker = OdexChecker;
    let validator = CacheValidator::new(&checker, log.as_ref());
    let report = CacheSweeper::new(&validator)
        .with_archive_suffix(suffix)
        .sweep(&dir);

    match args.format {
        ReportFormat::Text => {
            if !global.quiet {
                for outcome in &report.outcomes {
                    let verdict = if outcome.valid { "ok" } else { "repaired" };
                    println!("{verdict:>8}  {}", outcome.archive.display());
                }
                eprintln!(
                    "{} valid, {} repaired",
                    report.valid_count(),
                    report.invalid_count()
                );
            }
        }
        ReportFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(if report.invalid_count() == 0 { 0 } else { 1 })
}
