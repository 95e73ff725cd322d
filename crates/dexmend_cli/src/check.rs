//! `dexmend check` — validate a single archive's optimized artifact.

use dexmend_cache::{CacheLog, CacheValidator, NullLog, OdexChecker, StderrLog};

use crate::{CheckArgs, GlobalArgs};

/// Runs the `dexmend check` command.
///
/// Validates the archive's optimized artifact through the structural odex
/// checker. By default a rejected artifact is repaired (deleted); with
/// `--dry-run` the artifact is only probed and left in place. Returns exit
/// code 0 when the artifact is valid and 1 otherwise.
pub fn run(args: &CheckArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let log: Box<dyn CacheLog> = if global.quiet {
        Box::new(NullLog)
    } else {
        Box::new(StderrLog)
    };
    let checker = OdexChecker;
    let validator = CacheValidator::new(&checker, log.as_ref());

    let valid = if args.dry_run {
        validator.probe(&args.archive, &args.cache_dir)
    } else {
        validator.validate(&args.archive, &args.cache_dir, None)
    };

    if !global.quiet {
        println!("{}", if valid { "valid" } else { "invalid" });
    }

    Ok(if valid { 0 } else { 1 })
}
