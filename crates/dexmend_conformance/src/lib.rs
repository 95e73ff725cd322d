//! Conformance test helpers for the dexmend repair cycle.
//!
//! Provides shared fixture builders (well-formed and damaged odex images,
//! seeded cache directories) and pipeline functions that run the full
//! probe → reclaim → diagnose → delete cycle through the structural odex
//! checker, returning structured results for assertion in integration
//! tests.

#![warn(missing_docs)]

use std::path::Path;

use dexmend_cache::{
    CacheSweeper, CacheValidator, HandleSource, MemoryLog, OdexChecker, SweepReport, HEADER_LEN,
};

/// Result of running a repair pipeline over a cache directory.
pub struct SweepRun {
    /// The accumulated per-archive report.
    pub report: SweepReport,
    /// Every log line the repair cycle emitted, in order.
    pub log_lines: Vec<String>,
}

/// Result of validating a single archive's optimized artifact.
pub struct ValidateRun {
    /// Whether the artifact was accepted and left in place.
    pub valid: bool,
    /// Every log line the repair cycle emitted, in order.
    pub log_lines: Vec<String>,
}

/// Builds a well-formed odex image carrying `body` as its dex payload.
///
/// The header declares the payload directly after itself and empty
/// dependency and optimized-data tables, so the structural checker accepts
/// the image as long as the payload is present and non-empty.
pub fn valid_odex_image(body: &[u8]) -> Vec<u8> {
    let total = (HEADER_LEN + body.len()) as u32;
    let mut raw = Vec::with_capacity(total as usize);
    raw.extend_from_slice(b"dey\n036\0");
    raw.extend_from_slice(&(HEADER_LEN as u32).to_le_bytes()); // dex_offset
    raw.extend_from_slice(&(body.len() as u32).to_le_bytes()); // dex_length
    raw.extend_from_slice(&total.to_le_bytes()); // deps_offset
    raw.extend_from_slice(&0u32.to_le_bytes()); // deps_length
    raw.extend_from_slice(&total.to_le_bytes()); // opt_offset
    raw.extend_from_slice(&0u32.to_le_bytes()); // opt_length
    raw.extend_from_slice(&0u32.to_le_bytes()); // flags
    raw.extend_from_slice(&0u32.to_le_bytes()); // checksum
    raw.extend_from_slice(body);
    raw
}

/// Builds the header-only truncation the optimizer occasionally emits: a
/// header declaring a payload that was never written.
pub fn truncated_odex_image() -> Vec<u8> {
    let image = valid_odex_image(b"payload that goes missing");
    image[..HEADER_LEN].to_vec()
}

/// Writes a source archive and its optimized artifact into `dir`.
///
/// The archive is named `{stem}.zip` and the artifact `{stem}.dex`,
/// matching the cache layout the sweeper expects.
pub fn seed_cache_entry(dir: &Path, stem: &str, artifact: &[u8]) {
    std::fs::write(dir.join(format!("{stem}.zip")), b"archive contents")
        .expect("seed archive write");
    std::fs::write(dir.join(format!("{stem}.dex")), artifact).expect("seed artifact write");
}

/// Sweeps `cache_dir` through the structural odex checker with the default
/// archive suffix.
pub fn run_sweep(cache_dir: &Path) -> SweepRun {
    run_sweep_with_suffix(cache_dir, dexmend_cache::ARCHIVE_SUFFIX)
}

/// Sweeps `cache_dir` through the structural odex checker, selecting
/// candidate archives by `suffix`.
pub fn run_sweep_with_suffix(cache_dir: &Path, suffix: &str) -> SweepRun {
    let checker = OdexChecker;
    let log = MemoryLog::new();
    let validator = CacheValidator::new(&checker, &log);
    let report = CacheSweeper::new(&validator)
        .with_archive_suffix(suffix)
        .sweep(cache_dir);
    SweepRun {
        report,
        log_lines: log.messages(),
    }
}

/// Validates one archive's optimized artifact through the structural odex
/// checker, without a handle holder.
pub fn run_validate(archive: &Path, cache_dir: &Path) -> ValidateRun {
    run_validate_with_holder(archive, cache_dir, None)
}

/// Validates one archive's optimized artifact through the structural odex
/// checker, reclaiming through `holder` when one is given.
pub fn run_validate_with_holder(
    archive: &Path,
    cache_dir: &Path,
    holder: Option<&dyn HandleSource>,
) -> ValidateRun {
    let checker = OdexChecker;
    let log = MemoryLog::new();
    let validator = CacheValidator::new(&checker, &log);
    let valid = validator.validate(archive, cache_dir, holder);
    ValidateRun {
        valid,
        log_lines: log.messages(),
    }
}
