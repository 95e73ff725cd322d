//! Directory-level validate/repair sweep.
//!
//! Enumerates the source archives kept in a cache directory and runs the
//! full validate/repair cycle on each one's optimized artifact. Sweeps are
//! not tied to any loader-internal structure, so no handle reclaim runs;
//! every rejected artifact is still diagnosed and deleted.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::validate::CacheValidator;

/// Default extension of the secondary code archives kept in the cache
/// directory next to their optimized artifacts.
pub const ARCHIVE_SUFFIX: &str = "zip";

/// Verdict for one archive visited during a sweep.
#[derive(Debug, Clone, Serialize)]
pub struct SweepOutcome {
    /// The source archive whose optimized artifact was validated.
    pub archive: PathBuf,
    /// Whether the optimized artifact loaded and was left in place.
    pub valid: bool,
}

/// Accumulated per-archive outcomes of one sweep.
///
/// One entry per candidate archive, in sorted path order. Individual
/// validation or deletion failures land here as invalid entries rather
/// than aborting the sweep.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SweepReport {
    /// One outcome per candidate archive.
    pub outcomes: Vec<SweepOutcome>,
}

impl SweepReport {
    /// Number of archives whose optimized artifacts were valid.
    pub fn valid_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.valid).count()
    }

    /// Number of archives whose optimized artifacts were rejected and
    /// repaired.
    pub fn invalid_count(&self) -> usize {
        self.outcomes.len() - self.valid_count()
    }

    /// Returns `true` when no candidate archives were found.
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}

/// Sweeps a cache directory, validating every archive's optimized
/// artifact.
///
/// Candidate archives are selected by file extension, not by a fixed file
/// name, so a directory of `app.apk.classes2.zip`-style archives is swept
/// in full. The extension is configurable for caches that store archives
/// under a different suffix.
pub struct CacheSweeper<'a> {
    validator: &'a CacheValidator<'a>,
    archive_suffix: String,
}

impl<'a> CacheSweeper<'a> {
    /// Creates a sweeper selecting candidates by the default
    /// [`ARCHIVE_SUFFIX`].
    pub fn new(validator: &'a CacheValidator<'a>) -> Self {
        Self {
            validator,
            archive_suffix: ARCHIVE_SUFFIX.to_string(),
        }
    }

    /// Overrides the extension used to select candidate archives.
    ///
    /// Given without the leading dot, e.g. `"jar"`.
    pub fn with_archive_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.archive_suffix = suffix.into();
        self
    }

    /// Validates every candidate archive in `cache_dir`.
    ///
    /// A missing directory yields an empty report without touching the
    /// filesystem. Candidates are visited in sorted order and every entry
    /// is processed even when earlier ones fail; each repair is logged by
    /// the validator as it happens.
    pub fn sweep(&self, cache_dir: &Path) -> SweepReport {
        let mut report = SweepReport::default();
        if !cache_dir.is_dir() {
            return report;
        }

        let entries = match std::fs::read_dir(cache_dir) {
            Ok(entries) => entries,
            Err(e) => {
                self.validator.log().log(
                    &format!("could not enumerate cache directory {}", cache_dir.display()),
                    Some(&e),
                );
                return report;
            }
        };

        let mut candidates: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file()
                    && path.extension().and_then(|e| e.to_str())
                        == Some(self.archive_suffix.as_str())
            })
            .collect();
        candidates.sort();

        for archive in candidates {
            let valid = self.validator.validate(&archive, cache_dir, None);
            report.outcomes.push(SweepOutcome { archive, valid });
        }

        report
    }
}
