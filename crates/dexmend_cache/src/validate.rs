//! Per-artifact validate/repair cycle.
//!
//! [`CacheValidator`] ties the path derivation, load probe, handle
//! reclaim, and diagnostic capture together for a single archive. The
//! cycle on a rejected artifact is strictly ordered: any pinning handle is
//! closed first, the diagnostic signature is read while the file still
//! exists, and only then is the file deleted.

use std::path::Path;

use crate::handle::{close_if_matches, HandleSource};
use crate::loader::ArtifactLoader;
use crate::log::CacheLog;
use crate::path::optimized_path_for;
use crate::signature::DiagnosticSignature;

/// Validates optimized artifacts and repairs the cache on rejection.
///
/// Holds the loader used for probing and the log sink for repair
/// outcomes, both injected at construction. Every operation is fail-safe:
/// probe, reclaim, diagnostic, and delete failures are absorbed into the
/// boolean verdict, so a caller only ever observes valid or invalid.
pub struct CacheValidator<'a> {
    loader: &'a dyn ArtifactLoader,
    log: &'a dyn CacheLog,
}

impl<'a> CacheValidator<'a> {
    /// Creates a validator probing through `loader` and logging to `log`.
    pub fn new(loader: &'a dyn ArtifactLoader, log: &'a dyn CacheLog) -> Self {
        Self { loader, log }
    }

    pub(crate) fn log(&self) -> &dyn CacheLog {
        self.log
    }

    /// Probes whether the archive's optimized artifact loads.
    ///
    /// A missing artifact is invalid without a load attempt: that is the
    /// expected state right after eviction or before the first
    /// optimization pass, not a corruption signal, so no diagnostic is
    /// produced for it. Otherwise the verdict is the loader's, called with
    /// the archive's canonical path (falling back to the path as given
    /// when it cannot be resolved).
    pub fn probe(&self, archive: &Path, cache_dir: &Path) -> bool {
        let optimized = optimized_path_for(archive, cache_dir);
        if !optimized.exists() {
            return false;
        }

        let canonical = archive
            .canonicalize()
            .unwrap_or_else(|_| archive.to_path_buf());

        match self.loader.load(&canonical, &optimized) {
            Ok(()) => {
                self.log.log(
                    &format!("optimized artifact {} loads", optimized.display()),
                    None,
                );
                true
            }
            Err(e) => {
                self.log.log(
                    &format!("optimized artifact {} rejected", optimized.display()),
                    Some(&e),
                );
                false
            }
        }
    }

    /// Runs the full validate → reclaim → diagnose → delete cycle.
    ///
    /// Returns `true` and touches nothing when the loader accepts the
    /// artifact. Otherwise: any handle in `holder` pinning the derived
    /// path is closed, the diagnostic signature is captured while the file
    /// still exists, the file is deleted best-effort, one log line carries
    /// the signature and the delete outcome, and `false` is returned. A
    /// rejected artifact that is already absent is repaired silently (no
    /// signature to capture, nothing to delete).
    pub fn validate(
        &self,
        archive: &Path,
        cache_dir: &Path,
        holder: Option<&dyn HandleSource>,
    ) -> bool {
        if self.probe(archive, cache_dir) {
            return true;
        }

        let optimized = optimized_path_for(archive, cache_dir);

        // A stale handle can outlive its file; reclaim runs on every
        // invalid verdict.
        if let Some(holder) = holder {
            close_if_matches(holder, &optimized, self.log);
        }

        if optimized.exists() {
            let signature = DiagnosticSignature::capture(&optimized);
            match std::fs::remove_file(&optimized) {
                Ok(()) => self.log.log(
                    &format!(
                        "deleted rejected artifact {} ({signature})",
                        optimized.display()
                    ),
                    None,
                ),
                Err(e) => self.log.log(
                    &format!(
                        "could not delete rejected artifact {} ({signature})",
                        optimized.display()
                    ),
                    Some(&e),
                ),
            }
        }

        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{HandleError, LoadError};
    use crate::handle::ArtifactHandle;
    use crate::log::MemoryLog;
    use crate::signature::HEADER_LEN;
    use std::cell::Cell;
    use std::path::PathBuf;

    /// Loader that accepts everything.
    struct AcceptAll;

    impl ArtifactLoader for AcceptAll {
        fn load(&self, _archive: &Path, _optimized: &Path) -> Result<(), LoadError> {
            Ok(())
        }
    }

    /// Loader that rejects everything as truncated.
    struct RejectAll;

    impl ArtifactLoader for RejectAll {
        fn load(&self, _archive: &Path, optimized: &Path) -> Result<(), LoadError> {
            Err(LoadError::Truncated {
                path: optimized.to_path_buf(),
                expected: HEADER_LEN,
                actual: 0,
            })
        }
    }

    fn cache_with_artifact(bytes: &[u8]) -> (tempfile::TempDir, PathBuf, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("app.zip");
        std::fs::write(&archive, b"archive contents").unwrap();
        let optimized = dir.path().join("app.dex");
        std::fs::write(&optimized, bytes).unwrap();
        (dir, archive, optimized)
    }

    #[test]
    fn missing_artifact_is_invalid_without_load_attempt() {
        struct Unreachable;
        impl ArtifactLoader for Unreachable {
            fn load(&self, _archive: &Path, _optimized: &Path) -> Result<(), LoadError> {
                panic!("loader must not run for a missing artifact");
            }
        }

        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("app.zip");
        std::fs::write(&archive, b"archive contents").unwrap();

        let log = MemoryLog::new();
        let validator = CacheValidator::new(&Unreachable, &log);
        assert!(!validator.probe(&archive, dir.path()));
    }

    #[test]
    fn missing_artifact_produces_no_diagnostic_log() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("app.zip");
        std::fs::write(&archive, b"archive contents").unwrap();

        let log = MemoryLog::new();
        let validator = CacheValidator::new(&RejectAll, &log);
        assert!(!validator.validate(&archive, dir.path(), None));
        assert!(log
            .messages()
            .iter()
            .all(|m| !m.contains("header") && !m.contains("sha256")));
    }

    #[test]
    fn accepted_artifact_is_left_untouched() {
        let original = b"dey\n036\0 pretend artifact bytes".to_vec();
        let (dir, archive, optimized) = cache_with_artifact(&original);

        let log = MemoryLog::new();
        let validator = CacheValidator::new(&AcceptAll, &log);
        assert!(validator.validate(&archive, dir.path(), None));
        assert_eq!(std::fs::read(&optimized).unwrap(), original);
    }

    #[test]
    fn rejected_artifact_is_deleted_with_diagnostic() {
        let mut bytes = vec![0x2Au8; HEADER_LEN];
        bytes.extend_from_slice(b"body");
        let (dir, archive, optimized) = cache_with_artifact(&bytes);

        let log = MemoryLog::new();
        let validator = CacheValidator::new(&RejectAll, &log);
        assert!(!validator.validate(&archive, dir.path(), None));
        assert!(!optimized.exists());

        let messages = log.messages();
        let repair = messages
            .iter()
            .find(|m| m.contains("deleted rejected artifact"))
            .expect("repair line missing");
        // 40 header bytes render as 80 hex characters.
        assert!(repair.contains(&"2a".repeat(HEADER_LEN)));
        assert!(repair.contains("body sha256 "));
    }

    #[test]
    fn rejection_closes_matching_handle_before_delete() {
        struct PinnedHandle {
            path: PathBuf,
            closed: Cell<bool>,
            file_present_at_close: Cell<bool>,
        }

        impl ArtifactHandle for PinnedHandle {
            fn source_path(&self) -> &Path {
                &self.path
            }

            fn close(&self) -> Result<(), HandleError> {
                self.closed.set(true);
                self.file_present_at_close.set(self.path.exists());
                Ok(())
            }
        }

        struct Holder {
            handle: PinnedHandle,
        }

        impl HandleSource for Holder {
            fn artifact_handle(&self) -> Result<Option<&dyn ArtifactHandle>, HandleError> {
                Ok(Some(&self.handle))
            }
        }

        let (dir, archive, optimized) = cache_with_artifact(b"bad bytes");
        let holder = Holder {
            handle: PinnedHandle {
                path: optimized.clone(),
                closed: Cell::new(false),
                file_present_at_close: Cell::new(false),
            },
        };

        let log = MemoryLog::new();
        let validator = CacheValidator::new(&RejectAll, &log);
        assert!(!validator.validate(&archive, dir.path(), Some(&holder)));

        assert!(holder.handle.closed.get());
        // Reclaim ran before the delete: the file was still on disk.
        assert!(holder.handle.file_present_at_close.get());
        assert!(!optimized.exists());
    }

    #[test]
    fn rejection_leaves_unrelated_handle_open() {
        struct OtherHandle {
            path: PathBuf,
            closed: Cell<bool>,
        }

        impl ArtifactHandle for OtherHandle {
            fn source_path(&self) -> &Path {
                &self.path
            }

            fn close(&self) -> Result<(), HandleError> {
                self.closed.set(true);
                Ok(())
            }
        }

        struct Holder {
            handle: OtherHandle,
        }

        impl HandleSource for Holder {
            fn artifact_handle(&self) -> Result<Option<&dyn ArtifactHandle>, HandleError> {
                Ok(Some(&self.handle))
            }
        }

        let (dir, archive, optimized) = cache_with_artifact(b"bad bytes");
        let holder = Holder {
            handle: OtherHandle {
                path: PathBuf::from("/cache/unrelated.dex"),
                closed: Cell::new(false),
            },
        };

        let log = MemoryLog::new();
        let validator = CacheValidator::new(&RejectAll, &log);
        assert!(!validator.validate(&archive, dir.path(), Some(&holder)));

        assert!(!holder.handle.closed.get());
        assert!(!optimized.exists());
    }

    #[test]
    fn unreadable_holder_does_not_block_repair() {
        struct Opaque;
        impl HandleSource for Opaque {
            fn artifact_handle(&self) -> Result<Option<&dyn ArtifactHandle>, HandleError> {
                Err(HandleError::new("introspection denied"))
            }
        }

        let (dir, archive, optimized) = cache_with_artifact(b"bad bytes");
        let log = MemoryLog::new();
        let validator = CacheValidator::new(&RejectAll, &log);
        assert!(!validator.validate(&archive, dir.path(), Some(&Opaque)));
        assert!(!optimized.exists());
        assert!(log
            .messages()
            .iter()
            .any(|m| m.contains("introspection denied")));
    }

    #[test]
    fn probe_reports_loader_acceptance() {
        let (dir, archive, _optimized) = cache_with_artifact(b"good bytes");
        let log = MemoryLog::new();
        let validator = CacheValidator::new(&AcceptAll, &log);
        assert!(validator.probe(&archive, dir.path()));
        assert!(log.messages().iter().any(|m| m.contains("loads")));
    }

    #[test]
    fn rejection_log_names_the_loader_error() {
        let (dir, archive, _optimized) = cache_with_artifact(b"bad bytes");
        let log = MemoryLog::new();
        let validator = CacheValidator::new(&RejectAll, &log);
        assert!(!validator.probe(&archive, dir.path()));
        assert!(log
            .messages()
            .iter()
            .any(|m| m.contains("rejected") && m.contains("truncated")));
    }
}
