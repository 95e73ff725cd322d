//! The seam between cache validation and the platform's artifact loader.

use std::path::Path;

use crate::error::LoadError;

/// Attempts to open an optimized artifact the way the runtime will.
///
/// The cache validator treats the loader's own validation (magic bytes,
/// embedded lengths, checksums) as the source of truth for artifact
/// validity, and only adds the repair action on rejection. Duplicating
/// that validation here would drift from the platform's format as it
/// evolves.
///
/// Implementations report rejection through [`LoadError`] and must not
/// modify or delete either file. The validator depends only on the
/// success/failure signal, never on what was loaded.
pub trait ArtifactLoader {
    /// Opens `optimized` as the precompiled artifact for `archive`.
    ///
    /// `archive` is the canonical path of the source archive the artifact
    /// was derived from; `optimized` is the cached artifact under test.
    fn load(&self, archive: &Path, optimized: &Path) -> Result<(), LoadError>;
}
