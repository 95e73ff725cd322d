//! Derivation of optimized-artifact paths from source archive paths.

use std::path::{Path, PathBuf};

/// Suffix of optimized dex artifacts in the cache directory.
///
/// Matches the naming used for system-optimized dex files, so the same
/// derivation covers artifacts produced by either path.
pub const DEX_SUFFIX: &str = ".dex";

/// Maps a source archive path and a cache directory to the path of the
/// archive's optimized artifact.
///
/// Takes the file-name component of `archive`; unless it already ends in
/// [`DEX_SUFFIX`], the final extension is replaced with the suffix (or the
/// suffix is appended when there is no extension). The result is joined
/// onto `cache_dir`.
///
/// Pure and infallible: no I/O, and malformed names simply get the suffix
/// appended. Non-UTF-8 name components are converted lossily.
///
/// ```
/// use dexmend_cache::optimized_path_for;
/// use std::path::Path;
///
/// let p = optimized_path_for(Path::new("/data/app.apk.classes2.zip"), Path::new("/cache"));
/// assert_eq!(p, Path::new("/cache/app.apk.classes2.dex"));
/// ```
pub fn optimized_path_for(archive: &Path, cache_dir: &Path) -> PathBuf {
    let name = archive
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let optimized = if name.ends_with(DEX_SUFFIX) {
        name
    } else {
        match name.rfind('.') {
            Some(dot) => format!("{}{}", &name[..dot], DEX_SUFFIX),
            None => format!("{name}{DEX_SUFFIX}"),
        }
    };

    cache_dir.join(optimized)
}
