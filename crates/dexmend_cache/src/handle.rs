//! Release of open artifact handles prior to deletion.
//!
//! On some platforms an open handle pins the underlying file: deleting a
//! pinned artifact can fail outright, or leave an open reader observing a
//! file that no longer exists on disk. The loading subsystem that owns
//! such handles exposes them through [`HandleSource`]; the reclaimer
//! closes a handle only when it refers to the exact path about to be
//! deleted, so an unrelated live artifact is never closed by mistake.

use std::path::Path;

use crate::error::HandleError;
use crate::log::CacheLog;

/// An open reference to a loaded optimized artifact.
pub trait ArtifactHandle {
    /// The absolute path the handle was opened against.
    fn source_path(&self) -> &Path;

    /// Closes the handle, releasing its pin on the underlying file.
    fn close(&self) -> Result<(), HandleError>;
}

/// An externally-owned structure that may hold an open artifact handle.
///
/// Implemented by the embedding loading subsystem for whatever structure
/// carries its opened artifacts. The cache core never creates or owns a
/// holder; it only inspects one it is handed.
pub trait HandleSource {
    /// Returns the held handle, `None` when the holder carries none, or an
    /// error when the holder cannot be inspected.
    fn artifact_handle(&self) -> Result<Option<&dyn ArtifactHandle>, HandleError>;
}

/// Closes the holder's handle if it refers to exactly `target`.
///
/// Never raises: a holder that cannot be inspected and a handle that
/// cannot be closed are both logged and skipped, since neither may block
/// deletion of a rejected artifact. A handle recorded under any other path
/// is left open.
pub fn close_if_matches(holder: &dyn HandleSource, target: &Path, log: &dyn CacheLog) {
    let handle = match holder.artifact_handle() {
        Ok(Some(handle)) => handle,
        Ok(None) => return,
        Err(e) => {
            log.log("could not read artifact handle from holder", Some(&e));
            return;
        }
    };

    if handle.source_path() != target {
        return;
    }

    if let Err(e) = handle.close() {
        log.log(
            &format!("failed to close handle for {}", target.display()),
            Some(&e),
        );
    }
}
