//! Validation and repair of an optimized-dex cache directory.
//!
//! Class loaders that split an application across secondary code archives
//! keep a precompiled ("optimized") dex artifact next to each archive. The
//! on-device optimizer occasionally writes a truncated or otherwise corrupt
//! artifact that the platform loader refuses to open on the next startup,
//! and the platform itself never cleans it up. This crate adds the missing
//! repair action: probe each artifact through a loader, and on rejection
//! close any open handle pinning the file, capture a diagnostic
//! fingerprint, and delete the artifact so the next optimization pass can
//! regenerate it.
//!
//! Repair is fail-safe throughout: probe, diagnostic, handle, and delete
//! failures are absorbed into the boolean verdict and logged, so a damaged
//! cache can never prevent its own repair.

#![warn(missing_docs)]

pub mod error;
pub mod handle;
pub mod loader;
pub mod log;
pub mod odex;
pub mod path;
pub mod signature;
pub mod sweep;
pub mod validate;

pub use error::{HandleError, LoadError};
pub use handle::{close_if_matches, ArtifactHandle, HandleSource};
pub use loader::ArtifactLoader;
pub use log::{CacheLog, MemoryLog, NullLog, StderrLog};
pub use odex::{OdexChecker, OdexHeader};
pub use path::{optimized_path_for, DEX_SUFFIX};
pub use signature::{
    content_digest, read_header_hex, DiagnosticSignature, SignatureField, HEADER_LEN,
};
pub use sweep::{CacheSweeper, SweepOutcome, SweepReport, ARCHIVE_SUFFIX};
pub use validate::CacheValidator;
