//! Error types for artifact loading and handle reclaim.

use std::path::PathBuf;

/// Reasons a loader can reject an optimized artifact.
///
/// The validator never surfaces these to its caller; every variant
/// collapses into an invalid verdict and a log line. The taxonomy exists so
/// that loader implementations can report precisely what they found and so
/// that the repair log is useful for offline analysis of optimizer output.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The artifact could not be read at all.
    #[error("I/O error reading {path}: {source}")]
    Io {
        /// The artifact file path.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The file is shorter than the fixed-size artifact header.
    #[error("truncated artifact {path}: {actual} bytes, header needs {expected}")]
    Truncated {
        /// The artifact file path.
        path: PathBuf,
        /// Minimum byte count required for the header.
        expected: usize,
        /// Actual byte count found.
        actual: usize,
    },

    /// The leading magic bytes do not identify an optimized artifact.
    #[error("bad magic in {path}")]
    BadMagic {
        /// The artifact file path.
        path: PathBuf,
    },

    /// The header carries a format version this loader does not accept.
    #[error("unsupported format version {found:?} in {path}")]
    UnsupportedVersion {
        /// The artifact file path.
        path: PathBuf,
        /// The version bytes found in the header.
        found: [u8; 4],
    },

    /// A section declared in the header extends past the end of the file.
    #[error("{section} section out of bounds in {path}: ends at {end}, file is {len} bytes")]
    SectionOutOfBounds {
        /// The artifact file path.
        path: PathBuf,
        /// Name of the offending section.
        section: &'static str,
        /// Byte offset at which the declared section ends.
        end: u64,
        /// Actual file length in bytes.
        len: u64,
    },

    /// The header declares no dex payload at all.
    #[error("artifact {path} declares an empty dex payload")]
    EmptyPayload {
        /// The artifact file path.
        path: PathBuf,
    },

    /// The embedded checksum does not match the artifact contents.
    #[error("checksum mismatch in {path}: expected {expected:#010x}, got {actual:#010x}")]
    ChecksumMismatch {
        /// The artifact file path.
        path: PathBuf,
        /// Checksum recorded in the header.
        expected: u32,
        /// Checksum computed from the contents.
        actual: u32,
    },
}

/// A failure while inspecting or closing an externally-owned handle.
///
/// Always swallowed and logged by the reclaimer; reclaim failures must not
/// block deletion of a rejected artifact.
#[derive(Debug, thiserror::Error)]
#[error("handle error: {message}")]
pub struct HandleError {
    /// Description of the failure.
    pub message: String,
}

impl HandleError {
    /// Creates a new handle error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
