//! Diagnostic fingerprinting of rejected artifacts.
//!
//! When the loader rejects an optimized artifact, the first header bytes
//! and a digest of the remaining content are captured for the repair log,
//! giving offline analysis something stable to correlate optimizer
//! failures against. Both probes are read-only and strictly advisory: a
//! file that cannot be read yields an [`SignatureField::Unavailable`]
//! value instead of an error, so diagnostics can never block deletion.

use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use sha2::{Digest, Sha256};

/// Size in bytes of the optimized-artifact header region.
///
/// The header occupies the first 40 bytes: magic and version (8), then
/// eight little-endian u32 fields. [`content_digest`] skips exactly this
/// region so the digest covers only the artifact body.
pub const HEADER_LEN: usize = 40;

/// A diagnostic value that was either captured or explains why it wasn't.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignatureField {
    /// The captured hex string.
    Value(String),
    /// The probe failed; carries a short description of the failure.
    Unavailable(String),
}

impl fmt::Display for SignatureField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignatureField::Value(s) => f.write_str(s),
            SignatureField::Unavailable(reason) => write!(f, "unavailable: {reason}"),
        }
    }
}

/// Fingerprint of a rejected artifact, captured before it is deleted.
#[derive(Debug, Clone)]
pub struct DiagnosticSignature {
    /// Lowercase hex rendering of the header region (shorter if the file is).
    pub header_hex: SignatureField,
    /// Uppercase hex SHA-256 digest of everything past the header region.
    pub content_digest: SignatureField,
}

impl DiagnosticSignature {
    /// Runs both probes against the artifact at `path`.
    pub fn capture(path: &Path) -> Self {
        Self {
            header_hex: read_header_hex(path),
            content_digest: content_digest(path),
        }
    }
}

impl fmt::Display for DiagnosticSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "header {}, body sha256 {}",
            self.header_hex, self.content_digest
        )
    }
}

/// Reads up to the first [`HEADER_LEN`] bytes of the file and renders each
/// byte as two lowercase hex digits.
///
/// A file shorter than the header region yields the prefix that was read;
/// an open or read failure yields [`SignatureField::Unavailable`].
pub fn read_header_hex(path: &Path) -> SignatureField {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) => return SignatureField::Unavailable(format!("open failed: {e}")),
    };

    let mut header = Vec::with_capacity(HEADER_LEN);
    match file.take(HEADER_LEN as u64).read_to_end(&mut header) {
        Ok(_) => SignatureField::Value(hex::encode(&header)),
        Err(e) => SignatureField::Unavailable(format!("read failed: {e}")),
    }
}

/// Computes the SHA-256 digest of the artifact body, rendered as uppercase
/// hex.
///
/// The [`HEADER_LEN`]-byte header region is excluded from the digest
/// input; a file no longer than the header digests as empty. Read failures
/// yield [`SignatureField::Unavailable`].
pub fn content_digest(path: &Path) -> SignatureField {
    let raw = match std::fs::read(path) {
        Ok(raw) => raw,
        Err(e) => return SignatureField::Unavailable(format!("read failed: {e}")),
    };

    let body = raw.get(HEADER_LEN..).unwrap_or(&[]);
    SignatureField::Value(hex::encode_upper(Sha256::digest(body)))
}
