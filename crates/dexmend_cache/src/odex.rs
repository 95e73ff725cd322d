//! Structural validation of optimized dex ("odex") artifacts.
//!
//! Parses the fixed 40-byte odex header and checks that every section it
//! declares lies inside the file. This catches the failure mode the cache
//! repair exists for: the optimizer occasionally writes an artifact that is
//! all header and little or no body, which the runtime loader then refuses
//! to open at every subsequent startup.

use std::path::Path;

use crate::error::LoadError;
use crate::loader::ArtifactLoader;
use crate::signature::HEADER_LEN;

/// First four bytes of every optimized dex file.
const ODEX_MAGIC: [u8; 4] = *b"dey\n";

/// Header format versions this checker accepts.
const SUPPORTED_VERSIONS: [[u8; 4]; 2] = [*b"035\0", *b"036\0"];

/// The fixed 40-byte header of an optimized dex artifact.
///
/// Layout after the 8 magic/version bytes: eight little-endian u32 fields
/// describing where the embedded dex payload, dependency table, and
/// optimized data tables live within the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OdexHeader {
    /// Header format version bytes.
    pub version: [u8; 4],
    /// Offset of the embedded dex payload.
    pub dex_offset: u32,
    /// Length of the embedded dex payload.
    pub dex_length: u32,
    /// Offset of the dependency table.
    pub deps_offset: u32,
    /// Length of the dependency table.
    pub deps_length: u32,
    /// Offset of the optimized data tables.
    pub opt_offset: u32,
    /// Length of the optimized data tables.
    pub opt_length: u32,
    /// Optimization flags.
    pub flags: u32,
    /// Adler-32 checksum over the dependency and optimized tables.
    /// Carried for callers; not recomputed by [`OdexChecker`].
    pub checksum: u32,
}

impl OdexHeader {
    /// Parses the header from the leading bytes of an artifact.
    ///
    /// Validates length, magic, and version. Section bounds are checked
    /// separately against the file length by [`OdexChecker`].
    pub fn parse(path: &Path, raw: &[u8]) -> Result<Self, LoadError> {
        if raw.len() < HEADER_LEN {
            return Err(LoadError::Truncated {
                path: path.to_path_buf(),
                expected: HEADER_LEN,
                actual: raw.len(),
            });
        }
        if raw[..4] != ODEX_MAGIC {
            return Err(LoadError::BadMagic {
                path: path.to_path_buf(),
            });
        }

        let mut version = [0u8; 4];
        version.copy_from_slice(&raw[4..8]);
        if !SUPPORTED_VERSIONS.contains(&version) {
            return Err(LoadError::UnsupportedVersion {
                path: path.to_path_buf(),
                found: version,
            });
        }

        Ok(Self {
            version,
            dex_offset: u32_at(raw, 8),
            dex_length: u32_at(raw, 12),
            deps_offset: u32_at(raw, 16),
            deps_length: u32_at(raw, 20),
            opt_offset: u32_at(raw, 24),
            opt_length: u32_at(raw, 28),
            flags: u32_at(raw, 32),
            checksum: u32_at(raw, 36),
        })
    }
}

/// Reads a little-endian u32 at `offset`. Callers must have checked bounds.
fn u32_at(raw: &[u8], offset: usize) -> u32 {
    let mut bytes = [0u8; 4];
    bytes.copy_from_slice(&raw[offset..offset + 4]);
    u32::from_le_bytes(bytes)
}

/// Structural [`ArtifactLoader`] backed by header parsing alone.
///
/// Accepts an artifact when its magic and version are recognized, its dex
/// payload is non-empty, and every declared section fits inside the file.
/// The embedded checksum is not recomputed; checksum enforcement stays
/// with the runtime loader.
pub struct OdexChecker;

impl ArtifactLoader for OdexChecker {
    fn load(&self, _archive: &Path, optimized: &Path) -> Result<(), LoadError> {
        let raw = std::fs::read(optimized).map_err(|e| LoadError::Io {
            path: optimized.to_path_buf(),
            source: e,
        })?;
        let header = OdexHeader::parse(optimized, &raw)?;

        if header.dex_length == 0 {
            return Err(LoadError::EmptyPayload {
                path: optimized.to_path_buf(),
            });
        }

        let len = raw.len() as u64;
        check_section(optimized, "dex", header.dex_offset, header.dex_length, len)?;
        check_section(
            optimized,
            "deps",
            header.deps_offset,
            header.deps_length,
            len,
        )?;
        check_section(optimized, "opt", header.opt_offset, header.opt_length, len)?;
        Ok(())
    }
}

fn check_section(
    path: &Path,
    section: &'static str,
    offset: u32,
    length: u32,
    file_len: u64,
) -> Result<(), LoadError> {
    let end = u64::from(offset) + u64::from(length);
    if end > file_len {
        return Err(LoadError::SectionOutOfBounds {
            path: path.to_path_buf(),
            section,
            end,
            len: file_len,
        });
    }
    Ok(())
}
