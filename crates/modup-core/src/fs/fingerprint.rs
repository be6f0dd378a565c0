//! Content fingerprinting for binary equality checks.
//!
//! A fingerprint covers a file's full byte content; two files are
//! considered identical iff their fingerprints compare equal. Fingerprints
//! decide skip-vs-update only and are never used for integrity
//! verification or signing.

use anyhow::Context;
use std::fmt;
use std::fs::File;
use std::io;
use std::path::Path;

/// Digest of a file's full byte content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fingerprint(blake3::Hash);

impl Fingerprint {
    pub fn to_hex(&self) -> String {
        self.0.to_hex().to_string()
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_hex())
    }
}

/// Compute the fingerprint of a single file.
///
/// The file is streamed through the hasher, so arbitrarily large binaries
/// are handled without loading them whole. Fails if the file cannot be
/// opened or read in full.
pub fn fingerprint_file(path: &Path) -> anyhow::Result<Fingerprint> {
    let mut file =
        File::open(path).with_context(|| format!("Failed to open file: {}", path.display()))?;
    let mut hasher = blake3::Hasher::new();
    io::copy(&mut file, &mut hasher)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    Ok(Fingerprint(hasher.finalize()))
}
