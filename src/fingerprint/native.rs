//! In-process fingerprinters.

use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;

use sha2::{Digest, Sha256};

use super::{FingerprintError, Fingerprinter};

/// Buffer size for streaming file reads (64 KiB).
const BUFFER_SIZE: usize = 64 * 1024;

fn open(path: &Path) -> Result<BufReader<File>, FingerprintError> {
    File::open(path)
        .map(|f| BufReader::with_capacity(BUFFER_SIZE, f))
        .map_err(|e| FingerprintError::from_io(path, e))
}

/// Streaming BLAKE3 digest in lowercase hex.
#[derive(Debug, Clone, Copy, Default)]
pub struct Blake3Fingerprinter;

impl Fingerprinter for Blake3Fingerprinter {
    fn fingerprint(&self, path: &Path) -> Result<String, FingerprintError> {
        let mut reader = open(path)?;
        let mut hasher = blake3::Hasher::new();
        io::copy(&mut reader, &mut hasher).map_err(|e| FingerprintError::from_io(path, e))?;
        Ok(hasher.finalize().to_hex().to_string())
    }
}

/// Streaming SHA-256 digest in lowercase hex.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Fingerprinter;

impl Fingerprinter for Sha256Fingerprinter {
    fn fingerprint(&self, path: &Path) -> Result<String, FingerprintError> {
        let mut reader = open(path)?;
        let mut hasher = Sha256::new();
        io::copy(&mut reader, &mut hasher).map_err(|e| FingerprintError::from_io(path, e))?;
        Ok(format!("{:x}", hasher.finalize()))
    }
}
