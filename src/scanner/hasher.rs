//! BLAKE3 file hasher with streaming support.
//!
//! # Overview
//!
//! This module provides the [`Hasher`] struct for computing BLAKE3
//! fingerprints of file contents using a fixed-size read buffer, so files of
//! any size are hashed in constant memory.
//!
//! # Example
//!
//! ```no_run
//! use paf::scanner::Hasher;
//! use std::path::Path;
//!
//! let hasher = Hasher::new();
//! let fingerprint = hasher.full_hash(Path::new("photo.jpg")).unwrap();
//! println!("{}", fingerprint);
//! ```

use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::Error;

/// Default read buffer size (64 KiB).
pub const DEFAULT_BUFFER_SIZE: usize = 64 * 1024;

/// Length of a fingerprint in bytes.
pub const FINGERPRINT_LEN: usize = 32;

/// Content fingerprint of a file (BLAKE3 digest).
///
/// Equal fingerprints imply equal content with cryptographic confidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint([u8; FINGERPRINT_LEN]);

impl Fingerprint {
    /// Wrap raw digest bytes.
    #[must_use]
    pub fn from_bytes(bytes: [u8; FINGERPRINT_LEN]) -> Self {
        Self(bytes)
    }

    /// Raw digest bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; FINGERPRINT_LEN] {
        &self.0
    }

    /// Lowercase hexadecimal rendering (64 characters).
    #[must_use]
    pub fn to_hex(&self) -> String {
        blake3::Hash::from(self.0).to_hex().to_string()
    }

    /// Parse a hexadecimal fingerprint.
    ///
    /// Returns `None` if the string is not exactly 64 hex digits.
    #[must_use]
    pub fn from_hex(hex: &str) -> Option<Self> {
        blake3::Hash::from_hex(hex)
            .ok()
            .map(|h| Self(*h.as_bytes()))
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Streaming BLAKE3 hasher for whole files.
#[derive(Debug, Clone)]
pub struct Hasher {
    buffer_size: usize,
}

impl Default for Hasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher {
    /// Create a hasher with the default 64 KiB buffer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }

    /// Create a hasher with a custom read buffer size (minimum 1 byte).
    #[must_use]
    pub fn with_buffer_size(buffer_size: usize) -> Self {
        Self {
            buffer_size: buffer_size.max(1),
        }
    }

    /// Configured read buffer size.
    #[must_use]
    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }

    /// Hash the entire content of a file.
    ///
    /// # Errors
    ///
    /// - [`Error::Access`] if the file cannot be opened for permission reasons
    /// - [`Error::Io`] if opening fails otherwise or a read fails mid-stream
    pub fn full_hash(&self, path: &Path) -> Result<Fingerprint, Error> {
        let mut file = File::open(path).map_err(|e| Error::from_io(path, e))?;
        let mut hasher = blake3::Hasher::new();
        let mut buffer = vec![0u8; self.buffer_size];

        loop {
            let bytes_read = match file.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(Error::from_io(path, e)),
            };
            hasher.update(&buffer[..bytes_read]);
        }

        Ok(Fingerprint(*hasher.finalize().as_bytes()))
    }
}

/// Hash a file with the default hasher and return the lowercase hex digest.
///
/// # Errors
///
/// See [`Hasher::full_hash`].
pub fn hash_file(path: &Path) -> Result<String, Error> {
    Hasher::new().full_hash(path).map(|f| f.to_hex())
}
