use getrandom::fill;

use crate::error::{Result, SealError};

/// Source of the salts and IVs used while sealing.
///
/// Production code uses [`OsRandom`]. Tests plug in a fixed source to
/// reproduce tokens byte for byte.
pub trait RandomSource {
    /// Fill `buf` entirely with random bytes.
    fn fill(&self, buf: &mut [u8]) -> Result<()>;
}

/// The operating system CSPRNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsRandom;

impl RandomSource for OsRandom {
    fn fill(&self, buf: &mut [u8]) -> Result<()> {
        fill(buf).map_err(|_| SealError::Random)
    }
}

/// Generate `len` random bytes.
pub fn random_bytes<R: RandomSource + ?Sized>(rng: &R, len: usize) -> Result<Vec<u8>> {
    let mut buf = vec![0u8; len];
    rng.fill(&mut buf)?;
    Ok(buf)
}
