//! Utility functions for cryptographic operations.

use rand::RngCore;
use zeroize::Zeroize;

/// Fill `buf` from the operating system's secure random source.
pub fn fill_random(buf: &mut [u8]) -> Result<(), rand::Error> {
    rand::rngs::OsRng.try_fill_bytes(buf)
}

/// Generate `len` cryptographically secure random bytes.
pub fn generate_random_bytes(len: usize) -> Result<Vec<u8>, rand::Error> {
    let mut buf = vec![0u8; len];
    fill_random(&mut buf)?;
    Ok(buf)
}

/// Zeroize sensitive data in a byte slice.
pub fn clear_bytes(buf: &mut [u8]) {
    buf.zeroize();
}
