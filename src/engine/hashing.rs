//! File hashing utilities

use anyhow::{Context, Result};
use blake3::Hasher;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::Digest;
use crate::utils::config::HashingConsts;

/// Hash a file with blake3, streaming it in fixed-size chunks. The digest is the first
/// [`HashingConsts::DIGEST_LEN`] bytes of the extended output.
pub fn hash_file(path: &Path) -> Result<Digest> {
    let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
    hash_reader(file).with_context(|| format!("read {}", path.display()))
}

/// Hash everything `reader` yields. Used by [`hash_file`]; exposed for in-memory callers.
pub fn hash_reader<R: Read>(mut reader: R) -> std::io::Result<Digest> {
    let mut hasher = Hasher::new();
    let mut buffer = vec![0u8; HashingConsts::HASH_READ_CHUNK_SIZE];
    loop {
        let n = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        hasher.update(&buffer[..n]);
    }
    let mut out = [0u8; HashingConsts::DIGEST_LEN];
    hasher.finalize_xof().fill(&mut out);
    Ok(Digest::from_bytes(out))
}

/// Hash an in-memory buffer the same way [`hash_file`] hashes a file.
pub fn hash_bytes(bytes: &[u8]) -> Digest {
    let mut hasher = Hasher::new();
    hasher.update(bytes);
    let mut out = [0u8; HashingConsts::DIGEST_LEN];
    hasher.finalize_xof().fill(&mut out);
    Digest::from_bytes(out)
}

/// Byte-for-byte comparison of two files (paranoid mode).
pub fn files_identical(a: &Path, b: &Path) -> Result<bool> {
    let fa = File::open(a).with_context(|| format!("open {}", a.display()))?;
    let fb = File::open(b).with_context(|| format!("open {}", b.display()))?;
    if fa.metadata()?.len() != fb.metadata()?.len() {
        return Ok(false);
    }
    let mut ra = BufReader::with_capacity(HashingConsts::HASH_READ_CHUNK_SIZE, fa);
    let mut rb = BufReader::with_capacity(HashingConsts::HASH_READ_CHUNK_SIZE, fb);
    let mut buf_a = vec![0u8; HashingConsts::HASH_READ_CHUNK_SIZE];
    let mut buf_b = vec![0u8; HashingConsts::HASH_READ_CHUNK_SIZE];
    loop {
        let n = read_full(&mut ra, &mut buf_a)?;
        let m = read_full(&mut rb, &mut buf_b)?;
        if n != m || buf_a[..n] != buf_b[..m] {
            return Ok(false);
        }
        if n == 0 {
            return Ok(true);
        }
    }
}

/// Fill `buf` as far as the reader allows; short only at end of input.
fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
