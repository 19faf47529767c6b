//! The streaming hash contract and helpers built on top of it.

use sha2::{Digest, Sha256};

use crate::constants::HASH_MAX_DIGEST_LEN;
use crate::error::{Error, Result};

/// Streaming hash interface the signing pipeline computes with.
///
/// The pipeline never chooses a hash algorithm; it consumes one through
/// this contract. [`Sha256Hash`] is what AWS SigV4 deploys with, but any
/// digest whose lengths fit
/// [`HASH_MAX_DIGEST_LEN`](crate::HASH_MAX_DIGEST_LEN) and
/// [`HASH_MAX_BLOCK_LEN`](crate::HASH_MAX_BLOCK_LEN) works.
///
/// The value is owned by the caller and handed to the pipeline by mutable
/// reference; it must not be shared between concurrent signing calls.
pub trait StreamingHash {
    /// Resets the context to hash a fresh message.
    fn init(&mut self) -> Result<()>;

    /// Feeds `data` into the running hash.
    fn update(&mut self, data: &[u8]) -> Result<()>;

    /// Writes the digest into `out[..digest_len]` and leaves the context
    /// ready for the next [`init`](Self::init).
    fn finish(&mut self, out: &mut [u8]) -> Result<()>;

    /// The internal block length in bytes. At least
    /// [`digest_len`](Self::digest_len).
    fn block_len(&self) -> usize;

    /// The digest length in bytes.
    fn digest_len(&self) -> usize;
}

/// SHA-256 behind the [`StreamingHash`] contract, backed by the `sha2`
/// crate.
#[derive(Default)]
pub struct Sha256Hash {
    inner: Sha256,
}

impl StreamingHash for Sha256Hash {
    fn init(&mut self) -> Result<()> {
        self.inner = Sha256::new();
        Ok(())
    }

    fn update(&mut self, data: &[u8]) -> Result<()> {
        Digest::update(&mut self.inner, data);
        Ok(())
    }

    fn finish(&mut self, out: &mut [u8]) -> Result<()> {
        if out.len() < 32 {
            return Err(Error::hash("digest output buffer shorter than 32 bytes"));
        }
        let digest = self.inner.finalize_reset();
        out[..32].copy_from_slice(&digest);
        Ok(())
    }

    fn block_len(&self) -> usize {
        64
    }

    fn digest_len(&self) -> usize {
        32
    }
}

/// Hex encoded SHA256 hash.
///
/// Handy for precomputing a payload digest to pass with the
/// `payload_is_hash` flag.
pub fn hex_sha256(content: &[u8]) -> String {
    hex::encode(Sha256::digest(content).as_slice())
}

/// Hashes `input` in one shot and writes the lowercase hex digest into
/// `out`, returning the number of bytes written (twice the digest length).
pub(crate) fn hash_and_hex_encode<H: StreamingHash>(
    hash: &mut H,
    input: &[u8],
    out: &mut [u8],
) -> Result<usize> {
    let digest_len = hash.digest_len();
    let mut digest = [0u8; HASH_MAX_DIGEST_LEN];

    hash.init()?;
    hash.update(input)?;
    hash.finish(&mut digest[..digest_len])?;

    hex_encode_into(&digest[..digest_len], out)
}

/// Lowercase hex into a caller buffer; `InsufficientMemory` when it does
/// not fit.
pub(crate) fn hex_encode_into(input: &[u8], out: &mut [u8]) -> Result<usize> {
    let needed = input.len() * 2;
    if out.len() < needed {
        return Err(Error::insufficient_memory(format!(
            "hex digest needs {needed} bytes, have {}",
            out.len()
        )));
    }
    hex::encode_to_slice(input, &mut out[..needed])
        .map_err(|_| Error::insufficient_memory("hex output length mismatch"))?;
    Ok(needed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_streaming_matches_one_shot() {
        let mut hash = Sha256Hash::default();
        let mut out = [0u8; 32];
        hash.init().unwrap();
        hash.update(b"hello ").unwrap();
        hash.update(b"world").unwrap();
        hash.finish(&mut out).unwrap();

        assert_eq!(hex::encode(out), hex_sha256(b"hello world"));
    }

    #[test]
    fn test_empty_string_digest() {
        assert_eq!(
            hex_sha256(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_hash_and_hex_encode() {
        let mut hash = Sha256Hash::default();
        let mut out = [0u8; 64];
        let n = hash_and_hex_encode(&mut hash, b"payload", &mut out).unwrap();
        assert_eq!(n, 64);
        assert_eq!(&out[..n], hex_sha256(b"payload").as_bytes());
    }

    #[test]
    fn test_context_resets_after_finish() {
        let mut hash = Sha256Hash::default();
        let mut first = [0u8; 32];
        let mut second = [0u8; 32];

        hash.init().unwrap();
        hash.update(b"one").unwrap();
        hash.finish(&mut first).unwrap();

        hash.init().unwrap();
        hash.update(b"one").unwrap();
        hash.finish(&mut second).unwrap();

        assert_eq!(first, second);
    }
}
