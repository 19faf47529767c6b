//! RFC 2104 HMAC over the streaming hash contract.

use crate::constants::{HASH_MAX_BLOCK_LEN, HASH_MAX_DIGEST_LEN};
use crate::error::{Error, Result};
use crate::hash::StreamingHash;

const IPAD: u8 = 0x36;
// 0x36 ^ 0x5C: flips an inner-padded key byte to its outer-padded form.
const IPAD_OPAD: u8 = 0x6A;

/// HMAC context that accepts its key in chunks.
///
/// A computation moves through three stages: any number of
/// [`append_key`](Self::append_key) calls, one
/// [`start_data`](Self::start_data) call with the message, then
/// [`finish`](Self::finish). [`complete`](Self::complete) runs all three
/// for the common case. The context resets itself on `finish` and can be
/// reused for the next MAC.
pub(crate) struct HmacContext<'h, H: StreamingHash> {
    hash: &'h mut H,
    key: [u8; HASH_MAX_BLOCK_LEN],
    key_len: usize,
}

impl<'h, H: StreamingHash> HmacContext<'h, H> {
    pub(crate) fn new(hash: &'h mut H) -> Self {
        Self {
            hash,
            key: [0; HASH_MAX_BLOCK_LEN],
            key_len: 0,
        }
    }

    /// Appends a chunk of key material.
    ///
    /// Chunks are buffered while the accumulated key fits the hash block
    /// length; once it overflows, the key is streamed through the hash
    /// instead and replaced by its digest when the message starts.
    pub(crate) fn append_key(&mut self, key: &[u8]) -> Result<()> {
        let block_len = self.hash.block_len();

        if self.key_len + key.len() <= block_len {
            self.key[self.key_len..self.key_len + key.len()].copy_from_slice(key);
        } else {
            // The chunk that first overflows the block moves the buffered
            // part into the hash before streaming the rest.
            if self.key_len <= block_len {
                self.hash.init()?;
                self.hash.update(&self.key[..self.key_len])?;
            }
            self.hash.update(key)?;
        }

        self.key_len += key.len();
        Ok(())
    }

    /// Starts the inner pass over the accumulated key and feeds `data` as
    /// the message. Call once, after all key chunks.
    pub(crate) fn start_data(&mut self, data: &[u8]) -> Result<()> {
        let block_len = self.hash.block_len();
        let digest_len = self.hash.digest_len();

        // A key longer than the block is replaced by its digest.
        if self.key_len > block_len {
            self.hash.finish(&mut self.key[..block_len])?;
            self.key_len = digest_len;
        }

        // Zero pad to block length, then XOR in the inner padding.
        self.key[self.key_len..block_len].fill(0);
        for b in &mut self.key[..block_len] {
            *b ^= IPAD;
        }

        self.hash.init()?;
        self.hash.update(&self.key[..block_len])?;
        if !data.is_empty() {
            self.hash.update(data)?;
        }

        Ok(())
    }

    /// Finishes the inner pass, runs the outer pass, and writes the MAC
    /// into `out[..digest_len]`.
    pub(crate) fn finish(&mut self, out: &mut [u8]) -> Result<()> {
        let block_len = self.hash.block_len();
        let digest_len = self.hash.digest_len();

        let mut inner = [0u8; HASH_MAX_DIGEST_LEN];
        self.hash.finish(&mut inner[..digest_len])?;

        // XOR is associative: flipping every byte with ipad ^ opad turns
        // the inner-padded key into the outer-padded key in place.
        for b in &mut self.key[..block_len] {
            *b ^= IPAD_OPAD;
        }

        self.hash.init()?;
        self.hash.update(&self.key[..block_len])?;
        self.hash.update(&inner[..digest_len])?;
        self.hash.finish(out)?;

        self.key_len = 0;
        Ok(())
    }

    /// One-shot MAC of `data` under `key` (appended to any chunks already
    /// supplied), written to `out[..digest_len]`.
    pub(crate) fn complete(&mut self, key: &[u8], data: &[u8], out: &mut [u8]) -> Result<()> {
        let digest_len = self.hash.digest_len();
        if out.len() < digest_len {
            return Err(Error::insufficient_memory(format!(
                "mac output needs {digest_len} bytes, have {}",
                out.len()
            )));
        }

        self.append_key(key)?;
        self.start_data(data)?;
        self.finish(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::Sha256Hash;

    fn hmac_hex(key: &[u8], data: &[u8]) -> String {
        let mut hash = Sha256Hash::default();
        let mut mac = [0u8; 32];
        HmacContext::new(&mut hash)
            .complete(key, data, &mut mac)
            .unwrap();
        hex::encode(mac)
    }

    // HMAC-SHA-256 vectors from RFC 4231.
    #[test]
    fn test_rfc4231_case_1() {
        assert_eq!(
            hmac_hex(&[0x0b; 20], b"Hi There"),
            "b0344c61d8db38535ca8afceaf0bf12b881dc200c9833da726e9376c2e32cff7"
        );
    }

    #[test]
    fn test_rfc4231_case_2() {
        assert_eq!(
            hmac_hex(b"Jefe", b"what do ya want for nothing?"),
            "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
    }

    #[test]
    fn test_rfc4231_case_3() {
        assert_eq!(
            hmac_hex(&[0xaa; 20], &[0xdd; 50]),
            "773ea91e36800e46854db8ebd09181a72959098b3ef8c122d9635514ced565fe"
        );
    }

    #[test]
    fn test_rfc4231_case_6_key_longer_than_block() {
        assert_eq!(
            hmac_hex(
                &[0xaa; 131],
                b"Test Using Larger Than Block-Size Key - Hash Key First"
            ),
            "60e431591ee0b67f0d8a26aacbf5b77f8e0bc6213728c5140546040f0ee37f54"
        );
    }

    #[test]
    fn test_rfc4231_case_7_key_and_data_longer_than_block() {
        assert_eq!(
            hmac_hex(
                &[0xaa; 131],
                &b"This is a test using a larger than block-size key and a larger than \
                   block-size data. The key needs to be hashed before being used by the \
                   HMAC algorithm."[..]
            ),
            "9b09ffa71b942fcb27635fbcd5b0e944bfdc63644f0713938a7f51535c3a35e2"
        );
    }

    #[test]
    fn test_chunked_key_equals_one_shot() {
        let mut hash = Sha256Hash::default();
        let mut mac = [0u8; 32];
        let mut ctx = HmacContext::new(&mut hash);
        ctx.append_key(b"AWS4").unwrap();
        ctx.complete(b"secret-key-material", b"20150830", &mut mac)
            .unwrap();

        assert_eq!(
            hex::encode(mac),
            hmac_hex(b"AWS4secret-key-material", b"20150830")
        );
    }

    #[test]
    fn test_chunked_key_crossing_block_boundary() {
        let key = [0x5a; 131];
        let mut hash = Sha256Hash::default();
        let mut mac = [0u8; 32];
        let mut ctx = HmacContext::new(&mut hash);
        ctx.append_key(&key[..60]).unwrap();
        ctx.complete(&key[60..], b"message", &mut mac).unwrap();

        assert_eq!(hex::encode(mac), hmac_hex(&key, b"message"));
    }

    #[test]
    fn test_exact_block_length_key_stays_buffered() {
        let key = [0x42; 64];
        let mut hash = Sha256Hash::default();
        let mut mac = [0u8; 32];
        let mut ctx = HmacContext::new(&mut hash);
        ctx.append_key(&key[..32]).unwrap();
        ctx.complete(&key[32..], b"message", &mut mac).unwrap();
        assert_eq!(hex::encode(mac), hmac_hex(&key, b"message"));
    }

    #[test]
    fn test_context_reuse() {
        let mut hash = Sha256Hash::default();
        let mut first = [0u8; 32];
        let mut second = [0u8; 32];

        let mut ctx = HmacContext::new(&mut hash);
        ctx.complete(b"key", b"data", &mut first).unwrap();
        ctx.complete(b"key", b"data", &mut second).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_key_and_message() {
        assert_eq!(
            hmac_hex(b"", b""),
            "b613679a0814d9ec772f95d778c35fc5ff1697c493715653c6c712144292c5ad"
        );
    }
}
