//! The fixed processing buffer every signing call works in.

use crate::constants::PROCESSING_BUFFER_LEN;
use crate::error::{Error, Result};

/// A single contiguous byte region holding every intermediate artifact of
/// a signing call: first the canonical request, then the string to sign
/// and the signing key windows.
///
/// Writes advance a cursor and are bounds-checked; running out of room is
/// `InsufficientMemory`, never a panic. The only overlapping move is
/// [`collapse`](Self::collapse), which the pipeline uses to pull bytes
/// staged in the unused tail down to their final position.
pub(crate) struct ProcessingBuffer {
    bytes: [u8; PROCESSING_BUFFER_LEN],
    len: usize,
}

impl ProcessingBuffer {
    pub(crate) fn new() -> Self {
        Self {
            bytes: [0; PROCESSING_BUFFER_LEN],
            len: 0,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn remaining(&self) -> usize {
        PROCESSING_BUFFER_LEN - self.len
    }

    /// The bytes written so far.
    pub(crate) fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    /// The unused tail. Pair with [`advance`](Self::advance) after filling
    /// part of it.
    pub(crate) fn tail(&mut self) -> &mut [u8] {
        &mut self.bytes[self.len..]
    }

    /// Marks `n` bytes of the tail as written.
    pub(crate) fn advance(&mut self, n: usize) {
        debug_assert!(n <= self.remaining());
        self.len += n;
    }

    pub(crate) fn write(&mut self, data: &[u8]) -> Result<()> {
        if data.len() > self.remaining() {
            return Err(Error::insufficient_memory(format!(
                "processing buffer full, bytes_exceeded={}; increase PROCESSING_BUFFER_LEN to fix",
                data.len() - self.remaining()
            )));
        }
        self.bytes[self.len..self.len + data.len()].copy_from_slice(data);
        self.len += data.len();
        Ok(())
    }

    pub(crate) fn write_byte(&mut self, b: u8) -> Result<()> {
        self.write(&[b])
    }

    /// Splits the buffer into the written region from `at` on and the
    /// unused tail, so the tail can be filled while reading what was
    /// already written.
    pub(crate) fn split_tail(&mut self, at: usize) -> (&[u8], &mut [u8]) {
        debug_assert!(at <= self.len);
        let (head, tail) = self.bytes.split_at_mut(self.len);
        (&head[at..], tail)
    }

    /// Moves `n` bytes staged at the start of the tail to `dst` and sets
    /// the cursor past them. Regions may overlap. When `dst` lies past the
    /// written region, the bytes in between are unspecified and the caller
    /// must overwrite them.
    pub(crate) fn collapse(&mut self, dst: usize, n: usize) {
        debug_assert!(dst + n <= PROCESSING_BUFFER_LEN);
        debug_assert!(n <= self.remaining());
        self.bytes.copy_within(self.len..self.len + n, dst);
        self.len = dst + n;
    }

    /// The first `n` written bytes, for rewriting a prefix in place.
    pub(crate) fn head_mut(&mut self, n: usize) -> &mut [u8] {
        debug_assert!(n <= self.len);
        &mut self.bytes[..n]
    }
}
