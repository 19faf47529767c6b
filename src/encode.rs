//! Bounded percent-encoding for canonical URIs and query strings.

use crate::error::{Error, Result};

/// The unreserved characters RFC 3986 defines: `A-Z`, `a-z`, `0-9`,
/// hyphen, underscore, period and tilde. Everything else is
/// percent-encoded.
pub(crate) fn is_unreserved(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.' | b'~')
}

pub(crate) fn to_upper_hex(nibble: u8) -> u8 {
    debug_assert!(nibble < 16);
    if nibble < 10 {
        b'0' + nibble
    } else {
        b'A' + nibble - 10
    }
}

/// Percent-encodes `src` into `dst` and returns the number of bytes
/// written.
///
/// Unreserved bytes pass through verbatim, as does `/` unless
/// `encode_slash` is set. With `double_encode_equals`, `=` emits the five
/// byte literal `%253D`; SigV4 requires this for equals signs inside query
/// parameter values. Every other byte emits `%XY` with upper-case hex.
///
/// Fails with `InsufficientMemory` when `dst` cannot hold the encoded
/// form.
pub(crate) fn encode_uri(
    src: &[u8],
    dst: &mut [u8],
    encode_slash: bool,
    double_encode_equals: bool,
) -> Result<usize> {
    let mut written = 0;

    for &b in src {
        if double_encode_equals && b == b'=' {
            let end = written + 5;
            if end > dst.len() {
                return Err(overflow(end - dst.len()));
            }
            dst[written..end].copy_from_slice(b"%253D");
            written = end;
        } else if is_unreserved(b) || (b == b'/' && !encode_slash) {
            if written == dst.len() {
                return Err(overflow(1));
            }
            dst[written] = b;
            written += 1;
        } else {
            let end = written + 3;
            if end > dst.len() {
                return Err(overflow(end - dst.len()));
            }
            dst[written] = b'%';
            dst[written + 1] = to_upper_hex(b >> 4);
            dst[written + 2] = to_upper_hex(b & 0x0F);
            written = end;
        }
    }

    Ok(written)
}

fn overflow(bytes_exceeded: usize) -> Error {
    Error::insufficient_memory(format!(
        "percent-encoded form does not fit the remaining buffer, bytes_exceeded={bytes_exceeded}; \
         increase PROCESSING_BUFFER_LEN to fix"
    ))
}
