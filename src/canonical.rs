//! Canonical form of the request: URI, query string and headers.

use std::cmp::Ordering;

use crate::buffer::ProcessingBuffer;
use crate::constants::{MAX_HEADER_PAIRS, MAX_QUERY_PAIRS};
use crate::encode::encode_uri;
use crate::error::{Error, Result};

/// Non-owning key/value pair pointing into caller input.
#[derive(Debug, Clone, Copy)]
pub(crate) struct KeyValueRecord<'a> {
    pub(crate) key: &'a [u8],
    pub(crate) value: &'a [u8],
}

impl<'a> KeyValueRecord<'a> {
    const EMPTY: KeyValueRecord<'a> = KeyValueRecord {
        key: b"",
        value: b"",
    };
}

/// A header line; `ordinal` is the input position, so ordering by
/// (lowercase name, ordinal) is total and headers with equal names keep
/// their input order.
#[derive(Debug, Clone, Copy)]
pub(crate) struct HeaderRecord<'a> {
    pub(crate) name: &'a [u8],
    pub(crate) value: &'a [u8],
    pub(crate) ordinal: usize,
}

impl<'a> HeaderRecord<'a> {
    const EMPTY: HeaderRecord<'a> = HeaderRecord {
        name: b"",
        value: b"",
        ordinal: 0,
    };
}

/// Ascending code point order over the parameter name; parameters with
/// equal names order by value. Shorter slices sort before their
/// extensions, which is exactly slice ordering.
fn query_order(a: &KeyValueRecord<'_>, b: &KeyValueRecord<'_>) -> Ordering {
    a.key.cmp(b.key).then_with(|| a.value.cmp(b.value))
}

fn header_order(a: &HeaderRecord<'_>, b: &HeaderRecord<'_>) -> Ordering {
    let a_name = a.name.iter().map(u8::to_ascii_lowercase);
    let b_name = b.name.iter().map(u8::to_ascii_lowercase);
    a_name.cmp(b_name).then(a.ordinal.cmp(&b.ordinal))
}

/// State of one canonicalization run: the processing buffer plus the
/// query and header record tables.
pub(crate) struct CanonicalContext<'a> {
    pub(crate) buf: ProcessingBuffer,
    query: [KeyValueRecord<'a>; MAX_QUERY_PAIRS],
    query_len: usize,
    headers: [HeaderRecord<'a>; MAX_HEADER_PAIRS],
    header_len: usize,
}

impl<'a> CanonicalContext<'a> {
    pub(crate) fn new() -> Self {
        Self {
            buf: ProcessingBuffer::new(),
            query: [KeyValueRecord::EMPTY; MAX_QUERY_PAIRS],
            query_len: 0,
            headers: [HeaderRecord::EMPTY; MAX_HEADER_PAIRS],
            header_len: 0,
        }
    }

    /// Headers in canonical order, available once
    /// [`canonical_headers`](Self::canonical_headers) has run.
    pub(crate) fn header_records(&self) -> &[HeaderRecord<'a>] {
        &self.headers[..self.header_len]
    }

    /// Writes `line` followed by a linefeed.
    pub(crate) fn write_line(&mut self, line: &[u8]) -> Result<()> {
        self.buf.write(line)?;
        self.buf.write_byte(b'\n')
    }

    fn append_encoded(
        &mut self,
        src: &[u8],
        encode_slash: bool,
        double_encode_equals: bool,
    ) -> Result<()> {
        let n = encode_uri(src, self.buf.tail(), encode_slash, double_encode_equals)?;
        self.buf.advance(n);
        Ok(())
    }

    fn append_lowercase(&mut self, name: &[u8]) -> Result<()> {
        for &b in name {
            self.buf.write_byte(b.to_ascii_lowercase())?;
        }
        Ok(())
    }

    /// Writes the RFC 3986 normalized path and a linefeed.
    ///
    /// With `encode_twice` the encoded form is encoded again; every
    /// service except S3 requires the double pass.
    pub(crate) fn canonical_uri(&mut self, path: &[u8], encode_twice: bool) -> Result<()> {
        let start = self.buf.len();
        self.append_encoded(path, false, false)?;

        if encode_twice {
            // The second pass reads the first, so it is staged in the
            // unused tail and then collapsed over it.
            let (once, tail) = self.buf.split_tail(start);
            let n = encode_uri(once, tail, false, false)?;
            self.buf.collapse(start, n);
        }

        self.buf.write_byte(b'\n')
    }

    /// Splits, orders and percent-encodes the query string, writing the
    /// canonical form and a trailing linefeed.
    pub(crate) fn canonical_query(&mut self, query: &'a [u8]) -> Result<()> {
        self.split_query(query)?;

        self.query[..self.query_len].sort_unstable_by(query_order);

        for i in 0..self.query_len {
            let pair = self.query[i];
            self.append_encoded(pair.key, true, false)?;
            // An empty value is emitted as the bare parameter name.
            if !pair.value.is_empty() {
                self.buf.write_byte(b'=')?;
                self.append_encoded(pair.value, true, true)?;
            }
            if i + 1 != self.query_len {
                self.buf.write_byte(b'&')?;
            }
        }

        self.buf.write_byte(b'\n')
    }

    fn split_query(&mut self, query: &'a [u8]) -> Result<()> {
        for pair in query.split(|&b| b == b'&') {
            if pair.is_empty() {
                continue;
            }

            // The first `=` closes the name; later ones belong to the
            // value.
            let (key, value) = match pair.iter().position(|&b| b == b'=') {
                Some(at) => (&pair[..at], &pair[at + 1..]),
                None => (pair, &b""[..]),
            };

            // A parameter without a name has nothing to sign.
            if key.is_empty() {
                continue;
            }

            if self.query_len == MAX_QUERY_PAIRS {
                return Err(Error::max_query_pairs(format!(
                    "query string carries more than {MAX_QUERY_PAIRS} parameters"
                )));
            }
            self.query[self.query_len] = KeyValueRecord { key, value };
            self.query_len += 1;
        }

        Ok(())
    }

    /// Parses, orders and normalizes the headers, writing the canonical
    /// block, its terminating blank line, and the `;`-joined
    /// signed-headers line.
    ///
    /// With `already_canonical` the block is written verbatim (each line
    /// `name:value` terminated by a linefeed) and only parsed to recover
    /// the signed-header names.
    pub(crate) fn canonical_headers(
        &mut self,
        headers: &'a [u8],
        already_canonical: bool,
    ) -> Result<()> {
        self.split_headers(headers)?;

        if self.header_len == 0 {
            return Err(Error::invalid_parameter(
                "headers must carry at least one entry",
            ));
        }

        if already_canonical {
            self.write_line(headers)?;
        } else {
            self.headers[..self.header_len].sort_unstable_by(header_order);

            for i in 0..self.header_len {
                let header = self.headers[i];
                self.append_lowercase(header.name)?;
                self.buf.write_byte(b':')?;
                self.append_collapsed(header.value)?;
                self.buf.write_byte(b'\n')?;
            }
            self.buf.write_byte(b'\n')?;
        }

        for i in 0..self.header_len {
            if i > 0 {
                self.buf.write_byte(b';')?;
            }
            let name = self.headers[i].name;
            self.append_lowercase(name)?;
        }
        self.buf.write_byte(b'\n')
    }

    fn split_headers(&mut self, headers: &'a [u8]) -> Result<()> {
        let mut rest = headers;

        while !rest.is_empty() {
            let (line, tail) = match rest.iter().position(|&b| b == b'\n') {
                Some(at) => (&rest[..at], &rest[at + 1..]),
                None => (rest, &b""[..]),
            };
            rest = tail;

            let line = line.strip_suffix(b"\r").unwrap_or(line);

            // A blank line ends the header block.
            if line.is_empty() {
                break;
            }

            let colon = line.iter().position(|&b| b == b':').ok_or_else(|| {
                Error::invalid_parameter(format!(
                    "header line {:?} has no ':' separator",
                    String::from_utf8_lossy(line)
                ))
            })?;
            let name = line[..colon].trim_ascii();
            let value = line[colon + 1..].trim_ascii();

            if name.is_empty() {
                return Err(Error::invalid_parameter("header line has an empty name"));
            }
            if self.header_len == MAX_HEADER_PAIRS {
                return Err(Error::max_header_pairs(format!(
                    "headers carry more than {MAX_HEADER_PAIRS} entries"
                )));
            }
            self.headers[self.header_len] = HeaderRecord {
                name,
                value,
                ordinal: self.header_len,
            };
            self.header_len += 1;
        }

        Ok(())
    }

    /// Writes a header value with every unquoted whitespace run collapsed
    /// to a single space. Double-quoted spans are preserved verbatim.
    fn append_collapsed(&mut self, value: &[u8]) -> Result<()> {
        let mut in_quotes = false;
        let mut i = 0;

        while i < value.len() {
            let b = value[i];
            if b == b'"' {
                in_quotes = !in_quotes;
                self.buf.write_byte(b)?;
                i += 1;
            } else if !in_quotes && b.is_ascii_whitespace() {
                self.buf.write_byte(b' ')?;
                while i < value.len() && value[i].is_ascii_whitespace() {
                    i += 1;
                }
            } else {
                self.buf.write_byte(b)?;
                i += 1;
            }
        }

        Ok(())
    }
}
