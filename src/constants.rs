// Strings fixed by the SigV4 protocol.
pub(crate) const AWS4_HMAC_SHA256: &str = "AWS4-HMAC-SHA256";
pub(crate) const SIGNING_KEY_PREFIX: &str = "AWS4";
pub(crate) const CREDENTIAL_SCOPE_TERMINATOR: &str = "aws4_request";

/// S3 is the only service whose URI must be encoded exactly once.
pub(crate) const S3_SERVICE_NAME: &str = "s3";

pub(crate) const HTTP_EMPTY_PATH: &str = "/";

/// Size of the processing buffer every signing call works in.
///
/// Holds the canonical request, then the string to sign plus the signing
/// key windows. Requests whose canonical form does not fit fail with
/// `InsufficientMemory`.
pub const PROCESSING_BUFFER_LEN: usize = 4096;

/// Most query parameters a single request may carry.
pub const MAX_QUERY_PAIRS: usize = 100;

/// Most headers a single request may carry.
pub const MAX_HEADER_PAIRS: usize = 100;

/// Upper bound on [`StreamingHash::digest_len`](crate::StreamingHash::digest_len).
pub const HASH_MAX_DIGEST_LEN: usize = 32;

/// Upper bound on [`StreamingHash::block_len`](crate::StreamingHash::block_len).
pub const HASH_MAX_BLOCK_LEN: usize = 64;

/// Length of the compact ISO 8601 form `YYYYMMDDTHHMMSSZ`.
pub const ISO8601_LEN: usize = 16;

/// Length of the `YYYYMMDD` prefix used in the credential scope.
pub(crate) const ISO_DATE_LEN: usize = 8;
