use std::fmt;

use thiserror::Error;

/// The error type for signing operations.
#[derive(Error, Debug)]
#[error("{message}")]
pub struct Error {
    kind: ErrorKind,
    message: String,
    #[source]
    source: Option<anyhow::Error>,
}

/// The kind of error that occurred.
///
/// This enumeration is closed: every failure of a signing call maps onto
/// exactly one of these kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A required input is missing or zero-length.
    InvalidParameter,

    /// The processing buffer or an output buffer would overflow; the
    /// caller must enlarge it.
    InsufficientMemory,

    /// A date string failed to parse or describes an invalid calendar
    /// date.
    IsoFormatting,

    /// The query string carries more parameters than
    /// [`MAX_QUERY_PAIRS`](crate::MAX_QUERY_PAIRS).
    MaxQueryPairCountExceeded,

    /// The headers carry more entries than
    /// [`MAX_HEADER_PAIRS`](crate::MAX_HEADER_PAIRS).
    MaxHeaderPairCountExceeded,

    /// The hash interface reported a failure.
    Hash,
}

impl Error {
    /// Create a new error with the given kind and message.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Add a source error.
    pub fn with_source(mut self, source: impl Into<anyhow::Error>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Get the error kind.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }
}

// Convenience constructors
impl Error {
    /// Create an invalid parameter error.
    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidParameter, message)
    }

    /// Create an insufficient memory error.
    pub fn insufficient_memory(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InsufficientMemory, message)
    }

    /// Create an ISO 8601 formatting error.
    pub fn iso_formatting(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::IsoFormatting, message)
    }

    /// Create a query pair cap error.
    pub fn max_query_pairs(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::MaxQueryPairCountExceeded, message)
    }

    /// Create a header pair cap error.
    pub fn max_header_pairs(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::MaxHeaderPairCountExceeded, message)
    }

    /// Create a hash interface error.
    pub fn hash(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Hash, message)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::InvalidParameter => write!(f, "invalid parameter"),
            ErrorKind::InsufficientMemory => write!(f, "insufficient memory"),
            ErrorKind::IsoFormatting => write!(f, "invalid ISO 8601 date"),
            ErrorKind::MaxQueryPairCountExceeded => write!(f, "query pair cap exceeded"),
            ErrorKind::MaxHeaderPairCountExceeded => write!(f, "header pair cap exceeded"),
            ErrorKind::Hash => write!(f, "hash interface failure"),
        }
    }
}

/// Convenience type alias for Results.
pub type Result<T> = std::result::Result<T, Error>;
