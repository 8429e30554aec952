use std::io;

/// Result type alias for share-link operations.
pub type Result<T> = std::result::Result<T, ShareLinkError>;

/// Errors that can occur while encoding or decoding share links.
#[derive(Debug, thiserror::Error)]
pub enum ShareLinkError {
    #[error("Document cannot be serialized to JSON: {0}")]
    Encode(String),

    #[error("Link format '{0}' requires a compression backend, but none is loaded")]
    UnsupportedFormat(&'static str),

    #[error("Compression backend '{backend}' rejected the payload")]
    Decompression { backend: &'static str },

    #[error("Decoded text is not valid JSON: {0}")]
    MalformedJson(String),

    #[error("Invalid base64 payload: {0}")]
    InvalidBase64(String),

    #[error("Invalid UTF-8 in decoded payload: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    #[error("URL has no '{0}' parameter")]
    MissingLink(&'static str),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl ShareLinkError {
    /// Whether a caller can recover by falling back to a default document.
    ///
    /// Every failure that stems from the link contents is recoverable; only
    /// local I/O failures are not.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, ShareLinkError::Io(_))
    }
}
