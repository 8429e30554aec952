//! OpenAPI Share-Link Library
//!
//! This library turns an OpenAPI document into a compact link that carries
//! the document itself in a URL query parameter, and turns such links back
//! into documents. Links are tagged with their encoding:
//!
//! - `lz:<payload>`: output of a compression backend (LZ-string by default)
//! - `b64:<payload>`: URL-safe base64 of the minified JSON
//! - `<payload>`: untagged base64 written by older editor versions
//!
//! Encoding always picks the shorter of the compressed and base64 forms.
//!

pub mod backend;
pub mod codec;
pub mod decode;
pub mod document;
pub mod encode;
pub mod error;
pub mod load;
pub mod report;
pub mod share;
pub mod types;

#[cfg(feature = "lz-string")]
pub use backend::LzStringBackend;
pub use backend::{BackendSlot, CompressionBackend};
pub use codec::ShareLinkCodec;
pub use document::{example_document, Document};
pub use encode::MAX_NESTING_DEPTH;
pub use error::{Result, ShareLinkError};
pub use load::{load_from_query, load_from_url, LoadedDocument};
pub use report::CompressionReport;
pub use share::{build_share_url, extract_link, ShareUrl, MAX_SHARE_URL_LEN, SCHEMA_PARAM};
pub use types::{EncodedLink, LinkFormat};

/// Encode a document into a share link with the default backend.
///
/// # Errors
///
/// Returns `ShareLinkError` if the document cannot be serialized.
pub fn encode<T: serde::Serialize + ?Sized>(document: &T) -> Result<String> {
    ShareLinkCodec::default().encode(document)
}

/// Decode a share link with the default backend.
///
/// # Errors
///
/// Returns `ShareLinkError` if the link cannot be decoded.
pub fn decode(link: &str) -> Result<Document> {
    ShareLinkCodec::default().decode(link)
}
