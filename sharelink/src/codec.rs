use crate::backend::{default_backend, CompressionBackend};
use crate::error::{Result, ShareLinkError};
use crate::report::CompressionReport;
use crate::types::EncodedLink;
use crate::{decode, encode};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

/// Encoder and decoder for share links.
///
/// Holds nothing but the compression backend that was available when it
/// was created. Without a backend every link is written as `b64:` and
/// `lz:` links fail with [`ShareLinkError::UnsupportedFormat`].
#[derive(Debug, Clone)]
pub struct ShareLinkCodec {
    backend: Option<Arc<dyn CompressionBackend>>,
}

impl Default for ShareLinkCodec {
    fn default() -> Self {
        Self::new(default_backend())
    }
}

impl ShareLinkCodec {
    pub fn new(backend: Option<Arc<dyn CompressionBackend>>) -> Self {
        ShareLinkCodec { backend }
    }

    pub fn with_backend(backend: Arc<dyn CompressionBackend>) -> Self {
        Self::new(Some(backend))
    }

    pub fn without_backend() -> Self {
        Self::new(None)
    }

    pub fn has_backend(&self) -> bool {
        self.backend.is_some()
    }

    pub fn backend(&self) -> Option<&dyn CompressionBackend> {
        self.backend.as_deref()
    }

    /// Encode a document into a tagged share link (`lz:...` or `b64:...`).
    ///
    /// # Errors
    ///
    /// Returns [`ShareLinkError::Encode`] if the document cannot be
    /// serialized to JSON.
    pub fn encode<T: Serialize + ?Sized>(&self, document: &T) -> Result<String> {
        self.encode_with_report(document)
            .map(|(link, _)| link.to_string())
    }

    /// Like [`ShareLinkCodec::encode`], also returning the size summary.
    pub fn encode_with_report<T: Serialize + ?Sized>(
        &self,
        document: &T,
    ) -> Result<(EncodedLink, CompressionReport)> {
        let minified = encode::to_minified_json(document)?;
        let input_len = minified.chars().count();
        Ok(encode::encode_minified(self.backend(), &minified, input_len))
    }

    /// Encode JSON text, which may be pretty-printed.
    ///
    /// The text is parsed and re-serialized before encoding. The report's
    /// input length is that of `text` as given.
    ///
    /// # Errors
    ///
    /// Returns [`ShareLinkError::MalformedJson`] if `text` is not valid JSON.
    pub fn encode_text(&self, text: &str) -> Result<(EncodedLink, CompressionReport)> {
        let minified = encode::minify(text)?;
        Ok(encode::encode_minified(
            self.backend(),
            &minified,
            text.chars().count(),
        ))
    }

    /// Decode a share link into a JSON document.
    ///
    /// Accepts `lz:`, `b64:` and untagged legacy links.
    pub fn decode(&self, link: &str) -> Result<Value> {
        decode::decode(self.backend(), link)
    }

    /// Decode a share link straight into a typed value.
    pub fn decode_as<T: serde::de::DeserializeOwned>(&self, link: &str) -> Result<T> {
        let value = self.decode(link)?;
        serde_json::from_value(value).map_err(|e| ShareLinkError::MalformedJson(e.to_string()))
    }
}
