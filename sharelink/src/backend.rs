//! Pluggable compression backends.
//!
//! A backend turns minified JSON text into a URL-safe string and back. The
//! codec never assumes one is present: availability is an explicit
//! `Option`, and [`BackendSlot`] models a backend that becomes available
//! some time after start-up.

use once_cell::sync::OnceCell;
use std::fmt;
use std::sync::Arc;

/// Text compression capability producing URL-safe output.
pub trait CompressionBackend: Send + Sync {
    /// Short identifier used in logs and errors.
    fn name(&self) -> &'static str;

    /// Compress `text` into a string that can be embedded in a URL as is.
    fn compress(&self, text: &str) -> String;

    /// Invert [`CompressionBackend::compress`].
    ///
    /// Returns `None` when the payload cannot be decompressed. Implementations
    /// must not panic on corrupt input.
    fn decompress(&self, payload: &str) -> Option<String>;
}

impl fmt::Debug for dyn CompressionBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CompressionBackend({})", self.name())
    }
}

/// Backend compatible with LZ-string's `compressToEncodedURIComponent`.
#[cfg(feature = "lz-string")]
#[derive(Debug, Default, Clone, Copy)]
pub struct LzStringBackend;

#[cfg(feature = "lz-string")]
impl LzStringBackend {
    /// Alphabet of `compressToEncodedURIComponent` output.
    fn is_uri_alphabet(c: char) -> bool {
        c.is_ascii_alphanumeric() || c == '+' || c == '-' || c == '$'
    }
}

#[cfg(feature = "lz-string")]
impl CompressionBackend for LzStringBackend {
    fn name(&self) -> &'static str {
        "lz-string"
    }

    fn compress(&self, text: &str) -> String {
        lz_str::compress_to_encoded_uri_component(text)
    }

    fn decompress(&self, payload: &str) -> Option<String> {
        // Query-string decoding turns '+' into a space
        let payload = payload.replace(' ', "+");
        if payload.is_empty() || !payload.chars().all(Self::is_uri_alphabet) {
            return None;
        }

        let wide = lz_str::decompress_from_encoded_uri_component(payload.as_str())?;
        if wide.is_empty() {
            return None;
        }
        String::from_utf16(&wide).ok()
    }
}

/// The backend used when nothing else is configured.
pub fn default_backend() -> Option<Arc<dyn CompressionBackend>> {
    #[cfg(feature = "lz-string")]
    {
        Some(Arc::new(LzStringBackend))
    }
    #[cfg(not(feature = "lz-string"))]
    {
        None
    }
}

/// Set-once holder for a backend that may finish loading after start-up.
///
/// Readers take a snapshot per call, so an encode or decode racing the
/// installation sees either the old or the new state, never a mix.
#[derive(Default)]
pub struct BackendSlot {
    backend: OnceCell<Arc<dyn CompressionBackend>>,
}

impl BackendSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the backend. Returns `false` if one was already installed.
    pub fn install(&self, backend: Arc<dyn CompressionBackend>) -> bool {
        let name = backend.name();
        let installed = self.backend.set(backend).is_ok();
        if installed {
            log::debug!("Compression backend '{}' is loaded", name);
        }
        installed
    }

    pub fn is_loaded(&self) -> bool {
        self.backend.get().is_some()
    }

    pub fn snapshot(&self) -> Option<Arc<dyn CompressionBackend>> {
        self.backend.get().cloned()
    }

    /// Codec bound to the current availability.
    pub fn codec(&self) -> crate::ShareLinkCodec {
        crate::ShareLinkCodec::new(self.snapshot())
    }
}

impl fmt::Debug for BackendSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendSlot")
            .field("backend", &self.backend.get().map(|b| b.name()))
            .finish()
    }
}
