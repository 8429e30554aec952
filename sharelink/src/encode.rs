use crate::backend::CompressionBackend;
use crate::error::{Result, ShareLinkError};
use crate::report::CompressionReport;
use crate::types::{EncodedLink, LinkFormat};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use serde::Serialize;

/// Encode UTF-8 text to base64url (URL-safe base64 without padding).
pub(crate) fn encode_base64url(text: &str) -> String {
    URL_SAFE_NO_PAD.encode(text.as_bytes())
}

/// Deepest array/object nesting that `serde_json::from_str` accepts.
pub const MAX_NESTING_DEPTH: usize = 127;

/// Deepest array/object nesting in JSON text, ignoring brackets in strings.
fn nesting_depth(json: &str) -> usize {
    let mut depth = 0usize;
    let mut max_depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for byte in json.bytes() {
        if in_string {
            match byte {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match byte {
            b'"' => in_string = true,
            b'[' | b'{' => {
                depth += 1;
                max_depth = max_depth.max(depth);
            }
            b']' | b'}' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }

    max_depth
}

/// Serialize a document to whitespace-free JSON.
///
/// Documents nested deeper than [`MAX_NESTING_DEPTH`] are rejected, since
/// the decoder could not parse them back.
pub fn to_minified_json<T: Serialize + ?Sized>(document: &T) -> Result<String> {
    let minified =
        serde_json::to_string(document).map_err(|e| ShareLinkError::Encode(e.to_string()))?;

    let depth = nesting_depth(&minified);
    if depth > MAX_NESTING_DEPTH {
        return Err(ShareLinkError::Encode(format!(
            "nesting depth {} exceeds the limit of {}",
            depth, MAX_NESTING_DEPTH
        )));
    }
    Ok(minified)
}

/// Re-serialize JSON text without insignificant whitespace.
pub fn minify(text: &str) -> Result<String> {
    let value: serde_json::Value =
        serde_json::from_str(text).map_err(|e| ShareLinkError::MalformedJson(e.to_string()))?;
    to_minified_json(&value)
}

/// Build both candidates for `minified` and keep the shorter one.
///
/// The compressed candidate wins only when it is strictly shorter, so equal
/// lengths resolve to base64.
pub(crate) fn select_encoding(
    backend: Option<&dyn CompressionBackend>,
    minified: &str,
    input_len: usize,
) -> (EncodedLink, CompressionReport) {
    let compressed = backend.map(|backend| backend.compress(minified));
    let base64 = encode_base64url(minified);

    let compressed_len = compressed.as_ref().map(String::len);
    let base64_len = base64.len();

    let link = match compressed {
        Some(compressed) if compressed.len() < base64_len => {
            EncodedLink::new(LinkFormat::Lz, compressed)
        }
        _ => EncodedLink::new(LinkFormat::Base64, base64),
    };

    let report = CompressionReport {
        method: link.format,
        input_len,
        minified_len: minified.chars().count(),
        encoded_len: link.payload.len(),
        compressed_len,
        base64_len,
    };

    (link, report)
}

/// Encode already-minified JSON text and log the size summary.
pub(crate) fn encode_minified(
    backend: Option<&dyn CompressionBackend>,
    minified: &str,
    input_len: usize,
) -> (EncodedLink, CompressionReport) {
    if backend.is_none() {
        log::debug!("No compression backend loaded, using base64");
    }

    let (link, report) = select_encoding(backend, minified, input_len);
    log::info!("Share link encoded with {}", report);
    if let Some(compressed_len) = report.compressed_len {
        log::debug!(
            "Candidates: compressed={} base64={}",
            compressed_len,
            report.base64_len
        );
    }

    (link, report)
}
