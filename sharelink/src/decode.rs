use crate::backend::CompressionBackend;
use crate::error::{Result, ShareLinkError};
use crate::types::LinkFormat;
use base64::{
    alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
    Engine,
};
use percent_encoding::percent_decode_str;
use serde_json::Value;

const LENIENT: GeneralPurposeConfig =
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent);

/// URL-safe alphabet, padding optional.
const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::URL_SAFE, LENIENT);

/// Standard alphabet, padding optional. Older links used `btoa`.
const STANDARD_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::STANDARD, LENIENT);

/// Decode base64 in either alphabet, with or without padding.
pub(crate) fn decode_base64(payload: &str) -> Result<Vec<u8>> {
    // Query-string decoding turns '+' into a space
    let payload = payload.replace(' ', "+");

    URL_SAFE_LENIENT
        .decode(&payload)
        .or_else(|_| STANDARD_LENIENT.decode(&payload))
        .map_err(|e| ShareLinkError::InvalidBase64(e.to_string()))
}

/// Parse decoded JSON text.
pub(crate) fn parse_json(text: &str) -> Result<Value> {
    serde_json::from_str(text).map_err(|e| ShareLinkError::MalformedJson(e.to_string()))
}

/// Parse the text behind a base64 payload.
///
/// Links from the first editor versions percent-encoded the JSON before
/// base64, so text that only parses after percent-decoding is accepted too.
fn parse_base64_text(text: &str) -> Result<Value> {
    match parse_json(text) {
        Ok(value) => Ok(value),
        Err(err) => {
            if !text.contains('%') {
                return Err(err);
            }
            match percent_decode_str(text).decode_utf8() {
                Ok(unescaped) => parse_json(&unescaped).map_err(|_| err),
                Err(_) => Err(err),
            }
        }
    }
}

fn decode_base64_document(payload: &str) -> Result<Value> {
    let text = String::from_utf8(decode_base64(payload)?)?;
    parse_base64_text(&text)
}

fn decompress_document(backend: Option<&dyn CompressionBackend>, payload: &str) -> Result<Value> {
    let backend = backend.ok_or(ShareLinkError::UnsupportedFormat("lz"))?;
    let text = backend
        .decompress(payload)
        .ok_or(ShareLinkError::Decompression {
            backend: backend.name(),
        })?;
    parse_json(&text)
}

/// Decode a share link into a JSON document.
///
/// # Errors
///
/// Returns `ShareLinkError` when the link needs a missing backend, when the
/// backend rejects the payload, or when the payload does not decode to JSON.
pub fn decode(backend: Option<&dyn CompressionBackend>, link: &str) -> Result<Value> {
    let (format, payload) = LinkFormat::split(link);

    let document = match format {
        LinkFormat::Lz => decompress_document(backend, payload)?,
        LinkFormat::Base64 => decode_base64_document(payload)?,
        LinkFormat::Legacy => decode_base64_document(payload)?,
    };

    log::debug!("Decoded {} share link ({} chars)", format, link.len());
    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Rejecting;

    impl CompressionBackend for Rejecting {
        fn name(&self) -> &'static str {
            "rejecting"
        }

        fn compress(&self, text: &str) -> String {
            text.to_string()
        }

        fn decompress(&self, _payload: &str) -> Option<String> {
            None
        }
    }

    struct Identity;

    impl CompressionBackend for Identity {
        fn name(&self) -> &'static str {
            "identity"
        }

        fn compress(&self, text: &str) -> String {
            text.to_string()
        }

        fn decompress(&self, payload: &str) -> Option<String> {
            Some(payload.to_string())
        }
    }

    #[test]
    fn test_decode_base64_alphabets() {
        assert_eq!(decode_base64("eyJhIjoxfQ").unwrap(), br#"{"a":1}"#);
        assert_eq!(decode_base64("eyJhIjoxfQ==").unwrap(), br#"{"a":1}"#);
        // "?>?" encodes to "Pz4/" in the standard alphabet and "Pz4_" in URL-safe
        assert_eq!(decode_base64("Pz4/").unwrap(), b"?>?");
        assert_eq!(decode_base64("Pz4_").unwrap(), b"?>?");
        // "~~>" encodes to "fn4+"
        assert_eq!(decode_base64("fn4 ").unwrap(), b"~~>");
    }

    #[test]
    fn test_decode_base64_invalid() {
        assert!(matches!(
            decode_base64("not base64!"),
            Err(ShareLinkError::InvalidBase64(_))
        ));
    }

    #[test]
    fn test_parse_base64_text_percent_encoded() {
        assert_eq!(
            parse_base64_text("%7B%22a%22%3A1%7D").unwrap(),
            json!({"a": 1})
        );
        // A literal '%' inside valid JSON stays as is
        assert_eq!(
            parse_base64_text(r#"{"p":"100%25"}"#).unwrap(),
            json!({"p": "100%25"})
        );
    }

    #[test]
    fn test_parse_base64_text_malformed() {
        assert!(matches!(
            parse_base64_text("%7B%22a"),
            Err(ShareLinkError::MalformedJson(_))
        ));
        assert!(matches!(
            parse_base64_text("{not json"),
            Err(ShareLinkError::MalformedJson(_))
        ));
    }

    #[test]
    fn test_decode_lz_without_backend() {
        assert!(matches!(
            decode(None, "lz:N4IgzgpgTg"),
            Err(ShareLinkError::UnsupportedFormat("lz"))
        ));
    }

    #[test]
    fn test_decode_lz_rejected() {
        assert!(matches!(
            decode(Some(&Rejecting), "lz:not-a-valid-payload"),
            Err(ShareLinkError::Decompression {
                backend: "rejecting"
            })
        ));
    }

    #[test]
    fn test_decode_lz_malformed_json() {
        assert!(matches!(
            decode(Some(&Identity), "lz:{oops"),
            Err(ShareLinkError::MalformedJson(_))
        ));
        assert_eq!(
            decode(Some(&Identity), r#"lz:{"a":[1,2]}"#).unwrap(),
            json!({"a": [1, 2]})
        );
    }

    #[test]
    fn test_decode_b64_does_not_need_backend() {
        assert_eq!(
            decode(None, "b64:eyJhIjoxLCJiIjoieCJ9").unwrap(),
            json!({"a": 1, "b": "x"})
        );
    }

    #[test]
    fn test_decode_legacy() {
        assert_eq!(
            decode(None, "JTdCJTIyYSUyMiUzQTElMkMlMjJiJTIyJTNBJTIyeCUyMiU3RA==").unwrap(),
            json!({"a": 1, "b": "x"})
        );
    }

    #[test]
    fn test_decode_invalid_utf8() {
        // 0xFF 0xFE
        assert!(matches!(
            decode(None, "b64:__4"),
            Err(ShareLinkError::InvalidUtf8(_))
        ));
    }
}
