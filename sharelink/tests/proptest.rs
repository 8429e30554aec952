use openapi_sharelink::{CompressionBackend, LinkFormat, ShareLinkCodec};
use proptest::prelude::*;
use serde_json::{Map, Number, Value};
use std::sync::Arc;

fn arbitrary_leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| Value::Number(n.into())),
        (-1.0e9f64..1.0e9f64)
            .prop_filter_map("finite", Number::from_f64)
            .prop_map(Value::Number),
        "\\PC{0,24}".prop_map(Value::String),
    ]
}

fn arbitrary_document() -> impl Strategy<Value = Value> {
    arbitrary_leaf().prop_recursive(4, 64, 8, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..8).prop_map(Value::Array),
            prop::collection::vec(("[a-zA-Z0-9_/{}$.-]{1,12}", inner), 0..8)
                .prop_map(|entries| Value::Object(entries.into_iter().collect::<Map<_, _>>())),
        ]
    })
}

/// Backend whose output is always exactly as long as the base64 candidate.
struct SameLength;

impl CompressionBackend for SameLength {
    fn name(&self) -> &'static str {
        "same-length"
    }

    fn compress(&self, text: &str) -> String {
        let base64_len = (text.len() * 4 + 2) / 3;
        "z".repeat(base64_len)
    }

    fn decompress(&self, _payload: &str) -> Option<String> {
        None
    }
}

proptest! {
    #[test]
    fn test_roundtrip_with_backend(document in arbitrary_document()) {
        let codec = ShareLinkCodec::default();
        let link = codec.encode(&document).unwrap();
        prop_assert_eq!(codec.decode(&link).unwrap(), document);
    }

    #[test]
    fn test_roundtrip_without_backend(document in arbitrary_document()) {
        let codec = ShareLinkCodec::without_backend();
        let link = codec.encode(&document).unwrap();

        prop_assert!(link.starts_with("b64:"));
        prop_assert!(!link.contains('='));
        prop_assert_eq!(codec.decode(&link).unwrap(), document);
    }

    #[test]
    fn test_selected_payload_is_shortest(document in arbitrary_document()) {
        let codec = ShareLinkCodec::default();
        let (link, report) = codec.encode_with_report(&document).unwrap();

        let compressed_len = report.compressed_len.unwrap();
        prop_assert_eq!(report.encoded_len, compressed_len.min(report.base64_len));
        if compressed_len < report.base64_len {
            prop_assert_eq!(link.format, LinkFormat::Lz);
        } else {
            prop_assert_eq!(link.format, LinkFormat::Base64);
        }
    }

    #[test]
    fn test_ties_prefer_base64(document in arbitrary_document()) {
        let codec = ShareLinkCodec::with_backend(Arc::new(SameLength));
        let (link, report) = codec.encode_with_report(&document).unwrap();

        prop_assert_eq!(report.compressed_len, Some(report.base64_len));
        prop_assert_eq!(link.format, LinkFormat::Base64);
    }

    #[test]
    fn test_link_is_url_safe(document in arbitrary_document()) {
        let link = ShareLinkCodec::default().encode(&document).unwrap();
        prop_assert!(link
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_:+$".contains(c)));
    }
}
