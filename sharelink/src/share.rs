use crate::error::Result;
use crate::report::CompressionReport;
use crate::types::EncodedLink;
use url::Url;

/// Query parameter that carries the encoded link.
pub const SCHEMA_PARAM: &str = "schema";

/// URLs longer than this may be rejected by some servers and browsers.
///
/// A soft limit: callers are expected to warn and ask before sharing.
pub const MAX_SHARE_URL_LEN: usize = 16384;

/// A ready-to-share URL along with how it was produced.
#[derive(Debug, Clone)]
pub struct ShareUrl {
    pub url: String,
    pub link: EncodedLink,
    pub report: CompressionReport,
}

impl ShareUrl {
    pub fn new(base_url: &str, link: EncodedLink, report: CompressionReport) -> Result<Self> {
        let url = build_share_url(base_url, &link)?;
        Ok(ShareUrl { url, link, report })
    }

    pub fn len(&self) -> usize {
        self.url.len()
    }

    pub fn is_empty(&self) -> bool {
        self.url.is_empty()
    }

    pub fn exceeds_limit(&self, limit: usize) -> bool {
        self.url.len() > limit
    }
}

/// Put `link` into the `schema` parameter of `base_url`.
///
/// Any query or fragment already present on the base is dropped, so sharing
/// from a page that was itself opened through a link does not nest links.
pub fn build_share_url(base_url: &str, link: &EncodedLink) -> Result<String> {
    let mut url = Url::parse(base_url)?;
    url.set_fragment(None);
    url.set_query(None);
    url.query_pairs_mut()
        .append_pair(SCHEMA_PARAM, &link.to_string());
    Ok(url.into())
}

/// Read the encoded link out of a share URL, if it has one.
pub fn extract_link(url: &str) -> Result<Option<String>> {
    let url = Url::parse(url)?;
    let link = url
        .query_pairs()
        .find(|(key, _)| key == SCHEMA_PARAM)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty());
    Ok(link)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ShareLinkError;
    use crate::types::LinkFormat;

    fn b64_link(payload: &str) -> EncodedLink {
        EncodedLink::new(LinkFormat::Base64, payload.to_string())
    }

    #[test]
    fn test_build_share_url() {
        let url = build_share_url("https://editor.example.com/", &b64_link("eyJhIjoxfQ")).unwrap();
        assert_eq!(url, "https://editor.example.com/?schema=b64%3AeyJhIjoxfQ");
    }

    #[test]
    fn test_build_share_url_replaces_query_and_fragment() {
        let url = build_share_url(
            "https://editor.example.com/app?schema=old&tab=preview#top",
            &b64_link("e30"),
        )
        .unwrap();
        assert_eq!(url, "https://editor.example.com/app?schema=b64%3Ae30");
    }

    #[test]
    fn test_build_share_url_escapes_plus() {
        let link = EncodedLink::new(LinkFormat::Lz, "N4Ig+A$".to_string());
        let url = build_share_url("https://editor.example.com/", &link).unwrap();
        assert_eq!(url, "https://editor.example.com/?schema=lz%3AN4Ig%2BA%24");
        assert_eq!(extract_link(&url).unwrap().as_deref(), Some("lz:N4Ig+A$"));
    }

    #[test]
    fn test_build_share_url_invalid_base() {
        assert!(matches!(
            build_share_url("not a url", &b64_link("e30")),
            Err(ShareLinkError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_extract_link() {
        assert_eq!(
            extract_link("https://editor.example.com/?tab=x&schema=b64:e30")
                .unwrap()
                .as_deref(),
            Some("b64:e30")
        );
        assert_eq!(extract_link("https://editor.example.com/").unwrap(), None);
        assert_eq!(
            extract_link("https://editor.example.com/?schema=").unwrap(),
            None
        );
    }

    #[test]
    fn test_extract_link_unescaped_plus_becomes_space() {
        let link = extract_link("https://editor.example.com/?schema=fn4+").unwrap();
        assert_eq!(link.as_deref(), Some("fn4 "));
    }

    #[test]
    fn test_share_url_limit() {
        let report = CompressionReport {
            method: LinkFormat::Base64,
            input_len: 2,
            minified_len: 2,
            encoded_len: 3,
            compressed_len: None,
            base64_len: 3,
        };
        let share = ShareUrl::new("https://e.example/", b64_link("e30"), report).unwrap();
        assert_eq!(share.url, "https://e.example/?schema=b64%3Ae30");
        assert!(!share.exceeds_limit(MAX_SHARE_URL_LEN));
        assert!(share.exceeds_limit(10));
    }
}
