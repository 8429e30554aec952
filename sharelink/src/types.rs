use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Separator between the format tag and the payload.
pub const TAG_SEPARATOR: char = ':';

/// Encoding used for the payload of a share link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkFormat {
    /// Output of the compression backend (`lz:` prefix).
    Lz,
    /// URL-safe base64 of the minified JSON (`b64:` prefix).
    #[serde(rename = "b64")]
    Base64,
    /// Untagged base64 produced before format tags existed.
    Legacy,
}

impl LinkFormat {
    /// Tag written in front of the payload, `None` for the legacy form.
    pub fn tag(self) -> Option<&'static str> {
        match self {
            LinkFormat::Lz => Some("lz"),
            LinkFormat::Base64 => Some("b64"),
            LinkFormat::Legacy => None,
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "lz" => Some(LinkFormat::Lz),
            "b64" => Some(LinkFormat::Base64),
            _ => None,
        }
    }

    /// Split a raw link into its format and payload.
    ///
    /// Anything without a recognized `tag:` prefix is treated as a legacy
    /// link, and the whole input becomes the payload.
    pub fn split(link: &str) -> (Self, &str) {
        if let Some((tag, payload)) = link.split_once(TAG_SEPARATOR) {
            if let Some(format) = Self::from_tag(tag) {
                return (format, payload);
            }
        }
        (LinkFormat::Legacy, link)
    }
}

impl fmt::Display for LinkFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkFormat::Lz => write!(f, "lz"),
            LinkFormat::Base64 => write!(f, "b64"),
            LinkFormat::Legacy => write!(f, "legacy"),
        }
    }
}

/// A share link: format tag plus URL-safe payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedLink {
    pub format: LinkFormat,
    pub payload: String,
}

impl EncodedLink {
    pub fn new(format: LinkFormat, payload: String) -> Self {
        EncodedLink { format, payload }
    }

    /// Length of the link as it appears in a URL, tag included.
    pub fn len(&self) -> usize {
        self.format.tag().map_or(0, |tag| tag.len() + 1) + self.payload.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for EncodedLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.format.tag() {
            Some(tag) => write!(f, "{}{}{}", tag, TAG_SEPARATOR, self.payload),
            None => write!(f, "{}", self.payload),
        }
    }
}

impl FromStr for EncodedLink {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Infallible> {
        let (format, payload) = LinkFormat::split(s);
        Ok(EncodedLink::new(format, payload.to_string()))
    }
}
