use crate::codec::ShareLinkCodec;
use crate::document::{example_document, Document};
use crate::error::ShareLinkError;
use crate::share::extract_link;

/// Message shown when a shared link could not be opened.
pub const FALLBACK_WARNING: &str =
    "Failed to load the shared schema. The example document is shown instead.";

/// Outcome of opening the editor with an optional share link.
#[derive(Debug)]
pub enum LoadedDocument {
    /// The link decoded successfully.
    Shared(Document),
    /// No link was given.
    Default(Document),
    /// The link could not be decoded; the example document stands in.
    Fallback {
        document: Document,
        error: ShareLinkError,
    },
}

impl LoadedDocument {
    pub fn document(&self) -> &Document {
        match self {
            LoadedDocument::Shared(document)
            | LoadedDocument::Default(document)
            | LoadedDocument::Fallback { document, .. } => document,
        }
    }

    pub fn into_document(self) -> Document {
        match self {
            LoadedDocument::Shared(document)
            | LoadedDocument::Default(document)
            | LoadedDocument::Fallback { document, .. } => document,
        }
    }

    pub fn error(&self) -> Option<&ShareLinkError> {
        match self {
            LoadedDocument::Fallback { error, .. } => Some(error),
            _ => None,
        }
    }

    /// User-facing warning, present only for fallbacks.
    pub fn warning(&self) -> Option<&'static str> {
        self.error().map(|_| FALLBACK_WARNING)
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, LoadedDocument::Fallback { .. })
    }
}

fn fallback(error: ShareLinkError) -> LoadedDocument {
    log::warn!("Couldn't load shared schema: {}", error);
    LoadedDocument::Fallback {
        document: example_document(),
        error,
    }
}

/// Decode the value of the `schema` query parameter, falling back to the
/// example document on any failure.
pub fn load_from_query(codec: &ShareLinkCodec, link: Option<&str>) -> LoadedDocument {
    match link {
        None | Some("") => LoadedDocument::Default(example_document()),
        Some(link) => match codec.decode(link) {
            Ok(document) => LoadedDocument::Shared(document),
            Err(e) => fallback(e),
        },
    }
}

/// Same as [`load_from_query`], starting from a full share URL.
pub fn load_from_url(codec: &ShareLinkCodec, url: &str) -> LoadedDocument {
    match extract_link(url) {
        Ok(link) => load_from_query(codec, link.as_deref()),
        Err(e) => fallback(e),
    }
}
