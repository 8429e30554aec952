use openapi_sharelink::MAX_SHARE_URL_LEN;
use serde::Deserialize;
use std::io;
use std::path::Path;

const DEFAULT_BASE_URL: &str = "http://localhost:3000/";

/// Settings loaded from an optional TOML file.
///
/// ```toml
/// base_url = "https://editor.example.com/"
/// max_url_length = 16384
/// compression = true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Page that opens share links
    pub base_url: String,
    /// Share URLs longer than this need confirmation
    pub max_url_length: usize,
    /// Whether the compression backend may be used
    pub compression: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            max_url_length: MAX_SHARE_URL_LEN,
            compression: true,
        }
    }
}

impl Settings {
    pub fn from_toml(text: &str) -> io::Result<Self> {
        let settings: Settings =
            toml::from_str(text).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_file(path: impl AsRef<Path>) -> io::Result<Self> {
        Self::from_toml(&std::fs::read_to_string(path)?)
    }

    fn validate(&self) -> io::Result<()> {
        if self.max_url_length == 0 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "max_url_length must be positive",
            ));
        }
        Ok(())
    }
}
