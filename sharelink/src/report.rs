use crate::types::LinkFormat;
use std::fmt;

/// Size summary of a single encode call.
///
/// Advisory only: nothing in the codec reads it back.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct CompressionReport {
    /// Format that won the comparison.
    pub method: LinkFormat,
    /// Characters in the text handed to the encoder, before minification.
    pub input_len: usize,
    /// Characters in the minified JSON.
    pub minified_len: usize,
    /// Characters in the selected payload, tag excluded.
    pub encoded_len: usize,
    /// Characters in the compressed candidate, if a backend produced one.
    pub compressed_len: Option<usize>,
    /// Characters in the base64 candidate.
    pub base64_len: usize,
}

impl CompressionReport {
    /// Share of the input saved by the encoding, in percent.
    ///
    /// Negative when the payload is longer than the input.
    pub fn savings_percent(&self) -> f64 {
        if self.input_len == 0 {
            return 0.0;
        }
        (1.0 - self.encoded_len as f64 / self.input_len as f64) * 100.0
    }
}

impl fmt::Display for CompressionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} -> {} chars ({}% saved)",
            self.method,
            self.input_len,
            self.encoded_len,
            self.savings_percent().round()
        )
    }
}
