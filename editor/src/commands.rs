use log::{debug, warn};
use openapi_sharelink::document::{export_file, to_pretty};
use openapi_sharelink::{
    example_document, extract_link, load_from_query, load_from_url, Document, Result,
    ShareLinkCodec, ShareLinkError, ShareUrl, SCHEMA_PARAM,
};
use std::io::{self, BufRead, Read, Write};

/// How a command finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Done,
    /// The user declined to continue.
    Cancelled,
}

pub struct EncodeOptions<'a> {
    /// Path of the JSON file, stdin if `None` or `-`
    pub input: Option<&'a str>,
    pub base_url: &'a str,
    pub max_url_length: usize,
    /// Print only the encoded link instead of a full URL
    pub link_only: bool,
    /// Do not ask for confirmation on long URLs
    pub assume_yes: bool,
}

pub struct DecodeOptions<'a> {
    /// A share URL or a bare link
    pub input: &'a str,
    /// Export path, stdout if `None`
    pub output: Option<&'a str>,
    /// Show the example document instead of failing
    pub fallback: bool,
}

fn reads_stdin(input: Option<&str>) -> bool {
    matches!(input, None | Some("-"))
}

fn read_input(input: Option<&str>) -> Result<String> {
    match input {
        None | Some("-") => {
            let mut text = String::new();
            io::stdin().read_to_string(&mut text)?;
            Ok(text)
        }
        Some(path) => Ok(std::fs::read_to_string(path)?),
    }
}

fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

fn confirm_long_url(
    share: &ShareUrl,
    limit: usize,
    answer: &mut impl BufRead,
    prompt: &mut impl Write,
) -> Result<bool> {
    write!(
        prompt,
        "The share URL is {} characters long (limit {}).\n{}\n\
        Some servers may reject it. Continue? [y/N] ",
        share.len(),
        limit,
        share.report
    )?;
    prompt.flush()?;

    let mut line = String::new();
    answer.read_line(&mut line)?;
    Ok(matches!(line.trim().to_lowercase().as_str(), "y" | "yes"))
}

/// Encode a JSON document into a share URL.
pub fn encode(
    codec: &ShareLinkCodec,
    options: &EncodeOptions,
    out: &mut impl Write,
    answer: &mut impl BufRead,
) -> Result<Outcome> {
    let text = read_input(options.input)?;
    encode_text(codec, options, &text, out, answer)
}

fn encode_text(
    codec: &ShareLinkCodec,
    options: &EncodeOptions,
    text: &str,
    out: &mut impl Write,
    answer: &mut impl BufRead,
) -> Result<Outcome> {
    let (link, report) = codec.encode_text(text)?;

    if options.link_only {
        writeln!(out, "{}", link)?;
        return Ok(Outcome::Done);
    }

    let share = ShareUrl::new(options.base_url, link, report)?;
    debug!("Share URL length: {} chars", share.len());

    if share.exceeds_limit(options.max_url_length) {
        warn!(
            "Share URL is {} chars long, over the advised {} chars",
            share.len(),
            options.max_url_length
        );
        if !options.assume_yes && reads_stdin(options.input) {
            // The document consumed stdin, so no answer can be read
            return Err(ShareLinkError::Io(io::Error::new(
                io::ErrorKind::InvalidInput,
                "cannot confirm a long URL when the document comes from stdin, pass --yes",
            )));
        }
        if !options.assume_yes
            && !confirm_long_url(&share, options.max_url_length, answer, &mut io::stderr())?
        {
            return Ok(Outcome::Cancelled);
        }
    }

    writeln!(out, "{}", share.url)?;
    Ok(Outcome::Done)
}

fn write_document(document: &Document, output: Option<&str>, out: &mut impl Write) -> Result<()> {
    match output {
        Some(path) => {
            export_file(path, document)?;
            debug!("Document exported to {}", path);
        }
        None => writeln!(out, "{}", to_pretty(document)?)?,
    }
    Ok(())
}

/// Decode a share URL or link and print or export the document.
pub fn decode(codec: &ShareLinkCodec, options: &DecodeOptions, out: &mut impl Write) -> Result<()> {
    let input = options.input.trim();

    let document = if options.fallback {
        let loaded = if is_url(input) {
            load_from_url(codec, input)
        } else {
            load_from_query(codec, Some(input))
        };
        if let Some(warning) = loaded.warning() {
            eprintln!("Warning: {}", warning);
        }
        loaded.into_document()
    } else {
        let link = if is_url(input) {
            extract_link(input)?.ok_or(ShareLinkError::MissingLink(SCHEMA_PARAM))?
        } else {
            input.to_string()
        };
        codec.decode(&link)?
    };

    write_document(&document, options.output, out)
}

/// Print or export the example document.
pub fn example(output: Option<&str>, out: &mut impl Write) -> Result<()> {
    write_document(&example_document(), output, out)
}
