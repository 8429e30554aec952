use log::{debug, LevelFilter};
use openapi_sharelink::backend::default_backend;
use openapi_sharelink::{BackendSlot, ShareLinkCodec};
use std::io;

mod commands;
mod log_utils;
mod settings;

use commands::{DecodeOptions, EncodeOptions, Outcome};
use settings::Settings;

const VERSION_STRING: &str = env!("CARGO_PKG_VERSION");
const VERSION_PARAM_NAME: &str = "show_version";
const LOG_LEVEL_PARAM_NAME: &str = "log_level";
const LOG_FILE_PARAM_NAME: &str = "log_file";
const SETTINGS_PARAM_NAME: &str = "settings";
const NO_COMPRESSION_PARAM_NAME: &str = "no_compression";
const INPUT_PARAM_NAME: &str = "input";
const OUTPUT_PARAM_NAME: &str = "output";
const BASE_URL_PARAM_NAME: &str = "base_url";
const ASSUME_YES_PARAM_NAME: &str = "yes";
const LINK_ONLY_PARAM_NAME: &str = "link_only";
const FALLBACK_PARAM_NAME: &str = "fallback";

const ENCODE_COMMAND: &str = "encode";
const DECODE_COMMAND: &str = "decode";
const EXAMPLE_COMMAND: &str = "example";

const EXIT_FAILURE: i32 = 1;
const EXIT_CANCELLED: i32 = 2;

fn output_arg() -> clap::Arg {
    clap::Arg::new(OUTPUT_PARAM_NAME)
        .short('o')
        .long("output")
        .action(clap::ArgAction::Set)
        .help("Export the document to this file instead of printing it")
}

fn command() -> clap::Command {
    clap::Command::new("openapi-share")
        .about("Create and open OpenAPI share links")
        .args(&[
            // `-v` prints the bare version, unlike clap's built-in flag
            clap::Arg::new(VERSION_PARAM_NAME)
                .short('v')
                .long("version")
                .action(clap::ArgAction::SetTrue)
                .help("Print the version of this software and exit"),
            clap::Arg::new(LOG_LEVEL_PARAM_NAME)
                .short('l')
                .long("loglvl")
                .action(clap::ArgAction::Set)
                .value_parser(["info", "debug", "trace"])
                .default_value("info")
                .help("Logging level"),
            clap::Arg::new(LOG_FILE_PARAM_NAME)
                .long("logfile")
                .action(clap::ArgAction::Set)
                .help("File path for storing logs. If not specified, the logs are printed to stderr"),
            clap::Arg::new(SETTINGS_PARAM_NAME)
                .long("settings")
                .action(clap::ArgAction::Set)
                .help("Path to a TOML settings file"),
            clap::Arg::new(NO_COMPRESSION_PARAM_NAME)
                .long("no-compression")
                .action(clap::ArgAction::SetTrue)
                .help("Do not load the compression backend: links are written as base64 and lz: links cannot be opened"),
        ])
        .subcommand(
            clap::Command::new(ENCODE_COMMAND)
                .about("Encode a JSON document into a share URL")
                .args(&[
                    clap::Arg::new(INPUT_PARAM_NAME)
                        .action(clap::ArgAction::Set)
                        .help("Path to the JSON document. Reads stdin if omitted or '-'"),
                    clap::Arg::new(BASE_URL_PARAM_NAME)
                        .long("base-url")
                        .action(clap::ArgAction::Set)
                        .help("Page that opens share links. Overrides the settings file"),
                    clap::Arg::new(ASSUME_YES_PARAM_NAME)
                        .short('y')
                        .long("yes")
                        .action(clap::ArgAction::SetTrue)
                        .help("Do not ask for confirmation when the URL is longer than advised"),
                    clap::Arg::new(LINK_ONLY_PARAM_NAME)
                        .long("link-only")
                        .action(clap::ArgAction::SetTrue)
                        .help("Print the encoded link without the base URL"),
                ]),
        )
        .subcommand(
            clap::Command::new(DECODE_COMMAND)
                .about("Decode a share URL or link into a JSON document")
                .args(&[
                    clap::Arg::new(INPUT_PARAM_NAME)
                        .action(clap::ArgAction::Set)
                        .required(true)
                        .help("Share URL, or the value of its 'schema' parameter"),
                    output_arg(),
                    clap::Arg::new(FALLBACK_PARAM_NAME)
                        .long("fallback")
                        .action(clap::ArgAction::SetTrue)
                        .help("Show the example document with a warning instead of failing"),
                ]),
        )
        .subcommand(
            clap::Command::new(EXAMPLE_COMMAND)
                .about("Print the example OpenAPI document")
                .arg(output_arg()),
        )
        .subcommand_required(false)
        .disable_version_flag(true)
}

fn make_codec(compression: bool) -> ShareLinkCodec {
    let slot = BackendSlot::new();
    if compression {
        if let Some(backend) = default_backend() {
            slot.install(backend);
        }
    }
    if !slot.is_loaded() {
        debug!("Compression is disabled, links are written as base64");
    }
    slot.codec()
}

fn main() {
    let args = command().get_matches();

    if Some(true) == args.get_one::<bool>(VERSION_PARAM_NAME).copied() {
        println!("{}", VERSION_STRING);
        return;
    }

    let _guard = log_utils::LogFlushGuard;
    let logger_result = match args.get_one::<String>(LOG_FILE_PARAM_NAME) {
        None => log::set_logger(log_utils::make_stderr_logger()),
        Some(file) => match log_utils::make_file_logger(file) {
            Ok(logger) => log::set_logger(logger),
            Err(e) => {
                eprintln!("Error: couldn't open the logging file {}: {}", file, e);
                std::process::exit(EXIT_FAILURE);
            }
        },
    };
    if let Err(e) = logger_result {
        eprintln!("Error: couldn't set logger: {}", e);
        std::process::exit(EXIT_FAILURE);
    }

    log::set_max_level(
        match args
            .get_one::<String>(LOG_LEVEL_PARAM_NAME)
            .map(String::as_str)
        {
            Some("debug") => LevelFilter::Debug,
            Some("trace") => LevelFilter::Trace,
            _ => LevelFilter::Info,
        },
    );

    let settings = match args.get_one::<String>(SETTINGS_PARAM_NAME) {
        None => Settings::default(),
        Some(path) => match Settings::from_file(path) {
            Ok(settings) => settings,
            Err(e) => {
                eprintln!("Error: couldn't load the settings file {}: {}", path, e);
                std::process::exit(EXIT_FAILURE);
            }
        },
    };

    let compression = settings.compression && !args.get_flag(NO_COMPRESSION_PARAM_NAME);
    let codec = make_codec(compression);
    let mut stdout = io::stdout().lock();

    let result = match args.subcommand() {
        Some((ENCODE_COMMAND, sub)) => {
            let options = EncodeOptions {
                input: sub.get_one::<String>(INPUT_PARAM_NAME).map(String::as_str),
                base_url: sub
                    .get_one::<String>(BASE_URL_PARAM_NAME)
                    .map(String::as_str)
                    .unwrap_or(settings.base_url.as_str()),
                max_url_length: settings.max_url_length,
                link_only: sub.get_flag(LINK_ONLY_PARAM_NAME),
                assume_yes: sub.get_flag(ASSUME_YES_PARAM_NAME),
            };
            commands::encode(
                &codec,
                &options,
                &mut stdout,
                &mut io::BufReader::new(io::stdin()),
            )
        }
        Some((DECODE_COMMAND, sub)) => {
            let options = DecodeOptions {
                input: sub
                    .get_one::<String>(INPUT_PARAM_NAME)
                    .map(String::as_str)
                    .unwrap_or_default(),
                output: sub.get_one::<String>(OUTPUT_PARAM_NAME).map(String::as_str),
                fallback: sub.get_flag(FALLBACK_PARAM_NAME),
            };
            commands::decode(&codec, &options, &mut stdout).map(|()| Outcome::Done)
        }
        Some((EXAMPLE_COMMAND, sub)) => commands::example(
            sub.get_one::<String>(OUTPUT_PARAM_NAME).map(String::as_str),
            &mut stdout,
        )
        .map(|()| Outcome::Done),
        _ => {
            let _ = command().print_help();
            Ok(Outcome::Done)
        }
    };

    let exit_code = match result {
        Ok(Outcome::Done) => 0,
        Ok(Outcome::Cancelled) => {
            eprintln!("Cancelled");
            EXIT_CANCELLED
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            EXIT_FAILURE
        }
    };

    drop(_guard);
    std::process::exit(exit_code);
}
