//! Mochi VT Headless Runner
//!
//! Reads a byte stream from a file or stdin, interprets it and prints the
//! final screen as text or JSON.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use mochi_vt::headless::{HeadlessRunner, OutputFormat};
use mochi_vt::Config;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

struct Args {
    input: Option<PathBuf>,
    config: Option<PathBuf>,
    format: OutputFormat,
    cols: Option<usize>,
    rows: Option<usize>,
    replies: bool,
    help: bool,
}

fn parse_args() -> Args {
    let mut args = Args {
        input: None,
        config: None,
        format: OutputFormat::Text,
        cols: None,
        rows: None,
        replies: false,
        help: false,
    };
    let argv: Vec<String> = std::env::args().skip(1).collect();

    let mut i = 0;
    while i < argv.len() {
        match argv[i].as_str() {
            "-h" | "--help" => args.help = true,
            "-j" | "--json" => args.format = OutputFormat::Json,
            "-t" | "--text" => args.format = OutputFormat::Text,
            "--replies" => args.replies = true,
            "-c" | "--cols" => {
                i += 1;
                args.cols = argv.get(i).and_then(|v| v.parse().ok());
            },
            "-r" | "--rows" => {
                i += 1;
                args.rows = argv.get(i).and_then(|v| v.parse().ok());
            },
            "--config" => {
                i += 1;
                args.config = argv.get(i).map(PathBuf::from);
            },
            other => {
                // Treat as input file if no flag
                if args.input.is_none() && !other.starts_with('-') {
                    args.input = Some(PathBuf::from(other));
                } else {
                    eprintln!("ignoring unknown argument '{other}'");
                }
            },
        }
        i += 1;
    }
    args
}

fn print_help() {
    eprintln!(
        r#"mochi-vt-headless - Run the VT emulation engine without a window

USAGE:
    mochi-vt-headless [OPTIONS] [FILE]

OPTIONS:
    -h, --help            Show this help message
    -j, --json            Print a JSON snapshot
    -t, --text            Print screen text (default)
    -c, --cols <N>        Terminal columns
    -r, --rows <N>        Terminal rows
        --config <FILE>   Load a .toml or .json configuration
        --replies         Also print the bytes sent back to the host

Reads stdin when no FILE is given. Set RUST_LOG=debug to trace ignored
sequences."#
    );
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let args = parse_args();
    if args.help {
        print_help();
        return ExitCode::SUCCESS;
    }

    let mut config = match &args.config {
        Some(path) => match Config::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error loading config '{}': {}", path.display(), e);
                return ExitCode::FAILURE;
            },
        },
        None => Config::default(),
    };
    if let Some(cols) = args.cols {
        config.columns = cols;
    }
    if let Some(rows) = args.rows {
        config.rows = rows;
    }

    let mut runner = HeadlessRunner::new(&config);
    let result = match &args.input {
        Some(path) => std::fs::File::open(path).map_err(Into::into).and_then(|file| runner.run(file)),
        None => runner.run(io::stdin().lock()),
    };
    if let Err(e) = result {
        eprintln!("Error reading input: {e}");
        return ExitCode::FAILURE;
    }

    let stdout = io::stdout();
    if let Err(e) = runner.write_to(stdout.lock(), args.format, args.replies) {
        eprintln!("Error writing output: {e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
