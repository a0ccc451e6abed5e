use std::io::{self, BufRead, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use clap::{Parser, Subcommand};
use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{error, info};

use resolve_js_modules::buffer::TextBuffer;
use resolve_js_modules::completion::{CompletionEntry, CompletionSession};
use resolve_js_modules::config::Config;
use resolve_js_modules::logging;
use resolve_js_modules::output::{OutputFormat, OutputFormatter};
use resolve_js_modules::parser;
use resolve_js_modules::resolver::absolute_path;

#[derive(Parser)]
#[command(name = "resolve-js-modules")]
#[command(about = "Completions for the exports of namespace-imported ES modules")]
#[command(version)]
struct Cli {
    /// Directory holding .resolvejsrc.json
    #[arg(short, long, global = true)]
    root: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Complete at one or more offsets of a buffer
    Complete {
        /// The buffer's file
        file: PathBuf,

        /// Character offset of a cursor (repeatable, defaults to end of buffer)
        #[arg(short, long)]
        offset: Vec<usize>,

        /// Read the buffer text from stdin instead of the file
        #[arg(long)]
        stdin: bool,

        /// Output format: json, list
        #[arg(short, long, default_value = "json")]
        format: String,
    },

    /// List the named exports of a module
    Exports {
        /// The module file
        file: PathBuf,

        /// Output format: json, list
        #[arg(short, long, default_value = "list")]
        format: String,
    },

    /// Answer JSON completion requests on stdin, one per line
    Serve,
}

/// One line of `serve` input.
#[derive(Debug, Deserialize)]
struct ServeRequest {
    file: PathBuf,
    text: String,
    locations: Vec<usize>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = get_config(cli.root).and_then(|config| {
        let log_path = config.log_path();
        if let Err(e) = logging::init(&log_path) {
            eprintln!("Warning: logging to {} disabled: {}", log_path.display(), e);
        }

        match cli.command {
            Commands::Complete { file, offset, stdin, format } => {
                run_complete(config, file, offset, stdin, format)
            }
            Commands::Exports { file, format } => run_exports(file, format),
            Commands::Serve => run_serve(config),
        }
    });

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn get_config(root: Option<PathBuf>) -> Result<Config> {
    let root = root.unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));
    Ok(Config::load(&root)?)
}

fn absolute(path: &Path) -> Result<PathBuf> {
    absolute_path(path).context("Failed to read current directory")
}

fn run_complete(
    config: Config,
    file: PathBuf,
    offsets: Vec<usize>,
    stdin: bool,
    format: String,
) -> Result<ExitCode> {
    let format: OutputFormat = format.parse().map_err(anyhow::Error::msg)?;
    let file = absolute(&file)?;

    let buffer = if stdin {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text)?;
        TextBuffer::new(text, Some(file))
    } else {
        TextBuffer::from_file(&file)
            .with_context(|| format!("Failed to read {}", file.display()))?
    };

    let locations = if offsets.is_empty() { vec![buffer.len()] } else { offsets };

    let mut session = CompletionSession::new(config);
    let entries = session.query_completions(&buffer, &locations).unwrap_or_default();
    println!("{}", OutputFormatter::format(&entries, format));

    Ok(ExitCode::SUCCESS)
}

fn run_exports(file: PathBuf, format: String) -> Result<ExitCode> {
    let format: OutputFormat = format.parse().map_err(anyhow::Error::msg)?;
    let file = absolute(&file)?;

    let exports = parser::parse_file(&file)?;
    let entries: Vec<CompletionEntry> = exports.values().map(CompletionEntry::from).collect();
    println!("{}", OutputFormatter::format(&entries, format));

    Ok(ExitCode::SUCCESS)
}

fn run_serve(config: Config) -> Result<ExitCode> {
    let mut session = CompletionSession::new(config);
    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();

    info!("serving completion requests");

    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<ServeRequest>(&line) {
            Ok(request) => match absolute_path(&request.file) {
                Ok(file) => {
                    let buffer = TextBuffer::new(request.text, Some(file));
                    session.query_completions(&buffer, &request.locations)
                }
                Err(e) => {
                    error!(error = %e, file = %request.file.display(), "cannot resolve buffer path");
                    None
                }
            },
            Err(e) => {
                error!(error = %e, "malformed request");
                None
            }
        };

        writeln!(stdout, "{}", serde_json::to_string(&response)?)?;
        stdout.flush()?;
    }

    info!(modules = session.cache().len(), "input closed");
    Ok(ExitCode::SUCCESS)
}
