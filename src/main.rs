//! fuzzgen CLI - streams HTTP request descriptors from a template and wordlists

use std::io::Write as _;

use clap::Parser;
use colored::Colorize;
use tracing::debug;

use fuzzgen::error::{FixSuggestion, FuzzError};
use fuzzgen::render::{render, RequestTemplate};
use fuzzgen::resolve::{placeholder_order, used_placeholders, used_wordlists};
use fuzzgen::wordlist::parse_wordlists;
use fuzzgen::product;

const AFTER_HELP: &str = "\
Zero, one or more wordlists can be provided. If no custom placeholder is
given, FUZZ is used instead; if multiple wordlists have no custom
placeholder, FUZZ2, FUZZ3, etc. will be assigned. If multiple wordlists
are used, all permutations will be generated.

One wordlist can use '-' instead of a path. Its words will be read from
standard input.

If no wordlist is used, only one request will be generated.";

#[derive(Parser)]
#[command(name = "fuzzgen")]
#[command(about = "Generates HTTP request descriptors from a template and wordlists")]
#[command(version)]
#[command(after_help = AFTER_HELP)]
struct Cli {
    /// The path to a wordlist, and optionally a colon followed by a custom
    /// placeholder, e.g. '/path/to/username/list:USER'
    // allow_hyphen_values so '-' (standard input) parses as a value
    #[arg(
        short,
        long = "wordlist",
        value_name = "PATH[:PLACEHOLDER]",
        allow_hyphen_values = true
    )]
    wordlist: Vec<String>,

    /// The URL of the target
    #[arg(short, long)]
    url: String,

    /// A HTTP header to use, e.g. 'Content-Type: application/json'
    #[arg(short = 'H', long = "header", value_name = "HEADER")]
    header: Vec<String>,

    /// Payload data as given, without any encoding. Mostly used for POST
    /// requests
    #[arg(short, long, default_value = "")]
    data: String,

    /// The HTTP method to use
    #[arg(short = 'X', long, default_value = "GET")]
    method: String,
}

#[tokio::main]
async fn main() {
    // Records go to stdout; diagnostics must stay on stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("{} {}", "Error:".red().bold(), e);
        if let Some(suggestion) = e.fix_suggestion() {
            eprintln!("  {} {}", "Fix:".yellow(), suggestion);
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), FuzzError> {
    for header in &cli.header {
        if header.is_empty() {
            return Err(FuzzError::EmptyHeader);
        }
    }
    let specs = parse_wordlists(&cli.wordlist)?;
    let template = RequestTemplate {
        url: cli.url,
        method: cli.method,
        headers: cli.header,
        body: cli.data,
    };

    let order = placeholder_order(&specs);
    let used = used_placeholders(&order, &template);
    let bindings = used_wordlists(&specs, &used);
    debug!(
        declared = specs.len(),
        used = bindings.len(),
        "resolved wordlist bindings"
    );

    let stdout = std::io::stdout();
    let mut out = std::io::BufWriter::new(stdout.lock());
    let mut emitted = 0u64;

    let mut assignments = product::stream(bindings);
    while let Some(item) = assignments.recv().await {
        let assignment = item?;
        let record = render(&template, &used, &assignment)?;
        let line = serde_json::to_string(&record)?;
        writeln!(out, "{line}")?;
        emitted += 1;
    }
    out.flush()?;
    debug!(records = emitted, "generation complete");

    Ok(())
}
