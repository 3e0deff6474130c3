//! Error types with fix suggestions
//!
//! Every fatal condition is a `FuzzError` returned up to `main`, which
//! reports it and exits. There is no recoverable error class: each variant
//! indicates a configuration problem the operator must fix, not a transient
//! condition, so the pipeline never retries or skips.

use thiserror::Error;

/// Trait for errors that provide fix suggestions
pub trait FixSuggestion {
    fn fix_suggestion(&self) -> Option<&str>;
}

#[derive(Error, Debug)]
pub enum FuzzError {
    // ─────────────────────────────────────────────────────────────
    // Declaration errors, caught before any generation starts
    // ─────────────────────────────────────────────────────────────
    #[error("Wordlist '{raw}' contains multiple colons")]
    WordlistExtraColon { raw: String },

    #[error("Wordlist '{raw}' has an empty path")]
    WordlistEmptyPath { raw: String },

    #[error("Wordlist '{raw}' has an empty placeholder")]
    EmptyPlaceholder { raw: String },

    #[error("The placeholder '{placeholder}' cannot be used twice")]
    DuplicatePlaceholder { placeholder: String },

    #[error("Standard input can only be used once")]
    StdinReused,

    #[error("Empty headers are not allowed")]
    EmptyHeader,

    // ─────────────────────────────────────────────────────────────
    // Template errors, fatal on first render
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid target URL '{url}': {details}")]
    InvalidUrl { url: String, details: String },

    #[error("Unsupported scheme '{scheme}' in '{url}' (only http and https are supported)")]
    UnsupportedScheme { scheme: String, url: String },

    #[error("Target URL '{url}' has no host")]
    MissingHost { url: String },

    // ─────────────────────────────────────────────────────────────
    // Word source I/O errors, terminal for the whole stream
    // ─────────────────────────────────────────────────────────────
    #[error("Wordlist '{path}' could not be opened: {source}")]
    WordlistOpen {
        path: String,
        source: std::io::Error,
    },

    #[error("Reading word from '{path}' failed: {source}")]
    WordlistRead {
        path: String,
        source: std::io::Error,
    },

    // ─────────────────────────────────────────────────────────────
    // Output errors
    // ─────────────────────────────────────────────────────────────
    #[error("Could not generate JSON: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl FixSuggestion for FuzzError {
    fn fix_suggestion(&self) -> Option<&str> {
        match self {
            FuzzError::WordlistExtraColon { .. } => {
                Some("Use 'path' or 'path:PLACEHOLDER' with a single colon")
            }
            FuzzError::WordlistEmptyPath { .. } => {
                Some("Give every wordlist a file path, or '-' for standard input")
            }
            FuzzError::EmptyPlaceholder { .. } => {
                Some("Remove the trailing colon or name the placeholder, e.g. 'users.txt:USER'")
            }
            FuzzError::DuplicatePlaceholder { .. } => {
                Some("Pick a distinct placeholder for each wordlist")
            }
            FuzzError::StdinReused => {
                Some("Only one wordlist may use '-'; read the others from files")
            }
            FuzzError::EmptyHeader => Some("Pass headers as 'Name: value'"),
            FuzzError::InvalidUrl { .. } => {
                Some("Pass a full URL like 'http://example.com/path'")
            }
            FuzzError::UnsupportedScheme { .. } => Some("Use an http:// or https:// URL"),
            FuzzError::MissingHost { .. } => Some("Include a hostname in the target URL"),
            FuzzError::WordlistOpen { .. } => Some("Check the wordlist path and permissions"),
            FuzzError::WordlistRead { .. } => None,
            FuzzError::Encode(_) => None,
            FuzzError::Io(_) => Some("Check file path and permissions"),
        }
    }
}
