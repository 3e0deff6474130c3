//! Wordlist declarations and word sources
//!
//! A wordlist binds a word source (a file, or standard input via `-`) to a
//! placeholder token. Declarations are validated once, up front; sources are
//! only ever opened by the product streamer, and only for wordlists whose
//! placeholder the template actually uses.

use std::collections::HashSet;

use tokio::fs::File;
use tokio::io::{AsyncRead, BufReader};

use crate::error::FuzzError;

/// Pseudo-path selecting the process's standard input as the word source.
pub const STDIN_PATH: &str = "-";

/// One declared wordlist: a word source bound to a placeholder token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordlistSpec {
    /// Path to the wordlist file, or `-` for standard input.
    pub path: String,
    /// Literal token this wordlist's words are substituted for.
    pub placeholder: String,
}

impl WordlistSpec {
    pub fn is_stdin(&self) -> bool {
        self.path == STDIN_PATH
    }

    /// Open the word source as a buffered line reader.
    ///
    /// Standard input is taken here, not earlier, so a declared-but-unused
    /// `-` wordlist never consumes it.
    pub async fn open(&self) -> Result<BufReader<Box<dyn AsyncRead + Send + Unpin>>, FuzzError> {
        let inner: Box<dyn AsyncRead + Send + Unpin> = if self.is_stdin() {
            Box::new(tokio::io::stdin())
        } else {
            let file = File::open(&self.path)
                .await
                .map_err(|source| FuzzError::WordlistOpen {
                    path: self.path.clone(),
                    source,
                })?;
            Box::new(file)
        };
        Ok(BufReader::new(inner))
    }
}

/// Parse raw `-w` values (`PATH` or `PATH:PLACEHOLDER`) into wordlist specs.
///
/// A wordlist without a custom placeholder gets `FUZZ`; further ones get
/// `FUZZ2`, `FUZZ3`, and so on. Placeholders must be unique across all
/// wordlists, paths must be non-empty, and `-` may appear at most once.
///
/// A stdin-backed wordlist is hoisted to the front of the returned list so
/// standard input is opened exactly once, as the outermost (slowest-varying)
/// dimension of the product.
pub fn parse_wordlists(raw: &[String]) -> Result<Vec<WordlistSpec>, FuzzError> {
    let mut specs = Vec::with_capacity(raw.len());
    let mut seen = HashSet::new();
    let mut stdin_used = false;
    let mut generated = 1u32;

    for entry in raw {
        let parts: Vec<&str> = entry.split(':').collect();
        if parts.len() > 2 {
            return Err(FuzzError::WordlistExtraColon { raw: entry.clone() });
        }

        let placeholder = if parts.len() == 2 {
            if parts[1].is_empty() {
                return Err(FuzzError::EmptyPlaceholder { raw: entry.clone() });
            }
            parts[1].to_string()
        } else {
            let name = if generated == 1 {
                "FUZZ".to_string()
            } else {
                format!("FUZZ{generated}")
            };
            generated += 1;
            name
        };

        if !seen.insert(placeholder.clone()) {
            return Err(FuzzError::DuplicatePlaceholder { placeholder });
        }

        if parts[0].is_empty() {
            return Err(FuzzError::WordlistEmptyPath { raw: entry.clone() });
        }
        if parts[0] == STDIN_PATH {
            if stdin_used {
                return Err(FuzzError::StdinReused);
            }
            stdin_used = true;
        }

        specs.push(WordlistSpec {
            path: parts[0].to_string(),
            placeholder,
        });
    }

    Ok(move_stdin_to_front(specs))
}

fn move_stdin_to_front(mut specs: Vec<WordlistSpec>) -> Vec<WordlistSpec> {
    if let Some(pos) = specs.iter().position(WordlistSpec::is_stdin) {
        let stdin_spec = specs.remove(pos);
        specs.insert(0, stdin_spec);
    }
    specs
}
