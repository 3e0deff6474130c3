//! fuzzgen - streaming HTTP fuzz-request generator
//!
//! Turns one templated request plus zero or more wordlists into a lazy
//! stream of concrete request descriptors, one JSON line per point in the
//! cartesian product of the wordlists' words.

pub mod error;
pub mod product;
pub mod render;
pub mod resolve;
pub mod wordlist;

pub use error::{FixSuggestion, FuzzError};
pub use render::{render, Assignment, OutputRecord, RequestTemplate};
pub use wordlist::WordlistSpec;
