//! Core data structures for UniProt requests and results.

mod entry;
mod search;

pub use entry::ProteinSummary;
pub use search::{OutputFormat, PageContent, SearchPage, SearchRequest};
