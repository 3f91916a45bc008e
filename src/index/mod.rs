//! Index files: parsing, mutation, location and chaining.

mod chain;
mod locate;
mod store;

pub use chain::IndexChainLoader;
pub use locate::IndexLocator;
pub use store::IndexStore;

/// File name of a directory index.
pub const INDEX_FILE: &str = ".tox-index";

/// First-line marker that protects an index from deletion.
pub const PROTECT_SENTINEL: &str = "#protect";

/// Result of tagging a directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    Added(String),
    AlreadyPresent(String),
}

/// Result of untagging a directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed(String),
    NotFound(String),
}
