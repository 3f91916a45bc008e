#![forbid(unsafe_code)]
//! tox — directory bookmarks with chained per-directory indices and
//! fragment-glob lookup.

pub mod auto;
pub mod chooser;
pub mod cli;
pub mod config;
pub mod error;
pub mod index;
pub mod matcher;
pub mod pathutil;
pub mod render;
pub mod resolve;

pub use config::Config;
pub use error::{Result, ToxError};
pub use index::{IndexChainLoader, IndexLocator, IndexStore};
pub use resolve::{Chooser, Mode, Outcome, Query, Resolution, ResolutionEngine, Scope, Selection};
