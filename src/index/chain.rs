use std::path::{Path, PathBuf};

use tracing::debug;

use super::{IndexLocator, IndexStore};
use crate::config::Config;
use crate::error::{Result, ToxError};

/// Builds the local -> outer -> ... chain of indices for a directory.
pub struct IndexChainLoader<'a> {
    config: &'a Config,
}

impl<'a> IndexChainLoader<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Load the index applying to `start`. With `deep`, also load every
    /// index found above each store's root and link them through `outer`.
    ///
    /// `Ok(None)` means no index applies here.
    pub fn load(&self, start: &Path, deep: bool) -> Result<Option<IndexStore>> {
        if !start.is_dir() {
            return Err(ToxError::NotADirectory(start.to_path_buf()));
        }
        let start = start.canonicalize().map_err(|e| ToxError::fs(start, e))?;
        let locator = IndexLocator::new(self.config);

        let Some(first) = locator.locate(&start)? else {
            return Ok(None);
        };

        let mut seen: Vec<PathBuf> = vec![first.clone()];
        let mut stores = vec![IndexStore::load(&first)?];

        if deep {
            loop {
                let Some(current) = stores.last() else { break };
                if self.config.is_home(current.root()) {
                    break;
                }
                let Some(parent) = current.root().parent() else {
                    break;
                };
                let Some(next) = locator.locate(parent)? else {
                    break;
                };
                if seen.contains(&next) {
                    debug!("{} already in chain, stopping", next.display());
                    break;
                }
                debug!("outer index {}", next.display());
                seen.push(next.clone());
                stores.push(IndexStore::load(&next)?);
            }
        }

        // Wire from the outermost store inward.
        let mut outer: Option<IndexStore> = None;
        for mut store in stores.into_iter().rev() {
            store.set_outer(outer.take());
            outer = Some(store);
        }
        Ok(outer)
    }
}
